//! Data module: block storage, halo buffers and scratch pools

pub mod block;
pub mod collection;
pub mod halo;
pub mod pool;

pub use block::{Block, BlockShape, Components};
pub use collection::{BlockBatch, BlockCollection};
pub use halo::{HaloBuffer, HaloRead};
pub use pool::ScratchPool;

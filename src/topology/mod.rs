//! Top-level module for block topology.
//!
//! This module describes where blocks sit and how their ghosts are composed:
//! - Block identifiers and per-block placement metadata
//! - Stencil footprints and the eight neighbor directions around a block
//! - Boundary descriptors and a builder for them
//! - A same-level uniform grid that produces both

pub mod axis;
pub mod block_id;
pub mod block_info;
pub mod boundary;
pub mod boundary_builder;
pub mod direction;
pub mod footprint;
pub mod uniform;

pub use axis::Axis;
pub use block_id::BlockId;
pub use block_info::BlockInfo;
pub use boundary::{BoundaryInfo, BoundaryInfoBlock, IndexWP, PointIndex};
pub use boundary_builder::BoundaryInfoBlockBuilder;
pub use direction::Direction;
pub use footprint::StencilFootprint;
pub use uniform::UniformGrid;

//! Halo assembly: per-worker labs that materialize a block and its ghosts.

pub mod scalar_lab;
pub mod state;
pub mod streamer;

pub use scalar_lab::ScalarBlockLab;
pub use state::LabState;
pub use streamer::{Component, FnStreamer, Scalar, Streamer};

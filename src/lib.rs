#![cfg_attr(docsrs, feature(doc_cfg))]
//! # block-halo
//!
//! block-halo is the halo-assembly and stencil core of a 2D block-structured
//! adaptive mesh. The domain is tiled by fixed-size blocks on several
//! refinement levels; before a finite-difference operator can run on a block,
//! the block needs a padded copy of its own values plus a ring of ghost cells
//! synthesized from its neighbors, possibly on another level.
//!
//! ## Features
//! - Shared block storage with scoped per-block locks and deadlock-free batch locking
//! - Boundary metadata describing every ghost as a weighted sum of neighbor cells
//! - Per-worker labs that assemble the padded field, reusing their buffers across blocks
//! - Second- and fourth-order derivative operators with one-sided edge formulas
//! - Optional parallel sweeps over all blocks (`rayon` feature)
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! block-halo = "0.3"
//! # Optional features:
//! # features = ["rayon", "check-invariants"]
//! ```
//!
//! A typical step creates one lab per worker, prepares it once for the widest
//! stencil, then loads each block and runs the operators on it:
//!
//! ```rust
//! # fn main() -> Result<(), block_halo::mesh_error::MeshError> {
//! use block_halo::prelude::*;
//!
//! let grid = UniformGrid::new(1, BlockShape::new(8, 8));
//! let field = grid.collection_from_fn(|x, y| x * x + y)?;
//! let boundary = grid.boundary(Order4.footprint())?;
//!
//! let mut lab = ScalarBlockLab::new(Scalar::default());
//! lab.prepare(&field, &boundary, Order4.footprint())?;
//! lab.begin_step(0.0)?;
//!
//! let mut out: Block<[Real; 2]> = Block::new(field.shape());
//! for info in grid.infos() {
//!     lab.load(&info)?;
//!     let mut sink = BlockSink::new(&mut out, 0, StreamPolicy::Assign);
//!     dfdx(&Order4, &lab, &info, field.shape(), &mut sink);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Invariant checking
//!
//! Ghost weights must form a partition of unity. The lab checks this while
//! loading in debug builds or with the `check-invariants` feature, and panics on
//! a violation; release builds trust the metadata.

/// Floating-point type of all field values, spacings and weights.
pub type Real = f64;

pub mod algs;
pub mod config;
pub mod data;
pub mod debug_invariants;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::Real;
    pub use crate::algs::lab::{Component, FnStreamer, LabState, Scalar, ScalarBlockLab, Streamer};
    pub use crate::algs::stencil::{
        BlockSink, FiniteDifference, Order2, Order4, RawSink, Sink, StencilOrder, StreamPolicy,
        dfdx, dfdy,
    };
    pub use crate::algs::sweep::{Sweep, SweepTarget};
    pub use crate::config::LabConfig;
    pub use crate::data::block::{Block, BlockShape, Components};
    pub use crate::data::collection::BlockCollection;
    pub use crate::data::halo::HaloRead;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::axis::Axis;
    pub use crate::topology::block_id::BlockId;
    pub use crate::topology::block_info::BlockInfo;
    pub use crate::topology::boundary::{BoundaryInfo, BoundaryInfoBlock, PointIndex};
    pub use crate::topology::boundary_builder::BoundaryInfoBlockBuilder;
    pub use crate::topology::footprint::StencilFootprint;
    pub use crate::topology::uniform::UniformGrid;
}

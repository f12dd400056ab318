//! MeshError: Unified error type for block-halo public APIs
//!
//! Every variant describes a contract violation: a bug in the topology
//! subsystem that produced the boundary metadata, or caller misuse of the
//! lab state machine. None of them is transient, so callers are expected to
//! stop the run rather than retry.

use crate::topology::block_id::BlockId;
use thiserror::Error;

/// Unified error type for block-halo operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A lab operation was invoked from a state that does not permit it.
    #[error("lab operation `{op}` is not allowed in state {state}")]
    InvalidLabState {
        /// Operation that was attempted.
        op: &'static str,
        /// State the lab was in.
        state: &'static str,
    },
    /// The requested stencil footprint reaches further than the one the
    /// boundary metadata was built for.
    #[error(
        "stencil footprint {requested_start:?}..{requested_end:?} exceeds boundary footprint {bound_start:?}..{bound_end:?}"
    )]
    FootprintExceedsBoundary {
        requested_start: [i32; 2],
        requested_end: [i32; 2],
        bound_start: [i32; 2],
        bound_end: [i32; 2],
    },
    /// A lab read outside the halo window.
    #[error("halo index ({ix}, {iy}) is outside the loaded window")]
    HaloIndexOutOfRange { ix: i32, iy: i32 },
    /// Footprint with `start > 0` or `end < 1` on some axis.
    #[error("invalid stencil footprint {start:?}..{end:?} (need start <= 0 and end >= 1)")]
    InvalidFootprint { start: [i32; 2], end: [i32; 2] },
    /// No boundary descriptor registered for the block.
    #[error("no boundary info registered for block {0}")]
    MissingBoundaryInfo(BlockId),
    /// The block collection does not hold the requested block.
    #[error("block {0} not found in collection")]
    MissingBlock(BlockId),
    /// A block with this id is already stored.
    #[error("block {0} already present in collection")]
    DuplicateBlock(BlockId),
    /// A direction span in the descriptor disagrees with the ghost region geometry.
    #[error("direction code {code}: descriptor lists {found} ghosts, region needs {expected}")]
    GhostCountMismatch {
        code: usize,
        expected: usize,
        found: usize,
    },
    /// A ghost contribution references a point outside the index pool.
    #[error("ghost contribution references point {index} but the index pool holds {len}")]
    PointIndexOutOfRange { index: usize, len: usize },
    /// A ghost contribution references a weight outside the weight pool.
    #[error("ghost contribution references weight {index} but the weight pool holds {len}")]
    WeightIndexOutOfRange { index: usize, len: usize },
    /// An index-pool entry points past the end of its source block.
    #[error("point {index} is outside block {block} with {len} cells")]
    CellIndexOutOfRange {
        block: BlockId,
        index: usize,
        len: usize,
    },
    /// An index-pool entry names a block that is not in the dependency list.
    #[error("index pool references block {0} which is not listed as a dependency")]
    UndeclaredDependency(BlockId),
    /// A block's element count does not match the collection shape.
    #[error("block shape mismatch: expected {expected:?}, found {found:?}")]
    BlockShapeMismatch {
        expected: [usize; 2],
        found: [usize; 2],
    },
    /// Block too narrow for the one-sided zones of the selected stencil.
    #[error("block extent {extent} on axis {axis} is too small for a stencil needing {required}")]
    BlockTooSmall {
        axis: usize,
        extent: usize,
        required: usize,
    },
    /// A raw output buffer does not hold exactly one value per cell.
    #[error("output buffer holds {found} values, block needs {expected}")]
    OutputLengthMismatch { expected: usize, found: usize },
    /// A ghost's weights do not form a partition of unity.
    #[error("ghost {ghost}: product weights sum to {sum}, expected 1")]
    WeightPartitionViolation { ghost: usize, sum: f64 },
}

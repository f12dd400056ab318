//! Boundary metadata: how every ghost cell of a block is synthesized.
//!
//! The topology subsystem describes each ghost cell as a weighted sum over
//! cells of neighboring blocks, possibly on a different refinement level. A
//! contribution carries one index into the block's point pool and two indices
//! into its weight pool (one weight per axis); its coefficient is the product
//! of the two weights.
//!
//! Descriptors are shared by every worker. [`BoundaryInfo`] keeps them in a
//! concurrent map of `Arc<Mutex<_>>` so the topology side can swap a descriptor
//! after a regrid while workers still hold the old one locked.
//!
//! # Invariants
//!
//! - Ghosts are stored contiguously per direction code, in the order
//!   `y` outer, `x` inner over [`Direction::region`].
//! - For every ghost the product weights sum to `1` (partition of unity).
//! - Every point-pool entry refers to a block listed in `dependent_block_ids`.
//!
//! These are checked by [`DebugInvariants::validate_invariants`]; the lab only
//! re-checks the weight sum, and only when invariant checking is compiled in.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};

use crate::Real;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::block_id::BlockId;
use crate::topology::direction::{CENTER_CODE, DIRECTION_CODES, Direction};
use crate::topology::footprint::StencilFootprint;

/// Absolute tolerance of the partition-of-unity check.
pub const WEIGHT_SUM_TOLERANCE: Real = Real::EPSILON * 8.0;

/// A source cell: flat cell index `ix + iy * nx` within block `block_id`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointIndex {
    pub block_id: BlockId,
    pub index: usize,
}

impl PointIndex {
    pub fn new(block_id: BlockId, index: usize) -> Self {
        Self { block_id, index }
    }
}

/// One weighted contribution to a ghost cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndexWP {
    /// Index into the point pool.
    pub point_index: usize,
    /// Two indices into the weight pool; the coefficient is their product.
    pub weights_index: [usize; 2],
}

/// Contiguous run of ghosts belonging to one direction code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GhostSpan {
    pub start: usize,
    pub n_ghosts: usize,
}

/// Ghost composition of one block.
#[derive(Clone, Debug)]
pub struct BoundaryInfoBlock {
    pub(crate) cells: [usize; 2],
    pub(crate) footprint: StencilFootprint,
    pub(crate) boundary: [GhostSpan; DIRECTION_CODES],
    pub(crate) ghosts: Vec<Vec<IndexWP>>,
    pub(crate) index_pool: Vec<PointIndex>,
    pub(crate) weights_pool: Vec<Real>,
    pub(crate) dependent_block_ids: Vec<BlockId>,
}

impl BoundaryInfoBlock {
    /// Ghost span of direction code `code`.
    #[inline]
    pub fn span(&self, code: usize) -> GhostSpan {
        self.boundary[code]
    }

    /// Per-direction span table, indexed by direction code.
    #[inline]
    pub fn spans(&self) -> &[GhostSpan; DIRECTION_CODES] {
        &self.boundary
    }

    /// All ghosts, concatenated in direction-code order.
    #[inline]
    pub fn ghosts(&self) -> &[Vec<IndexWP>] {
        &self.ghosts
    }

    /// Source cells the ghosts read from.
    #[inline]
    pub fn index_pool(&self) -> &[PointIndex] {
        &self.index_pool
    }

    /// Interpolation coefficients.
    #[inline]
    pub fn weights_pool(&self) -> &[Real] {
        &self.weights_pool
    }

    /// Blocks whose data the ghosts depend on.
    #[inline]
    pub fn dependent_block_ids(&self) -> &[BlockId] {
        &self.dependent_block_ids
    }

    /// Footprint the descriptor was built for.
    #[inline]
    pub fn footprint(&self) -> &StencilFootprint {
        &self.footprint
    }

    /// Block extent the descriptor was built for.
    #[inline]
    pub fn cells(&self) -> [usize; 2] {
        self.cells
    }

    /// Sum of product weights of ghost `ghost`.
    pub fn weight_sum(&self, ghost: usize) -> Real {
        self.ghosts[ghost]
            .iter()
            .map(|wp| {
                self.weights_pool[wp.weights_index[0]] * self.weights_pool[wp.weights_index[1]]
            })
            .sum()
    }

    pub(crate) fn validate_geometry(&self) -> Result<(), MeshError> {
        let mut next = 0usize;
        for d in Direction::ALL {
            let code = d.code();
            let expected = d.region(self.cells, &self.footprint).len();
            let span = self.boundary[code];
            if span.n_ghosts != expected || span.start != next {
                return Err(MeshError::GhostCountMismatch {
                    code,
                    expected,
                    found: span.n_ghosts,
                });
            }
            next += expected;
        }
        if self.boundary[CENTER_CODE].n_ghosts != 0 || next != self.ghosts.len() {
            return Err(MeshError::GhostCountMismatch {
                code: CENTER_CODE,
                expected: next,
                found: self.ghosts.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn validate_references(&self) -> Result<(), MeshError> {
        let n_points = self.index_pool.len();
        let n_weights = self.weights_pool.len();
        for wp in self.ghosts.iter().flatten() {
            if wp.point_index >= n_points {
                return Err(MeshError::PointIndexOutOfRange {
                    index: wp.point_index,
                    len: n_points,
                });
            }
            for &w in &wp.weights_index {
                if w >= n_weights {
                    return Err(MeshError::WeightIndexOutOfRange {
                        index: w,
                        len: n_weights,
                    });
                }
            }
        }
        let cells = self.cells[0] * self.cells[1];
        for p in &self.index_pool {
            if !self.dependent_block_ids.contains(&p.block_id) {
                return Err(MeshError::UndeclaredDependency(p.block_id));
            }
            if p.index >= cells {
                return Err(MeshError::CellIndexOutOfRange {
                    block: p.block_id,
                    index: p.index,
                    len: cells,
                });
            }
        }
        Ok(())
    }

    /// Check the partition of unity for every ghost.
    pub fn validate_weights(&self) -> Result<(), MeshError> {
        for ghost in 0..self.ghosts.len() {
            let sum = self.weight_sum(ghost);
            if (1.0 - sum).abs() >= WEIGHT_SUM_TOLERANCE {
                return Err(MeshError::WeightPartitionViolation { ghost, sum });
            }
        }
        Ok(())
    }
}

impl DebugInvariants for BoundaryInfoBlock {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "BoundaryInfoBlock");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        self.validate_geometry()?;
        self.validate_references()?;
        self.validate_weights()
    }
}

/// Exclusive lock on one block descriptor; released on drop.
pub type BoundaryGuard = ArcMutexGuard<RawMutex, BoundaryInfoBlock>;

/// Registry of boundary descriptors for every block of the grid.
#[derive(Debug)]
pub struct BoundaryInfo {
    footprint: StencilFootprint,
    blocks: DashMap<BlockId, Arc<Mutex<BoundaryInfoBlock>>>,
}

impl BoundaryInfo {
    /// Empty registry for descriptors built with `footprint`.
    pub fn new(footprint: StencilFootprint) -> Self {
        Self {
            footprint,
            blocks: DashMap::new(),
        }
    }

    /// Footprint every registered descriptor covers.
    #[inline]
    pub fn footprint(&self) -> &StencilFootprint {
        &self.footprint
    }

    /// Register or replace the descriptor of `id`.
    ///
    /// # Errors
    /// Returns `Err(FootprintExceedsBoundary)` if the descriptor was built for
    /// a different footprint than the registry.
    pub fn insert(&self, id: BlockId, block: BoundaryInfoBlock) -> Result<(), MeshError> {
        if block.footprint != self.footprint {
            return Err(MeshError::FootprintExceedsBoundary {
                requested_start: block.footprint.start,
                requested_end: block.footprint.end,
                bound_start: self.footprint.start,
                bound_end: self.footprint.end,
            });
        }
        self.blocks.insert(id, Arc::new(Mutex::new(block)));
        Ok(())
    }

    /// Shared handle to the descriptor of `id`.
    pub fn lookup(&self, id: BlockId) -> Result<Arc<Mutex<BoundaryInfoBlock>>, MeshError> {
        self.blocks
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(MeshError::MissingBoundaryInfo(id))
    }

    /// Lock the descriptor of `id` for the lifetime of the returned guard.
    pub fn lock(&self, id: BlockId) -> Result<BoundaryGuard, MeshError> {
        Ok(self.lookup(id)?.lock_arc())
    }

    /// Whether a descriptor is registered for `id`.
    #[inline]
    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    /// Number of registered descriptors.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no descriptor is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Drop the descriptor of `id`, e.g. after the block was coarsened away.
    pub fn remove(&self, id: BlockId) -> Option<Arc<Mutex<BoundaryInfoBlock>>> {
        self.blocks.remove(&id).map(|(_, v)| v)
    }
}

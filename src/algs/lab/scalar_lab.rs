//! ScalarBlockLab: per-worker halo assembly for one streamed scalar.
//!
//! A lab owns a padded [`HaloBuffer`] and two scratch pools. For every block it
//! copies the interior out of the shared [`BlockCollection`], streams the
//! source points named by the block's boundary descriptor, and evaluates each
//! ghost as a weighted sum of those points. Stencil operators then read the
//! buffer through [`HaloRead`].
//!
//! # Locking
//! The descriptor is locked for the whole load; the block itself and the batch
//! of dependencies are each locked only while their values are copied out. No
//! lock survives `load`.
//!
//! # Example
//! ```rust
//! # fn main() -> Result<(), block_halo::mesh_error::MeshError> {
//! use block_halo::algs::lab::{Scalar, ScalarBlockLab};
//! use block_halo::data::block::BlockShape;
//! use block_halo::topology::footprint::StencilFootprint;
//! use block_halo::topology::uniform::UniformGrid;
//!
//! let grid = UniformGrid::new(1, BlockShape::new(4, 4));
//! let fp = StencilFootprint::symmetric(1);
//! let blocks = grid.collection_from_fn(|x, _y| x)?;
//! let boundary = grid.boundary(fp)?;
//!
//! let mut lab = ScalarBlockLab::new(Scalar::default());
//! lab.prepare(&blocks, &boundary, fp)?;
//! lab.begin_step(0.0)?;
//! let infos = grid.infos();
//! let info = &infos[0];
//! lab.load(info)?;
//! // the right neighbor's first column shows up as ghost column 4
//! let h = info.h[0];
//! assert!((lab.read(4, 0) - 4.5 * h).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

use crate::Real;
use crate::algs::lab::state::LabState;
use crate::algs::lab::streamer::Streamer;
use crate::data::block::Block;
use crate::data::collection::BlockCollection;
use crate::data::halo::{HaloBuffer, HaloRead};
use crate::data::pool::ScratchPool;
use crate::mesh_error::MeshError;
use crate::topology::block_id::BlockId;
use crate::topology::block_info::BlockInfo;
use crate::topology::boundary::{BoundaryInfo, BoundaryInfoBlock};
use crate::topology::direction::Direction;
use crate::topology::footprint::StencilFootprint;

/// Per-worker halo assembly engine.
///
/// Not `Clone`: the scratch buffers belong to exactly one worker.
#[derive(Debug)]
pub struct ScalarBlockLab<'a, E, S> {
    streamer: S,
    state: LabState,
    halo: HaloBuffer,
    value_pool: ScratchPool,
    weight_pool: ScratchPool,
    target_time: Real,
    footprint: StencilFootprint,
    collection: Option<&'a BlockCollection<E>>,
    boundary: Option<&'a BoundaryInfo>,
}

impl<'a, E, S> ScalarBlockLab<'a, E, S>
where
    S: Streamer<E>,
{
    /// Unprepared lab streaming elements through `streamer`.
    pub fn new(streamer: S) -> Self {
        Self {
            streamer,
            state: LabState::Uninitialized,
            halo: HaloBuffer::new(),
            value_pool: ScratchPool::new(),
            weight_pool: ScratchPool::new(),
            target_time: 0.0,
            footprint: StencilFootprint::POINTWISE,
            collection: None,
            boundary: None,
        }
    }

    /// Bind the lab to a collection, its boundary metadata and a footprint.
    ///
    /// The halo buffer is reallocated only if its padded size changes.
    ///
    /// # Errors
    /// `InvalidLabState` from `ReadyToLoad`, `InvalidFootprint` for a malformed
    /// footprint, `FootprintExceedsBoundary` if it reaches further than the
    /// boundary metadata.
    pub fn prepare(
        &mut self,
        collection: &'a BlockCollection<E>,
        boundary: &'a BoundaryInfo,
        footprint: StencilFootprint,
    ) -> Result<(), MeshError> {
        self.state.require(
            "prepare",
            &[LabState::Uninitialized, LabState::Prepared, LabState::Loaded],
        )?;
        footprint.validate()?;
        footprint.check_within(boundary.footprint())?;

        self.collection = Some(collection);
        self.boundary = Some(boundary);
        self.footprint = footprint;
        self.halo.reshape(collection.shape().cells(), footprint);
        self.state = LabState::Prepared;
        Ok(())
    }

    /// Record the time the next loads are evaluated at.
    pub fn begin_step(&mut self, time: Real) -> Result<(), MeshError> {
        self.state
            .require("begin_step", &[LabState::Prepared, LabState::Loaded])?;
        self.target_time = time;
        self.state = LabState::ReadyToLoad;
        Ok(())
    }

    /// Fill the halo buffer for the block described by `info`.
    ///
    /// On error the lab drops back to `ReadyToLoad`: the buffer may be partly
    /// overwritten and must not be read until a later load succeeds.
    pub fn load(&mut self, info: &BlockInfo) -> Result<(), MeshError> {
        self.state
            .require("load", &[LabState::ReadyToLoad, LabState::Loaded])?;
        self.state = LabState::ReadyToLoad;

        let (Some(collection), Some(boundary)) = (self.collection, self.boundary) else {
            return Err(MeshError::InvalidLabState {
                op: "load",
                state: LabState::Uninitialized.name(),
            });
        };

        let bbinfo = boundary.lock(info.block_id)?;
        let cells = collection.shape().cells();
        if bbinfo.cells() != cells {
            return Err(MeshError::BlockShapeMismatch {
                expected: cells,
                found: bbinfo.cells(),
            });
        }
        log::trace!(
            "lab load block {} (level {}, index {:?}): {} ghosts from {} blocks",
            info.block_id,
            info.level,
            info.index,
            bbinfo.ghosts().len(),
            bbinfo.dependent_block_ids().len()
        );

        self.copy_interior(collection, info.block_id)?;
        self.stream_dependencies(collection, &bbinfo)?;
        self.fill_ghosts(&bbinfo)?;

        drop(bbinfo);
        self.state = LabState::Loaded;
        Ok(())
    }

    fn copy_interior(
        &mut self,
        collection: &BlockCollection<E>,
        id: BlockId,
    ) -> Result<(), MeshError> {
        let block = collection.lock(id)?;
        let t = self.target_time;
        for iy in 0..block.shape().ny {
            let dst = self.halo.interior_row_mut(iy);
            for (d, e) in dst.iter_mut().zip(block.row(iy)) {
                *d = self.streamer.operate(e, t);
            }
        }
        Ok(())
    }

    fn stream_dependencies(
        &mut self,
        collection: &BlockCollection<E>,
        bbinfo: &BoundaryInfoBlock,
    ) -> Result<(), MeshError> {
        let points = bbinfo.index_pool();
        self.value_pool.ensure_capacity(points.len());
        {
            let batch = collection.lock_many(bbinfo.dependent_block_ids())?;
            let t = self.target_time;
            let values = self.value_pool.head_mut(points.len());

            // the pool is sorted by source block in practice; cache the lookup
            let mut current: Option<(BlockId, &Block<E>)> = None;
            for (v, p) in values.iter_mut().zip(points) {
                let block = match current {
                    Some((id, b)) if id == p.block_id => b,
                    _ => {
                        let b = batch
                            .get(p.block_id)
                            .ok_or(MeshError::UndeclaredDependency(p.block_id))?;
                        current = Some((p.block_id, b));
                        b
                    }
                };
                let element = block.get(p.index).ok_or(MeshError::CellIndexOutOfRange {
                    block: p.block_id,
                    index: p.index,
                    len: block.shape().len(),
                })?;
                *v = self.streamer.operate(element, t);
            }
        }

        let weights = bbinfo.weights_pool();
        self.weight_pool.ensure_capacity(weights.len());
        self.weight_pool
            .head_mut(weights.len())
            .copy_from_slice(weights);
        Ok(())
    }

    fn fill_ghosts(&mut self, bbinfo: &BoundaryInfoBlock) -> Result<(), MeshError> {
        let values = self.value_pool.head(bbinfo.index_pool().len());
        let weights = self.weight_pool.head(bbinfo.weights_pool().len());
        let ghosts = bbinfo.ghosts();
        let cells = bbinfo.cells();

        for d in Direction::ALL {
            // walk the descriptor's geometry; cells outside our window are skipped
            let region = d.region(cells, bbinfo.footprint());
            let span = bbinfo.span(d.code());
            if span.n_ghosts != region.len() || span.start + span.n_ghosts > ghosts.len() {
                return Err(MeshError::GhostCountMismatch {
                    code: d.code(),
                    expected: region.len(),
                    found: span.n_ghosts,
                });
            }
            for (g, (ix, iy)) in (span.start..).zip(region.cells()) {
                if !self.halo.contains(ix, iy) {
                    continue;
                }
                let contributions = &ghosts[g];
                crate::debug_invariants!(
                    partition_of_unity(contributions, weights, g),
                    "ghost weights"
                );
                let mut ghost = 0.0;
                for wp in contributions {
                    ghost += values[wp.point_index]
                        * (weights[wp.weights_index[0]] * weights[wp.weights_index[1]]);
                }
                self.halo.set(ix, iy, ghost);
            }
        }
        Ok(())
    }

    /// Value at block-relative `(ix, iy)`; only meaningful in state `Loaded`.
    ///
    /// Valid coordinates are `start <= i < n + end - 1` per axis.
    #[inline]
    pub fn read(&self, ix: i32, iy: i32) -> Real {
        debug_assert_eq!(self.state, LabState::Loaded, "lab read before load");
        self.halo.get(ix, iy)
    }

    /// Checked variant of [`read`](Self::read).
    pub fn try_read(&self, ix: i32, iy: i32) -> Result<Real, MeshError> {
        self.state.require("read", &[LabState::Loaded])?;
        if !self.halo.contains(ix, iy) {
            return Err(MeshError::HaloIndexOutOfRange { ix, iy });
        }
        Ok(self.halo.get(ix, iy))
    }

    #[inline]
    pub fn state(&self) -> LabState {
        self.state
    }

    /// Footprint bound at the last `prepare`.
    #[inline]
    pub fn footprint(&self) -> &StencilFootprint {
        &self.footprint
    }

    /// Time recorded by the last `begin_step`.
    #[inline]
    pub fn target_time(&self) -> Real {
        self.target_time
    }

    /// The padded buffer, e.g. to check storage identity across `prepare`.
    #[inline]
    pub fn halo(&self) -> &HaloBuffer {
        &self.halo
    }

    /// Current value-pool and weight-pool capacities.
    #[inline]
    pub fn pool_capacities(&self) -> (usize, usize) {
        (self.value_pool.capacity(), self.weight_pool.capacity())
    }
}

impl<E, S> HaloRead for ScalarBlockLab<'_, E, S>
where
    S: Streamer<E>,
{
    #[inline]
    fn at(&self, ix: i32, iy: i32) -> Real {
        self.read(ix, iy)
    }
}

#[cfg(any(
    debug_assertions,
    feature = "strict-invariants",
    feature = "check-invariants"
))]
fn partition_of_unity(
    contributions: &[crate::topology::boundary::IndexWP],
    weights: &[Real],
    ghost: usize,
) -> Result<(), MeshError> {
    use crate::topology::boundary::WEIGHT_SUM_TOLERANCE;

    let sum: Real = contributions
        .iter()
        .map(|wp| weights[wp.weights_index[0]] * weights[wp.weights_index[1]])
        .sum();
    if (1.0 - sum).abs() < WEIGHT_SUM_TOLERANCE {
        Ok(())
    } else {
        Err(MeshError::WeightPartitionViolation { ghost, sum })
    }
}

//! Incremental construction of [`BoundaryInfoBlock`] descriptors.
//!
//! Ghosts are pushed in descriptor order (direction codes ascending, then
//! `y` outer / `x` inner within each region). Points and weights are interned,
//! so repeated sources and coefficients are stored once.

use std::collections::HashMap;

use crate::Real;
use crate::mesh_error::MeshError;
use crate::topology::block_id::BlockId;
use crate::topology::boundary::{BoundaryInfoBlock, GhostSpan, IndexWP, PointIndex};
use crate::topology::direction::{DIRECTION_CODES, Direction};
use crate::topology::footprint::StencilFootprint;

/// A ghost contribution before interning: source cell and per-axis weights.
pub type Contribution = (PointIndex, [Real; 2]);

/// Builder for [`BoundaryInfoBlock`].
#[derive(Debug)]
pub struct BoundaryInfoBlockBuilder {
    cells: [usize; 2],
    footprint: StencilFootprint,
    ghosts: Vec<Vec<IndexWP>>,
    index_pool: Vec<PointIndex>,
    point_lookup: HashMap<PointIndex, usize>,
    weights_pool: Vec<Real>,
    weight_lookup: HashMap<u64, usize>,
    dependent_block_ids: Vec<BlockId>,
}

impl BoundaryInfoBlockBuilder {
    /// Start a descriptor for a block of `cells` cells and the given footprint.
    pub fn new(cells: [usize; 2], footprint: StencilFootprint) -> Self {
        Self {
            cells,
            footprint,
            ghosts: Vec::new(),
            index_pool: Vec::new(),
            point_lookup: HashMap::new(),
            weights_pool: Vec::new(),
            weight_lookup: HashMap::new(),
            dependent_block_ids: Vec::new(),
        }
    }

    /// Build a descriptor by asking `f` for the contributions of every ghost.
    ///
    /// `f` receives the direction and the block-relative cell coordinates.
    pub fn from_fn<F>(
        cells: [usize; 2],
        footprint: StencilFootprint,
        mut f: F,
    ) -> Result<BoundaryInfoBlock, MeshError>
    where
        F: FnMut(Direction, i32, i32) -> Vec<Contribution>,
    {
        let mut builder = Self::new(cells, footprint);
        for d in Direction::ALL {
            for (ix, iy) in d.region(cells, &footprint).cells() {
                let contributions = f(d, ix, iy);
                builder.push_ghost(&contributions);
            }
        }
        builder.build()
    }

    /// Intern a source point and return its index-pool slot.
    pub fn point(&mut self, p: PointIndex) -> usize {
        if let Some(&slot) = self.point_lookup.get(&p) {
            return slot;
        }
        let slot = self.index_pool.len();
        self.index_pool.push(p);
        self.point_lookup.insert(p, slot);
        if !self.dependent_block_ids.contains(&p.block_id) {
            self.dependent_block_ids.push(p.block_id);
        }
        slot
    }

    /// Intern a weight and return its weight-pool slot.
    pub fn weight(&mut self, w: Real) -> usize {
        let key = w.to_bits();
        if let Some(&slot) = self.weight_lookup.get(&key) {
            return slot;
        }
        let slot = self.weights_pool.len();
        self.weights_pool.push(w);
        self.weight_lookup.insert(key, slot);
        slot
    }

    /// Append the next ghost in descriptor order.
    pub fn push_ghost(&mut self, contributions: &[Contribution]) -> &mut Self {
        let ghost = contributions
            .iter()
            .map(|&(p, [wx, wy])| IndexWP {
                point_index: self.point(p),
                weights_index: [self.weight(wx), self.weight(wy)],
            })
            .collect();
        self.ghosts.push(ghost);
        self
    }

    /// Number of ghosts pushed so far.
    pub fn len(&self) -> usize {
        self.ghosts.len()
    }

    /// Whether no ghost was pushed yet.
    pub fn is_empty(&self) -> bool {
        self.ghosts.is_empty()
    }

    /// Compute the span table and validate the descriptor.
    ///
    /// Geometry and references are always checked. The weight partition of
    /// unity is only reported through `log::warn!`, so that callers can build
    /// deliberately inconsistent descriptors.
    ///
    /// # Errors
    /// `GhostCountMismatch` when the number of pushed ghosts does not match the
    /// halo geometry, or a reference error for out-of-range cells.
    pub fn build(mut self) -> Result<BoundaryInfoBlock, MeshError> {
        let mut boundary = [GhostSpan::default(); DIRECTION_CODES];
        let mut next = 0usize;
        for d in Direction::ALL {
            let n_ghosts = d.region(self.cells, &self.footprint).len();
            boundary[d.code()] = GhostSpan {
                start: next,
                n_ghosts,
            };
            next += n_ghosts;
        }
        self.dependent_block_ids.sort_unstable();

        let block = BoundaryInfoBlock {
            cells: self.cells,
            footprint: self.footprint,
            boundary,
            ghosts: self.ghosts,
            index_pool: self.index_pool,
            weights_pool: self.weights_pool,
            dependent_block_ids: self.dependent_block_ids,
        };
        block.validate_geometry()?;
        block.validate_references()?;
        if let Err(e) = block.validate_weights() {
            log::warn!("boundary descriptor built with inconsistent weights: {e}");
        }
        Ok(block)
    }
}

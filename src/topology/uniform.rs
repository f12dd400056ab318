//! Same-level block grid over the unit square.
//!
//! A `UniformGrid` tiles the domain with `2^level` blocks per axis and builds
//! the boundary metadata a lab needs for it: every ghost copies the matching
//! cell of its same-level neighbor. Ghosts beyond the domain edge copy the
//! nearest interior cell; the stencils switch to one-sided formulas there and
//! never read them.
//!
//! Multi-level grids need interpolating descriptors; build those with
//! [`BoundaryInfoBlockBuilder`] directly.

use crate::Real;
use crate::data::block::{Block, BlockShape};
use crate::data::collection::BlockCollection;
use crate::mesh_error::MeshError;
use crate::topology::block_id::BlockId;
use crate::topology::block_info::BlockInfo;
use crate::topology::boundary::{BoundaryInfo, PointIndex};
use crate::topology::boundary_builder::BoundaryInfoBlockBuilder;
use crate::topology::footprint::StencilFootprint;

/// `2^level × 2^level` blocks of `shape` cells each.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UniformGrid {
    level: u32,
    shape: BlockShape,
}

impl UniformGrid {
    pub fn new(level: u32, shape: BlockShape) -> Self {
        debug_assert!(level < 16, "uniform grid level {level} too deep");
        Self { level, shape }
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn shape(&self) -> BlockShape {
        self.shape
    }

    /// Blocks per axis.
    #[inline]
    pub fn blocks_per_axis(&self) -> u32 {
        1 << self.level
    }

    /// Row-major id of the block at `index`.
    #[inline]
    pub fn block_id(&self, index: [u32; 2]) -> BlockId {
        BlockId::new(index[0] + index[1] * self.blocks_per_axis())
    }

    /// Metadata of every block, in id order.
    pub fn infos(&self) -> Vec<BlockInfo> {
        let n = self.blocks_per_axis();
        (0..n)
            .flat_map(|by| (0..n).map(move |bx| [bx, by]))
            .map(|index| {
                BlockInfo::unit_domain(self.block_id(index), self.level, index, self.shape.cells())
            })
            .collect()
    }

    /// Collection whose cells hold `f` evaluated at the cell centers.
    pub fn collection_from_fn<E, F>(&self, mut f: F) -> Result<BlockCollection<E>, MeshError>
    where
        F: FnMut(Real, Real) -> E,
    {
        let mut collection = BlockCollection::new(self.shape);
        for info in self.infos() {
            let block = Block::from_fn(self.shape, |ix, iy| {
                let [x, y] = info.cell_center(ix as i32, iy as i32);
                f(x, y)
            });
            collection.insert(info.block_id, block)?;
        }
        Ok(collection)
    }

    /// Boundary metadata for every block with the given footprint.
    pub fn boundary(&self, footprint: StencilFootprint) -> Result<BoundaryInfo, MeshError> {
        footprint.validate()?;
        let boundary = BoundaryInfo::new(footprint);
        let cells = self.shape.cells();
        for info in self.infos() {
            let desc = BoundaryInfoBlockBuilder::from_fn(cells, footprint, |_, ix, iy| {
                vec![(self.source_of(&info, ix, iy), [1.0, 1.0])]
            })?;
            boundary.insert(info.block_id, desc)?;
        }
        log::debug!(
            "uniform boundary built: level {}, {} blocks, footprint {:?}",
            self.level,
            boundary.len(),
            footprint
        );
        Ok(boundary)
    }

    /// Cell supplying ghost `(ix, iy)` of block `info`, clamped to the domain.
    fn source_of(&self, info: &BlockInfo, ix: i32, iy: i32) -> PointIndex {
        let cells = self.shape.cells();
        let total = |axis: usize| self.blocks_per_axis() as i64 * cells[axis] as i64;
        let global = |axis: usize, local: i32| {
            let g = info.index[axis] as i64 * cells[axis] as i64 + local as i64;
            g.clamp(0, total(axis) - 1) as usize
        };
        let (gx, gy) = (global(0, ix), global(1, iy));
        let index = [(gx / cells[0]) as u32, (gy / cells[1]) as u32];
        PointIndex::new(self.block_id(index), self.shape.flat(gx % cells[0], gy % cells[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::direction::Direction;

    #[test]
    fn ids_are_row_major() {
        let grid = UniformGrid::new(2, BlockShape::new(4, 4));
        assert_eq!(grid.block_id([3, 1]), BlockId::new(7));
        let infos = grid.infos();
        assert_eq!(infos.len(), 16);
        assert!(infos.iter().enumerate().all(|(i, b)| b.block_id.get() as usize == i));
        assert_eq!(infos[7].index, [3, 1]);
    }

    #[test]
    fn ghosts_copy_neighbors_and_clamp_at_edges() {
        let grid = UniformGrid::new(1, BlockShape::new(4, 4));
        let fp = StencilFootprint::symmetric(1);
        let boundary = grid.boundary(fp).unwrap();
        assert_eq!(boundary.len(), 4);

        let desc = boundary.lock(BlockId::new(0)).unwrap();
        assert_eq!(desc.dependent_block_ids(), &[0, 1, 2, 3].map(BlockId::new)[..]);

        let right = desc.span(Direction { dx: 1, dy: 0 }.code());
        let first = desc.ghosts()[right.start][0];
        // ghost (4, 0) is cell (0, 0) of block 1
        assert_eq!(desc.index_pool()[first.point_index], PointIndex::new(BlockId::new(1), 0));

        let left = desc.span(Direction { dx: -1, dy: 0 }.code());
        let first = desc.ghosts()[left.start][0];
        // ghost (-1, 0) lies outside the domain and clamps to cell (0, 0)
        assert_eq!(desc.index_pool()[first.point_index], PointIndex::new(BlockId::new(0), 0));
        assert!(desc.validate_weights().is_ok());
    }

    #[test]
    fn collection_samples_cell_centers() {
        let grid = UniformGrid::new(1, BlockShape::new(2, 2));
        let c = grid.collection_from_fn(|x, y| x + 10.0 * y).unwrap();
        let b3 = c.lock(BlockId::new(3)).unwrap();
        // block (1, 1), cell (0, 0) centered at (0.625, 0.625)
        assert!((b3[(0, 0)] - 6.875).abs() < 1e-12);
    }
}

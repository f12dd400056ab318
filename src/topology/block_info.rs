//! Immutable placement metadata for one block of the refinement hierarchy.

use crate::Real;
use crate::topology::axis::Axis;
use crate::topology::block_id::BlockId;
use serde::{Deserialize, Serialize};

/// Level, position and spacing of a block.
///
/// At refinement `level` the domain is tiled by `2^level` blocks per axis, so a
/// block touches the low edge of the domain on an axis when its index is `0` and
/// the high edge when its index is `2^level - 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Storage handle of the block.
    pub block_id: BlockId,
    /// Refinement level, `0` being the root block covering the whole domain.
    pub level: u32,
    /// Per-axis index of the block within its level.
    pub index: [u32; 2],
    /// Per-axis cell spacing.
    pub h: [Real; 2],
    /// Physical coordinate of the low corner of the block.
    pub origin: [Real; 2],
}

impl BlockInfo {
    /// Construct block metadata with an explicit origin.
    pub fn new(
        block_id: BlockId,
        level: u32,
        index: [u32; 2],
        h: [Real; 2],
        origin: [Real; 2],
    ) -> Self {
        debug_assert!(level < 32, "refinement level {level} out of range");
        debug_assert!(index[0] < (1u32 << level) && index[1] < (1u32 << level));
        Self {
            block_id,
            level,
            index,
            h,
            origin,
        }
    }

    /// Metadata for a block of `cells` cells per axis on a unit-square domain.
    ///
    /// Spacing is `1 / (cells * 2^level)` and the origin follows from the index.
    pub fn unit_domain(block_id: BlockId, level: u32, index: [u32; 2], cells: [usize; 2]) -> Self {
        let blocks = (1u64 << level) as Real;
        let h = [
            1.0 / (blocks * cells[0] as Real),
            1.0 / (blocks * cells[1] as Real),
        ];
        let origin = [
            index[0] as Real / blocks,
            index[1] as Real / blocks,
        ];
        Self::new(block_id, level, index, h, origin)
    }

    /// Largest block index at this level.
    #[inline]
    pub fn max_index(&self) -> u32 {
        (1u32 << self.level) - 1
    }

    /// Whether the block sits on the low domain edge along `axis`.
    #[inline]
    pub fn touching_low(&self, axis: Axis) -> bool {
        self.index[axis.index()] == 0
    }

    /// Whether the block sits on the high domain edge along `axis`.
    #[inline]
    pub fn touching_high(&self, axis: Axis) -> bool {
        self.index[axis.index()] == self.max_index()
    }

    /// Spacing along `axis`.
    #[inline]
    pub fn spacing(&self, axis: Axis) -> Real {
        self.h[axis.index()]
    }

    /// Physical position of the center of cell `(ix, iy)`.
    ///
    /// Negative or out-of-block indices are allowed and address halo cells.
    #[inline]
    pub fn cell_center(&self, ix: i32, iy: i32) -> [Real; 2] {
        [
            self.origin[0] + (ix as Real + 0.5) * self.h[0],
            self.origin[1] + (iy as Real + 0.5) * self.h[1],
        ]
    }
}

//! Stencil footprints: how far a computation reads beyond the current cell.

use crate::mesh_error::MeshError;
use serde::{Deserialize, Serialize};

/// Per-axis read range `[start, end)` relative to the current cell.
///
/// `start` is non-positive and `end` is at least `1`, so `[0, 1)` is the
/// footprint of a pointwise operation with no halo at all.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StencilFootprint {
    pub start: [i32; 2],
    pub end: [i32; 2],
}

impl StencilFootprint {
    /// Footprint of a pointwise operation.
    pub const POINTWISE: StencilFootprint = StencilFootprint {
        start: [0, 0],
        end: [1, 1],
    };

    /// Construct a footprint, rejecting `start > 0` or `end < 1`.
    pub fn try_new(start: [i32; 2], end: [i32; 2]) -> Result<Self, MeshError> {
        let fp = StencilFootprint { start, end };
        fp.validate()?;
        Ok(fp)
    }

    /// Check `start <= 0` and `end >= 1` on both axes.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.start.iter().any(|&s| s > 0) || self.end.iter().any(|&e| e < 1) {
            return Err(MeshError::InvalidFootprint {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Symmetric footprint reaching `width` cells on each side of every axis.
    pub const fn symmetric(width: i32) -> Self {
        StencilFootprint {
            start: [-width, -width],
            end: [width + 1, width + 1],
        }
    }

    /// Whether `self` reads no further than `bound` on every side.
    #[inline]
    pub fn is_within(&self, bound: &StencilFootprint) -> bool {
        (0..2).all(|a| self.start[a] >= bound.start[a] && self.end[a] <= bound.end[a])
    }

    /// Padded extent along `axis` for a block with `cells` interior cells.
    #[inline]
    pub fn padded_extent(&self, axis: usize, cells: usize) -> usize {
        (cells as i64 + (self.end[axis] - self.start[axis] - 1) as i64) as usize
    }

    /// Check that `self` fits inside `bound`.
    pub fn check_within(&self, bound: &StencilFootprint) -> Result<(), MeshError> {
        if self.is_within(bound) {
            Ok(())
        } else {
            Err(MeshError::FootprintExceedsBoundary {
                requested_start: self.start,
                requested_end: self.end,
                bound_start: bound.start,
                bound_end: bound.end,
            })
        }
    }
}

impl Default for StencilFootprint {
    fn default() -> Self {
        StencilFootprint::POINTWISE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_width_two() {
        let fp = StencilFootprint::symmetric(2);
        assert_eq!(fp.start, [-2, -2]);
        assert_eq!(fp.end, [3, 3]);
        assert_eq!(fp.padded_extent(0, 8), 12);
    }

    #[test]
    fn containment() {
        let small = StencilFootprint::symmetric(1);
        let big = StencilFootprint::symmetric(2);
        assert!(small.is_within(&big));
        assert!(!big.is_within(&small));
        assert!(matches!(
            big.check_within(&small),
            Err(MeshError::FootprintExceedsBoundary { .. })
        ));
    }

    #[test]
    fn rejects_inverted_footprint() {
        assert!(StencilFootprint::try_new([1, 0], [1, 1]).is_err());
        assert!(StencilFootprint::try_new([0, 0], [0, 1]).is_err());
        assert_eq!(
            StencilFootprint::try_new([0, 0], [1, 1]).unwrap(),
            StencilFootprint::POINTWISE
        );
    }
}

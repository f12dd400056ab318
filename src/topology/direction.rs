//! Neighbor direction codes and the halo regions they cover.
//!
//! The halo around a block is split into eight sub-regions, one per neighbor
//! direction `(dx, dy) ∈ {-1, 0, 1}² \ {(0, 0)}`. Boundary metadata lists the
//! ghosts of each sub-region contiguously, keyed by the code
//! `(dx + 1) + 3 * (dy + 1)`; code `4` is the block interior and never used.

use crate::topology::footprint::StencilFootprint;
use itertools::iproduct;

/// Number of direction codes in 2D, center included.
pub const DIRECTION_CODES: usize = 9;

/// Code of the block interior.
pub const CENTER_CODE: usize = 4;

/// Offset of a neighbor relative to the block, one component per axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dx: i8,
    pub dy: i8,
}

impl Direction {
    /// All eight neighbor directions in code order.
    pub const ALL: [Direction; 8] = [
        Direction { dx: -1, dy: -1 },
        Direction { dx: 0, dy: -1 },
        Direction { dx: 1, dy: -1 },
        Direction { dx: -1, dy: 0 },
        Direction { dx: 1, dy: 0 },
        Direction { dx: -1, dy: 1 },
        Direction { dx: 0, dy: 1 },
        Direction { dx: 1, dy: 1 },
    ];

    /// Decode a direction code; `None` for the center or out-of-range codes.
    pub fn from_code(code: usize) -> Option<Direction> {
        if code >= DIRECTION_CODES || code == CENTER_CODE {
            return None;
        }
        Some(Direction {
            dx: (code % 3) as i8 - 1,
            dy: (code / 3) as i8 - 1,
        })
    }

    /// Direction code `(dx + 1) + 3 * (dy + 1)`.
    #[inline]
    pub const fn code(self) -> usize {
        (self.dx + 1) as usize + 3 * (self.dy + 1) as usize
    }

    /// Ghost sub-region for this direction around a `cells` block.
    ///
    /// Outward components span the full stencil depth on that axis; zero
    /// components span the block extent.
    pub fn region(self, cells: [usize; 2], footprint: &StencilFootprint) -> GhostRegion {
        let mut start = [0i32; 2];
        let mut end = [0i32; 2];
        for (axis, d) in [self.dx, self.dy].into_iter().enumerate() {
            let n = cells[axis] as i32;
            let (s, e) = match d {
                -1 => (footprint.start[axis], 0),
                0 => (0, n),
                _ => (n, n + footprint.end[axis] - 1),
            };
            start[axis] = s;
            end[axis] = e;
        }
        GhostRegion { start, end }
    }
}

/// Rectangular set of halo cells `[start, end)` per axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GhostRegion {
    pub start: [i32; 2],
    pub end: [i32; 2],
}

impl GhostRegion {
    /// Number of cells in the region.
    #[inline]
    pub fn len(&self) -> usize {
        let w = (self.end[0] - self.start[0]).max(0) as usize;
        let h = (self.end[1] - self.start[1]).max(0) as usize;
        w * h
    }

    /// Whether the region has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells in descriptor order: `y` outer, `x` inner.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let xs = self.start[0]..self.end[0];
        let ys = self.start[1]..self.end[1];
        iproduct!(ys, xs).map(|(iy, ix)| (ix, iy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_and_skip_center() {
        for (i, d) in Direction::ALL.iter().enumerate() {
            let code = d.code();
            assert_ne!(code, CENTER_CODE);
            assert_eq!(Direction::from_code(code), Some(*d));
            assert_eq!(code, if i < 4 { i } else { i + 1 });
        }
        assert_eq!(Direction::from_code(CENTER_CODE), None);
        assert_eq!(Direction::from_code(9), None);
    }

    #[test]
    fn regions_tile_the_halo() {
        let fp = StencilFootprint::symmetric(2);
        let cells = [4usize, 6usize];
        let total: usize = Direction::ALL
            .iter()
            .map(|d| d.region(cells, &fp).len())
            .sum();
        let padded = fp.padded_extent(0, 4) * fp.padded_extent(1, 6);
        assert_eq!(total, padded - 4 * 6);
    }

    #[test]
    fn corner_and_face_geometry() {
        let fp = StencilFootprint::symmetric(1);
        let low_left = Direction { dx: -1, dy: -1 }.region([4, 4], &fp);
        assert_eq!(low_left.start, [-1, -1]);
        assert_eq!(low_left.end, [0, 0]);
        let right = Direction { dx: 1, dy: 0 }.region([4, 4], &fp);
        assert_eq!(right.start, [4, 0]);
        assert_eq!(right.end, [5, 4]);
        let cells: Vec<_> = right.cells().take(2).collect();
        assert_eq!(cells, vec![(4, 0), (4, 1)]);
    }

    #[test]
    fn asymmetric_footprint_has_empty_sides() {
        let fp = StencilFootprint::try_new([0, -1], [2, 1]).unwrap();
        assert!(Direction { dx: -1, dy: 0 }.region([4, 4], &fp).is_empty());
        assert!(Direction { dx: 0, dy: 1 }.region([4, 4], &fp).is_empty());
        assert_eq!(Direction { dx: 1, dy: -1 }.region([4, 4], &fp).len(), 1);
    }
}

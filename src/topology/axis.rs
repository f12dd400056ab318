//! Coordinate axes of the 2D grid.

use serde::{Deserialize, Serialize};

/// One of the two grid axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Both axes in storage order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Position of this axis in `[x, y]` arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// Shift `(ix, iy)` by `offset` cells along this axis.
    #[inline]
    pub const fn shift(self, ix: i32, iy: i32, offset: i32) -> (i32, i32) {
        match self {
            Axis::X => (ix + offset, iy),
            Axis::Y => (ix, iy + offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_moves_along_axis_only() {
        assert_eq!(Axis::X.shift(2, 3, -1), (1, 3));
        assert_eq!(Axis::Y.shift(2, 3, 2), (2, 5));
        assert_eq!(Axis::Y.index(), 1);
    }
}

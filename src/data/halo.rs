//! HaloBuffer: padded copy of one block plus its ghost layer.
//!
//! The buffer is row-major over `[start, n + end - 1)` per axis. A base offset
//! `-start.x - start.y * row` turns signed, block-relative coordinates into
//! slots without branching; the slot is then bounds-checked by the slice.

use crate::Real;
use crate::topology::footprint::StencilFootprint;

/// Read access to a padded field at block-relative coordinates.
///
/// Coordinates may be negative or reach past the block extent, addressing the
/// halo. This is the accessor the stencil operators consume.
pub trait HaloRead {
    /// Value at `(ix, iy)`.
    fn at(&self, ix: i32, iy: i32) -> Real;
}

/// Padded scalar buffer owned by one lab.
#[derive(Debug, Default)]
pub struct HaloBuffer {
    data: Vec<Real>,
    cells: [usize; 2],
    footprint: StencilFootprint,
    size: [usize; 2],
    row_size: usize,
    base_offset: isize,
}

impl HaloBuffer {
    /// Empty buffer; call [`reshape`](Self::reshape) before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer shaped for `cells` and `footprint`, every slot set by `f`.
    pub fn from_fn<F>(cells: [usize; 2], footprint: StencilFootprint, mut f: F) -> Self
    where
        F: FnMut(i32, i32) -> Real,
    {
        let mut buf = Self::new();
        buf.reshape(cells, footprint);
        for iy in buf.y_range() {
            for ix in buf.x_range() {
                buf.set(ix, iy, f(ix, iy));
            }
        }
        buf
    }

    /// Fit the buffer to `cells` and `footprint`.
    ///
    /// Storage is reallocated only when the padded size changes; the base
    /// offset is recomputed on every call. Returns whether a reallocation
    /// happened.
    pub fn reshape(&mut self, cells: [usize; 2], footprint: StencilFootprint) -> bool {
        let size = [
            footprint.padded_extent(0, cells[0]),
            footprint.padded_extent(1, cells[1]),
        ];
        let reallocated = self.data.is_empty() || size != self.size;
        if reallocated {
            log::debug!(
                "halo buffer reallocated: {:?} -> {:?} for footprint {:?}",
                self.size,
                size,
                footprint
            );
            self.data = vec![0.0; size[0] * size[1]];
            self.size = size;
        }
        self.cells = cells;
        self.footprint = footprint;
        self.row_size = size[0];
        self.base_offset =
            -(footprint.start[0] as isize) - footprint.start[1] as isize * self.row_size as isize;
        reallocated
    }

    /// Padded extent `[width, height]`.
    #[inline]
    pub fn size(&self) -> [usize; 2] {
        self.size
    }

    /// Interior extent.
    #[inline]
    pub fn cells(&self) -> [usize; 2] {
        self.cells
    }

    #[inline]
    pub fn footprint(&self) -> &StencilFootprint {
        &self.footprint
    }

    /// Slot of `(0, 0)` in the flat buffer.
    #[inline]
    pub fn base_offset(&self) -> isize {
        self.base_offset
    }

    /// Address of the storage, stable until the next reallocation.
    #[inline]
    pub fn as_ptr(&self) -> *const Real {
        self.data.as_ptr()
    }

    /// Valid `x` coordinates.
    #[inline]
    pub fn x_range(&self) -> std::ops::Range<i32> {
        self.footprint.start[0]..self.cells[0] as i32 + self.footprint.end[0] - 1
    }

    /// Valid `y` coordinates.
    #[inline]
    pub fn y_range(&self) -> std::ops::Range<i32> {
        self.footprint.start[1]..self.cells[1] as i32 + self.footprint.end[1] - 1
    }

    /// Whether `(ix, iy)` addresses a slot of the buffer.
    #[inline]
    pub fn contains(&self, ix: i32, iy: i32) -> bool {
        self.x_range().contains(&ix) && self.y_range().contains(&iy)
    }

    /// Flat slot of `(ix, iy)`; panics outside the window, where the flat
    /// offset would alias a neighboring row.
    #[inline]
    fn slot(&self, ix: i32, iy: i32) -> usize {
        assert!(
            self.contains(ix, iy),
            "halo access ({ix}, {iy}) outside {:?} x {:?}",
            self.x_range(),
            self.y_range()
        );
        (self.base_offset + ix as isize + iy as isize * self.row_size as isize) as usize
    }

    #[inline]
    pub fn get(&self, ix: i32, iy: i32) -> Real {
        self.data[self.slot(ix, iy)]
    }

    #[inline]
    pub fn set(&mut self, ix: i32, iy: i32, value: Real) {
        let slot = self.slot(ix, iy);
        self.data[slot] = value;
    }

    /// Interior cells of row `iy`, `0 <= iy < ny`.
    #[inline]
    pub fn interior_row_mut(&mut self, iy: usize) -> &mut [Real] {
        let start = self.slot(0, iy as i32);
        &mut self.data[start..start + self.cells[0]]
    }
}

impl HaloRead for HaloBuffer {
    #[inline]
    fn at(&self, ix: i32, iy: i32) -> Real {
        self.get(ix, iy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_offset_maps_negative_coordinates() {
        let fp = StencilFootprint::symmetric(2);
        let buf = HaloBuffer::from_fn([4, 3], fp, |ix, iy| (ix * 100 + iy) as Real);
        assert_eq!(buf.size(), [8, 7]);
        assert_eq!(buf.base_offset(), 2 + 2 * 8);
        assert_eq!(buf.get(-2, -2), -202.0);
        assert_eq!(buf.get(5, 4), 504.0);
        assert_eq!(buf.at(0, 0), 0.0);
    }

    #[test]
    fn reshape_reuses_storage_for_same_size() {
        let mut buf = HaloBuffer::new();
        assert!(buf.reshape([4, 4], StencilFootprint::symmetric(1)));
        let ptr = buf.as_ptr();
        assert!(!buf.reshape([4, 4], StencilFootprint::symmetric(1)));
        assert_eq!(buf.as_ptr(), ptr);

        // same padded size, shifted window: no reallocation, new base offset
        let shifted = StencilFootprint::try_new([-2, 0], [1, 3]).unwrap();
        assert!(!buf.reshape([4, 4], shifted));
        assert_eq!(buf.base_offset(), 2);

        assert!(buf.reshape([4, 4], StencilFootprint::symmetric(2)));
        assert_eq!(buf.size(), [8, 8]);
        assert_eq!(buf.base_offset(), 2 + 2 * 8);
    }

    #[test]
    fn interior_row_is_contiguous() {
        let mut buf = HaloBuffer::new();
        buf.reshape([3, 2], StencilFootprint::symmetric(1));
        buf.interior_row_mut(1).copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(buf.get(0, 1), 1.0);
        assert_eq!(buf.get(2, 1), 3.0);
        assert_eq!(buf.get(-1, 1), 0.0);
    }

    #[test]
    #[should_panic(expected = "halo access")]
    fn out_of_window_read_panics() {
        let buf = HaloBuffer::from_fn([2, 2], StencilFootprint::symmetric(1), |_, _| 0.0);
        let _ = buf.get(-2, 0);
    }

    #[test]
    #[should_panic(expected = "halo access (3, 0)")]
    fn read_past_row_end_does_not_wrap() {
        // the flat slot of (3, 0) is the slot of (-1, 1)
        let buf = HaloBuffer::from_fn([2, 2], StencilFootprint::symmetric(1), |ix, iy| {
            (ix + 10 * iy) as Real
        });
        assert_eq!(buf.get(-1, 1), 9.0);
        let _ = buf.get(3, 0);
    }
}

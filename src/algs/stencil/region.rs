//! Region tables: which formula applies to which cells along one axis.
//!
//! A block that touches a domain edge cannot read ghosts beyond it, so the
//! cells next to that edge use one-sided formulas. The split depends only on
//! the block's position, so it is computed once per block and axis and every
//! region is then swept with a single formula.

use std::ops::Range;

use crate::Real;

/// Stencil taps as `(offset, coefficient)` pairs along the derivative axis.
pub type Taps = &'static [(i32, Real)];

/// Cells `range` along the axis, evaluated with `taps`.
#[derive(Clone, Debug, PartialEq)]
pub struct StencilRegion {
    pub range: Range<usize>,
    pub taps: Taps,
}

impl StencilRegion {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Ordered regions covering `0..n` along one axis.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionTable<const N: usize> {
    regions: [StencilRegion; N],
}

impl<const N: usize> RegionTable<N> {
    /// All regions, including empty ones.
    #[inline]
    pub fn regions(&self) -> &[StencilRegion; N] {
        &self.regions
    }

    /// Non-empty regions in axis order.
    pub fn active(&self) -> impl Iterator<Item = &StencilRegion> {
        self.regions.iter().filter(|r| !r.is_empty())
    }

    /// Total number of cells covered.
    pub fn covered(&self) -> usize {
        self.regions.iter().map(|r| r.range.len()).sum()
    }
}

/// Second-order split: one one-sided cell at each touched edge.
///
/// `[(0, low), (low, n - high), (n - high, n)]` with `low`/`high` being `1`
/// when the block touches that edge.
pub fn order2_regions(
    n: usize,
    touching_low: bool,
    touching_high: bool,
    taps: [Taps; 3],
) -> RegionTable<3> {
    let low = usize::from(touching_low);
    let high = n - usize::from(touching_high);
    let [t_low, t_center, t_high] = taps;
    RegionTable {
        regions: [
            StencilRegion { range: 0..low, taps: t_low },
            StencilRegion { range: low..high, taps: t_center },
            StencilRegion { range: high..n, taps: t_high },
        ],
    }
}

/// Fourth-order split: two one-sided cells at each touched edge.
///
/// Without any touched edge every cell is centered and the four edge regions
/// are empty.
pub fn order4_regions(
    n: usize,
    touching_low: bool,
    touching_high: bool,
    taps: [Taps; 5],
) -> RegionTable<5> {
    let [t0, t1, t_center, t3, t4] = taps;
    let (lo, hi) = (if touching_low { 2 } else { 0 }, if touching_high { n - 2 } else { n });
    let edge = |on: bool, r: Range<usize>| if on { r } else { 0..0 };
    RegionTable {
        regions: [
            StencilRegion { range: edge(touching_low, 0..1), taps: t0 },
            StencilRegion { range: edge(touching_low, 1..2), taps: t1 },
            StencilRegion { range: lo..hi, taps: t_center },
            StencilRegion { range: edge(touching_high, n - 2..n - 1), taps: t3 },
            StencilRegion { range: edge(touching_high, n - 1..n), taps: t4 },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Taps = &[(0, 1.0)];
    const B: Taps = &[(0, 2.0)];
    const C: Taps = &[(0, 3.0)];

    #[test]
    fn order2_interior_block_is_all_centered() {
        let t = order2_regions(8, false, false, [A, B, C]);
        let active: Vec<_> = t.active().collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].range, 0..8);
        assert_eq!(active[0].taps, B);
    }

    #[test]
    fn order2_both_edges() {
        let t = order2_regions(8, true, true, [A, B, C]);
        let ranges: Vec<_> = t.regions().iter().map(|r| r.range.clone()).collect();
        assert_eq!(ranges, vec![0..1, 1..7, 7..8]);
        assert_eq!(t.covered(), 8);
    }

    #[test]
    fn order4_edges_are_independent() {
        let taps = [A, A, B, C, C];
        let low = order4_regions(8, true, false, taps);
        let ranges: Vec<_> = low.active().map(|r| r.range.clone()).collect();
        assert_eq!(ranges, vec![0..1, 1..2, 2..8]);

        let high = order4_regions(8, false, true, taps);
        let ranges: Vec<_> = high.active().map(|r| r.range.clone()).collect();
        assert_eq!(ranges, vec![0..6, 6..7, 7..8]);

        let both = order4_regions(5, true, true, taps);
        assert_eq!(both.covered(), 5);
        assert_eq!(both.regions()[2].range, 2..3);
    }
}

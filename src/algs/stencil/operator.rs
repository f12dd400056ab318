//! Finite-difference derivative operators over a halo-aware accessor.
//!
//! An operator reads a padded field through [`HaloRead`] and streams one
//! derivative value per interior cell into a [`Sink`]. Centered differences
//! read ghosts on both sides; blocks that touch a domain edge switch to
//! one-sided formulas there, so an operator never reads ghosts beyond the
//! physical boundary.
//!
//! | order | footprint          | one-sided cells per edge | scale    |
//! |-------|--------------------|--------------------------|----------|
//! | 2     | `[-1,-1]..[2,2]`   | 1                        | `1/(2h)` |
//! | 4     | `[-2,-2]..[3,3]`   | 2                        | `1/(12h)`|

use serde::{Deserialize, Serialize};

use crate::Real;
use crate::algs::stencil::region::{RegionTable, StencilRegion, Taps, order2_regions, order4_regions};
use crate::algs::stencil::sink::Sink;
use crate::data::block::BlockShape;
use crate::data::halo::HaloRead;
use crate::topology::axis::Axis;
use crate::topology::block_info::BlockInfo;
use crate::topology::footprint::StencilFootprint;

/// A directional finite-difference scheme.
pub trait FiniteDifference {
    /// Halo the scheme reads.
    fn footprint(&self) -> StencilFootprint;

    /// One-sided cells at each touched edge.
    fn edge_zone(&self) -> usize;

    /// Smallest extent of a block touching both edges of an axis.
    ///
    /// The first one-sided formula then reaches `2 * edge_zone` cells inward.
    fn min_block_extent(&self) -> usize {
        2 * self.edge_zone() + 1
    }

    /// Smallest extent along an axis for a block touching the given edges.
    ///
    /// A block touching one edge reads past its far side through ghosts, so
    /// it only has to exceed the edge zone.
    fn required_extent(&self, touching_low: bool, touching_high: bool) -> usize {
        match (touching_low, touching_high) {
            (true, true) => self.min_block_extent(),
            (false, false) => 1,
            _ => self.edge_zone() + 1,
        }
    }

    /// Derivative of `field` along `axis` for every interior cell of a block.
    fn derivative<L, K>(&self, field: &L, info: &BlockInfo, shape: BlockShape, axis: Axis, sink: &mut K)
    where
        L: HaloRead + ?Sized,
        K: Sink + ?Sized;
}

/// Second-order scheme: centered `(f(+1) - f(-1)) / 2h`, one-sided at edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Order2;

impl Order2 {
    const LOW: Taps = &[(0, -3.0), (1, 4.0), (2, -1.0)];
    const CENTER: Taps = &[(-1, -1.0), (1, 1.0)];
    const HIGH: Taps = &[(0, 3.0), (-1, -4.0), (-2, 1.0)];

    /// Regions along an axis of `n` cells.
    pub fn regions(n: usize, touching_low: bool, touching_high: bool) -> RegionTable<3> {
        order2_regions(n, touching_low, touching_high, [Self::LOW, Self::CENTER, Self::HIGH])
    }
}

impl FiniteDifference for Order2 {
    fn footprint(&self) -> StencilFootprint {
        StencilFootprint::symmetric(1)
    }

    fn edge_zone(&self) -> usize {
        1
    }

    fn derivative<L, K>(&self, field: &L, info: &BlockInfo, shape: BlockShape, axis: Axis, sink: &mut K)
    where
        L: HaloRead + ?Sized,
        K: Sink + ?Sized,
    {
        let n = shape.cells()[axis.index()];
        let (low, high) = (info.touching_low(axis), info.touching_high(axis));
        debug_assert!(
            n >= self.required_extent(low, high),
            "block extent {n} too small for order 2 edge formulas"
        );
        let table = Self::regions(n, low, high);
        let factor = 0.5 / info.spacing(axis);
        sweep_regions(field, shape, axis, table.active(), factor, sink);
    }
}

/// Fourth-order scheme: centered five-point formula, two one-sided cells at
/// each touched edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Order4;

impl Order4 {
    const LOW0: Taps = &[(0, -25.0), (1, 48.0), (2, -36.0), (3, 16.0), (4, -3.0)];
    const LOW1: Taps = &[(-1, -3.0), (0, -10.0), (1, 18.0), (2, -6.0), (3, 1.0)];
    const CENTER: Taps = &[(-2, 1.0), (-1, -8.0), (1, 8.0), (2, -1.0)];
    const HIGH1: Taps = &[(-3, -1.0), (-2, 6.0), (-1, -18.0), (0, 10.0), (1, 3.0)];
    const HIGH0: Taps = &[(-4, 3.0), (-3, -16.0), (-2, 36.0), (-1, -48.0), (0, 25.0)];

    /// Regions along an axis of `n` cells.
    pub fn regions(n: usize, touching_low: bool, touching_high: bool) -> RegionTable<5> {
        order4_regions(
            n,
            touching_low,
            touching_high,
            [Self::LOW0, Self::LOW1, Self::CENTER, Self::HIGH1, Self::HIGH0],
        )
    }
}

impl FiniteDifference for Order4 {
    fn footprint(&self) -> StencilFootprint {
        StencilFootprint::symmetric(2)
    }

    fn edge_zone(&self) -> usize {
        2
    }

    fn derivative<L, K>(&self, field: &L, info: &BlockInfo, shape: BlockShape, axis: Axis, sink: &mut K)
    where
        L: HaloRead + ?Sized,
        K: Sink + ?Sized,
    {
        let n = shape.cells()[axis.index()];
        let (low, high) = (info.touching_low(axis), info.touching_high(axis));
        debug_assert!(
            n >= self.required_extent(low, high),
            "block extent {n} too small for order 4 edge formulas"
        );
        let table = Self::regions(n, low, high);
        let factor = 1.0 / (12.0 * info.spacing(axis));
        sweep_regions(field, shape, axis, table.active(), factor, sink);
    }
}

/// Evaluate every region with its taps; `y` outer, `x` inner.
fn sweep_regions<'t, L, K>(
    field: &L,
    shape: BlockShape,
    axis: Axis,
    regions: impl Iterator<Item = &'t StencilRegion>,
    factor: Real,
    sink: &mut K,
) where
    L: HaloRead + ?Sized,
    K: Sink + ?Sized,
{
    for region in regions {
        let (xs, ys) = match axis {
            Axis::X => (region.range.clone(), 0..shape.ny),
            Axis::Y => (0..shape.nx, region.range.clone()),
        };
        for iy in ys {
            for ix in xs.clone() {
                let mut acc = 0.0;
                for &(offset, coeff) in region.taps {
                    let (x, y) = axis.shift(ix as i32, iy as i32, offset);
                    acc += coeff * field.at(x, y);
                }
                sink.stream(ix, iy, factor * acc);
            }
        }
    }
}

/// Runtime tag selecting a scheme, e.g. from configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StencilOrder {
    #[default]
    Order2,
    Order4,
}

impl FiniteDifference for StencilOrder {
    fn footprint(&self) -> StencilFootprint {
        match self {
            StencilOrder::Order2 => Order2.footprint(),
            StencilOrder::Order4 => Order4.footprint(),
        }
    }

    fn edge_zone(&self) -> usize {
        match self {
            StencilOrder::Order2 => Order2.edge_zone(),
            StencilOrder::Order4 => Order4.edge_zone(),
        }
    }

    #[inline]
    fn derivative<L, K>(&self, field: &L, info: &BlockInfo, shape: BlockShape, axis: Axis, sink: &mut K)
    where
        L: HaloRead + ?Sized,
        K: Sink + ?Sized,
    {
        match self {
            StencilOrder::Order2 => Order2.derivative(field, info, shape, axis, sink),
            StencilOrder::Order4 => Order4.derivative(field, info, shape, axis, sink),
        }
    }
}

/// `∂f/∂x` with scheme `op`.
pub fn dfdx<D, L, K>(op: &D, field: &L, info: &BlockInfo, shape: BlockShape, sink: &mut K)
where
    D: FiniteDifference + ?Sized,
    L: HaloRead + ?Sized,
    K: Sink + ?Sized,
{
    op.derivative(field, info, shape, Axis::X, sink);
}

/// `∂f/∂y` with scheme `op`.
pub fn dfdy<D, L, K>(op: &D, field: &L, info: &BlockInfo, shape: BlockShape, sink: &mut K)
where
    D: FiniteDifference + ?Sized,
    L: HaloRead + ?Sized,
    K: Sink + ?Sized,
{
    op.derivative(field, info, shape, Axis::Y, sink);
}

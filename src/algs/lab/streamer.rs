//! Streaming policies: how a lab turns a stored element into a scalar.
//!
//! The lab is generic over the element type; a [`Streamer`] selects the
//! scalar it works on (one velocity component, a pressure, a value
//! interpolated to the target time, ...).

use crate::Real;
use crate::data::block::Components;

/// Read one scalar out of an element at a target time.
pub trait Streamer<E> {
    fn operate(&self, element: &E, time: Real) -> Real;
}

/// Component `C` of a multi-component element, ignoring time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Component<const C: usize>;

/// The scalar of single-component elements.
pub type Scalar = Component<0>;

impl<E: Components, const C: usize> Streamer<E> for Component<C> {
    #[inline]
    fn operate(&self, element: &E, _time: Real) -> Real {
        element.component(C)
    }
}

/// Closure-backed streamer, e.g. for time interpolation between two stored
/// states of an element.
#[derive(Copy, Clone, Debug)]
pub struct FnStreamer<F>(pub F);

impl<E, F> Streamer<E> for FnStreamer<F>
where
    F: Fn(&E, Real) -> Real,
{
    #[inline]
    fn operate(&self, element: &E, time: Real) -> Real {
        (self.0)(element, time)
    }
}

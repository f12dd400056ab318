//! Directional finite-difference operators and their output sinks.

pub mod operator;
pub mod region;
pub mod sink;

pub use operator::{FiniteDifference, Order2, Order4, StencilOrder, dfdx, dfdy};
pub use region::{RegionTable, StencilRegion, Taps};
pub use sink::{BlockSink, RawSink, Sink, StreamPolicy};

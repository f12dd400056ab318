//! Output sinks for derivative values.

use serde::{Deserialize, Serialize};

use crate::Real;
use crate::data::block::{Block, BlockShape, Components};
use crate::mesh_error::MeshError;

/// How a computed value is combined with what the output already holds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamPolicy {
    /// Overwrite.
    #[default]
    Assign,
    /// Add to the existing value, e.g. to build a divergence from two
    /// directional derivatives.
    Accumulate,
}

impl StreamPolicy {
    #[inline]
    pub fn apply(self, slot: &mut Real, value: Real) {
        match self {
            StreamPolicy::Assign => *slot = value,
            StreamPolicy::Accumulate => *slot += value,
        }
    }
}

/// Destination of per-cell derivative values.
pub trait Sink {
    /// Deliver `value` for interior cell `(ix, iy)`.
    fn stream(&mut self, ix: usize, iy: usize, value: Real);
}

/// Writes into component `component` of an output block.
#[derive(Debug)]
pub struct BlockSink<'b, E> {
    block: &'b mut Block<E>,
    component: usize,
    policy: StreamPolicy,
}

impl<'b, E: Components> BlockSink<'b, E> {
    pub fn new(block: &'b mut Block<E>, component: usize, policy: StreamPolicy) -> Self {
        debug_assert!(
            component < E::COUNT,
            "component {component} out of range for {} components",
            E::COUNT
        );
        Self {
            block,
            component,
            policy,
        }
    }
}

impl<E: Components> Sink for BlockSink<'_, E> {
    #[inline]
    fn stream(&mut self, ix: usize, iy: usize, value: Real) {
        let slot = self.block[(ix, iy)].component_mut(self.component);
        self.policy.apply(slot, value);
    }
}

/// Writes into a flat row-major `nx * ny` array.
#[derive(Debug)]
pub struct RawSink<'b> {
    data: &'b mut [Real],
    shape: BlockShape,
    policy: StreamPolicy,
}

impl<'b> RawSink<'b> {
    /// Wrap `data`, which must hold exactly one value per cell of `shape`.
    pub fn try_new(
        data: &'b mut [Real],
        shape: BlockShape,
        policy: StreamPolicy,
    ) -> Result<Self, MeshError> {
        if data.len() != shape.len() {
            return Err(MeshError::OutputLengthMismatch {
                expected: shape.len(),
                found: data.len(),
            });
        }
        Ok(Self {
            data,
            shape,
            policy,
        })
    }
}

impl Sink for RawSink<'_> {
    #[inline]
    fn stream(&mut self, ix: usize, iy: usize, value: Real) {
        let i = self.shape.flat(ix, iy);
        self.policy.apply(&mut self.data[i], value);
    }
}

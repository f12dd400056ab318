//! Run configuration for labs and stencil sweeps.
//!
//! `LabConfig` is plain serde data so a driver can read it from JSON, TOML or
//! any other format; `validate` checks it against the stencil before any block
//! is allocated.

use serde::{Deserialize, Serialize};

use crate::algs::stencil::{FiniteDifference, StencilOrder, StreamPolicy};
use crate::data::block::BlockShape;
use crate::mesh_error::MeshError;
use crate::topology::footprint::StencilFootprint;

/// Block shape, stencil order and output policy of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabConfig {
    pub shape: BlockShape,
    #[serde(default)]
    pub order: StencilOrder,
    #[serde(default)]
    pub policy: StreamPolicy,
}

impl LabConfig {
    pub fn new(shape: BlockShape, order: StencilOrder) -> Self {
        Self {
            shape,
            order,
            policy: StreamPolicy::Assign,
        }
    }

    /// Footprint the lab must be prepared with.
    pub fn footprint(&self) -> StencilFootprint {
        self.order.footprint()
    }

    /// Reject blocks too narrow for the stencil's one-sided edge zones.
    ///
    /// Checks a block touching one domain edge per axis, which covers every
    /// block of a refined grid. A single block spanning the whole domain
    /// needs [`FiniteDifference::min_block_extent`] cells instead.
    pub fn validate(&self) -> Result<(), MeshError> {
        let required = self.order.required_extent(true, false);
        for (axis, extent) in self.shape.cells().into_iter().enumerate() {
            if extent < required {
                return Err(MeshError::BlockTooSmall {
                    axis,
                    extent,
                    required,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order4_needs_more_than_its_edge_zone() {
        let cfg = LabConfig::new(BlockShape::new(8, 2), StencilOrder::Order4);
        assert_eq!(
            cfg.validate(),
            Err(MeshError::BlockTooSmall {
                axis: 1,
                extent: 2,
                required: 3
            })
        );
        let cfg = LabConfig::new(BlockShape::new(4, 4), StencilOrder::Order4);
        assert!(cfg.validate().is_ok());
        let cfg = LabConfig::new(BlockShape::new(1, 4), StencilOrder::Order2);
        assert!(cfg.validate().is_err());
        let cfg = LabConfig::new(BlockShape::new(2, 2), StencilOrder::Order2);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.footprint(), StencilFootprint::symmetric(1));
    }
}

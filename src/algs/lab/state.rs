//! Lifecycle of a lab.

use crate::mesh_error::MeshError;

/// Lifecycle tag of a [`ScalarBlockLab`](super::ScalarBlockLab).
///
/// ```text
/// Uninitialized --prepare--> Prepared --begin_step--> ReadyToLoad --load--> Loaded
///                               ^                                             |
///                               +------------------prepare--------------------+
///                                            Loaded --begin_step--> ReadyToLoad
///                                            Loaded --load--> Loaded
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LabState {
    #[default]
    Uninitialized,
    Prepared,
    ReadyToLoad,
    Loaded,
}

impl LabState {
    pub const fn name(self) -> &'static str {
        match self {
            LabState::Uninitialized => "Uninitialized",
            LabState::Prepared => "Prepared",
            LabState::ReadyToLoad => "ReadyToLoad",
            LabState::Loaded => "Loaded",
        }
    }

    /// Fail with `InvalidLabState` unless `self` is one of `allowed`.
    #[inline]
    pub fn require(self, op: &'static str, allowed: &[LabState]) -> Result<(), MeshError> {
        if allowed.contains(&self) {
            Ok(())
        } else {
            Err(MeshError::InvalidLabState {
                op,
                state: self.name(),
            })
        }
    }
}

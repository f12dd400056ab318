//! `BlockId`: a strong, zero-cost handle for grid blocks
//!
//! Every block of the refinement hierarchy is addressed by an opaque integer
//! handed out by the block storage. `BlockId` wraps that integer so it cannot
//! be confused with cell indices or refinement levels.

use std::fmt;

/// Identifier of one block instance in the block collection.
///
/// # Memory layout
/// This type is `repr(transparent)` over `u32`, so batches of ids can be
/// sorted and deduplicated as plain integers.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    /// Creates a new `BlockId` from a raw value.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use block_halo::topology::block_id::BlockId;
    /// let b = BlockId::new(3);
    /// assert_eq!(b.get(), 3);
    /// ```
    #[inline]
    pub const fn new(raw: u32) -> Self {
        BlockId(raw)
    }

    /// Returns the inner `u32` value of this `BlockId`.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for BlockId {
    #[inline]
    fn from(raw: u32) -> Self {
        BlockId(raw)
    }
}

// -----------------------------------------------------------------------------
// Formatting traits
// -----------------------------------------------------------------------------

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BlockId").field(&self.0).finish()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_debug() {
        let b = BlockId::new(42);
        assert_eq!(format!("{}", b), "42");
        assert_eq!(format!("{:?}", b), "BlockId(42)");
    }

    #[test]
    fn ordering_follows_raw_value() {
        let mut ids = vec![BlockId::new(5), BlockId::new(1), BlockId::new(3)];
        ids.sort();
        assert_eq!(ids, vec![BlockId::new(1), BlockId::new(3), BlockId::new(5)]);
    }
}

//! Grow-only scratch buffers reused across loads.

use crate::Real;

/// Capacity-tracked scratch buffer.
///
/// [`ensure_capacity`](Self::ensure_capacity) grows the buffer when a load
/// needs more room and never shrinks it, so a worker that cycles over blocks
/// settles on the largest dependency count and stops allocating.
#[derive(Debug, Default)]
pub struct ScratchPool {
    data: Vec<Real>,
}

impl ScratchPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make room for at least `n` values. Returns whether storage grew.
    pub fn ensure_capacity(&mut self, n: usize) -> bool {
        if n <= self.data.len() {
            return false;
        }
        log::debug!("scratch pool grows {} -> {}", self.data.len(), n);
        self.data = vec![0.0; n];
        true
    }

    /// Current capacity in values.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// First `n` values.
    #[inline]
    pub fn head(&self, n: usize) -> &[Real] {
        &self.data[..n]
    }

    /// First `n` values, mutably.
    #[inline]
    pub fn head_mut(&mut self, n: usize) -> &mut [Real] {
        &mut self.data[..n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_monotonically() {
        let mut pool = ScratchPool::new();
        assert!(pool.ensure_capacity(8));
        assert!(!pool.ensure_capacity(4));
        assert_eq!(pool.capacity(), 8);
        assert!(pool.ensure_capacity(16));
        assert!(!pool.ensure_capacity(16));
        assert_eq!(pool.capacity(), 16);
    }

    #[test]
    fn zero_capacity_never_allocates() {
        let mut pool = ScratchPool::new();
        assert!(!pool.ensure_capacity(0));
        assert!(pool.head(0).is_empty());
    }
}

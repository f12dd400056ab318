//! BlockCollection: shared, identifier-locked block storage.
//!
//! Workers lock only the blocks they need and release them as soon as the
//! data is copied out. Locks are scoped guards, so every exit path releases
//! them. A batch lock acquires its ids in ascending order; combined with the
//! single-id locks this keeps two workers from deadlocking on a shared
//! dependency.

use std::collections::HashMap;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::data::block::{Block, BlockShape};
use crate::mesh_error::MeshError;
use crate::topology::block_id::BlockId;

/// Keyed store of equally shaped blocks.
#[derive(Debug)]
pub struct BlockCollection<E> {
    shape: BlockShape,
    blocks: HashMap<BlockId, RwLock<Block<E>>>,
}

/// Shared lock on one block; released on drop.
pub type BlockRef<'a, E> = RwLockReadGuard<'a, Block<E>>;

/// Exclusive lock on one block; released on drop.
pub type BlockMut<'a, E> = RwLockWriteGuard<'a, Block<E>>;

impl<E> BlockCollection<E> {
    /// Empty collection for blocks of `shape`.
    pub fn new(shape: BlockShape) -> Self {
        Self {
            shape,
            blocks: HashMap::new(),
        }
    }

    /// Shape shared by every block.
    #[inline]
    pub fn shape(&self) -> BlockShape {
        self.shape
    }

    /// Add a block under `id`.
    ///
    /// # Errors
    /// `BlockShapeMismatch` for a block of another shape, `DuplicateBlock` if
    /// `id` is taken.
    pub fn insert(&mut self, id: BlockId, block: Block<E>) -> Result<(), MeshError> {
        if block.shape() != self.shape {
            return Err(MeshError::BlockShapeMismatch {
                expected: self.shape.cells(),
                found: block.shape().cells(),
            });
        }
        if self.blocks.contains_key(&id) {
            return Err(MeshError::DuplicateBlock(id));
        }
        self.blocks.insert(id, RwLock::new(block));
        Ok(())
    }

    /// Remove and return the block stored under `id`.
    pub fn remove(&mut self, id: BlockId) -> Option<Block<E>> {
        self.blocks.remove(&id).map(RwLock::into_inner)
    }

    #[inline]
    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Stored ids in ascending order.
    pub fn ids(&self) -> Vec<BlockId> {
        let mut ids: Vec<_> = self.blocks.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn entry(&self, id: BlockId) -> Result<&RwLock<Block<E>>, MeshError> {
        self.blocks.get(&id).ok_or(MeshError::MissingBlock(id))
    }

    /// Shared lock on one block.
    pub fn lock(&self, id: BlockId) -> Result<BlockRef<'_, E>, MeshError> {
        Ok(self.entry(id)?.read())
    }

    /// Exclusive lock on one block, for writing results.
    pub fn lock_mut(&self, id: BlockId) -> Result<BlockMut<'_, E>, MeshError> {
        Ok(self.entry(id)?.write())
    }

    /// Shared lock on a batch of blocks.
    ///
    /// Ids may repeat and come in any order; each block is locked once, in
    /// ascending id order. Every id is resolved before the first lock is
    /// taken, so a missing id fails without holding anything.
    pub fn lock_many(&self, ids: &[BlockId]) -> Result<BlockBatch<'_, E>, MeshError> {
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let entries = sorted
            .iter()
            .map(|&id| self.entry(id))
            .collect::<Result<Vec<_>, _>>()?;
        let guards = entries.into_iter().map(RwLock::read).collect();
        Ok(BlockBatch {
            ids: sorted,
            guards,
        })
    }

    /// Exclusive access without locking, for single-owner setup phases.
    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block<E>> {
        self.blocks.get_mut(&id).map(RwLock::get_mut)
    }
}

/// Shared locks on a sorted, deduplicated batch of blocks.
pub struct BlockBatch<'a, E> {
    ids: Vec<BlockId>,
    guards: Vec<RwLockReadGuard<'a, Block<E>>>,
}

impl<E> BlockBatch<'_, E> {
    /// Locked block `id`, if part of the batch.
    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&Block<E>> {
        self.ids
            .binary_search(&id)
            .ok()
            .map(|slot| &*self.guards[slot])
    }

    /// Ids held by the batch, ascending.
    #[inline]
    pub fn ids(&self) -> &[BlockId] {
        &self.ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

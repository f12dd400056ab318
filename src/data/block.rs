//! Block: fixed-size 2D tile of field elements.
//!
//! Cells are stored row-major, so cell `(ix, iy)` lives at flat index
//! `ix + iy * nx`. Point indices in boundary metadata use the same layout.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::Real;

/// Interior extent of every block in a collection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockShape {
    pub nx: usize,
    pub ny: usize,
}

impl BlockShape {
    pub const fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny }
    }

    /// Number of cells per block.
    #[inline]
    pub const fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Whether the shape has no cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extent as `[nx, ny]`.
    #[inline]
    pub const fn cells(&self) -> [usize; 2] {
        [self.nx, self.ny]
    }

    /// Row-major flat index of `(ix, iy)`.
    #[inline]
    pub const fn flat(&self, ix: usize, iy: usize) -> usize {
        ix + iy * self.nx
    }
}

/// Element with one or more scalar components.
///
/// Output blocks of a derivative hold multi-component elements (e.g. the
/// gradient of a velocity field); a sink writes into one component at a time.
pub trait Components {
    /// Number of scalar components.
    const COUNT: usize;

    /// Read component `c`.
    fn component(&self, c: usize) -> Real;

    /// Mutable access to component `c`.
    fn component_mut(&mut self, c: usize) -> &mut Real;
}

impl Components for Real {
    const COUNT: usize = 1;

    #[inline]
    fn component(&self, c: usize) -> Real {
        debug_assert_eq!(c, 0);
        *self
    }

    #[inline]
    fn component_mut(&mut self, c: usize) -> &mut Real {
        debug_assert_eq!(c, 0);
        self
    }
}

impl<const N: usize> Components for [Real; N] {
    const COUNT: usize = N;

    #[inline]
    fn component(&self, c: usize) -> Real {
        self[c]
    }

    #[inline]
    fn component_mut(&mut self, c: usize) -> &mut Real {
        &mut self[c]
    }
}

/// Fixed-size tile of elements owned by a [`BlockCollection`](crate::data::collection::BlockCollection).
#[derive(Clone, Debug, PartialEq)]
pub struct Block<E> {
    shape: BlockShape,
    data: Vec<E>,
}

impl<E: Clone + Default> Block<E> {
    /// Block filled with `E::default()`.
    pub fn new(shape: BlockShape) -> Self {
        Self::filled(shape, E::default())
    }
}

impl<E: Clone> Block<E> {
    /// Block with every cell set to `value`.
    pub fn filled(shape: BlockShape, value: E) -> Self {
        Self {
            shape,
            data: vec![value; shape.len()],
        }
    }
}

impl<E> Block<E> {
    /// Block whose cell `(ix, iy)` is `f(ix, iy)`.
    pub fn from_fn<F>(shape: BlockShape, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> E,
    {
        let mut data = Vec::with_capacity(shape.len());
        for iy in 0..shape.ny {
            for ix in 0..shape.nx {
                data.push(f(ix, iy));
            }
        }
        Self { shape, data }
    }

    #[inline]
    pub fn shape(&self) -> BlockShape {
        self.shape
    }

    /// Row-major cells.
    #[inline]
    pub fn as_slice(&self) -> &[E] {
        &self.data
    }

    /// Cell at flat index `i`, if inside the block.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&E> {
        self.data.get(i)
    }

    /// One row of cells.
    #[inline]
    pub fn row(&self, iy: usize) -> &[E] {
        let nx = self.shape.nx;
        &self.data[iy * nx..(iy + 1) * nx]
    }
}

impl<E> Index<(usize, usize)> for Block<E> {
    type Output = E;

    #[inline]
    fn index(&self, (ix, iy): (usize, usize)) -> &E {
        debug_assert!(ix < self.shape.nx && iy < self.shape.ny);
        &self.data[self.shape.flat(ix, iy)]
    }
}

impl<E> IndexMut<(usize, usize)> for Block<E> {
    #[inline]
    fn index_mut(&mut self, (ix, iy): (usize, usize)) -> &mut E {
        debug_assert!(ix < self.shape.nx && iy < self.shape.ny);
        let i = self.shape.flat(ix, iy);
        &mut self.data[i]
    }
}

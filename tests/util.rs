#![allow(dead_code)]
use block_halo::prelude::*;

pub fn bid(u: u32) -> BlockId {
    BlockId::new(u)
}

/// Collection of `ids`, block `id` filled by `f(id, ix, iy)`.
pub fn collection_from(
    shape: BlockShape,
    ids: &[u32],
    f: impl Fn(u32, usize, usize) -> Real,
) -> BlockCollection<Real> {
    let mut c = BlockCollection::new(shape);
    for &id in ids {
        c.insert(bid(id), Block::from_fn(shape, |ix, iy| f(id, ix, iy)))
            .unwrap();
    }
    c
}

/// Registry holding one descriptor for `target`, every ghost built by `f`.
pub fn boundary_with(
    target: u32,
    shape: BlockShape,
    fp: StencilFootprint,
    f: impl FnMut(block_halo::topology::Direction, i32, i32) -> Vec<(PointIndex, [Real; 2])>,
) -> BoundaryInfo {
    let desc = BoundaryInfoBlockBuilder::from_fn(shape.cells(), fp, f).unwrap();
    let boundary = BoundaryInfo::new(fp);
    boundary.insert(bid(target), desc).unwrap();
    boundary
}

/// Metadata of a block that touches no domain edge.
pub fn interior_info(id: u32, shape: BlockShape) -> BlockInfo {
    BlockInfo::unit_domain(bid(id), 2, [1, 2], shape.cells())
}

/// Lab prepared on `blocks`/`boundary`, ready to load.
pub fn ready_lab<'a>(
    blocks: &'a BlockCollection<Real>,
    boundary: &'a BoundaryInfo,
    fp: StencilFootprint,
) -> ScalarBlockLab<'a, Real, Scalar> {
    let mut lab = ScalarBlockLab::new(Scalar::default());
    lab.prepare(blocks, boundary, fp).unwrap();
    lab.begin_step(0.0).unwrap();
    lab
}

pub fn assert_close(got: Real, want: Real, tol: Real) {
    assert!(
        (got - want).abs() <= tol,
        "got {got}, want {want} (tol {tol})"
    );
}

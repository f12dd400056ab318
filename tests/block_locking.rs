mod util;

use std::sync::Arc;
use std::thread;

use block_halo::prelude::*;
use block_halo::topology::boundary::BoundaryGuard;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use util::*;

const SHAPE: BlockShape = BlockShape::new(3, 3);

#[test]
fn batch_lock_accepts_duplicates_in_any_order() {
    let blocks = collection_from(SHAPE, &[1, 4, 9], |id, _, _| id as Real);
    let batch = blocks.lock_many(&[bid(9), bid(1), bid(9), bid(4), bid(1)]).unwrap();
    assert_eq!(batch.ids(), &[bid(1), bid(4), bid(9)]);
    assert_eq!(batch.len(), 3);
    assert_eq!(batch.get(bid(4)).unwrap()[(2, 2)], 4.0);
    drop(batch);

    // released: writers get through
    for id in [1, 4, 9] {
        assert!(blocks.lock_mut(bid(id)).is_ok());
    }
}

#[test]
fn shuffled_batches_resolve_to_the_same_blocks() {
    let ids: Vec<u32> = (0..12).collect();
    let blocks = collection_from(SHAPE, &ids, |id, ix, iy| (id * 10) as Real + (ix + iy) as Real);
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..32 {
        let mut request: Vec<BlockId> = (0..rng.gen_range(1..20))
            .map(|_| bid(rng.gen_range(0..12)))
            .collect();
        request.shuffle(&mut rng);
        let batch = blocks.lock_many(&request).unwrap();
        assert!(batch.ids().windows(2).all(|w| w[0] < w[1]));
        for id in &request {
            assert_eq!(batch.get(*id).unwrap()[(0, 0)], (id.get() * 10) as Real);
        }
    }
}

#[test]
fn missing_id_in_batch_holds_no_lock() {
    let blocks = collection_from(SHAPE, &[0, 1], |_, _, _| 0.0);
    assert_eq!(
        blocks.lock_many(&[bid(0), bid(2), bid(1)]).err(),
        Some(MeshError::MissingBlock(bid(2)))
    );
    let _w0 = blocks.lock_mut(bid(0)).unwrap();
    let _w1 = blocks.lock_mut(bid(1)).unwrap();
}

#[test]
fn concurrent_labs_share_blocks_and_descriptors() {
    let fp = StencilFootprint::symmetric(1);
    let blocks = Arc::new(collection_from(SHAPE, &[0, 1, 2], |id, ix, iy| {
        (id as usize * 100 + iy * 3 + ix) as Real
    }));
    let boundary = Arc::new(BoundaryInfo::new(fp));
    for target in [0u32, 1, 2] {
        let src = (target + 1) % 3;
        let desc = BoundaryInfoBlockBuilder::from_fn(SHAPE.cells(), fp, |_, _, _| {
            vec![(PointIndex::new(bid(src), 4), [1.0, 1.0])]
        })
        .unwrap();
        boundary.insert(bid(target), desc).unwrap();
    }

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let blocks = Arc::clone(&blocks);
            let boundary = Arc::clone(&boundary);
            thread::spawn(move || {
                let mut lab = ready_lab(&blocks, &boundary, fp);
                for round in 0..50u32 {
                    let target = (worker + round) % 3;
                    lab.load(&interior_info(target, SHAPE)).unwrap();
                    let src = (target + 1) % 3;
                    assert_eq!(lab.read(-1, -1), (src * 100 + 4) as Real);
                    assert_eq!(lab.read(1, 1), (target * 100 + 4) as Real);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn descriptor_swap_waits_for_the_holder() {
    let fp = StencilFootprint::symmetric(1);
    let boundary = boundary_with(0, SHAPE, fp, |_, _, _| {
        vec![(PointIndex::new(bid(1), 0), [1.0, 1.0])]
    });
    let held: BoundaryGuard = boundary.lock(bid(0)).unwrap();

    // replacing the entry does not touch the locked descriptor
    let replacement = BoundaryInfoBlockBuilder::from_fn(SHAPE.cells(), fp, |_, _, _| {
        vec![(PointIndex::new(bid(2), 0), [1.0, 1.0])]
    })
    .unwrap();
    boundary.insert(bid(0), replacement).unwrap();
    assert_eq!(held.index_pool()[0].block_id, bid(1));
    drop(held);

    let fresh = boundary.lock(bid(0)).unwrap();
    assert_eq!(fresh.index_pool()[0].block_id, bid(2));
    assert_eq!(
        boundary.lookup(bid(5)).err(),
        Some(MeshError::MissingBoundaryInfo(bid(5)))
    );
}

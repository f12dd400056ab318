use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use block_halo::data::halo::HaloBuffer;
use block_halo::prelude::*;

fn bench_stencils(c: &mut Criterion) {
    let mut group = c.benchmark_group("stencil");

    for &cells in &[16usize, 64usize] {
        let shape = BlockShape::new(cells, cells);
        // a corner block exercises both one-sided and centered regions
        let info = BlockInfo::unit_domain(BlockId::new(0), 1, [0, 0], shape.cells());
        let mut out = vec![0.0; shape.len()];

        for order in [StencilOrder::Order2, StencilOrder::Order4] {
            let field = HaloBuffer::from_fn(shape.cells(), order.footprint(), |ix, iy| {
                let [x, y] = info.cell_center(ix, iy);
                x * x - y
            });
            for axis in Axis::ALL {
                group.bench_with_input(
                    BenchmarkId::new(format!("{order:?}_{axis:?}"), cells),
                    &cells,
                    |b, _| {
                        b.iter(|| {
                            let mut sink = RawSink::try_new(&mut out, shape, StreamPolicy::Assign)
                                .expect("sized output");
                            order.derivative(&field, &info, shape, axis, &mut sink);
                            black_box(out[0]);
                        });
                    },
                );
            }
        }
    }

    group.finish();
}

criterion_group!(benches, bench_stencils);
criterion_main!(benches);

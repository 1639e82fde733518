use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gridlife_core::*;
use std::hint::black_box;

const SIZES: [Coord; 3] = [50, 100, 200];

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    for size in SIZES {
        let grid = RandomGridGenerator::new(0xC0FFEE, 0.35).generate((size, size));
        for preset in Preset::ALL {
            let rules = preset.rules();
            group.bench_with_input(
                BenchmarkId::new(preset.name(), size),
                &grid,
                |b, grid| b.iter(|| step(black_box(grid), &rules)),
            );
        }
    }
    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint");
    for size in SIZES {
        let grid = RandomGridGenerator::new(0xC0FFEE, 0.35).generate((size, size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &grid, |b, grid| {
            b.iter(|| Fingerprint::of(black_box(grid)))
        });
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let runner = SimulationRunner::new(SimulationConfig::default());
    let soup = RandomGridGenerator::new(0xBEEF, 0.35).generate((100, 100));

    c.bench_function("run/100x100", |b| {
        b.iter(|| runner.run(black_box(soup.clone())))
    });
}

criterion_group!(benches, bench_step, bench_fingerprint, bench_run);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use em_fieldlines::fields::{generate_field, PointCharge};
use em_fieldlines::grid::generate_grid;
use em_fieldlines::render::StreamlineTracer;

fn ring_of_charges(n: usize) -> Vec<PointCharge> {
    (0..n)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / n as f64;
            let q = if i % 2 == 0 { 1.0 } else { -1.0 };
            PointCharge::new(2.0 * theta.cos(), 2.0 * theta.sin(), q)
        })
        .collect()
}

fn bench_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_field");
    let charges = ring_of_charges(8);
    for subdivisions in [100usize, 400] {
        let grid = generate_grid(5.0, subdivisions).expect("valid grid");
        group.bench_with_input(BenchmarkId::new("ring8", subdivisions), &grid, |b, grid| {
            b.iter(|| generate_field(black_box(&charges), grid, 1.0));
        });
    }
    group.finish();
}

fn bench_streamlines(c: &mut Criterion) {
    let grid = generate_grid(5.0, 200).expect("valid grid");
    let field = generate_field(&ring_of_charges(4), &grid, 1.0);
    c.bench_function("trace_density_7", |b| {
        b.iter(|| StreamlineTracer::new(7.0).trace(&grid, black_box(&field)));
    });
}

criterion_group!(benches, bench_field, bench_streamlines);
criterion_main!(benches);

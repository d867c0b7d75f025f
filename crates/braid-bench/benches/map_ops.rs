//! Criterion micro-benchmarks for mapper initialization and runs.

use braid_bench::{quad_mesh, raster, scattered_points};
use braid_map::{CellToPoint, KdTree, Mapper, PointToCell, PointToPoint};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// Benchmark: Build a k-d tree over 10K scattered points and query each once.
fn bench_kdtree_10k(c: &mut Criterion) {
    let cloud = scattered_points(10_000, 100.0, 42).unwrap();
    let coords = cloud.coordinates().to_vec();

    c.bench_function("kdtree_build_query_10k", |b| {
        b.iter(|| {
            let tree = KdTree::new(&coords);
            for p in 0..coords[0].len() {
                black_box(tree.nearest(&[coords[0][p] + 0.25, coords[1][p] - 0.25]));
            }
        });
    });
}

/// Benchmark: Initialize PointToPoint from a raster onto a quad mesh.
fn bench_point_to_point_init_10k(c: &mut Criterion) {
    let src = raster(100, 100).unwrap();
    let dst = quad_mesh(100, 100).unwrap();

    c.bench_function("point_to_point_init_10k", |b| {
        b.iter(|| {
            let mut mapper = PointToPoint::new();
            mapper.initialize(&dst, &src).unwrap();
            black_box(mapper.sizes());
        });
    });
}

/// Benchmark: Initialize CellToPoint for 10K scattered points over a raster.
fn bench_cell_to_point_init_10k(c: &mut Criterion) {
    let src = raster(101, 101).unwrap();
    let dst = scattered_points(10_000, 100.0, 7).unwrap();

    c.bench_function("cell_to_point_init_10k", |b| {
        b.iter(|| {
            let mut mapper = CellToPoint::new();
            mapper.initialize(&dst, &src).unwrap();
            black_box(mapper.sizes());
        });
    });
}

/// Benchmark: Run an initialized PointToCell (mean) over 10K points.
fn bench_point_to_cell_run_10k(c: &mut Criterion) {
    let dst = quad_mesh(101, 101).unwrap();
    let src = scattered_points(10_000, 100.0, 11).unwrap();
    let mut mapper = PointToCell::new();
    mapper.initialize(&dst, &src).unwrap();
    let values: Vec<f64> = (0..src.point_count()).map(|i| (i % 97) as f64).collect();
    let mut out = vec![0.0; dst.cell_count()];

    c.bench_function("point_to_cell_run_10k", |b| {
        b.iter(|| {
            mapper
                .run_into(black_box(&values), &mut out, -999.0)
                .unwrap();
            black_box(&out);
        });
    });
}

criterion_group!(
    benches,
    bench_kdtree_10k,
    bench_point_to_point_init_10k,
    bench_cell_to_point_init_10k,
    bench_point_to_cell_run_10k
);
criterion_main!(benches);

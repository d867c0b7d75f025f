//! Criterion micro-benchmarks for grid construction and queries.

use braid_bench::{quad_mesh, raster};
use braid_grid::{structured_connectivity, CornerOrder};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// Benchmark: Build the connectivity of a 100x100 node lattice.
fn bench_structured_connectivity_10k(c: &mut Criterion) {
    let shape: &[usize] = &[100, 100];

    c.bench_function("structured_connectivity_10k", |b| {
        b.iter(|| {
            let cells = structured_connectivity(black_box(shape), CornerOrder::Clockwise).unwrap();
            black_box(cells);
        });
    });
}

/// Benchmark: Construct a 100x100 raster (coordinates, connectivity, centroids).
fn bench_raster_construction_10k(c: &mut Criterion) {
    c.bench_function("raster_construction_10k", |b| {
        b.iter(|| {
            let grid = raster(black_box(100), black_box(100)).unwrap();
            black_box(grid.cell_centroids().len());
        });
    });
}

/// Benchmark: shared_cells() for every node of a 100x100 quad mesh.
fn bench_shared_cells_10k(c: &mut Criterion) {
    let mesh = quad_mesh(100, 100).unwrap();

    c.bench_function("shared_cells_10k", |b| {
        b.iter(|| {
            for p in 0..mesh.point_count() {
                black_box(mesh.shared_cells(p).unwrap());
            }
        });
    });
}

/// Benchmark: Point-in-cell tests for every cell centroid of a 100x100 mesh.
fn bench_contains_point_10k(c: &mut Criterion) {
    let mesh = quad_mesh(100, 100).unwrap();
    let centroids = mesh.cell_centroids().to_vec();

    c.bench_function("contains_point_10k", |b| {
        b.iter(|| {
            for cell in 0..mesh.cell_count() {
                let point = [centroids[0][cell], centroids[1][cell]];
                black_box(mesh.contains_point(&point, cell).unwrap());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_structured_connectivity_10k,
    bench_raster_construction_10k,
    bench_shared_cells_10k,
    bench_contains_point_10k
);
criterion_main!(benches);

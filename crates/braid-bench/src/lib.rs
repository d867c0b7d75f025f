//! Benchmark profiles for the Braid coupling framework.
//!
//! Pre-built grids shared by the criterion benches:
//!
//! - [`raster`]: unit-spaced 2-D raster
//! - [`quad_mesh`]: the same lattice as an unstructured quad mesh
//! - [`scattered_points`]: deterministic 2-D point cloud via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use braid_grid::{structured_connectivity, CornerOrder, GridError, GridTopology};

/// `rows × cols` nodes, unit spacing, origin at zero.
pub fn raster(rows: usize, cols: usize) -> Result<GridTopology, GridError> {
    GridTopology::raster(&[rows, cols], &[1.0, 1.0], &[0.0, 0.0])
}

/// `rows × cols` nodes meshed as unstructured quads.
///
/// Node ids and coordinates match [`raster`], so the two grids describe
/// the same lattice through different topology classes.
pub fn quad_mesh(rows: usize, cols: usize) -> Result<GridTopology, GridError> {
    let cells = structured_connectivity(&[rows, cols], CornerOrder::Clockwise)?;
    let ys = (0..rows * cols).map(|p| (p / cols) as f64).collect();
    let xs = (0..rows * cols).map(|p| (p % cols) as f64).collect();
    GridTopology::unstructured(vec![ys, xs], cells.connectivity, cells.offset)
}

/// `count` points scattered over `[0, extent)²`, one single-node cell
/// each. The same seed always gives the same cloud.
pub fn scattered_points(count: usize, extent: f64, seed: u64) -> Result<GridTopology, GridError> {
    let mut state = seed;
    let mut next = move || {
        // 64-bit LCG, top 53 bits as a unit float.
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    let mut ys = Vec::with_capacity(count);
    let mut xs = Vec::with_capacity(count);
    for _ in 0..count {
        ys.push(next() * extent);
        xs.push(next() * extent);
    }
    GridTopology::unstructured(vec![ys, xs], (0..count).collect(), (1..=count).collect())
}

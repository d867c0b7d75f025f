//! Reusable grid fixtures.
//!
//! - [`raster_2x3`]: two unit cells side by side
//! - [`raster`]: any unit-spaced 2-D raster at the origin
//! - [`line`]: rectilinear 1-D grid with uneven spacing
//! - [`unit_cube`]: a single hexahedron
//! - [`triangle_strip`]: unstructured mesh of two triangles and a quad
//! - [`scattered`]: 2-D point cloud with one single-node cell per point

use braid_grid::{connectivity_from_padded, GridTopology};

/// 2 × 3 nodes, unit spacing, origin at zero.
pub fn raster_2x3() -> GridTopology {
    raster(2, 3)
}

/// `rows × cols` nodes, unit spacing, origin at zero.
pub fn raster(rows: usize, cols: usize) -> GridTopology {
    GridTopology::raster(&[rows, cols], &[1.0, 1.0], &[0.0, 0.0])
        .unwrap_or_else(|e| panic!("fixture raster {rows}x{cols}: {e}"))
}

/// Nodes at x = 1, 3, 4, 5, 6.
pub fn line() -> GridTopology {
    GridTopology::rectilinear(vec![vec![1.0, 3.0, 4.0, 5.0, 6.0]])
        .unwrap_or_else(|e| panic!("fixture line: {e}"))
}

/// 2 × 2 × 2 nodes spanning the unit cube.
pub fn unit_cube() -> GridTopology {
    GridTopology::raster(&[2, 2, 2], &[1.0; 3], &[0.0; 3])
        .unwrap_or_else(|e| panic!("fixture unit_cube: {e}"))
}

/// Six nodes on a 2 × 3 lattice meshed as two triangles and a quad.
///
/// Cells: `[0, 1, 3]`, `[1, 4, 3]`, `[1, 2, 5, 4]`.
pub fn triangle_strip() -> GridTopology {
    let cells = connectivity_from_padded(&[0, 1, 3, -1, 1, 4, 3, -1, 1, 2, 5, 4], 4, -1)
        .unwrap_or_else(|e| panic!("fixture triangle_strip: {e}"));
    GridTopology::unstructured(
        vec![
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0],
        ],
        cells.connectivity,
        cells.offset,
    )
    .unwrap_or_else(|e| panic!("fixture triangle_strip: {e}"))
}

/// A 2-D point cloud given as `(y, x)` pairs.
pub fn scattered(points: &[(f64, f64)]) -> GridTopology {
    let n = points.len();
    GridTopology::unstructured(
        vec![
            points.iter().map(|p| p.0).collect(),
            points.iter().map(|p| p.1).collect(),
        ],
        (0..n).collect(),
        (1..=n).collect(),
    )
    .unwrap_or_else(|e| panic!("fixture scattered: {e}"))
}

//! Topology compliance test helpers.
//!
//! These functions verify that a [`GridTopology`] satisfies the invariants
//! every grid class must hold. Reused across the raster, rectilinear,
//! structured and unstructured test modules.

use crate::topology::GridTopology;
use indexmap::IndexSet;

/// Assert that offsets are strictly increasing and end at the
/// connectivity length.
pub fn assert_offsets_well_formed(grid: &GridTopology) {
    let offset = grid.offset();
    assert_eq!(offset.len(), grid.cell_count());
    let mut previous = 0;
    for (cell, &end) in offset.iter().enumerate() {
        assert!(
            end > previous,
            "offset[{cell}] = {end} does not increase past {previous}"
        );
        previous = end;
    }
    assert_eq!(
        previous,
        grid.connectivity().len(),
        "last offset ({previous}) != connectivity length ({})",
        grid.connectivity().len()
    );
}

/// Assert that every connectivity entry names an existing node.
pub fn assert_nodes_in_range(grid: &GridTopology) {
    for (i, &node) in grid.connectivity().iter().enumerate() {
        assert!(
            node < grid.point_count(),
            "connectivity[{i}] = {node} out of range for {} points",
            grid.point_count()
        );
    }
}

/// Assert that no cell lists the same node twice.
pub fn assert_cells_have_distinct_nodes(grid: &GridTopology) {
    for cell in 0..grid.cell_count() {
        let nodes = grid.cell_nodes(cell).unwrap();
        let unique: IndexSet<_> = nodes.iter().collect();
        assert_eq!(unique.len(), nodes.len(), "cell {cell} repeats a node: {nodes:?}");
    }
}

/// Assert that `c in shared_cells(p)` exactly when `p in cell_nodes(c)`.
pub fn assert_shared_cells_consistent(grid: &GridTopology) {
    for point in 0..grid.point_count() {
        let shared = grid.shared_cells(point).unwrap();
        assert!(
            shared.windows(2).all(|w| w[0] < w[1]),
            "shared_cells({point}) not strictly ascending: {shared:?}"
        );
        for cell in 0..grid.cell_count() {
            let listed = grid.cell_nodes(cell).unwrap().contains(&point);
            assert_eq!(
                shared.contains(&cell),
                listed,
                "shared_cells({point}) disagrees with cell_nodes({cell})"
            );
        }
    }
}

/// Assert that coordinate rows, names and units all match the rank.
pub fn assert_coordinates_complete(grid: &GridTopology) {
    assert_eq!(grid.coordinates().len(), grid.dim());
    for axis in 0..grid.dim() {
        assert_eq!(grid.coordinate(axis).unwrap().len(), grid.point_count());
        assert!(grid.coordinate_name(axis).is_ok());
        assert!(grid.coordinate_units(axis).is_ok());
    }
    assert!(grid.coordinate(grid.dim()).is_err());
}

/// Assert that every cell contains its own centroid.
pub fn assert_centroids_inside(grid: &GridTopology) {
    let centroids = grid.cell_centroids();
    for cell in 0..grid.cell_count() {
        let c: Vec<f64> = centroids.iter().map(|row| row[cell]).collect();
        assert!(
            grid.contains_point(&c, cell).unwrap(),
            "centroid {c:?} of cell {cell} is outside it"
        );
    }
}

/// Assert that lattice grids have the node and cell counts their shape
/// implies.
pub fn assert_lattice_counts(grid: &GridTopology) {
    let Ok(shape) = grid.shape() else {
        return;
    };
    assert_eq!(grid.point_count(), shape.iter().product::<usize>());
    let cells: usize = shape.iter().map(|&n| n.saturating_sub(1)).product();
    assert_eq!(grid.cell_count(), cells);
}

/// Run all compliance checks on a grid.
pub fn run_full_compliance(grid: &GridTopology) {
    assert_offsets_well_formed(grid);
    assert_nodes_in_range(grid);
    assert_cells_have_distinct_nodes(grid);
    assert_shared_cells_consistent(grid);
    assert_coordinates_complete(grid);
    assert_centroids_inside(grid);
    assert_lattice_counts(grid);
}

use braid_core::GridKind;
use braid_grid::{
    connectivity_from_padded, AddPolicy, Capability, Centering, CornerOrder, Field, GridError,
    GridTopology, Support,
};

fn unstructured_from_padded() -> GridTopology {
    // Two triangles and a quad over six nodes.
    let cells = connectivity_from_padded(&[0, 1, 3, -1, 1, 4, 3, -1, 1, 2, 5, 4], 4, -1).unwrap();
    GridTopology::unstructured(
        vec![
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0],
        ],
        cells.connectivity,
        cells.offset,
    )
    .unwrap()
}

#[test]
fn every_class_answers_the_common_queries() {
    let grids = vec![
        GridTopology::raster(&[3, 3], &[1.0, 1.0], &[0.0, 0.0]).unwrap(),
        GridTopology::rectilinear(vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]]).unwrap(),
        GridTopology::structured(
            &[3, 3],
            vec![
                vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
                vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0],
            ],
        )
        .unwrap(),
        unstructured_from_padded(),
    ];
    let kinds: Vec<GridKind> = grids.iter().map(GridTopology::kind).collect();
    assert_eq!(
        kinds,
        vec![
            GridKind::Raster,
            GridKind::Rectilinear,
            GridKind::Structured,
            GridKind::Unstructured
        ]
    );

    for grid in &grids {
        assert_eq!(grid.dim(), 2);
        assert_eq!(grid.supports(Capability::NodeCoordinates), Support::Supported);
        assert!(grid.x().is_ok());
        assert!(grid.y().is_ok());
        assert!(grid.z().is_err());
        assert_eq!(grid.offset().last().copied(), Some(grid.connectivity().len()));
        // A point inside the first cell of every grid above.
        assert!(grid.is_in_cell(0.25, 0.25, 0).unwrap());
    }

    // Lattices agree on connectivity when they share a shape.
    assert_eq!(grids[0].connectivity(), grids[1].connectivity());
    assert_eq!(grids[1].connectivity(), grids[2].connectivity());
}

#[test]
fn refinement_order_of_kinds() {
    assert!(GridKind::Raster.refines(GridKind::Rectilinear));
    assert!(GridKind::Rectilinear.refines(GridKind::Structured));
    assert!(GridKind::Structured.refines(GridKind::Unstructured));
    assert!(!GridKind::Unstructured.refines(GridKind::Structured));
}

#[test]
fn mixed_cell_sizes_from_padded_matrix() {
    let g = unstructured_from_padded();
    assert_eq!(g.cell_count(), 3);
    assert_eq!(g.offset(), &[3, 6, 10]);
    assert_eq!(g.min_nodes_per_cell(), Some(3));
    assert_eq!(g.cell_nodes(2).unwrap(), &[1, 2, 5, 4]);
    assert_eq!(g.shared_cells(1).unwrap(), &[0, 1, 2]);
    assert_eq!(g.shared_cells(5).unwrap(), &[2]);
    assert!(matches!(
        g.cell_nodes(3),
        Err(GridError::CellOutOfRange { cell: 3, count: 3 })
    ));
}

#[test]
fn unordered_lattice_keeps_counts() {
    let g = GridTopology::raster(&[3, 4], &[1.0, 1.0], &[0.0, 0.0])
        .unwrap()
        .with_corner_order(CornerOrder::Unordered)
        .unwrap();
    assert_eq!(g.cell_count(), 6);
    assert_eq!(g.cell_nodes(0).unwrap(), &[0, 1, 4, 5]);
}

#[test]
fn field_on_an_unstructured_mesh() {
    let mut field = Field::new(unstructured_from_padded());
    field
        .add_field("depth", vec![1.0; 6], Centering::Point, "m", AddPolicy::Clobber)
        .unwrap();
    field
        .add_field("area", vec![0.5, 0.5, 1.0], Centering::Cell, "m2", AddPolicy::Clobber)
        .unwrap();
    let err = field
        .add_field("area", vec![0.5; 6], Centering::Cell, "m2", AddPolicy::Clobber)
        .unwrap_err();
    assert_eq!(
        err,
        GridError::Dimension {
            name: "area".to_string(),
            centering: Centering::Cell,
            expected: 3,
            actual: 6,
        }
    );
    // The failed add left the stored values alone.
    assert_eq!(field.get_field("area").unwrap(), &[0.5, 0.5, 1.0]);
    assert_eq!(field.get_cell_fields().count(), 1);
    assert_eq!(field.get_point_fields().count(), 1);
}

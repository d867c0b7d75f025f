//! Build a [`GridTopology`] from a port's grid accessors.

use crate::error::EventError;
use braid_core::{GridId, GridKind, Port, PortError};
use braid_grid::{GridError, GridTopology};

/// Read grid `grid` of `port` into a [`GridTopology`] of the class the
/// port reports.
///
/// Axis vectors come back from the port as x, y and z; they are stored
/// slow→fast, so a 2-D grid becomes `[y, x]`.
pub fn grid_from_port(port: &dyn Port, grid: GridId) -> Result<GridTopology, EventError> {
    let name = port.name();
    let port_err = |error: PortError| EventError::Port {
        port: name.to_string(),
        error,
    };
    let grid_err = |error: GridError| EventError::Grid {
        port: name.to_string(),
        error,
    };

    let kind = port.get_grid_type(grid).map_err(port_err)?;
    let topology = match kind {
        GridKind::Raster => {
            let shape = port.get_grid_shape(grid).map_err(port_err)?;
            let spacing = port.get_grid_spacing(grid).map_err(port_err)?;
            let origin = port.get_grid_origin(grid).map_err(port_err)?;
            GridTopology::raster(&shape, &spacing, &origin)
        }
        GridKind::Rectilinear => {
            let shape = port.get_grid_shape(grid).map_err(port_err)?;
            let axes = axis_rows(port, grid, shape.len()).map_err(port_err)?;
            GridTopology::rectilinear(axes)
        }
        GridKind::Structured => {
            let shape = port.get_grid_shape(grid).map_err(port_err)?;
            let coords = axis_rows(port, grid, shape.len()).map_err(port_err)?;
            GridTopology::structured(&shape, coords)
        }
        GridKind::Unstructured => {
            let coords = probe_axis_rows(port, grid).map_err(port_err)?;
            let connectivity = port.get_grid_connectivity(grid).map_err(port_err)?;
            let offset = port.get_grid_offset(grid).map_err(port_err)?;
            GridTopology::unstructured(coords, connectivity, offset)
        }
    };
    topology.map_err(grid_err)
}

/// The first `rank` of x, y, z, reversed into slow→fast rows.
fn axis_rows(port: &dyn Port, grid: GridId, rank: usize) -> Result<Vec<Vec<f64>>, PortError> {
    let mut rows = Vec::with_capacity(rank);
    if rank >= 3 {
        rows.push(port.get_grid_z(grid)?);
    }
    if rank >= 2 {
        rows.push(port.get_grid_y(grid)?);
    }
    if rank >= 1 {
        rows.push(port.get_grid_x(grid)?);
    }
    Ok(rows)
}

/// Like [`axis_rows`] for grids without a shape: `x` is required and
/// each further axis is present unless the port reports it unsupported.
fn probe_axis_rows(port: &dyn Port, grid: GridId) -> Result<Vec<Vec<f64>>, PortError> {
    let x = port.get_grid_x(grid)?;
    let Some(y) = optional(port.get_grid_y(grid))? else {
        return Ok(vec![x]);
    };
    let Some(z) = optional(port.get_grid_z(grid))? else {
        return Ok(vec![y, x]);
    };
    Ok(vec![z, y, x])
}

fn optional(result: Result<Vec<f64>, PortError>) -> Result<Option<Vec<f64>>, PortError> {
    match result {
        Ok(values) => Ok(Some(values)),
        Err(PortError::Unsupported { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_test_utils::MockPort;

    #[test]
    fn raster_port_round_trips() {
        let port = MockPort::raster("r", &[2, 3], &[1.0, 0.5], &[10.0, 0.0]);
        let grid = grid_from_port(&port, GridId(0)).unwrap();
        assert_eq!(grid.kind(), GridKind::Raster);
        assert_eq!(grid.shape().unwrap(), &[2, 3]);
        assert_eq!(grid.spacing().unwrap(), &[1.0, 0.5]);
        assert_eq!(grid.x().unwrap(), &[0.0, 0.5, 1.0, 0.0, 0.5, 1.0]);
        assert_eq!(grid.y().unwrap(), &[10.0, 10.0, 10.0, 11.0, 11.0, 11.0]);
    }

    #[test]
    fn rectilinear_axes_are_stored_slow_to_fast() {
        let port = MockPort::rectilinear("q", vec![vec![0.0, 2.0], vec![0.0, 1.0, 5.0]]);
        let grid = grid_from_port(&port, GridId(0)).unwrap();
        assert_eq!(grid.kind(), GridKind::Rectilinear);
        assert_eq!(grid.shape().unwrap(), &[2, 3]);
        assert_eq!(grid.axis_coordinates(1).unwrap(), &[0.0, 1.0, 5.0]);
    }

    #[test]
    fn structured_port_imports_per_node_coordinates() {
        // A 2 × 2 lattice sheared along x.
        let port = MockPort::structured(
            "s",
            &[2, 2],
            vec![vec![0.0, 0.0, 1.0, 1.0], vec![0.0, 1.0, 0.5, 1.5]],
        );
        let grid = grid_from_port(&port, GridId(0)).unwrap();
        assert_eq!(grid.kind(), GridKind::Structured);
        assert_eq!(grid.shape().unwrap(), &[2, 2]);
        assert_eq!(grid.x().unwrap(), &[0.0, 1.0, 0.5, 1.5]);
        assert_eq!(grid.y().unwrap(), &[0.0, 0.0, 1.0, 1.0]);
        assert_eq!(grid.cell_count(), 1);
        assert!(grid.is_in_cell(1.4, 0.9, 0).unwrap());
        assert!(!grid.is_in_cell(0.1, 0.9, 0).unwrap());
    }

    #[test]
    fn structured_port_with_short_coordinates_is_a_grid_error() {
        let port = MockPort::structured("s", &[2, 2], vec![vec![0.0; 4], vec![0.0; 3]]);
        let err = grid_from_port(&port, GridId(0)).unwrap_err();
        assert!(matches!(err, EventError::Grid { ref port, .. } if port == "s"));
    }

    #[test]
    fn unstructured_rank_is_probed() {
        let port = MockPort::unstructured(
            "u",
            vec![vec![0.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]],
            vec![0, 1, 2],
            vec![3],
        );
        let grid = grid_from_port(&port, GridId(0)).unwrap();
        assert_eq!(grid.kind(), GridKind::Unstructured);
        assert_eq!(grid.dim(), 2);
        assert_eq!(grid.cell_count(), 1);
        assert_eq!(grid.x().unwrap(), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn unknown_grid_is_a_port_error() {
        let port = MockPort::raster("r", &[2, 2], &[1.0, 1.0], &[0.0, 0.0]);
        let err = grid_from_port(&port, GridId(7)).unwrap_err();
        assert!(matches!(
            err,
            EventError::Port {
                error: PortError::UnknownGrid { .. },
                ..
            }
        ));
    }
}

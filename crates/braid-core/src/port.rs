//! The [`Port`] trait: the uniform face of a wrapped simulation component.
//!
//! Braid never constructs a port. Adapters for external codes implement
//! this trait and hand the result to the engine, which only calls it.

use crate::error::PortError;
use crate::id::GridId;
use crate::kind::GridKind;
use std::cell::RefCell;
use std::rc::Rc;

/// A port shared between the events that drive and read it.
///
/// Execution is single-threaded; the same port is typically referenced
/// by its own `PortEvent` and by every `PortMapEvent` that reads from or
/// writes into it.
pub type SharedPort = Rc<RefCell<dyn Port>>;

/// Wrap a concrete port into a [`SharedPort`].
pub fn share<P: Port + 'static>(port: P) -> SharedPort {
    Rc::new(RefCell::new(port))
}

/// Uniform interface of a coupled simulation component.
///
/// Grid accessors follow the topology class reported by
/// [`get_grid_type`](Port::get_grid_type): rasters expose shape, spacing
/// and origin; rectilinear grids expose shape and one coordinate vector
/// per axis; structured grids expose shape and per-node coordinates;
/// unstructured grids expose per-node coordinates, connectivity and
/// offsets. Accessors that do not apply return
/// [`PortError::Unsupported`], which is also the default.
///
/// Arrays with one entry per axis are ordered slow→fast (z, y, x).
pub trait Port {
    /// Component name for messages and logging.
    fn name(&self) -> &str;

    /// Prepare the component for stepping.
    fn initialize(&mut self) -> Result<(), PortError>;

    /// Advance the component until its clock reaches `time`.
    fn update_until(&mut self, time: f64) -> Result<(), PortError>;

    /// Release the component's resources.
    fn finalize(&mut self) -> Result<(), PortError>;

    /// Current values of a variable, flattened.
    fn get_value(&self, name: &str) -> Result<Vec<f64>, PortError>;

    /// Overwrite the values of a variable.
    fn set_value(&mut self, name: &str, values: &[f64]) -> Result<(), PortError>;

    /// Grid on which a variable is defined.
    fn get_var_grid(&self, name: &str) -> Result<GridId, PortError>;

    /// Topology class of a grid.
    fn get_grid_type(&self, grid: GridId) -> Result<GridKind, PortError>;

    /// Node counts per axis (structured family).
    fn get_grid_shape(&self, _grid: GridId) -> Result<Vec<usize>, PortError> {
        Err(PortError::Unsupported {
            operation: "get_grid_shape",
        })
    }

    /// Node spacing per axis (rasters).
    fn get_grid_spacing(&self, _grid: GridId) -> Result<Vec<f64>, PortError> {
        Err(PortError::Unsupported {
            operation: "get_grid_spacing",
        })
    }

    /// Coordinates of the first node per axis (rasters).
    fn get_grid_origin(&self, _grid: GridId) -> Result<Vec<f64>, PortError> {
        Err(PortError::Unsupported {
            operation: "get_grid_origin",
        })
    }

    /// `x` coordinates: one per column for rectilinear grids, one per
    /// node otherwise.
    fn get_grid_x(&self, _grid: GridId) -> Result<Vec<f64>, PortError> {
        Err(PortError::Unsupported {
            operation: "get_grid_x",
        })
    }

    /// `y` coordinates, see [`get_grid_x`](Port::get_grid_x).
    fn get_grid_y(&self, _grid: GridId) -> Result<Vec<f64>, PortError> {
        Err(PortError::Unsupported {
            operation: "get_grid_y",
        })
    }

    /// `z` coordinates, see [`get_grid_x`](Port::get_grid_x).
    fn get_grid_z(&self, _grid: GridId) -> Result<Vec<f64>, PortError> {
        Err(PortError::Unsupported {
            operation: "get_grid_z",
        })
    }

    /// Flat cell-to-node connectivity (unstructured grids).
    fn get_grid_connectivity(&self, _grid: GridId) -> Result<Vec<usize>, PortError> {
        Err(PortError::Unsupported {
            operation: "get_grid_connectivity",
        })
    }

    /// Per-cell end offsets into the connectivity (unstructured grids).
    fn get_grid_offset(&self, _grid: GridId) -> Result<Vec<usize>, PortError> {
        Err(PortError::Unsupported {
            operation: "get_grid_offset",
        })
    }

    /// Model time at which the component starts.
    fn start_time(&self) -> f64;

    /// Model time the component has reached.
    fn current_time(&self) -> f64;

    /// Model time at which the component stops.
    fn end_time(&self) -> f64;

    /// Length of one component step.
    fn time_step(&self) -> f64;

    /// Variables the component accepts.
    fn input_var_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Variables the component produces.
    fn output_var_names(&self) -> Vec<String> {
        Vec::new()
    }
}

//! Test utilities and mock types for Braid development.
//!
//! Provides a scriptable [`MockPort`] implementing the [`Port`] contract
//! over raster, rectilinear, structured or unstructured grids, a [`FailingPort`] that
//! fails at a chosen lifecycle stage, and reusable grid fixtures.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;

use braid_core::{GridId, GridKind, Port, PortError};

/// Grid description served by a [`MockPort`].
#[derive(Clone, Debug)]
pub enum MockGrid {
    Raster {
        shape: Vec<usize>,
        spacing: Vec<f64>,
        origin: Vec<f64>,
    },
    Rectilinear {
        /// Distinct coordinates per axis, slow→fast.
        axes: Vec<Vec<f64>>,
    },
    Structured {
        shape: Vec<usize>,
        /// Per-node coordinates, one row per axis, slow→fast.
        coords: Vec<Vec<f64>>,
    },
    Unstructured {
        /// Per-node coordinates, one row per axis, slow→fast.
        coords: Vec<Vec<f64>>,
        connectivity: Vec<usize>,
        offset: Vec<usize>,
    },
}

impl MockGrid {
    fn kind(&self) -> GridKind {
        match self {
            Self::Raster { .. } => GridKind::Raster,
            Self::Rectilinear { .. } => GridKind::Rectilinear,
            Self::Structured { .. } => GridKind::Structured,
            Self::Unstructured { .. } => GridKind::Unstructured,
        }
    }

    /// Row of per-axis data for the `k`-th fastest axis (x = 0).
    fn fast_row(rows: &[Vec<f64>], k: usize) -> Option<&Vec<f64>> {
        rows.len().checked_sub(k + 1).and_then(|axis| rows.get(axis))
    }
}

/// A port backed by in-memory arrays with a whole-step clock.
///
/// Every variable lives on grid 0. `update_until` moves the clock to the
/// requested time (capped at the end time) and records the call; values
/// only change through `set_value`.
#[derive(Clone, Debug)]
pub struct MockPort {
    name: String,
    grid: MockGrid,
    values: HashMap<String, Vec<f64>>,
    inputs: Vec<String>,
    outputs: Vec<String>,
    start: f64,
    time: f64,
    end: f64,
    dt: f64,
    initialize_calls: usize,
    finalize_calls: usize,
    updates: Vec<f64>,
}

impl MockPort {
    pub fn new(name: impl Into<String>, grid: MockGrid) -> Self {
        Self {
            name: name.into(),
            grid,
            values: HashMap::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            start: 0.0,
            time: 0.0,
            end: 100.0,
            dt: 1.0,
            initialize_calls: 0,
            finalize_calls: 0,
            updates: Vec::new(),
        }
    }

    pub fn raster(name: impl Into<String>, shape: &[usize], spacing: &[f64], origin: &[f64]) -> Self {
        Self::new(
            name,
            MockGrid::Raster {
                shape: shape.to_vec(),
                spacing: spacing.to_vec(),
                origin: origin.to_vec(),
            },
        )
    }

    pub fn rectilinear(name: impl Into<String>, axes: Vec<Vec<f64>>) -> Self {
        Self::new(name, MockGrid::Rectilinear { axes })
    }

    pub fn structured(name: impl Into<String>, shape: &[usize], coords: Vec<Vec<f64>>) -> Self {
        Self::new(
            name,
            MockGrid::Structured {
                shape: shape.to_vec(),
                coords,
            },
        )
    }

    pub fn unstructured(
        name: impl Into<String>,
        coords: Vec<Vec<f64>>,
        connectivity: Vec<usize>,
        offset: Vec<usize>,
    ) -> Self {
        Self::new(
            name,
            MockGrid::Unstructured {
                coords,
                connectivity,
                offset,
            },
        )
    }

    /// Set start time, end time and step length. The clock restarts at
    /// `start`.
    pub fn with_time(mut self, start: f64, end: f64, dt: f64) -> Self {
        self.start = start;
        self.time = start;
        self.end = end;
        self.dt = dt;
        self
    }

    /// Register an input variable with initial values.
    pub fn with_input(mut self, name: &str, values: Vec<f64>) -> Self {
        self.inputs.push(name.to_string());
        self.values.insert(name.to_string(), values);
        self
    }

    /// Register an output variable with initial values.
    pub fn with_output(mut self, name: &str, values: Vec<f64>) -> Self {
        self.outputs.push(name.to_string());
        self.values.insert(name.to_string(), values);
        self
    }

    /// How many times `initialize()` has been called.
    pub fn initialize_calls(&self) -> usize {
        self.initialize_calls
    }

    /// How many times `finalize()` has been called.
    pub fn finalize_calls(&self) -> usize {
        self.finalize_calls
    }

    /// Clock value after each `update_until` call, in call order.
    pub fn updates(&self) -> &[f64] {
        &self.updates
    }

    /// Read a variable without going through the trait.
    pub fn values(&self, name: &str) -> Option<&[f64]> {
        self.values.get(name).map(|v| v.as_slice())
    }

    fn check_grid(&self, grid: GridId) -> Result<(), PortError> {
        if grid == GridId(0) {
            Ok(())
        } else {
            Err(PortError::UnknownGrid { grid })
        }
    }

    fn axis(&self, grid: GridId, k: usize, operation: &'static str) -> Result<Vec<f64>, PortError> {
        self.check_grid(grid)?;
        let row = match &self.grid {
            MockGrid::Rectilinear { axes } => MockGrid::fast_row(axes, k),
            MockGrid::Structured { coords, .. } | MockGrid::Unstructured { coords, .. } => {
                MockGrid::fast_row(coords, k)
            }
            MockGrid::Raster { .. } => None,
        };
        row.cloned().ok_or(PortError::Unsupported { operation })
    }
}

impl Port for MockPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) -> Result<(), PortError> {
        self.initialize_calls += 1;
        self.time = self.start;
        Ok(())
    }

    fn update_until(&mut self, time: f64) -> Result<(), PortError> {
        if time < self.time {
            return Err(PortError::Failed {
                reason: format!("cannot update backwards from {} to {time}", self.time),
            });
        }
        self.time = time.min(self.end);
        self.updates.push(self.time);
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), PortError> {
        self.finalize_calls += 1;
        Ok(())
    }

    fn get_value(&self, name: &str) -> Result<Vec<f64>, PortError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| PortError::UnknownVariable {
                name: name.to_string(),
            })
    }

    fn set_value(&mut self, name: &str, values: &[f64]) -> Result<(), PortError> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| PortError::UnknownVariable {
                name: name.to_string(),
            })?;
        if slot.len() != values.len() {
            return Err(PortError::SizeMismatch {
                name: name.to_string(),
                expected: slot.len(),
                actual: values.len(),
            });
        }
        slot.copy_from_slice(values);
        Ok(())
    }

    fn get_var_grid(&self, name: &str) -> Result<GridId, PortError> {
        if self.values.contains_key(name) {
            Ok(GridId(0))
        } else {
            Err(PortError::UnknownVariable {
                name: name.to_string(),
            })
        }
    }

    fn get_grid_type(&self, grid: GridId) -> Result<GridKind, PortError> {
        self.check_grid(grid)?;
        Ok(self.grid.kind())
    }

    fn get_grid_shape(&self, grid: GridId) -> Result<Vec<usize>, PortError> {
        self.check_grid(grid)?;
        match &self.grid {
            MockGrid::Raster { shape, .. } => Ok(shape.clone()),
            MockGrid::Rectilinear { axes } => Ok(axes.iter().map(Vec::len).collect()),
            MockGrid::Structured { shape, .. } => Ok(shape.clone()),
            MockGrid::Unstructured { .. } => Err(PortError::Unsupported {
                operation: "get_grid_shape",
            }),
        }
    }

    fn get_grid_spacing(&self, grid: GridId) -> Result<Vec<f64>, PortError> {
        self.check_grid(grid)?;
        match &self.grid {
            MockGrid::Raster { spacing, .. } => Ok(spacing.clone()),
            _ => Err(PortError::Unsupported {
                operation: "get_grid_spacing",
            }),
        }
    }

    fn get_grid_origin(&self, grid: GridId) -> Result<Vec<f64>, PortError> {
        self.check_grid(grid)?;
        match &self.grid {
            MockGrid::Raster { origin, .. } => Ok(origin.clone()),
            _ => Err(PortError::Unsupported {
                operation: "get_grid_origin",
            }),
        }
    }

    fn get_grid_x(&self, grid: GridId) -> Result<Vec<f64>, PortError> {
        self.axis(grid, 0, "get_grid_x")
    }

    fn get_grid_y(&self, grid: GridId) -> Result<Vec<f64>, PortError> {
        self.axis(grid, 1, "get_grid_y")
    }

    fn get_grid_z(&self, grid: GridId) -> Result<Vec<f64>, PortError> {
        self.axis(grid, 2, "get_grid_z")
    }

    fn get_grid_connectivity(&self, grid: GridId) -> Result<Vec<usize>, PortError> {
        self.check_grid(grid)?;
        match &self.grid {
            MockGrid::Unstructured { connectivity, .. } => Ok(connectivity.clone()),
            _ => Err(PortError::Unsupported {
                operation: "get_grid_connectivity",
            }),
        }
    }

    fn get_grid_offset(&self, grid: GridId) -> Result<Vec<usize>, PortError> {
        self.check_grid(grid)?;
        match &self.grid {
            MockGrid::Unstructured { offset, .. } => Ok(offset.clone()),
            _ => Err(PortError::Unsupported {
                operation: "get_grid_offset",
            }),
        }
    }

    fn start_time(&self) -> f64 {
        self.start
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn end_time(&self) -> f64 {
        self.end
    }

    fn time_step(&self) -> f64 {
        self.dt
    }

    fn input_var_names(&self) -> Vec<String> {
        self.inputs.clone()
    }

    fn output_var_names(&self) -> Vec<String> {
        self.outputs.clone()
    }
}

/// Lifecycle stage at which a [`FailingPort`] fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailAt {
    Initialize,
    /// Fail on the update after this many successful ones.
    Update { after: usize },
    Finalize,
}

/// A [`MockPort`] that fails deterministically at one lifecycle stage.
///
/// Useful for testing that errors propagate and that every event is
/// still finalized.
#[derive(Clone, Debug)]
pub struct FailingPort {
    pub inner: MockPort,
    pub fail_at: FailAt,
    update_calls: usize,
}

impl FailingPort {
    pub fn new(inner: MockPort, fail_at: FailAt) -> Self {
        Self {
            inner,
            fail_at,
            update_calls: 0,
        }
    }

    /// How many times `update_until()` has been called, failures included.
    pub fn update_calls(&self) -> usize {
        self.update_calls
    }

    fn failure(&self, stage: &str) -> PortError {
        PortError::Failed {
            reason: format!("deliberate {stage} failure in {}", self.inner.name()),
        }
    }
}

impl Port for FailingPort {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn initialize(&mut self) -> Result<(), PortError> {
        self.inner.initialize()?;
        if self.fail_at == FailAt::Initialize {
            return Err(self.failure("initialize"));
        }
        Ok(())
    }

    fn update_until(&mut self, time: f64) -> Result<(), PortError> {
        let n = self.update_calls;
        self.update_calls += 1;
        if let FailAt::Update { after } = self.fail_at {
            if n >= after {
                return Err(self.failure("update"));
            }
        }
        self.inner.update_until(time)
    }

    fn finalize(&mut self) -> Result<(), PortError> {
        self.inner.finalize()?;
        if self.fail_at == FailAt::Finalize {
            return Err(self.failure("finalize"));
        }
        Ok(())
    }

    fn get_value(&self, name: &str) -> Result<Vec<f64>, PortError> {
        self.inner.get_value(name)
    }

    fn set_value(&mut self, name: &str, values: &[f64]) -> Result<(), PortError> {
        self.inner.set_value(name, values)
    }

    fn get_var_grid(&self, name: &str) -> Result<GridId, PortError> {
        self.inner.get_var_grid(name)
    }

    fn get_grid_type(&self, grid: GridId) -> Result<GridKind, PortError> {
        self.inner.get_grid_type(grid)
    }

    fn get_grid_shape(&self, grid: GridId) -> Result<Vec<usize>, PortError> {
        self.inner.get_grid_shape(grid)
    }

    fn get_grid_spacing(&self, grid: GridId) -> Result<Vec<f64>, PortError> {
        self.inner.get_grid_spacing(grid)
    }

    fn get_grid_origin(&self, grid: GridId) -> Result<Vec<f64>, PortError> {
        self.inner.get_grid_origin(grid)
    }

    fn get_grid_x(&self, grid: GridId) -> Result<Vec<f64>, PortError> {
        self.inner.get_grid_x(grid)
    }

    fn get_grid_y(&self, grid: GridId) -> Result<Vec<f64>, PortError> {
        self.inner.get_grid_y(grid)
    }

    fn get_grid_z(&self, grid: GridId) -> Result<Vec<f64>, PortError> {
        self.inner.get_grid_z(grid)
    }

    fn get_grid_connectivity(&self, grid: GridId) -> Result<Vec<usize>, PortError> {
        self.inner.get_grid_connectivity(grid)
    }

    fn get_grid_offset(&self, grid: GridId) -> Result<Vec<usize>, PortError> {
        self.inner.get_grid_offset(grid)
    }

    fn start_time(&self) -> f64 {
        self.inner.start_time()
    }

    fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    fn end_time(&self) -> f64 {
        self.inner.end_time()
    }

    fn time_step(&self) -> f64 {
        self.inner.time_step()
    }

    fn input_var_names(&self) -> Vec<String> {
        self.inner.input_var_names()
    }

    fn output_var_names(&self) -> Vec<String> {
        self.inner.output_var_names()
    }
}

//! Error types for grid construction, queries and field storage.

use crate::field::Centering;
use braid_core::GridKind;
use std::fmt;

/// Errors arising from grid construction, grid queries or field storage.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// A value array does not match the point or cell count it is
    /// centered on.
    Dimension {
        /// Variable being stored.
        name: String,
        /// Centering the values were tagged with.
        centering: Centering,
        /// Number of values the grid requires for that centering.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// A centering tag other than `point` or `cell`.
    CenteringValue {
        /// The rejected tag.
        value: String,
    },
    /// The operation requires a different kind of grid.
    GridType {
        /// Least specific kind the operation accepts.
        expected: GridKind,
        /// Kind of the grid it was called on.
        actual: GridKind,
    },
    /// An axis accessor was called beyond the grid's rank.
    UnknownDimension {
        /// The requested axis (0 = slowest).
        axis: usize,
        /// Number of axes the grid has.
        rank: usize,
    },
    /// A lattice shape is empty, too deep, or has a zero extent.
    InvalidShape {
        /// What went wrong.
        reason: String,
    },
    /// Connectivity or offsets break the topology invariants.
    InvalidConnectivity {
        /// What went wrong.
        reason: String,
    },
    /// Coordinate arrays are inconsistent with the grid shape.
    InvalidCoordinates {
        /// What went wrong.
        reason: String,
    },
    /// A row of a padded cell matrix holds no node ids.
    EmptyCell {
        /// Index of the offending row.
        row: usize,
    },
    /// Appending to a variable with a different centering.
    CenteringConflict {
        /// The variable.
        name: String,
        /// Centering of the stored versions.
        existing: Centering,
        /// Centering of the rejected values.
        requested: Centering,
    },
    /// A cell index beyond the grid's cell count.
    CellOutOfRange {
        /// The requested cell.
        cell: usize,
        /// Number of cells in the grid.
        count: usize,
    },
    /// A point index beyond the grid's point count.
    PointOutOfRange {
        /// The requested point.
        point: usize,
        /// Number of points in the grid.
        count: usize,
    },
    /// No variable with this name is stored.
    UnknownField {
        /// The requested name.
        name: String,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimension {
                name,
                centering,
                expected,
                actual,
            } => write!(
                f,
                "dimension mismatch for '{name}': {centering}-centered values need {expected} \
                 elements, got {actual}"
            ),
            Self::CenteringValue { value } => {
                write!(f, "centering must be 'point' or 'cell', got '{value}'")
            }
            Self::GridType { expected, actual } => {
                write!(f, "operation requires a {expected} grid, got a {actual} grid")
            }
            Self::UnknownDimension { axis, rank } => {
                write!(f, "axis {axis} out of range for a {rank}-dimensional grid")
            }
            Self::InvalidShape { reason } => write!(f, "invalid shape: {reason}"),
            Self::InvalidConnectivity { reason } => write!(f, "invalid connectivity: {reason}"),
            Self::InvalidCoordinates { reason } => write!(f, "invalid coordinates: {reason}"),
            Self::EmptyCell { row } => write!(f, "row {row} of the cell matrix has no nodes"),
            Self::CenteringConflict {
                name,
                existing,
                requested,
            } => write!(
                f,
                "cannot append {requested}-centered values to {existing}-centered field '{name}'"
            ),
            Self::CellOutOfRange { cell, count } => {
                write!(f, "cell {cell} out of range for a grid of {count} cells")
            }
            Self::PointOutOfRange { point, count } => {
                write!(f, "point {point} out of range for a grid of {count} points")
            }
            Self::UnknownField { name } => write!(f, "no field named '{name}'"),
        }
    }
}

impl std::error::Error for GridError {}

//! Error types raised by component ports.

use crate::id::GridId;
use std::error::Error;
use std::fmt;

/// Errors reported by a [`Port`](crate::Port) implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortError {
    /// The component does not expose a variable with this name.
    UnknownVariable {
        /// The requested variable name.
        name: String,
    },
    /// The component does not expose a grid with this id.
    UnknownGrid {
        /// The requested grid id.
        grid: GridId,
    },
    /// The operation does not apply to this component or grid.
    Unsupported {
        /// Name of the unsupported operation (e.g. `"get_grid_spacing"`).
        operation: &'static str,
    },
    /// A value array has the wrong number of elements.
    SizeMismatch {
        /// The variable being written.
        name: String,
        /// Number of elements the variable holds.
        expected: usize,
        /// Number of elements supplied.
        actual: usize,
    },
    /// The wrapped component failed.
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVariable { name } => write!(f, "unknown variable '{name}'"),
            Self::UnknownGrid { grid } => write!(f, "unknown grid {grid}"),
            Self::Unsupported { operation } => write!(f, "operation '{operation}' not supported"),
            Self::SizeMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "variable '{name}' holds {expected} values, got {actual}"
            ),
            Self::Failed { reason } => write!(f, "component failed: {reason}"),
        }
    }
}

impl Error for PortError {}

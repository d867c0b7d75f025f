//! Error type for mapper initialization and execution.

use braid_core::GridKind;
use braid_grid::GridError;
use std::error::Error;
use std::fmt;

/// Errors arising from binding a mapper to grids or running it.
#[derive(Clone, Debug, PartialEq)]
pub enum MapError {
    /// The mapper cannot operate on this (destination, source) pair.
    IncompatibleGrid {
        /// Name of the mapper that rejected the pair.
        mapper: String,
        /// Kind of the destination grid.
        dst: GridKind,
        /// Kind of the source grid.
        src: GridKind,
    },
    /// `run` was called before a successful `initialize`.
    NotInitialized {
        /// Name of the mapper.
        mapper: String,
    },
    /// A value buffer does not match the size the mapper was built for.
    SizeMismatch {
        /// Which buffer (`"source"` or `"destination"`).
        what: &'static str,
        /// Length the mapper expects.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
    /// A mapper name matches no [`MapperKind`](crate::MapperKind).
    UnknownMapper {
        /// The unrecognized name.
        name: String,
    },
    /// A reduction name matches no built-in
    /// [`Reduction`](crate::Reduction).
    UnknownReduction {
        /// The unrecognized name.
        name: String,
    },
    /// A grid query failed while building indices.
    Grid(GridError),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompatibleGrid { mapper, dst, src } => write!(
                f,
                "{mapper} cannot map from a {src} grid onto a {dst} grid"
            ),
            Self::NotInitialized { mapper } => {
                write!(f, "{mapper} must be initialized before it is run")
            }
            Self::SizeMismatch {
                what,
                expected,
                actual,
            } => write!(f, "{what} buffer has {actual} values, expected {expected}"),
            Self::UnknownMapper { name } => write!(f, "unknown mapper '{name}'"),
            Self::UnknownReduction { name } => write!(f, "unknown reduction '{name}'"),
            Self::Grid(e) => write!(f, "grid query failed: {e}"),
        }
    }
}

impl Error for MapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for MapError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

//! Grid classification shared by grids, mappers and ports.

use std::fmt;

/// Topology class of a grid, from most to least specific.
///
/// The classes are mutually exclusive: a grid is exactly one of them.
/// Use [`refines`](GridKind::refines) for the non-strict question "can
/// this grid be treated as a `kind`?" (every raster is also rectilinear,
/// and so on down to unstructured).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridKind {
    /// Uniform spacing, regular shape and an origin.
    Raster,
    /// Regular shape with independent per-axis coordinate vectors.
    Rectilinear,
    /// Regular shape with full per-node coordinates.
    Structured,
    /// Arbitrary connectivity only.
    Unstructured,
}

impl GridKind {
    /// Specificity rank: `0` for raster up to `3` for unstructured.
    fn rank(self) -> u8 {
        match self {
            Self::Raster => 0,
            Self::Rectilinear => 1,
            Self::Structured => 2,
            Self::Unstructured => 3,
        }
    }

    /// Returns `true` if a grid of this kind also satisfies `other`.
    ///
    /// ```
    /// use braid_core::GridKind;
    ///
    /// assert!(GridKind::Raster.refines(GridKind::Structured));
    /// assert!(!GridKind::Unstructured.refines(GridKind::Rectilinear));
    /// ```
    pub fn refines(self, other: GridKind) -> bool {
        self.rank() <= other.rank()
    }

    /// Lower-case name used in messages and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raster => "raster",
            Self::Rectilinear => "rectilinear",
            Self::Structured => "structured",
            Self::Unstructured => "unstructured",
        }
    }
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Named, centered value arrays on a grid.

use crate::error::GridError;
use crate::topology::GridTopology;
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// Where a variable's values live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Centering {
    /// One value per grid node.
    Point,
    /// One value per grid cell.
    Cell,
}

impl Centering {
    /// Name used in configuration and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Cell => "cell",
        }
    }

    /// Number of values a grid needs for this centering.
    pub fn expected_len(self, grid: &GridTopology) -> usize {
        match self {
            Self::Point => grid.point_count(),
            Self::Cell => grid.cell_count(),
        }
    }
}

impl fmt::Display for Centering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Centering {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point" => Ok(Self::Point),
            "cell" => Ok(Self::Cell),
            other => Err(GridError::CenteringValue {
                value: other.to_string(),
            }),
        }
    }
}

/// What [`Field::add_field`] does when the name is already stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AddPolicy {
    /// Replace every stored version.
    #[default]
    Clobber,
    /// Keep earlier versions and push a new one (a time series).
    Append,
}

#[derive(Clone, Debug)]
struct Variable {
    versions: Vec<Vec<f64>>,
    centering: Centering,
    units: String,
}

/// A grid plus named value arrays.
///
/// Variables keep their insertion order, which is the order writers see
/// them in.
///
/// # Examples
///
/// ```
/// use braid_grid::{AddPolicy, Centering, Field, GridTopology};
///
/// let grid = GridTopology::raster(&[2, 3], &[1.0, 1.0], &[0.0, 0.0]).unwrap();
/// let mut field = Field::new(grid);
/// field
///     .add_field("elevation", vec![0.0; 6], Centering::Point, "m", AddPolicy::Clobber)
///     .unwrap();
/// assert!(field
///     .add_field("flux", vec![0.0; 5], Centering::Cell, "m/s", AddPolicy::Clobber)
///     .is_err());
/// assert_eq!(field.get_field("elevation").unwrap().len(), 6);
/// ```
#[derive(Clone, Debug)]
pub struct Field {
    grid: GridTopology,
    variables: IndexMap<String, Variable>,
}

impl Field {
    /// Wrap a grid with no variables.
    pub fn new(grid: GridTopology) -> Self {
        Self {
            grid,
            variables: IndexMap::new(),
        }
    }

    /// The underlying grid.
    pub fn grid(&self) -> &GridTopology {
        &self.grid
    }

    /// Consume the field, returning its grid.
    pub fn into_grid(self) -> GridTopology {
        self.grid
    }

    /// Store values for `name`.
    ///
    /// The number of values must equal the point count for
    /// [`Centering::Point`] and the cell count for [`Centering::Cell`];
    /// otherwise [`GridError::Dimension`] reports both sizes.
    pub fn add_field(
        &mut self,
        name: &str,
        values: Vec<f64>,
        centering: Centering,
        units: &str,
        policy: AddPolicy,
    ) -> Result<(), GridError> {
        let expected = centering.expected_len(&self.grid);
        if values.len() != expected {
            return Err(GridError::Dimension {
                name: name.to_string(),
                centering,
                expected,
                actual: values.len(),
            });
        }

        match (self.variables.get_mut(name), policy) {
            (Some(existing), AddPolicy::Append) => {
                if existing.centering != centering {
                    return Err(GridError::CenteringConflict {
                        name: name.to_string(),
                        existing: existing.centering,
                        requested: centering,
                    });
                }
                existing.versions.push(values);
                existing.units = units.to_string();
            }
            (Some(existing), AddPolicy::Clobber) => {
                *existing = Variable {
                    versions: vec![values],
                    centering,
                    units: units.to_string(),
                };
            }
            (None, _) => {
                self.variables.insert(
                    name.to_string(),
                    Variable {
                        versions: vec![values],
                        centering,
                        units: units.to_string(),
                    },
                );
            }
        }
        Ok(())
    }

    /// Most recent values of `name`.
    pub fn get_field(&self, name: &str) -> Option<&[f64]> {
        self.variables
            .get(name)
            .and_then(|v| v.versions.last())
            .map(Vec::as_slice)
    }

    /// Values of `name` at a given version (0 = oldest).
    pub fn get_field_version(&self, name: &str, version: usize) -> Option<&[f64]> {
        self.variables
            .get(name)
            .and_then(|v| v.versions.get(version))
            .map(Vec::as_slice)
    }

    /// Number of stored versions of `name` (0 if absent).
    pub fn version_count(&self, name: &str) -> usize {
        self.variables.get(name).map_or(0, |v| v.versions.len())
    }

    /// Centering of `name`.
    pub fn centering(&self, name: &str) -> Option<Centering> {
        self.variables.get(name).map(|v| v.centering)
    }

    /// Units of `name`.
    pub fn get_field_units(&self, name: &str) -> Result<&str, GridError> {
        self.variables
            .get(name)
            .map(|v| v.units.as_str())
            .ok_or_else(|| GridError::UnknownField {
                name: name.to_string(),
            })
    }

    /// Remove `name` and all its versions.
    pub fn remove_field(&mut self, name: &str) -> Result<(), GridError> {
        self.variables
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| GridError::UnknownField {
                name: name.to_string(),
            })
    }

    /// Names of all stored variables, in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Point-centered variables with their latest values.
    pub fn get_point_fields(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.by_centering(Centering::Point)
    }

    /// Cell-centered variables with their latest values.
    pub fn get_cell_fields(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.by_centering(Centering::Cell)
    }

    fn by_centering(&self, centering: Centering) -> impl Iterator<Item = (&str, &[f64])> {
        self.variables.iter().filter_map(move |(name, v)| {
            if v.centering != centering {
                return None;
            }
            v.versions.last().map(|values| (name.as_str(), values.as_slice()))
        })
    }
}

impl AsRef<GridTopology> for Field {
    fn as_ref(&self) -> &GridTopology {
        &self.grid
    }
}

//! Aggregations applied when several source values land in one cell.

use crate::error::MapError;
use std::fmt;
use std::str::FromStr;

/// How [`PointToCell`](crate::PointToCell) combines the good values of the
/// points assigned to a cell.
#[derive(Clone, Copy, Default)]
pub enum Reduction {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Sum.
    Sum,
    /// Minimum.
    Min,
    /// Maximum.
    Max,
    /// Caller-supplied aggregation over a non-empty slice.
    Custom(fn(&[f64]) -> f64),
}

impl Reduction {
    /// Combine `values`. Returns `None` for an empty slice.
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let v = match self {
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Self::Sum => values.iter().sum(),
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Custom(f) => f(values),
        };
        Some(v)
    }

    /// Name used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reduction {
    type Err = MapError;

    /// Parses the built-in names; `custom` has no function to bind and is
    /// rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Self::Mean),
            "sum" => Ok(Self::Sum),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(MapError::UnknownReduction {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_reductions() {
        let v = [4.0, 1.0, 7.0];
        assert_eq!(Reduction::Mean.apply(&v), Some(4.0));
        assert_eq!(Reduction::Sum.apply(&v), Some(12.0));
        assert_eq!(Reduction::Min.apply(&v), Some(1.0));
        assert_eq!(Reduction::Max.apply(&v), Some(7.0));
    }

    #[test]
    fn empty_input_has_no_value() {
        assert_eq!(Reduction::Mean.apply(&[]), None);
        assert_eq!(Reduction::Custom(|_| 1.0).apply(&[]), None);
    }

    #[test]
    fn custom_reduction_is_called() {
        fn last(values: &[f64]) -> f64 {
            values[values.len() - 1]
        }
        assert_eq!(Reduction::Custom(last).apply(&[1.0, 2.0, 3.0]), Some(3.0));
    }

    #[test]
    fn parses_builtin_names() {
        assert!(matches!("sum".parse::<Reduction>(), Ok(Reduction::Sum)));
        assert_eq!(
            "median".parse::<Reduction>().unwrap_err(),
            MapError::UnknownReduction {
                name: "median".into()
            }
        );
        assert!("custom".parse::<Reduction>().is_err());
        assert_eq!(Reduction::default().as_str(), "mean");
    }
}

//! Component configuration and its validation.
//!
//! A coupling is described by a list of [`ComponentConfig`]s, typically
//! loaded from JSON with [`load_components`]. Each component names the
//! port class that implements it, how often it steps, which variables
//! it uses and provides, and where its inputs come from.

use crate::error::ConfigError;
use braid_map::{MapError, MapperKind, Reduction};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

// ── ExchangeItem ───────────────────────────────────────────────────

/// One variable copied from a source port into a destination port.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeItem {
    /// Variable name on the source port.
    pub source: String,
    /// Variable name on the destination port.
    pub destination: String,
}

// ── ConnectionConfig ───────────────────────────────────────────────

/// An incoming connection: values flow from `connect` into the component
/// that lists this connection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// The exchanged quantity, for messages.
    pub name: String,
    /// Name of the source component.
    pub connect: String,
    /// Variable pairs to copy.
    #[serde(default)]
    pub exchange_items: Vec<ExchangeItem>,
    /// Mapper to use; the first compatible one when absent.
    #[serde(default)]
    pub mapper: Option<String>,
    /// Cell aggregation for point-to-cell mapping (`mean`, `sum`, `min`,
    /// `max`); `mean` when absent.
    #[serde(default)]
    pub reduction: Option<String>,
    /// Sentinel for missing source values.
    #[serde(default = "default_bad_val")]
    pub bad_val: f64,
}

fn default_bad_val() -> f64 {
    crate::event::DEFAULT_BAD_VAL
}

impl ConnectionConfig {
    /// The requested mapper kind, if any.
    pub fn mapper_kind(&self) -> Result<Option<MapperKind>, MapError> {
        self.mapper.as_deref().map(str::parse).transpose()
    }

    /// The requested reduction, or the default one.
    pub fn reduction_kind(&self) -> Result<Reduction, MapError> {
        self.reduction
            .as_deref()
            .map_or(Ok(Reduction::default()), str::parse)
    }
}

// ── ComponentConfig ────────────────────────────────────────────────

/// Configuration of one coupled component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Unique component name.
    pub name: String,
    /// Port class, looked up in a
    /// [`ComponentRegistry`](crate::ComponentRegistry).
    pub class: String,
    /// Free-form arguments handed to the port factory.
    #[serde(default)]
    pub initialize_args: serde_json::Value,
    /// Interval at which the component is stepped.
    pub time_step: f64,
    /// Working directory for the component, if it needs one.
    #[serde(default)]
    pub run_dir: Option<PathBuf>,
    /// Variables the component consumes.
    #[serde(default)]
    pub uses: Vec<String>,
    /// Variables the component produces.
    #[serde(default)]
    pub provides: Vec<String>,
    /// Incoming connections.
    #[serde(default)]
    pub connectivity: Vec<ConnectionConfig>,
}

impl ComponentConfig {
    /// A component with no arguments, variables or connections.
    pub fn new(name: impl Into<String>, class: impl Into<String>, time_step: f64) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            initialize_args: serde_json::Value::Null,
            time_step,
            run_dir: None,
            uses: Vec::new(),
            provides: Vec::new(),
            connectivity: Vec::new(),
        }
    }
}

/// Parse a JSON array of component configurations and validate it.
pub fn load_components(json: &str) -> Result<Vec<ComponentConfig>, ConfigError> {
    let configs: Vec<ComponentConfig> =
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
    validate_components(&configs)?;
    Ok(configs)
}

/// Check a set of component configurations for consistency.
pub fn validate_components(configs: &[ComponentConfig]) -> Result<(), ConfigError> {
    // 1. Names are unique.
    let mut names = HashSet::new();
    for config in configs {
        if !names.insert(config.name.as_str()) {
            return Err(ConfigError::DuplicateName {
                name: config.name.clone(),
            });
        }
    }
    // 2. Time steps are finite and positive.
    for config in configs {
        if !(config.time_step.is_finite() && config.time_step > 0.0) {
            return Err(ConfigError::InvalidTimeStep {
                component: config.name.clone(),
                value: config.time_step,
            });
        }
    }
    // 3. Connections name known components, mappers and reductions.
    for config in configs {
        for connection in &config.connectivity {
            if !names.contains(connection.connect.as_str()) {
                return Err(ConfigError::UnknownConnection {
                    component: config.name.clone(),
                    connect: connection.connect.clone(),
                });
            }
            if let Err(MapError::UnknownMapper { name }) = connection.mapper_kind() {
                return Err(ConfigError::UnknownMapper {
                    component: config.name.clone(),
                    mapper: name,
                });
            }
            if let Err(MapError::UnknownReduction { name }) = connection.reduction_kind() {
                return Err(ConfigError::UnknownReduction {
                    component: config.name.clone(),
                    reduction: name,
                });
            }
        }
    }
    // 4. Every used variable is provided by some component.
    let provided: HashSet<&str> = configs
        .iter()
        .flat_map(|c| c.provides.iter().map(String::as_str))
        .collect();
    for config in configs {
        if let Some(name) = config.uses.iter().find(|u| !provided.contains(u.as_str())) {
            return Err(ConfigError::Unprovided {
                component: config.name.clone(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_COMPONENTS: &str = r#"[
        {
            "name": "land",
            "class": "Landscape",
            "time_step": 1.0,
            "provides": ["elevation"],
            "initialize_args": {"rows": 3}
        },
        {
            "name": "rain",
            "class": "Rainfall",
            "time_step": 2.0,
            "uses": ["elevation"],
            "connectivity": [{
                "name": "elevation",
                "connect": "land",
                "exchange_items": [{"source": "elevation", "destination": "topography"}],
                "mapper": "PointToPoint"
            }]
        }
    ]"#;

    fn valid() -> Vec<ComponentConfig> {
        let mut land = ComponentConfig::new("land", "Landscape", 1.0);
        land.provides.push("elevation".into());
        let mut rain = ComponentConfig::new("rain", "Rainfall", 2.0);
        rain.uses.push("elevation".into());
        rain.connectivity.push(ConnectionConfig {
            name: "elevation".into(),
            connect: "land".into(),
            exchange_items: vec![ExchangeItem {
                source: "elevation".into(),
                destination: "topography".into(),
            }],
            mapper: Some("PointToPoint".into()),
            reduction: None,
            bad_val: default_bad_val(),
        });
        vec![land, rain]
    }

    #[test]
    fn json_matches_builder() {
        let mut expected = valid();
        expected[0].initialize_args = serde_json::json!({"rows": 3});
        assert_eq!(load_components(TWO_COMPONENTS).unwrap(), expected);
    }

    #[test]
    fn validate_valid_config_succeeds() {
        assert!(validate_components(&valid()).is_ok());
        assert!(validate_components(&[]).is_ok());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            load_components("[{\"name\": 1}]"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn duplicate_names_fail() {
        let mut configs = valid();
        configs[1].name = "land".into();
        assert_eq!(
            validate_components(&configs),
            Err(ConfigError::DuplicateName {
                name: "land".into()
            })
        );
    }

    #[test]
    fn bad_time_steps_fail() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut configs = valid();
            configs[0].time_step = bad;
            match validate_components(&configs) {
                Err(ConfigError::InvalidTimeStep { component, .. }) => assert_eq!(component, "land"),
                other => panic!("expected InvalidTimeStep, got {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_connection_fails() {
        let mut configs = valid();
        configs[1].connectivity[0].connect = "ocean".into();
        assert_eq!(
            validate_components(&configs),
            Err(ConfigError::UnknownConnection {
                component: "rain".into(),
                connect: "ocean".into()
            })
        );
    }

    #[test]
    fn unknown_mapper_fails() {
        let mut configs = valid();
        configs[1].connectivity[0].mapper = Some("Bilinear".into());
        assert!(matches!(
            validate_components(&configs),
            Err(ConfigError::UnknownMapper { .. })
        ));
    }

    #[test]
    fn reduction_is_parsed_and_validated() {
        let mut configs = valid();
        configs[1].connectivity[0].reduction = Some("max".into());
        assert!(validate_components(&configs).is_ok());
        assert!(matches!(
            configs[1].connectivity[0].reduction_kind(),
            Ok(Reduction::Max)
        ));

        configs[1].connectivity[0].reduction = Some("median".into());
        assert_eq!(
            validate_components(&configs),
            Err(ConfigError::UnknownReduction {
                component: "rain".into(),
                reduction: "median".into()
            })
        );
    }

    #[test]
    fn unprovided_use_fails() {
        let mut configs = valid();
        configs[0].provides.clear();
        assert_eq!(
            validate_components(&configs),
            Err(ConfigError::Unprovided {
                component: "rain".into(),
                name: "elevation".into()
            })
        );
    }

    #[test]
    fn omitted_bad_val_defaults() {
        let connection: ConnectionConfig =
            serde_json::from_str(r#"{"name": "q", "connect": "a"}"#).unwrap();
        assert_eq!(connection.bad_val, crate::event::DEFAULT_BAD_VAL);
        assert!(connection.exchange_items.is_empty());
        assert_eq!(connection.mapper_kind(), Ok(None));
        assert!(matches!(connection.reduction_kind(), Ok(Reduction::Mean)));
    }
}

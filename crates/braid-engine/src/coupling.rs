//! Assemble an [`EventManager`] from component configurations.

use crate::config::{validate_components, ComponentConfig};
use crate::error::ConfigError;
use crate::event::{ChainEvent, EventRef, PortEvent, PortMapEvent};
use crate::manager::EventManager;
use crate::registry::ComponentRegistry;
use braid_core::SharedPort;
use indexmap::IndexMap;
use std::fmt;

/// A ready-to-run coupling: the manager plus the ports it drives, keyed
/// by component name in configuration order.
pub struct Coupling {
    /// Schedules every component.
    pub manager: EventManager,
    /// One port per component.
    pub ports: IndexMap<String, SharedPort>,
}

impl fmt::Debug for Coupling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coupling")
            .field("manager", &self.manager)
            .field("ports", &self.ports.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Validate `configs`, build every port through `registry` and schedule
/// them.
///
/// Each component's [`PortEvent`] recurs at its `time_step`. A component
/// with incoming connections is scheduled as a [`ChainEvent`]: one
/// [`PortMapEvent`] per connection, in order, then its own port event.
pub fn couple(
    configs: &[ComponentConfig],
    registry: &ComponentRegistry,
) -> Result<Coupling, ConfigError> {
    validate_components(configs)?;

    let mut ports = IndexMap::with_capacity(configs.len());
    for config in configs {
        let factory = registry
            .get(&config.class)
            .ok_or_else(|| ConfigError::UnknownClass {
                component: config.name.clone(),
                class: config.class.clone(),
            })?;
        let port = factory(config).map_err(|error| ConfigError::Port {
            component: config.name.clone(),
            error,
        })?;
        ports.insert(config.name.clone(), port);
    }

    let mut manager = EventManager::new();
    for config in configs {
        let port = ports[config.name.as_str()].clone();
        let step = EventRef::new(PortEvent::new(port.clone()));
        let event = if config.connectivity.is_empty() {
            step
        } else {
            let mut chain = Vec::with_capacity(config.connectivity.len() + 1);
            for connection in &config.connectivity {
                let src = ports[connection.connect.as_str()].clone();
                let mut map = PortMapEvent::new(
                    port.clone(),
                    src,
                    connection.exchange_items.clone(),
                )
                .with_bad_val(connection.bad_val);
                // Names were checked by validation.
                if let Ok(Some(kind)) = connection.mapper_kind() {
                    map = map.with_mapper(kind);
                }
                if let Ok(reduction) = connection.reduction_kind() {
                    map = map.with_reduction(reduction);
                }
                chain.push(EventRef::new(map));
            }
            chain.push(step);
            EventRef::new(ChainEvent::new(chain))
        };
        tracing::debug!(component = %config.name, time_step = config.time_step, "scheduled");
        manager.add_recurring_event(event, config.time_step)?;
    }

    Ok(Coupling { manager, ports })
}

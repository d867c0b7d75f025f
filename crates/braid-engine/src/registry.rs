//! Named port factories.
//!
//! A [`ComponentRegistry`] maps a component class name to a factory that
//! builds the class's port from a [`ComponentConfig`]. Registries are
//! plain values passed to [`couple`](crate::couple); there is no global
//! registry.

use crate::config::ComponentConfig;
use braid_core::{PortError, SharedPort};
use indexmap::IndexMap;
use std::fmt;

/// Builds a port for one configured component.
pub type PortFactory = Box<dyn Fn(&ComponentConfig) -> Result<SharedPort, PortError>>;

/// Class name → port factory, in registration order.
#[derive(Default)]
pub struct ComponentRegistry {
    factories: IndexMap<String, PortFactory>,
}

impl ComponentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `class`, returning the factory it
    /// replaces.
    pub fn register<F>(&mut self, class: impl Into<String>, factory: F) -> Option<PortFactory>
    where
        F: Fn(&ComponentConfig) -> Result<SharedPort, PortError> + 'static,
    {
        let class = class.into();
        tracing::debug!(%class, "registering port factory");
        self.factories.insert(class, Box::new(factory))
    }

    /// Remove the factory for `class`.
    pub fn unregister(&mut self, class: &str) -> Option<PortFactory> {
        self.factories.shift_remove(class)
    }

    /// The factory for `class`.
    pub fn get(&self, class: &str) -> Option<&PortFactory> {
        self.factories.get(class)
    }

    /// Whether `class` has a factory.
    pub fn contains(&self, class: &str) -> bool {
        self.factories.contains_key(class)
    }

    /// Remove every factory.
    pub fn clear(&mut self) {
        self.factories.clear();
    }

    /// Registered class names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("classes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::share;
    use braid_test_utils::MockPort;

    fn mock_factory(config: &ComponentConfig) -> Result<SharedPort, PortError> {
        Ok(share(MockPort::raster(
            config.name.clone(),
            &[2],
            &[1.0],
            &[0.0],
        )))
    }

    #[test]
    fn register_get_unregister() {
        let mut registry = ComponentRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register("Mock", mock_factory).is_none());
        assert!(registry.register("Other", mock_factory).is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Mock", "Other"]);

        let config = ComponentConfig::new("m", "Mock", 1.0);
        let factory = registry.get("Mock").unwrap();
        let port = factory(&config).unwrap();
        assert_eq!(port.borrow().name(), "m");

        assert!(registry.unregister("Mock").is_some());
        assert!(!registry.contains("Mock"));
        assert!(registry.unregister("Mock").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reregistering_replaces() {
        let mut registry = ComponentRegistry::new();
        registry.register("Mock", mock_factory);
        assert!(registry
            .register("Mock", |_: &ComponentConfig| {
                Err(PortError::Failed {
                    reason: "nope".into(),
                })
            })
            .is_some());
        assert_eq!(registry.len(), 1);
        let config = ComponentConfig::new("m", "Mock", 1.0);
        assert!(registry.get("Mock").unwrap()(&config).is_err());
    }

    #[test]
    fn clear_empties() {
        let mut registry = ComponentRegistry::new();
        registry.register("A", mock_factory);
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(format!("{registry:?}"), "ComponentRegistry { classes: [] }");
    }
}

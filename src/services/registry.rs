//! Service registry.
//!
//! Central registry for all service definitions.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::scalaris::ScalarisService;
use super::scalaris_monitor::ScalarisMonitorService;
use super::traits::ServiceDefinition;

/// Registry of all available service definitions.
pub struct ServiceRegistry {
    services: HashMap<&'static str, Arc<dyn ServiceDefinition>>,
}

impl ServiceRegistry {
    /// Create a new service registry with all built-in services.
    pub fn new() -> Self {
        let mut registry = Self {
            services: HashMap::new(),
        };

        registry.register(Arc::new(ScalarisService));
        registry.register(Arc::new(ScalarisMonitorService));

        debug!(
            count = registry.services.len(),
            "Service registry initialized"
        );

        registry
    }

    /// Register a service definition.
    pub fn register(&mut self, service: Arc<dyn ServiceDefinition>) {
        let name = service.name();
        self.services.insert(name, service);
    }

    /// Get a service definition by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ServiceDefinition>> {
        self.services.get(name).cloned()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DesiredAction;

    #[test]
    fn test_registry_has_services() {
        let registry = ServiceRegistry::new();
        assert!(registry.get("scalaris").is_some());
        assert!(registry.get("scalaris-monitor").is_some());
    }

    #[test]
    fn test_registry_unknown_service() {
        let registry = ServiceRegistry::new();
        assert!(registry.get("unknown-service").is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        struct Quiet;

        impl ServiceDefinition for Quiet {
            fn name(&self) -> &'static str {
                "scalaris"
            }
            fn display_name(&self) -> &'static str {
                "Quiet Scalaris"
            }
            fn desired_actions(&self) -> Vec<DesiredAction> {
                vec![DesiredAction::Stop]
            }
        }

        let mut registry = ServiceRegistry::new();
        registry.register(Arc::new(Quiet));

        let definition = registry.get("scalaris").unwrap();
        assert_eq!(definition.display_name(), "Quiet Scalaris");
        assert_eq!(definition.desired_actions(), vec![DesiredAction::Stop]);
        assert!(registry.get("scalaris-monitor").is_some());
    }
}

//! Scalaris monitor service definition.

use super::traits::ServiceDefinition;

/// Monitoring companion that reports on the local Scalaris node.
pub struct ScalarisMonitorService;

impl ServiceDefinition for ScalarisMonitorService {
    fn name(&self) -> &'static str {
        "scalaris-monitor"
    }

    fn display_name(&self) -> &'static str {
        "Scalaris Monitor"
    }
}

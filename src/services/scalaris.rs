//! Scalaris node service definition.

use super::traits::ServiceDefinition;

/// The Scalaris key-value store node.
pub struct ScalarisService;

impl ServiceDefinition for ScalarisService {
    fn name(&self) -> &'static str {
        "scalaris"
    }

    fn display_name(&self) -> &'static str {
        "Scalaris Node"
    }

    fn hard_stop_verb(&self) -> Option<&'static str> {
        Some("kill")
    }
}

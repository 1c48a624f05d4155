//! The start recipe for a Scalaris node.
//!
//! Declares `scalaris` and `scalaris-monitor` enabled and running. Package
//! deployment is a separate, earlier step and is assumed to have installed
//! both init scripts.

use tracing::{debug, warn};

use crate::config::{NodeAttributes, PathsConfig};
use crate::error::{ApplyError, ApplyResult};

use super::registry::ServiceRegistry;
use super::spec::ServiceSpec;

/// Services converged by the start recipe, in application order.
pub const START_SERVICES: &[&str] = &["scalaris", "scalaris-monitor"];

/// Build the declarations for a node.
///
/// With `scalaris_start_first` set, stopping a service that has a hard stop
/// verb runs `<init_dir>/<name> <verb>` instead of the graceful stop. The
/// flag is meant to identify the last node of a ring, which it does not
/// reliably do; the behaviour is kept as-is and a warning is logged.
pub fn start_recipe(
    registry: &ServiceRegistry,
    node: &NodeAttributes,
    paths: &PathsConfig,
) -> ApplyResult<Vec<ServiceSpec>> {
    let mut specs = Vec::with_capacity(START_SERVICES.len());

    for &name in START_SERVICES {
        let definition = registry
            .get(name)
            .ok_or_else(|| ApplyError::UnknownService {
                service: name.to_string(),
            })?;

        let mut spec = ServiceSpec::new(
            definition.name(),
            definition.supported_actions(),
            definition.desired_actions(),
        );

        if node.scalaris_start_first {
            if let Some(verb) = definition.hard_stop_verb() {
                let command = format!("{} {}", paths.init_script(name).display(), verb);
                warn!(
                    service = name,
                    command = %command,
                    "scalaris_start_first is set; stop will terminate the node instead of \
                     shutting it down (last-node detection via this flag is unreliable)"
                );
                spec = spec.with_stop_override(command);
            }
        }

        debug!(
            service = name,
            display_name = definition.display_name(),
            desired = ?spec.desired_actions(),
            "Declared service"
        );
        specs.push(spec);
    }

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn node(start_first: bool) -> NodeAttributes {
        NodeAttributes {
            scalaris_start_first: start_first,
        }
    }

    #[test]
    fn test_recipe_order_and_desired_state() {
        let specs =
            start_recipe(&ServiceRegistry::new(), &node(false), &PathsConfig::default()).unwrap();
        let names: Vec<&str> = specs.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["scalaris", "scalaris-monitor"]);
        assert!(specs.iter().all(|s| s.stop_override().is_none()));
    }

    #[test]
    fn test_start_first_installs_kill_override() {
        let specs =
            start_recipe(&ServiceRegistry::new(), &node(true), &PathsConfig::default()).unwrap();
        assert_eq!(specs[0].stop_override(), Some("/etc/init.d/scalaris kill"));
        assert_eq!(specs[1].stop_override(), None);
    }

    #[test]
    fn test_override_follows_init_dir() {
        let paths = PathsConfig {
            init_dir: PathBuf::from("/opt/init"),
            ..PathsConfig::default()
        };
        let specs = start_recipe(&ServiceRegistry::new(), &node(true), &paths).unwrap();
        assert_eq!(specs[0].stop_override(), Some("/opt/init/scalaris kill"));
    }
}

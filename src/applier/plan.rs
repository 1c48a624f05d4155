//! Planning: validate every declaration before anything runs.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::config::PlatformContext;
use crate::error::{ApplyError, ApplyResult};
use crate::provider::{split_command, InitProvider, ProviderKind};
use crate::services::ServiceSpec;
use crate::validation::validate_service_name;

/// A declaration paired with the provider resolved for it.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedService<'s> {
    #[serde(flatten)]
    pub spec: &'s ServiceSpec,
    pub provider: ProviderKind,
}

/// Validated, ordered work for one apply pass.
#[derive(Debug, Clone, Serialize)]
pub struct Plan<'s> {
    pub platform: String,
    pub services: Vec<PlannedService<'s>>,
}

impl<'s> Plan<'s> {
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }
}

/// Check every declaration and resolve its provider.
///
/// `probe` is only used to look up init scripts; no command is run.
pub(super) fn build_plan<'s>(
    specs: &'s [ServiceSpec],
    ctx: &PlatformContext,
    probe: &InitProvider<'_>,
) -> ApplyResult<Plan<'s>> {
    let mut seen = HashSet::new();
    let mut services = Vec::with_capacity(specs.len());

    for spec in specs {
        let name = spec.name();
        validate_service_name(name)?;

        if !seen.insert(name) {
            return Err(ApplyError::DuplicateService {
                service: name.to_string(),
            });
        }

        if !probe.has_service(name) {
            return Err(ApplyError::UnknownService {
                service: name.to_string(),
            });
        }

        let provider = ProviderKind::for_platform(ctx.platform_id());
        let unsupported = spec.first_unsupported().or_else(|| {
            spec.desired_actions()
                .iter()
                .copied()
                .find(|action| !provider.recognizes(*action))
        });
        if let Some(action) = unsupported {
            return Err(ApplyError::UnsupportedAction {
                service: name.to_string(),
                action,
            });
        }

        if let Some(command) = spec.stop_override() {
            split_command(command)?;
        }

        debug!(
            service = name,
            provider = %provider,
            platform = ctx.platform_id(),
            "Planned service"
        );
        services.push(PlannedService { spec, provider });
    }

    Ok(Plan {
        platform: ctx.platform_id().to_string(),
        services,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::config::PathsConfig;
    use crate::executor::MockRunner;
    use crate::services::{DesiredAction, SupportedAction};

    #[test]
    fn test_empty_stop_override_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("scalaris"), "").unwrap();
        let paths = PathsConfig {
            init_dir: dir.path().to_path_buf(),
            ..PathsConfig::default()
        };
        let runner = MockRunner::new();
        let probe = InitProvider::new(ProviderKind::DebianInit, &paths, &runner);

        let specs = vec![
            ServiceSpec::new("scalaris", SupportedAction::ALL, [DesiredAction::Stop])
                .with_stop_override(" "),
        ];
        assert!(matches!(
            build_plan(&specs, &PlatformContext::new("ubuntu"), &probe),
            Err(ApplyError::Command { .. })
        ));
    }

    #[test]
    fn test_plan_serializes_for_dry_run() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("scalaris"), "").unwrap();
        let paths = PathsConfig {
            init_dir: dir.path().to_path_buf(),
            ..PathsConfig::default()
        };
        let runner = MockRunner::new();
        let probe = InitProvider::new(ProviderKind::DebianInit, &paths, &runner);

        let specs = vec![ServiceSpec::new(
            "scalaris",
            SupportedAction::ALL,
            [DesiredAction::Enable, DesiredAction::Start],
        )];
        let plan = build_plan(&specs, &PlatformContext::new("debian"), &probe).unwrap();
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["platform"], "debian");
        assert_eq!(json["services"][0]["name"], "scalaris");
        assert_eq!(json["services"][0]["provider"], "debian_init");
        assert_eq!(
            json["services"][0]["desired_actions"],
            serde_json::json!(["enable", "start"])
        );
    }

    #[test]
    fn test_generic_provider_rejects_enable() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("scalaris"), "").unwrap();
        let paths = PathsConfig {
            init_dir: dir.path().to_path_buf(),
            ..PathsConfig::default()
        };
        let runner = MockRunner::new();
        let probe = InitProvider::new(ProviderKind::GenericInit, &paths, &runner);

        let specs = vec![ServiceSpec::new(
            "scalaris",
            SupportedAction::ALL,
            [DesiredAction::Start, DesiredAction::Enable],
        )];
        match build_plan(&specs, &PlatformContext::new("centos"), &probe) {
            Err(ApplyError::UnsupportedAction { service, action }) => {
                assert_eq!(service, "scalaris");
                assert_eq!(action, DesiredAction::Enable);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(runner.executed_commands().is_empty());
    }

    #[test]
    fn test_empty_plan() {
        let paths = PathsConfig::default();
        let runner = MockRunner::new();
        let probe = InitProvider::new(ProviderKind::GenericInit, &paths, &runner);
        let plan = build_plan(&[], &PlatformContext::new("centos"), &probe).unwrap();
        assert!(plan.is_empty());
    }
}

//! Service declaration applier.

use std::time::Instant;

use tracing::{debug, error, info};

use crate::config::{PathsConfig, PlatformContext};
use crate::error::ApplyResult;
use crate::executor::CommandRunner;
use crate::provider::{InitProvider, ProviderKind};
use crate::report::{ActionOutcome, ApplyReport};
use crate::services::{DesiredAction, ServiceSpec, SupportedAction};

use super::plan::{build_plan, Plan, PlannedService};

/// Converges service declarations, one after another.
///
/// Every action is idempotent: enabling an enabled service or starting a
/// running one succeeds without running anything. Errors are not retried.
pub struct Applier<'a> {
    runner: &'a dyn CommandRunner,
    paths: &'a PathsConfig,
}

impl<'a> Applier<'a> {
    pub fn new(runner: &'a dyn CommandRunner, paths: &'a PathsConfig) -> Self {
        Self { runner, paths }
    }

    /// Validate all declarations without side effects.
    pub fn plan<'s>(
        &self,
        specs: &'s [ServiceSpec],
        ctx: &PlatformContext,
    ) -> ApplyResult<Plan<'s>> {
        let probe = self.provider(ProviderKind::for_platform(ctx.platform_id()));
        build_plan(specs, ctx, &probe)
    }

    /// Plan, then apply every declaration in order.
    pub fn apply(&self, specs: &[ServiceSpec], ctx: &PlatformContext) -> ApplyResult<ApplyReport> {
        let (report, result) = self.apply_with_report(specs, ctx);
        result.map(|()| report)
    }

    /// Like [`Applier::apply`], but hands back the report on failure too.
    pub fn apply_with_report(
        &self,
        specs: &[ServiceSpec],
        ctx: &PlatformContext,
    ) -> (ApplyReport, ApplyResult<()>) {
        let mut report = ApplyReport::begin(ctx.platform_id());
        info!(
            run_id = %report.run_id,
            platform = ctx.platform_id(),
            services = specs.len(),
            "Applying service declarations"
        );

        let result = self
            .plan(specs, ctx)
            .and_then(|plan| self.execute(&plan, &mut report));

        match &result {
            Ok(()) => {
                report.finish();
                info!(
                    run_id = %report.run_id,
                    changed = report.changed_count(),
                    "Services converged"
                );
            }
            Err(e) => {
                report.fail(e);
                error!(run_id = %report.run_id, error = %e, "Apply failed");
            }
        }

        (report, result)
    }

    fn execute(&self, plan: &Plan<'_>, report: &mut ApplyReport) -> ApplyResult<()> {
        for planned in &plan.services {
            self.converge(planned, report)?;
        }
        Ok(())
    }

    fn converge(&self, planned: &PlannedService<'_>, report: &mut ApplyReport) -> ApplyResult<()> {
        let spec = planned.spec;
        let provider = self.provider(planned.provider);
        info!(
            service = spec.name(),
            provider = %planned.provider,
            "Converging service"
        );

        for &action in spec.desired_actions() {
            let started = Instant::now();
            let commands = self.apply_action(&provider, spec, action)?;

            if commands.is_empty() {
                debug!(
                    service = spec.name(),
                    action = %action,
                    "Already in desired state"
                );
            }

            report.record(ActionOutcome {
                service: spec.name().to_string(),
                action,
                provider: planned.provider,
                changed: !commands.is_empty(),
                commands,
                duration_ms: started.elapsed().as_millis() as u64,
            });
        }

        Ok(())
    }

    /// Run one action, returning the commands that changed the system.
    fn apply_action(
        &self,
        provider: &InitProvider<'_>,
        spec: &ServiceSpec,
        action: DesiredAction,
    ) -> ApplyResult<Vec<String>> {
        let name = spec.name();
        match action {
            DesiredAction::Enable => {
                if provider.is_enabled(name)? {
                    Ok(Vec::new())
                } else {
                    provider.enable(name)
                }
            }
            DesiredAction::Start => {
                if Self::running(provider, spec)? == Some(true) {
                    Ok(Vec::new())
                } else {
                    Ok(vec![provider.start(name)?])
                }
            }
            DesiredAction::Stop => {
                if Self::running(provider, spec)? == Some(false) {
                    Ok(Vec::new())
                } else {
                    Ok(vec![provider.stop(spec)?])
                }
            }
            DesiredAction::Restart => Ok(vec![provider.restart(name)?]),
        }
    }

    /// Current run state, or `None` when the script has no status verb.
    fn running(provider: &InitProvider<'_>, spec: &ServiceSpec) -> ApplyResult<Option<bool>> {
        if spec.supports(SupportedAction::Status) {
            provider.query_status(spec.name()).map(Some)
        } else {
            Ok(None)
        }
    }

    fn provider(&self, kind: ProviderKind) -> InitProvider<'a> {
        InitProvider::new(kind, self.paths, self.runner)
    }
}

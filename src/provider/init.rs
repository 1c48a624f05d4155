//! Init-script provider.
//!
//! Translates lifecycle actions into invocations of
//! `<init_dir>/<service> <verb>`. Boot-time enablement is only available
//! under [`ProviderKind::DebianInit`].

use tracing::{debug, info, warn};

use crate::config::PathsConfig;
use crate::error::{ApplyError, ApplyResult, CommandErrorKind};
use crate::executor::{command_line, sanitize_output, CommandRunner};
use crate::services::{DesiredAction, ServiceSpec};

use super::kind::ProviderKind;
use super::debian;

/// Lines of stderr kept in an `ActionFailed` error.
const STDERR_MAX_LINES: usize = 10;

/// Service-control strategy resolved for one platform.
pub struct InitProvider<'a> {
    kind: ProviderKind,
    paths: &'a PathsConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> InitProvider<'a> {
    pub fn new(kind: ProviderKind, paths: &'a PathsConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            kind,
            paths,
            runner,
        }
    }

    /// Whether the platform knows the service, i.e. its init script exists.
    pub fn has_service(&self, service: &str) -> bool {
        self.paths.init_script(service).is_file()
    }

    /// Query whether the service is running. Exit code 0 means running.
    pub fn query_status(&self, service: &str) -> ApplyResult<bool> {
        let script = self.script(service);
        let result = self.runner.run(&script, &["status"])?;
        debug!(
            service = service,
            exit_code = ?result.exit_code,
            running = result.success,
            "Queried service status"
        );
        Ok(result.success)
    }

    /// Start the service. Returns the command line that ran.
    pub fn start(&self, service: &str) -> ApplyResult<String> {
        let script = self.script(service);
        self.run_checked(service, DesiredAction::Start, &script, &["start"])
    }

    /// Stop the service, honouring the declaration's stop override.
    pub fn stop(&self, spec: &ServiceSpec) -> ApplyResult<String> {
        match spec.stop_override() {
            Some(command) => {
                let (program, args) = split_command(command)?;
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                self.run_checked(spec.name(), DesiredAction::Stop, &program, &args)
            }
            None => {
                let script = self.script(spec.name());
                self.run_checked(spec.name(), DesiredAction::Stop, &script, &["stop"])
            }
        }
    }

    /// Restart the service.
    pub fn restart(&self, service: &str) -> ApplyResult<String> {
        let script = self.script(service);
        self.run_checked(service, DesiredAction::Restart, &script, &["restart"])
    }

    /// Whether the service starts at boot.
    pub fn is_enabled(&self, service: &str) -> ApplyResult<bool> {
        match self.kind {
            ProviderKind::DebianInit => Ok(debian::has_boot_links(&self.paths.rc_root, service)),
            ProviderKind::GenericInit => Err(self.cannot_enable(service)),
        }
    }

    /// Make the service start at boot. Returns the command lines that ran.
    pub fn enable(&self, service: &str) -> ApplyResult<Vec<String>> {
        match self.kind {
            ProviderKind::DebianInit => debian::enable(self, service),
            ProviderKind::GenericInit => Err(self.cannot_enable(service)),
        }
    }

    fn cannot_enable(&self, service: &str) -> ApplyError {
        ApplyError::UnsupportedAction {
            service: service.to_string(),
            action: DesiredAction::Enable,
        }
    }

    /// Run a command and turn a non-zero exit into `ActionFailed`.
    pub(super) fn run_checked(
        &self,
        service: &str,
        action: DesiredAction,
        program: &str,
        args: &[&str],
    ) -> ApplyResult<String> {
        let line = command_line(program, args);
        debug!(
            service = service,
            action = %action,
            provider = %self.kind,
            command = %line,
            "Running service action"
        );

        let result = self.runner.run(program, args)?;

        if !result.success {
            let stderr = sanitize_output(result.stderr.trim(), STDERR_MAX_LINES);
            warn!(
                service = service,
                action = %action,
                exit_code = ?result.exit_code,
                stderr = %stderr,
                "Service action failed"
            );
            return Err(ApplyError::ActionFailed {
                service: service.to_string(),
                action,
                exit_code: result.exit_code,
                stderr,
            });
        }

        info!(
            service = service,
            action = %action,
            command = %line,
            "Service action completed"
        );
        Ok(line)
    }

    fn script(&self, service: &str) -> String {
        self.paths.init_script(service).to_string_lossy().into_owned()
    }
}

/// Split a literal command into program and arguments.
///
/// Splits on whitespace; no shell quoting or expansion is performed.
pub fn split_command(command: &str) -> ApplyResult<(String, Vec<String>)> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next().ok_or_else(|| ApplyError::Command {
        kind: CommandErrorKind::InvalidCommandLine {
            message: "stop override is empty".to_string(),
        },
    })?;
    Ok((program, parts.collect()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::executor::{MockRunner, SubprocessResult};
    use crate::services::SupportedAction;

    fn paths() -> PathsConfig {
        PathsConfig {
            init_dir: PathBuf::from("/etc/init.d"),
            ..PathsConfig::default()
        }
    }

    fn spec(name: &str) -> ServiceSpec {
        ServiceSpec::new(name, SupportedAction::ALL, [DesiredAction::Stop])
    }

    #[test]
    fn test_split_command() {
        let (program, args) = split_command("/etc/init.d/scalaris kill").unwrap();
        assert_eq!(program, "/etc/init.d/scalaris");
        assert_eq!(args, vec!["kill"]);

        assert!(split_command("   ").is_err());
    }

    #[test]
    fn test_default_stop() {
        let paths = paths();
        let runner = MockRunner::new();
        let provider = InitProvider::new(ProviderKind::DebianInit, &paths, &runner);

        let line = provider.stop(&spec("scalaris-monitor")).unwrap();
        assert_eq!(line, "/etc/init.d/scalaris-monitor stop");
        assert_eq!(runner.executed_commands(), vec!["/etc/init.d/scalaris-monitor stop"]);
    }

    #[test]
    fn test_stop_override() {
        let paths = paths();
        let runner = MockRunner::new();
        let provider = InitProvider::new(ProviderKind::GenericInit, &paths, &runner);

        let spec = spec("scalaris").with_stop_override("/etc/init.d/scalaris kill");
        provider.stop(&spec).unwrap();
        assert_eq!(runner.executed_commands(), vec!["/etc/init.d/scalaris kill"]);
    }

    #[test]
    fn test_status_exit_codes() {
        let paths = paths();
        let runner = MockRunner::new();
        runner.respond_exit("/etc/init.d/scalaris status", 3);
        let provider = InitProvider::new(ProviderKind::DebianInit, &paths, &runner);

        assert!(!provider.query_status("scalaris").unwrap());
        assert!(provider.query_status("scalaris-monitor").unwrap());
    }

    #[test]
    fn test_failed_action() {
        let paths = paths();
        let runner = MockRunner::new();
        runner.respond(
            "/etc/init.d/scalaris start",
            SubprocessResult {
                success: false,
                exit_code: Some(7),
                stdout: String::new(),
                stderr: "cannot bind port\n".to_string(),
            },
        );
        let provider = InitProvider::new(ProviderKind::DebianInit, &paths, &runner);

        match provider.start("scalaris") {
            Err(ApplyError::ActionFailed {
                service,
                action,
                exit_code,
                stderr,
            }) => {
                assert_eq!(service, "scalaris");
                assert_eq!(action, DesiredAction::Start);
                assert_eq!(exit_code, Some(7));
                assert_eq!(stderr, "cannot bind port");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_generic_cannot_enable() {
        let paths = paths();
        let runner = MockRunner::new();
        let provider = InitProvider::new(ProviderKind::GenericInit, &paths, &runner);

        assert!(matches!(
            provider.is_enabled("scalaris"),
            Err(ApplyError::UnsupportedAction {
                action: DesiredAction::Enable,
                ..
            })
        ));
        assert!(matches!(
            provider.enable("scalaris"),
            Err(ApplyError::UnsupportedAction { .. })
        ));
        assert!(runner.executed_commands().is_empty());
    }

    #[test]
    fn test_restart() {
        let paths = paths();
        let runner = MockRunner::new();
        let provider = InitProvider::new(ProviderKind::GenericInit, &paths, &runner);
        provider.restart("scalaris").unwrap();
        assert_eq!(runner.executed_commands(), vec!["/etc/init.d/scalaris restart"]);
    }
}

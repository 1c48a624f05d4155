//! Error types for scalaris-svc.

use thiserror::Error;

use crate::services::DesiredAction;

/// Crate-level error returned by the binary entry points.
#[derive(Error, Debug)]
pub enum SvcError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Convergence errors.
    #[error("Apply error: {0}")]
    Apply(#[from] ApplyError),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while planning or applying service declarations.
///
/// None of these are retried; the operator fixes the cause and re-runs
/// the whole pass.
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("Service not recognized by the platform: {service}")]
    UnknownService { service: String },

    #[error("Service '{service}' does not support action '{action}'")]
    UnsupportedAction {
        service: String,
        action: DesiredAction,
    },

    #[error("Action '{action}' on service '{service}' failed with exit code {}: {stderr}", fmt_exit_code(.exit_code))]
    ActionFailed {
        service: String,
        action: DesiredAction,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Service declared more than once: {service}")]
    DuplicateService { service: String },

    #[error("Invalid service name '{service}': {message}")]
    InvalidServiceName { service: String, message: String },

    #[error("Command error: {kind}")]
    Command { kind: CommandErrorKind },
}

/// Command error kinds.
#[derive(Error, Debug)]
pub enum CommandErrorKind {
    #[error("Invalid command line: {message}")]
    InvalidCommandLine { message: String },

    #[error("Command execution failed: {message}")]
    ExecutionFailed { message: String },

    #[error("Command timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl ApplyError {
    /// Stable machine-readable code, used in the convergence report.
    pub fn code(&self) -> &'static str {
        match self {
            ApplyError::UnknownService { .. } => "UNKNOWN_SERVICE",
            ApplyError::UnsupportedAction { .. } => "UNSUPPORTED_ACTION",
            ApplyError::ActionFailed { .. } => "ACTION_FAILED",
            ApplyError::DuplicateService { .. } => "DUPLICATE_SERVICE",
            ApplyError::InvalidServiceName { .. } => "INVALID_SERVICE_NAME",
            ApplyError::Command {
                kind: CommandErrorKind::Timeout { .. },
            } => "COMMAND_TIMEOUT",
            ApplyError::Command { .. } => "COMMAND_ERROR",
        }
    }
}

fn fmt_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

/// Result type alias for apply operations.
pub type ApplyResult<T> = Result<T, ApplyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_failed_message() {
        let err = ApplyError::ActionFailed {
            service: "scalaris".to_string(),
            action: DesiredAction::Start,
            exit_code: Some(3),
            stderr: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Action 'start' on service 'scalaris' failed with exit code 3: boom"
        );
    }

    #[test]
    fn test_action_failed_without_exit_code() {
        let err = ApplyError::ActionFailed {
            service: "scalaris".to_string(),
            action: DesiredAction::Stop,
            exit_code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_error_codes() {
        let err = ApplyError::UnknownService {
            service: "nope".to_string(),
        };
        assert_eq!(err.code(), "UNKNOWN_SERVICE");

        let err = ApplyError::Command {
            kind: CommandErrorKind::Timeout { timeout_secs: 5 },
        };
        assert_eq!(err.code(), "COMMAND_TIMEOUT");
    }

    #[test]
    fn test_apply_error_converts_into_svc_error() {
        let err: SvcError = ApplyError::DuplicateService {
            service: "scalaris".to_string(),
        }
        .into();
        assert!(matches!(err, SvcError::Apply(_)));
    }
}

//! Report entry types.
//!
//! Defines the structure of a convergence report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApplyError;
use crate::provider::ProviderKind;
use crate::services::DesiredAction;

/// Record of one apply pass.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    /// Unique identifier for the run.
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Platform identifier the providers were chosen from.
    pub platform: String,
    /// One entry per desired action reached, in execution order.
    pub outcomes: Vec<ActionOutcome>,
    pub result: RunResult,
}

/// Outcome of a single desired action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub service: String,
    pub action: DesiredAction,
    pub provider: ProviderKind,
    /// Whether the action changed the system.
    pub changed: bool,
    /// Command lines that ran to carry out the action, excluding state queries.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    pub duration_ms: u64,
}

/// Final result of the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum RunResult {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "failure")]
    Failure {
        error_code: String,
        error_message: String,
    },
}

impl ApplyReport {
    /// Start a report for a new run.
    pub fn begin(platform: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            platform: platform.to_string(),
            outcomes: Vec::new(),
            result: RunResult::Success,
        }
    }

    pub fn record(&mut self, outcome: ActionOutcome) {
        self.outcomes.push(outcome);
    }

    /// Close the report as successful.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
        self.result = RunResult::Success;
    }

    /// Close the report with the error that ended the run.
    pub fn fail(&mut self, error: &ApplyError) {
        self.finished_at = Some(Utc::now());
        self.result = RunResult::Failure {
            error_code: error.code().to_string(),
            error_message: error.to_string(),
        };
    }

    pub fn is_success(&self) -> bool {
        self.result == RunResult::Success
    }

    /// Number of actions that changed the system.
    pub fn changed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.changed).count()
    }
}

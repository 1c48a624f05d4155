//! Service declarations.
//!
//! A [`ServiceSpec`] is the static, immutable description of one service:
//! what lifecycle actions its init script supports, what it should be
//! converged to, and an optional literal stop command.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle action an init script is declared to support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedAction {
    Status,
    Start,
    Stop,
    Restart,
}

impl SupportedAction {
    pub const ALL: [SupportedAction; 4] = [
        SupportedAction::Status,
        SupportedAction::Start,
        SupportedAction::Stop,
        SupportedAction::Restart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedAction::Status => "status",
            SupportedAction::Start => "start",
            SupportedAction::Stop => "stop",
            SupportedAction::Restart => "restart",
        }
    }
}

impl fmt::Display for SupportedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action requested as part of a service's desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredAction {
    Enable,
    Start,
    Stop,
    Restart,
}

impl DesiredAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesiredAction::Enable => "enable",
            DesiredAction::Start => "start",
            DesiredAction::Stop => "stop",
            DesiredAction::Restart => "restart",
        }
    }

    /// The init script capability this action relies on.
    ///
    /// `Enable` is handled by the provider's boot-link mechanism and never
    /// touches the init script; whether the provider has one is decided by
    /// [`ProviderKind::recognizes`](crate::provider::ProviderKind::recognizes).
    pub fn required_support(&self) -> Option<SupportedAction> {
        match self {
            DesiredAction::Enable => None,
            DesiredAction::Start => Some(SupportedAction::Start),
            DesiredAction::Stop => Some(SupportedAction::Stop),
            DesiredAction::Restart => Some(SupportedAction::Restart),
        }
    }
}

impl fmt::Display for DesiredAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration of one service and the state it should converge to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSpec {
    name: String,
    supported_actions: BTreeSet<SupportedAction>,
    desired_actions: Vec<DesiredAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_override: Option<String>,
}

impl ServiceSpec {
    /// Create a declaration without a stop override.
    pub fn new<S, D>(name: &str, supported: S, desired: D) -> Self
    where
        S: IntoIterator<Item = SupportedAction>,
        D: IntoIterator<Item = DesiredAction>,
    {
        Self {
            name: name.to_string(),
            supported_actions: supported.into_iter().collect(),
            desired_actions: desired.into_iter().collect(),
            stop_override: None,
        }
    }

    /// Replace the provider's default stop with a literal command line.
    pub fn with_stop_override(mut self, command: impl Into<String>) -> Self {
        self.stop_override = Some(command.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supported_actions(&self) -> &BTreeSet<SupportedAction> {
        &self.supported_actions
    }

    pub fn desired_actions(&self) -> &[DesiredAction] {
        &self.desired_actions
    }

    pub fn stop_override(&self) -> Option<&str> {
        self.stop_override.as_deref()
    }

    pub fn supports(&self, action: SupportedAction) -> bool {
        self.supported_actions.contains(&action)
    }

    /// First desired action the declared capabilities cannot carry out.
    pub fn first_unsupported(&self) -> Option<DesiredAction> {
        self.desired_actions.iter().copied().find(|action| {
            action
                .required_support()
                .is_some_and(|needed| !self.supports(needed))
        })
    }
}

//! Service definition traits.
//!
//! Defines the interface for manageable services.

use super::spec::{DesiredAction, SupportedAction};

/// Defines a manageable service.
///
/// Each implementation describes one init-script service: its name, the
/// lifecycle actions its script supports and the state it converges to.
///
/// # Example
///
/// ```ignore
/// pub struct ScalarisService;
///
/// impl ServiceDefinition for ScalarisService {
///     fn name(&self) -> &'static str { "scalaris" }
///     fn display_name(&self) -> &'static str { "Scalaris Node" }
///     fn hard_stop_verb(&self) -> Option<&'static str> { Some("kill") }
/// }
/// ```
pub trait ServiceDefinition: Send + Sync {
    /// Service identifier (e.g., "scalaris", "scalaris-monitor").
    ///
    /// This is also the init script's file name and should be unique
    /// across all registered services.
    fn name(&self) -> &'static str;

    /// Human-readable display name.
    fn display_name(&self) -> &'static str;

    /// Actions the init script implements.
    fn supported_actions(&self) -> Vec<SupportedAction> {
        SupportedAction::ALL.to_vec()
    }

    /// Actions applied, in order, to reach the desired state.
    fn desired_actions(&self) -> Vec<DesiredAction> {
        vec![DesiredAction::Enable, DesiredAction::Start]
    }

    /// Init script verb that terminates the service without a graceful
    /// shutdown, if the script has one.
    fn hard_stop_verb(&self) -> Option<&'static str> {
        None
    }
}

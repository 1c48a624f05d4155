//! Service declarations and definitions.
//!
//! Contains the declaration types, the built-in service definitions, the
//! service registry and the start recipe.
//!
//! ## Adding a New Service
//!
//! 1. Create a new file in this directory (e.g., `newservice.rs`)
//! 2. Implement the `ServiceDefinition` trait
//! 3. Register the service in `ServiceRegistry::new()`

mod recipe;
mod registry;
mod scalaris;
mod scalaris_monitor;
mod spec;
mod traits;

pub use recipe::{start_recipe, START_SERVICES};
pub use registry::ServiceRegistry;
pub use scalaris::ScalarisService;
pub use scalaris_monitor::ScalarisMonitorService;
pub use spec::{DesiredAction, ServiceSpec, SupportedAction};
pub use traits::ServiceDefinition;

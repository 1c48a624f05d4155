//! Service declaration applier.
//!
//! Applying is two-phase: [`Applier::plan`] checks every declaration
//! (name, duplicates, init script present, actions supported) before any
//! command runs; execution then converges each service in declared order.

mod apply;
mod plan;

pub use apply::Applier;
pub use plan::{Plan, PlannedService};

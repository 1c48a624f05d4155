//! scalaris-svc library
//!
//! Converges the `scalaris` and `scalaris-monitor` init services of a
//! Scalaris node to "enabled at boot and running", choosing the init
//! tooling from the node's platform.

pub mod applier;
pub mod config;
pub mod error;
pub mod executor;
pub mod provider;
pub mod report;
pub mod services;
pub mod validation;

//! Configuration module for scalaris-svc.
//!
//! Handles loading and validating configuration from TOML files, node
//! attributes and platform identification.

mod node;
mod platform;
mod settings;

pub use node::NodeAttributes;
pub use platform::{PlatformContext, UNKNOWN_PLATFORM};
pub use settings::*;

//! Input validation module.
//!
//! Provides validators for values that end up in file-system paths or
//! command lines.

mod service_name;

pub use service_name::validate_service_name;

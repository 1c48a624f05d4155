//! Error types for scalaris-svc.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;

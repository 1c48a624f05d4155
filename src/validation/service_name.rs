//! Service name validation.
//!
//! Service names are joined onto the init directory, so they must be a
//! single plain path component.

use crate::error::{ApplyError, ApplyResult};

/// Longest accepted service name.
const MAX_SERVICE_NAME_LENGTH: usize = 64;

fn invalid(name: &str, message: &str) -> ApplyError {
    ApplyError::InvalidServiceName {
        service: name.to_string(),
        message: message.to_string(),
    }
}

/// Validate that a service name is safe to use as an init script name.
///
/// # Example
///
/// ```
/// use scalaris_svc::validation::validate_service_name;
///
/// assert!(validate_service_name("scalaris-monitor").is_ok());
/// assert!(validate_service_name("../etc/passwd").is_err());
/// ```
pub fn validate_service_name(name: &str) -> ApplyResult<()> {
    if name.is_empty() {
        return Err(invalid(name, "Service name cannot be empty"));
    }

    if name.len() > MAX_SERVICE_NAME_LENGTH {
        return Err(invalid(name, "Service name is too long"));
    }

    if name.starts_with('.') || name.starts_with('-') {
        return Err(invalid(name, "Service name must start with a letter or digit"));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
    {
        return Err(invalid(name, "Service name contains invalid characters"));
    }

    Ok(())
}

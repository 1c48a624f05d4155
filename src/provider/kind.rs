//! Provider selection.

use std::fmt;

use serde::Serialize;

use crate::services::DesiredAction;

/// Platforms managed with Debian's init tooling.
pub const DEBIAN_FAMILY: &[&str] = &["ubuntu", "debian"];

/// Init-system provider variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// SysV scripts with boot links maintained by `update-rc.d`.
    DebianInit,
    /// Bare SysV scripts. Has no boot-link tooling, so it cannot enable.
    GenericInit,
}

impl ProviderKind {
    /// Map a platform identifier to its provider.
    ///
    /// Exact, case-sensitive match; anything outside the Debian family gets
    /// the generic provider.
    pub fn for_platform(platform_id: &str) -> Self {
        if DEBIAN_FAMILY.contains(&platform_id) {
            ProviderKind::DebianInit
        } else {
            ProviderKind::GenericInit
        }
    }

    /// Whether this provider can carry out the action at all, regardless
    /// of what the init script declares.
    pub fn recognizes(&self, action: DesiredAction) -> bool {
        !matches!(
            (self, action),
            (ProviderKind::GenericInit, DesiredAction::Enable)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::DebianInit => "debian_init",
            ProviderKind::GenericInit => "generic_init",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

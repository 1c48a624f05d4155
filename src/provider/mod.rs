//! Service-control providers.
//!
//! A provider turns abstract lifecycle actions into platform commands. The
//! variant is picked once per declaration from the platform identifier:
//! - `DebianInit` - init scripts plus `update-rc.d` (ubuntu, debian)
//! - `GenericInit` - init scripts only, no `enable` (everything else)

mod debian;
mod init;
mod kind;

pub use init::{split_command, InitProvider};
pub use kind::{ProviderKind, DEBIAN_FAMILY};

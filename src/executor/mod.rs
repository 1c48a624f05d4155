//! Command executor module.
//!
//! Handles subprocess spawning, execution timeouts and the runner seam
//! used by service providers.

mod output;
mod runner;
mod subprocess;

pub use output::sanitize_output;
pub use runner::{command_line, CommandRunner, MockRunner, SubprocessRunner};
pub use subprocess::{SubprocessBuilder, SubprocessResult};

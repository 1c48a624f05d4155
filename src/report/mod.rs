//! Convergence reports.
//!
//! Each apply pass produces an [`ApplyReport`] listing every action with
//! whether it changed anything. Reports can be appended to a JSON lines
//! file for later inspection.

mod entry;
mod writer;

pub use entry::{ActionOutcome, ApplyReport, RunResult};
pub use writer::ReportWriter;

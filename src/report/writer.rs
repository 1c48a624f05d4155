//! Report writer.
//!
//! Appends reports as JSON lines (one JSON object per line).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::SvcError;

use super::entry::ApplyReport;

/// Appends convergence reports to a file.
pub struct ReportWriter {
    file: File,
    path: PathBuf,
}

impl ReportWriter {
    /// Open the report file in append mode, creating the parent directory
    /// if needed.
    pub fn new(path: &Path) -> Result<Self, SvcError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!(path = %parent.display(), "Creating report directory");
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Write one report as a single line and sync it.
    pub fn write(&mut self, report: &ApplyReport) -> Result<(), SvcError> {
        let json = serde_json::to_string(report)?;
        writeln!(self.file, "{}", json)?;

        if let Err(e) = self.file.sync_data() {
            warn!(error = %e, "Failed to sync report file");
        }

        debug!(run_id = %report.run_id, path = %self.path.display(), "Report written");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

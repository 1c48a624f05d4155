//! Safe subprocess execution.
//!
//! Provides utilities for running external commands safely with:
//! - No shell interpretation (direct exec)
//! - Configurable timeouts
//! - Captured stdout/stderr
//!
//! Both output pipes are drained on reader threads from the moment the
//! child is spawned, so a chatty script cannot fill a pipe buffer and a
//! daemon that inherits the pipes cannot hold the caller past its exit.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{ApplyError, ApplyResult, CommandErrorKind};

/// How long to keep collecting output after the child exits while a
/// descendant still holds its pipes open.
const OUTPUT_GRACE: Duration = Duration::from_millis(250);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of a subprocess execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubprocessResult {
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// The exit code, if available.
    pub exit_code: Option<i32>,
    /// Captured stdout as a string.
    pub stdout: String,
    /// Captured stderr as a string.
    pub stderr: String,
}

impl SubprocessResult {
    fn from_parts(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            success: status.success(),
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(stdout).to_string(),
            stderr: String::from_utf8_lossy(stderr).to_string(),
        }
    }

    /// Build a result for a given exit code.
    pub fn with_exit_code(exit_code: i32) -> Self {
        Self {
            success: exit_code == 0,
            exit_code: Some(exit_code),
            ..Self::default()
        }
    }
}

/// Output of one pipe, filled by a reader thread.
struct PipeCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    closed: Receiver<()>,
}

impl PipeCapture {
    fn spawn<R: Read + Send + 'static>(pipe: Option<R>) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let (tx, closed) = mpsc::channel();
        let sink = Arc::clone(&buffer);

        thread::spawn(move || {
            if let Some(mut pipe) = pipe {
                let mut chunk = [0u8; 8192];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => sink
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .extend_from_slice(&chunk[..n]),
                    }
                }
            }
            let _ = tx.send(());
        });

        Self { buffer, closed }
    }

    /// Wait until the writer side closes or `until` passes. Returns
    /// whether the pipe reached end of file.
    fn wait_closed(&self, until: Instant) -> bool {
        let remaining = until.saturating_duration_since(Instant::now());
        self.closed.recv_timeout(remaining).is_ok()
    }

    fn take(&self) -> Vec<u8> {
        std::mem::take(
            &mut *self
                .buffer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

/// Builder for subprocess execution.
pub struct SubprocessBuilder {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl SubprocessBuilder {
    /// Create a new subprocess builder.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Add arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args.extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Set the timeout for the command.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Execute the command and wait for completion with timeout enforcement.
    ///
    /// If the process itself outlives the configured timeout it is killed
    /// and a timeout error is returned. Once it has exited, output still
    /// held open by a detached descendant is collected for at most
    /// [`OUTPUT_GRACE`] (never past the timeout) and the exit status is
    /// returned with whatever was read.
    pub fn run(self) -> ApplyResult<SubprocessResult> {
        debug!(
            program = %self.program,
            args = ?self.args,
            timeout_secs = self.timeout.as_secs(),
            "Executing subprocess"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ApplyError::Command {
                kind: CommandErrorKind::ExecutionFailed {
                    message: format!("Failed to spawn {}: {}", self.program, e),
                },
            })?;

        let start = Instant::now();
        let deadline = start + self.timeout;
        let stdout = PipeCapture::spawn(child.stdout.take());
        let stderr = PipeCapture::spawn(child.stderr.take());

        let status = self.wait_until(&mut child, deadline)?;

        let drain_until = (Instant::now() + OUTPUT_GRACE).min(deadline);
        let stdout_closed = stdout.wait_closed(drain_until);
        let stderr_closed = stderr.wait_closed(drain_until);
        if !(stdout_closed && stderr_closed) {
            debug!(
                program = %self.program,
                "Output pipes still held open after exit, keeping partial output"
            );
        }

        let result = SubprocessResult::from_parts(status, &stdout.take(), &stderr.take());
        debug!(
            success = result.success,
            exit_code = ?result.exit_code,
            duration_ms = start.elapsed().as_millis(),
            "Subprocess completed"
        );
        Ok(result)
    }

    fn wait_until(&self, child: &mut Child, deadline: Instant) -> ApplyResult<ExitStatus> {
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        warn!(
                            program = %self.program,
                            timeout_secs = self.timeout.as_secs(),
                            "Process timed out, killing"
                        );
                        if let Err(e) = child.kill() {
                            warn!(error = %e, "Failed to kill timed-out process");
                        }
                        // Reap the zombie process
                        let _ = child.wait();
                        return Err(ApplyError::Command {
                            kind: CommandErrorKind::Timeout {
                                timeout_secs: self.timeout.as_secs(),
                            },
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(ApplyError::Command {
                        kind: CommandErrorKind::ExecutionFailed {
                            message: format!("Failed to check process status: {}", e),
                        },
                    });
                }
            }
        }
    }
}

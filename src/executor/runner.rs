//! Command runner abstraction.
//!
//! `CommandRunner` is the seam providers use to invoke service-control
//! commands. `SubprocessRunner` is the production implementation;
//! `MockRunner` records calls and returns preset results.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::ApplyResult;

use super::subprocess::{SubprocessBuilder, SubprocessResult};

/// Executes a program with arguments, without a shell.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> ApplyResult<SubprocessResult>;
}

/// Render a program and its arguments as one line, for logs and reports.
pub fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Production runner that spawns processes with a per-command timeout.
#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    timeout: Duration,
}

impl SubprocessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SubprocessRunner {
    fn run(&self, program: &str, args: &[&str]) -> ApplyResult<SubprocessResult> {
        SubprocessBuilder::new(program)
            .args(args.iter().copied())
            .timeout(self.timeout)
            .run()
    }
}

/// Test double that records command lines.
///
/// Commands without a preset result succeed with exit code 0.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: RefCell<HashMap<String, SubprocessResult>>,
    commands: RefCell<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset the result for an exact command line.
    pub fn respond(&self, command_line: &str, result: SubprocessResult) {
        self.responses
            .borrow_mut()
            .insert(command_line.to_string(), result);
    }

    /// Preset an exit code for an exact command line.
    pub fn respond_exit(&self, command_line: &str, exit_code: i32) {
        self.respond(command_line, SubprocessResult::with_exit_code(exit_code));
    }

    /// Every command line run so far, in order.
    pub fn executed_commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub fn clear_history(&self) {
        self.commands.borrow_mut().clear();
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> ApplyResult<SubprocessResult> {
        let line = command_line(program, args);
        self.commands.borrow_mut().push(line.clone());
        Ok(self
            .responses
            .borrow()
            .get(&line)
            .cloned()
            .unwrap_or_else(|| SubprocessResult::with_exit_code(0)))
    }
}

// src/exec/runner.rs

//! Command-line execution through the platform command interpreter.

use std::path::PathBuf;
use std::process::Command;

use crate::exec::ExecutionOutcome;
use crate::report::{self, Diagnostic, SharedReporter};

/// Interpreter used when none is configured.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Runs a full command line with `<shell> -c`, blocking until it finishes.
///
/// stdout and stderr are inherited from the caller.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    shell: PathBuf,
    reporter: SharedReporter,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner {
    pub fn new() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
            reporter: report::noop(),
        }
    }

    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_reporter(mut self, reporter: SharedReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run `command_line` exactly once and classify the result.
    pub fn run(&self, command_line: &str) -> ExecutionOutcome {
        self.reporter.report(Diagnostic::CommandStarted {
            command: command_line.to_string(),
        });

        let outcome = match Command::new(&self.shell).arg("-c").arg(command_line).status() {
            Ok(status) => ExecutionOutcome::from(status),
            Err(err) => ExecutionOutcome::launch_failed(format!(
                "spawning {}: {err}",
                self.shell.display()
            )),
        };

        self.reporter.report(Diagnostic::CommandFinished {
            command: command_line.to_string(),
            outcome: outcome.clone(),
        });

        outcome
    }
}

/// Run a command line with the default interpreter; `true` iff it exited 0.
pub fn run(command_line: &str) -> bool {
    CommandRunner::new().run(command_line).success()
}

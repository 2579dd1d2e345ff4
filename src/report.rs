// src/report.rs

//! Diagnostics sink injected into every core component.
//!
//! The runner, the launcher and the guarded worker never log on their own;
//! they hand a [`Diagnostic`] to whatever [`Reporter`] they were built with.
//!
//! - [`NoopReporter`] is the default and discards everything.
//! - [`TracingReporter`] forwards to `tracing`, which is what the CLI uses.
//! - Tests can record diagnostics with their own implementation.

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::exec::ExecutionOutcome;
use crate::sync::{WorkerOutcome, WorkerPhase};

/// A single event emitted by the core.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    CommandStarted {
        command: String,
    },
    CommandFinished {
        command: String,
        outcome: ExecutionOutcome,
    },
    LaunchStarted {
        argv: String,
        redirect: Option<PathBuf>,
    },
    LaunchFinished {
        argv: String,
        outcome: ExecutionOutcome,
    },
    WorkerPhase {
        worker: u64,
        phase: WorkerPhase,
    },
    WorkerFinished {
        worker: u64,
        outcome: WorkerOutcome,
    },
}

/// Receives diagnostics from the core.
pub trait Reporter: Send + Sync + Debug {
    fn report(&self, diagnostic: Diagnostic);
}

/// Shared handle to a reporter, as stored by the components.
pub type SharedReporter = Arc<dyn Reporter>;

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _diagnostic: Diagnostic) {}
}

pub fn noop() -> SharedReporter {
    Arc::new(NoopReporter)
}

/// Forwards diagnostics to `tracing` with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::CommandStarted { command } => {
                info!(command = %command, "running command line");
            }
            Diagnostic::CommandFinished { command, outcome } => match outcome.failure_reason() {
                None => info!(command = %command, "command succeeded"),
                Some(reason) => warn!(command = %command, %reason, "command failed"),
            },
            Diagnostic::LaunchStarted { argv, redirect } => match redirect {
                Some(path) => info!(
                    argv = %argv,
                    output = %path.display(),
                    "launching process with redirected stdout"
                ),
                None => info!(argv = %argv, "launching process"),
            },
            Diagnostic::LaunchFinished { argv, outcome } => match outcome.failure_reason() {
                None => info!(argv = %argv, "process exited successfully"),
                Some(reason) => error!(argv = %argv, %reason, "process failed"),
            },
            Diagnostic::WorkerPhase { worker, phase } => {
                debug!(worker, ?phase, "worker phase changed");
            }
            Diagnostic::WorkerFinished { worker, outcome } => {
                if outcome.success() {
                    info!(worker, "worker completed");
                } else {
                    warn!(worker, %outcome, "worker failed");
                }
            }
        }
    }
}

pub fn tracing_reporter() -> SharedReporter {
    Arc::new(TracingReporter)
}

// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] runs a whole command line through the command interpreter.
//! - [`launcher`] forks a child and replaces its image with an executable,
//!   optionally redirecting its stdout to a file.
//! - [`argv`] holds the validated argument vector the launcher consumes.
//! - [`outcome`] classifies exit statuses for both.
//!
//! Both entry points block the calling thread until the child terminates and
//! run exactly one process per call.

pub mod argv;
pub mod launcher;
pub mod outcome;
pub mod runner;

pub use argv::{ArgumentError, ArgumentVector};
pub use launcher::{exec, exec_redirected, ProcessLauncher};
pub use outcome::{ExecutionOutcome, FailureReason};
pub use runner::{run, CommandRunner};

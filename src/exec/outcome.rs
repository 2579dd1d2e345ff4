// src/exec/outcome.rs

//! Result classification shared by the command runner and the launcher.

use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use nix::errno::Errno;
use nix::sys::wait::WaitStatus;

/// Why a command or launched process did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The interpreter or child process could not be created.
    LaunchFailed(String),

    /// The process ran but did not exit normally. Carries the terminating
    /// signal number when one is known.
    AbnormalTermination { signal: Option<i32> },

    /// The process exited normally with a non-zero code.
    NonZeroExit(i32),

    /// The child could not open the output file or wire it as stdout.
    RedirectSetupFailed(Errno),

    /// `execv` failed in the child.
    ImageReplacementFailed(Errno),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::LaunchFailed(reason) => write!(f, "launch failed: {reason}"),
            FailureReason::AbnormalTermination { signal: Some(sig) } => {
                write!(f, "terminated abnormally by signal {sig}")
            }
            FailureReason::AbnormalTermination { signal: None } => {
                write!(f, "did not exit normally")
            }
            FailureReason::NonZeroExit(code) => write!(f, "exited with non-zero status {code}"),
            FailureReason::RedirectSetupFailed(errno) => {
                write!(f, "stdout redirection failed: {errno}")
            }
            FailureReason::ImageReplacementFailed(errno) => write!(f, "exec failed: {errno}"),
        }
    }
}

/// Outcome of one `run` / `exec` / `exec_redirected` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success,
    Failure(FailureReason),
}

impl ExecutionOutcome {
    /// Boundary boolean: `true` only for a normal exit with code 0.
    pub fn success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success)
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            ExecutionOutcome::Success => None,
            ExecutionOutcome::Failure(reason) => Some(reason),
        }
    }

    /// Exit code, when the process exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutionOutcome::Success => Some(0),
            ExecutionOutcome::Failure(FailureReason::NonZeroExit(code)) => Some(*code),
            ExecutionOutcome::Failure(_) => None,
        }
    }

    pub(crate) fn launch_failed(reason: impl fmt::Display) -> Self {
        ExecutionOutcome::Failure(FailureReason::LaunchFailed(reason.to_string()))
    }
}

impl From<ExitStatus> for ExecutionOutcome {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => ExecutionOutcome::Success,
            Some(code) => ExecutionOutcome::Failure(FailureReason::NonZeroExit(code)),
            None => ExecutionOutcome::Failure(FailureReason::AbnormalTermination {
                signal: status.signal(),
            }),
        }
    }
}

impl From<WaitStatus> for ExecutionOutcome {
    fn from(status: WaitStatus) -> Self {
        match status {
            WaitStatus::Exited(_, 0) => ExecutionOutcome::Success,
            WaitStatus::Exited(_, code) => {
                ExecutionOutcome::Failure(FailureReason::NonZeroExit(code))
            }
            WaitStatus::Signaled(_, signal, _) => {
                ExecutionOutcome::Failure(FailureReason::AbnormalTermination {
                    signal: Some(signal as i32),
                })
            }
            _ => ExecutionOutcome::Failure(FailureReason::AbnormalTermination { signal: None }),
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Success => f.write_str("success"),
            ExecutionOutcome::Failure(reason) => reason.fmt(f),
        }
    }
}

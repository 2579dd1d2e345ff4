// src/exec/launcher.rs

//! fork + execv process launcher, with optional stdout redirection.
//!
//! Everything the child needs (C strings, the `execv` pointer array, the
//! output path) is prepared before `fork`. After `fork` the child only calls
//! async-signal-safe functions (`open`, `dup2`, `close`, `write`, `execv`,
//! `_exit`) and never returns into the caller's control flow.
//!
//! The child reports a failed redirect or a failed `execv` over a
//! close-on-exec pipe: one tag byte followed by the raw errno. EOF on that
//! pipe means `execv` succeeded.

use std::ffi::{CStr, CString};
use std::fs::File;
use std::io::Read;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, pipe2, ForkResult, Pid};

use crate::exec::{ArgumentVector, ExecutionOutcome, FailureReason};
use crate::report::{self, Diagnostic, SharedReporter};

/// Exit status of a child whose `execv` failed.
pub const EXIT_EXEC_FAILED: i32 = 127;

/// Exit status of a child that could not set up its stdout redirection.
pub const EXIT_REDIRECT_FAILED: i32 = 126;

/// rw-r--r--
const OUTPUT_FILE_MODE: libc::c_uint = 0o644;

const TAG_REDIRECT: u8 = 1;
const TAG_EXEC: u8 = 2;
const REPORT_LEN: usize = 1 + std::mem::size_of::<i32>();

/// Launches one child per call and waits for it.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    reporter: SharedReporter,
}

impl Default for ProcessLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self {
            reporter: report::noop(),
        }
    }

    pub fn with_reporter(mut self, reporter: SharedReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run `argv[0]` with `argv` as its argument list.
    pub fn exec(&self, argv: &ArgumentVector) -> ExecutionOutcome {
        self.launch(argv, None)
    }

    /// Like [`exec`](Self::exec), with the child's stdout sent to `output`
    /// (created if absent, truncated if present).
    pub fn exec_redirected(
        &self,
        output: impl AsRef<Path>,
        argv: &ArgumentVector,
    ) -> ExecutionOutcome {
        self.launch(argv, Some(output.as_ref()))
    }

    fn launch(&self, argv: &ArgumentVector, redirect: Option<&Path>) -> ExecutionOutcome {
        let display = argv.to_string();
        self.reporter.report(Diagnostic::LaunchStarted {
            argv: display.clone(),
            redirect: redirect.map(PathBuf::from),
        });

        let outcome = fork_and_exec(argv, redirect);

        self.reporter.report(Diagnostic::LaunchFinished {
            argv: display,
            outcome: outcome.clone(),
        });

        outcome
    }
}

/// Run `argv` in a child process; `true` iff it exited 0.
pub fn exec(argv: &ArgumentVector) -> bool {
    ProcessLauncher::new().exec(argv).success()
}

/// Run `argv` with stdout redirected to `output`; `true` iff it exited 0.
pub fn exec_redirected(output: impl AsRef<Path>, argv: &ArgumentVector) -> bool {
    ProcessLauncher::new().exec_redirected(output, argv).success()
}

fn fork_and_exec(argv: &ArgumentVector, redirect: Option<&Path>) -> ExecutionOutcome {
    let redirect = match redirect
        .map(|path| CString::new(path.as_os_str().as_bytes()))
        .transpose()
    {
        Ok(path) => path,
        Err(_) => {
            return ExecutionOutcome::launch_failed("output path contains an interior NUL byte");
        }
    };

    let argv_ptrs = argv.exec_pointers();

    let (report_read, report_write) = match pipe2(OFlag::O_CLOEXEC) {
        Ok(fds) => fds,
        Err(errno) => {
            return ExecutionOutcome::launch_failed(format!("creating status pipe: {errno}"));
        }
    };

    // SAFETY: the child branch only touches data prepared above and only
    // calls async-signal-safe functions before execv or _exit.
    match unsafe { fork() } {
        Ok(ForkResult::Child) => unsafe {
            exec_in_child(
                argv.program(),
                &argv_ptrs,
                redirect.as_deref(),
                report_write.as_raw_fd(),
            )
        },
        Ok(ForkResult::Parent { child }) => {
            drop(report_write);
            let child_report = read_child_report(report_read);
            let status = wait_for_child(child);

            match (child_report, status) {
                (Some(reason), _) => ExecutionOutcome::Failure(reason),
                (None, Ok(status)) => ExecutionOutcome::from(status),
                (None, Err(_)) => {
                    ExecutionOutcome::Failure(FailureReason::AbnormalTermination { signal: None })
                }
            }
        }
        Err(errno) => ExecutionOutcome::launch_failed(format!("fork failed: {errno}")),
    }
}

/// Child side of the launch. Never returns.
///
/// # Safety
///
/// Must only be called in a freshly forked child. `argv` must be a
/// null-terminated pointer array whose strings outlive the call.
unsafe fn exec_in_child(
    program: &CStr,
    argv: &[*const libc::c_char],
    redirect: Option<&CStr>,
    report_fd: RawFd,
) -> ! {
    unsafe {
        if let Some(path) = redirect {
            let fd = libc::open(
                path.as_ptr(),
                libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
                OUTPUT_FILE_MODE,
            );
            if fd < 0 {
                child_fail(report_fd, TAG_REDIRECT, Errno::last_raw(), EXIT_REDIRECT_FAILED);
            }

            if fd != libc::STDOUT_FILENO {
                if libc::dup2(fd, libc::STDOUT_FILENO) < 0 {
                    let errno = Errno::last_raw();
                    libc::close(fd);
                    child_fail(report_fd, TAG_REDIRECT, errno, EXIT_REDIRECT_FAILED);
                }
                libc::close(fd);
            }
        }

        libc::execv(program.as_ptr(), argv.as_ptr());
        child_fail(report_fd, TAG_EXEC, Errno::last_raw(), EXIT_EXEC_FAILED)
    }
}

/// Write the failure report and terminate the child without unwinding.
unsafe fn child_fail(report_fd: RawFd, tag: u8, errno: i32, exit_code: i32) -> ! {
    let mut buf = [0u8; REPORT_LEN];
    buf[0] = tag;
    buf[1..].copy_from_slice(&errno.to_ne_bytes());

    unsafe {
        libc::write(report_fd, buf.as_ptr().cast(), buf.len());
        libc::_exit(exit_code)
    }
}

/// Read the child's failure report, if any. Returns `None` on EOF, which
/// means the close-on-exec write end went away with a successful `execv`.
fn read_child_report(fd: OwnedFd) -> Option<FailureReason> {
    let mut buf = Vec::with_capacity(REPORT_LEN);
    if File::from(fd).read_to_end(&mut buf).is_err() || buf.len() != REPORT_LEN {
        return None;
    }

    let mut raw = [0u8; REPORT_LEN - 1];
    raw.copy_from_slice(&buf[1..]);
    let errno = Errno::from_raw(i32::from_ne_bytes(raw));

    match buf[0] {
        TAG_REDIRECT => Some(FailureReason::RedirectSetupFailed(errno)),
        TAG_EXEC => Some(FailureReason::ImageReplacementFailed(errno)),
        _ => None,
    }
}

/// Wait for the child to terminate, retrying on `EINTR`.
fn wait_for_child(child: Pid) -> Result<WaitStatus, Errno> {
    loop {
        match waitpid(child, None) {
            Ok(status @ (WaitStatus::Exited(..) | WaitStatus::Signaled(..))) => return Ok(status),
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(errno),
        }
    }
}

mod common;

use std::error::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;

use nix::errno::Errno;
use sysexec::exec::{self, ExecutionOutcome, FailureReason, ProcessLauncher};
use sysexec::report::Diagnostic;
use sysexec_test_utils::{init_tracing, RecordingReporter};
use tempfile::tempdir;

use common::{argv, writer_bin};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn exec_reports_exit_status() {
    init_tracing();

    assert!(exec::exec(&argv(&["/bin/sh", "-c", "exit 0"])));

    let outcome = ProcessLauncher::new().exec(&argv(&["/bin/sh", "-c", "exit 4"]));
    assert_eq!(outcome, ExecutionOutcome::Failure(FailureReason::NonZeroExit(4)));
}

#[test]
fn exec_of_missing_program_fails_in_child_only() {
    let launcher = ProcessLauncher::new();

    let outcome = launcher.exec(&argv(&["/definitely/not/a/program", "arg"]));
    assert_eq!(
        outcome,
        ExecutionOutcome::Failure(FailureReason::ImageReplacementFailed(Errno::ENOENT))
    );

    // The failed child never came back as a second copy of us: the next
    // launch behaves normally.
    assert!(launcher.exec(&argv(&["/bin/sh", "-c", "exit 0"])).success());
}

#[test]
fn exec_does_not_search_path() {
    let outcome = ProcessLauncher::new().exec(&argv(&["sh", "-c", "exit 0"]));

    assert_eq!(
        outcome,
        ExecutionOutcome::Failure(FailureReason::ImageReplacementFailed(Errno::ENOENT))
    );
}

#[test]
fn killed_child_is_abnormal_termination() {
    let outcome = ProcessLauncher::new().exec(&argv(&["/bin/sh", "-c", "kill -KILL $$"]));

    assert_eq!(
        outcome,
        ExecutionOutcome::Failure(FailureReason::AbnormalTermination {
            signal: Some(libc::SIGKILL)
        })
    );
}

#[test]
fn redirected_output_lands_in_file() -> TestResult {
    let dir = tempdir()?;
    let out = dir.path().join("out.txt");

    assert!(exec::exec_redirected(&out, &argv(&["/bin/echo", "hello"])));
    assert_eq!(fs::read_to_string(&out)?, "hello\n");

    let mode = fs::metadata(&out)?.permissions().mode() & 0o777;
    assert_eq!(mode & !0o644, 0, "unexpected mode {mode:o}");

    Ok(())
}

#[test]
fn redirect_truncates_existing_file() -> TestResult {
    let dir = tempdir()?;
    let out = dir.path().join("out.txt");
    let launcher = ProcessLauncher::new();

    fs::write(&out, "stale content that is much longer than the new output\n")?;

    let first = launcher.exec_redirected(&out, &argv(&["/bin/echo", "first run output"]));
    let second = launcher.exec_redirected(&out, &argv(&["/bin/echo", "hi"]));

    assert!(first.success());
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&out)?, "hi\n");

    Ok(())
}

#[test]
fn arguments_are_passed_without_shell_expansion() -> TestResult {
    let dir = tempdir()?;
    let out = dir.path().join("args.txt");

    let outcome =
        ProcessLauncher::new().exec_redirected(&out, &argv(&["/bin/echo", "$HOME", "*", "a b"]));

    assert!(outcome.success());
    assert_eq!(fs::read_to_string(&out)?, "$HOME * a b\n");

    Ok(())
}

#[test]
fn redirect_to_invalid_path_never_runs_target() -> TestResult {
    let dir = tempdir()?;
    let bad_output = dir.path().join("missing-dir").join("out.txt");
    let side_effect = dir.path().join("side-effect.txt");
    let side_effect_arg = side_effect.to_string_lossy().into_owned();

    let outcome = ProcessLauncher::new().exec_redirected(
        &bad_output,
        &argv(&[writer_bin(), side_effect_arg.as_str(), "should not exist"]),
    );

    assert_eq!(
        outcome,
        ExecutionOutcome::Failure(FailureReason::RedirectSetupFailed(Errno::ENOENT))
    );
    assert!(!bad_output.exists());
    assert!(!side_effect.exists(), "target ran despite failed redirect");

    Ok(())
}

#[test]
fn writer_target_runs_when_redirect_succeeds() -> TestResult {
    let dir = tempdir()?;
    let output = dir.path().join("stdout.txt");
    let target = dir.path().join("written.txt");
    let target_arg = target.to_string_lossy().into_owned();

    let outcome = ProcessLauncher::new().exec_redirected(
        &output,
        &argv(&[writer_bin(), target_arg.as_str(), "payload"]),
    );

    assert!(outcome.success());
    assert_eq!(fs::read_to_string(&target)?, "payload");
    assert_eq!(fs::read_to_string(&output)?, "");

    Ok(())
}

#[test]
fn redirect_leaves_only_stdout_pointing_at_file() -> TestResult {
    let dir = tempdir()?;
    let out = dir.path().join("fds.txt");

    let outcome = ProcessLauncher::new().exec_redirected(
        &out,
        &argv(&[
            "/bin/sh",
            "-c",
            r#"for f in /proc/$$/fd/*; do readlink "$f" || true; done"#,
        ]),
    );
    assert!(outcome.success());

    let canonical = fs::canonicalize(&out)?;
    let canonical = canonical.to_string_lossy();
    let contents = fs::read_to_string(&out)?;
    let pointing_at_output = contents.lines().filter(|line| *line == canonical).count();

    assert_eq!(pointing_at_output, 1, "descriptors:\n{contents}");

    Ok(())
}

#[test]
fn launcher_reports_start_and_finish() -> TestResult {
    let dir = tempdir()?;
    let out = dir.path().join("out.txt");
    let reporter = RecordingReporter::new();
    let launcher = ProcessLauncher::new().with_reporter(reporter.shared());

    let outcome = launcher.exec_redirected(&out, &argv(&["/bin/echo", "hello"]));

    assert_eq!(
        reporter.events(),
        vec![
            Diagnostic::LaunchStarted {
                argv: "/bin/echo hello".to_string(),
                redirect: Some(out.clone()),
            },
            Diagnostic::LaunchFinished {
                argv: "/bin/echo hello".to_string(),
                outcome,
            },
        ]
    );

    Ok(())
}

use sysexec::exec::{self, CommandRunner, ExecutionOutcome, FailureReason};
use sysexec::report::Diagnostic;
use sysexec_test_utils::{init_tracing, RecordingReporter};

#[test]
fn true_and_false_map_to_boolean() {
    init_tracing();

    assert!(exec::run("true"));
    assert!(exec::run("exit 0"));
    assert!(!exec::run("false"));
}

#[test]
fn exit_code_is_recorded_for_non_zero_exit() {
    let outcome = CommandRunner::new().run("exit 3");

    assert_eq!(outcome, ExecutionOutcome::Failure(FailureReason::NonZeroExit(3)));
    assert_eq!(outcome.exit_code(), Some(3));
    assert!(!outcome.success());
}

#[test]
fn unknown_command_fails_without_affecting_caller() {
    let outcome = CommandRunner::new().run("/definitely/not/a/real/command --flag");

    // The interpreter itself ran and reported "not found".
    assert_eq!(outcome, ExecutionOutcome::Failure(FailureReason::NonZeroExit(127)));

    // Caller is still fine and can keep running commands.
    assert!(exec::run("true"));
}

#[test]
fn missing_interpreter_is_a_launch_failure() {
    let outcome = CommandRunner::new()
        .with_shell("/definitely/not/a/shell")
        .run("true");

    match outcome {
        ExecutionOutcome::Failure(FailureReason::LaunchFailed(msg)) => {
            assert!(msg.contains("/definitely/not/a/shell"), "message: {msg}");
        }
        other => panic!("expected LaunchFailed, got {other:?}"),
    }
}

#[test]
fn killed_command_is_abnormal_termination() {
    let outcome = CommandRunner::new().run("kill -TERM $$");

    assert_eq!(
        outcome,
        ExecutionOutcome::Failure(FailureReason::AbnormalTermination {
            signal: Some(libc::SIGTERM)
        })
    );
    assert_eq!(outcome.exit_code(), None);
}

#[test]
fn repeated_runs_give_identical_outcomes() {
    let runner = CommandRunner::new();

    let first = runner.run("exit 5");
    let second = runner.run("exit 5");

    assert_eq!(first, second);
}

#[test]
fn runner_reports_start_and_finish() {
    let reporter = RecordingReporter::new();
    let runner = CommandRunner::new().with_reporter(reporter.shared());

    let outcome = runner.run("exit 2");

    assert_eq!(
        reporter.events(),
        vec![
            Diagnostic::CommandStarted {
                command: "exit 2".to_string()
            },
            Diagnostic::CommandFinished {
                command: "exit 2".to_string(),
                outcome,
            },
        ]
    );
}

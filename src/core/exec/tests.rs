// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{CohoError, ProcessError};

use super::{ExecOutcome, Executor, FailureMode, OutputMode, RunContext, is_git_commit};

fn ctx() -> RunContext {
    RunContext::new(Executor::new().with_color(false), Vec::new())
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

#[test]
fn test_outcome_helpers() {
    let empty = ExecOutcome::Output(String::new());
    assert!(empty.is_success());
    assert_eq!(empty.output(), Some(""));
    assert_eq!(empty.non_empty_output(), None);

    let failed = ExecOutcome::Failed {
        exit_code: 1,
        stderr: "boom".to_string(),
    };
    assert!(!failed.is_success());
    assert_eq!(failed.output(), None);

    assert!(ExecOutcome::Completed.is_success());
    assert_eq!(ExecOutcome::Completed.non_empty_output(), None);
}

#[test]
fn test_default_failure_mode() {
    assert_eq!(
        FailureMode::default_for(OutputMode::Captured),
        FailureMode::Tolerant
    );
    assert_eq!(
        FailureMode::default_for(OutputMode::Interactive),
        FailureMode::Fatal
    );
}

#[test]
fn test_git_commit_detection() {
    assert!(is_git_commit(&argv(&["git", "commit", "-am", "msg"])));
    assert!(!is_git_commit(&argv(&["git", "status"])));
    assert!(!is_git_commit(&argv(&["echo", "git", "commit"])));
    assert!(!is_git_commit(&argv(&["git"])));
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_captured_output_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = ctx()
        .execute(
            dir.path(),
            ["printf", "  hello \\n\\n"],
            OutputMode::Captured,
            FailureMode::Tolerant,
        )
        .await
        .unwrap();
    assert_eq!(outcome, ExecOutcome::Output("hello".to_string()));
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_empty_success_differs_from_tolerated_failure() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ctx();

    let empty = ctx
        .execute(dir.path(), ["true"], OutputMode::Captured, FailureMode::Tolerant)
        .await
        .unwrap();
    assert_eq!(empty, ExecOutcome::Output(String::new()));

    let failed = ctx
        .execute(dir.path(), ["false"], OutputMode::Captured, FailureMode::Tolerant)
        .await
        .unwrap();
    assert!(matches!(failed, ExecOutcome::Failed { exit_code: 1, .. }));

    assert_eq!(ctx.probe(dir.path(), ["false"]).await.unwrap(), None);
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_fatal_failure_is_environment_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ctx().read(dir.path(), ["false"]).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);

    let err = ctx().run(dir.path(), ["false"]).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_missing_tool_is_reported_before_spawn() {
    let dir = tempfile::tempdir().unwrap();
    let err = ctx()
        .probe(dir.path(), ["coho-missing-tool-12345", "--version"])
        .await
        .unwrap_err();
    assert!(
        matches!(&err, CohoError::Process(inner)
            if matches!(&**inner, ProcessError::ExecutableNotFound { name } if name == "coho-missing-tool-12345")),
        "{err}"
    );
    assert_eq!(err.exit_code(), 2);
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_captured_output_survives_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let out = ctx()
        .read(dir.path(), ["sh", "-c", "printf 'ok\\n\\377\\nafter\\n'"])
        .await
        .unwrap();
    assert_eq!(out, "ok\n\u{fffd}\nafter");
}

#[tokio::test]
async fn test_commit_counter_counts_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ctx();
    // Not a repository, so the commit fails, but it still counts.
    let ok = ctx
        .run_tolerant(dir.path(), ["git", "commit", "-m", "x"])
        .await
        .unwrap();
    assert!(!ok);
    let _ = ctx.probe(dir.path(), ["git", "status"]).await.unwrap();
    assert_eq!(ctx.commit_count(), 1);
}

#[test]
fn test_remote_cache() {
    let ctx = ctx();
    assert_eq!(ctx.cached_remote("ios"), None);
    ctx.remember_remote("ios", "apache");
    assert_eq!(ctx.cached_remote("ios").as_deref(), Some("apache"));
}

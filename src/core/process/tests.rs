// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::builder::{ProcessBuilder, ProcessFlags};
use crate::error::{CohoError, ProcessError};

#[cfg(not(windows))]
fn shell(script: &str) -> ProcessBuilder {
    ProcessBuilder::new("sh").args(["-c", script])
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_echo() {
    let output = ProcessBuilder::new("echo")
        .args(["hello"])
        .capture_output()
        .run()
        .await
        .expect("echo should succeed");

    assert!(output.success());
    insta::assert_snapshot!(output.stdout(), @"hello");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_exit_code_allowed() {
    let output = shell("echo oops >&2; exit 42")
        .flag(ProcessFlags::ALLOW_FAILURE)
        .capture_output()
        .run()
        .await
        .expect("process should complete");

    assert_eq!(output.exit_code(), 42);
    assert_eq!(output.stderr(), "oops");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_exit_code_fatal() {
    let err = shell("echo broken >&2; exit 3")
        .flag(ProcessFlags::QUIET_FAILURE)
        .capture_output()
        .run()
        .await
        .unwrap_err();

    match err {
        CohoError::Process(inner) => match *inner {
            ProcessError::NonZeroExit { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected process error: {other}"),
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_env_and_cwd() {
    let dir = tempfile::tempdir().unwrap();
    let output = shell("echo $COHO_TEST_VAR; pwd")
        .env("COHO_TEST_VAR", "test_value")
        .cwd(dir.path())
        .capture_stdout()
        .run()
        .await
        .expect("process should succeed");

    let lines: Vec<_> = output.stdout().lines().collect();
    assert_eq!(lines[0], "test_value");
    assert!(
        std::path::Path::new(lines[1]).ends_with(dir.path().file_name().unwrap()),
        "{lines:?}"
    );
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_large_output_is_not_truncated() {
    let output = shell("seq 1 5000")
        .capture_stdout()
        .run()
        .await
        .expect("seq should succeed");

    assert_eq!(output.stdout().lines().count(), 5000);
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_invalid_utf8_line_does_not_stop_capture() {
    let output = shell("printf '\\377\\n'; seq 1 200000")
        .capture_stdout()
        .run()
        .await
        .expect("writer should not die of a closed pipe");

    let lines: Vec<_> = output.stdout().lines().collect();
    assert_eq!(lines.len(), 200_001);
    assert_eq!(lines[0], "\u{fffd}");
    assert_eq!(lines[200_000], "200000");
}

#[tokio::test]
async fn test_missing_executable() {
    let err = ProcessBuilder::new("nonexistent_program_12345")
        .capture_output()
        .run()
        .await
        .unwrap_err();
    assert!(
        matches!(&err, CohoError::Process(inner) if matches!(**inner, ProcessError::ExecutableNotFound { .. })),
        "{err}"
    );
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_executable_lookup() {
    assert!(ProcessBuilder::exists("git"), "git should be in PATH");
    let path = ProcessBuilder::find("git").unwrap();
    assert!(path.is_absolute() && path.exists(), "{}", path.display());
    assert_eq!(ProcessBuilder::find("git"), Some(path));

    assert!(!ProcessBuilder::exists("nonexistent_program_12345"));
}

#[test]
fn test_command_line_quotes_spaces() {
    let builder = ProcessBuilder::new("git")
        .args(["stash", "save", "--all", "--quiet", "coho stash"]);
    insta::assert_snapshot!(builder.command_line(), @r#"git stash save --all --quiet "coho stash""#);
}

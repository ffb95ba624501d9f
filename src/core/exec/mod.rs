// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command execution for repository operations.
//!
//! ```text
//! RunContext::execute(cwd, argv, OutputMode, FailureMode)
//!        |
//!        +-- "git commit ..." --> commits += 1
//!        v
//! Executor::execute
//!        |  program not on PATH --> ProcessError::ExecutableNotFound (exit 2)
//!        |
//!   +----+-------------+
//!   |                  |
//!   v                  v
//! Interactive        Captured
//! inherit stdio      capture stdout/stderr
//! -c color.ui=always GIT_TERMINAL_PROMPT=0
//! "Executing: ..."   stdout trimmed
//!   |                  |
//!   v                  v
//! Completed        Output(String)
//!        \        /
//!         v      v
//!   non-zero exit: Fatal    --> ProcessError::NonZeroExit (exit 2)
//!                  Tolerant --> ExecOutcome::Failed { exit_code, stderr }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info};

use crate::core::process::builder::{ProcessBuilder, ProcessFlags};
use crate::error::{CohoError, CohoResult, ProcessError};

/// How a command's output is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Inherit the terminal; the operator sees the output live.
    Interactive,
    /// Buffer stdout and hand it back trimmed.
    Captured,
}

/// What a non-zero exit means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Non-zero exit terminates the run.
    Fatal,
    /// Non-zero exit is reported as [`ExecOutcome::Failed`].
    Tolerant,
}

impl FailureMode {
    /// Default failure handling: probes are tolerant, visible commands are fatal.
    #[must_use]
    pub const fn default_for(output: OutputMode) -> Self {
        match output {
            OutputMode::Captured => Self::Tolerant,
            OutputMode::Interactive => Self::Fatal,
        }
    }
}

/// Result of running one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Captured command succeeded; trimmed stdout, possibly empty.
    Output(String),
    /// Interactive command succeeded.
    Completed,
    /// Command failed and the failure was tolerated.
    Failed { exit_code: i32, stderr: String },
}

impl ExecOutcome {
    /// Whether the command exited successfully.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Captured output of a successful command.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Output(out) => Some(out),
            _ => None,
        }
    }

    /// Captured output if the command succeeded and printed something.
    #[must_use]
    pub fn non_empty_output(&self) -> Option<&str> {
        self.output().filter(|out| !out.is_empty())
    }
}

/// Spawns external commands.
#[derive(Debug, Clone)]
pub struct Executor {
    color: bool,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    #[must_use]
    pub const fn new() -> Self {
        Self { color: true }
    }

    /// Controls whether interactive git commands force colored output.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Runs `argv` in `cwd`.
    ///
    /// # Errors
    ///
    /// Returns `ExecutableNotFound` before spawning when a bare program name
    /// is not on PATH, another `ProcessError` if the program cannot be
    /// spawned, or `NonZeroExit` under [`FailureMode::Fatal`].
    pub async fn execute(
        &self,
        cwd: &Path,
        argv: &[String],
        output: OutputMode,
        failure: FailureMode,
    ) -> CohoResult<ExecOutcome> {
        let Some((program, args)) = argv.split_first() else {
            return Err(CohoError::Other("empty command line".into()));
        };
        if Path::new(program).components().count() == 1 && !ProcessBuilder::exists(program) {
            return Err(ProcessError::ExecutableNotFound {
                name: program.clone(),
            }
            .into());
        }
        let is_git = program == "git";
        let mut builder = ProcessBuilder::new(program).cwd(cwd);

        match output {
            OutputMode::Interactive => {
                if is_git && self.color {
                    builder = builder.args(["-c", "color.ui=always"]);
                }
                builder = builder
                    .args(args)
                    .inherit_stdio()
                    .flag(ProcessFlags::ALLOW_FAILURE);
                let command = builder.command_line();
                info!("Executing: {command}");

                let out = builder.run().await?;
                if out.success() {
                    Ok(ExecOutcome::Completed)
                } else if failure == FailureMode::Fatal {
                    Err(ProcessError::NonZeroExit {
                        command,
                        code: out.exit_code(),
                        stderr: String::new(),
                    }
                    .into())
                } else {
                    Ok(ExecOutcome::Failed {
                        exit_code: out.exit_code(),
                        stderr: String::new(),
                    })
                }
            }
            OutputMode::Captured => {
                if is_git {
                    builder = builder
                        .env("GCM_INTERACTIVE", "never")
                        .env("GIT_TERMINAL_PROMPT", "0");
                }
                builder = builder.args(args).capture_output();
                if failure == FailureMode::Tolerant {
                    builder = builder.flag(ProcessFlags::ALLOW_FAILURE | ProcessFlags::QUIET_FAILURE);
                }

                let out = builder.run().await?;
                if out.success() {
                    Ok(ExecOutcome::Output(out.stdout().trim().to_string()))
                } else {
                    debug!(exit_code = out.exit_code(), stderr = %out.stderr(), "tolerated failure");
                    Ok(ExecOutcome::Failed {
                        exit_code: out.exit_code(),
                        stderr: out.stderr().to_string(),
                    })
                }
            }
        }
    }
}

/// Run-scoped state shared by every command of one invocation.
///
/// Holds the executor, the count of `git commit` invocations and the
/// upstream remote resolved for each repository id.
#[derive(Debug)]
pub struct RunContext {
    executor: Executor,
    commits: AtomicUsize,
    remotes: Mutex<BTreeMap<String, String>>,
    upstream_prefixes: Vec<String>,
}

impl RunContext {
    #[must_use]
    pub fn new(executor: Executor, upstream_prefixes: Vec<String>) -> Self {
        Self {
            executor,
            commits: AtomicUsize::new(0),
            remotes: Mutex::new(BTreeMap::new()),
            upstream_prefixes,
        }
    }

    /// Runs a command in `cwd`, counting it if it is a `git commit`.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`].
    pub async fn execute<I, S>(
        &self,
        cwd: &Path,
        argv: I,
        output: OutputMode,
        failure: FailureMode,
    ) -> CohoResult<ExecOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let argv: Vec<String> = argv.into_iter().map(|a| a.as_ref().to_string()).collect();
        if is_git_commit(&argv) {
            self.commits.fetch_add(1, Ordering::Relaxed);
        }
        self.executor.execute(cwd, &argv, output, failure).await
    }

    /// Runs a visible command; non-zero exit is fatal.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`].
    pub async fn run<I, S>(&self, cwd: &Path, argv: I) -> CohoResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.execute(cwd, argv, OutputMode::Interactive, FailureMode::Fatal)
            .await
            .map(drop)
    }

    /// Runs a visible command and reports whether it succeeded.
    ///
    /// # Errors
    ///
    /// Only spawn failures are errors.
    pub async fn run_tolerant<I, S>(&self, cwd: &Path, argv: I) -> CohoResult<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let outcome = self
            .execute(cwd, argv, OutputMode::Interactive, FailureMode::Tolerant)
            .await?;
        Ok(outcome.is_success())
    }

    /// Runs a probe and returns its output if it succeeded and printed something.
    ///
    /// # Errors
    ///
    /// Only spawn failures are errors.
    pub async fn probe<I, S>(&self, cwd: &Path, argv: I) -> CohoResult<Option<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let outcome = self
            .execute(cwd, argv, OutputMode::Captured, FailureMode::Tolerant)
            .await?;
        Ok(outcome.non_empty_output().map(str::to_string))
    }

    /// Runs a captured command whose failure is fatal and returns its output.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`].
    pub async fn read<I, S>(&self, cwd: &Path, argv: I) -> CohoResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let outcome = self
            .execute(cwd, argv, OutputMode::Captured, FailureMode::Fatal)
            .await?;
        Ok(outcome.output().unwrap_or_default().to_string())
    }

    /// Number of `git commit` commands executed so far.
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::Relaxed)
    }

    /// URL fragments that identify the canonical upstream.
    #[must_use]
    pub fn upstream_prefixes(&self) -> &[String] {
        &self.upstream_prefixes
    }

    pub(crate) fn cached_remote(&self, repo_id: &str) -> Option<String> {
        self.remotes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(repo_id)
            .cloned()
    }

    pub(crate) fn remember_remote(&self, repo_id: &str, remote: &str) {
        self.remotes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(repo_id.to_string(), remote.to_string());
    }
}

fn is_git_commit(argv: &[String]) -> bool {
    matches!(argv, [program, sub, ..] if program == "git" && sub == "commit")
}

#[cfg(test)]
mod tests;

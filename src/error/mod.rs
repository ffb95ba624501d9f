// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              CohoError (~24 bytes)
//!                     |
//!   +------+------+-------+-------+-------+
//!   |      |      |       |       |       |
//!   v      v      v       v       v       v
//! Repo    Git   Process  Config Release Io/Other
//! Box     Box    Box      Box    Box    Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Repo     InvalidSelector, RepoNotCloned, GroupCycle
//!   Git      NoUpstreamRemote, DetachedHead, RebaseFailed, CommandFailed
//!   Process  ExecutableNotFound, SpawnFailed, NonZeroExit
//!   Config   ParseError, InvalidValue
//!   Release  InvalidVersion, BranchMismatch, MissingReleaseBranch
//!
//! Exit codes:
//!   0  success
//!   1  user/configuration error (operator must change the invocation)
//!   2  environment/setup error (operator must fix the workspace)
//! ```

use std::process::ExitCode;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`CohoError`].
pub type CohoResult<T> = std::result::Result<T, CohoError>;

/// Exit code for user and configuration errors.
pub const EXIT_USAGE: u8 = 1;

/// Exit code for environment and setup errors.
pub const EXIT_ENVIRONMENT: u8 = 2;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum CohoError {
    /// Repository selection or traversal failed.
    #[error("{0}")]
    Repo(Box<RepoError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(Box<GitError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(Box<ProcessError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(Box<ConfigError>),

    /// Release preparation error.
    #[error("release error: {0}")]
    Release(Box<ReleaseError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl CohoError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Repo(err) => match **err {
                RepoError::InvalidSelector { .. } | RepoError::GroupCycle { .. } => EXIT_USAGE,
                RepoError::RepoNotCloned { .. } => EXIT_ENVIRONMENT,
            },
            Self::Git(err) => match **err {
                GitError::RebaseFailed { .. } => EXIT_USAGE,
                _ => EXIT_ENVIRONMENT,
            },
            Self::Config(_) | Self::Release(_) => EXIT_USAGE,
            Self::Process(_) | Self::Io(_) | Self::Other(_) => EXIT_ENVIRONMENT,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for CohoError {
                fn from(err: $error) -> Self {
                    CohoError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    RepoError => Repo,
    GitError => Git,
    ProcessError => Process,
    ConfigError => Config,
    ReleaseError => Release,
    std::io::Error => Io,
}

/// Numeric exit status for an error chain.
///
/// The first [`CohoError`] found in the chain decides; anything else is
/// treated as an environment failure.
#[must_use]
pub fn exit_status(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CohoError>())
        .map_or(EXIT_ENVIRONMENT, CohoError::exit_code)
}

/// Maps an error chain to the process exit code.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}

// --- Repo Errors ---

/// Repository selection and traversal errors.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Selector token is neither a repo id nor a group name.
    #[error("invalid repo value: {token}\nUse the list-repos command to see valid values.")]
    InvalidSelector { token: String },

    /// Repository directory is missing from the workspace.
    #[error("repo directory does not exist: {repo_name}. First run coho repo-clone.")]
    RepoNotCloned { repo_name: String },

    /// A group (transitively) references itself.
    #[error("repo group '{group}' references itself")]
    GroupCycle { group: String },
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// gix has multiple error types that are converted through this enum.
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository from path.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// No configured remote points at the canonical upstream.
    #[error("could not find an upstream remote for repo {repo_name}")]
    NoUpstreamRemote { repo_name: String },

    /// HEAD is detached where a named branch is required.
    #[error("aborted due to repo {path} not being on a named branch")]
    DetachedHead { path: String },

    /// Rebasing a stale branch onto its remote counterpart failed.
    #[error(
        "update failed: rebase of {branch} in {repo_name} did not complete{}. \
         Run again with --no-fetch to try again without re-fetching.",
        updated_suffix(updated)
    )]
    RebaseFailed {
        repo_name: String,
        branch: String,
        updated: Vec<String>,
    },
}

fn updated_suffix(updated: &[String]) -> String {
    if updated.is_empty() {
        String::new()
    } else {
        format!(" (already updated: {})", updated.join(", "))
    }
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}{}", stderr_suffix(stderr))]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{stderr}")
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Release Errors ---

/// Release command errors.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Version string is not of the form `#.#.#[-rc#]`.
    #[error("versions must be in the form #.#.#-[rc#], got '{version}'")]
    InvalidVersion { version: String },

    /// Paired flag lists differ in length.
    #[error("must specify the same number of --{left} and --{right} flags")]
    FlagCountMismatch { left: String, right: String },

    /// Release branch has not been pushed upstream.
    #[error("release branch {branch} does not exist for repo {repo_name}")]
    MissingReleaseBranch { repo_name: String, branch: String },

    /// A file copy for the JS snapshot failed.
    #[error("copy failed: {from} -> {to}")]
    CopyFailed { from: String, to: String },
}

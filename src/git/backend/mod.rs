// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read) --> GixBackend (pure Rust gix)
//! mutations       --> git CLI through RunContext (see cmd.rs)
//! ```

use crate::error::{CohoResult, GitError, GixError};
use std::path::Path;

/// Read-only git query operations.
///
/// Implementors inspect repository state without modifying it.
pub trait GitQuery {
    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn current_branch(path: &Path) -> CohoResult<Option<String>>;

    /// Check for uncommitted changes (staged, unstaged, or untracked files).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or status check fails.
    fn has_uncommitted_changes(path: &Path) -> CohoResult<bool>;

    /// Object id `refs/stash` points at, if any.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or reference lookup fails.
    fn stash_tip(path: &Path) -> CohoResult<Option<String>>;
}

/// Pure Rust git backend using gix.
///
/// Read-only; never spawns a subprocess.
pub struct GixBackend;

fn discover(path: &Path) -> CohoResult<gix::Repository> {
    Ok(gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?)
}

fn status_failed(message: &str) -> GitError {
    GitError::CommandFailed {
        command: "status".to_string(),
        message: message.to_string(),
    }
}

impl GitQuery for GixBackend {
    fn current_branch(path: &Path) -> CohoResult<Option<String>> {
        let repo = discover(path)?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn has_uncommitted_changes(path: &Path) -> CohoResult<bool> {
        use gix::status::UntrackedFiles;

        let repo = discover(path)?;
        let has_changes = repo
            .status(gix::progress::Discard)
            .map_err(|_| status_failed("failed to prepare status check"))?
            .untracked_files(UntrackedFiles::Files)
            .into_iter(None)
            .map_err(|_| status_failed("failed to check repository status"))?
            .next()
            .is_some();

        Ok(has_changes)
    }

    fn stash_tip(path: &Path) -> CohoResult<Option<String>> {
        let repo = discover(path)?;

        // refs/stash exists iff there are stashed changes
        match repo.find_reference("refs/stash") {
            Ok(reference) => Ok(reference.target().try_id().map(|id| id.to_hex().to_string())),
            Err(gix::reference::find::existing::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(GitError::Gix(GixError::Head(e)).into()),
        }
    }
}

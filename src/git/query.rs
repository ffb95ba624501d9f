// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git query operations using gix backend.
//!
//! ```text
//! query.rs --> GixBackend --> .git/ (no subprocess)
//! ```

use crate::error::{CohoResult, GitError};
use std::path::Path;

use super::backend::{GitQuery, GixBackend};

/// Get current branch name (None if HEAD is detached).
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or head resolution fails.
pub fn current_branch(path: &Path) -> CohoResult<Option<String>> {
    GixBackend::current_branch(path)
}

/// Current branch name; a detached HEAD is an error.
///
/// # Errors
///
/// Returns `DetachedHead` naming `path` when HEAD is not on a branch.
pub fn require_branch(path: &Path) -> CohoResult<String> {
    current_branch(path)?.ok_or_else(|| {
        GitError::DetachedHead {
            path: path.display().to_string(),
        }
        .into()
    })
}

/// Check for uncommitted changes (staged, unstaged, or untracked files).
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or status check fails.
pub fn has_uncommitted_changes(path: &Path) -> CohoResult<bool> {
    GixBackend::has_uncommitted_changes(path)
}

/// Object id of the most recent stash entry.
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or reference lookup fails.
pub fn stash_tip(path: &Path) -> CohoResult<Option<String>> {
    GixBackend::stash_tip(path)
}

// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stash guard around branch-mutating work.
//!
//! ```text
//! protect(ctx, dir, body)
//!   dirty?  branch = HEAD (named branch required)
//!   dirty --> git stash save --all --quiet "coho stash"
//!             stashed = refs/stash moved
//!   body()
//!   HEAD != branch --> git checkout -q <branch>
//!   stashed --> git stash pop
//!
//! body failed and checkout impossible (rebase in progress):
//!   stash left in place, warning, body error returned
//! ```

use std::path::Path;

use tracing::{debug, warn};

use crate::core::exec::RunContext;
use crate::error::{CohoResult, GitError, Result};
use crate::repo::RepoDir;

use super::query;

/// Message of the stash entry created by [`protect`].
pub const STASH_MESSAGE: &str = "coho stash";

/// Runs `body` with local modifications stashed away, then restores the
/// original branch and the modifications.
///
/// Nested guards on the same repository see a clean tree and only restore
/// the branch.
///
/// # Errors
///
/// Returns `DetachedHead` when HEAD is not on a branch, the error of `body`,
/// or a restore failure when `body` succeeded.
pub async fn protect<T, F>(ctx: &RunContext, dir: &RepoDir, body: F) -> Result<T>
where
    F: AsyncFnOnce() -> Result<T>,
{
    let cwd = dir.path();
    let dirty = query::has_uncommitted_changes(cwd)?;
    let branch = query::require_branch(cwd)?;
    debug!(%branch, dirty, "entering stash guard");

    let mut stashed = false;
    if dirty {
        let before = query::stash_tip(cwd)?;
        ctx.run(
            cwd,
            ["git", "stash", "save", "--all", "--quiet", STASH_MESSAGE],
        )
        .await?;
        // An older entry must never be popped in place of ours.
        stashed = query::stash_tip(cwd)? != before;
    }

    let result = body().await;
    let restored = restore(ctx, cwd, &branch, stashed).await;

    match (result, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(restore_err)) => {
            warn!(error = %restore_err, "could not restore repository state");
            Err(e)
        }
    }
}

async fn restore(ctx: &RunContext, cwd: &Path, branch: &str, stashed: bool) -> CohoResult<()> {
    let current = query::current_branch(cwd).unwrap_or(None);
    if current.as_deref() != Some(branch)
        && !ctx
            .run_tolerant(cwd, ["git", "checkout", "-q", branch])
            .await?
    {
        if stashed {
            warn!(
                stash = STASH_MESSAGE,
                path = %cwd.display(),
                "local changes were left in the stash; run `git stash pop` once the repository is clean"
            );
        }
        return Err(GitError::CommandFailed {
            command: format!("git checkout -q {branch}"),
            message: "could not return to the original branch".to_string(),
        }
        .into());
    }

    if stashed && !ctx.run_tolerant(cwd, ["git", "stash", "pop"]).await? {
        return Err(GitError::CommandFailed {
            command: "git stash pop".to_string(),
            message: format!("local changes remain in the stash entry \"{STASH_MESSAGE}\""),
        }
        .into());
    }
    Ok(())
}

// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch synchronization.
//!
//! ```text
//! update(repos, branches, skip_fetch)
//!   pass 1  every git repo: named branch?  resolve upstream remote
//!   pass 2  every git repo: git fetch --progress [--tags] <remote>   (unless skip_fetch)
//!   pass 3  every repo (only when branches given):
//!             svn  --> svn up
//!             git  --> stale = [b | <remote>/<b> exists, b..<remote>/<b> non-empty]
//!                      []    --> "Confirmed already up-to-date"
//!                      else  --> protect { checkout b; git rebase <remote>/<b> }
//!                                rebase fails --> RebaseFailed, run stops
//! ```

use std::path::Path;

use tracing::info;

use crate::core::exec::RunContext;
use crate::error::{CohoError, CohoResult, GitError, Result};
use crate::repo::{RepoDescriptor, RepoDir};

use super::remote::{ResolvedRepo, resolve_remote};
use super::{cmd, query, stash};

/// A repository whose branches were rebased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedRepo {
    pub repo_name: String,
    pub branches: Vec<String>,
}

/// Outcome of [`update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Repositories with nothing to rebase.
    pub up_to_date: Vec<String>,
    /// Repositories with at least one rebased branch.
    pub updated: Vec<UpdatedRepo>,
}

impl UpdateReport {
    fn updated_names(&self) -> Vec<String> {
        self.updated.iter().map(|u| u.repo_name.clone()).collect()
    }
}

/// Brings `branches` of every repository up to date with upstream.
///
/// With an empty branch list only remotes are resolved and fetched.
///
/// # Errors
///
/// Returns `DetachedHead`, `NoUpstreamRemote` or a fetch failure from the
/// first two passes, and `RebaseFailed` when a rebase does not complete.
pub async fn update(
    ctx: &RunContext,
    root: &RepoDir,
    repos: &[&RepoDescriptor],
    branches: &[String],
    skip_fetch: bool,
) -> Result<UpdateReport> {
    root.for_each(repos, async |repo, dir| {
        if !repo.is_git() {
            return Ok(());
        }
        query::require_branch(dir.path())?;
        resolve_remote(ctx, repo, dir.path()).await?;
        Ok(())
    })
    .await?;

    if !skip_fetch {
        root.for_each(repos, async |repo, dir| {
            if !repo.is_git() {
                return Ok(());
            }
            let upstream = resolve_remote(ctx, repo, dir.path()).await?;
            cmd::fetch(ctx, dir.path(), &upstream.remote).await?;
            Ok(())
        })
        .await?;
    }

    let mut report = UpdateReport::default();
    if branches.is_empty() {
        return Ok(report);
    }

    root.for_each(repos, async |repo, dir| {
        if !repo.is_git() {
            ctx.run(dir.path(), ["svn", "up"]).await?;
            return Ok(());
        }

        let upstream = resolve_remote(ctx, repo, dir.path()).await?;
        let stale = stale_branches(ctx, dir.path(), &upstream, branches).await?;
        if stale.is_empty() {
            info!("Confirmed already up-to-date: {}", repo.repo_name());
            report.up_to_date.push(repo.repo_name().to_string());
            return Ok(());
        }

        info!("Updating {}", repo.repo_name());
        let already_updated = report.updated_names();
        stash::protect(ctx, dir, async || {
            for branch in &stale {
                cmd::checkout_if_different(ctx, dir.path(), branch).await?;
                let onto = upstream.tracking(branch);
                if !ctx
                    .run_tolerant(dir.path(), ["git", "rebase", onto.as_str()])
                    .await?
                {
                    return Err(CohoError::from(GitError::RebaseFailed {
                        repo_name: repo.repo_name().to_string(),
                        branch: branch.clone(),
                        updated: already_updated.clone(),
                    })
                    .into());
                }
            }
            Ok(())
        })
        .await?;

        report.updated.push(UpdatedRepo {
            repo_name: repo.repo_name().to_string(),
            branches: stale,
        });
        Ok(())
    })
    .await?;

    Ok(report)
}

/// Requested branches whose remote counterpart has commits missing locally.
///
/// # Errors
///
/// Only spawn failures are errors.
pub async fn stale_branches(
    ctx: &RunContext,
    cwd: &Path,
    upstream: &ResolvedRepo<'_>,
    branches: &[String],
) -> CohoResult<Vec<String>> {
    let mut stale = Vec::new();
    for branch in branches {
        if !cmd::remote_branch_exists(ctx, cwd, &upstream.remote, branch).await? {
            continue;
        }
        let missing = cmd::commits_between(ctx, cwd, branch, &upstream.tracking(branch)).await?;
        if missing.is_some() && !stale.contains(branch) {
            stale.push(branch.clone());
        }
    }
    Ok(stale)
}

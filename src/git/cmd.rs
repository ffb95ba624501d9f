// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git CLI helpers on top of [`RunContext`].
//!
//! ```text
//! probes (captured, tolerant)        mutations (interactive, fatal)
//!   local_branch_exists                checkout_if_different
//!   remote_branch_exists               fetch
//!   commits_between
//!   tag_exists / describe_head
//! ```
//!
//! A probe that fails or prints nothing answers "no".

use std::path::Path;

use crate::core::exec::RunContext;
use crate::error::CohoResult;

use super::query;

/// Checks out `branch` unless it is already current.
///
/// # Errors
///
/// Returns an error if the checkout fails.
pub async fn checkout_if_different(ctx: &RunContext, cwd: &Path, branch: &str) -> CohoResult<()> {
    if query::current_branch(cwd)?.as_deref() != Some(branch) {
        ctx.run(cwd, ["git", "checkout", "-q", branch]).await?;
    }
    Ok(())
}

/// Whether a local branch named `branch` exists.
///
/// # Errors
///
/// Only spawn failures are errors.
pub async fn local_branch_exists(ctx: &RunContext, cwd: &Path, branch: &str) -> CohoResult<bool> {
    Ok(ctx
        .probe(cwd, ["git", "branch", "--list", branch])
        .await?
        .is_some())
}

/// Whether `<remote>/<branch>` exists as a remote tracking branch.
///
/// # Errors
///
/// Only spawn failures are errors.
pub async fn remote_branch_exists(
    ctx: &RunContext,
    cwd: &Path,
    remote: &str,
    branch: &str,
) -> CohoResult<bool> {
    let tracking = format!("{remote}/{branch}");
    Ok(ctx
        .probe(cwd, ["git", "branch", "-r", "--list", &tracking])
        .await?
        .is_some())
}

/// One-line log of commits reachable from `to` but not from `from`.
///
/// # Errors
///
/// Only spawn failures are errors.
pub async fn commits_between(
    ctx: &RunContext,
    cwd: &Path,
    from: &str,
    to: &str,
) -> CohoResult<Option<String>> {
    let range = format!("{from}..{to}");
    ctx.probe(cwd, ["git", "log", "--oneline", &range]).await
}

/// Whether the tag exists locally.
///
/// # Errors
///
/// Only spawn failures are errors.
pub async fn tag_exists(ctx: &RunContext, cwd: &Path, tag: &str) -> CohoResult<bool> {
    Ok(ctx
        .probe(cwd, ["git", "tag", "--list", tag])
        .await?
        .is_some())
}

/// `git describe --tags HEAD`: the tag name when HEAD is tagged, otherwise
/// the tag plus commit info.
///
/// # Errors
///
/// Only spawn failures are errors.
pub async fn describe_head(ctx: &RunContext, cwd: &Path) -> CohoResult<Option<String>> {
    ctx.probe(cwd, ["git", "describe", "--tags", "HEAD"]).await
}

/// Most recent tag reachable from HEAD.
///
/// # Errors
///
/// Only spawn failures are errors.
pub async fn most_recent_tag(ctx: &RunContext, cwd: &Path) -> CohoResult<Option<String>> {
    ctx.probe(cwd, ["git", "describe", "--tags", "--abbrev=0", "HEAD"])
        .await
}

/// Fetches branches, then tags, from `remote`.
///
/// # Errors
///
/// Returns an error if either fetch fails.
pub async fn fetch(ctx: &RunContext, cwd: &Path, remote: &str) -> CohoResult<()> {
    ctx.run(cwd, ["git", "fetch", "--progress", remote]).await?;
    ctx.run(cwd, ["git", "fetch", "--progress", "--tags", remote])
        .await
}

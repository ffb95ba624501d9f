// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository maintenance commands.
//!
//! ```text
//! repo-clone   missing dir --> git clone --progress <prefix><name>.git | svn checkout
//! repo-update  clone missing (quiet) --> update(branches, skip_fetch)
//! repo-status  update([]) --> git log target..b, git status --short [, git diff target...b]
//! repo-reset   update([]) --> [protect] { remote b: reset --hard | local-only b: branch -D }
//! repo-push    update(branches) --> push --set-upstream (new) | push (ahead) | nothing
//! foreach      <command> in every repo, failures tolerated
//! ```

#[cfg(test)]
mod tests;

use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use crate::cli::repo::{ForeachArgs, RepoBranchArgs, RepoSelection, RepoStatusArgs, RepoUpdateArgs};
use crate::core::exec::RunContext;
use crate::error::{CohoError, CohoResult, ReleaseError, Result};
use crate::git::remote::{ResolvedRepo, resolve_remote};
use crate::git::{cmd, query, stash, sync};
use crate::repo::{RepoDescriptor, RepoKind};

use super::Workspace;

const DIFF_BANNER: &str =
    "------------------------------------------------------------------------------";

/// Clones every repository whose directory is missing.
///
/// Returns the number of repositories cloned.
///
/// # Errors
///
/// Returns an error if a clone fails.
pub async fn clone_repos(ws: &Workspace, repos: &[&RepoDescriptor], quiet: bool) -> Result<usize> {
    let root = ws.root.path();
    let mut cloned = 0;
    for repo in repos {
        if root.join(repo.repo_name()).is_dir() {
            if !quiet {
                info!("Repo already cloned: {}", repo.repo_name());
            }
            continue;
        }
        match repo.kind() {
            RepoKind::Svn { url } => {
                ws.ctx
                    .run(root, ["svn", "checkout", url.as_str(), repo.repo_name()])
                    .await?;
            }
            RepoKind::Git => {
                let url = format!(
                    "{}{}.git",
                    ws.config.upstream.clone_url_prefix,
                    repo.repo_name()
                );
                ws.ctx
                    .run(root, ["git", "clone", "--progress", &url, repo.repo_name()])
                    .await?;
            }
        }
        cloned += 1;
    }

    if cloned > 0 {
        info!("Successfully cloned {cloned} repositories.");
    }
    Ok(cloned)
}

/// Main handler for `repo-clone`.
///
/// # Errors
///
/// Returns an error for an invalid selection or a failed clone.
pub async fn run_clone_command(ws: &Workspace, args: &RepoSelection) -> Result<()> {
    let repos = ws.select(&args.repos)?;
    clone_repos(ws, &repos, false).await?;
    Ok(())
}

/// Main handler for `repo-update`.
///
/// # Errors
///
/// Returns an error for an invalid selection, a failed clone or fetch, or a
/// rebase that did not complete.
pub async fn run_update_command(ws: &Workspace, args: &RepoUpdateArgs) -> Result<()> {
    let repos = ws.select(&args.selection.repos)?;
    let branches = args.branches.or_defaults(ws.default_branches());

    clone_repos(ws, &repos, true).await?;
    let report = sync::update(&ws.ctx, &ws.root, &repos, &branches, args.no_fetch).await?;
    tracing::debug!(
        up_to_date = report.up_to_date.len(),
        updated = report.updated.len(),
        "update finished"
    );
    Ok(())
}

/// Branches `repo-status` reports on when none are given.
fn status_branches(repo: &RepoDescriptor, requested: &[String]) -> Vec<String> {
    if !requested.is_empty() {
        requested.to_vec()
    } else if repo.is_plugin() {
        vec!["dev".to_string(), "master".to_string()]
    } else {
        vec!["master".to_string()]
    }
}

/// What `branch` is compared against: `--branch2`, else the remote
/// counterpart, else `master`.
async fn comparison_target(
    ctx: &RunContext,
    cwd: &Path,
    upstream: &ResolvedRepo<'_>,
    branch: &str,
    explicit: Option<&str>,
) -> CohoResult<String> {
    if let Some(target) = explicit {
        return Ok(target.to_string());
    }
    if cmd::remote_branch_exists(ctx, cwd, &upstream.remote, branch).await? {
        Ok(upstream.tracking(branch))
    } else {
        Ok("master".to_string())
    }
}

/// Report lines for `repo-status`.
///
/// # Errors
///
/// Returns `FlagCountMismatch` before touching any repository when the
/// `--branch` and `--branch2` counts differ.
pub async fn status_report(
    ws: &Workspace,
    repos: &[&RepoDescriptor],
    args: &RepoStatusArgs,
) -> Result<Vec<String>> {
    let branches = &args.branches.branches;
    if !args.branch2.is_empty() && args.branch2.len() != branches.len() {
        return Err(CohoError::from(ReleaseError::FlagCountMismatch {
            left: "branch".to_string(),
            right: "branch2".to_string(),
        })
        .into());
    }

    let ctx = &ws.ctx;
    let mut lines = Vec::new();
    ws.root
        .for_each(repos, async |repo, dir| {
            if !repo.is_git() {
                lines.push(format!(
                    "{}: repo-status not implemented for svn repos",
                    repo.repo_name()
                ));
                return Ok(());
            }
            let cwd = dir.path();
            sync::update(ctx, dir, &[repo], &[], true).await?;
            let upstream = resolve_remote(ctx, repo, cwd).await?;

            for (i, branch) in status_branches(repo, branches).iter().enumerate() {
                if !cmd::local_branch_exists(ctx, cwd, branch).await? {
                    continue;
                }
                let explicit = args.branch2.get(i).map(String::as_str);
                let target = comparison_target(ctx, cwd, &upstream, branch, explicit).await?;
                let range = format!("{target}..{branch}");
                if let Some(changes) = ctx
                    .probe(cwd, ["git", "log", "--no-merges", "--oneline", &range])
                    .await?
                {
                    lines.push(format!(
                        "{}: Local commits exist on {branch}:",
                        repo.repo_name()
                    ));
                    lines.extend(changes.lines().map(str::to_string));
                }
            }

            if let Some(status) = ctx.probe(cwd, ["git", "status", "--short"]).await? {
                lines.push(format!("{}: Uncommitted changes:", repo.repo_name()));
                lines.extend(status.lines().map(str::to_string));
            }
            Ok(())
        })
        .await?;

    if args.diff {
        ws.root
            .for_each(repos, async |repo, dir| {
                if !repo.is_git() {
                    return Ok(());
                }
                let cwd = dir.path();
                let upstream = resolve_remote(ctx, repo, cwd).await?;
                for (i, branch) in status_branches(repo, branches).iter().enumerate() {
                    if !cmd::local_branch_exists(ctx, cwd, branch).await? {
                        continue;
                    }
                    let explicit = args.branch2.get(i).map(String::as_str);
                    let target = comparison_target(ctx, cwd, &upstream, branch, explicit).await?;
                    let range = format!("{target}...{branch}");
                    if let Some(diff) = ctx.probe(cwd, ["git", "diff", &range]).await? {
                        lines.push(DIFF_BANNER.to_string());
                        lines.push(format!(
                            "Diff for {} on branch {branch} (vs {target})",
                            repo.repo_name()
                        ));
                        lines.push(DIFF_BANNER.to_string());
                        lines.extend(diff.lines().map(str::to_string));
                        lines.push(String::new());
                    }
                }
                Ok(())
            })
            .await?;
    }

    Ok(lines)
}

/// Main handler for `repo-status`.
///
/// # Errors
///
/// See [`status_report`].
pub async fn run_status_command(ws: &Workspace, args: &RepoStatusArgs) -> Result<()> {
    let repos = ws.select(&args.selection.repos)?;
    for line in status_report(ws, &repos, args).await? {
        println!("{line}");
    }
    Ok(())
}

/// Resets `branches` of every repository to their upstream state.
///
/// # Errors
///
/// Returns an error if a repository has no upstream remote, is on a
/// detached HEAD, or a git command fails.
pub async fn reset_repos(ws: &Workspace, repos: &[&RepoDescriptor], branches: &[String]) -> Result<()> {
    let ctx = &ws.ctx;
    ws.root
        .for_each(repos, async |repo, dir| {
            if !repo.is_git() {
                warn!(repo = %repo.repo_name(), "repo-reset skips svn repos");
                return Ok(());
            }
            let cwd = dir.path();
            sync::update(ctx, dir, &[repo], &[], true).await?;
            let upstream = resolve_remote(ctx, repo, cwd).await?;
            let current = query::require_branch(cwd)?;

            if branches.contains(&current) {
                ctx.run(cwd, ["git", "clean", "-f", "-d"]).await?;
                reset_branches(ctx, cwd, &upstream, branches).await
            } else {
                stash::protect(ctx, dir, async || {
                    reset_branches(ctx, cwd, &upstream, branches).await
                })
                .await
            }
        })
        .await
}

async fn reset_branches(
    ctx: &RunContext,
    cwd: &Path,
    upstream: &ResolvedRepo<'_>,
    branches: &[String],
) -> Result<()> {
    let repo_name = upstream.repo.repo_name();
    for branch in branches {
        if !cmd::local_branch_exists(ctx, cwd, branch).await? {
            continue;
        }

        if cmd::remote_branch_exists(ctx, cwd, &upstream.remote, branch).await? {
            cmd::checkout_if_different(ctx, cwd, branch).await?;
            let tracking = upstream.tracking(branch);
            if let Some(changes) = cmd::commits_between(ctx, cwd, &tracking, branch).await? {
                info!("{repo_name} on branch {branch}: Local commits exist. Resetting.");
                println!("{changes}");
                ctx.run(cwd, ["git", "reset", "--hard", &tracking]).await?;
            } else {
                info!("{repo_name} on branch {branch}: No local commits to reset.");
            }
        } else {
            if query::current_branch(cwd)?.as_deref() == Some(branch.as_str()) {
                cmd::checkout_if_different(ctx, cwd, "master").await?;
            }
            info!("{repo_name} deleting local-only branch {branch}.");
            ctx.run(cwd, ["git", "log", "--oneline", "-3", branch.as_str()])
                .await?;
            ctx.run(cwd, ["git", "branch", "-D", branch.as_str()])
                .await?;
        }
    }
    Ok(())
}

/// Main handler for `repo-reset`.
///
/// # Errors
///
/// See [`reset_repos`].
pub async fn run_reset_command(ws: &Workspace, args: &RepoBranchArgs) -> Result<()> {
    let repos = ws.select(&args.selection.repos)?;
    let branches = args.branches.or_defaults(&["master".to_string()]);
    reset_repos(ws, &repos, &branches).await
}

/// Updates, then pushes every branch with local commits.
///
/// # Errors
///
/// Returns an error if the update or a push fails.
pub async fn push_repos(ws: &Workspace, repos: &[&RepoDescriptor], branches: &[String]) -> Result<()> {
    let ctx = &ws.ctx;
    ws.root
        .for_each(repos, async |repo, dir| {
            if !repo.is_git() {
                warn!(repo = %repo.repo_name(), "repo-push skips svn repos");
                return Ok(());
            }
            let cwd = dir.path();
            sync::update(ctx, dir, &[repo], branches, false).await?;
            let upstream = resolve_remote(ctx, repo, cwd).await?;

            for branch in branches {
                if !cmd::local_branch_exists(ctx, cwd, branch).await? {
                    continue;
                }
                let is_new = !cmd::remote_branch_exists(ctx, cwd, &upstream.remote, branch).await?;
                cmd::checkout_if_different(ctx, cwd, branch).await?;

                if is_new {
                    ctx.run(
                        cwd,
                        ["git", "push", "--set-upstream", upstream.remote.as_str(), branch.as_str()],
                    )
                    .await?;
                } else if cmd::commits_between(ctx, cwd, &upstream.tracking(branch), branch)
                    .await?
                    .is_some()
                {
                    ctx.run(cwd, ["git", "push", upstream.remote.as_str(), branch.as_str()])
                        .await?;
                } else {
                    info!(
                        "{} on branch {branch}: No local commits exist.",
                        repo.repo_name()
                    );
                }
            }
            Ok(())
        })
        .await
}

/// Main handler for `repo-push`.
///
/// # Errors
///
/// See [`push_repos`].
pub async fn run_push_command(ws: &Workspace, args: &RepoBranchArgs) -> Result<()> {
    let repos = ws.select(&args.selection.repos)?;
    let branches = args.branches.or_defaults(ws.default_branches());
    push_repos(ws, &repos, &branches).await
}

/// Argument vector for `foreach`: a lone argument containing whitespace is
/// handed to the shell.
#[must_use]
pub fn foreach_argv(command: &[String]) -> Vec<String> {
    match command {
        [line] if line.contains(char::is_whitespace) => {
            let (shell, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };
            vec![shell.to_string(), flag.to_string(), line.clone()]
        }
        _ => command.to_vec(),
    }
}

/// Runs a command in every repository, tolerating failures.
///
/// Returns the ids of the repositories where the command failed.
///
/// # Errors
///
/// Returns an error if a repository is missing or the command cannot be
/// spawned.
pub async fn foreach_repo(
    ws: &Workspace,
    repos: &[&RepoDescriptor],
    command: &[String],
) -> Result<Vec<String>> {
    let argv = foreach_argv(command);
    let mut failed = Vec::new();
    ws.root
        .for_each(repos, async |repo, dir| {
            let ok = ws
                .ctx
                .run_tolerant(dir.path(), &argv)
                .await
                .with_context(|| format!("failed to run command in {}", repo.repo_name()))?;
            if !ok {
                warn!(repo = %repo.repo_name(), "command failed");
                failed.push(repo.id().to_string());
            }
            Ok(())
        })
        .await?;
    Ok(failed)
}

/// Main handler for `foreach`.
///
/// # Errors
///
/// See [`foreach_repo`].
pub async fn run_foreach_command(ws: &Workspace, args: &ForeachArgs) -> Result<()> {
    let repos = ws.select(&args.selection.repos)?;
    foreach_repo(ws, &repos, &args.command).await?;
    Ok(())
}

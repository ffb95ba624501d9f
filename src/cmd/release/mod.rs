// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release commands.
//!
//! # prepare-release-branch
//!
//! ```text
//! update(repos, [], no fetch)              remotes resolved, named branches
//! js moved to the front
//! per repo, inside protect():
//!   update([master], fetch)
//!   remote <branch>?  update([branch]) + checkout
//!   local <branch>?   checkout
//!   else              checkout master; checkout -b <branch>
//!   JS snapshot (V)   ../cordova-js: checkout, grunt (once per version), copy
//!   VERSION = V       commit "Set VERSION to V (via coho)"
//!   checkout master
//!   VERSION = dev     commit
//!   JS snapshot (dev)
//!   checkout <branch>
//! end-of-run commit report
//! ```
//!
//! # tag-release
//!
//! ```text
//! per repo, inside protect():
//!   fetch; <remote>/<branch> must exist; checkout; rebase
//!   describe HEAD == V?  "already tagged"
//!   else                 git tag V [--force]; git push --tags <remote> <branch>
//! ```

pub mod version;


use std::path::Path;

use anyhow::Context;
use regex::Regex;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::cli::release::{ReleaseArgs, TagReleaseArgs};
use crate::cli::repo::RepoSelection;
use crate::core::exec::RunContext;
use crate::error::{CohoError, ReleaseError, RepoError, Result};
use crate::git::remote::resolve_remote;
use crate::git::{cmd, query, stash, sync};
use crate::repo::{RepoDescriptor, RepoDir};

use super::Workspace;
use super::report::print_commit_report;
use version::{dev_version, release_branch_name, validate_version};

/// Id of the repository holding the cordova.js sources.
pub const JS_REPO_ID: &str = "js";

/// Shortlog URL of a tag; `{repo}` and `{tag}` are substituted.
pub const SHORTLOG_URL: &str =
    "http://git-wip-us.apache.org/repos/asf?p={repo}.git;a=shortlog;h=refs/tags/{tag}";

/// Builds cordova.js at most once per version and copies the bundles into
/// platform repositories.
#[derive(Debug, Clone)]
pub struct JsSnapshot {
    build_command: Vec<String>,
    built: Option<String>,
}

impl Default for JsSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl JsSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self {
            build_command: vec!["grunt".to_string()],
            built: None,
        }
    }

    /// Replaces the command run inside `cordova-js` to build the bundles.
    #[must_use]
    pub fn with_build_command(mut self, argv: Vec<String>) -> Self {
        self.build_command = argv;
        self
    }

    /// Version of the most recent build, if any.
    #[must_use]
    pub fn built_version(&self) -> Option<&str> {
        self.built.as_deref()
    }

    async fn ensure_built(
        &mut self,
        ws: &Workspace,
        dir: &RepoDir,
        js: &RepoDescriptor,
        version: &str,
    ) -> Result<()> {
        if self.built.as_deref() == Some(version) {
            return Ok(());
        }
        let ctx = &ws.ctx;
        let branch = release_branch_name(version)?;
        let build = &self.build_command;
        dir.for_each(&[js], async |_, js_dir| {
            stash::protect(ctx, js_dir, async || {
                if branch == "master" {
                    cmd::checkout_if_different(ctx, js_dir.path(), "master").await?;
                } else {
                    ctx.run(js_dir.path(), ["git", "checkout", "-q", branch.as_str()])
                        .await?;
                }
                ctx.run(js_dir.path(), build).await?;
                Ok(())
            })
            .await
        })
        .await?;
        self.built = Some(version.to_string());
        Ok(())
    }

    /// Copies the cordova.js bundle of `version` into `repo` and commits it.
    ///
    /// Only platform repositories carry a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the build, a copy or the commit fails.
    pub async fn update(
        &mut self,
        ws: &Workspace,
        dir: &RepoDir,
        repo: &RepoDescriptor,
        version: &str,
    ) -> Result<()> {
        if !repo.is_platform() {
            return Ok(());
        }
        if repo.js_paths().is_empty() {
            info!("*** DO NOT KNOW HOW TO UPDATE cordova.js FOR THIS REPO ***");
            return Ok(());
        }

        let js = ws
            .registry
            .repo(JS_REPO_ID)
            .ok_or_else(|| CohoError::from(RepoError::InvalidSelector {
                token: JS_REPO_ID.to_string(),
            }))?;
        self.ensure_built(ws, dir, js, version).await?;

        let bundle = ws
            .root
            .root()
            .join(js.repo_name())
            .join("pkg")
            .join(repo.js_source_name());
        for js_path in repo.js_paths() {
            copy_and_log(&bundle, &dir.path().join(js_path)).await?;
        }

        if query::has_uncommitted_changes(dir.path())? {
            let message = format!("Update JS snapshot to version {version} (via coho)");
            ws.ctx
                .run(dir.path(), ["git", "commit", "-am", message.as_str()])
                .await?;
        }
        Ok(())
    }
}

async fn copy_and_log(from: &Path, to: &Path) -> Result<()> {
    info!("Copying File: {} -> {}", from.display(), to.display());
    let failed = || {
        CohoError::from(ReleaseError::CopyFailed {
            from: from.display().to_string(),
            to: to.display().to_string(),
        })
    };
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).await.map_err(|_| failed())?;
    }
    fs::copy(from, to).await.map_err(|_| failed())?;
    Ok(())
}

async fn replace_in_file(path: &Path, pattern: &str, replacement: &str) -> Result<()> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let regex = Regex::new(pattern).with_context(|| format!("invalid pattern {pattern}"))?;
    let updated = regex.replace(&content, regex::NoExpand(replacement));
    fs::write(path, updated.as_bytes())
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Writes `version` into the repository's VERSION files and commits.
///
/// # Errors
///
/// Returns an error if a file cannot be rewritten or the commit fails.
pub async fn update_repo_version(
    ctx: &RunContext,
    cwd: &Path,
    repo: &RepoDescriptor,
    version: &str,
) -> Result<()> {
    let files = repo.version_files();
    if files.first().is_some_and(|first| cwd.join(first).exists()) {
        for file in &files {
            let path = cwd.join(file);
            fs::write(&path, format!("{version}\n"))
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        if repo.id() == "android" {
            replace_in_file(
                &cwd.join("framework/src/org/apache/cordova/CordovaWebView.java"),
                r"CORDOVA_VERSION.*=.*;",
                &format!("CORDOVA_VERSION = \"{version}\";"),
            )
            .await?;
            replace_in_file(
                &cwd.join("bin/templates/cordova/version"),
                r"VERSION.*=.*;",
                &format!("VERSION = \"{version}\";"),
            )
            .await?;
        }
        if !query::has_uncommitted_changes(cwd)? {
            info!("VERSION file was already up-to-date.");
        }
    } else {
        warn!("No VERSION file exists in repo {}", repo.repo_name());
    }

    if query::has_uncommitted_changes(cwd)? {
        let message = format!("Set VERSION to {version} (via coho)");
        ctx.run(cwd, ["git", "commit", "-am", message.as_str()])
            .await?;
    }
    Ok(())
}

/// Moves the cordova-js repository to the front so it is branched first.
#[must_use]
pub fn js_first<'a>(repos: &[&'a RepoDescriptor]) -> Vec<&'a RepoDescriptor> {
    let mut ordered: Vec<&RepoDescriptor> = repos.to_vec();
    if let Some(index) = ordered.iter().position(|r| r.id() == JS_REPO_ID) {
        let js = ordered.remove(index);
        ordered.insert(0, js);
    }
    ordered
}

/// Creates or updates the release branch of `version` in every repository.
///
/// Returns the repositories in processing order.
///
/// # Errors
///
/// Returns `InvalidVersion` before running anything, or the first failure.
pub async fn prepare_release_branch<'a>(
    ws: &Workspace,
    repos: &[&'a RepoDescriptor],
    version: &str,
    js: &mut JsSnapshot,
) -> Result<Vec<&'a RepoDescriptor>> {
    validate_version(version)?;
    let branch = release_branch_name(version)?;
    let dev = dev_version(version)?;
    let ctx = &ws.ctx;

    sync::update(ctx, &ws.root, repos, &[], true).await?;

    let ordered = js_first(repos);
    let master = ["master".to_string()];
    let release = [branch.clone()];
    ws.root
        .for_each(&ordered, async |repo, dir| {
            if !repo.is_git() {
                warn!(repo = %repo.repo_name(), "release branches are not supported for svn repos");
                return Ok(());
            }
            let cwd = dir.path();
            stash::protect(ctx, dir, async || {
                sync::update(ctx, dir, &[repo], &master, false).await?;
                let upstream = resolve_remote(ctx, repo, cwd).await?;

                if cmd::remote_branch_exists(ctx, cwd, &upstream.remote, &branch).await? {
                    info!("Remote branch already exists for repo: {}", repo.repo_name());
                    sync::update(ctx, dir, &[repo], &release, true).await?;
                    cmd::checkout_if_different(ctx, cwd, &branch).await?;
                } else if cmd::local_branch_exists(ctx, cwd, &branch).await? {
                    ctx.run(cwd, ["git", "checkout", branch.as_str()]).await?;
                } else {
                    cmd::checkout_if_different(ctx, cwd, "master").await?;
                    ctx.run(cwd, ["git", "checkout", "-b", branch.as_str()])
                        .await?;
                }

                js.update(ws, dir, repo, version).await?;
                info!(
                    "{}: Setting VERSION to \"{version}\" on branch \"{branch}\".",
                    repo.repo_name()
                );
                update_repo_version(ctx, cwd, repo, version).await?;

                cmd::checkout_if_different(ctx, cwd, "master").await?;
                info!(
                    "{}: Setting VERSION to \"{dev}\" on branch \"master\".",
                    repo.repo_name()
                );
                update_repo_version(ctx, cwd, repo, &dev).await?;
                js.update(ws, dir, repo, &dev).await?;
                cmd::checkout_if_different(ctx, cwd, &branch).await?;
                Ok(())
            })
            .await
        })
        .await?;

    Ok(ordered)
}

/// Main handler for `prepare-release-branch`.
///
/// # Errors
///
/// See [`prepare_release_branch`].
pub async fn run_prepare_release_branch_command(ws: &Workspace, args: &ReleaseArgs) -> Result<()> {
    validate_version(&args.version)?;
    let repos = ws.select(&args.selection.repos)?;
    let branch = release_branch_name(&args.version)?;
    let mut js = JsSnapshot::new();

    let ordered = prepare_release_branch(ws, &repos, &args.version, &mut js).await?;
    print_commit_report(ws.ctx.commit_count(), &ordered, &["master".to_string(), branch]);
    Ok(())
}

async fn exec_or_pretend(ctx: &RunContext, cwd: &Path, argv: &[&str], pretend: bool) -> Result<()> {
    if pretend {
        println!("PRETENDING TO RUN: {}", argv.join(" "));
    } else {
        ctx.run(cwd, argv).await?;
    }
    Ok(())
}

/// Tags the release branch of `version` in every repository and pushes the tag.
///
/// # Errors
///
/// Returns `InvalidVersion` before running anything, `MissingReleaseBranch`
/// when a repository has no remote release branch, or the first failure.
pub async fn tag_release(
    ws: &Workspace,
    repos: &[&RepoDescriptor],
    version: &str,
    pretend: bool,
) -> Result<()> {
    validate_version(version)?;
    let branch = release_branch_name(version)?;
    let release = [branch.clone()];
    let ctx = &ws.ctx;

    sync::update(ctx, &ws.root, repos, &[], true).await?;

    ws.root
        .for_each(repos, async |repo, dir| {
            if !repo.is_git() {
                warn!(repo = %repo.repo_name(), "tagging is not supported for svn repos");
                return Ok(());
            }
            let cwd = dir.path();
            stash::protect(ctx, dir, async || {
                sync::update(ctx, dir, &[repo], &[], false).await?;
                let upstream = resolve_remote(ctx, repo, cwd).await?;

                if !cmd::remote_branch_exists(ctx, cwd, &upstream.remote, &branch).await? {
                    return Err(CohoError::from(ReleaseError::MissingReleaseBranch {
                        repo_name: repo.repo_name().to_string(),
                        branch: branch.clone(),
                    })
                    .into());
                }
                info!("Remote branch already exists for repo: {}", repo.repo_name());
                cmd::checkout_if_different(ctx, cwd, &branch).await?;
                sync::update(ctx, dir, &[repo], &release, true).await?;

                let described = cmd::describe_head(ctx, cwd).await?;
                debug!(described = ?described, "current tag");
                if described.as_deref() == Some(version) {
                    info!("Repo {} is already tagged.", repo.repo_name());
                    return Ok(());
                }

                if cmd::tag_exists(ctx, cwd, version).await? {
                    exec_or_pretend(ctx, cwd, &["git", "tag", version, "--force"], pretend).await?;
                } else {
                    exec_or_pretend(ctx, cwd, &["git", "tag", version], pretend).await?;
                }
                exec_or_pretend(
                    ctx,
                    cwd,
                    &["git", "push", "--tags", upstream.remote.as_str(), branch.as_str()],
                    pretend,
                )
                .await
            })
            .await
        })
        .await
}

/// Main handler for `tag-release`.
///
/// # Errors
///
/// See [`tag_release`].
pub async fn run_tag_release_command(ws: &Workspace, args: &TagReleaseArgs) -> Result<()> {
    validate_version(&args.release.version)?;
    let repos = ws.select(&args.release.selection.repos)?;
    tag_release(ws, &repos, &args.release.version, args.pretend).await?;
    println!();
    println!("All work complete.");
    Ok(())
}

/// `    <repo_name>: <tag without leading r> (<first 10 chars of ref>)`.
#[must_use]
pub fn format_tag_line(repo_name: &str, tag: &str, show_ref: &str) -> String {
    let tag = tag.strip_prefix('r').unwrap_or(tag);
    let hash: String = show_ref.chars().take(10).collect();
    format!("    {repo_name}: {tag} ({hash})")
}

/// Main handler for `print-tags`.
///
/// # Errors
///
/// Returns an error for an invalid selection or a missing repository.
pub async fn run_print_tags_command(ws: &Workspace, args: &RepoSelection) -> Result<()> {
    let repos = ws.select(&args.repos)?;
    let ctx = &ws.ctx;
    ws.root
        .for_each(&repos, async |repo, dir| {
            let Some(tag) = cmd::most_recent_tag(ctx, dir.path()).await? else {
                warn!(repo = %repo.repo_name(), "no tags found");
                return Ok(());
            };
            let show_ref = ctx
                .probe(dir.path(), ["git", "show-ref", tag.as_str()])
                .await?
                .unwrap_or_default();
            println!("{}", format_tag_line(repo.repo_name(), &tag, &show_ref));
            Ok(())
        })
        .await
}

/// Shortlog URL for `tag` of `repo_name`.
#[must_use]
pub fn release_url(repo_name: &str, tag: &str) -> String {
    SHORTLOG_URL.replace("{repo}", repo_name).replace("{tag}", tag)
}

/// Main handler for `list-release-urls`.
///
/// # Errors
///
/// Returns an error for an invalid version or selection.
pub async fn run_list_release_urls_command(ws: &Workspace, args: &ReleaseArgs) -> Result<()> {
    let version = validate_version(&args.version)?;
    let repos = ws.select(&args.selection.repos)?;
    let ctx = &ws.ctx;
    ws.root
        .for_each(&repos, async |repo, dir| {
            if !cmd::tag_exists(ctx, dir.path(), version).await? {
                eprintln!("Tag \"{version}\" does not exist in repo {}", repo.repo_name());
                return Ok(());
            }
            println!("{}", release_url(repo.repo_name(), version));
            if let Some(show_ref) = ctx.probe(dir.path(), ["git", "show-ref", version]).await? {
                println!("{show_ref}");
            }
            Ok(())
        })
        .await
}

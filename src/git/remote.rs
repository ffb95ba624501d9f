// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Upstream remote resolution.
//!
//! ```text
//! git remote -v
//!   origin    git@github.com:me/cordova-ios.git (fetch)
//!   apache    https://git-wip-us.apache.org/repos/asf/cordova-ios.git (fetch)
//!                      '------------- prefix ----------''- repo_name -'
//! first remote whose URL contains <prefix><repo_name> --> "apache"
//! ```

use std::path::Path;

use tracing::debug;

use crate::core::exec::RunContext;
use crate::error::{CohoResult, GitError};
use crate::repo::RepoDescriptor;

/// A repository together with its upstream remote name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRepo<'a> {
    pub repo: &'a RepoDescriptor,
    pub remote: String,
}

impl ResolvedRepo<'_> {
    /// `<remote>/<branch>`.
    #[must_use]
    pub fn tracking(&self, branch: &str) -> String {
        format!("{}/{branch}", self.remote)
    }
}

/// Finds the remote pointing at the canonical upstream of `repo`.
///
/// The answer is cached in `ctx` per repository id.
///
/// # Errors
///
/// Returns `NoUpstreamRemote` when no configured remote matches.
pub async fn resolve_remote<'a>(
    ctx: &RunContext,
    repo: &'a RepoDescriptor,
    cwd: &Path,
) -> CohoResult<ResolvedRepo<'a>> {
    if let Some(remote) = ctx.cached_remote(repo.id()) {
        return Ok(ResolvedRepo { repo, remote });
    }

    let listing = ctx
        .probe(cwd, ["git", "remote", "-v"])
        .await?
        .unwrap_or_default();
    let remote = find_upstream(&listing, repo.repo_name(), ctx.upstream_prefixes()).ok_or_else(
        || GitError::NoUpstreamRemote {
            repo_name: repo.repo_name().to_string(),
        },
    )?;

    debug!(repo = %repo.repo_name(), %remote, "resolved upstream remote");
    ctx.remember_remote(repo.id(), &remote);
    Ok(ResolvedRepo { repo, remote })
}

/// Parses `git remote -v` output and returns the first matching remote name.
#[must_use]
pub fn find_upstream(listing: &str, repo_name: &str, prefixes: &[String]) -> Option<String> {
    let needles: Vec<String> = prefixes
        .iter()
        .map(|prefix| format!("{prefix}{repo_name}"))
        .collect();

    listing
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            Some((fields.next()?, fields.next()?))
        })
        .find(|(_, url)| needles.iter().any(|needle| url.contains(needle.as_str())))
        .map(|(name, _)| name.to_string())
}

// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args + Config --> Workspace { config, registry, ctx, root }
//!                          |
//!   list     list-repos, options, inis
//!   repo     repo-clone, repo-update, repo-status, repo-reset, repo-push, foreach
//!   release  prepare-release-branch, tag-release, print-tags, list-release-urls
//!   log      last-week
//!   report   end-of-run commit summary
//! ```

pub mod list;
pub mod log;
pub mod release;
pub mod report;
pub mod repo;

use std::path::Path;

use crate::config::Config;
use crate::core::exec::{Executor, RunContext};
use crate::error::CohoResult;
use crate::repo::{RepoDescriptor, RepoDir, Registry};

/// Everything a command needs for one invocation.
#[derive(Debug)]
pub struct Workspace {
    pub config: Config,
    pub registry: Registry,
    pub ctx: RunContext,
    pub root: RepoDir,
}

impl Workspace {
    /// Builds the registry and run context for the workspace at `root`.
    #[must_use]
    pub fn new(config: Config, root: &Path) -> Self {
        let registry = Registry::from_config(&config.catalog, root);
        let executor = Executor::new().with_color(config.global.color);
        let ctx = RunContext::new(executor, config.upstream.prefixes.clone());
        Self {
            config,
            registry,
            ctx,
            root: RepoDir::new(root),
        }
    }

    /// Resolves `-r` tokens against the registry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelector` for an unknown token.
    pub fn select<S: AsRef<str>>(&self, tokens: &[S]) -> CohoResult<Vec<&RepoDescriptor>> {
        self.registry.resolve_selection(tokens)
    }

    /// The configured default branches.
    #[must_use]
    pub fn default_branches(&self) -> &[String] {
        &self.config.defaults.branches
    }
}

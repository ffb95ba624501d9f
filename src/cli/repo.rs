// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository maintenance command arguments.
//!
//! ```text
//! repo-clone   [-r REPO]...
//! repo-update  [-r REPO]... [-b BRANCH]... [--no-fetch]
//! repo-status  [-r REPO]... [-b BRANCH]... [--branch2 BRANCH]... [--diff]
//! repo-reset   [-r REPO]... [-b BRANCH]...
//! repo-push    [-r REPO]... [-b BRANCH]...
//! foreach      [-r REPO]... -- <command>...
//! ```

use clap::Args;

/// Repository selection shared by every repository command.
#[derive(Debug, Clone, Default, Args)]
pub struct RepoSelection {
    /// Which repos to operate on: repo ids or group names.
    /// Can be specified multiple times. Defaults to the repos present on disk.
    #[arg(short = 'r', long = "repo", value_name = "REPO", action = clap::ArgAction::Append)]
    pub repos: Vec<String>,
}

/// Branch list shared by update, status, reset and push.
#[derive(Debug, Clone, Default, Args)]
pub struct BranchSelection {
    /// Branch to operate on. Can be specified multiple times.
    #[arg(short = 'b', long = "branch", value_name = "BRANCH", action = clap::ArgAction::Append)]
    pub branches: Vec<String>,
}

impl BranchSelection {
    /// The requested branches, or `defaults` when none were given.
    #[must_use]
    pub fn or_defaults(&self, defaults: &[String]) -> Vec<String> {
        if self.branches.is_empty() {
            defaults.to_vec()
        } else {
            self.branches.clone()
        }
    }
}

/// Arguments for `repo-update`.
#[derive(Debug, Clone, Default, Args)]
pub struct RepoUpdateArgs {
    #[command(flatten)]
    pub selection: RepoSelection,

    #[command(flatten)]
    pub branches: BranchSelection,

    /// Skips the "git fetch" step.
    #[arg(long = "no-fetch")]
    pub no_fetch: bool,
}

/// Arguments for `repo-status`.
#[derive(Debug, Clone, Default, Args)]
pub struct RepoStatusArgs {
    #[command(flatten)]
    pub selection: RepoSelection,

    #[command(flatten)]
    pub branches: BranchSelection,

    /// Branch to compare each --branch against instead of its remote
    /// counterpart. Must be given as many times as --branch.
    #[arg(long = "branch2", value_name = "BRANCH", action = clap::ArgAction::Append)]
    pub branch2: Vec<String>,

    /// Also show the diff of each branch against its comparison target.
    #[arg(long)]
    pub diff: bool,
}

/// Arguments for `repo-reset` and `repo-push`.
#[derive(Debug, Clone, Default, Args)]
pub struct RepoBranchArgs {
    #[command(flatten)]
    pub selection: RepoSelection,

    #[command(flatten)]
    pub branches: BranchSelection,
}

/// Arguments for `foreach`.
#[derive(Debug, Clone, Default, Args)]
pub struct ForeachArgs {
    #[command(flatten)]
    pub selection: RepoSelection,

    /// Command to run in each repo. A single argument containing spaces is
    /// run through the shell.
    #[arg(value_name = "COMMAND", required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

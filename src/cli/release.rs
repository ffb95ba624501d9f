// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release command arguments.
//!
//! ```text
//! prepare-release-branch --version X.Y.Z[-rcN]
//! tag-release            --version X.Y.Z[-rcN] [--pretend]
//! list-release-urls      --version X.Y.Z[-rcN]
//! print-tags
//! last-week              [--me] [--days N]
//! ```

use clap::Args;

use super::repo::RepoSelection;

/// Arguments shared by commands operating on one release version.
#[derive(Debug, Clone, Default, Args)]
pub struct ReleaseArgs {
    #[command(flatten)]
    pub selection: RepoSelection,

    /// The version to use. Must match the pattern #.#.#[-rc#].
    #[arg(long = "version", value_name = "VERSION", required = true)]
    pub version: String,
}

/// Arguments for `tag-release`.
#[derive(Debug, Clone, Default, Args)]
pub struct TagReleaseArgs {
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Don't run the tag and push commands, just print them.
    #[arg(long)]
    pub pretend: bool,
}

/// Arguments for `last-week`.
#[derive(Debug, Clone, Args)]
pub struct LastWeekArgs {
    #[command(flatten)]
    pub selection: RepoSelection,

    /// Shows only your commits, plus the pull requests you merged.
    #[arg(long)]
    pub me: bool,

    /// Shows commits from the past N days.
    #[arg(long, value_name = "N", default_value_t = 7)]
    pub days: u32,
}

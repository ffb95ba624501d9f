// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for coho-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! coho [global options] <command>
//! list-repos | options | inis | version
//! repo-clone | repo-update | repo-status | repo-reset | repo-push
//! foreach -- <command>...
//! prepare-release-branch | tag-release | print-tags | list-release-urls
//! last-week
//! ```

pub mod global;
pub mod release;
pub mod repo;


use crate::cli::global::GlobalOptions;
use crate::cli::release::{LastWeekArgs, ReleaseArgs, TagReleaseArgs};
use crate::cli::repo::{ForeachArgs, RepoBranchArgs, RepoSelection, RepoStatusArgs, RepoUpdateArgs};
use clap::{Parser, Subcommand};

/// Multi-Repository Release Coordinator
///
/// Keeps a workspace of sibling repositories in sync with their upstreams
/// and prepares coordinated releases across them.
#[derive(Debug, Parser)]
#[command(
    name = "coho",
    author,
    version,
    about = "Multi-Repository Release Coordinator",
    long_about = "coho-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Keeps a workspace of sibling repositories in sync with their\n\
                  upstreams and prepares coordinated releases across them.\n\n\
                  Run coho from the directory containing the repositories, or\n\
                  point it there with -C. See `coho <command> --help` for more\n\
                  information about a command.",
    after_help = "CONFIGURATION:\n\n\
                  coho reads `coho.toml` from the workspace root if it exists.\n\
                  Additional files can be given with --ini; coho.toml overrides\n\
                  them. COHO_<SECTION>__<KEY> environment variables override\n\
                  both, and --set overrides everything."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the configuration files in use.
    Inis,

    /// Shows the valid values for the --repo flag.
    #[command(name = "list-repos")]
    ListRepos,

    /// Clones the selected repos that are missing from the workspace.
    #[command(name = "repo-clone")]
    RepoClone(RepoSelection),

    /// Fetches and rebases branches onto their upstream counterparts.
    #[command(name = "repo-update")]
    RepoUpdate(RepoUpdateArgs),

    /// Shows local commits and uncommitted changes.
    #[command(name = "repo-status")]
    RepoStatus(RepoStatusArgs),

    /// Discards local commits and deletes local-only branches.
    #[command(name = "repo-reset")]
    RepoReset(RepoBranchArgs),

    /// Pushes branches that have local commits.
    #[command(name = "repo-push")]
    RepoPush(RepoBranchArgs),

    /// Runs a command in each selected repo.
    Foreach(ForeachArgs),

    /// Creates or updates release branches, the JS snapshot and VERSION files.
    #[command(name = "prepare-release-branch")]
    PrepareReleaseBranch(ReleaseArgs),

    /// Tags release branches and pushes the tags.
    #[command(name = "tag-release")]
    TagRelease(TagReleaseArgs),

    /// Shows the most recent tag of each repo.
    #[command(name = "print-tags")]
    PrintTags(RepoSelection),

    /// Shows the shortlog URLs of a release tag.
    #[command(name = "list-release-urls")]
    ListReleaseUrls(ReleaseArgs),

    /// Shows a formatted git log of recent changes.
    #[command(name = "last-week")]
    LastWeek(LastWeekArgs),
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}

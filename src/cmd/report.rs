// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-of-run summary for commands that may commit.
//!
//! ```text
//! commits > 0:
//!   All work complete. N commits were made locally.
//!   To review changes:
//!     coho repo-status -r ios -r android -b master -b 3.1.x | less
//!   To push changes:
//!     coho repo-push ...
//!   To revert all local commits:
//!     coho repo-reset ...
//! commits == 0:
//!   All work complete. No commits were made.
//! ```

use crate::repo::RepoDescriptor;

/// Program name used in suggested command lines.
pub const PROGRAM: &str = "coho";

/// `-r <id>... -b <branch>...` for the given selection.
#[must_use]
pub fn selection_flags(repos: &[&RepoDescriptor], branches: &[String]) -> String {
    repos
        .iter()
        .map(|repo| format!("-r {}", repo.id()))
        .chain(branches.iter().map(|branch| format!("-b {branch}")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lines of the end-of-run report.
#[must_use]
pub fn format_commit_report(
    commits: usize,
    repos: &[&RepoDescriptor],
    branches: &[String],
) -> Vec<String> {
    if commits == 0 {
        return vec!["All work complete. No commits were made.".to_string()];
    }

    let flags = selection_flags(repos, branches);
    vec![
        format!("All work complete. {commits} commits were made locally."),
        "To review changes:".to_string(),
        format!("  {PROGRAM} repo-status {flags} | less"),
        "To push changes:".to_string(),
        format!("  {PROGRAM} repo-push {flags}"),
        "To revert all local commits:".to_string(),
        format!("  {PROGRAM} repo-reset {flags}"),
    ]
}

/// Prints the end-of-run report, preceded by a blank line.
pub fn print_commit_report(commits: usize, repos: &[&RepoDescriptor], branches: &[String]) {
    println!();
    for line in format_commit_report(commits, repos, branches) {
        println!("{line}");
    }
}

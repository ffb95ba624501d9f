// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `last-week`: recent commits across repositories.

use tracing::info;

use crate::cli::release::LastWeekArgs;
use crate::error::{CohoError, ConfigError, Result};
use crate::repo::RepoDescriptor;

use super::Workspace;

/// Width of the repository column in log lines.
const ID_WIDTH: usize = 20;

/// Returns the formatted part of a `%ae|...` line when it was authored by
/// someone other than `email`.
fn pull_request_line<'a>(line: &'a str, email: &str) -> Option<&'a str> {
    let (author, rest) = line.split_once('|')?;
    (!author.contains(email)).then_some(rest)
}

/// Looks up `user.email` from git configuration.
async fn user_email(ws: &Workspace) -> Result<String> {
    ws.ctx
        .probe(ws.root.path(), ["git", "config", "user.email"])
        .await?
        .map(|email| email.trim().to_string())
        .ok_or_else(|| {
            CohoError::from(ConfigError::InvalidValue {
                section: "user".to_string(),
                key: "email".to_string(),
                message: "not set in git config (required by --me)".to_string(),
            })
            .into()
        })
}

/// Collects log lines for every repository, followed by the totals line.
///
/// With `email`, only that user's commits are listed, and commits they
/// committed on behalf of other authors are listed as pull requests.
///
/// # Errors
///
/// Returns an error if a repository is not cloned or `git log` fails.
pub async fn last_week_report(
    ws: &Workspace,
    repos: &[&RepoDescriptor],
    days: u32,
    email: Option<&str>,
) -> Result<Vec<String>> {
    let since = format!("--since={days} days ago");
    let mut base: Vec<String> = [
        "git",
        "log",
        "--no-merges",
        "--date=short",
        "--all-match",
        "--fixed-strings",
    ]
    .map(String::from)
    .to_vec();
    if let Some(email) = email {
        base.push(format!("--committer={email}"));
        base.push(format!("--author={email}"));
    }
    info!(
        "Running command: {} --format=\"$REPO_NAME %s\" --since=\"{days} days ago\"",
        base.join(" ")
    );

    let mut lines = Vec::new();
    let mut commits = 0;
    ws.root
        .for_each(repos, async |repo, dir| {
            let mut argv = base.clone();
            argv.push(format!("--format={:<ID_WIDTH$} %cd %s", repo.id()));
            argv.push(since.clone());
            let output = ws.ctx.read(dir.path(), &argv).await?;
            for line in output.lines().filter(|l| !l.is_empty()) {
                lines.push(line.to_string());
                commits += 1;
            }
            Ok(())
        })
        .await?;

    let Some(email) = email else {
        lines.push(format!("Total Commits: {commits}"));
        return Ok(lines);
    };

    lines.push(String::new());
    lines.push("Pull requests:".to_string());
    let mut pulls = 0;
    ws.root
        .for_each(repos, async |repo, dir| {
            let argv = [
                "git".to_string(),
                "log".to_string(),
                "--no-merges".to_string(),
                "--date=short".to_string(),
                "--fixed-strings".to_string(),
                format!("--committer={email}"),
                format!("--format=%ae|{:<ID_WIDTH$} %cd %s", repo.id()),
                since.clone(),
            ];
            let output = ws.ctx.read(dir.path(), &argv).await?;
            for line in output.lines().filter_map(|l| pull_request_line(l, email)) {
                lines.push(line.to_string());
                pulls += 1;
            }
            Ok(())
        })
        .await?;

    lines.push(format!(
        "Total Commits: {commits} Total Pull Requests: {pulls}"
    ));
    Ok(lines)
}

/// Main handler for `last-week`.
///
/// # Errors
///
/// Returns an error for an invalid selection, a missing `user.email` with
/// `--me`, or a failed `git log`.
pub async fn run_last_week_command(ws: &Workspace, args: &LastWeekArgs) -> Result<()> {
    let repos = ws.select(&args.selection.repos)?;
    let email = if args.me {
        Some(user_email(ws).await?)
    } else {
        None
    };

    for line in last_week_report(ws, &repos, args.days, email.as_deref()).await? {
        println!("{line}");
    }
    Ok(())
}

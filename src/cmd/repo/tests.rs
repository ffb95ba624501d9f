// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{clone_repos, foreach_argv, foreach_repo, push_repos, reset_repos, status_report};
use crate::cli::repo::{BranchSelection, RepoSelection, RepoStatusArgs, RepoUpdateArgs};
use crate::error::exit_status;
use crate::test_utils::{Fixture, UPSTREAM_REMOTE, git};

fn branches(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn status_args(branch: &[&str], branch2: &[&str], diff: bool) -> RepoStatusArgs {
    RepoStatusArgs {
        selection: RepoSelection::default(),
        branches: BranchSelection {
            branches: branches(branch),
        },
        branch2: branches(branch2),
        diff,
    }
}

#[tokio::test]
async fn test_clone_repos_skips_existing() {
    let fixture = Fixture::new();
    fixture.add_upstream_only("cordova-ios");
    fixture.add_repo("cordova-android");
    let ws = fixture.workspace();
    let repos = ws.select(&["ios", "android"]).unwrap();

    let cloned = clone_repos(&ws, &repos, false).await.unwrap();

    assert_eq!(cloned, 1);
    let ios = fixture.repo_path("cordova-ios");
    assert_eq!(git(&ios, &["rev-parse", "--abbrev-ref", "HEAD"]), "master");
    let remotes = git(&ios, &["remote", "-v"]);
    assert!(remotes.contains("git.apache.org/cordova-ios.git"), "{remotes}");
}

#[tokio::test]
async fn test_update_command_clones_then_rebases() {
    let fixture = Fixture::new();
    fixture.add_repo("cordova-ios");
    fixture.add_upstream_only("cordova-android");
    fixture.push_upstream("cordova-ios", "master", 2);
    let ws = fixture.workspace();

    let args = RepoUpdateArgs {
        selection: RepoSelection {
            repos: branches(&["ios", "android"]),
        },
        branches: BranchSelection {
            branches: branches(&["master"]),
        },
        no_fetch: false,
    };
    super::run_update_command(&ws, &args).await.unwrap();

    let ios = fixture.repo_path("cordova-ios");
    let upstream_head = git(&fixture.upstream_path("cordova-ios"), &["rev-parse", "master"]);
    assert_eq!(git(&ios, &["rev-parse", "master"]), upstream_head);
    assert!(fixture.repo_path("cordova-android").is_dir());
}

#[tokio::test]
async fn test_status_reports_local_commits_and_changes() {
    let fixture = Fixture::new();
    fixture.add_repo("cordova-ios");
    fixture.commit_local("cordova-ios", "local.txt", "Local work");
    std::fs::write(fixture.repo_path("cordova-ios").join("scratch.txt"), "x").unwrap();
    let ws = fixture.workspace();
    let repos = ws.select(&["ios"]).unwrap();

    let lines = status_report(&ws, &repos, &status_args(&[], &[], false))
        .await
        .unwrap();

    assert_eq!(lines[0], "cordova-ios: Local commits exist on master:");
    assert!(lines[1].ends_with("Local work"), "{lines:?}");
    assert_eq!(lines[2], "cordova-ios: Uncommitted changes:");
    assert_eq!(lines[3], "?? scratch.txt");
    assert_eq!(lines.len(), 4);
}

#[tokio::test]
async fn test_status_clean_repo_prints_nothing() {
    let fixture = Fixture::new();
    fixture.add_repo("cordova-ios");
    let ws = fixture.workspace();
    let repos = ws.select(&["ios"]).unwrap();

    let lines = status_report(&ws, &repos, &status_args(&["master"], &[], true))
        .await
        .unwrap();

    assert!(lines.is_empty(), "{lines:?}");
}

#[tokio::test]
async fn test_status_diff_against_branch2() {
    let fixture = Fixture::new();
    let ios = fixture.add_repo("cordova-ios");
    git(&ios, &["checkout", "--quiet", "-b", "feature"]);
    fixture.commit_local("cordova-ios", "feature.txt", "Feature work");
    git(&ios, &["checkout", "--quiet", "master"]);
    let ws = fixture.workspace();
    let repos = ws.select(&["ios"]).unwrap();

    let lines = status_report(&ws, &repos, &status_args(&["feature"], &["master"], true))
        .await
        .unwrap();

    assert_eq!(lines[0], "cordova-ios: Local commits exist on feature:");
    let banner = lines
        .iter()
        .position(|l| l == "Diff for cordova-ios on branch feature (vs master)")
        .expect("diff banner");
    assert!(lines[banner - 1].starts_with("-----"));
    assert!(lines[banner + 1..].iter().any(|l| l == "+Feature work"), "{lines:?}");
}

#[tokio::test]
async fn test_status_flag_count_mismatch_runs_nothing() {
    let fixture = Fixture::new();
    let ws = fixture.workspace();
    let repos = ws.select(&["ios"]).unwrap();

    let err = status_report(&ws, &repos, &status_args(&["master", "dev"], &["3.0.x"], false))
        .await
        .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"release error: must specify the same number of --branch and --branch2 flags");
    assert_eq!(exit_status(&err), 1);
}

#[tokio::test]
async fn test_reset_on_current_branch_cleans_and_resets() {
    let fixture = Fixture::new();
    let ios = fixture.add_repo("cordova-ios");
    fixture.commit_local("cordova-ios", "local.txt", "Local work");
    std::fs::write(ios.join("scratch.txt"), "x").unwrap();
    let ws = fixture.workspace();
    let repos = ws.select(&["ios"]).unwrap();

    reset_repos(&ws, &repos, &branches(&["master"])).await.unwrap();

    let tracking = format!("{UPSTREAM_REMOTE}/master");
    assert_eq!(
        git(&ios, &["rev-parse", "master"]),
        git(&ios, &["rev-parse", &tracking])
    );
    assert!(!ios.join("scratch.txt").exists(), "untracked files are cleaned");
}

#[tokio::test]
async fn test_reset_from_other_branch_keeps_changes_and_deletes_local_only() {
    let fixture = Fixture::new();
    let ios = fixture.add_repo("cordova-ios");
    fixture.commit_local("cordova-ios", "local.txt", "Local work");
    git(&ios, &["branch", "scratch-branch"]);
    git(&ios, &["checkout", "--quiet", "-b", "work"]);
    std::fs::write(ios.join("VERSION"), "edited\n").unwrap();
    let ws = fixture.workspace();
    let repos = ws.select(&["ios"]).unwrap();

    reset_repos(&ws, &repos, &branches(&["master", "scratch-branch"]))
        .await
        .unwrap();

    let tracking = format!("{UPSTREAM_REMOTE}/master");
    assert_eq!(
        git(&ios, &["rev-parse", "master"]),
        git(&ios, &["rev-parse", &tracking])
    );
    assert!(git(&ios, &["branch", "--list", "scratch-branch"]).is_empty());
    assert_eq!(git(&ios, &["rev-parse", "--abbrev-ref", "HEAD"]), "work");
    assert_eq!(std::fs::read_to_string(ios.join("VERSION")).unwrap(), "edited\n");
}

#[tokio::test]
async fn test_push_sends_local_commits_and_new_branches() {
    let fixture = Fixture::new();
    let ios = fixture.add_repo("cordova-ios");
    fixture.commit_local("cordova-ios", "local.txt", "Local work");
    git(&ios, &["checkout", "--quiet", "-b", "4.0.x"]);
    git(&ios, &["checkout", "--quiet", "master"]);
    let ws = fixture.workspace();
    let repos = ws.select(&["ios"]).unwrap();

    push_repos(&ws, &repos, &branches(&["master", "4.0.x", "dev"]))
        .await
        .unwrap();

    let upstream = fixture.upstream_path("cordova-ios");
    assert_eq!(
        git(&upstream, &["rev-parse", "master"]),
        git(&ios, &["rev-parse", "master"])
    );
    assert!(!git(&upstream, &["branch", "--list", "4.0.x"]).is_empty());
}

#[tokio::test]
async fn test_push_without_local_commits_pushes_nothing() {
    let fixture = Fixture::new();
    fixture.add_repo("cordova-ios");
    fixture.push_upstream("cordova-ios", "master", 1);
    let ws = fixture.workspace();
    let repos = ws.select(&["ios"]).unwrap();
    let before = git(&fixture.upstream_path("cordova-ios"), &["rev-parse", "master"]);

    push_repos(&ws, &repos, &branches(&["master"])).await.unwrap();

    let ios = fixture.repo_path("cordova-ios");
    assert_eq!(git(&ios, &["rev-parse", "master"]), before, "update rebased first");
    assert_eq!(
        git(&fixture.upstream_path("cordova-ios"), &["rev-parse", "master"]),
        before
    );
}

#[test]
fn test_foreach_argv() {
    assert_eq!(
        foreach_argv(&branches(&["git", "status", "-s"])),
        ["git", "status", "-s"]
    );
    let shell = foreach_argv(&branches(&["git checkout master"]));
    assert_eq!(shell.len(), 3);
    assert_eq!(shell[2], "git checkout master");
}

#[tokio::test]
async fn test_foreach_tolerates_failures() {
    let fixture = Fixture::new();
    let ios = fixture.add_repo("cordova-ios");
    let android = fixture.add_repo("cordova-android");
    git(&android, &["checkout", "--quiet", "-b", "only-here"]);
    let ws = fixture.workspace();
    let repos = ws.select(&["ios", "android"]).unwrap();

    let failed = foreach_repo(
        &ws,
        &repos,
        &branches(&["git", "rev-parse", "--verify", "--quiet", "only-here"]),
    )
    .await
    .unwrap();

    assert_eq!(failed, ["ios"]);
    assert_eq!(git(&ios, &["rev-parse", "--abbrev-ref", "HEAD"]), "master");
}

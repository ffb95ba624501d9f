// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::{RepoDescriptor, RepoDir, RepoKind, Registry};
use crate::config::types::{CatalogConfig, RepoEntry};
use crate::error::{CohoError, RepoError};

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn ids(repos: &[&RepoDescriptor]) -> Vec<String> {
    repos.iter().map(|r| r.id().to_string()).collect()
}

fn workspace(repo_names: &[&str]) -> TempDir {
    let temp = temp_dir();
    for name in repo_names {
        std::fs::create_dir_all(temp.path().join(name)).expect("failed to create repo dir");
    }
    temp
}

// --- Descriptor ---

#[test]
fn test_exclude_patterns_from_catalog_and_config() {
    let root = temp_dir();
    let registry = Registry::from_config(&CatalogConfig::default(), root.path());
    let android = registry.repo("android").expect("built-in repo");
    assert!(android.exclude_patterns().iter().any(|p| p == "proguard-project.txt"));
    assert!(registry.repo("ios").unwrap().exclude_patterns().is_empty());

    let entry = RepoEntry {
        id: "tizen".to_string(),
        exclude_patterns: vec!["build".to_string()],
        ..Default::default()
    };
    assert_eq!(RepoDescriptor::from(&entry).exclude_patterns(), ["build"]);
}

#[test]
fn test_descriptor_defaults() {
    let repo = RepoDescriptor::new("ios", "iOS", "cordova-ios");
    assert_eq!(repo.version_files(), vec![Path::new("VERSION")]);
    assert_eq!(repo.js_source_name(), "cordova.ios.js");
    assert!(repo.is_git());
    assert!(!repo.is_plugin());
}

#[test]
fn test_descriptor_from_entry() {
    let entry = RepoEntry {
        id: "site".into(),
        svn: Some("https://svn.example.org/site".into()),
        inactive: true,
        ..RepoEntry::default()
    };
    let repo = RepoDescriptor::from(&entry);
    assert_eq!(repo.title(), "site");
    assert_eq!(repo.repo_name(), "cordova-site");
    assert!(repo.is_inactive());
    assert_eq!(
        repo.kind(),
        &RepoKind::Svn {
            url: "https://svn.example.org/site".into()
        }
    );
}

// --- Selection ---

#[test]
fn test_selection_dedup_first_occurrence_wins() {
    let registry = Registry::builtin(Path::new("/nonexistent"));
    let repos = registry
        .resolve_selection(&["ios", "active-platform", "cordova-ios", "js"])
        .unwrap();
    let ids = ids(&repos);

    assert_eq!(ids[0], "ios");
    assert_eq!(ids[1], "android");
    assert_eq!(ids.last().map(String::as_str), Some("js"));
    assert_eq!(ids.iter().filter(|id| *id == "ios").count(), 1);
}

#[test]
fn test_selection_strips_id_prefix() {
    let registry = Registry::builtin(Path::new("/nonexistent"));
    let repos = registry.resolve_selection(&["cordova-android"]).unwrap();
    insta::assert_debug_snapshot!(ids(&repos), @r#"
    [
        "android",
    ]
    "#);
}

#[test]
fn test_selection_invalid_token() {
    let registry = Registry::builtin(Path::new("/nonexistent"));
    let err = registry
        .resolve_selection(&["ios", "nope"])
        .expect_err("unknown token");
    insta::assert_snapshot!(err.to_string(), @r"
    invalid repo value: nope
    Use the list-repos command to see valid values.
    ");
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_empty_selection_is_auto() {
    let temp = workspace(&["cordova-js", "cordova-ios", "unrelated"]);
    let registry = Registry::builtin(temp.path());
    let repos = registry.resolve_selection::<&str>(&[]).unwrap();
    insta::assert_debug_snapshot!(ids(&repos), @r#"
    [
        "ios",
        "js",
    ]
    "#);
}

#[test]
fn test_cadence_composes_active_platform() {
    let registry = Registry::builtin(Path::new("/nonexistent"));
    let cadence = ids(&registry.group_members("cadence").unwrap());
    let active = ids(&registry.group_members("active-platform").unwrap());

    assert_eq!(&cadence[..active.len()], &active[..]);
    assert_eq!(
        &cadence[active.len()..],
        &["cli", "js", "mobile-spec", "app-hello-world", "docs"]
    );
    assert!(!active.contains(&"qt".to_string()));
}

#[test]
fn test_plugins_group() {
    let registry = Registry::builtin(Path::new("/nonexistent"));
    let plugins = registry.group_members("plugins").unwrap();
    assert!(!plugins.is_empty());
    assert!(plugins.iter().all(|r| r.is_plugin()));
    let release = ids(&registry.group_members("release-repos").unwrap());
    assert!(plugins.iter().all(|p| !release.contains(&p.id().to_string())));
}

#[test]
fn test_configured_repos_and_groups() {
    let mut groups = std::collections::BTreeMap::new();
    groups.insert("mine".to_string(), vec!["tizen".into(), "extra".into()]);
    groups.insert("both".to_string(), vec!["mine".into(), "js".into()]);
    let config = CatalogConfig {
        repos: vec![
            RepoEntry {
                id: "extra".into(),
                repo_name: Some("extra-repo".into()),
                ..RepoEntry::default()
            },
            RepoEntry {
                id: "tizen".into(),
                title: Some("Tizen (configured)".into()),
                ..RepoEntry::default()
            },
        ],
        groups,
        ..CatalogConfig::default()
    };

    let registry = Registry::from_config(&config, Path::new("/nonexistent"));
    assert_eq!(registry.repo("tizen").unwrap().title(), "Tizen (configured)");
    assert_eq!(
        ids(&registry.resolve_selection(&["both"]).unwrap()),
        vec!["tizen", "extra", "js"]
    );
}

#[test]
fn test_group_cycle_detected() {
    let mut groups = std::collections::BTreeMap::new();
    groups.insert("a".to_string(), vec!["ios".into(), "b".into()]);
    groups.insert("b".to_string(), vec!["a".into()]);
    let config = CatalogConfig {
        groups,
        ..CatalogConfig::default()
    };

    let registry = Registry::from_config(&config, Path::new("/nonexistent"));
    let err = registry.resolve_selection(&["a"]).expect_err("cycle");
    assert!(matches!(
        err,
        CohoError::Repo(ref e) if matches!(**e, RepoError::GroupCycle { .. })
    ));
    assert_eq!(err.exit_code(), 1);
}

// --- Directory context ---

#[test]
fn test_entry_path_depends_on_depth() {
    let temp = workspace(&["cordova-ios"]);
    let registry = Registry::builtin(temp.path());
    let root = RepoDir::new(temp.path());
    assert_eq!(root.entry_path("cordova-js"), PathBuf::from("cordova-js"));

    let ios = root.enter(registry.repo("ios").unwrap()).unwrap();
    assert_eq!(ios.depth(), 1);
    assert_eq!(ios.path(), temp.path().join("cordova-ios"));
    assert_eq!(ios.entry_path("cordova-js"), PathBuf::from("../cordova-js"));
}

#[test]
fn test_enter_missing_repo() {
    let temp = temp_dir();
    let registry = Registry::builtin(temp.path());
    let err = RepoDir::new(temp.path())
        .enter(registry.repo("android").unwrap())
        .expect_err("not cloned");
    insta::assert_snapshot!(err.to_string(), @"repo directory does not exist: cordova-android. First run coho repo-clone.");
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_nested_for_each_restores_context() {
    let temp = workspace(&["cordova-ios", "cordova-android", "cordova-js"]);
    let registry = Registry::builtin(temp.path());
    let outer = registry.resolve_selection(&["ios", "android"]).unwrap();
    let js = registry.resolve_selection(&["js"]).unwrap();
    let root = RepoDir::new(temp.path());

    let mut visited = Vec::new();
    root.for_each(&outer, async |repo, dir| {
        visited.push((repo.id().to_string(), dir.depth(), dir.path().to_path_buf()));
        dir.for_each(&js, async |inner, nested| {
            visited.push((
                inner.id().to_string(),
                nested.depth(),
                nested.path().to_path_buf(),
            ));
            Ok(())
        })
        .await?;
        // still inside the outer repository
        assert_eq!(dir.depth(), 1);
        assert_eq!(dir.path(), temp.path().join(repo.repo_name()));
        Ok(())
    })
    .await
    .unwrap();

    assert_eq!(root.depth(), 0);
    assert_eq!(root.path(), temp.path());
    let expected = vec![
        ("ios".to_string(), 1, temp.path().join("cordova-ios")),
        ("js".to_string(), 2, temp.path().join("cordova-js")),
        ("android".to_string(), 1, temp.path().join("cordova-android")),
        ("js".to_string(), 2, temp.path().join("cordova-js")),
    ];
    assert_eq!(visited, expected);
}

#[tokio::test]
async fn test_for_each_stops_at_first_error() {
    let temp = workspace(&["cordova-ios", "cordova-android"]);
    let registry = Registry::builtin(temp.path());
    let repos = registry.resolve_selection(&["ios", "android"]).unwrap();

    let mut calls = 0;
    let result = RepoDir::new(temp.path())
        .for_each(&repos, async |_, _| {
            calls += 1;
            anyhow::bail!("boom")
        })
        .await;

    assert!(result.is_err());
    assert_eq!(calls, 1);
}

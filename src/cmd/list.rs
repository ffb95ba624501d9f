// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Informational commands: `list-repos`, `options` and `inis`.

use crate::config::Config;
use crate::error::CohoResult;
use crate::repo::Registry;

/// Lines printed by `list-repos`.
///
/// # Errors
///
/// Returns an error if a group cannot be expanded.
pub fn format_repo_list(registry: &Registry) -> CohoResult<Vec<String>> {
    let mut lines = vec![
        "Valid values for the --repo flag:".to_string(),
        String::new(),
        "Repositories:".to_string(),
    ];
    lines.extend(registry.repos().iter().map(|repo| format!("    {}", repo.id())));
    lines.push(String::new());
    lines.push("Repository Groups:".to_string());
    for name in registry.group_names() {
        let members = registry
            .group_members(name)?
            .iter()
            .map(|repo| repo.id())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("    {name} ({members})"));
    }
    Ok(lines)
}

/// Main handler for `list-repos`.
///
/// # Errors
///
/// Returns an error if a group cannot be expanded.
pub fn run_list_repos_command(registry: &Registry) -> CohoResult<()> {
    for line in format_repo_list(registry)? {
        println!("{line}");
    }
    Ok(())
}

/// Display current configuration options.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display loaded configuration files.
pub fn run_inis_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::format_repo_list;
    use crate::config::types::{CatalogConfig, RepoEntry};
    use crate::repo::{RepoDescriptor, Registry};

    #[test]
    fn test_format_repo_list() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("cordova-js")).unwrap();
        let mut repos = vec![
            RepoDescriptor::new("ios", "iOS", "cordova-ios").platform(),
            RepoDescriptor::new("wp7", "Windows Phone 7", "cordova-wp7")
                .platform()
                .inactive(),
        ];
        for id in ["cli", "js", "mobile-spec", "app-hello-world", "docs"] {
            repos.push(RepoDescriptor::new(id, id, format!("cordova-{id}")));
        }
        repos.push(RepoDescriptor::new(
            "plugin-camera",
            "Plugin - Camera",
            "cordova-plugin-camera",
        ));
        let registry = Registry::new(repos, temp.path(), "cordova-");

        let lines = format_repo_list(&registry).unwrap();
        insta::assert_snapshot!(lines.join("\n"), @r"
        Valid values for the --repo flag:

        Repositories:
            ios
            wp7
            cli
            js
            mobile-spec
            app-hello-world
            docs
            plugin-camera

        Repository Groups:
            active-platform (ios)
            all (ios, wp7, cli, js, mobile-spec, app-hello-world, docs, plugin-camera)
            auto (js)
            cadence (ios, cli, js, mobile-spec, app-hello-world, docs)
            platform (ios, wp7)
            plugins (plugin-camera)
            release-repos (ios, cli, js, mobile-spec, app-hello-world, docs, plugin-camera)
        ");
    }

    #[test]
    fn test_format_repo_list_reports_group_cycle() {
        let temp = tempfile::tempdir().unwrap();
        let mut catalog = CatalogConfig::default();
        catalog.repos.push(RepoEntry {
            id: "extra".to_string(),
            ..RepoEntry::default()
        });
        catalog
            .groups
            .insert("loop".to_string(), vec!["extra".to_string(), "loop".to_string()]);
        let registry = Registry::from_config(&catalog, temp.path());

        let err = format_repo_list(&registry).unwrap_err();
        assert_eq!(err.to_string(), "repo group 'loop' references itself");
    }
}

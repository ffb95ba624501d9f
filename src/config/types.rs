// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for coho-rs.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, UpstreamConfig, CatalogConfig, DefaultsConfig
//! CatalogConfig.repos:  [[catalog.repos]] tables -> RepoEntry
//! CatalogConfig.groups: group name -> [repo id | group name]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::logging::{FileFormat, LogLevel};
use crate::repo::registry::DEFAULT_ID_PREFIX;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Log file format: `text` or `json`.
    pub log_format: FileFormat,
    /// Force colored output from interactive git commands.
    pub color: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            log_format: FileFormat::Text,
            color: true,
        }
    }
}

/// Where the canonical repositories live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    /// A remote is the upstream if its URL contains `<prefix><repo_name>`.
    pub prefixes: Vec<String>,
    /// `repo-clone` clones `<clone_url_prefix><repo_name>.git`.
    pub clone_url_prefix: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            prefixes: vec![
                "git-wip-us.apache.org/repos/asf/".to_string(),
                "git.apache.org/".to_string(),
            ],
            clone_url_prefix: "https://git-wip-us.apache.org/repos/asf/".to_string(),
        }
    }
}

/// Additional repositories and groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Prefix stripped from selector tokens (`cordova-ios` -> `ios`).
    pub id_prefix: String,
    /// Repositories added to (or replacing entries of) the built-in catalog.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repos: Vec<RepoEntry>,
    /// Named groups; each member is a repo id or another group name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<String, Vec<String>>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            repos: Vec::new(),
            groups: BTreeMap::new(),
        }
    }
}

/// A repository declared in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoEntry {
    pub id: String,
    /// Display name; defaults to the id.
    pub title: Option<String>,
    /// Directory name; defaults to `cordova-<id>`.
    pub repo_name: Option<String>,
    pub version_file_paths: Vec<PathBuf>,
    pub exclude_patterns: Vec<String>,
    pub js_paths: Vec<PathBuf>,
    pub js_src_name: Option<String>,
    pub inactive: bool,
    pub platform: bool,
    /// Subversion URL; the repository is git when unset.
    pub svn: Option<String>,
}

/// Defaults for command flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Branches used by `repo-update` and `repo-push` when no `-b` is given.
    pub branches: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            branches: vec!["master".to_string(), "dev".to_string()],
        }
    }
}

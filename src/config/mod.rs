// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for coho-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. --ini files (in order)
//! 3. coho.toml (workspace root)
//! 4. COHO_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! COHO_GLOBAL__COLOR=false                → global.color = false
//! COHO_UPSTREAM__CLONE_URL_PREFIX=file:// → upstream.clone_url_prefix
//! COHO_CATALOG__ID_PREFIX=apache-         → catalog.id_prefix
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

use loader::ConfigLoader;
use types::{CatalogConfig, DefaultsConfig, GlobalConfig, UpstreamConfig};

/// File name of the workspace configuration.
pub const CONFIG_FILE_NAME: &str = "coho.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Upstream remote recognition and clone URLs.
    pub upstream: UpstreamConfig,
    /// Catalog extensions.
    pub catalog: CatalogConfig,
    /// Command flag defaults.
    pub defaults: DefaultsConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use coho_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("release.toml")
    ///     .add_toml_file_optional("coho.toml")
    ///     .with_env_prefix("COHO")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read, contains invalid
    /// TOML, or does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the content is not valid TOML or does not
    /// match the `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Format configuration options for display.
    ///
    /// One `key = value` line per option, sorted by key with aligned `=`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_upstream_options(&mut options);
        self.format_catalog_options(&mut options);
        options.insert(
            "defaults.branches".into(),
            self.defaults.branches.join(", "),
        );

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(|| "<none>".to_string(), |p| p.display().to_string()),
        );
        options.insert(
            "global.log_format".into(),
            self.global.log_format.to_string(),
        );
        options.insert("global.color".into(), self.global.color.to_string());
    }

    fn format_upstream_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "upstream.prefixes".into(),
            self.upstream.prefixes.join(", "),
        );
        options.insert(
            "upstream.clone_url_prefix".into(),
            self.upstream.clone_url_prefix.clone(),
        );
    }

    fn format_catalog_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("catalog.id_prefix".into(), self.catalog.id_prefix.clone());
        for repo in &self.catalog.repos {
            options.insert(
                format!("catalog.repos.{}", repo.id),
                repo.repo_name
                    .clone()
                    .unwrap_or_else(|| format!("cordova-{}", repo.id)),
            );
        }
        for (name, members) in &self.catalog.groups {
            options.insert(format!("catalog.groups.{name}"), members.join(", "));
        }
    }
}

// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file(req)
//!   .add_toml_file_optional(opt)
//!   .add_toml_str()
//!   .with_env_prefix()
//!   .set() / .apply_override("section/key=value")
//!        |
//!        v
//!    build() --> Config  (errors --> ConfigError, exit code 1)
//! ```

use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{CohoError, ConfigError, Result};

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    files: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            files: Vec::new(),
        }
    }

    /// Adds a TOML configuration file to the loader.
    ///
    /// The file is read when `build()` is called. If the file doesn't exist
    /// or contains invalid TOML, `build()` returns an error.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(("file".to_string(), p.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(("optional".to_string(), p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    /// Reads `<PREFIX>_<SECTION>__<KEY>` environment variables.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the key is invalid.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        let path = self.source_list();
        self.builder = self.builder.set_override(key, value).map_err(|e| {
            CohoError::from(ConfigError::ParseError {
                path,
                message: e.to_string(),
            })
        })?;
        Ok(self)
    }

    /// Applies a `section/key=value` override.
    ///
    /// A value in brackets is split on commas into a list.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the override has no `=` or no section.
    pub fn apply_override(self, spec: &str) -> Result<Self> {
        let invalid = |message: &str| -> CohoError {
            ConfigError::InvalidValue {
                section: "--set".to_string(),
                key: spec.to_string(),
                message: message.to_string(),
            }
            .into()
        };
        let (path, value) = spec
            .split_once('=')
            .ok_or_else(|| invalid("expected section/key=value"))?;
        let (section, key) = path
            .split_once('/')
            .ok_or_else(|| invalid("expected section/key=value"))?;
        let key = format!("{}.{}", section.trim(), key.trim());
        let value = value.trim();

        match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            Some(list) => {
                let items: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect();
                self.set(&key, items)
            }
            None => self.set(&key, value),
        }
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - The merged configuration cannot be deserialized into the `Config` struct.
    pub fn build(self) -> Result<Config> {
        let sources = self.source_list();
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let to_error = |e: config::ConfigError| -> CohoError {
            ConfigError::ParseError {
                path: sources.clone(),
                message: e.to_string(),
            }
            .into()
        };
        let cfg = builder.build().map_err(to_error)?;
        let config: Config = cfg.try_deserialize().map_err(to_error)?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.files.clone()
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (source, path))| format!("{}. [{}] {}", i + 1, source, path.display()))
            .collect()
    }

    fn source_list(&self) -> String {
        if self.files.is_empty() {
            "<defaults>".to_string()
        } else {
            self.files
                .iter()
                .map(|(_, path)| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository catalog, selection and traversal.
//!
//! ```text
//!  catalog.rs           registry.rs                 traverse.rs
//!  built-in table  -->  Registry                -->  RepoDir::for_each
//!  + [catalog] repos    groups (lazy refs)           <root>/<repo_name>
//!                       auto = dirs on disk          ../<repo_name> when nested
//!                       resolve_selection(tokens)
//!                         id -> group -> error
//!                         dedup, first wins
//! ```

pub mod catalog;
pub mod registry;
pub mod traverse;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use crate::config::types::RepoEntry;

pub use registry::{GroupEntry, Registry};
pub use traverse::RepoDir;

/// How a repository is version-controlled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoKind {
    Git,
    /// Subversion checkout of `url`; no remotes and no branches.
    Svn { url: String },
}

/// Immutable catalog entry for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDescriptor {
    id: String,
    title: String,
    repo_name: String,
    version_file_paths: Vec<PathBuf>,
    /// Catalog data only; no command reads it yet.
    exclude_patterns: Vec<String>,
    js_paths: Vec<PathBuf>,
    js_src_name: Option<String>,
    inactive: bool,
    platform: bool,
    kind: RepoKind,
}

impl RepoDescriptor {
    /// Creates an active, non-platform git repository.
    pub fn new(id: impl Into<String>, title: impl Into<String>, repo_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            repo_name: repo_name.into(),
            version_file_paths: Vec::new(),
            exclude_patterns: Vec::new(),
            js_paths: Vec::new(),
            js_src_name: None,
            inactive: false,
            platform: false,
            kind: RepoKind::Git,
        }
    }

    #[must_use]
    pub const fn platform(mut self) -> Self {
        self.platform = true;
        self
    }

    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.inactive = true;
        self
    }

    #[must_use]
    pub fn svn(mut self, url: impl Into<String>) -> Self {
        self.kind = RepoKind::Svn { url: url.into() };
        self
    }

    #[must_use]
    pub fn with_js_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.js_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_js_src_name(mut self, name: impl Into<String>) -> Self {
        self.js_src_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_version_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.version_file_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Directory name under the workspace root and upstream repository name.
    #[must_use]
    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    #[must_use]
    pub const fn is_inactive(&self) -> bool {
        self.inactive
    }

    #[must_use]
    pub const fn is_platform(&self) -> bool {
        self.platform
    }

    #[must_use]
    pub fn is_plugin(&self) -> bool {
        self.id.starts_with("plugin")
    }

    #[must_use]
    pub const fn kind(&self) -> &RepoKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_git(&self) -> bool {
        matches!(self.kind, RepoKind::Git)
    }

    /// Files holding the version string; `VERSION` when none are configured.
    #[must_use]
    pub fn version_files(&self) -> Vec<&Path> {
        if self.version_file_paths.is_empty() {
            vec![Path::new("VERSION")]
        } else {
            self.version_file_paths.iter().map(PathBuf::as_path).collect()
        }
    }

    /// Paths of generated or vendored files, as listed in the catalog.
    #[must_use]
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Destinations of the cordova.js snapshot inside this repository.
    #[must_use]
    pub fn js_paths(&self) -> &[PathBuf] {
        &self.js_paths
    }

    /// Name of the built bundle under `cordova-js/pkg`.
    #[must_use]
    pub fn js_source_name(&self) -> String {
        self.js_src_name
            .clone()
            .unwrap_or_else(|| format!("cordova.{}.js", self.id))
    }
}

impl From<&RepoEntry> for RepoDescriptor {
    fn from(entry: &RepoEntry) -> Self {
        let repo_name = entry
            .repo_name
            .clone()
            .unwrap_or_else(|| format!("cordova-{}", entry.id));
        let title = entry.title.clone().unwrap_or_else(|| entry.id.clone());
        let mut repo = Self::new(&entry.id, title, repo_name)
            .with_js_paths(entry.js_paths.iter().cloned())
            .with_version_files(entry.version_file_paths.iter().cloned())
            .with_excludes(entry.exclude_patterns.iter().cloned());
        repo.js_src_name.clone_from(&entry.js_src_name);
        repo.inactive = entry.inactive;
        repo.platform = entry.platform;
        if let Some(url) = &entry.svn {
            repo = repo.svn(url);
        }
        repo
    }
}

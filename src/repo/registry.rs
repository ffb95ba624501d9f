// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository registry and selector resolution.
//!
//! ```text
//! resolve_selection(["ios", "cadence", "cordova-ios"])
//!   "ios"          -> repo ios                 [ios]
//!   "cadence"      -> group
//!                      Group(active-platform)  [ios, android, ...]
//!                      Repo(cli), Repo(js) ... [..., cli, js, ...]
//!   "cordova-ios"  -> strip prefix -> ios      (already selected)
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, warn};

use super::RepoDescriptor;
use super::catalog::{CADENCE_EXTRAS, builtin_repos};
use crate::config::types::CatalogConfig;
use crate::error::{CohoResult, RepoError};

/// Default prefix stripped from selector tokens.
pub const DEFAULT_ID_PREFIX: &str = "cordova-";

/// One member of a repository group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupEntry {
    /// A repository id.
    Repo(String),
    /// Another group, expanded at resolution time.
    Group(String),
}

/// Catalog of repositories and named groups.
#[derive(Debug, Clone)]
pub struct Registry {
    repos: Vec<RepoDescriptor>,
    groups: BTreeMap<String, Vec<GroupEntry>>,
    id_prefix: String,
}

impl Registry {
    /// Registry over the built-in catalog, with `auto` computed under `root`.
    #[must_use]
    pub fn builtin(root: &Path) -> Self {
        Self::new(builtin_repos(), root, DEFAULT_ID_PREFIX)
    }

    /// Registry over the built-in catalog extended by `[catalog]` configuration.
    ///
    /// Configured repositories replace built-in ones with the same id.
    /// Configured groups replace built-in groups with the same name.
    #[must_use]
    pub fn from_config(config: &CatalogConfig, root: &Path) -> Self {
        let mut repos = builtin_repos();
        for entry in &config.repos {
            let repo = RepoDescriptor::from(entry);
            match repos.iter_mut().find(|r| r.id() == repo.id()) {
                Some(existing) => *existing = repo,
                None => repos.push(repo),
            }
        }

        let mut registry = Self::new(repos, root, &config.id_prefix);
        for (name, tokens) in &config.groups {
            let entries = tokens
                .iter()
                .map(|token| registry.classify(token))
                .collect();
            if registry.groups.insert(name.clone(), entries).is_some() {
                warn!(group = %name, "configured group replaces built-in group");
            }
        }
        registry
    }

    /// Builds the registry and its built-in groups.
    pub fn new(repos: Vec<RepoDescriptor>, root: &Path, id_prefix: &str) -> Self {
        let mut seen = BTreeSet::new();
        let repos: Vec<RepoDescriptor> = repos
            .into_iter()
            .filter(|r| seen.insert(r.id().to_string()))
            .collect();

        let ids = |pred: &dyn Fn(&RepoDescriptor) -> bool| -> Vec<GroupEntry> {
            repos
                .iter()
                .filter(|r| pred(r))
                .map(|r| GroupEntry::Repo(r.id().to_string()))
                .collect()
        };

        let mut groups = BTreeMap::new();
        groups.insert("all".to_string(), ids(&|_| true));
        groups.insert(
            "auto".to_string(),
            ids(&|r| root.join(r.repo_name()).is_dir()),
        );
        groups.insert("platform".to_string(), ids(&RepoDescriptor::is_platform));
        groups.insert("plugins".to_string(), ids(&RepoDescriptor::is_plugin));
        groups.insert(
            "active-platform".to_string(),
            ids(&|r| r.is_platform() && !r.is_inactive()),
        );
        groups.insert("release-repos".to_string(), ids(&|r| !r.is_inactive()));

        let mut cadence = vec![GroupEntry::Group("active-platform".to_string())];
        cadence.extend(
            CADENCE_EXTRAS
                .iter()
                .map(|id| GroupEntry::Repo((*id).to_string())),
        );
        groups.insert("cadence".to_string(), cadence);

        debug!(repos = repos.len(), groups = groups.len(), "registry built");
        Self {
            repos,
            groups,
            id_prefix: id_prefix.to_string(),
        }
    }

    /// Every repository, in catalog order.
    #[must_use]
    pub fn repos(&self) -> &[RepoDescriptor] {
        &self.repos
    }

    /// Group names in sorted order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Looks up a repository by id, with or without the id prefix.
    #[must_use]
    pub fn repo(&self, token: &str) -> Option<&RepoDescriptor> {
        let id = token.strip_prefix(&self.id_prefix).unwrap_or(token);
        self.repos
            .iter()
            .find(|r| r.id() == id)
            .or_else(|| self.repos.iter().find(|r| r.id() == token))
    }

    /// Fully expanded members of a group.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelector` for an unknown group or a dangling reference,
    /// and `GroupCycle` when the group references itself.
    pub fn group_members(&self, name: &str) -> CohoResult<Vec<&RepoDescriptor>> {
        let mut selection = Selection::default();
        self.expand_group(name, &mut selection, &mut Vec::new())?;
        Ok(selection.repos)
    }

    /// Resolves repo ids and group names into distinct descriptors.
    ///
    /// Each token is tried as a repo id, then as a group name. An empty
    /// selection means `auto`. Duplicates keep their first position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelector` naming the first token that is neither.
    pub fn resolve_selection<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> CohoResult<Vec<&RepoDescriptor>> {
        if tokens.is_empty() {
            return self.group_members("auto");
        }

        let mut selection = Selection::default();
        for token in tokens {
            let token = token.as_ref();
            if let Some(repo) = self.repo(token) {
                selection.push(repo);
            } else if self.groups.contains_key(token) {
                self.expand_group(token, &mut selection, &mut Vec::new())?;
            } else {
                return Err(RepoError::InvalidSelector {
                    token: token.to_string(),
                }
                .into());
            }
        }
        Ok(selection.repos)
    }

    fn classify(&self, token: &str) -> GroupEntry {
        match self.repo(token) {
            Some(repo) => GroupEntry::Repo(repo.id().to_string()),
            None => GroupEntry::Group(token.to_string()),
        }
    }

    fn expand_group<'a>(
        &'a self,
        name: &str,
        selection: &mut Selection<'a>,
        stack: &mut Vec<String>,
    ) -> CohoResult<()> {
        if stack.iter().any(|g| g == name) {
            return Err(RepoError::GroupCycle {
                group: name.to_string(),
            }
            .into());
        }
        let entries = self
            .groups
            .get(name)
            .ok_or_else(|| RepoError::InvalidSelector {
                token: name.to_string(),
            })?;

        stack.push(name.to_string());
        for entry in entries {
            match entry {
                GroupEntry::Repo(id) => {
                    let repo = self
                        .repo(id)
                        .ok_or_else(|| RepoError::InvalidSelector { token: id.clone() })?;
                    selection.push(repo);
                }
                GroupEntry::Group(group) => self.expand_group(group, selection, stack)?,
            }
        }
        stack.pop();
        Ok(())
    }
}

#[derive(Default)]
struct Selection<'a> {
    ids: BTreeSet<&'a str>,
    repos: Vec<&'a RepoDescriptor>,
}

impl<'a> Selection<'a> {
    fn push(&mut self, repo: &'a RepoDescriptor) {
        if self.ids.insert(repo.id()) {
            self.repos.push(repo);
        }
    }
}

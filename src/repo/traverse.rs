// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Directory context stack.
//!
//! ```text
//! RepoDir { root, frames: [] }                 path = <root>
//!   for_each([ios, android])
//!     enter "cordova-ios"     frames: [cordova-ios]     path = <root>/cordova-ios
//!       for_each([js])
//!         enter "../cordova-js" frames: [cordova-ios, cordova-js]
//!                                                 path = <root>/cordova-js
//!       (back to [cordova-ios])
//!     enter "cordova-android" frames: [cordova-android]
//! ```
//!
//! A `RepoDir` is a value. Entering produces a new value and the caller's
//! context never changes; the process working directory is never touched.

use std::path::{Component, Path, PathBuf};

use tracing::{Instrument, info_span};

use super::RepoDescriptor;
use crate::error::{CohoResult, RepoError, Result};

/// Workspace root plus the repository directories entered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDir {
    root: PathBuf,
    frames: Vec<PathBuf>,
}

impl RepoDir {
    /// Top-level context at the workspace root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            frames: Vec::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute directory of this context.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.frames.last().map_or(&self.root, PathBuf::as_path)
    }

    /// Number of repositories entered.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Path used to enter `repo_name` from this context.
    #[must_use]
    pub fn entry_path(&self, repo_name: &str) -> PathBuf {
        if self.frames.is_empty() {
            PathBuf::from(repo_name)
        } else {
            Path::new("..").join(repo_name)
        }
    }

    /// Enters the directory of `repo`.
    ///
    /// # Errors
    ///
    /// Returns `RepoNotCloned` if the directory does not exist.
    pub fn enter(&self, repo: &RepoDescriptor) -> CohoResult<Self> {
        let target = normalize(&self.path().join(self.entry_path(repo.repo_name())));
        if !target.is_dir() {
            return Err(RepoError::RepoNotCloned {
                repo_name: repo.repo_name().to_string(),
            }
            .into());
        }
        let mut frames = self.frames.clone();
        frames.push(target);
        Ok(Self {
            root: self.root.clone(),
            frames,
        })
    }

    /// Runs `body` once per repository, inside that repository's directory.
    ///
    /// Strictly sequential; stops at the first error.
    ///
    /// # Errors
    ///
    /// Returns `RepoNotCloned` for a missing directory, or the first error
    /// returned by `body`.
    pub async fn for_each<'r, F>(&self, repos: &[&'r RepoDescriptor], mut body: F) -> Result<()>
    where
        F: AsyncFnMut(&'r RepoDescriptor, &RepoDir) -> Result<()>,
    {
        for &repo in repos {
            let dir = self.enter(repo)?;
            let span = info_span!("repo", name = %repo.repo_name());
            body(repo, &dir).instrument(span).await?;
        }
        Ok(())
    }
}

/// Resolves `.` and `..` components lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), None | Some(Component::ParentDir)) {
                    out.push("..");
                } else {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    out
}

// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared test utilities.
//!
//! ```text
//! <temp>/
//!   git.apache.org/cordova-ios.git   bare upstream
//!   seed/cordova-ios                 clone used to push upstream commits
//!   workspace/cordova-ios            clone under test, remote "apache"
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::cmd::Workspace;
use crate::config::Config;
use crate::core::exec::{Executor, RunContext};
use crate::repo::{RepoDir, Registry};

/// Remote name given to the upstream in workspace clones.
pub(crate) const UPSTREAM_REMOTE: &str = "apache";

/// Runs git in `cwd` and returns trimmed stdout, panicking on failure.
pub(crate) fn git(cwd: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed in {}: {}",
        cwd.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Upstream repositories plus a workspace of clones.
pub(crate) struct Fixture {
    temp: TempDir,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        for dir in ["git.apache.org", "seed", "workspace"] {
            std::fs::create_dir_all(temp.path().join(dir)).expect("failed to create dir");
        }
        Self { temp }
    }

    pub(crate) fn root(&self) -> PathBuf {
        self.temp.path().join("workspace")
    }

    pub(crate) fn repo_path(&self, repo_name: &str) -> PathBuf {
        self.root().join(repo_name)
    }

    pub(crate) fn upstream_path(&self, repo_name: &str) -> PathBuf {
        self.temp
            .path()
            .join("git.apache.org")
            .join(format!("{repo_name}.git"))
    }

    fn seed_path(&self, repo_name: &str) -> PathBuf {
        self.temp.path().join("seed").join(repo_name)
    }

    /// Creates an upstream with one commit on `master` and clones it into
    /// the workspace.
    pub(crate) fn add_repo(&self, repo_name: &str) -> PathBuf {
        let upstream = self.upstream_path(repo_name);
        let upstream_str = upstream.to_string_lossy().to_string();
        git(
            self.temp.path(),
            &["init", "--quiet", "--bare", "-b", "master", &upstream_str],
        );

        let seed = self.seed_path(repo_name);
        std::fs::create_dir_all(&seed).expect("failed to create seed");
        git(&seed, &["init", "--quiet", "-b", "master"]);
        configure_user(&seed);
        std::fs::write(seed.join("VERSION"), "3.0.0-dev\n").expect("failed to write");
        git(&seed, &["add", "VERSION"]);
        git(&seed, &["commit", "--quiet", "-m", "Initial commit"]);
        git(&seed, &["remote", "add", "origin", &upstream_str]);
        git(&seed, &["push", "--quiet", "origin", "master"]);

        self.clone_into_workspace(repo_name)
    }

    /// Clones an existing upstream into the workspace.
    pub(crate) fn clone_into_workspace(&self, repo_name: &str) -> PathBuf {
        let upstream_str = self.upstream_path(repo_name).to_string_lossy().to_string();
        let dest = self.repo_path(repo_name);
        git(
            &self.root(),
            &["clone", "--quiet", "-o", UPSTREAM_REMOTE, &upstream_str, repo_name],
        );
        configure_user(&dest);
        dest
    }

    /// Pushes `count` new commits to `branch` of the upstream.
    pub(crate) fn push_upstream(&self, repo_name: &str, branch: &str, count: usize) {
        let seed = self.seed_path(repo_name);
        if git(&seed, &["branch", "--list", branch]).is_empty() {
            git(&seed, &["checkout", "--quiet", "-b", branch, "master"]);
        } else {
            git(&seed, &["checkout", "--quiet", branch]);
        }
        for i in 0..count {
            let file = format!("upstream-{branch}-{i}.txt");
            std::fs::write(seed.join(&file), format!("{i}\n")).expect("failed to write");
            git(&seed, &["add", &file]);
            git(&seed, &["commit", "--quiet", "-m", &format!("upstream {i}")]);
        }
        git(&seed, &["push", "--quiet", "origin", branch]);
    }

    /// Commits a file in the workspace clone.
    pub(crate) fn commit_local(&self, repo_name: &str, file: &str, message: &str) {
        let repo = self.repo_path(repo_name);
        std::fs::write(repo.join(file), format!("{message}\n")).expect("failed to write");
        git(&repo, &["add", file]);
        git(&repo, &["commit", "--quiet", "-m", message]);
    }

    pub(crate) fn registry(&self) -> Registry {
        Registry::builtin(&self.root())
    }

    pub(crate) fn dir(&self) -> RepoDir {
        RepoDir::new(self.root())
    }

    /// Workspace over the fixture with clones taken from the local upstreams.
    pub(crate) fn workspace(&self) -> Workspace {
        let mut config = Config::default();
        config.global.color = false;
        config.upstream.clone_url_prefix = format!(
            "{}/",
            self.temp.path().join("git.apache.org").display()
        );
        Workspace::new(config, &self.root())
    }

    /// Creates an upstream with one commit on `master` without cloning it.
    pub(crate) fn add_upstream_only(&self, repo_name: &str) {
        self.add_repo(repo_name);
        std::fs::remove_dir_all(self.repo_path(repo_name)).expect("failed to remove clone");
    }
}

fn configure_user(repo: &Path) {
    git(repo, &["config", "user.email", "test@test.com"]);
    git(repo, &["config", "user.name", "Test"]);
}

/// Run context with the default upstream prefixes and no forced color.
pub(crate) fn run_context() -> RunContext {
    RunContext::new(
        Executor::new().with_color(false),
        vec![
            "git-wip-us.apache.org/repos/asf/".to_string(),
            "git.apache.org/".to_string(),
        ],
    )
}

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Runs an async closure while capturing info-level tracing output.
///
/// Returns the closure's value and the captured log text.
pub(crate) async fn run_with_logs<T, F>(f: F) -> Result<(T, String)>
where
    F: AsyncFnOnce() -> Result<T>,
{
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .without_time()
        .finish();

    let _guard = tracing::subscriber::set_default(subscriber);
    let value = f().await?;

    let guard = buffer
        .lock()
        .map_err(|_| anyhow::anyhow!("log buffer poisoned"))?;
    Ok((value, String::from_utf8_lossy(&guard).to_string()))
}

// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!            sync.rs  update(): fetch, staleness, rebase
//!              |   \
//!              |    v
//!              |  stash.rs  protect(): stash, body, restore
//!              v
//!          remote.rs  resolve_remote(): upstream by URL, cached
//!              |
//!     +--------+--------+
//!     v                 v
//!  query.rs          cmd.rs
//!  GixBackend        git CLI via RunContext
//!  (read, no fork)   (probes and mutations)
//! ```

pub mod backend;
pub mod cmd;
pub mod query;
pub mod remote;
pub mod stash;
pub mod sync;

// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for command execution.
//!
//! ```text
//!         core
//!          |
//!     +----+----+
//!     |         |
//!     v         v
//!   exec     process
//!     |         |
//! RunContext  ProcessBuilder
//! Executor    ProcessOutput
//! ExecOutcome
//! ```

pub mod exec;
pub mod process;

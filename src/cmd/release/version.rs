// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release version rules.
//!
//! ```text
//! validate        3.1.0 | 3.1.0-rc2            ok
//!                 3.1 | 3.1.0rc2 | v3.1.0      InvalidVersion
//! branch name     3.1.0-rc2 -> 3.1.x           3.2.0-dev -> master
//! dev version     3.1.0 -> 3.2.0-dev           3.1.2-0.8.0-rc2 -> 3.2.0-0.8.0-dev
//! ```

use regex::Regex;

use crate::error::{CohoError, CohoResult, ReleaseError};

fn compile(pattern: &str) -> CohoResult<Regex> {
    Regex::new(pattern).map_err(|e| CohoError::Other(format!("invalid pattern {pattern}: {e}").into()))
}

/// Checks that `version` has the form `#.#.#` or `#.#.#-rc#`.
///
/// # Errors
///
/// Returns `InvalidVersion` otherwise.
pub fn validate_version(version: &str) -> CohoResult<&str> {
    if compile(r"^\d+\.\d+\.\d+(-rc\d)?$")?.is_match(version) {
        Ok(version)
    } else {
        Err(ReleaseError::InvalidVersion {
            version: version.to_string(),
        }
        .into())
    }
}

/// Name of the branch a version is released from.
///
/// # Errors
///
/// Only fails if the internal pattern does not compile.
pub fn release_branch_name(version: &str) -> CohoResult<String> {
    if version.ends_with("-dev") {
        return Ok("master".to_string());
    }
    Ok(compile(r"\d+(-?rc\d)?$")?
        .replace(version, "x")
        .into_owned())
}

/// Development version that follows `version` on master.
///
/// The minor component is bumped, the patch reset to 0, any rc suffix
/// dropped and `-dev` appended.
///
/// # Errors
///
/// Returns `InvalidVersion` if the minor component is not a number.
pub fn dev_version(version: &str) -> CohoResult<String> {
    let invalid = || -> CohoError {
        ReleaseError::InvalidVersion {
            version: version.to_string(),
        }
        .into()
    };
    let base = compile(r"-rc.*$")?.replace(version, "");
    let mut parts: Vec<String> = base.split('.').map(str::to_string).collect();
    if parts.len() < 3 {
        return Err(invalid());
    }

    let minor: u64 = parts[1].parse().map_err(|_| invalid())?;
    parts[1] = (minor + 1).to_string();
    parts[2] = match parts[2].split_once('-') {
        Some((_, rest)) => format!("0-{rest}"),
        None => "0".to_string(),
    };
    Ok(format!("{}-dev", parts.join(".")))
}

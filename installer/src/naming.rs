//! Collision-free target directory naming.
//!
//! When a module's desired directory name is taken, a numeric suffix is
//! probed deterministically: `widget`, `widget-2`, `widget-3`, and so on.
//! [`claim`] additionally creates the directory with an exclusive create,
//! closing the check-then-create race that a bare existence probe leaves
//! open under concurrent installs.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Upper bound on candidate names probed per allocation.
pub const MAX_NAME_ATTEMPTS: u32 = 500;

/// Returns the first candidate name not present under `parent`.
///
/// Probes `desired`, then `desired-2` through `desired-<max_attempts>`.
/// Performs no mutation; under concurrency the returned name may be taken
/// by the time the caller uses it, so placement goes through [`claim`].
///
/// # Errors
///
/// Returns [`InstallerError::ExhaustedNamespace`] when every candidate
/// collides.
pub fn allocate(parent: &Utf8Path, desired: &str, max_attempts: u32) -> Result<String> {
    for attempt in 1..=max_attempts {
        let candidate = candidate_name(desired, attempt);
        if !parent.join(&candidate).exists() {
            return Ok(candidate);
        }
    }
    Err(InstallerError::ExhaustedNamespace {
        name: desired.to_owned(),
        attempts: max_attempts,
    })
}

/// Atomically claims a collision-free directory under `parent`.
///
/// Each candidate is taken with an exclusive `create_dir`; a concurrent
/// claimer winning the race surfaces as `AlreadyExists` and moves the
/// probe to the next candidate. Returns the claimed name and its path.
///
/// # Errors
///
/// Returns [`InstallerError::ExhaustedNamespace`] when every candidate is
/// taken, or [`InstallerError::Io`] for any other filesystem failure.
pub fn claim(
    parent: &Utf8Path,
    desired: &str,
    max_attempts: u32,
) -> Result<(String, Utf8PathBuf)> {
    for attempt in 1..=max_attempts {
        let candidate = candidate_name(desired, attempt);
        let path = parent.join(&candidate);
        match std::fs::create_dir(&path) {
            Ok(()) => return Ok((candidate, path)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(InstallerError::Io(e)),
        }
    }
    Err(InstallerError::ExhaustedNamespace {
        name: desired.to_owned(),
        attempts: max_attempts,
    })
}

/// Builds the candidate name for a probe attempt (1-based).
fn candidate_name(desired: &str, attempt: u32) -> String {
    if attempt == 1 {
        desired.to_owned()
    } else {
        format!("{desired}-{attempt}")
    }
}

//! Project root detection.
//!
//! A directory is a Stratus project root when it contains a `project.json`
//! with a non-empty `name` field. Commands may be invoked from anywhere
//! inside a project tree, so detection walks from a start directory up
//! through a bounded number of parent levels.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

/// Filename of the project configuration file marking a project root.
pub const PROJECT_MANIFEST: &str = "project.json";

/// Maximum number of parent levels searched above the start directory.
pub const MAX_PARENT_LEVELS: usize = 10;

/// Checks whether `dir` is a Stratus project root.
///
/// A project root is identified by a parseable `project.json` declaring a
/// non-empty `name`.
#[must_use]
pub fn is_project_root(dir: &Utf8Path) -> bool {
    let config = dir.join(PROJECT_MANIFEST);
    if !config.is_file() {
        return false;
    }

    let Ok(contents) = std::fs::read_to_string(&config) else {
        return false;
    };
    let Ok(value) = serde_json::from_str::<Value>(&contents) else {
        return false;
    };

    value
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty())
}

/// Locates the project root containing `start`, if any.
///
/// Checks `start` itself, then up to [`MAX_PARENT_LEVELS`] parent
/// directories, returning the first that [`is_project_root`] accepts.
#[must_use]
pub fn find_project_root(start: &Utf8Path) -> Option<Utf8PathBuf> {
    if is_project_root(start) {
        return Some(start.to_owned());
    }

    let mut current = start;
    for _ in 0..MAX_PARENT_LEVELS {
        current = current.parent()?;
        if is_project_root(current) {
            return Some(current.to_owned());
        }
    }
    None
}

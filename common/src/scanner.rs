//! Manifest discovery engine.
//!
//! Recursively walks a project tree and returns paths to module manifest
//! files, optionally filtered by declared capability. Each scan re-walks
//! the tree fresh; results are a live view, never cached. Traversal order
//! is unspecified, so callers must treat results as a set.

use camino::{Utf8Path, Utf8PathBuf};
use log::warn;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use walkdir::WalkDir;

/// Glob pattern matching module manifest filenames.
pub const MANIFEST_PATTERN: &str = "*module.json";

/// A structural capability marker within a manifest.
///
/// Capability membership is decided by the presence of a configuration
/// section, not by the `profile` enum: a manifest with a `lambda` section
/// is a lambda regardless of what profile it declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Modules with a `lambda` configuration section.
    Lambda,
    /// Modules with an `apiGateway` configuration section.
    Endpoint,
}

impl Capability {
    /// Returns the manifest key whose presence marks this capability.
    #[must_use]
    pub fn manifest_key(self) -> &'static str {
        match self {
            Self::Lambda => "lambda",
            Self::Endpoint => "apiGateway",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lambda => f.write_str("lambda"),
            Self::Endpoint => f.write_str("endpoint"),
        }
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "lambda" => Ok(Self::Lambda),
            "endpoint" => Ok(Self::Endpoint),
            other => Err(format!("unrecognised capability: {other}")),
        }
    }
}

/// Recursively collects files under `root` whose filename matches `pattern`.
///
/// A non-existent root yields an empty result rather than an error: "no
/// modules found yet" is a valid project state. Unreadable directory
/// entries and non-UTF-8 paths are skipped with a warning.
#[must_use]
pub fn scan(root: &Utf8Path, pattern: &str) -> Vec<Utf8PathBuf> {
    let Ok(matcher) = glob::Pattern::new(pattern) else {
        warn!("invalid filename pattern {pattern}; returning no matches");
        return Vec::new();
    };

    if !root.is_dir() {
        return Vec::new();
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry under {root}: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            warn!("skipping non-UTF-8 path under {root}");
            continue;
        };
        if !matcher.matches(file_name) {
            continue;
        }
        match Utf8PathBuf::try_from(entry.path().to_path_buf()) {
            Ok(path) => found.push(path),
            Err(e) => warn!("skipping non-UTF-8 path under {root}: {e}"),
        }
    }
    found
}

/// Collects module manifests under `root` declaring the given capability.
///
/// Each candidate manifest is opened and kept only when the capability's
/// configuration key is present. A manifest that cannot be read or parsed
/// is skipped with a warning rather than aborting the scan: partial
/// results beat losing a whole tree walk to one bad file.
#[must_use]
pub fn scan_by_capability(root: &Utf8Path, capability: Capability) -> Vec<Utf8PathBuf> {
    scan(root, MANIFEST_PATTERN)
        .into_iter()
        .filter(|path| match declares_capability(path, capability) {
            Ok(declares) => declares,
            Err(reason) => {
                warn!("skipping unreadable manifest {path}: {reason}");
                false
            }
        })
        .collect()
}

/// Convenience wrapper returning all lambda manifests under a project root.
#[must_use]
pub fn find_lambda_manifests(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    scan_by_capability(root, Capability::Lambda)
}

/// Convenience wrapper returning all endpoint manifests under a project root.
#[must_use]
pub fn find_endpoint_manifests(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    scan_by_capability(root, Capability::Endpoint)
}

/// Returns every module manifest path under `root`, regardless of capability.
#[must_use]
pub fn find_all_manifests(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    scan(root, MANIFEST_PATTERN)
}

/// Checks whether the manifest at `path` contains the capability's key.
fn declares_capability(path: &Utf8Path, capability: Capability) -> Result<bool, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| e.to_string())?;
    Ok(value
        .as_object()
        .is_some_and(|fields| fields.contains_key(capability.manifest_key())))
}

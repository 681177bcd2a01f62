//! Module manifest model and reader.
//!
//! Every Stratus module ships a `module.json` at its root declaring its
//! name, capability profile, and arbitrary configuration consumed by
//! downstream template generation. This module parses and validates that
//! file into a typed record; it never mutates manifests on disk except
//! through the explicit [`Manifest::write`] used when a module is renamed
//! at install time.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Filename of a module manifest.
pub const MODULE_MANIFEST: &str = "module.json";

/// The declared category of a module, governing install placement logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Profile {
    /// A single deployable function.
    Lambda,
    /// A grouping of related functions installed as one unit.
    LambdaGroup,
    /// A front-end asset bundle (recognised but not installable).
    Front,
    /// A whole-project template (recognised but not installable).
    Project,
}

impl Profile {
    /// Returns the manifest spelling of this profile.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lambda => "lambda",
            Self::LambdaGroup => "lambdaGroup",
            Self::Front => "front",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "lambda" => Ok(Self::Lambda),
            "lambdaGroup" => Ok(Self::LambdaGroup),
            "front" => Ok(Self::Front),
            "project" => Ok(Self::Project),
            other => Err(format!("unrecognised profile: {other}")),
        }
    }
}

/// Errors arising from reading or validating a module manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest file does not exist.
    #[error("manifest not found at {path}")]
    NotFound {
        /// Path where the manifest was expected.
        path: String,
    },

    /// The manifest file could not be read or parsed as JSON.
    #[error("invalid manifest at {path}: {reason}")]
    Parse {
        /// Path to the unparsable manifest.
        path: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// A required field is absent from the manifest.
    #[error("manifest at {path} is missing required field `{field}`")]
    MissingField {
        /// Path to the incomplete manifest.
        path: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// The `profile` field is present but not one of the recognised values.
    ///
    /// Signalled distinctly from [`ManifestError::Parse`] so callers can
    /// tell "wrong kind of module" apart from "malformed module".
    #[error("manifest at {path} declares unrecognised profile `{profile}`")]
    InvalidProfile {
        /// Path to the offending manifest.
        path: String,
        /// The unrecognised profile value.
        profile: String,
    },
}

/// The declared identity and capability of a module.
///
/// `extra` carries every manifest field other than `name` and `profile`
/// opaquely, so that writing a manifest back (after an install-time rename)
/// preserves downstream configuration verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    /// Unique module name within its installed scope.
    pub name: String,
    /// Declared capability profile.
    pub profile: Profile,
    /// Opaque nested configuration used by downstream tooling.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Reads and validates the manifest file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::NotFound`] when the file is absent,
    /// [`ManifestError::Parse`] when it is not valid JSON,
    /// [`ManifestError::MissingField`] when `name` or `profile` is absent
    /// or empty, and [`ManifestError::InvalidProfile`] when `profile` is
    /// present but unrecognised.
    pub fn load(path: &Utf8Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound {
                path: path.to_string(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ManifestError::Parse {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let value: Value =
            serde_json::from_str(&contents).map_err(|e| ManifestError::Parse {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let Value::Object(mut fields) = value else {
            return Err(ManifestError::Parse {
                path: path.to_string(),
                reason: "top-level value is not an object".to_owned(),
            });
        };

        let name = take_string(&mut fields, "name").ok_or(ManifestError::MissingField {
            path: path.to_string(),
            field: "name",
        })?;
        let profile_raw =
            take_string(&mut fields, "profile").ok_or(ManifestError::MissingField {
                path: path.to_string(),
                field: "profile",
            })?;
        let profile =
            Profile::from_str(&profile_raw).map_err(|_| ManifestError::InvalidProfile {
                path: path.to_string(),
                profile: profile_raw,
            })?;

        Ok(Self {
            name,
            profile,
            extra: fields,
        })
    }

    /// Writes this manifest to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] when serialisation or the write
    /// fails.
    pub fn write(&self, path: &Utf8Path) -> Result<(), ManifestError> {
        let rendered =
            serde_json::to_string_pretty(self).map_err(|e| ManifestError::Parse {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        std::fs::write(path, rendered).map_err(|e| ManifestError::Parse {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Removes `field` from `fields` when it holds a non-empty string.
fn take_string(fields: &mut Map<String, Value>, field: &str) -> Option<String> {
    match fields.remove(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;

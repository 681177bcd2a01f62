//! Error types for the Stratus installer.
//!
//! Each variant corresponds to one programmatically distinguishable failure
//! kind of the install pipeline, so callers can branch on the taxonomy
//! rather than parsing message strings. Underlying causes are preserved
//! via `#[source]`.

use crate::fetch::FetchError;
use stratus_common::ManifestError;
use thiserror::Error;

/// Errors that can occur during module installation.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The user-supplied module reference could not be parsed.
    #[error("invalid module reference: {reason}")]
    InvalidReference {
        /// Description of what was wrong with the reference.
        reason: String,
    },

    /// No Stratus project root could be located.
    #[error("project not found: {reason}")]
    ProjectNotFound {
        /// Description of why the project root was not found.
        reason: String,
    },

    /// Downloading or extracting the module archive failed.
    #[error("module download failed")]
    DownloadFailed {
        /// The underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// The staged module's manifest is missing or invalid.
    #[error("malformed module")]
    MalformedModule {
        /// The underlying manifest failure.
        #[source]
        source: ManifestError,
    },

    /// The module declares a profile this installer cannot place.
    ///
    /// Covers both unrecognised profiles and the recognised-but-unimplemented
    /// `front` and `project` profiles; callers must never see these as a
    /// silent success.
    #[error("module profile `{profile}` is not installable")]
    UnsupportedProfile {
        /// The offending profile value.
        profile: String,
    },

    /// Every candidate target directory name was already taken.
    #[error("no free directory name for `{name}` after {attempts} attempts")]
    ExhaustedNamespace {
        /// The desired base name.
        name: String,
        /// How many candidates were probed.
        attempts: u32,
    },

    /// The caller cancelled the install between pipeline states.
    #[error("installation cancelled")]
    Cancelled,

    /// A filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;

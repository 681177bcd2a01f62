//! Test doubles for exercising the install pipeline without network
//! access.
//!
//! Available to external test suites through the `test-support` feature.

use crate::fetch::{FetchError, ModuleFetcher};
use crate::reference::SourceReference;
use camino::Utf8Path;

/// A [`ModuleFetcher`] that populates the destination from an in-memory
/// file list, or fails with a canned error.
pub struct StubFetcher {
    outcome: StubOutcome,
}

enum StubOutcome {
    Populate(Vec<(String, String)>),
    Fail(String),
}

impl StubFetcher {
    /// Creates a stub that writes the given `(relative path, contents)`
    /// pairs into the destination directory.
    #[must_use]
    pub fn with_files(files: Vec<(String, String)>) -> Self {
        Self {
            outcome: StubOutcome::Populate(files),
        }
    }

    /// Creates a stub that stages only a manifest with the given contents.
    #[must_use]
    pub fn with_manifest(manifest_json: &str) -> Self {
        Self::with_files(vec![(
            stratus_common::MODULE_MANIFEST.to_owned(),
            manifest_json.to_owned(),
        )])
    }

    /// Creates a stub whose fetch always fails with an HTTP error.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: StubOutcome::Fail(reason.to_owned()),
        }
    }
}

impl ModuleFetcher for StubFetcher {
    fn fetch(&self, reference: &SourceReference, dest: &Utf8Path) -> Result<(), FetchError> {
        match &self.outcome {
            StubOutcome::Populate(files) => {
                std::fs::create_dir_all(dest)?;
                for (relative, contents) in files {
                    let path = dest.join(relative);
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, contents)?;
                }
                Ok(())
            }
            StubOutcome::Fail(reason) => Err(FetchError::Http {
                url: reference.archive_url(),
                reason: reason.clone(),
            }),
        }
    }
}

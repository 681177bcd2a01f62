//! Module archive fetching.
//!
//! Provides a trait-based abstraction for resolving a [`SourceReference`]
//! into a downloaded, extracted module directory, enabling dependency
//! injection for testing the install pipeline without network access.

use crate::extraction::{ExtractionError, extract_archive};
use crate::reference::SourceReference;
use camino::Utf8Path;
use log::{debug, warn};
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout covering the whole download.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors arising from fetching a module archive.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (transport error, timeout, or non-404 status).
    #[error("download failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The repository or ref does not exist (HTTP 404).
    #[error("archive not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The downloaded archive could not be extracted.
    #[error("archive extraction failed")]
    Extraction {
        /// The underlying extraction failure.
        #[source]
        source: ExtractionError,
    },

    /// I/O error writing the download or populating the destination.
    #[error("I/O error during fetch: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for fetching a module archive into a destination directory.
///
/// On success, `dest` holds the module contents with the archive's
/// top-level wrapper directory stripped. On failure, implementations must
/// leave `dest` absent or empty; no partial, ambiguous state.
#[cfg_attr(test, mockall::automock)]
pub trait ModuleFetcher {
    /// Downloads and extracts the archive for `reference` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on download, timeout, or extraction
    /// failure.
    fn fetch(&self, reference: &SourceReference, dest: &Utf8Path) -> Result<(), FetchError>;
}

/// HTTP-based fetcher using `ureq` against the hosting provider's archive
/// export endpoint.
pub struct HttpFetcher;

impl ModuleFetcher for HttpFetcher {
    fn fetch(&self, reference: &SourceReference, dest: &Utf8Path) -> Result<(), FetchError> {
        let url = reference.archive_url();
        debug!("downloading module archive from {url}");

        let archive = download_to_tempfile(&url)?;

        std::fs::create_dir_all(dest)?;
        let result = extract_archive(archive.path(), dest)
            .map_err(|source| FetchError::Extraction { source });

        match result {
            Ok(count) => {
                debug!("extracted {count} file(s) into {dest}");
                Ok(())
            }
            Err(e) => {
                // Leave dest absent rather than half-populated.
                if let Err(cleanup) = std::fs::remove_dir_all(dest) {
                    warn!("could not clean up {dest} after failed extraction: {cleanup}");
                }
                Err(e)
            }
        }
    }
}

/// Downloads `url` into an unlinked-on-drop temporary file.
fn download_to_tempfile(url: &str) -> Result<tempfile::NamedTempFile, FetchError> {
    let response = http_agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;

    let mut archive = tempfile::NamedTempFile::new()?;
    std::io::copy(&mut response.into_body().as_reader(), archive.as_file_mut())?;
    Ok(archive)
}

/// Shared `ureq` agent with the download timeout configured.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Maps a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

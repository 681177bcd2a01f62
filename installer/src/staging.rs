//! Staging area management.
//!
//! An in-progress download is held in a uniquely named `temp-<token>`
//! directory under the project root. The random token prevents collisions
//! with concurrent or leftover installs; the area is owned exclusively by
//! one install call and is removed on every exit path.

use camino::{Utf8Path, Utf8PathBuf};
use log::warn;
use stratus_common::MODULE_MANIFEST;
use tempfile::TempDir;

/// Filename prefix for staging directories.
pub const STAGING_PREFIX: &str = "temp-";

/// A temporary staging directory under the project root.
///
/// Dropping a `StagingArea` removes the directory best-effort; removal
/// failures are logged and never surfaced, so teardown can never mask the
/// error that triggered it.
#[derive(Debug)]
pub struct StagingArea {
    dir: Option<TempDir>,
    path: Utf8PathBuf,
}

impl StagingArea {
    /// Creates a fresh staging directory directly under `project_root`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or its
    /// path is not valid UTF-8.
    pub fn create(project_root: &Utf8Path) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(project_root)?;
        let path = Utf8PathBuf::try_from(dir.path().to_path_buf())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /// Returns the staging directory path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the path of the staged module's manifest file.
    #[must_use]
    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.path.join(MODULE_MANIFEST)
    }

    /// Removes the staging directory.
    ///
    /// Removal failure is logged, not returned: by the time staging is
    /// torn down there is either a success value or a primary error that
    /// must not be displaced.
    pub fn remove(mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        // The fetcher may already have removed the directory when cleaning
        // up a failed extraction.
        if !self.path.exists() {
            drop(dir.keep());
            return;
        }
        if let Err(e) = dir.close() {
            warn!("could not remove staging directory {}: {e}", self.path);
        }
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        self.cleanup();
    }
}

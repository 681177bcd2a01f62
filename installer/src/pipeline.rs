//! Install pipeline orchestration.
//!
//! Drives one module installation end to end: validate the reference,
//! stage the download, validate the staged manifest, place the module
//! into the project tree, and tear the staging area down on every exit
//! path. The pipeline owns the all-or-nothing commit contract; staging
//! cleanup is guaranteed by [`StagingArea`]'s drop behaviour even when a
//! step fails part-way.

use crate::error::{InstallerError, Result};
use crate::fetch::ModuleFetcher;
use crate::placement::place_module;
use crate::reference::SourceReference;
use crate::staging::StagingArea;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use stratus_common::{Manifest, ManifestError, Profile};

/// Cooperative cancellation flag checked between pipeline states.
///
/// Cloning shares the flag, so a caller can hand one clone to the pipeline
/// and trip the other from elsewhere. Cancellation tears staging down
/// exactly as a failure would.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(InstallerError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Orchestrates module installation over an injected fetcher.
pub struct Installer<'a> {
    fetcher: &'a dyn ModuleFetcher,
}

impl<'a> Installer<'a> {
    /// Creates an installer using the given fetcher.
    #[must_use]
    pub fn new(fetcher: &'a dyn ModuleFetcher) -> Self {
        Self { fetcher }
    }

    /// Installs the module identified by `reference` into `project_root`.
    ///
    /// Returns the final target path of the installed module.
    ///
    /// # Errors
    ///
    /// Returns the taxonomy kind matching the failed step; see
    /// [`InstallerError`]. The staging directory is removed before any
    /// error propagates.
    pub fn install(&self, reference: &str, project_root: &Utf8Path) -> Result<Utf8PathBuf> {
        self.install_cancellable(reference, project_root, &CancelToken::new())
    }

    /// Like [`install`](Self::install), with cooperative cancellation
    /// checked at each state boundary.
    ///
    /// # Errors
    ///
    /// As [`install`](Self::install), plus [`InstallerError::Cancelled`]
    /// when `cancel` trips between states.
    pub fn install_cancellable(
        &self,
        reference: &str,
        project_root: &Utf8Path,
        cancel: &CancelToken,
    ) -> Result<Utf8PathBuf> {
        // Validating: nothing is staged yet, so failures here leave the
        // project tree untouched.
        if project_root.as_str().is_empty() || !project_root.is_dir() {
            return Err(InstallerError::ProjectNotFound {
                reason: format!("`{project_root}` is not a project directory"),
            });
        }
        let reference = SourceReference::parse(reference)?;
        cancel.checkpoint()?;

        // Fetching: staging is dropped (and thus removed) on every early
        // return below.
        let staging = StagingArea::create(project_root)?;
        debug!("staging module into {}", staging.path());
        self.fetcher
            .fetch(&reference, staging.path())
            .map_err(|source| InstallerError::DownloadFailed { source })?;
        cancel.checkpoint()?;

        // ManifestLoaded.
        let mut manifest = Manifest::load(&staging.manifest_path()).map_err(|e| match e {
            ManifestError::InvalidProfile { profile, .. } => {
                InstallerError::UnsupportedProfile { profile }
            }
            other => InstallerError::MalformedModule { source: other },
        })?;
        cancel.checkpoint()?;

        // Placing.
        let target = match manifest.profile {
            Profile::Lambda | Profile::LambdaGroup => {
                place_module(staging.path(), project_root, &mut manifest)?
            }
            unsupported @ (Profile::Front | Profile::Project) => {
                return Err(InstallerError::UnsupportedProfile {
                    profile: unsupported.as_str().to_owned(),
                });
            }
        };

        // Committed.
        staging.remove();
        info!("module `{}` installed to {target}", manifest.name);
        Ok(target)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

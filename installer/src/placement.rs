//! Module placement into the project tree.
//!
//! A validated, staged module is committed by claiming a collision-free
//! directory under the project's `modules/` subdirectory and copying the
//! staged contents into it. When the claim forces a suffixed name, the
//! staged manifest is rewritten first so the installed copy's declared
//! identity matches its directory.

use crate::error::{InstallerError, Result};
use crate::naming::{MAX_NAME_ATTEMPTS, claim};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use stratus_common::{MODULE_MANIFEST, Manifest};

/// Subdirectory of the project root holding installed modules.
pub const MODULES_DIR: &str = "modules";

/// Commits the staged module at `staging` into the project tree.
///
/// Returns the final target path. `manifest.name` is updated in place when
/// collision avoidance picks a suffixed directory name. On a copy failure
/// the partially written target is removed, keeping the commit
/// all-or-nothing.
///
/// # Errors
///
/// Returns [`InstallerError::ExhaustedNamespace`] when no free directory
/// name exists, and [`InstallerError::Io`] on copy failures.
pub fn place_module(
    staging: &Utf8Path,
    project_root: &Utf8Path,
    manifest: &mut Manifest,
) -> Result<Utf8PathBuf> {
    let modules_dir = project_root.join(MODULES_DIR);
    std::fs::create_dir_all(&modules_dir)?;

    let (final_name, target) = claim(&modules_dir, &manifest.name, MAX_NAME_ATTEMPTS)?;
    if final_name != manifest.name {
        debug!(
            "module name `{}` is taken; installing as `{final_name}`",
            manifest.name
        );
        manifest.name = final_name;
        if let Err(e) = manifest.write(&staging.join(MODULE_MANIFEST)) {
            remove_partial_target(&target);
            return Err(InstallerError::Io(std::io::Error::other(e)));
        }
    }

    if let Err(e) = copy_dir_recursive(staging, &target) {
        remove_partial_target(&target);
        return Err(InstallerError::Io(e));
    }
    Ok(target)
}

/// Recursively copies the contents of `src` into the existing directory
/// `dest`. Symlinks and other special files are skipped with a warning.
fn copy_dir_recursive(src: &Utf8Path, dest: &Utf8Path) -> std::io::Result<()> {
    for entry in src.read_dir_utf8()? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let dest_path = dest.join(entry.file_name());

        if file_type.is_dir() {
            std::fs::create_dir(&dest_path)?;
            copy_dir_recursive(entry.path(), &dest_path)?;
        } else if file_type.is_file() {
            std::fs::copy(entry.path(), &dest_path)?;
        } else {
            warn!("skipping special file {} during install", entry.path());
        }
    }
    Ok(())
}

/// Best-effort removal of a target directory after a failed commit.
fn remove_partial_target(target: &Utf8Path) {
    if let Err(e) = std::fs::remove_dir_all(target) {
        warn!("could not remove partial install at {target}: {e}");
    }
}

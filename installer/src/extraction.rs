//! Module archive extraction.
//!
//! Hosting-provider archive exports wrap the repository contents in a
//! single top-level `<repo>-<ref>/` directory. Extraction strips that
//! wrapper so the destination directory itself becomes the module root,
//! and validates entry paths to prevent zip-slip attacks.

use camino::Utf8Path;
use std::path::{Path, PathBuf};

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error reading the archive or writing extracted files.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive itself is not a valid zip file.
    #[error("invalid archive: {0}")]
    InvalidArchive(#[from] zip::result::ZipError),

    /// A path in the archive attempts to escape the destination directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no files beneath its wrapper directory.
    #[error("archive contains no module files")]
    EmptyArchive,
}

/// Extracts the zip archive at `archive_path` into `dest_dir`, stripping
/// the single top-level wrapper directory from every entry.
///
/// Returns the number of files extracted.
///
/// # Errors
///
/// Returns [`ExtractionError::PathTraversal`] if any entry would escape
/// `dest_dir`, [`ExtractionError::EmptyArchive`] if nothing remains after
/// stripping the wrapper, and [`ExtractionError::Io`] or
/// [`ExtractionError::InvalidArchive`] on read failures.
pub fn extract_archive(archive_path: &Path, dest_dir: &Utf8Path) -> Result<usize, ExtractionError> {
    let file = std::fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut extracted = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(entry_path) = entry.enclosed_name() else {
            return Err(ExtractionError::PathTraversal {
                path: entry.name().to_owned(),
            });
        };
        let Some(relative) = strip_wrapper(&entry_path) else {
            // The wrapper directory entry itself.
            continue;
        };

        let dest_path = dest_dir.as_std_path().join(relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&dest_path)?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = std::fs::File::create(&dest_path)?;
        std::io::copy(&mut entry, &mut out)?;
        extracted += 1;
    }

    if extracted == 0 {
        return Err(ExtractionError::EmptyArchive);
    }
    Ok(extracted)
}

/// Drops the leading wrapper component from an archive entry path.
///
/// Returns `None` when nothing remains, i.e. the entry is the wrapper
/// directory itself.
fn strip_wrapper(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    components.next()?;
    let rest = components.as_path();
    if rest.as_os_str().is_empty() {
        None
    } else {
        Some(rest.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn utf8_path(path: &Path) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path.to_path_buf()).expect("non-UTF8 temp path")
    }

    fn build_archive(dir: &TempDir, entries: &[(&str, &str)]) -> PathBuf {
        let archive_path = dir.path().join("module.zip");
        let file = std::fs::File::create(&archive_path).expect("create archive");
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, contents) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).expect("add dir");
            } else {
                writer.start_file(*name, options).expect("start file");
                writer.write_all(contents.as_bytes()).expect("write entry");
            }
        }
        writer.finish().expect("finish archive");
        archive_path
    }

    #[test]
    fn extract_strips_wrapper_directory() {
        let dir = TempDir::new().expect("temp dir");
        let archive = build_archive(
            &dir,
            &[
                ("widget-master/", ""),
                ("widget-master/module.json", r#"{"name": "widget"}"#),
                ("widget-master/src/handler.js", "exports.run = 1;"),
            ],
        );
        let dest = utf8_path(&dir.path().join("out"));
        std::fs::create_dir_all(&dest).expect("create dest");

        let count = extract_archive(&archive, &dest).expect("extract");
        assert_eq!(count, 2);
        assert!(dest.join("module.json").is_file());
        assert!(dest.join("src/handler.js").is_file());
        assert!(
            !dest.join("widget-master").exists(),
            "wrapper directory must not survive extraction"
        );
    }

    #[test]
    fn extract_rejects_traversal_entries() {
        let dir = TempDir::new().expect("temp dir");
        let archive = build_archive(&dir, &[("widget-master/../escape.txt", "boom")]);
        let dest = utf8_path(&dir.path().join("out"));
        std::fs::create_dir_all(&dest).expect("create dest");

        let result = extract_archive(&archive, &dest);
        assert!(matches!(result, Err(ExtractionError::PathTraversal { .. })));
    }

    #[test]
    fn extract_wrapper_only_archive_is_empty() {
        let dir = TempDir::new().expect("temp dir");
        let archive = build_archive(&dir, &[("widget-master/", "")]);
        let dest = utf8_path(&dir.path().join("out"));
        std::fs::create_dir_all(&dest).expect("create dest");

        let result = extract_archive(&archive, &dest);
        assert!(matches!(result, Err(ExtractionError::EmptyArchive)));
    }

    #[test]
    fn strip_wrapper_drops_first_component_only() {
        assert_eq!(
            strip_wrapper(Path::new("widget-master/src/handler.js")),
            Some(PathBuf::from("src/handler.js"))
        );
        assert_eq!(strip_wrapper(Path::new("widget-master/")), None);
        assert_eq!(strip_wrapper(Path::new("widget-master")), None);
    }
}

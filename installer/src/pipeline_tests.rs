//! Unit tests for the install pipeline.
//!
//! Network access is replaced by [`StubFetcher`] and mockall doubles;
//! every scenario asserts the staging-cleanup contract by checking that
//! no `temp-*` directory survives the call.

use super::*;
use crate::fetch::{FetchError, MockModuleFetcher};
use crate::staging::STAGING_PREFIX;
use crate::test_utils::StubFetcher;
use rstest::rstest;
use tempfile::TempDir;

fn utf8_root(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("non-UTF8 temp path")
}

fn staging_dirs(root: &Utf8Path) -> Vec<String> {
    root.read_dir_utf8()
        .expect("read project root")
        .filter_map(|entry| {
            let entry = entry.expect("read entry");
            let name = entry.file_name().to_owned();
            name.starts_with(STAGING_PREFIX).then_some(name)
        })
        .collect()
}

const REFERENCE: &str = "https://github.com/acme/widget";

#[test]
fn install_places_module_and_cleans_staging() {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_root(&dir);
    let fetcher = StubFetcher::with_files(vec![
        (
            "module.json".to_owned(),
            r#"{"name": "widget", "profile": "lambda", "lambda": {}}"#.to_owned(),
        ),
        ("src/handler.js".to_owned(), "exports.run = 1;".to_owned()),
    ]);

    let target = Installer::new(&fetcher)
        .install(REFERENCE, &root)
        .expect("install should succeed");

    assert_eq!(target, root.join("modules/widget"));
    assert!(target.join("src/handler.js").is_file());
    assert!(staging_dirs(&root).is_empty(), "staging must be removed");
}

#[test]
fn install_rejects_missing_project_root_without_staging() {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_root(&dir).join("nowhere");
    let fetcher = StubFetcher::with_manifest(r#"{"name": "w", "profile": "lambda"}"#);

    let err = Installer::new(&fetcher)
        .install(REFERENCE, &root)
        .expect_err("expected failure");
    assert!(matches!(err, InstallerError::ProjectNotFound { .. }));
}

#[rstest]
#[case::wrong_host("https://bitbucket.org/acme/widget")]
#[case::missing_repo("https://github.com/acme")]
fn install_rejects_bad_reference_without_staging(#[case] reference: &str) {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_root(&dir);
    let fetcher = StubFetcher::with_manifest(r#"{"name": "w", "profile": "lambda"}"#);

    let err = Installer::new(&fetcher)
        .install(reference, &root)
        .expect_err("expected failure");
    assert!(matches!(err, InstallerError::InvalidReference { .. }));
    assert!(
        staging_dirs(&root).is_empty(),
        "validation failures must never create staging"
    );
}

#[test]
fn fetch_failure_maps_to_download_failed_and_cleans_staging() {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_root(&dir);
    let fetcher = StubFetcher::failing("connection timed out");

    let err = Installer::new(&fetcher)
        .install(REFERENCE, &root)
        .expect_err("expected failure");
    assert!(matches!(err, InstallerError::DownloadFailed { .. }));
    assert!(staging_dirs(&root).is_empty());
}

#[rstest]
#[case::missing_manifest(None)]
#[case::missing_profile(Some(r#"{"name": "widget"}"#))]
#[case::corrupt_manifest(Some("{nope"))]
fn bad_manifest_maps_to_malformed_module(#[case] manifest: Option<&str>) {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_root(&dir);
    let fetcher = match manifest {
        Some(contents) => StubFetcher::with_manifest(contents),
        None => StubFetcher::with_files(vec![("README.md".to_owned(), "hi".to_owned())]),
    };

    let err = Installer::new(&fetcher)
        .install(REFERENCE, &root)
        .expect_err("expected failure");
    assert!(matches!(err, InstallerError::MalformedModule { .. }));
    assert!(staging_dirs(&root).is_empty());
    assert!(
        !root.join("modules").exists(),
        "no files may be placed for a malformed module"
    );
}

#[rstest]
#[case::front("front")]
#[case::project("project")]
#[case::unrecognised("sidecar")]
fn unsupported_profiles_fail_and_leave_tree_unchanged(#[case] profile: &str) {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_root(&dir);
    let fetcher = StubFetcher::with_manifest(&format!(
        r#"{{"name": "widget", "profile": "{profile}"}}"#
    ));

    let err = Installer::new(&fetcher)
        .install(REFERENCE, &root)
        .expect_err("expected failure");
    assert!(
        matches!(err, InstallerError::UnsupportedProfile { profile: ref p } if p == profile),
        "unexpected error: {err}"
    );
    assert!(staging_dirs(&root).is_empty());
    assert!(!root.join("modules").exists());
}

#[test]
fn collision_installs_suffixed_module() {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_root(&dir);
    std::fs::create_dir_all(root.join("modules/widget")).expect("pre-existing module");
    let fetcher =
        StubFetcher::with_manifest(r#"{"name": "widget", "profile": "lambda", "lambda": {}}"#);

    let target = Installer::new(&fetcher)
        .install(REFERENCE, &root)
        .expect("install should succeed");

    assert_eq!(target, root.join("modules/widget-2"));
    let installed = Manifest::load(&target.join(stratus_common::MODULE_MANIFEST))
        .expect("installed manifest");
    assert_eq!(installed.name, "widget-2");
    assert!(staging_dirs(&root).is_empty());
}

#[test]
fn cancellation_before_fetch_skips_the_download() {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_root(&dir);
    let mut fetcher = MockModuleFetcher::new();
    fetcher.expect_fetch().never();
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = Installer::new(&fetcher)
        .install_cancellable(REFERENCE, &root, &cancel)
        .expect_err("expected cancellation");
    assert!(matches!(err, InstallerError::Cancelled));
    assert!(staging_dirs(&root).is_empty());
}

#[test]
fn cancellation_after_fetch_tears_staging_down() {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_root(&dir);
    let cancel = CancelToken::new();
    let mut fetcher = MockModuleFetcher::new();
    let cancel_inside = cancel.clone();
    fetcher.expect_fetch().returning(move |_, dest| {
        std::fs::create_dir_all(dest).map_err(FetchError::Io)?;
        // Trip cancellation while the fetch is still in flight.
        cancel_inside.cancel();
        Ok(())
    });

    let err = Installer::new(&fetcher)
        .install_cancellable(REFERENCE, &root, &cancel)
        .expect_err("expected cancellation");
    assert!(matches!(err, InstallerError::Cancelled));
    assert!(staging_dirs(&root).is_empty());
    assert!(!root.join("modules").exists());
}

#[test]
fn mock_fetcher_sees_parsed_reference() {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_root(&dir);
    let mut fetcher = MockModuleFetcher::new();
    fetcher
        .expect_fetch()
        .withf(|reference, _| {
            reference.owner() == "acme"
                && reference.repo() == "widget"
                && reference.git_ref() == "v2"
        })
        .returning(|_, dest| {
            std::fs::create_dir_all(dest).map_err(FetchError::Io)?;
            std::fs::write(
                dest.join(stratus_common::MODULE_MANIFEST),
                r#"{"name": "widget", "profile": "lambda"}"#,
            )
            .map_err(FetchError::Io)
        });

    let target = Installer::new(&fetcher)
        .install("https://github.com/acme/widget#v2", &root)
        .expect("install should succeed");
    assert_eq!(target, root.join("modules/widget"));
}

//! Shared Stratus infrastructure: the module manifest model, the manifest
//! discovery engine, and project-root detection.
//!
//! This crate is consumed by the `stratus-installer` CLI and can be used
//! programmatically by other tooling that needs to enumerate the modules
//! of a project.

pub mod manifest;
pub mod project;
pub mod scanner;

pub use manifest::{MODULE_MANIFEST, Manifest, ManifestError, Profile};
pub use project::{PROJECT_MANIFEST, find_project_root, is_project_root};
pub use scanner::{
    Capability, MANIFEST_PATTERN, find_all_manifests, find_endpoint_manifests,
    find_lambda_manifests, scan, scan_by_capability,
};

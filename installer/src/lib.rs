//! Stratus installer library.
//!
//! This crate implements module installation for Stratus projects: fetching
//! a module archive from its source repository, validating its manifest, and
//! placing it into the project tree. It is used by the `stratus` CLI binary
//! and can be consumed programmatically for testing or custom installation
//! workflows.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Installer error taxonomy
//! - [`extraction`] - Zip archive extraction with wrapper stripping
//! - [`fetch`] - Module archive download abstraction
//! - [`naming`] - Collision-free target directory naming
//! - [`pipeline`] - Install pipeline orchestration
//! - [`placement`] - Module placement into the project tree
//! - [`reference`] - Module source reference parsing
//! - [`staging`] - Temporary staging directories with guaranteed cleanup

pub mod cli;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod naming;
pub mod pipeline;
pub mod placement;
pub mod reference;
pub mod staging;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

//! CLI argument definitions for the Stratus tool.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use stratus_common::Capability;

/// Install and discover Stratus project modules.
#[derive(Parser, Debug)]
#[command(name = "stratus")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install and discover Stratus project modules.\n\n",
    "Stratus projects are composed of modules, each carrying a module.json ",
    "manifest that declares its name and capability profile. The install ",
    "command downloads a module from its source repository, validates its ",
    "manifest, and places it under the project's modules/ directory. The ",
    "scan command finds manifests across the project tree, optionally ",
    "filtered by the capability they declare.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install a module from its repository:\n",
    "    $ stratus install https://github.com/acme/widget\n\n",
    "  Install a specific branch or tag:\n",
    "    $ stratus install github.com/acme/widget#v2\n\n",
    "  List every manifest declaring a lambda:\n",
    "    $ stratus scan lambda\n\n",
    "  List every manifest in an explicit tree:\n",
    "    $ stratus scan --root ./back\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install a module into the current project.
    Install(InstallArgs),

    /// Find module manifests in the project tree.
    Scan(ScanArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallArgs {
    /// Module source reference, e.g. github.com/owner/repo#ref.
    pub reference: String,

    /// Project root to install into [default: located from the working
    /// directory].
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<Utf8PathBuf>,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the scan command.
#[derive(Parser, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Only report manifests declaring this capability (lambda or endpoint).
    pub capability: Option<Capability>,

    /// Directory tree to scan [default: located from the working directory].
    #[arg(long, value_name = "DIR")]
    pub root: Option<Utf8PathBuf>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

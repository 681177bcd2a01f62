//! Stratus CLI entrypoint.
//!
//! This binary installs modules into a Stratus project and scans the project
//! tree for module manifests. Progress goes to stderr; scan results go to
//! stdout so they can be piped.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;
use stratus_common::{find_all_manifests, find_project_root, scan_by_capability};
use stratus_installer::cli::{Cli, Command, InstallArgs, ScanArgs};
use stratus_installer::error::{InstallerError, Result};
use stratus_installer::fetch::HttpFetcher;
use stratus_installer::pipeline::Installer;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let exit_code = match run(&cli, &mut stdout, &mut stderr) {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err, &mut stderr);
            exit_code_for(&err)
        }
    };
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Install(args) => run_install(args, stderr),
        Command::Scan(args) => run_scan(args, stdout),
    }
}

fn run_install(args: &InstallArgs, stderr: &mut dyn Write) -> Result<()> {
    let project_root = resolve_project_root(args.project_root.as_deref())?;

    if !args.quiet {
        write_line(stderr, format!("Installing module from {}...", args.reference));
    }

    let fetcher = HttpFetcher;
    let target = Installer::new(&fetcher).install(&args.reference, &project_root)?;

    if !args.quiet {
        write_line(stderr, format!("Module installed to {target}"));
    }
    Ok(())
}

fn run_scan(args: &ScanArgs, stdout: &mut dyn Write) -> Result<()> {
    let root = resolve_project_root(args.root.as_deref())?;
    let manifests = match args.capability {
        Some(capability) => scan_by_capability(&root, capability),
        None => find_all_manifests(&root),
    };
    for path in manifests {
        write_line(stdout, path);
    }
    Ok(())
}

/// Uses the explicit root when given, otherwise walks up from the working
/// directory looking for a project manifest.
fn resolve_project_root(explicit: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_owned());
    }
    let cwd = std::env::current_dir()?;
    let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| InstallerError::ProjectNotFound {
        reason: format!("current directory is not valid UTF-8: {e}"),
    })?;
    find_project_root(&cwd).ok_or_else(|| InstallerError::ProjectNotFound {
        reason: format!("no project manifest found in {cwd} or its parents"),
    })
}

/// Prints the error and its cause chain.
fn report_error(err: &InstallerError, stderr: &mut dyn Write) {
    write_line(stderr, format!("error: {err}"));
    let mut cause = std::error::Error::source(err);
    while let Some(source) = cause {
        write_line(stderr, format!("  caused by: {source}"));
        cause = source.source();
    }
}

/// Maps each failure kind to a distinct process exit code.
fn exit_code_for(err: &InstallerError) -> i32 {
    match err {
        InstallerError::InvalidReference { .. } => 2,
        InstallerError::DownloadFailed { .. } => 3,
        InstallerError::MalformedModule { .. } => 4,
        InstallerError::UnsupportedProfile { .. } => 5,
        InstallerError::ExhaustedNamespace { .. } => 6,
        InstallerError::Io(_) => 7,
        InstallerError::ProjectNotFound { .. } => 8,
        InstallerError::Cancelled => 9,
    }
}

fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

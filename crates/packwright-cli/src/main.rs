//! # packwright CLI entry point
//!
//! Parses command-line arguments and dispatches to the action handlers.
//! The interface is flag-based rather than subcommand-based: exactly
//! one of `--create`, `--check` or `--build` selects the action, with
//! `--package-version` refining `--create`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use packwright_cli::build::run_build;
use packwright_cli::check::run_check;
use packwright_cli::scaffold::run_create;
use packwright_rules::{VersionTable, DEFAULT_PACKAGE_VERSION};
use packwright_schema::FormatRegistry;

/// Bundle toolchain for versioned configuration packages.
///
/// Scaffolds bundle skeletons, validates bundles against the rule set
/// their own metadata declares, and packages validated bundles into
/// distributable archives.
#[derive(Parser, Debug)]
#[command(
    name = "packwright",
    version,
    about,
    long_about = None,
    group(
        ArgGroup::new("action")
            .required(true)
            .args(["create", "check", "build"]),
    ),
)]
struct Cli {
    /// Scaffold a new bundle skeleton with this name.
    #[arg(long, value_name = "NAME")]
    create: Option<String>,

    /// Validate the bundle directory at this path.
    #[arg(long, value_name = "PATH")]
    check: Option<PathBuf>,

    /// Validate, then package the bundle directory at this path.
    #[arg(long, value_name = "PATH")]
    build: Option<PathBuf>,

    /// Package version for `--create`.
    #[arg(long, value_name = "VERSION", default_value = DEFAULT_PACKAGE_VERSION)]
    package_version: String,

    /// Enable debug output.
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match dispatch(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn dispatch(cli: &Cli) -> Result<u8> {
    let formats = Arc::new(FormatRegistry::with_builtins()?);
    let table = VersionTable::new(&formats)?;

    if let Some(name) = &cli.create {
        run_create(name, &cli.package_version, &table)
    } else if let Some(path) = &cli.check {
        run_check(path, &table)
    } else if let Some(path) = &cli.build {
        run_build(path, &table)
    } else {
        // The required action group means one of the flags is present.
        anyhow::bail!("no action requested")
    }
}

//! arcc CLI - checks Arc programs.
//!
//! Parses command-line arguments with clap, initializes logging, loads the
//! channel table and reports diagnostics for every input file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use arcc_drv::{Config, Session};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// arcc - semantic checker for the Arc language
#[derive(Parser, Debug)]
#[command(name = "arcc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Semantic checker for Arc programs", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "ARCC_VERBOSE")]
    verbose: bool,

    /// Disable color output
    #[arg(long, global = true, env = "ARCC_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check source files and print their diagnostics
    ///
    /// Exits with a non-zero status when any file has errors.
    Check(CheckCommand),
}

#[derive(Parser, Debug)]
struct CheckCommand {
    /// Channel table (TOML)
    #[arg(short, long, env = "ARCC_CHANNELS")]
    channels: Option<PathBuf>,

    /// Source files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.no_color)?;

    match cli.command {
        Commands::Check(args) => run_check(args),
    }
}

fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("failed to initialize logging")?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("failed to load channels from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn run_check(args: CheckCommand) -> Result<ExitCode> {
    let config = load_config(args.channels.as_deref())?;
    let session = Session::new(config)?;

    let mut failed = 0usize;
    for path in &args.files {
        let report = match session.check_file(path) {
            Ok(report) => report,
            Err(err) => {
                eprintln!("error: {err}");
                failed += 1;
                continue;
            },
        };
        print!("{}", report.render());
        if report.has_errors() {
            failed += 1;
        }
    }

    info!(files = args.files.len(), failed, "check finished");
    if failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::parse_from(["arcc", "check", "main.arc"]);
        let Commands::Check(args) = cli.command;
        assert_eq!(args.files, [PathBuf::from("main.arc")]);
        assert!(args.channels.is_none());
    }

    #[test]
    fn test_cli_parse_channels_and_files() {
        let cli = Cli::parse_from(["arcc", "check", "--channels", "ch.toml", "a.arc", "b.arc"]);
        let Commands::Check(args) = cli.command;
        assert_eq!(args.channels, Some(PathBuf::from("ch.toml")));
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::parse_from(["arcc", "--verbose", "--no-color", "check", "a.arc"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
    }

    #[test]
    fn test_cli_requires_files() {
        assert!(Cli::try_parse_from(["arcc", "check"]).is_err());
    }

    #[test]
    fn test_load_config_default() {
        assert_eq!(load_config(None).unwrap(), Config::default());
    }
}

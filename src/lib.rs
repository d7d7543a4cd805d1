pub mod error;
pub mod report;

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{CliError, LookupError};
pub use report::{CoverageRecord, CoverageReport, format_coverage};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "get-coverage",
    version,
    about = "Print a module's line coverage from a JSON coverage report read on stdin"
)]
pub struct Cli {
    /// Module name to look up (matched exactly against each record's "name")
    #[arg(required_unless_present_any = ["completions", "man"])]
    pub module: Option<String>,

    /// Read the report from a file instead of stdin ("-" means stdin)
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Emit JSON on stdout/stderr instead of plain text
    #[arg(long, env = "GET_COVERAGE_ROBOT")]
    pub robot: bool,

    /// Generate shell completions to stdout
    #[arg(long, value_enum, value_name = "SHELL", conflicts_with = "man")]
    pub completions: Option<clap_complete::Shell>,

    /// Generate man page to stdout
    #[arg(long)]
    pub man: bool,
}

/// Parses arguments and runs one lookup. The error carries whether robot output was requested.
pub fn run() -> Result<(), (CliError, bool)> {
    let cli = Cli::parse();
    init_logging();
    let robot = cli.robot;
    execute(cli).map_err(|e| (e, robot))
}

pub fn execute(cli: Cli) -> Result<(), CliError> {
    match (cli.completions, cli.man, cli.module) {
        (Some(shell), _, _) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "get-coverage", &mut io::stdout());
            Ok(())
        }
        (None, true, _) => {
            let man = clap_mangen::Man::new(Cli::command());
            man.render(&mut io::stdout())
                .context("render man page")
                .map_err(CliError::io)
        }
        (None, false, Some(module)) => lookup(&module, cli.input.as_deref(), cli.robot),
        // Only reachable when `Cli` is built by hand rather than parsed.
        (None, false, None) => Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "the following required arguments were not provided: <MODULE>",
            )
            .exit(),
    }
}

fn lookup(module: &str, input: Option<&Path>, robot: bool) -> Result<(), CliError> {
    let report = match input {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("open coverage report {}", path.display()))
                .map_err(CliError::io)?;
            load_report(BufReader::new(file))?
        }
        _ => load_report(io::stdin().lock())?,
    };

    let coverage = report.lookup(module)?;
    info!(module = %module, "found coverage record");

    let line = if robot {
        serde_json::json!({ "name": module, "lineCoverage": coverage }).to_string()
    } else {
        format_coverage(coverage)
    };
    let mut out = io::stdout().lock();
    writeln!(out, "{line}")
        .context("write coverage to stdout")
        .map_err(CliError::io)?;
    Ok(())
}

fn load_report<R: Read>(reader: R) -> Result<CoverageReport, CliError> {
    let report = CoverageReport::from_reader(reader)?;
    debug!(records = report.records().len(), "scanning report");
    Ok(report)
}

/// Logs go to stderr so stdout carries only the result. The default filter
/// keeps the process silent unless `RUST_LOG` asks for more.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .compact()
                .with_target(false)
                .with_ansi(false),
        )
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_is_required_for_lookups() {
        let err = Cli::try_parse_from(["get-coverage"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["get-coverage", "--robot"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn generator_flags_stand_alone() {
        let cli = Cli::try_parse_from(["get-coverage", "--man"]).unwrap();
        assert!(cli.man);
        assert!(cli.module.is_none());

        let cli = Cli::try_parse_from(["get-coverage", "--completions", "zsh"]).unwrap();
        assert_eq!(cli.completions, Some(clap_complete::Shell::Zsh));

        assert!(Cli::try_parse_from(["get-coverage", "--man", "--completions", "zsh"]).is_err());
    }

    #[test]
    fn parses_lookup_arguments() {
        let cli = Cli::try_parse_from(["get-coverage", "util", "--input", "-", "--robot"]).unwrap();
        assert_eq!(cli.module.as_deref(), Some("util"));
        assert_eq!(cli.input.as_deref(), Some(Path::new("-")));
        assert!(cli.robot);
    }
}

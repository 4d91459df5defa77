//! Command-line argument definitions for rowbind
//!
//! This module defines the CLI interface using the clap derive API.

use crate::constants::DEFAULT_LOG_LEVEL;
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the rowbind tool
///
/// Binds CSV rows to the fields of a JSON mapping declaration and writes the
/// bound records back out under a regenerated header.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rowbind",
    version,
    about = "Bind CSV rows to typed records described by a mapping declaration",
    long_about = "Reads CSV input through a JSON mapping declaration that addresses columns by \
                  position, exact header name, or header pattern. Every cell is converted to its \
                  declared type and checked for mandatory values. The bound records can be written \
                  back out with a sorted, regenerated header."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Validate input against a mapping declaration without writing output
    Check(CheckArgs),
    /// Bind input rows and write them back out under the regenerated header
    Convert(ConvertArgs),
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// JSON mapping declaration
    #[arg(
        short = 'm',
        long = "mapping",
        value_name = "FILE",
        help = "JSON mapping declaration"
    )]
    pub mapping: PathBuf,

    /// CSV input file
    #[arg(short = 'i', long = "input", value_name = "FILE", help = "CSV input file")]
    pub input: PathBuf,

    /// Skip rows whose first cell starts with this prefix
    #[arg(
        long = "skip-marker",
        value_name = "PREFIX",
        help = "Skip rows whose first cell starts with PREFIX"
    )]
    pub skip_marker: Option<String>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// JSON mapping declaration
    #[arg(
        short = 'm',
        long = "mapping",
        value_name = "FILE",
        help = "JSON mapping declaration"
    )]
    pub mapping: PathBuf,

    /// CSV input file
    #[arg(short = 'i', long = "input", value_name = "FILE", help = "CSV input file")]
    pub input: PathBuf,

    /// Output CSV file
    ///
    /// If not specified, rows are written to stdout.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output CSV file (defaults to stdout)"
    )]
    pub output: Option<PathBuf>,

    /// Skip rows whose first cell starts with this prefix
    #[arg(
        long = "skip-marker",
        value_name = "PREFIX",
        help = "Skip rows whose first cell starts with PREFIX"
    )]
    pub skip_marker: Option<String>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Log level for a pair of verbosity flags
fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => DEFAULT_LOG_LEVEL,
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn require_file(path: &std::path::Path, what: &str) -> Result<()> {
    if !path.is_file() {
        return Err(Error::configuration(format!(
            "{} does not exist or is not a file: {}",
            what,
            path.display()
        )));
    }
    Ok(())
}

impl CheckArgs {
    /// Validate that the input files exist
    pub fn validate(&self) -> Result<()> {
        require_file(&self.mapping, "Mapping declaration")?;
        require_file(&self.input, "Input file")
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

impl ConvertArgs {
    /// Validate that the input files exist and the output can be created
    pub fn validate(&self) -> Result<()> {
        require_file(&self.mapping, "Mapping declaration")?;
        require_file(&self.input, "Input file")?;

        if let Some(output) = &self.output {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "Output file directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

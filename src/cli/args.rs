//! Command-line argument definitions for sofia2hdf5
//!
//! Defines the CLI interface using the clap derive API.

use crate::error::{ConvertError, Result};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Convert the output of a SoFiA run into a single HDF5 container
///
/// Reads the SoFiA parameter file, then packs the input cube, the source
/// catalogue and the mask SoFiA produced into `<output.filename>.hdf5`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sofia2hdf5",
    version,
    about = "Convert SoFiA output (cube, mask and catalogue) into one HDF5 file",
    long_about = "Packs the FITS cube SoFiA ran on, the mask it produced and its ASCII source \
                  catalogue into one HDF5 container that CARTA can open. Section '0' holds the \
                  cube, section '1' the mask and section 'Catalogue' one dataset per catalogue \
                  column."
)]
pub struct Args {
    /// SoFiA parameter file of the run to convert
    #[arg(value_name = "PARAMETER_FILE")]
    pub parameter_file: Option<PathBuf>,

    /// SoFiA parameter file (same as the positional argument)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        conflicts_with = "parameter_file"
    )]
    pub input: Option<PathBuf>,

    /// Catalogue to add when the parameter file enables none
    #[arg(short = 'c', long = "catalog", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long = "config", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Directory SoFiA ran in, used when the parameter file sets no output directory
    #[arg(short = 'd', long = "directory", value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Write an example configuration file to the current directory and exit
    #[arg(long = "print-example")]
    pub print_example: bool,

    /// Show the container layout without writing it
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help = "Enable verbose logging (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Parameter file from either the positional argument or `--input`
    pub fn sofia_input(&self) -> Option<&Path> {
        self.parameter_file
            .as_deref()
            .or(self.input.as_deref())
    }

    /// Log level for the subscriber; a verbose configuration counts as one `-v`
    pub fn get_log_level(&self, config_verbose: bool) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose.max(u8::from(config_verbose)) {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Check paths given on the command line before any work starts
    pub fn validate(&self) -> Result<()> {
        if let Some(directory) = &self.directory {
            if !directory.is_dir() {
                return Err(ConvertError::configuration(format!(
                    "Directory does not exist: {}",
                    directory.display()
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.is_file() {
                return Err(ConvertError::configuration(format!(
                    "Configuration file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }
}

//! CLI argument parsing for pdfstitch.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and help text generation.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use pdfstitch::config::{CompressionLevel, Config, OverwriteMode};
use pdfstitch::error::{Result, StitchError};
use pdfstitch::io::SourceReader;

/// Pick, order and stitch PDF files into a single document.
///
/// Files are merged in the order given. Use --interactive to build and
/// reorder the list at a prompt before merging.
#[derive(Parser, Debug)]
#[command(name = "pdfstitch")]
#[command(version)]
#[command(about = "Pick, order and stitch PDF files into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files, directories or glob patterns (in order)
    ///
    /// Directories are searched recursively. Files that are not PDFs are
    /// skipped, as are files with the same name and size as one already
    /// selected.
    ///
    /// Examples:
    ///   pdfstitch cover.pdf 'chapter*.pdf' -o book
    ///   pdfstitch scans/ --output-dir out
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output file name
    ///
    /// ".pdf" is appended unless the name already ends with it.
    /// Defaults to "merged-document.pdf".
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Directory the merged PDF is written into
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Verbose output - show entry ids and statistics
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Compression level for output PDF
    ///
    /// - none: No compression
    /// - standard: Compress streams (default)
    /// - maximum: Also drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Pause between files while merging, in milliseconds
    #[arg(long, value_name = "MS")]
    pub pace: Option<u64>,

    /// Print a JSON report instead of human-readable output
    #[arg(long, conflicts_with = "interactive")]
    pub json: bool,

    /// Read input file list from a file (one path per line)
    ///
    /// Use '-' to read from stdin. Paths from the list come after
    /// direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Build and reorder the file list at a prompt
    #[arg(short, long)]
    pub interactive: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is invalid or the
    /// resulting configuration fails validation.
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            inputs: self.inputs.clone(),
            input_list: self.input_list.clone(),
            output_name: self.output.clone(),
            output_dir: self.output_dir.clone(),
            overwrite_mode,
            compression,
            pacing: self.pace.map(Duration::from_millis),
            verbose: self.verbose,
            quiet: self.quiet,
            json: self.json,
            interactive: self.interactive,
        };

        config.validate().map_err(|e| {
            StitchError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// Performs early validation that doesn't require file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.input_list.is_none() && !self.interactive {
            return Err(StitchError::invalid_config("No input files specified"));
        }

        if !["none", "standard", "maximum"].contains(&self.compression.as_str()) {
            return Err(StitchError::invalid_config(format!(
                "Invalid compression level: {}",
                self.compression
            )));
        }

        if let Some(output) = &self.output
            && output.trim().is_empty()
        {
            return Err(StitchError::invalid_config("Output name must not be empty"));
        }

        Ok(())
    }

    /// Get all input patterns including those from the input-list file.
    ///
    /// Patterns from the file are appended after direct inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the input list file cannot be read or parsed.
    pub async fn get_all_inputs(&self) -> Result<Vec<String>> {
        let mut all_inputs = self.inputs.clone();

        if let Some(input_list) = &self.input_list {
            let listed = SourceReader::new().read_input_list(input_list).await?;
            all_inputs.extend(listed);
        }

        Ok(all_inputs)
    }
}

//! Configuration module for pdfstitch.
//!
//! This module transforms CLI arguments into a validated, normalized configuration
//! that drives a stitching session. It handles:
//! - Validation of argument combinations
//! - Resolution of conflicting options
//! - Application of defaults

use anyhow::{Result, bail};

use crate::StitchError;
use crate::merge::MergeOptions;
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

/// Longest accepted per-entry pacing delay.
pub const MAX_PACING: Duration = Duration::from_secs(10);

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - objects are written as they were copied.
    None,
    /// Stream compression of the merged document.
    #[default]
    Standard,
    /// Stream compression plus removal of unreachable objects.
    Maximum,
}

impl CompressionLevel {
    /// Lowercase name as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Standard => "standard",
            Self::Maximum => "maximum",
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionLevel {
    type Err = crate::StitchError;
    /// Parse compression level from string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation: "none", "standard", or "maximum"
    ///
    /// # Errors
    ///
    /// Returns an error if the string doesn't match a valid compression level.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(StitchError::InvalidConfig {
                message: format!(
                    "Invalid compression level: {s}. Must be one of: none, standard, maximum"
                ),
            }),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a stitching session.
///
/// This structure contains all settings needed to collect, merge and save,
/// derived and validated from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input paths or glob patterns, in merge order.
    pub inputs: Vec<String>,

    /// File listing further inputs, one per line ("-" for stdin).
    pub input_list: Option<PathBuf>,

    /// Requested output file name; normalized at download time.
    pub output_name: Option<String>,

    /// Directory the merged document is written into.
    pub output_dir: PathBuf,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Delay between entries while merging.
    pub pacing: Option<Duration>,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Emit a JSON report instead of human-readable output.
    pub json: bool,

    /// Run the interactive command loop.
    pub interactive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            input_list: None,
            output_name: None,
            output_dir: PathBuf::from("."),
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            pacing: None,
            verbose: false,
            quiet: false,
            json: false,
            interactive: false,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No inputs are given outside interactive mode
    /// - Verbose and quiet modes are both enabled
    /// - JSON output is combined with interactive mode
    /// - The output name contains a directory component
    /// - The pacing delay exceeds [`MAX_PACING`]
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.input_list.is_none() && !self.interactive {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.json && self.interactive {
            bail!("Cannot use --json in interactive mode");
        }

        if let Some(name) = &self.output_name
            && (name.contains('/') || name.contains('\\'))
        {
            bail!("Output name must be a file name, not a path: {name}. Use --output-dir for the directory");
        }

        if let Some(pacing) = self.pacing
            && pacing > MAX_PACING
        {
            bail!(
                "Pacing delay of {}ms exceeds the maximum of {}ms",
                pacing.as_millis(),
                MAX_PACING.as_millis()
            );
        }

        Ok(())
    }

    /// Orchestrator options derived from this configuration.
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            pacing: self.pacing,
        }
    }

    /// Full path for a normalized output file name.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Directory the output is written into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Check if human-readable output should be displayed.
    ///
    /// Returns false in quiet mode and when a JSON report replaces it.
    pub fn should_print(&self) -> bool {
        !self.quiet && !self.json
    }
}

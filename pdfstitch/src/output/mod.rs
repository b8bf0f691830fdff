//! Output formatting and display for pdfstitch.
//!
//! This module handles all user-facing output including:
//! - Notifications built from session outcomes
//! - Formatted status messages
//! - Progress indicators
//! - JSON reports
//!
//! Nothing here decides *when* to report; the host calls in after each
//! session operation.
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::output::{Notification, OutputFormatter};
//! use pdfstitch::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.notify(&Notification::merged());
//! formatter.notify(&Notification::downloaded("merged-document.pdf"));
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, ProgressStyle};

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::StitchError;
use crate::io::WriteStatistics;
use crate::merge::MergeStatistics;

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// An operation completed.
    Success,
    /// An operation failed.
    Error,
    /// Anything else worth telling the user.
    Info,
}

/// A terminal user-facing message about an operation's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,

    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// Create a notification.
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// A merge finished.
    pub fn merged() -> Self {
        Self::new(NotificationLevel::Success, "PDFs merged successfully!")
    }

    /// The merged document was saved.
    pub fn downloaded(file_name: &str) -> Self {
        Self::new(NotificationLevel::Success, format!("Downloaded: {file_name}"))
    }

    /// Files were added to the collection.
    pub fn added(added: usize, offered: usize) -> Self {
        let skipped = offered.saturating_sub(added);
        let message = match skipped {
            0 => format!("Added {added} file(s)"),
            _ => format!("Added {added} file(s), skipped {skipped} duplicate or non-PDF file(s)"),
        };
        Self::new(NotificationLevel::Info, message)
    }
}

impl From<&StitchError> for Notification {
    fn from(err: &StitchError) -> Self {
        let message = match err {
            StitchError::InsufficientInput { .. } => {
                "Please select at least 2 PDF files to merge.".to_string()
            }
            StitchError::DownloadUnavailable => "No merged PDF available for download.".to_string(),
            err if err.is_merge_failure() => format!("Error merging PDFs: {err}"),
            err => err.to_string(),
        };
        Self::new(NotificationLevel::Error, message)
    }
}

/// Machine-readable summary of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    /// Names of the merged entries, in merge order.
    pub inputs: Vec<String>,

    /// Where the document was written.
    pub output: PathBuf,

    /// Number of documents merged.
    pub files_merged: usize,

    /// Pages in the merged document.
    pub total_pages: usize,

    /// Total input size in bytes.
    pub input_size: u64,

    /// Size of the written file in bytes.
    pub output_size: u64,

    /// Compression level applied.
    pub compression: String,

    /// Merge time in milliseconds.
    pub merge_time_ms: u64,
}

impl MergeReport {
    /// Build a report from merge and write statistics.
    pub fn new(
        inputs: Vec<String>,
        merge: &MergeStatistics,
        write: &WriteStatistics,
        config: &Config,
    ) -> Self {
        Self {
            inputs,
            output: write.output_path.clone(),
            files_merged: merge.files_merged,
            total_pages: merge.total_pages,
            input_size: merge.input_size,
            output_size: write.file_size,
            compression: config.compression.to_string(),
            merge_time_ms: merge.merge_time.as_millis() as u64,
        }
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Create an output formatter from configuration.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// Display merge and write statistics to the user.
///
/// # Arguments
///
/// * `formatter` - Output formatter to use
/// * `merge` - Statistics of the merge
/// * `write` - Statistics of the write
pub fn display_merge_summary(
    formatter: &OutputFormatter,
    merge: &MergeStatistics,
    write: &WriteStatistics,
) {
    formatter.info(&format!(
        "Merged {} file(s) into {} page(s) in {:.2}s",
        merge.files_merged,
        merge.total_pages,
        merge.merge_time.as_secs_f64()
    ));
    formatter.detail("Input size", &merge.format_input_size());
    formatter.detail("Output size", &write.format_file_size());
    formatter.detail("Output", &write.output_path.display().to_string());
}

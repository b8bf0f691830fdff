//! Error types for pdfstitch.
//!
//! This module defines every error that can surface while collecting files,
//! merging them, or delivering the merged document. Errors are meant to be
//! shown to a user as a single notification, so their messages describe the
//! failure category rather than library internals.
//!
//! # Error Categories
//!
//! - **Input Errors**: missing files, unreadable input lists
//! - **Merge Errors**: too few files, unparsable PDFs, serialization failures
//! - **Session Errors**: mutations during a running merge, downloads without a result
//! - **Output Errors**: refused overwrites, failed writes

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfstitch operations.
pub type Result<T> = std::result::Result<T, StitchError>;

/// Main error type for pdfstitch operations.
#[derive(Debug, thiserror::Error)]
pub enum StitchError {
    /// Fewer than two files were present when a merge was requested.
    #[error("At least 2 PDF files are required to merge, found {found}")]
    InsufficientInput {
        /// Number of files that were present.
        found: usize,
    },

    /// A file could not be parsed as a PDF document.
    #[error("Failed to parse PDF: {name}\n  Reason: {reason}")]
    Parse {
        /// Display name of the offending file.
        name: String,
        /// Reason reported by the PDF backend.
        reason: String,
    },

    /// The raw bytes of a file could not be read.
    #[error("Failed to read file: {name}\n  Reason: {source}")]
    FailedToRead {
        /// Display name of the file.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The PDF backend failed while appending pages.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// The merged document could not be serialized.
    #[error("Failed to serialize merged PDF: {reason}")]
    Serialize {
        /// Description of what went wrong.
        reason: String,
    },

    /// A download was requested before any merge succeeded.
    #[error("No merged PDF available for download")]
    DownloadUnavailable,

    /// The file list or a new merge was requested while a merge is running.
    #[error("A merge is in progress; wait for it to finish before changing the file list")]
    MergeInProgress,

    /// A merge outcome arrived for a run the session is no longer waiting on.
    #[error("This merge result is out of date; merge again to get a current PDF")]
    StaleMerge,

    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Failed to read input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", .path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Input list file contains an invalid entry.
    #[error("Invalid entry in input list file: {} at line {line_number}\n  Details: {details}", .path.display())]
    InvalidInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Line number with the error.
        line_number: usize,
        /// Details about what's invalid.
        details: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output name",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to write the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for StitchError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for StitchError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl StitchError {
    /// Create a Parse error.
    pub fn parse(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create a Serialize error.
    pub fn serialize(reason: impl Into<String>) -> Self {
        Self::Serialize {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check whether this error ends a running merge in the failed state.
    ///
    /// `InsufficientInput` and `MergeInProgress` are rejected before a run
    /// starts, so they are not merge failures.
    pub fn is_merge_failure(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. }
                | Self::FailedToRead { .. }
                | Self::MergeFailed { .. }
                | Self::Serialize { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InsufficientInput { .. } => 1,
            Self::Parse { .. } => 3,
            Self::FailedToRead { .. } => 3,
            Self::MergeFailed { .. } => 6,
            Self::Serialize { .. } => 6,
            Self::DownloadUnavailable => 1,
            Self::MergeInProgress => 1,
            Self::StaleMerge => 1,
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToReadInputList { .. } => 2,
            Self::InvalidInputList { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}

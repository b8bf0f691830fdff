//! Persisting merged output.
//!
//! The merge produces bytes, not files. This module is the host side that
//! takes those bytes and puts them on disk:
//! - Atomic writes (write to temp file, then rename)
//! - Buffered output in a blocking task
//! - Pre-flight checks for the target directory
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::writer::PdfWriter;
//! use std::path::Path;
//!
//! # async fn example(bytes: std::sync::Arc<[u8]>) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! let stats = writer.save(bytes, Path::new("merged-document.pdf")).await?;
//! println!("Wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task;

use crate::error::{Result, StitchError};
use crate::utils::format_file_size;

/// Options for writing output files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writer for merged output.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self {
            options: WriteOptions::default(),
        }
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer without atomic writes.
    pub fn non_atomic() -> Self {
        Self {
            options: WriteOptions {
                atomic: false,
                ..Default::default()
            },
        }
    }

    /// Write bytes to a file and return statistics about the operation.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Serialized document
    /// * `path` - Output file path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist
    /// - Insufficient permissions
    /// - Disk full
    pub async fn save(&self, bytes: Arc<[u8]>, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();

        task::spawn_blocking(move || write_file(&bytes, path_buf, &options))
            .await
            .map_err(|e| StitchError::other(format!("Write task failed: {e}")))?
    }

    /// Write bytes into a directory under the given file name.
    ///
    /// # Errors
    ///
    /// Same as [`PdfWriter::save`].
    pub async fn save_in(
        &self,
        bytes: Arc<[u8]>,
        directory: &Path,
        file_name: &str,
    ) -> Result<WriteStatistics> {
        self.save(bytes, &directory.join(file_name)).await
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory doesn't exist
    /// - Parent directory is not writable
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let metadata = tokio::fs::metadata(parent).await.map_err(|_| {
            StitchError::invalid_config(format!(
                "Output directory does not exist: {}",
                parent.display()
            ))
        })?;

        if !metadata.is_dir() {
            return Err(StitchError::invalid_config(format!(
                "Output location is not a directory: {}",
                parent.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(StitchError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(bytes: &[u8], path: PathBuf, options: &WriteOptions) -> Result<WriteStatistics> {
    let start = Instant::now();

    let write_path = if options.atomic {
        temp_path_for(&path)
    } else {
        path.clone()
    };

    let file = std::fs::File::create(&write_path).map_err(|e| write_error(&write_path, e))?;
    let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);

    writer
        .write_all(bytes)
        .map_err(|e| write_error(&write_path, e))?;
    writer.flush().map_err(|e| write_error(&write_path, e))?;
    drop(writer);

    if options.atomic {
        if let Err(err) = std::fs::rename(&write_path, &path) {
            let _ = std::fs::remove_file(&write_path);
            return Err(write_error(&path, err));
        }
    }

    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());

    Ok(WriteStatistics {
        write_time: start.elapsed(),
        file_size: bytes.len() as u64,
        output_path: path,
    })
}

fn write_error(path: &Path, source: std::io::Error) -> StitchError {
    StitchError::FailedToWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Temp file next to the target, so the final rename stays on one filesystem.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

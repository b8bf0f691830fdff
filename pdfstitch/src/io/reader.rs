//! Input acquisition.
//!
//! This module turns what a user points at into [`RawFile`] candidates:
//! - Glob patterns and literal paths
//! - Directories, walked recursively in file-name order
//! - Input list files (one path per line)
//!
//! Every candidate is filtered by declared content type, so only PDFs reach
//! the file collection.
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::reader::SourceReader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = SourceReader::new();
//! let candidates = reader.open_all(&["chapters/*.pdf", "appendix.pdf"]).await?;
//! println!("Found {} PDF files", candidates.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use walkdir::WalkDir;

use crate::error::{Result, StitchError};
use crate::io::source::{RawFile, retain_pdfs};
use crate::utils::collect_paths_for_pattern;

/// Reader that resolves user input into PDF candidates.
#[derive(Debug, Clone)]
pub struct SourceReader {
    /// Whether directories are expanded into the files they contain.
    expand_directories: bool,
}

impl SourceReader {
    /// Create a reader that expands directories.
    pub fn new() -> Self {
        Self {
            expand_directories: true,
        }
    }

    /// Create a reader that rejects directories instead of walking them.
    pub fn without_directory_expansion() -> Self {
        Self {
            expand_directories: false,
        }
    }

    /// Resolve patterns into PDF candidates, preserving input order.
    ///
    /// Each pattern is expanded with glob semantics; a pattern that matches
    /// nothing is reported as a missing file. Candidates whose declared
    /// content type is not PDF are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is malformed, matches nothing, or a
    /// matched path cannot be inspected.
    pub async fn open_all<T>(&self, patterns: T) -> Result<Vec<RawFile>>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let mut paths = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let matched = collect_paths_for_pattern(pattern)?;

            if matched.is_empty() {
                return Err(StitchError::file_not_found(PathBuf::from(pattern)));
            }

            for path in matched {
                paths.extend(self.expand(&path)?);
            }
        }

        // Metadata lookups are independent; try_join_all keeps input order.
        let candidates = try_join_all(paths.iter().map(|path| RawFile::from_path(path))).await?;

        Ok(retain_pdfs(candidates))
    }

    /// Resolve a single path into PDF candidates.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be inspected.
    pub async fn open(&self, path: &Path) -> Result<Vec<RawFile>> {
        let mut candidates = Vec::new();
        for file in self.expand(path)? {
            candidates.push(RawFile::from_path(&file).await?);
        }
        Ok(retain_pdfs(candidates))
    }

    /// Expand a directory into the regular files below it, sorted by name.
    fn expand(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.is_dir() {
            return Ok(vec![path.to_path_buf()]);
        }

        if !self.expand_directories {
            return Err(StitchError::not_a_file(path.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|err| StitchError::other(err.to_string()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        log::debug!(
            "Expanded directory {} into {} file(s)",
            path.display(),
            files.len()
        );

        Ok(files)
    }

    /// Read input paths from a list file.
    ///
    /// Reads one path per line. Lines starting with '#' are comments and
    /// empty lines are skipped. Use "-" to read from stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be read.
    pub async fn read_input_list(&self, path: &Path) -> Result<Vec<String>> {
        if path.as_os_str() == "-" {
            let reader = BufReader::new(tokio::io::stdin());
            return parse_input_list(reader, path).await;
        }

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| StitchError::FailedToReadInputList {
                path: path.to_path_buf(),
                source: e,
            })?;

        parse_input_list(BufReader::new(file), path).await
    }
}

impl Default for SourceReader {
    fn default() -> Self {
        Self::new()
    }
}

async fn parse_input_list<R>(reader: R, origin: &Path) -> Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut entries = Vec::new();
    let mut line_number = 0;

    while let Some(line) =
        lines
            .next_line()
            .await
            .map_err(|e| StitchError::FailedToReadInputList {
                path: origin.to_path_buf(),
                source: e,
            })?
    {
        line_number += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.contains('\0') {
            return Err(StitchError::InvalidInputList {
                path: origin.to_path_buf(),
                line_number,
                details: "Path contains a NUL byte".to_string(),
            });
        }

        entries.push(line.to_string());
    }

    Ok(entries)
}

//! Sequential merge orchestration.
//!
//! The orchestrator walks the ordered entries one by one: read bytes, parse,
//! append every page to the accumulator, report progress, then yield to the
//! runtime before the next entry. Entries are never processed concurrently,
//! because the output page order must match the input order exactly and the
//! accumulator is mutated in place.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::collection::FileEntry;
use crate::config::Config;
use crate::error::{Result, StitchError};
use crate::merge::backend::{LopdfBackend, PdfBackend};
use crate::utils::format_file_size;

/// Fewest entries a merge accepts.
pub const MIN_MERGE_INPUTS: usize = 2;

/// Options for the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Optional delay inserted after each entry.
    ///
    /// Purely cosmetic; it gives interactive hosts a perceptible progress
    /// indicator. Without it the orchestrator only yields.
    pub pacing: Option<Duration>,
}

/// Progress after an entry has been fully processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Entries processed so far, including the current one.
    pub completed: usize,

    /// Entries in the run.
    pub total: usize,

    /// Display name of the entry just processed.
    pub current_name: String,
}

impl ProgressEvent {
    /// Check whether this is the last entry of the run.
    ///
    /// Only serialization is left once the last entry has been appended.
    pub fn is_last(&self) -> bool {
        self.completed >= self.total
    }
}

/// Statistics about a merge operation.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStatistics {
    /// Number of documents merged.
    pub files_merged: usize,

    /// Total number of pages in merged document.
    pub total_pages: usize,

    /// Total size of the inputs in bytes.
    pub input_size: u64,

    /// Size of the serialized output in bytes.
    pub output_size: u64,

    /// Total time taken for merge.
    pub merge_time: Duration,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// A finished merge: the serialized document and how it was produced.
#[derive(Debug, Clone)]
pub struct MergedPdf {
    bytes: Arc<[u8]>,
    statistics: MergeStatistics,
}

impl MergedPdf {
    /// Serialized document.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the serialized document.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Statistics about the merge that produced this document.
    pub fn statistics(&self) -> &MergeStatistics {
        &self.statistics
    }
}

/// Merges ordered entries through a [`PdfBackend`].
#[derive(Debug, Clone)]
pub struct Merger<B = LopdfBackend> {
    backend: B,
    options: MergeOptions,
}

impl Merger<LopdfBackend> {
    /// Create a merger on the `lopdf` backend with default options.
    pub fn new() -> Self {
        Self::with_backend(LopdfBackend::new())
    }

    /// Create a merger with the compression and pacing a configuration asks
    /// for.
    pub fn from_config(config: &Config) -> Self {
        Self::with_backend(LopdfBackend::with_compression(config.compression))
            .with_options(config.merge_options())
    }
}

impl Default for Merger<LopdfBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: PdfBackend> Merger<B> {
    /// Create a merger on a specific backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            options: MergeOptions::default(),
        }
    }

    /// Replace the orchestrator options.
    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// The backend this merger delegates to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Merge entries in order into a single document.
    ///
    /// `on_progress` is called once per entry, after it has been appended.
    ///
    /// # Arguments
    ///
    /// * `entries` - Entries in merge order
    /// * `on_progress` - Progress callback
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than two entries are given (the backend is never called)
    /// - An entry cannot be read or parsed
    /// - The backend fails to append pages or serialize
    ///
    /// On error nothing of the partial document is returned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfstitch::collection::FileEntry;
    /// # use pdfstitch::merge::Merger;
    /// # async fn example(entries: Vec<FileEntry>) -> Result<(), Box<dyn std::error::Error>> {
    /// let merger = Merger::new();
    /// let merged = merger
    ///     .merge(&entries, |event| {
    ///         println!("{}/{} {}", event.completed, event.total, event.current_name)
    ///     })
    ///     .await?;
    /// println!("{} pages", merged.statistics().total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge<F>(&self, entries: &[FileEntry], mut on_progress: F) -> Result<MergedPdf>
    where
        F: FnMut(&ProgressEvent),
    {
        if entries.len() < MIN_MERGE_INPUTS {
            return Err(StitchError::InsufficientInput {
                found: entries.len(),
            });
        }

        let start = Instant::now();
        let total = entries.len();
        let mut target = self.backend.create_empty();
        let mut total_pages = 0;
        let mut input_size = 0;

        log::info!("Merging {total} documents");

        for (index, entry) in entries.iter().enumerate() {
            let bytes =
                entry
                    .source
                    .read_bytes()
                    .await
                    .map_err(|source| StitchError::FailedToRead {
                        name: entry.name.clone(),
                        source,
                    })?;
            input_size += bytes.len() as u64;

            let document = self
                .backend
                .parse(&bytes)
                .map_err(|err| StitchError::parse(&entry.name, err.0))?;

            if self.backend.page_count(&document) == 0 {
                log::warn!("{} has no pages", entry.name);
            }

            let appended = self
                .backend
                .append_pages(&mut target, document)
                .map_err(|err| StitchError::merge_failed(format!("{}: {err}", entry.name)))?;
            total_pages += appended;

            log::debug!(
                "Appended {appended} page(s) from {} ({}/{total})",
                entry.name,
                index + 1
            );

            on_progress(&ProgressEvent {
                completed: index + 1,
                total,
                current_name: entry.name.clone(),
            });

            self.pause().await;
        }

        let bytes = self
            .backend
            .serialize(target)
            .map_err(|err| StitchError::serialize(err.0))?;

        let statistics = MergeStatistics {
            files_merged: total,
            total_pages,
            input_size,
            output_size: bytes.len() as u64,
            merge_time: start.elapsed(),
        };

        log::info!(
            "Merged {total} documents into {total_pages} page(s) in {:?}",
            statistics.merge_time
        );

        Ok(MergedPdf {
            bytes: bytes.into(),
            statistics,
        })
    }

    async fn pause(&self) {
        match self.options.pacing {
            Some(delay) if !delay.is_zero() => tokio::time::sleep(delay).await,
            _ => tokio::task::yield_now().await,
        }
    }
}

//! PDF merging.
//!
//! This module provides the merge core:
//! - The [`PdfBackend`] boundary and its `lopdf` implementation
//! - The sequential orchestrator that drives a run
//! - Progress events and merge statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::collection::FileCollection;
//! use pdfstitch::io::RawFile;
//! use pdfstitch::merge::Merger;
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut files = FileCollection::new();
//! files.add(vec![RawFile::pdf("a.pdf", a), RawFile::pdf("b.pdf", b)]);
//!
//! let merged = Merger::new().merge(files.entries(), |_| {}).await?;
//! println!("Merged {} pages", merged.statistics().total_pages);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod fixtures;

pub use backend::{BackendError, LopdfBackend, PageAccumulator, PdfBackend};
pub use orchestrator::{
    MIN_MERGE_INPUTS, MergeOptions, MergeStatistics, MergedPdf, Merger, ProgressEvent,
};

use crate::collection::FileEntry;
use crate::config::Config;
use crate::error::Result;

/// Merge entries with the backend and options a configuration asks for.
///
/// Convenience function that creates a merger and performs the merge.
///
/// # Errors
///
/// Returns an error if the merge fails; see [`Merger::merge`].
pub async fn merge_entries<F>(
    entries: &[FileEntry],
    config: &Config,
    on_progress: F,
) -> Result<MergedPdf>
where
    F: FnMut(&ProgressEvent),
{
    Merger::from_config(config).merge(entries, on_progress).await
}

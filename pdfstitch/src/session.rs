//! The controller that owns a file collection and its merge state.
//!
//! A [`MergeSession`] is what a host talks to. It forwards list edits to the
//! [`FileCollection`], starts and finishes merge runs, and hands out the
//! finished document for download.
//!
//! While a merge is running the session rejects every list edit with
//! [`StitchError::MergeInProgress`]. The run itself works on a snapshot of
//! the entries taken when it started, held by a [`MergeJob`] that does not
//! borrow the session, so a host can keep accepting (and rejecting) user
//! actions while the merge future is pending.
//!
//! Every run gets a number. [`MergeSession::finish_merge`] only accepts the
//! outcome of the run the session is waiting on. A host that drops a job
//! before it finishes calls [`MergeSession::abort_merge`] to unlock the list.
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::RawFile;
//! use pdfstitch::merge::Merger;
//! use pdfstitch::session::MergeSession;
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = MergeSession::new();
//! session.add(vec![RawFile::pdf("a.pdf", a), RawFile::pdf("b.pdf", b)])?;
//!
//! session.merge(&Merger::new(), |_| {}).await?;
//!
//! let download = session.download("  report ")?;
//! assert_eq!(download.file_name(), "report.pdf");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::collection::{EntryId, FileCollection, FileEntry, MoveDirection};
use crate::error::{Result, StitchError};
use crate::io::RawFile;
use crate::io::source::retain_pdfs;
use crate::merge::{MIN_MERGE_INPUTS, MergeStatistics, MergedPdf, Merger, PdfBackend, ProgressEvent};

/// File name stem used when the requested output name is blank.
pub const DEFAULT_OUTPUT_STEM: &str = "merged-document";

/// Where the session is in the merge workflow.
#[derive(Debug, Clone, Default)]
pub enum MergeState {
    /// Nothing merged yet, or the collection was cleared.
    #[default]
    Idle,
    /// A merge over `total` entries is in progress.
    Running {
        /// Entries in the run.
        total: usize,
    },
    /// The last merge finished; its document is ready for download.
    Succeeded(MergedPdf),
    /// The last merge failed.
    Failed {
        /// Why it failed.
        reason: String,
    },
}

impl MergeState {
    /// Check if a merge is in progress.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// The finished document, if the last merge succeeded.
    pub fn merged(&self) -> Option<&MergedPdf> {
        match self {
            Self::Succeeded(merged) => Some(merged),
            _ => None,
        }
    }
}

impl fmt::Display for MergeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Running { total } => write!(f, "merging {total} files"),
            Self::Succeeded(merged) => {
                write!(f, "merged {} pages", merged.statistics().total_pages)
            }
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Ordered file collection plus merge state.
#[derive(Debug, Default)]
pub struct MergeSession {
    collection: FileCollection,
    state: MergeState,
    /// Number of the most recently started run.
    run: u64,
}

impl MergeSession {
    /// Create an empty, idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The file collection.
    pub fn collection(&self) -> &FileCollection {
        &self.collection
    }

    /// Entries in merge order.
    pub fn entries(&self) -> &[FileEntry] {
        self.collection.entries()
    }

    /// Current merge state.
    pub fn state(&self) -> &MergeState {
        &self.state
    }

    /// Check if a merge is in progress.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// The finished document, if the last merge succeeded.
    pub fn merged(&self) -> Option<&MergedPdf> {
        self.state.merged()
    }

    /// Add candidates to the end of the collection.
    ///
    /// Candidates not declared as PDF are dropped; duplicates by
    /// (name, size) are skipped. A finished document stays available.
    ///
    /// Returns the number of entries appended.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::MergeInProgress`] while a merge is running.
    pub fn add(&mut self, candidates: Vec<RawFile>) -> Result<usize> {
        self.ensure_idle()?;
        Ok(self.collection.add(retain_pdfs(candidates)))
    }

    /// Remove an entry. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::MergeInProgress`] while a merge is running.
    pub fn remove(&mut self, id: EntryId) -> Result<bool> {
        self.ensure_idle()?;
        Ok(self.collection.remove(id))
    }

    /// Swap an entry with its neighbour.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::MergeInProgress`] while a merge is running.
    pub fn move_entry(&mut self, id: EntryId, direction: MoveDirection) -> Result<bool> {
        self.ensure_idle()?;
        Ok(self.collection.move_entry(id, direction))
    }

    /// Empty the collection and discard any finished document.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::MergeInProgress`] while a merge is running.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.collection.clear();
        self.state = MergeState::Idle;
        Ok(())
    }

    /// Start a merge over a snapshot of the current entries.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A merge is already running
    /// - Fewer than two entries are selected (the state is left as it was)
    pub fn begin_merge(&mut self) -> Result<MergeJob> {
        self.ensure_idle()?;

        let total = self.collection.len();
        if total < MIN_MERGE_INPUTS {
            return Err(StitchError::InsufficientInput { found: total });
        }

        self.run += 1;
        self.state = MergeState::Running { total };
        log::debug!("Starting merge run {} over {total} files", self.run);

        Ok(MergeJob {
            run: self.run,
            entries: self.collection.entries().to_vec(),
        })
    }

    /// Record the outcome of a run started with [`MergeSession::begin_merge`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The run is not the one the session is waiting on
    ///   ([`StitchError::StaleMerge`]; the state is left as it was)
    /// - The run failed (the error is passed back after recording it)
    pub fn finish_merge(&mut self, finished: FinishedMerge) -> Result<&MergedPdf> {
        if !self.is_running() || finished.run != self.run {
            log::warn!("Ignoring outcome of merge run {}", finished.run);
            return Err(StitchError::StaleMerge);
        }

        match finished.outcome {
            Ok(merged) => {
                log::debug!("Merge succeeded");
                self.state = MergeState::Succeeded(merged);
                self.merged().ok_or(StitchError::DownloadUnavailable)
            }
            Err(err) => {
                log::debug!("Merge failed: {err}");
                self.state = MergeState::Failed {
                    reason: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Give up on the running merge.
    ///
    /// For hosts that drop a [`MergeJob`] before it finishes. The session
    /// moves to [`MergeState::Failed`] and accepts edits again; the dropped
    /// run's outcome, if it ever arrives, is rejected as stale.
    ///
    /// Returns `false` if no merge was running.
    pub fn abort_merge(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        log::warn!("Merge run {} was interrupted", self.run);
        self.state = MergeState::Failed {
            reason: "Merge was interrupted before it finished".to_string(),
        };
        true
    }

    /// Begin, run and finish a merge in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the merge cannot start or fails.
    pub async fn merge<B, F>(&mut self, merger: &Merger<B>, on_progress: F) -> Result<&MergedPdf>
    where
        B: PdfBackend,
        F: FnMut(&ProgressEvent),
    {
        let job = self.begin_merge()?;
        let finished = job.run(merger, on_progress).await;
        self.finish_merge(finished)
    }

    /// Prepare the finished document for download.
    ///
    /// The document is only borrowed; downloading again yields the same
    /// bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::DownloadUnavailable`] if no merge has
    /// succeeded since the session was created or last cleared.
    pub fn download(&self, requested_name: &str) -> Result<Download<'_>> {
        let merged = self.merged().ok_or(StitchError::DownloadUnavailable)?;
        Ok(Download {
            file_name: normalize_output_name(requested_name),
            merged,
        })
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_running() {
            return Err(StitchError::MergeInProgress);
        }
        Ok(())
    }
}

/// A merge run over a snapshot of the collection.
#[derive(Debug)]
pub struct MergeJob {
    run: u64,
    entries: Vec<FileEntry>,
}

impl MergeJob {
    /// Entries in this run, in merge order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Number of entries in this run.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the run has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the merge.
    ///
    /// The outcome is handed back to [`MergeSession::finish_merge`]; a
    /// failure is reported there, see [`Merger::merge`].
    pub async fn run<B, F>(self, merger: &Merger<B>, on_progress: F) -> FinishedMerge
    where
        B: PdfBackend,
        F: FnMut(&ProgressEvent),
    {
        let outcome = merger.merge(&self.entries, on_progress).await;
        FinishedMerge {
            run: self.run,
            outcome,
        }
    }
}

/// Outcome of a [`MergeJob`], tagged with the run that produced it.
#[derive(Debug)]
pub struct FinishedMerge {
    run: u64,
    outcome: Result<MergedPdf>,
}

impl FinishedMerge {
    /// Check if the run produced a document.
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// A finished document ready to be saved under a normalized name.
#[derive(Debug, Clone)]
pub struct Download<'a> {
    file_name: String,
    merged: &'a MergedPdf,
}

impl Download<'_> {
    /// Normalized file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Serialized document.
    pub fn bytes(&self) -> &[u8] {
        self.merged.bytes()
    }

    /// Shared handle to the serialized document.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        self.merged.shared_bytes()
    }

    /// Statistics of the merge that produced the document.
    pub fn statistics(&self) -> &MergeStatistics {
        self.merged.statistics()
    }
}

/// Turn a user-supplied name into an output file name.
///
/// Surrounding whitespace is trimmed, a blank name becomes
/// [`DEFAULT_OUTPUT_STEM`], and `.pdf` is appended unless the name already
/// ends with exactly `.pdf`.
///
/// # Examples
///
/// ```
/// use pdfstitch::session::normalize_output_name;
///
/// assert_eq!(normalize_output_name(""), "merged-document.pdf");
/// assert_eq!(normalize_output_name(" book "), "book.pdf");
/// assert_eq!(normalize_output_name("book.pdf"), "book.pdf");
/// ```
pub fn normalize_output_name(requested: &str) -> String {
    let trimmed = requested.trim();
    let stem = if trimmed.is_empty() {
        DEFAULT_OUTPUT_STEM
    } else {
        trimmed
    };

    if stem.ends_with(".pdf") {
        stem.to_string()
    } else {
        format!("{stem}.pdf")
    }
}

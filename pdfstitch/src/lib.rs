//! pdfstitch - Collect, reorder and stitch PDF files into a single document.
//!
//! This library holds everything behind a "pick some PDFs, put them in
//! order, merge, save" workflow:
//!
//! - An ordered file collection with (name, size) deduplication
//! - A sequential merge orchestrator with progress reporting
//! - A session controller that guards the collection while a merge runs
//! - Input acquisition from paths, globs and list files
//! - Atomic output writing
//!
//! Page copying and serialization are delegated to `lopdf` behind the
//! [`merge::PdfBackend`] trait.
//!
//! # Examples
//!
//! ## Session workflow
//!
//! ```no_run
//! use pdfstitch::collection::MoveDirection;
//! use pdfstitch::io::{PdfWriter, SourceReader};
//! use pdfstitch::merge::Merger;
//! use pdfstitch::session::MergeSession;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = MergeSession::new();
//! let candidates = SourceReader::new().open_all(["cover.pdf", "chapters/*.pdf"]).await?;
//! session.add(candidates)?;
//!
//! // Put the last file first
//! if let Some(last) = session.entries().last().map(|entry| entry.id) {
//!     for _ in 1..session.entries().len() {
//!         session.move_entry(last, MoveDirection::Previous)?;
//!     }
//! }
//!
//! session
//!     .merge(&Merger::new(), |event| {
//!         println!("{}/{} {}", event.completed, event.total, event.current_name)
//!     })
//!     .await?;
//!
//! let download = session.download("book")?;
//! PdfWriter::new()
//!     .save(download.shared_bytes(), Path::new(download.file_name()))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
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
//! println!("{} pages, {}", merged.statistics().total_pages, merged.statistics().format_output_size());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, StitchError};
pub use session::MergeSession;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

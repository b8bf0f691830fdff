//! I/O for pdfstitch.
//!
//! This module sits between the host environment and the merge core:
//! - Acquiring candidate files from paths, globs and input lists
//! - Declaring content types and filtering non-PDF candidates
//! - Writing merged bytes back to disk
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::{PdfWriter, SourceReader};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = SourceReader::new();
//! let candidates = reader.open_all(["a.pdf", "b.pdf"]).await?;
//!
//! let bytes = candidates[0].read_bytes().await?;
//! PdfWriter::new().save(bytes, Path::new("copy.pdf")).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod source;
pub mod writer;

pub use reader::SourceReader;
pub use source::{FileHandle, RawFile};
pub use writer::{PdfWriter, WriteStatistics};

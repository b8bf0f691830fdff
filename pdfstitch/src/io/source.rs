//! Raw file candidates supplied by the host.
//!
//! A [`RawFile`] is what the host hands over before anything is known about
//! the file's contents: a display name, a size, a declared content type and
//! an opaque handle that can later produce the bytes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Result, StitchError};

/// MIME type declared for PDF documents.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// MIME type declared for anything that is not recognized.
pub const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// Where the bytes of a [`RawFile`] live.
#[derive(Debug, Clone)]
pub enum FileHandle {
    /// A file on disk, read lazily.
    Path(PathBuf),
    /// Bytes already held in memory.
    Memory(Arc<[u8]>),
}

/// A candidate file as supplied by the host environment.
#[derive(Debug, Clone)]
pub struct RawFile {
    /// Display name (file name without directories).
    pub name: String,

    /// Size in bytes as reported when the candidate was acquired.
    pub size_bytes: u64,

    /// Declared MIME type.
    pub content_type: String,

    /// Handle used to read the content.
    pub handle: FileHandle,
}

impl RawFile {
    /// Build a candidate from a path on disk.
    ///
    /// The declared content type is derived from the file extension, the
    /// same way a file picker labels a selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or is not a regular file.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                StitchError::file_not_found(path.to_path_buf())
            } else {
                StitchError::Io { source: err }
            }
        })?;

        if !metadata.is_file() {
            return Err(StitchError::not_a_file(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            content_type: content_type_for_path(path).to_string(),
            name,
            size_bytes: metadata.len(),
            handle: FileHandle::Path(path.to_path_buf()),
        })
    }

    /// Build a candidate from bytes held in memory.
    ///
    /// The caller declares the content type, as a drag-and-drop payload does.
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            content_type: content_type.into(),
            handle: FileHandle::Memory(bytes),
        }
    }

    /// Build an in-memory PDF candidate.
    pub fn pdf(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::from_bytes(name, PDF_CONTENT_TYPE, bytes)
    }

    /// Check whether the declared content type is PDF.
    pub fn is_pdf(&self) -> bool {
        self.content_type.eq_ignore_ascii_case(PDF_CONTENT_TYPE)
    }

    /// Path on disk, if this candidate is backed by a file.
    pub fn path(&self) -> Option<&Path> {
        match &self.handle {
            FileHandle::Path(path) => Some(path),
            FileHandle::Memory(_) => None,
        }
    }

    /// Read the full content.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a file-backed candidate cannot be read.
    pub async fn read_bytes(&self) -> std::io::Result<Arc<[u8]>> {
        match &self.handle {
            FileHandle::Path(path) => Ok(tokio::fs::read(path).await?.into()),
            FileHandle::Memory(bytes) => Ok(Arc::clone(bytes)),
        }
    }
}

/// Derive a declared content type from a file extension.
pub fn content_type_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_CONTENT_TYPE,
        _ => UNKNOWN_CONTENT_TYPE,
    }
}

/// Keep only candidates whose declared content type is PDF.
///
/// Dropped candidates are logged, not reported as errors.
pub fn retain_pdfs(candidates: Vec<RawFile>) -> Vec<RawFile> {
    candidates
        .into_iter()
        .filter(|candidate| {
            let keep = candidate.is_pdf();
            if !keep {
                log::warn!(
                    "Skipping {} (declared type {}, expected {PDF_CONTENT_TYPE})",
                    candidate.name,
                    candidate.content_type
                );
            }
            keep
        })
        .collect()
}

//! Integration tests for error handling and edge cases.

use pdfstitch::collection::FileCollection;
use pdfstitch::error::StitchError;
use pdfstitch::io::{PdfWriter, RawFile, SourceReader};
use pdfstitch::merge::Merger;
use pdfstitch::output::Notification;
use pdfstitch::session::{MergeSession, MergeState};
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::{marked_file, write_marked};

#[tokio::test]
async fn test_error_nonexistent_input() {
    let err = SourceReader::new()
        .open_all(["/nonexistent/file.pdf"])
        .await
        .unwrap_err();

    assert!(matches!(err, StitchError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_error_directory_without_expansion() {
    let dir = TempDir::new().unwrap();

    let err = SourceReader::without_directory_expansion()
        .open(dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, StitchError::NotAFile { .. }));
}

#[tokio::test]
async fn test_error_single_file() {
    let mut files = FileCollection::new();
    files.add(vec![marked_file("only.pdf", "only", 3)]);

    let err = Merger::new().merge(files.entries(), |_| {}).await.unwrap_err();

    assert!(matches!(err, StitchError::InsufficientInput { found: 1 }));
    assert_eq!(
        Notification::from(&err).message,
        "Please select at least 2 PDF files to merge."
    );
}

#[tokio::test]
async fn test_error_corrupt_middle_file() {
    let mut session = MergeSession::new();
    session
        .add(vec![
            marked_file("a.pdf", "a", 1),
            RawFile::pdf("broken.pdf", b"this is not a pdf".to_vec()),
            marked_file("c.pdf", "c", 1),
        ])
        .unwrap();

    let mut progress = Vec::new();
    let err = session
        .merge(&Merger::new(), |event| progress.push(event.completed))
        .await
        .unwrap_err();

    assert!(matches!(err, StitchError::Parse { ref name, .. } if name == "broken.pdf"));
    assert_eq!(progress, vec![1]);
    assert!(matches!(session.state(), MergeState::Failed { .. }));
    assert!(session.merged().is_none());
    assert!(
        Notification::from(&err)
            .message
            .starts_with("Error merging PDFs:")
    );
}

#[tokio::test]
async fn test_error_file_removed_after_selection() {
    let dir = TempDir::new().unwrap();
    let a = write_marked(dir.path(), "a.pdf", "a", 1);
    let b = write_marked(dir.path(), "b.pdf", "b", 1);

    let mut files = FileCollection::new();
    files.add(
        SourceReader::new()
            .open_all([a.display().to_string(), b.display().to_string()])
            .await
            .unwrap(),
    );
    std::fs::remove_file(&b).unwrap();

    let err = Merger::new().merge(files.entries(), |_| {}).await.unwrap_err();
    assert!(matches!(err, StitchError::FailedToRead { ref name, .. } if name == "b.pdf"));
    assert!(err.is_merge_failure());
}

#[tokio::test]
async fn test_download_without_merge() {
    let mut session = MergeSession::new();
    session
        .add(vec![marked_file("a.pdf", "a", 1), marked_file("b.pdf", "b", 1)])
        .unwrap();

    let err = session.download("out").unwrap_err();
    assert!(matches!(err, StitchError::DownloadUnavailable));
    assert_eq!(
        Notification::from(&err).message,
        "No merged PDF available for download."
    );
}

#[tokio::test]
async fn test_error_output_directory_missing() {
    let writer = PdfWriter::new();
    let target = PathBuf::from("/nonexistent/dir/out.pdf");

    let err = writer.can_write(&target).await.unwrap_err();
    assert!(matches!(err, StitchError::InvalidConfig { .. }));

    let err = writer.save(vec![1u8, 2, 3].into(), &target).await.unwrap_err();
    assert!(matches!(err, StitchError::FailedToWrite { .. }));
    assert_eq!(err.exit_code(), 5);
}

#[tokio::test]
async fn test_error_malformed_input_list() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("list.txt");
    std::fs::write(&list, "a.pdf\nb\0.pdf\n").unwrap();

    let err = SourceReader::new().read_input_list(&list).await.unwrap_err();
    assert!(matches!(
        err,
        StitchError::InvalidInputList { line_number: 2, .. }
    ));
}

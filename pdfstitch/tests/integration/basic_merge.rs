//! Integration tests for merging files from disk.

use pdfstitch::collection::FileCollection;
use pdfstitch::config::{CompressionLevel, Config};
use pdfstitch::io::{PdfWriter, SourceReader};
use pdfstitch::merge::{Merger, merge_entries};
use pdfstitch::session::MergeSession;
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{expected_markers, page_markers, write_marked};

#[tokio::test]
async fn test_merge_files_from_disk_in_order() {
    let dir = TempDir::new().unwrap();
    let a = write_marked(dir.path(), "a.pdf", "a", 2);
    let b = write_marked(dir.path(), "b.pdf", "b", 3);
    let c = write_marked(dir.path(), "c.pdf", "c", 1);

    let candidates = SourceReader::new()
        .open_all([c.display().to_string(), a.display().to_string(), b.display().to_string()])
        .await
        .unwrap();

    let mut files = FileCollection::new();
    assert_eq!(files.add(candidates), 3);

    let merged = Merger::new().merge(files.entries(), |_| {}).await.unwrap();

    let mut expected = expected_markers("c", 1);
    expected.extend(expected_markers("a", 2));
    expected.extend(expected_markers("b", 3));
    assert_eq!(page_markers(merged.bytes()), expected);
    assert_eq!(merged.statistics().files_merged, 3);
    assert_eq!(merged.statistics().total_pages, 6);
}

#[tokio::test]
async fn test_merge_directory_and_write_output() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("inputs");
    std::fs::create_dir(&inputs).unwrap();
    write_marked(&inputs, "02-body.pdf", "body", 3);
    write_marked(&inputs, "01-cover.pdf", "cover", 1);
    std::fs::write(inputs.join("readme.txt"), "not a pdf").unwrap();

    let mut session = MergeSession::new();
    let candidates = SourceReader::new()
        .open_all([inputs.display().to_string()])
        .await
        .unwrap();
    assert_eq!(session.add(candidates).unwrap(), 2);

    session.merge(&Merger::new(), |_| {}).await.unwrap();
    let download = session.download("book").unwrap();
    assert_eq!(download.file_name(), "book.pdf");

    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();
    let stats = PdfWriter::new()
        .save_in(download.shared_bytes(), &out_dir, download.file_name())
        .await
        .unwrap();

    assert_eq!(stats.output_path, out_dir.join("book.pdf"));
    assert_eq!(stats.file_size, download.bytes().len() as u64);

    let written = std::fs::read(out_dir.join("book.pdf")).unwrap();
    let mut expected = expected_markers("cover", 1);
    expected.extend(expected_markers("body", 3));
    assert_eq!(page_markers(&written), expected);
}

#[tokio::test]
async fn test_glob_pattern_expands_in_name_order() {
    let dir = TempDir::new().unwrap();
    write_marked(dir.path(), "ch2.pdf", "two", 1);
    write_marked(dir.path(), "ch1.pdf", "one", 2);
    write_marked(dir.path(), "appendix.pdf", "appendix", 1);

    let pattern = dir.path().join("ch*.pdf").display().to_string();
    let candidates = SourceReader::new().open_all([pattern]).await.unwrap();

    let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["ch1.pdf", "ch2.pdf"]);
}

#[tokio::test]
async fn test_same_file_twice_is_deduplicated() {
    let dir = TempDir::new().unwrap();
    let a = write_marked(dir.path(), "a.pdf", "a", 1);
    let a = a.display().to_string();

    let candidates = SourceReader::new().open_all([&a, &a]).await.unwrap();
    assert_eq!(candidates.len(), 2);

    let mut files = FileCollection::new();
    assert_eq!(files.add(candidates), 1);
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
#[tokio::test]
async fn test_merge_entries_with_compression(#[case] compression: CompressionLevel) {
    let dir = TempDir::new().unwrap();
    write_marked(dir.path(), "a.pdf", "a", 2);
    write_marked(dir.path(), "b.pdf", "b", 2);

    let config = Config {
        inputs: vec![dir.path().join("*.pdf").display().to_string()],
        compression,
        ..Default::default()
    };

    let mut files = FileCollection::new();
    files.add(SourceReader::new().open_all(&config.inputs).await.unwrap());

    let merged = merge_entries(files.entries(), &config, |_| {}).await.unwrap();

    let mut expected = expected_markers("a", 2);
    expected.extend(expected_markers("b", 2));
    assert_eq!(page_markers(merged.bytes()), expected);
    assert_eq!(merged.statistics().output_size, merged.bytes().len() as u64);
}

//! Integration tests for the session workflow: select, reorder, merge, download.

use pdfstitch::collection::MoveDirection;
use pdfstitch::error::StitchError;
use pdfstitch::io::RawFile;
use pdfstitch::merge::{MergeOptions, Merger};
use pdfstitch::session::{MergeSession, MergeState};
use std::time::Duration;

use crate::common::{expected_markers, marked_file, page_markers};

fn session_with(files: Vec<RawFile>) -> MergeSession {
    let mut session = MergeSession::new();
    session.add(files).unwrap();
    session
}

#[tokio::test]
async fn test_reorder_remove_and_merge() {
    let mut session = session_with(vec![
        marked_file("intro.pdf", "intro", 1),
        marked_file("draft.pdf", "draft", 4),
        marked_file("body.pdf", "body", 2),
        marked_file("outro.pdf", "outro", 1),
    ]);

    let draft = session.entries()[1].id;
    let outro = session.entries()[3].id;
    session.remove(draft).unwrap();
    session.move_entry(outro, MoveDirection::Previous).unwrap();

    let names: Vec<_> = session.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["intro.pdf", "outro.pdf", "body.pdf"]);

    let mut events = Vec::new();
    session
        .merge(&Merger::new(), |event| {
            events.push((event.completed, event.total, event.current_name.clone()))
        })
        .await
        .unwrap();

    assert_eq!(
        events,
        vec![
            (1, 3, "intro.pdf".to_string()),
            (2, 3, "outro.pdf".to_string()),
            (3, 3, "body.pdf".to_string()),
        ]
    );

    let download = session.download("").unwrap();
    assert_eq!(download.file_name(), "merged-document.pdf");

    let mut expected = expected_markers("intro", 1);
    expected.extend(expected_markers("outro", 1));
    expected.extend(expected_markers("body", 2));
    assert_eq!(page_markers(download.bytes()), expected);
}

#[tokio::test]
async fn test_download_is_repeatable() {
    let mut session = session_with(vec![
        marked_file("a.pdf", "a", 1),
        marked_file("b.pdf", "b", 1),
    ]);
    session.merge(&Merger::new(), |_| {}).await.unwrap();

    let first = session.download("report").unwrap().bytes().to_vec();
    let second = session.download("report.pdf").unwrap();

    assert_eq!(second.file_name(), "report.pdf");
    assert_eq!(second.bytes(), first.as_slice());
}

#[tokio::test]
async fn test_edits_after_merge_keep_result_until_clear() {
    let mut session = session_with(vec![
        marked_file("a.pdf", "a", 1),
        marked_file("b.pdf", "b", 1),
    ]);
    session.merge(&Merger::new(), |_| {}).await.unwrap();

    session.add(vec![marked_file("c.pdf", "c", 1)]).unwrap();
    assert!(session.download("x").is_ok());

    session.clear().unwrap();
    assert!(session.entries().is_empty());
    assert!(matches!(session.state(), MergeState::Idle));
    assert!(matches!(
        session.download("x").unwrap_err(),
        StitchError::DownloadUnavailable
    ));
}

#[tokio::test]
async fn test_remerge_after_failure() {
    let mut session = session_with(vec![
        marked_file("a.pdf", "a", 1),
        RawFile::pdf("bad.pdf", b"garbage".to_vec()),
    ]);

    assert!(session.merge(&Merger::new(), |_| {}).await.is_err());
    assert!(matches!(session.state(), MergeState::Failed { .. }));

    let bad = session.entries()[1].id;
    session.remove(bad).unwrap();
    session.add(vec![marked_file("b.pdf", "b", 2)]).unwrap();

    let merged = session.merge(&Merger::new(), |_| {}).await.unwrap();
    assert_eq!(merged.statistics().total_pages, 3);
}

#[tokio::test]
async fn test_edits_rejected_while_merging() {
    let mut session = session_with(vec![
        marked_file("a.pdf", "a", 2),
        marked_file("b.pdf", "b", 1),
    ]);
    let first = session.entries()[0].id;

    let job = session.begin_merge().unwrap();
    assert!(session.is_running());

    let merger = Merger::new();
    let (finished, rejected) = tokio::join!(job.run(&merger, |_| {}), async {
        vec![
            session.add(vec![marked_file("c.pdf", "c", 1)]).map(drop),
            session.move_entry(first, MoveDirection::Next).map(drop),
            session.remove(first).map(drop),
            session.clear(),
            session.begin_merge().map(drop),
        ]
    });

    assert!(
        rejected
            .iter()
            .all(|result| matches!(result, Err(StitchError::MergeInProgress)))
    );
    let names: Vec<_> = session.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);

    let merged = session.finish_merge(finished).unwrap();
    assert_eq!(page_markers(merged.bytes()).len(), 3);
    assert!(!session.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_pacing_delays_between_entries() {
    let mut session = session_with(vec![
        marked_file("a.pdf", "a", 1),
        marked_file("b.pdf", "b", 1),
        marked_file("c.pdf", "c", 1),
    ]);
    let merger = Merger::new().with_options(MergeOptions {
        pacing: Some(Duration::from_millis(300)),
    });

    let start = tokio::time::Instant::now();
    session.merge(&merger, |_| {}).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(900));
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_merge_can_be_aborted_and_redone() {
    let mut session = session_with(vec![
        marked_file("a.pdf", "a", 1),
        marked_file("b.pdf", "b", 2),
    ]);
    let slow = Merger::new().with_options(MergeOptions {
        pacing: Some(Duration::from_secs(5)),
    });

    let job = session.begin_merge().unwrap();
    tokio::select! {
        _ = job.run(&slow, |_| {}) => panic!("merge should still be pacing"),
        _ = tokio::time::sleep(Duration::from_millis(50)) => {}
    }

    assert!(matches!(session.clear(), Err(StitchError::MergeInProgress)));
    assert!(session.abort_merge());
    assert!(matches!(session.state(), MergeState::Failed { .. }));

    session.add(vec![marked_file("c.pdf", "c", 1)]).unwrap();
    let merged = session.merge(&Merger::new(), |_| {}).await.unwrap();

    let mut expected = expected_markers("a", 1);
    expected.extend(expected_markers("b", 2));
    expected.extend(expected_markers("c", 1));
    assert_eq!(page_markers(merged.bytes()), expected);
}

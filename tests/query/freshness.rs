//! Stale and obsolete indexes are rebuilt through the host before use.

use std::fs;

use biblook::error::QueryError;
use biblook::query::open_index;
use tempfile::TempDir;

use crate::common::{
    engine, hits, options, touch_forward, write_and_index, RecordingHost, SAMPLE_BIB, SECOND_BIB,
};

#[test]
fn test_edited_source_is_reindexed_on_open() {
    let dir = TempDir::new().unwrap();
    write_and_index(dir.path(), "refs", SAMPLE_BIB);

    let source = dir.path().join("refs.bib");
    fs::write(&source, SECOND_BIB).unwrap();
    touch_forward(&source, 120);

    let host = RecordingHost::new();
    let mut engine = engine(dir.path(), &["refs"], &host);

    assert_eq!(host.call_count(), 1);
    assert_eq!(hits(&mut engine, "permutation"), [(0, 1)]);
}

#[test]
fn test_rebuild_call_names_the_source() {
    let dir = TempDir::new().unwrap();
    write_and_index(dir.path(), "refs", SAMPLE_BIB);
    let source = dir.path().join("refs.bib");
    touch_forward(&source, 120);

    let host = RecordingHost::new();
    open_index("refs", &options(dir.path(), true), &host).unwrap();

    let call = host.last_call().unwrap();
    assert_eq!(call.len(), 7);
    assert_eq!(
        fs::canonicalize(&call[6]).unwrap(),
        fs::canonicalize(&source).unwrap()
    );
}

#[test]
fn test_stale_index_skipped_when_updates_are_off() {
    let dir = TempDir::new().unwrap();
    write_and_index(dir.path(), "refs", SAMPLE_BIB);
    touch_forward(&dir.path().join("refs.bib"), 120);

    let host = RecordingHost::new();
    let err = open_index("refs", &options(dir.path(), false), &host).unwrap_err();

    match &err {
        QueryError::Ignored { reason, .. } => assert!(reason.contains("out of date")),
        other => panic!("expected ignored, got {other:?}"),
    }
    assert_eq!(host.call_count(), 0);
}

#[test]
fn test_other_indexes_survive_a_skipped_one() {
    let dir = TempDir::new().unwrap();
    write_and_index(dir.path(), "good", SAMPLE_BIB);
    write_and_index(dir.path(), "stale", SECOND_BIB);
    touch_forward(&dir.path().join("stale.bib"), 120);

    let host = RecordingHost::failing();
    let opts = options(dir.path(), true);
    let opened: Vec<_> = ["good", "stale"]
        .iter()
        .filter_map(|name| open_index(name, &opts, &host).ok())
        .collect();

    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].record_count(), 2);
}

#[test]
fn test_obsolete_index_reports_version() {
    let dir = TempDir::new().unwrap();
    let bix = write_and_index(dir.path(), "refs", SAMPLE_BIB);
    let mut bytes = fs::read(&bix).unwrap();
    bytes[9] = b'3';
    fs::write(&bix, &bytes).unwrap();

    let err = open_index("refs", &options(dir.path(), false), &RecordingHost::new()).unwrap_err();
    match &err {
        QueryError::Ignored { reason, .. } => assert!(reason.contains("obsolete")),
        other => panic!("expected ignored, got {other:?}"),
    }
}

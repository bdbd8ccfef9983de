//! Boolean evaluation over real index files.

use biblook::query::{parse_query, unmatched_report, QueryOutcome};
use tempfile::TempDir;

use crate::common::{engine, hits, write_and_index, RecordingHost, SAMPLE_BIB, SECOND_BIB};

fn two_index_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_and_index(dir.path(), "sample", SAMPLE_BIB);
    write_and_index(dir.path(), "second", SECOND_BIB);
    dir
}

#[test]
fn test_single_word_matches_both_records() {
    let dir = two_index_dir();
    let mut engine = engine(dir.path(), &["sample"], &RecordingHost::new());
    assert_eq!(hits(&mut engine, "searching"), [(0, 0), (0, 1)]);
}

#[test]
fn test_words_are_intersected() {
    let dir = two_index_dir();
    let mut engine = engine(dir.path(), &["sample"], &RecordingHost::new());
    assert_eq!(hits(&mut engine, "algorithms searching"), [(0, 0)]);
    assert_eq!(hits(&mut engine, "graph methods"), [(0, 1)]);
}

#[test]
fn test_fields_are_unioned() {
    let dir = two_index_dir();
    let mut engine = engine(dir.path(), &["sample"], &RecordingHost::new());
    // "knuth" is an author, "searching" a title word.
    assert_eq!(hits(&mut engine, "knuth searching"), [(0, 0)]);
    assert_eq!(hits(&mut engine, "1972 tarjan"), [(0, 1)]);
}

#[test]
fn test_case_and_punctuation_in_queries() {
    let dir = two_index_dir();
    let mut engine = engine(dir.path(), &["sample"], &RecordingHost::new());
    assert_eq!(hits(&mut engine, "GRAPH, Methods."), [(0, 1)]);
}

#[test]
fn test_unmatched_word_is_reported_in_query_order() {
    let dir = two_index_dir();
    let mut engine = engine(dir.path(), &["sample"], &RecordingHost::new());

    let outcome = engine.evaluate(&parse_query("zebra graph nomatchword", false));
    let QueryOutcome::Unmatched(words) = outcome else {
        panic!("expected unmatched words, got {outcome:?}");
    };
    assert_eq!(words, ["zebra", "nomatchword"]);
    assert_eq!(
        unmatched_report(&words),
        "No references found containing:  zebra, nomatchword."
    );
}

#[test]
fn test_exact_word_needs_whole_match_but_prefix_does_not() {
    let dir = two_index_dir();
    let mut engine = engine(dir.path(), &["sample"], &RecordingHost::new());

    let outcome = engine.evaluate(&parse_query("search", false));
    assert_eq!(outcome, QueryOutcome::Unmatched(vec!["search".into()]));

    assert_eq!(hits(&mut engine, "search*"), [(0, 0), (0, 1)]);
    match engine.evaluate(&parse_query("search algo", true)) {
        QueryOutcome::Matches(groups) => assert_eq!(groups[0].records, [0]),
        other => panic!("expected matches, got {other:?}"),
    }
}

#[test]
fn test_stop_words_and_single_letters_never_narrow() {
    let dir = two_index_dir();
    let mut engine = engine(dir.path(), &["sample"], &RecordingHost::new());
    assert_eq!(hits(&mut engine, "the graph of a"), [(0, 1)]);
    assert_eq!(hits(&mut engine, "with"), [(0, 0), (0, 1)]);
}

#[test]
fn test_results_are_grouped_per_index() {
    let dir = two_index_dir();
    let mut engine = engine(dir.path(), &["sample", "second"], &RecordingHost::new());

    assert_eq!(hits(&mut engine, "algorithms"), [(0, 0), (1, 0)]);
    // "searching" appears in the second file's abstract.
    assert_eq!(hits(&mut engine, "searching"), [(0, 0), (0, 1), (1, 0)]);
    assert_eq!(hits(&mut engine, "acm"), [(1, 0), (1, 1)]);
    assert_eq!(hits(&mut engine, "machinery surveys"), [(1, 1)]);
}

#[test]
fn test_words_matched_in_different_indexes_give_no_records() {
    let dir = two_index_dir();
    let mut engine = engine(dir.path(), &["sample", "second"], &RecordingHost::new());

    let outcome = engine.evaluate(&parse_query("tarjan permutation", false));
    assert_eq!(outcome, QueryOutcome::Matches(Vec::new()));
    assert_eq!(outcome.record_count(), 0);
}

#[test]
fn test_queries_do_not_leak_state() {
    let dir = two_index_dir();
    let mut engine = engine(dir.path(), &["sample", "second"], &RecordingHost::new());

    assert_eq!(hits(&mut engine, "graph"), [(0, 1)]);
    let _ = engine.evaluate(&parse_query("nomatchword", false));
    assert_eq!(hits(&mut engine, "algorithms"), [(0, 0), (1, 0)]);
}

//! Printing matched records from their sources.

use std::fs;

use biblook::query::{parse_query, write_matches, QueryOutcome};
use tempfile::TempDir;

use crate::common::{engine, write_and_index, RecordingHost, SAMPLE_BIB, SAMPLE_RECORD_0, SECOND_BIB};

fn printed(engine: &mut biblook::QueryEngine, query: &str) -> String {
    let QueryOutcome::Matches(groups) = engine.evaluate(&parse_query(query, false)) else {
        panic!("{query:?} matched nothing");
    };
    let mut out = Vec::new();
    write_matches(engine.indexes(), &groups, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_record_printed_verbatim_with_source_path() {
    let dir = TempDir::new().unwrap();
    write_and_index(dir.path(), "sample", SAMPLE_BIB);
    let mut engine = engine(dir.path(), &["sample"], &RecordingHost::new());

    let source = fs::canonicalize(dir.path().join("sample.bib")).unwrap();
    let expected = format!("\n{}\n{SAMPLE_RECORD_0}\n", source.display());
    assert_eq!(printed(&mut engine, "brace"), expected);
}

#[test]
fn test_records_print_in_index_then_record_order() {
    let dir = TempDir::new().unwrap();
    write_and_index(dir.path(), "sample", SAMPLE_BIB);
    write_and_index(dir.path(), "second", SECOND_BIB);
    let mut engine = engine(dir.path(), &["sample", "second"], &RecordingHost::new());

    let text = printed(&mut engine, "searching");
    let knuth = text.find("@article{knuth73").unwrap();
    let tarjan = text.find("@inproceedings{tarjan72").unwrap();
    let aho = text.find("@book{aho74").unwrap();
    assert!(knuth < tarjan && tarjan < aho);

    // The macro definition is never printed as a record.
    assert!(!text.contains("@string"));
    assert_eq!(text.matches("sample.bib\n").count(), 2);
    assert_eq!(text.matches("second.bib\n").count(), 1);
}

#[test]
fn test_retrieval_stops_at_the_closing_bracket() {
    let dir = TempDir::new().unwrap();
    let text = "@misc(paren, title = {Parenthesised (really)}, note = \"a ) b\")\ntrailing junk\n";
    write_and_index(dir.path(), "paren", text);
    let mut engine = engine(dir.path(), &["paren"], &RecordingHost::new());

    let out = printed(&mut engine, "parenthesised");
    assert!(out.ends_with("note = \"a ) b\")\n"), "got {out:?}");
    assert!(!out.contains("trailing"));
}

#[test]
fn test_source_replaced_after_loading_is_fatal() {
    let dir = TempDir::new().unwrap();
    write_and_index(dir.path(), "sample", SAMPLE_BIB);
    let mut engine = engine(dir.path(), &["sample"], &RecordingHost::new());
    let QueryOutcome::Matches(groups) = engine.evaluate(&parse_query("graph", false)) else {
        panic!("graph should match");
    };

    fs::write(dir.path().join("sample.bib"), "short").unwrap();
    let err = write_matches(engine.indexes(), &groups, &mut Vec::new()).unwrap_err();
    assert!(err.is_session_fatal());
}

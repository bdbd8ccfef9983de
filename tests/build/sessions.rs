//! Build sessions over in-memory text.

use std::path::Path;

use biblook::build::BuildSession;
use biblook::error::BuildError;
use biblook::testing::index_of;

use crate::common::{SAMPLE_BIB, SECOND_BIB};

fn postings(index: &biblook::IndexFile, field: &str, word: &str) -> Vec<u32> {
    index
        .field(field)
        .and_then(|f| f.find(word))
        .map(|e| e.postings().to_vec())
        .unwrap_or_default()
}

#[test]
fn test_sample_records_and_fields() {
    let index = index_of(SAMPLE_BIB);

    assert_eq!(index.record_count(), 2);
    let names: Vec<&str> = index.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["author", "note", "title", "year"]);

    assert_eq!(postings(&index, "title", "searching"), [0, 1]);
    assert_eq!(postings(&index, "title", "graph"), [1]);
    assert_eq!(postings(&index, "author", "knuth"), [0]);
    assert_eq!(postings(&index, "year", "1972"), [1]);
}

#[test]
fn test_offsets_point_at_at_signs() {
    let index = index_of(SAMPLE_BIB);
    for &offset in &index.offsets {
        assert_eq!(SAMPLE_BIB.as_bytes()[offset as usize], b'@');
    }
}

#[test]
fn test_single_letters_are_not_indexed() {
    let index = index_of(SAMPLE_BIB);
    // "Donald E. Knuth"
    assert!(index.field("author").unwrap().find("e").is_none());
    assert!(index.field("author").unwrap().find("donald").is_some());
}

#[test]
fn test_string_definitions_are_not_numbered() {
    let index = index_of(SECOND_BIB);

    assert_eq!(index.record_count(), 2);
    assert_eq!(postings(&index, "publisher", "acm"), [0]);
    assert_eq!(postings(&index, "publisher", "machinery"), [0]);
    assert_eq!(postings(&index, "howpublished", "surveys"), [1]);
    assert_eq!(postings(&index, "howpublished", "association"), [1]);
}

#[test]
fn test_repeated_word_posts_record_once() {
    let index = index_of("@misc{k, title = {search search search}, note = {search}}");
    assert_eq!(postings(&index, "title", "search"), [0]);
    assert_eq!(postings(&index, "note", "search"), [0]);
    assert_eq!(index.posting_count(), 2);
}

#[test]
fn test_ignored_fields_are_absent() {
    let mut session =
        BuildSession::new(Path::new("second.bib"), &["Abstract".to_string()]).unwrap();
    session.index_source(SECOND_BIB.as_bytes()).unwrap();
    let (index, stats) = session.finish(0).unwrap();

    assert!(index.field("abstract").is_none());
    assert!(index.field("title").is_some());
    assert_eq!(stats.fields, index.fields.len());
}

#[test]
fn test_oversized_words_are_skipped_and_counted() {
    let long = "x".repeat(100);
    let text = format!("@misc{{k, title = {{short {long} words}}}}");
    let mut session = BuildSession::new(Path::new("long.bib"), &[]).unwrap();
    session.index_source(text.as_bytes()).unwrap();
    let (index, stats) = session.finish(0).unwrap();

    assert_eq!(stats.skipped_words, 1);
    let title = index.field("title").unwrap();
    assert!(title.find("short").is_some());
    assert!(title.find(&long).is_none());

    // One byte shorter is kept.
    let kept = "y".repeat(99);
    let index = index_of(&format!("@misc{{k, title = {{{kept}}}}}"));
    assert!(index.field("title").unwrap().find(&kept).is_some());
}

#[test]
fn test_many_words_force_table_growth() {
    let words: Vec<String> = (0..1000).map(|i| format!("w{i}")).collect();
    let text = format!("@misc{{k, keywords = {{{}}}}}", words.join(" "));
    let mut session = BuildSession::new(Path::new("many.bib"), &[]).unwrap();
    session.index_source(text.as_bytes()).unwrap();
    let (index, stats) = session.finish(0).unwrap();

    assert!(stats.growths > 0);
    assert_eq!(index.word_count(), 1000);
    let keywords = index.field("keywords").unwrap();
    assert!(keywords.words.windows(2).all(|w| w[0].word() < w[1].word()));
}

#[test]
fn test_parse_error_names_the_file() {
    let mut session = BuildSession::new(Path::new("broken.bib"), &[]).unwrap();
    let err = session
        .index_source(b"@misc{k, title = {unclosed}\n")
        .unwrap_err();

    match &err {
        BuildError::Parse { path, source } => {
            assert_eq!(path, Path::new("broken.bib"));
            assert_eq!(source.record_line, 1);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("broken.bib: in record starting at line 1"));
}

#[test]
fn test_too_many_fields() {
    let fields: Vec<String> = (0..65).map(|i| format!("f{i} = {{word}}")).collect();
    let text = format!("@misc{{k, {}}}", fields.join(", "));
    let mut session = BuildSession::new(Path::new("wide.bib"), &[]).unwrap();

    let err = session.index_source(text.as_bytes()).unwrap_err();
    assert!(matches!(err, BuildError::Table { .. }), "got {err:?}");
}

//! Publishing indexes to disk and multi-file runs.

use std::fs;

use biblook::build::{build_index, run_build, BuildOptions};
use biblook::error::BuildError;
use biblook::IndexFile;
use tempfile::TempDir;

use crate::common::{SAMPLE_BIB, SECOND_BIB};

#[test]
fn test_index_lands_next_to_source() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("refs.bib");
    fs::write(&source, SAMPLE_BIB).unwrap();

    let summary = build_index(&source, &BuildOptions::default()).unwrap();

    assert_eq!(summary.index.file_name().unwrap(), "refs.bix");
    assert!(summary.index.exists());
    assert!(!dir.path().join("refs.tbx").exists(), "staging file left behind");
    assert_eq!(summary.stats.records, 2);
}

#[test]
fn test_header_records_source_and_mtime() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("refs.bib");
    fs::write(&source, SAMPLE_BIB).unwrap();

    let summary = build_index(&source, &BuildOptions::default()).unwrap();
    let index = IndexFile::load(&summary.index).unwrap();

    let canonical = fs::canonicalize(&source).unwrap();
    assert_eq!(index.header.source, canonical.to_str().unwrap());
    assert_eq!(index.mtime, biblook::host::modified_secs(&source).unwrap());

    let bytes = fs::read(&summary.index).unwrap();
    let first_line = bytes.split(|&b| b == b'\n').next().unwrap();
    let expected = format!(
        "bibindex 4 1 0 {} {}",
        canonical.to_str().unwrap().len(),
        canonical.display()
    );
    assert_eq!(first_line, expected.as_bytes());
}

#[test]
fn test_index_dir_is_honored() {
    let src_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let source = src_dir.path().join("refs.bib");
    fs::write(&source, SAMPLE_BIB).unwrap();

    let options = BuildOptions {
        index_dir: Some(out_dir.path().to_path_buf()),
        ..BuildOptions::default()
    };
    let summary = build_index(&source, &options).unwrap();

    assert_eq!(summary.index, out_dir.path().join("refs.bix"));
    assert!(!src_dir.path().join("refs.bix").exists());
}

#[test]
fn test_rebuild_replaces_existing_index() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("refs.bib");
    fs::write(&source, SAMPLE_BIB).unwrap();
    build_index(&source, &BuildOptions::default()).unwrap();

    fs::write(&source, SECOND_BIB).unwrap();
    let summary = build_index(&source, &BuildOptions::default()).unwrap();

    let index = IndexFile::load(&summary.index).unwrap();
    assert!(index.field("publisher").is_some());
    assert!(index.field("note").is_none());
}

#[test]
fn test_parse_failure_publishes_nothing() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("bad.bib");
    fs::write(&source, "@misc{k, title = {open").unwrap();

    let err = build_index(&source, &BuildOptions::default()).unwrap_err();

    assert!(matches!(err, BuildError::Parse { .. }));
    assert!(!dir.path().join("bad.bix").exists());
    assert!(!dir.path().join("bad.tbx").exists());
}

#[test]
fn test_missing_source() {
    let dir = TempDir::new().unwrap();
    let err = build_index(&dir.path().join("absent.bib"), &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, BuildError::NotFound(_)));
}

#[test]
fn test_run_build_indexes_every_source_in_search_dirs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.bib"), SAMPLE_BIB).unwrap();
    fs::write(dir.path().join("b.bib"), SECOND_BIB).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a bibliography").unwrap();

    let options = BuildOptions {
        search_dirs: vec![dir.path().to_path_buf()],
        ..BuildOptions::default()
    };
    let report = run_build(&[], &options);

    assert!(report.is_success());
    assert_eq!(report.built.len(), 2);
    assert!(dir.path().join("a.bix").exists());
    assert!(dir.path().join("b.bix").exists());
}

#[test]
fn test_run_build_continues_past_failures() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("good.bib"), SAMPLE_BIB).unwrap();
    fs::write(dir.path().join("bad.bib"), "@misc{k, title = {x}; year = 1}").unwrap();

    let options = BuildOptions {
        search_dirs: vec![dir.path().to_path_buf()],
        ..BuildOptions::default()
    };
    let names = ["bad".to_string(), "missing".to_string(), "good".to_string()];
    let report = run_build(&names, &options);

    assert!(!report.is_success());
    assert_eq!(report.failed, 2);
    assert_eq!(report.built.len(), 1);
    assert!(dir.path().join("good.bix").exists());
}

#[test]
fn test_dotted_sources_get_their_own_indexes() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("refs.v1.bib"), SAMPLE_BIB).unwrap();
    fs::write(dir.path().join("refs.v2.bib"), SECOND_BIB).unwrap();

    let options = BuildOptions {
        search_dirs: vec![dir.path().to_path_buf()],
        ..BuildOptions::default()
    };
    let report = run_build(&[], &options);
    assert!(report.is_success());

    let v1 = IndexFile::load(&dir.path().join("refs.v1.bix")).unwrap();
    let v2 = IndexFile::load(&dir.path().join("refs.v2.bix")).unwrap();
    assert!(v1.header.source.ends_with("refs.v1.bib"));
    assert!(v2.header.source.ends_with("refs.v2.bib"));
    assert!(!dir.path().join("refs.bix").exists());
}

#[test]
fn test_accented_field_name_still_loads() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("accents.bib");
    fs::write(&source, "@misc{k, t\u{ef}tle = {graph}, note = {search}}\n").unwrap();

    let summary = build_index(&source, &BuildOptions::default()).unwrap();
    assert_eq!(summary.stats.skipped_fields, 1);

    let index = IndexFile::load(&summary.index).unwrap();
    assert_eq!(index.record_count(), 1);
    assert!(index.field("note").is_some());
}

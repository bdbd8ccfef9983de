//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use biblook::query::{open_index, parse_query, LoadedIndex, OpenOptions, QueryEngine, QueryOutcome};
use biblook::Host;
use tempfile::TempDir;

// Re-export canonical test utilities from biblook::testing
pub use biblook::testing::{write_and_index, RecordingHost, SAMPLE_BIB, SAMPLE_RECORD_0};

/// A second bibliography, with a macro and a field worth ignoring.
pub const SECOND_BIB: &str = r#"@string{acm = "Association for Computing Machinery"}

@book{aho74,
  title = {The Design and Analysis of Computer Algorithms},
  publisher = acm,
  abstract = {Sorting and searching, treated at length.},
  year = 1974
}

@misc{sedgewick,
  title = "Permutation Generation Methods",
  howpublished = acm # " Computing Surveys"
}
"#;

/// A temp directory holding `sample.bib` and its index.
pub fn sample_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_and_index(dir.path(), "sample", SAMPLE_BIB);
    dir
}

/// Options that search only `dir` and never rebuild.
pub fn options(dir: &Path, update: bool) -> OpenOptions {
    OpenOptions {
        search_dirs: vec![dir.to_path_buf()],
        update,
        indexer: PathBuf::from("biblook"),
    }
}

/// Open every named index in `dir`, panicking on failure.
pub fn engine(dir: &Path, names: &[&str], host: &dyn Host) -> QueryEngine {
    let opts = options(dir, true);
    let loaded: Vec<LoadedIndex> = names
        .iter()
        .map(|name| open_index(name, &opts, host).unwrap())
        .collect();
    QueryEngine::new(loaded)
}

/// `(index position, record)` pairs matched by `query`; panics if any word
/// was unmatched.
pub fn hits(engine: &mut QueryEngine, query: &str) -> Vec<(usize, u32)> {
    match engine.evaluate(&parse_query(query, false)) {
        QueryOutcome::Matches(groups) => groups
            .into_iter()
            .flat_map(|g| g.records.into_iter().map(move |r| (g.index, r)))
            .collect(),
        QueryOutcome::Unmatched(words) => panic!("{query:?} left {words:?} unmatched"),
    }
}

/// Push a file's modification time `secs` seconds into the future.
pub fn touch_forward(path: &Path, secs: u64) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    let now = fs::metadata(path).unwrap().modified().unwrap();
    file.set_modified(now + std::time::Duration::from_secs(secs))
        .unwrap();
}

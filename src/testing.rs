//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical fixtures and a scripted [`Host`] so tests don't
//! each invent their own.

#![doc(hidden)]

use std::cell::RefCell;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

use crate::binary::{IndexFile, IndexHeader};
use crate::build::{self, BuildOptions, BuildSession};
use crate::host::{modified_secs, Host};

/// Two records used throughout the tests. Record 0 carries a closing brace
/// inside a quoted value.
pub const SAMPLE_BIB: &str = r#"% Sample bibliography

@article{knuth73,
  title = {Algorithms for Searching},
  author = "Donald E. Knuth",
  note = "closing } brace",
  year = 1973
}

@inproceedings{tarjan72,
  title = "Graph {Searching} Methods",
  author = {Robert Tarjan},
  year = {1972}
}
"#;

/// Record 0 of [`SAMPLE_BIB`] exactly as it appears in the source.
pub const SAMPLE_RECORD_0: &str = r#"@article{knuth73,
  title = {Algorithms for Searching},
  author = "Donald E. Knuth",
  note = "closing } brace",
  year = 1973
}"#;

/// Build an in-memory index over `text` without touching the filesystem.
pub fn index_of(text: &str) -> IndexFile {
    let mut session = BuildSession::new(Path::new("test.bib"), &[]).expect("session");
    session.index_source(text.as_bytes()).expect("parse");
    session.finish(0).expect("finish").0
}

/// Build an index with a made-up header path (for encode/decode tests).
pub fn index_with_source(text: &str, source: &str) -> IndexFile {
    let mut index = index_of(text);
    index.header = IndexHeader::new(Path::new(source)).expect("header");
    index
}

/// Write `text` to `<dir>/<name>.bib` and index it next to the source.
pub fn write_and_index(dir: &Path, name: &str, text: &str) -> PathBuf {
    let source = dir.join(format!("{name}.bib"));
    std::fs::write(&source, text).expect("write source");
    build::build_index(&source, &BuildOptions::default())
        .expect("build")
        .index
}

/// A [`Host`] that rebuilds indexes in-process and records every call.
///
/// `run` understands the `index -w DIR -p LEVEL SOURCE` invocation used for
/// rebuilds; anything else (a pager) is recorded and reported as success.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: RefCell<Vec<Vec<OsString>>>,
    /// Make every `run` report failure.
    pub fail_runs: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_runs: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Arguments of the most recent call, program first.
    pub fn last_call(&self) -> Option<Vec<OsString>> {
        self.calls.borrow().last().cloned()
    }
}

impl Host for RecordingHost {
    fn run(&self, program: &OsStr, args: &[OsString]) -> io::Result<bool> {
        let mut call = vec![program.to_os_string()];
        call.extend(args.iter().cloned());
        self.calls.borrow_mut().push(call);

        if self.fail_runs {
            return Ok(false);
        }

        let args: Vec<&str> = args.iter().filter_map(|a| a.to_str()).collect();
        if let ["index", "-w", dir, "-p", _, source] = args.as_slice() {
            let options = BuildOptions {
                index_dir: Some(PathBuf::from(dir)),
                ..BuildOptions::default()
            };
            return Ok(build::build_index(Path::new(source), &options).is_ok());
        }
        Ok(true)
    }

    fn modified(&self, path: &Path) -> io::Result<i64> {
        modified_secs(path)
    }
}

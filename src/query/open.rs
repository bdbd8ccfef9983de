// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Opening indexes for a query session.
//!
//! An index is usable only if it was written by this version and its stored
//! modification time equals the source's current one. Otherwise it is stale:
//! with updates enabled the indexer is run on the source and the fresh index
//! is read instead, and with updates disabled the index is skipped.
//!
//! A missing index, a missing source, or a failed rebuild only skips that one
//! index. A damaged index is different: it is reported as session-fatal.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::set::QuerySets;
use crate::binary::IndexFile;
use crate::build::{resolve, INDEX_EXT};
use crate::error::{IndexError, QueryError};
use crate::host::Host;

/// How indexes are found and kept current.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// Directories searched for index files named without a directory.
    pub search_dirs: Vec<PathBuf>,
    /// Rebuild stale indexes instead of skipping them.
    pub update: bool,
    /// Program run to rebuild an index.
    pub indexer: PathBuf,
}

/// Why an index needs rebuilding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// Written by another version.
    Obsolete,
    /// The source changed since the index was built.
    OutOfDate,
}

impl Staleness {
    fn describe(self) -> &'static str {
        match self {
            Staleness::Obsolete => "obsolete",
            Staleness::OutOfDate => "out of date",
        }
    }
}

/// A loaded index with its query state.
#[derive(Debug)]
pub struct LoadedIndex {
    /// Where the index was read from.
    pub path: PathBuf,
    pub index: IndexFile,
    pub(crate) sets: QuerySets,
}

impl LoadedIndex {
    pub fn new(path: PathBuf, index: IndexFile) -> Self {
        let sets = QuerySets::new(index.record_count() as u32);
        Self { path, index, sets }
    }

    /// The source file the index describes.
    pub fn source(&self) -> &Path {
        Path::new(&self.index.header.source)
    }

    pub fn record_count(&self) -> usize {
        self.index.record_count()
    }
}

/// Locate, validate, and if needed rebuild the index called `name`.
pub fn open_index(
    name: &str,
    options: &OpenOptions,
    host: &dyn Host,
) -> Result<LoadedIndex, QueryError> {
    let path = resolve(name, &options.search_dirs, INDEX_EXT)
        .ok_or_else(|| QueryError::NotFound(PathBuf::from(name)))?;

    match check(&path, host)? {
        Ok(index) => Ok(LoadedIndex::new(path, index)),
        Err((staleness, source)) => {
            if !options.update {
                return Err(QueryError::Ignored {
                    path,
                    reason: format!("index is {}", staleness.describe()),
                });
            }
            tracing::info!("{}: index {}, rebuilding", path.display(), staleness.describe());
            rebuild(&path, &source, options, host)?;
            match check(&path, host)? {
                Ok(index) => Ok(LoadedIndex::new(path, index)),
                Err((staleness, _)) => Err(QueryError::Ignored {
                    path,
                    reason: format!("index still {} after rebuild", staleness.describe()),
                }),
            }
        }
    }
}

/// Read the index at `path`. The inner result is `Err` when the index is
/// well-formed but stale, carrying the source path to rebuild from.
fn check(
    path: &Path,
    host: &dyn Host,
) -> Result<Result<IndexFile, (Staleness, PathBuf)>, QueryError> {
    let bytes = fs::read(path)?;

    let index = match IndexFile::from_bytes(&bytes) {
        Ok(index) => index,
        Err(IndexError::VersionMismatch { .. }) => {
            let header = IndexFile::read_header(&bytes).map_err(|source| corrupt(path, source))?;
            return Ok(Err((Staleness::Obsolete, PathBuf::from(header.source))));
        }
        Err(IndexError::Io(err)) => return Err(QueryError::Io(err)),
        Err(source) => return Err(corrupt(path, source)),
    };

    let source = PathBuf::from(&index.header.source);
    let live = match host.modified(&source) {
        Ok(live) => live,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(QueryError::Ignored {
                path: path.to_path_buf(),
                reason: format!("can't find bibliography file {}", source.display()),
            });
        }
        Err(err) => return Err(QueryError::Io(err)),
    };

    if live != index.mtime {
        return Ok(Err((Staleness::OutOfDate, source)));
    }
    Ok(Ok(index))
}

fn corrupt(path: &Path, source: IndexError) -> QueryError {
    QueryError::Corrupt {
        path: path.to_path_buf(),
        source,
    }
}

/// The indexer arguments that rebuild `source` into `index_dir`.
pub fn rebuild_args(index_dir: &Path, source: &Path) -> Vec<OsString> {
    vec![
        "index".into(),
        "-w".into(),
        index_dir.as_os_str().to_os_string(),
        "-p".into(),
        "0".into(),
        source.as_os_str().to_os_string(),
    ]
}

fn rebuild(
    index: &Path,
    source: &Path,
    options: &OpenOptions,
    host: &dyn Host,
) -> Result<(), QueryError> {
    let dir = index
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let args = rebuild_args(dir, source);

    let failed = |reason: String| QueryError::Ignored {
        path: index.to_path_buf(),
        reason,
    };
    match host.run(options.indexer.as_os_str(), &args) {
        Ok(true) => Ok(()),
        Ok(false) => Err(failed("couldn't rebuild index".into())),
        Err(err) => Err(failed(format!(
            "couldn't run {}: {err}",
            options.indexer.display()
        ))),
    }
}

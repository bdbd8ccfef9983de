// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for building and querying indexes.
//!
//! Build errors are file-scoped: the caller reports them and moves on to the
//! next source file. Query errors split in two. Failing to open one index
//! skips that index; a corrupt index or a failed retrieval poisons the whole
//! query session, because the loaded state can no longer be trusted.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::binary::Version;

/// Why the record parser gave up on a source file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected end of input {0}")]
    UnexpectedEof(&'static str),

    #[error("word too long")]
    WordTooLong,

    #[error("character '{found}' not in word ending characters \"{expected}\"")]
    UnexpectedTerminator { found: char, expected: &'static str },

    #[error("bad string separator '{0}'")]
    BadSeparator(char),

    #[error("missing field name")]
    MissingFieldName,

    #[error("missing reference key")]
    MissingKey,
}

/// A fatal parse error, located by the line where the enclosing record
/// started and the line where the problem was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("in record starting at line {record_line}, error detected at line {line}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub record_line: usize,
    pub line: usize,
}

/// Resource exhaustion in the build-time hash tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("too many field names (limit {limit}): {name}")]
    TooManyFields { name: String, limit: usize },

    #[error("out of hash-table slots for {0}")]
    ProbeExhausted(String),
}

/// Problems reading or writing a binary index file.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("index file is corrupt: {0}")]
    Corrupt(String),

    #[error("unexpected end of index data while reading {0}")]
    Truncated(&'static str),

    #[error("index word too long ({0} bytes)")]
    WordTooLong(usize),

    #[error("index version {found} does not match {expected}")]
    VersionMismatch { found: Version, expected: Version },

    #[error("too many fields ({0})")]
    TooManyFields(usize),

    #[error("non-ASCII text can't be stored in an index: {0}")]
    NonAscii(String),

    #[error("source path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
}

impl IndexError {
    /// Whether the data itself is damaged. I/O failures, files written by
    /// another version, and text refused by the writer are not corruption.
    pub fn is_corruption(&self) -> bool {
        !matches!(
            self,
            IndexError::Io(_)
                | IndexError::NonUtf8Path(_)
                | IndexError::NonAscii(_)
                | IndexError::VersionMismatch { .. }
        )
    }
}

/// A failed build of one source file.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("can't find {0}")]
    NotFound(PathBuf),

    #[error("can't read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("{path}: {source}")]
    Parse { path: PathBuf, source: ParseError },

    #[error("{path}: {source}")]
    Table { path: PathBuf, source: TableError },

    #[error("can't write index {path}: {source}")]
    Write { path: PathBuf, source: IndexError },
}

/// Errors raised while opening indexes or answering queries.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("can't find index file {0}")]
    NotFound(PathBuf),

    #[error("\"{path}\" ignored: {reason}")]
    Ignored { path: PathBuf, reason: String },

    #[error("{path}: {source}")]
    Corrupt { path: PathBuf, source: IndexError },

    #[error("can't retrieve record {record} from {path}: {reason}")]
    Retrieve {
        path: PathBuf,
        record: u32,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl QueryError {
    /// True when the error leaves loaded state unusable and the whole query
    /// session must stop.
    pub fn is_session_fatal(&self) -> bool {
        matches!(
            self,
            QueryError::Corrupt { .. } | QueryError::Retrieve { .. } | QueryError::Io(_)
        )
    }
}

/// Problems loading the per-user configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("can't read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

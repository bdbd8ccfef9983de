// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format for bibliography indexes.
//!
//! One index file covers one source file. It stores where each record starts
//! in the source, and for every field the sorted list of words with the
//! records they occur in. Loading reads the whole file into memory. Nothing
//! is hashed at load time: field and word lists are written sorted, and
//! lookups binary-search them, so the loader checks that sortedness instead
//! of trusting it.
//!
//! # Security Considerations
//!
//! Index files are read back from disk and may be damaged:
//! - Every count is checked against the bytes that remain before allocating
//! - Strings are capped at [`MAX_WORD`] bytes and must be ASCII
//! - Postings must be ascending and name existing records
//! - Trailing bytes after the last field are rejected
//!
//! # Format Overview (v4)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (text line)                                         │
//! │   "bibindex <format> <major> <minor> <len> <path>\n"       │
//! ├────────────────────────────────────────────────────────────┤
//! │ mtime: i64            source modification time (seconds)   │
//! │ record_count: u32                                          │
//! │ offsets: [u64; record_count]                               │
//! ├────────────────────────────────────────────────────────────┤
//! │ field_count: u8                                            │
//! │ names: [u8 len + bytes; field_count]     sorted            │
//! ├────────────────────────────────────────────────────────────┤
//! │ per field, in name order:                                  │
//! │   word_count: u32                                          │
//! │   per word, sorted:                                        │
//! │     u8 len + bytes, posting_count: u32, [u32; count]       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian.

mod encoding;
mod header;

pub use encoding::ByteReader;
pub use header::{
    IndexHeader, Version, FORMAT_VERSION, MAGIC, MAJOR_VERSION, MAX_FIELDS, MAX_PATH_LEN,
    MAX_WORD, MINOR_VERSION,
};

use std::fs;
use std::path::Path;

use encoding::{put_count, put_i64, put_str, put_u32, put_u64, put_u8};

use crate::error::IndexError;
use crate::tables::{FieldIndex, WordEntry};

/// Smallest encoded word: length byte plus posting count.
const MIN_WORD_BYTES: usize = 1 + 4;

/// Smallest encoded field body: its word count.
const MIN_FIELD_BYTES: usize = 4;

/// A complete index, either freshly built or loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFile {
    pub header: IndexHeader,
    /// Source modification time when the index was built (Unix seconds).
    pub mtime: i64,
    /// Byte offset of each record in the source, by record number.
    pub offsets: Vec<u64>,
    /// Non-empty fields sorted by name.
    pub fields: Vec<FieldIndex>,
}

impl IndexFile {
    pub fn record_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn field(&self, name: &str) -> Option<&FieldIndex> {
        self.fields
            .binary_search_by(|f| f.name.as_str().cmp(name))
            .ok()
            .map(|at| &self.fields[at])
    }

    /// Total distinct (field, word) pairs.
    pub fn word_count(&self) -> usize {
        self.fields.iter().map(|f| f.words.len()).sum()
    }

    /// Total postings across all words.
    pub fn posting_count(&self) -> usize {
        self.fields
            .iter()
            .flat_map(|f| &f.words)
            .map(|w| w.postings().len())
            .sum()
    }

    /// Serialize to bytes.
    ///
    /// Fields and words must already be sorted; this is what the build tables
    /// produce.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IndexError> {
        if self.fields.len() > MAX_FIELDS {
            return Err(IndexError::TooManyFields(self.fields.len()));
        }

        let mut buf = Vec::new();
        self.header.write(&mut buf);
        put_i64(&mut buf, self.mtime);

        put_count(&mut buf, self.offsets.len(), "records")?;
        for &offset in &self.offsets {
            put_u64(&mut buf, offset);
        }

        put_u8(&mut buf, self.fields.len() as u8);
        for field in &self.fields {
            put_str(&mut buf, &field.name)?;
        }

        for field in &self.fields {
            put_count(&mut buf, field.words.len(), "words")?;
            for entry in &field.words {
                put_str(&mut buf, entry.word())?;
                put_count(&mut buf, entry.postings().len(), "postings")?;
                for &record in entry.postings() {
                    put_u32(&mut buf, record);
                }
            }
        }

        Ok(buf)
    }

    /// Read just the header, leaving the body alone.
    pub fn read_header(bytes: &[u8]) -> Result<IndexHeader, IndexError> {
        IndexHeader::read(&mut ByteReader::new(bytes))
    }

    /// Parse and validate a complete index.
    ///
    /// An index written by another version is reported as
    /// [`IndexError::VersionMismatch`] before the body is looked at.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IndexError> {
        let mut reader = ByteReader::new(bytes);
        let header = IndexHeader::read(&mut reader)?;
        if !header.version.is_current() {
            return Err(IndexError::VersionMismatch {
                found: header.version,
                expected: Version::CURRENT,
            });
        }

        let mtime = reader.read_i64("modification time")?;

        let record_count = reader.read_count(8, "record offsets")?;
        let mut offsets = Vec::with_capacity(record_count);
        for _ in 0..record_count {
            offsets.push(reader.read_u64("record offsets")?);
        }

        let field_count = reader.read_u8("field count")? as usize;
        if field_count > MAX_FIELDS {
            return Err(IndexError::TooManyFields(field_count));
        }
        let mut names: Vec<String> = Vec::with_capacity(field_count);
        for _ in 0..field_count {
            let name = reader.read_str("field name")?;
            if let Some(prev) = names.last() {
                if *prev >= name {
                    return Err(IndexError::Corrupt(format!(
                        "field names out of order: {prev:?} before {name:?}"
                    )));
                }
            }
            names.push(name);
        }

        let mut fields = Vec::with_capacity(field_count);
        for name in names {
            if reader.remaining() < MIN_FIELD_BYTES {
                return Err(IndexError::Truncated("word count"));
            }
            let words = read_words(&mut reader, &name, record_count)?;
            fields.push(FieldIndex { name, words });
        }

        if !reader.is_empty() {
            return Err(IndexError::Corrupt(format!(
                "{} trailing bytes after last field",
                reader.remaining()
            )));
        }

        Ok(Self {
            header,
            mtime,
            offsets,
            fields,
        })
    }

    /// Write the serialized index to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), IndexError> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Read and validate the index at `path`.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        Self::from_bytes(&fs::read(path)?)
    }
}

fn read_words(
    reader: &mut ByteReader<'_>,
    field: &str,
    record_count: usize,
) -> Result<Vec<WordEntry>, IndexError> {
    let word_count = reader.read_count(MIN_WORD_BYTES, "word count")?;
    let mut words: Vec<WordEntry> = Vec::with_capacity(word_count);

    for _ in 0..word_count {
        let word = reader.read_str("word")?;
        if let Some(prev) = words.last() {
            if prev.word() >= word.as_str() {
                return Err(IndexError::Corrupt(format!(
                    "words out of order in field {field}: {:?} before {word:?}",
                    prev.word()
                )));
            }
        }

        let posting_count = reader.read_count(4, "postings")?;
        let mut postings = Vec::with_capacity(posting_count);
        for _ in 0..posting_count {
            let record = reader.read_u32("postings")?;
            if record as usize >= record_count {
                return Err(IndexError::Corrupt(format!(
                    "record {record} out of range in field {field} (have {record_count})"
                )));
            }
            if postings.last().is_some_and(|&last| last >= record) {
                return Err(IndexError::Corrupt(format!(
                    "postings for {word:?} in field {field} not ascending"
                )));
            }
            postings.push(record);
        }

        words.push(WordEntry::from_parts(word, postings));
    }

    Ok(words)
}

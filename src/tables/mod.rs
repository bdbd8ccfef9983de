// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build-time hash tables: field names to word tables, words to postings.
//!
//! Both levels use open addressing with double hashing (see [`hash`]). At
//! the end of a build every table is compacted and sorted into a
//! [`FieldIndex`], which is also what the loader hands back.

pub mod field;
pub mod hash;
pub mod registry;

pub use field::{FieldTable, WordEntry, INIT_POSTINGS, INIT_TABLE_SIZE};
pub use registry::FieldTables;

/// One field's words in ascending byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIndex {
    pub name: String,
    pub words: Vec<WordEntry>,
}

impl FieldIndex {
    /// Exact lookup by binary search.
    pub fn find(&self, word: &str) -> Option<&WordEntry> {
        self.words
            .binary_search_by(|entry| entry.word().cmp(word))
            .ok()
            .map(|at| &self.words[at])
    }

    /// The contiguous run of words starting with `prefix`.
    pub fn with_prefix(&self, prefix: &str) -> &[WordEntry] {
        let start = self.words.partition_point(|entry| entry.word() < prefix);
        let len = self.words[start..].partition_point(|entry| entry.word().starts_with(prefix));
        &self.words[start..start + len]
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Boolean word lookup over one or more open indexes.
//!
//! A query is a list of words. A record matches when every word occurs in
//! at least one of its fields: OR across fields, AND across words. A prefix
//! word also ORs together every indexed word that starts with it.
//!
//! Very common words are skipped outright: single characters and a short
//! stop list. They never narrow a result and never count as unmatched.
//!
//! Each open index is evaluated independently against its own
//! [`RecordSet`](set::RecordSet)s. A word counts as matched if it found
//! anything in any index, even if a later word then narrowed that index to
//! nothing. If some word matched nowhere the query reports those words and
//! prints no records.
//!
//! # Example
//!
//! ```
//! use biblook::query::{parse_query, QueryEngine, QueryOutcome};
//! use biblook::query::open::LoadedIndex;
//! use biblook::testing::{index_of, SAMPLE_BIB};
//!
//! let loaded = LoadedIndex::new("refs.bix".into(), index_of(SAMPLE_BIB));
//! let mut engine = QueryEngine::new(vec![loaded]);
//!
//! match engine.evaluate(&parse_query("graph methods", false)) {
//!     QueryOutcome::Matches(groups) => assert_eq!(groups[0].records, [1]),
//!     QueryOutcome::Unmatched(words) => panic!("unmatched: {words:?}"),
//! }
//! ```

pub mod open;
pub mod retrieve;
pub mod set;

pub use open::{open_index, LoadedIndex, OpenOptions};
pub use retrieve::{copy_record, write_matches};
pub use set::{QuerySets, RecordSet};

use std::slice;

use crate::tables::{FieldIndex, WordEntry};

/// Words too common to be worth looking up.
pub const STOP_WORDS: [&str; 9] = ["an", "and", "for", "in", "of", "on", "the", "to", "with"];

/// Prefix of the report printed when words matched nothing.
pub const UNMATCHED_PREFIX: &str = "No references found containing:  ";

/// One word of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWord {
    /// Lower-case ASCII letters and digits.
    pub text: String,
    /// Match every indexed word starting with `text`.
    pub prefix: bool,
}

impl QueryWord {
    pub fn exact(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prefix: false,
        }
    }

    pub fn prefix(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prefix: true,
        }
    }

    /// Whether this word is dropped before lookup. Prefix words are always
    /// looked up, since the user asked for the expansion explicitly.
    pub fn is_skipped(&self) -> bool {
        !self.prefix && (self.text.len() < 2 || STOP_WORDS.contains(&self.text.as_str()))
    }
}

/// Split a query line into words.
///
/// Words are maximal runs of ASCII letters and digits, lower-cased. A word
/// followed directly by `*` is a prefix word; `all_prefix` makes every word
/// one.
pub fn parse_query(line: &str, all_prefix: bool) -> Vec<QueryWord> {
    let bytes = line.as_bytes();
    let mut words = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_alphanumeric() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
            i += 1;
        }
        let text = line[start..i].to_ascii_lowercase();
        let starred = bytes.get(i) == Some(&b'*');
        words.push(QueryWord {
            text,
            prefix: all_prefix || starred,
        });
    }
    words
}

/// Records matched in one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMatches {
    /// Position of the index in the engine.
    pub index: usize,
    /// Ascending record numbers.
    pub records: Vec<u32>,
}

/// What a query produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Every word matched somewhere. Groups with no surviving records are
    /// left out, so this may be empty.
    Matches(Vec<IndexMatches>),
    /// These words, in query order, matched nothing in any index.
    Unmatched(Vec<String>),
}

impl QueryOutcome {
    pub fn record_count(&self) -> usize {
        match self {
            QueryOutcome::Matches(groups) => groups.iter().map(|g| g.records.len()).sum(),
            QueryOutcome::Unmatched(_) => 0,
        }
    }
}

/// The one-line report for unmatched words.
pub fn unmatched_report(words: &[String]) -> String {
    format!("{UNMATCHED_PREFIX}{}.", words.join(", "))
}

/// Open indexes and their query state for one session.
#[derive(Debug, Default)]
pub struct QueryEngine {
    indexes: Vec<LoadedIndex>,
}

impl QueryEngine {
    pub fn new(indexes: Vec<LoadedIndex>) -> Self {
        Self { indexes }
    }

    pub fn indexes(&self) -> &[LoadedIndex] {
        &self.indexes
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Run one query against every open index.
    pub fn evaluate(&mut self, words: &[QueryWord]) -> QueryOutcome {
        for loaded in &mut self.indexes {
            let records = loaded.record_count() as u32;
            loaded.sets.reset(records);
        }

        let mut unmatched = Vec::new();
        for word in words {
            if word.is_skipped() {
                continue;
            }
            let mut matched = false;
            for loaded in &mut self.indexes {
                matched |= narrow(loaded, word);
            }
            if !matched {
                unmatched.push(word.text.clone());
            }
        }

        if !unmatched.is_empty() {
            tracing::debug!("unmatched words: {unmatched:?}");
            return QueryOutcome::Unmatched(unmatched);
        }

        let groups = self
            .indexes
            .iter()
            .enumerate()
            .filter(|(_, loaded)| !loaded.sets.result.is_empty())
            .map(|(index, loaded)| IndexMatches {
                index,
                records: loaded.sets.result.to_vec(),
            })
            .collect();
        QueryOutcome::Matches(groups)
    }
}

/// Intersect `loaded`'s result with the records containing `word`.
/// Returns whether `word` occurs anywhere in this index.
fn narrow(loaded: &mut LoadedIndex, word: &QueryWord) -> bool {
    let LoadedIndex { index, sets, .. } = loaded;
    sets.word.clear();

    for field in &index.fields {
        sets.field.clear();
        for entry in lookup(field, word) {
            sets.field.add_postings(entry.postings());
        }
        sets.word.union_with(&sets.field);
    }

    sets.result.intersect_with(&sets.word);
    !sets.word.is_empty()
}

fn lookup<'f>(field: &'f FieldIndex, word: &QueryWord) -> &'f [WordEntry] {
    if word.prefix {
        field.with_prefix(&word.text)
    } else {
        field.find(&word.text).map(slice::from_ref).unwrap_or_default()
    }
}

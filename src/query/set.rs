// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Record sets for one open index.
//!
//! A [`RecordSet`] is a compressed bitmap over record numbers `0..len`.
//! Each open index keeps three: the running result, the union for the
//! current query word, and the union for the current field. They are
//! allocated once when the index is opened and reset between queries.

use roaring::RoaringBitmap;

/// Bit set over the records of one index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    bits: RoaringBitmap,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record in `0..len`.
    pub fn full(len: u32) -> Self {
        let mut set = Self::new();
        set.fill(len);
        set
    }

    /// Reset to every record in `0..len`.
    pub fn fill(&mut self, len: u32) {
        self.bits.clear();
        self.bits.insert_range(0..len);
    }

    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Add every record in an ascending posting list.
    pub fn add_postings(&mut self, postings: &[u32]) {
        self.bits.extend(postings.iter().copied());
    }

    pub fn union_with(&mut self, other: &RecordSet) {
        self.bits |= &other.bits;
    }

    pub fn intersect_with(&mut self, other: &RecordSet) {
        self.bits &= &other.bits;
    }

    pub fn contains(&self, record: u32) -> bool {
        self.bits.contains(record)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn len(&self) -> u64 {
        self.bits.len()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.bits.iter()
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

/// The per-index sets a query works with.
#[derive(Debug, Clone, Default)]
pub struct QuerySets {
    /// Records satisfying every word so far.
    pub result: RecordSet,
    /// Union over fields (and prefix matches) for the current word.
    pub word: RecordSet,
    /// Union over prefix matches within the current field.
    pub field: RecordSet,
}

impl QuerySets {
    pub fn new(records: u32) -> Self {
        Self {
            result: RecordSet::full(records),
            word: RecordSet::new(),
            field: RecordSet::new(),
        }
    }

    /// Start a new query over `records` records.
    pub fn reset(&mut self, records: u32) {
        self.result.fill(records);
        self.word.clear();
        self.field.clear();
    }
}

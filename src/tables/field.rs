// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-field word tables.
//!
//! Each field name gets an open-addressed table mapping words to posting
//! lists. Tables start at [`INIT_TABLE_SIZE`] slots and double whenever more
//! than half of the slots are occupied, so probes stay short. A table can also
//! be a sink: it exists so the field name is known, but every insert is
//! dropped. Sinks are how ignored fields are handled.

use super::hash::probe;
use crate::error::TableError;

/// Initial slot count for a word table.
pub const INIT_TABLE_SIZE: usize = 256;

/// Initial posting-list capacity.
pub const INIT_POSTINGS: usize = 8;

/// A word and the ascending list of records it occurs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    word: String,
    postings: Vec<u32>,
}

impl WordEntry {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            postings: Vec::with_capacity(INIT_POSTINGS),
        }
    }

    /// Build an entry from already-validated parts (used by the loader).
    pub fn from_parts(word: String, postings: Vec<u32>) -> Self {
        Self { word, postings }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn postings(&self) -> &[u32] {
        &self.postings
    }

    /// Record an occurrence. Returns false if `record` was already present.
    ///
    /// Records normally arrive in ascending order, so this is a compare with
    /// the last posting. An out-of-order record is placed by binary search,
    /// which keeps the list strictly ascending either way.
    pub fn push(&mut self, record: u32) -> bool {
        match self.postings.last() {
            Some(&last) if last == record => false,
            Some(&last) if last > record => match self.postings.binary_search(&record) {
                Ok(_) => false,
                Err(at) => {
                    self.postings.insert(at, record);
                    true
                }
            },
            _ => {
                self.postings.push(record);
                true
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Storage {
    Sink,
    Words {
        slots: Vec<Option<WordEntry>>,
        len: usize,
    },
}

/// Word table for one field name.
#[derive(Debug, Clone)]
pub struct FieldTable {
    name: String,
    storage: Storage,
    growths: usize,
}

impl FieldTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, INIT_TABLE_SIZE)
    }

    /// A table with at least `capacity` slots (rounded up to a power of two).
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        let size = capacity.max(2).next_power_of_two();
        Self {
            name: name.into(),
            storage: Storage::Words {
                slots: vec![None; size],
                len: 0,
            },
            growths: 0,
        }
    }

    /// A table that accepts and discards every word.
    pub fn sink(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: Storage::Sink,
            growths: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_sink(&self) -> bool {
        matches!(self.storage, Storage::Sink)
    }

    /// Turn this table into a sink, dropping anything already collected.
    pub fn make_sink(&mut self) {
        self.storage = Storage::Sink;
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Sink => 0,
            Storage::Words { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times the table has doubled.
    pub fn growths(&self) -> usize {
        self.growths
    }

    /// Current slot count (0 for a sink).
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Sink => 0,
            Storage::Words { slots, .. } => slots.len(),
        }
    }

    /// Add `record` to the posting list for `word`.
    pub fn insert(&mut self, word: &str, record: u32) -> Result<(), TableError> {
        let Self {
            name,
            storage,
            growths,
        } = self;
        let Storage::Words { slots, len } = storage else {
            return Ok(());
        };

        let at = locate(slots, word, name)?;
        if let Some(entry) = slots[at].as_mut() {
            entry.push(record);
            return Ok(());
        }

        let mut entry = WordEntry::new(word);
        entry.push(record);
        slots[at] = Some(entry);
        *len += 1;
        if *len * 2 > slots.len() {
            *slots = rehash(std::mem::take(slots), name)?;
            *growths += 1;
        }
        Ok(())
    }

    pub fn get(&self, word: &str) -> Option<&WordEntry> {
        let Storage::Words { slots, .. } = &self.storage else {
            return None;
        };
        let at = locate(slots, word, &self.name).ok()?;
        slots[at].as_ref()
    }

    /// Occupied entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &WordEntry> {
        let slots: &[Option<WordEntry>] = match &self.storage {
            Storage::Sink => &[],
            Storage::Words { slots, .. } => slots,
        };
        slots.iter().flatten()
    }

    /// Compact the table and sort its entries by word.
    pub fn into_sorted(self) -> Vec<WordEntry> {
        match self.storage {
            Storage::Sink => Vec::new(),
            Storage::Words { slots, len } => {
                let mut words = Vec::with_capacity(len);
                words.extend(slots.into_iter().flatten());
                words.sort_unstable_by(|a, b| a.word.cmp(&b.word));
                words
            }
        }
    }
}

/// Slot holding `word`, or the first empty slot on its probe path.
fn locate(slots: &[Option<WordEntry>], word: &str, field: &str) -> Result<usize, TableError> {
    for at in probe(word.as_bytes(), slots.len()) {
        match &slots[at] {
            None => return Ok(at),
            Some(entry) if entry.word == word => return Ok(at),
            Some(_) => {}
        }
    }
    Err(TableError::ProbeExhausted(format!("field {field}")))
}

fn rehash(old: Vec<Option<WordEntry>>, field: &str) -> Result<Vec<Option<WordEntry>>, TableError> {
    let mut slots = vec![None; old.len() * 2];
    for entry in old.into_iter().flatten() {
        let at = locate(&slots, &entry.word, field)?;
        slots[at] = Some(entry);
    }
    Ok(slots)
}

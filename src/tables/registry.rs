// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The set of field tables for one build.
//!
//! Field names live in a fixed-size double-hashed table of [`MAX_FIELDS`]
//! slots. It never grows: a source with more distinct field names than that
//! is rejected.

use super::field::FieldTable;
use super::hash::probe;
use super::FieldIndex;
use crate::binary::MAX_FIELDS;
use crate::error::TableError;

/// Field name to word table.
#[derive(Debug, Clone)]
pub struct FieldTables {
    slots: Vec<Option<FieldTable>>,
    count: usize,
}

impl Default for FieldTables {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldTables {
    pub fn new() -> Self {
        Self {
            slots: vec![None; MAX_FIELDS],
            count: 0,
        }
    }

    /// Distinct field names seen, sinks included.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, name: &str) -> Option<&FieldTable> {
        for at in probe(name.as_bytes(), self.slots.len()) {
            match &self.slots[at] {
                None => return None,
                Some(table) if table.name() == name => return Some(table),
                Some(_) => {}
            }
        }
        None
    }

    /// The table for `name`, created on first use.
    pub fn table_mut(&mut self, name: &str) -> Result<&mut FieldTable, TableError> {
        let at = self.slot_for(name)?;
        let slot = &mut self.slots[at];
        if slot.is_none() {
            *slot = Some(FieldTable::new(name));
            self.count += 1;
        }
        slot.as_mut()
            .ok_or_else(|| TableError::ProbeExhausted(format!("field {name}")))
    }

    /// Register `name` as a sink so its words are never indexed.
    pub fn ignore(&mut self, name: &str) -> Result<(), TableError> {
        self.table_mut(name)?.make_sink();
        Ok(())
    }

    /// Add `record` under `word` in field `field`.
    pub fn insert(&mut self, field: &str, word: &str, record: u32) -> Result<(), TableError> {
        self.table_mut(field)?.insert(word, record)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldTable> {
        self.slots.iter().flatten()
    }

    /// Non-sink fields, each with its words sorted, ordered by field name.
    pub fn into_sorted(self) -> Vec<FieldIndex> {
        let mut fields: Vec<FieldIndex> = self
            .slots
            .into_iter()
            .flatten()
            .filter(|table| !table.is_sink())
            .map(|table| FieldIndex {
                name: table.name().to_string(),
                words: table.into_sorted(),
            })
            .collect();
        fields.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        fields
    }

    fn slot_for(&self, name: &str) -> Result<usize, TableError> {
        for at in probe(name.as_bytes(), self.slots.len()) {
            match &self.slots[at] {
                Some(table) if table.name() == name => return Ok(at),
                Some(_) => {}
                None if self.count >= MAX_FIELDS => break,
                None => return Ok(at),
            }
        }
        Err(TableError::TooManyFields {
            name: name.to_string(),
            limit: MAX_FIELDS,
        })
    }
}

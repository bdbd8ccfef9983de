// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! String macro table for `@string` definitions.
//!
//! Lives only as long as one build session. A later definition of the same
//! name replaces the earlier one, matching how BibTeX itself resolves
//! redefinitions.

use std::collections::BTreeMap;

/// Name → expansion map filled by `@string` records while parsing.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    entries: BTreeMap<String, String>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `expansion` with `name`, superseding any earlier definition.
    pub fn define(&mut self, name: impl Into<String>, expansion: impl Into<String>) {
        self.entries.insert(name.into(), expansion.into());
    }

    /// Expansion for `name`, if defined.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

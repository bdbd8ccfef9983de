//! Strategies for generating small bibliographies.

use proptest::prelude::*;

/// A shared vocabulary so records overlap. No stop words, no single letters.
pub const VOCABULARY: &[&str] = &[
    "graph", "search", "sorting", "hashing", "parsing", "lambda", "calculus", "knuth", "tarjan",
    "1973", "heap", "tree",
];

const FIELDS: &[&str] = &["title", "author", "note", "journal"];

/// One field: its name, its words, and whether it is written quoted.
#[derive(Debug, Clone)]
pub struct GenField {
    pub name: &'static str,
    pub words: Vec<&'static str>,
    pub quoted: bool,
    /// Wrap the value in TeX markup the parser strips: a control word, an
    /// escaped quote, and an escaped closing brace.
    pub decorated: bool,
}

/// One entry of a generated bibliography.
#[derive(Debug, Clone)]
pub struct GenRecord {
    pub fields: Vec<GenField>,
}

impl GenRecord {
    pub fn render(&self, key: usize) -> String {
        let mut text = format!("@misc{{key{key}");
        for field in &self.fields {
            let mut value = field.words.join(" ");
            if field.decorated {
                value = format!("\\emph{{{value}}} \\\" \\}}");
            }
            if field.quoted {
                text.push_str(&format!(",\n  {} = \"{value}\"", field.name));
            } else {
                text.push_str(&format!(",\n  {} = {{{value}}}", field.name));
            }
        }
        text.push_str("\n}");
        text
    }

    pub fn contains(&self, word: &str) -> bool {
        self.fields.iter().any(|f| f.words.iter().any(|w| *w == word))
    }
}

pub fn vocab_word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(VOCABULARY)
}

fn field() -> impl Strategy<Value = GenField> {
    (
        prop::sample::select(FIELDS),
        prop::collection::vec(vocab_word(), 1..6),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(name, words, quoted, decorated)| GenField {
            name,
            words,
            quoted,
            decorated,
        })
}

pub fn records() -> impl Strategy<Value = Vec<GenRecord>> {
    prop::collection::vec(
        prop::collection::vec(field(), 0..4).prop_map(|fields| GenRecord { fields }),
        1..20,
    )
}

/// Render records separated by comment lines, returning the text and each
/// record's own text.
pub fn render(records: &[GenRecord]) -> (String, Vec<String>) {
    let mut text = String::from("% generated\n");
    let mut rendered = Vec::with_capacity(records.len());
    for (key, record) in records.iter().enumerate() {
        let entry = record.render(key);
        text.push_str(&entry);
        text.push_str("\n\nbetween records\n");
        rendered.push(entry);
    }
    (text, rendered)
}

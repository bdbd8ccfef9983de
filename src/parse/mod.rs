// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! BibTeX record parser.
//!
//! Splits source text into records, fields, and normalized word streams.
//! A record starts at `@`, a type name, and `{` or `(`. Inside, fields are
//! `name = value` pairs separated by commas. A value is a `#`-joined list of
//! fragments, each one of:
//!
//! - `{...}`: nested braces balanced, contents taken verbatim
//! - `"..."`: may contain balanced braces, inside which `"` does not end the
//!   string
//! - a bare identifier, looked up in the [`MacroTable`]
//!
//! Field text is normalized on the way through: [`Cursor`] already folded
//! case and stripped TeX control sequences, and every remaining
//! non-alphanumeric character becomes a space. A bare identifier contributes
//! both itself and its expansion, so either form is searchable.
//!
//! `@string` records define macros; they are still yielded (flagged
//! [`RecordKind::StringDef`]) but do not get record numbers downstream.
//! `@comment` and `@preamble` bodies are skipped outright.
//!
//! Any structural problem is fatal for the file: the parser yields one
//! [`ParseError`] and then stops.

pub mod cursor;
pub mod macros;

pub use cursor::Cursor;
pub use macros::MacroTable;

use crate::binary::MAX_WORD;
use crate::error::{ParseError, ParseErrorKind};

/// Longest type name recognized after `@` ("inproceedings", "mastersthesis").
pub const MAX_TYPE_NAME: usize = 13;

/// Whether a record is a bibliographic entry or a macro definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Entry,
    StringDef,
}

/// One `name = value` pair with its normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Lower-case alphanumerics separated by single spaces (possibly several).
    pub text: String,
}

impl Field {
    /// Candidate words, in order. Length filtering happens at index time.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_ascii_whitespace()
    }
}

/// A parsed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Byte offset of the `@` that opens the record.
    pub offset: u64,
    /// Line on which the record starts.
    pub line: usize,
    pub kind: RecordKind,
    /// Lower-cased type name, e.g. "article".
    pub entry_type: String,
    /// Citation key (entries only).
    pub key: Option<String>,
    pub fields: Vec<Field>,
}

/// Streaming record parser over one source file.
pub struct RecordParser<'a> {
    cursor: Cursor<'a>,
    macros: MacroTable,
    record_line: usize,
    done: bool,
}

const KEY_STOP: &str = ",})";
const NAME_STOP: &str = "=";
const FRAGMENT_STOP: &str = "#,)}";

/// Delimiters that may not appear inside a key, field name, or bare word.
/// Keeping them out means record structure can be recovered from brackets
/// and quotes alone.
const WORD_BREAKERS: &[u8] = b"{}\")";

#[inline]
fn push_normalized(buf: &mut String, byte: u8) {
    buf.push(if byte.is_ascii_alphanumeric() {
        byte as char
    } else {
        ' '
    });
}

fn push_normalized_str(buf: &mut String, s: &str) {
    for byte in s.bytes() {
        push_normalized(buf, byte);
    }
}

impl<'a> RecordParser<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(source),
            macros: MacroTable::new(),
            record_line: 1,
            done: false,
        }
    }

    /// Macros defined so far.
    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// Current line in the source.
    pub fn line(&self) -> usize {
        self.cursor.line()
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            record_line: self.record_line,
            line: self.cursor.line(),
        }
    }

    /// Parse the next record, `Ok(None)` at end of input.
    pub fn next_record(&mut self) -> Result<Option<Record>, ParseError> {
        loop {
            let Some((offset, entry_type)) = self.find_record() else {
                return Ok(None);
            };

            if entry_type == "comment" || entry_type == "preamble" {
                self.skip_body();
                continue;
            }

            let kind = if entry_type == "string" {
                RecordKind::StringDef
            } else {
                RecordKind::Entry
            };

            let key = match kind {
                RecordKind::Entry => Some(self.parse_key()?),
                RecordKind::StringDef => None,
            };

            let fields = self.parse_fields(kind)?;

            return Ok(Some(Record {
                offset: offset as u64,
                line: self.record_line,
                kind,
                entry_type,
                key,
                fields,
            }));
        }
    }

    /// Scan to the next `@type{` or `@type(`. On success the cursor sits just
    /// past the opening bracket.
    fn find_record(&mut self) -> Option<(usize, String)> {
        loop {
            while !self.cursor.at_eof() && self.cursor.current() != b'@' {
                self.cursor.advance();
            }
            if self.cursor.at_eof() {
                return None;
            }

            let offset = self.cursor.offset();
            self.record_line = self.cursor.line();
            self.cursor.advance();
            self.cursor.skip_white();

            let mut entry_type = String::new();
            while entry_type.len() < MAX_TYPE_NAME && self.cursor.current().is_ascii_alphabetic() {
                entry_type.push(self.cursor.current() as char);
                self.cursor.advance();
            }

            self.cursor.skip_white();
            if !matches!(self.cursor.current(), b'{' | b'(') {
                continue;
            }

            self.cursor.advance();
            return Some((offset, entry_type));
        }
    }

    /// Consume a record body we don't index. End of input just ends it.
    fn skip_body(&mut self) {
        let mut depth = 1usize;
        while !self.cursor.at_eof() {
            match self.cursor.current() {
                b'{' | b'(' => depth += 1,
                b'}' | b')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.cursor.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.cursor.advance();
        }
    }

    /// Read a word ending at white space or one of `stop`. Leading white
    /// space is skipped; on success the cursor is at the stop character.
    fn get_word(&mut self, stop: &'static str) -> Result<String, ParseError> {
        let stops = stop.as_bytes();
        let mut word = Vec::new();

        self.cursor.skip_white();
        while self.cursor.current() != b' '
            && !stops.contains(&self.cursor.current())
            && !self.cursor.at_eof()
        {
            if WORD_BREAKERS.contains(&self.cursor.current()) {
                return Err(self.error(ParseErrorKind::UnexpectedTerminator {
                    found: self.cursor.current() as char,
                    expected: stop,
                }));
            }
            if word.len() >= MAX_WORD - 1 {
                return Err(self.error(ParseErrorKind::WordTooLong));
            }
            word.push(self.cursor.current());
            self.cursor.advance();
        }
        if self.cursor.at_eof() {
            return Err(self.error(ParseErrorKind::UnexpectedEof("in word")));
        }

        self.cursor.skip_white();
        if !stops.contains(&self.cursor.current()) {
            return Err(self.error(ParseErrorKind::UnexpectedTerminator {
                found: self.cursor.current() as char,
                expected: stop,
            }));
        }

        Ok(String::from_utf8_lossy(&word).into_owned())
    }

    fn parse_key(&mut self) -> Result<String, ParseError> {
        let key = self.get_word(KEY_STOP).map_err(|e| match e.kind {
            ParseErrorKind::UnexpectedTerminator { .. } => ParseError {
                kind: ParseErrorKind::MissingKey,
                ..e
            },
            _ => e,
        })?;
        if self.cursor.current() == b',' {
            self.cursor.advance();
        }
        Ok(key)
    }

    fn parse_fields(&mut self, kind: RecordKind) -> Result<Vec<Field>, ParseError> {
        let mut fields = Vec::new();

        loop {
            self.cursor.skip_white();
            if self.cursor.current() == b',' {
                self.cursor.advance();
                self.cursor.skip_white();
            }
            if matches!(self.cursor.current(), b'}' | b')') {
                self.cursor.advance();
                break;
            }
            if self.cursor.at_eof() {
                return Err(self.error(ParseErrorKind::UnexpectedEof("in record")));
            }

            let name = self.get_word(NAME_STOP).map_err(|e| match e.kind {
                ParseErrorKind::UnexpectedTerminator { .. } => ParseError {
                    kind: ParseErrorKind::MissingFieldName,
                    ..e
                },
                _ => e,
            })?;
            if name.is_empty() {
                return Err(self.error(ParseErrorKind::MissingFieldName));
            }
            self.cursor.advance();

            let mut text = String::new();
            self.parse_value(&mut text)?;
            text.push(' ');

            if kind == RecordKind::StringDef {
                self.macros.define(name.clone(), text.clone());
            }
            fields.push(Field { name, text });
        }

        Ok(fields)
    }

    /// Parse a `#`-joined value into `buf`. On success the cursor is past a
    /// `,` separator or at the record's closing bracket.
    fn parse_value(&mut self, buf: &mut String) -> Result<(), ParseError> {
        loop {
            self.cursor.skip_white();
            if self.cursor.at_eof() {
                return Err(self.error(ParseErrorKind::UnexpectedEof("in string")));
            }

            match self.cursor.current() {
                b'"' => self.parse_quoted(buf)?,
                b'{' => self.parse_braced(buf)?,
                _ => {
                    let word = self.get_word(FRAGMENT_STOP)?;
                    if !word.is_empty() {
                        push_normalized_str(buf, &word);
                        buf.push(' ');
                        if let Some(expansion) = self.macros.get(&word) {
                            push_normalized_str(buf, expansion);
                        }
                    }
                }
            }

            self.cursor.skip_white();
            match self.cursor.current() {
                b'#' => self.cursor.advance(),
                b',' => {
                    self.cursor.advance();
                    return Ok(());
                }
                b')' | b'}' => return Ok(()),
                other => return Err(self.error(ParseErrorKind::BadSeparator(other as char))),
            }
        }
    }

    /// With the cursor on `{`, read through the matching `}`.
    fn parse_braced(&mut self, buf: &mut String) -> Result<(), ParseError> {
        debug_assert_eq!(self.cursor.current(), b'{');
        self.cursor.advance();

        let mut depth = 1usize;
        loop {
            if self.cursor.at_eof() {
                return Err(self.error(ParseErrorKind::UnexpectedEof("during string parse")));
            }
            match self.cursor.current() {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            push_normalized(buf, self.cursor.current());
            self.cursor.advance();
        }
        self.cursor.advance();

        Ok(())
    }

    /// With the cursor on `"`, read through the closing `"`. Braced groups
    /// inside are read whole, so a `"` within them does not terminate.
    fn parse_quoted(&mut self, buf: &mut String) -> Result<(), ParseError> {
        debug_assert_eq!(self.cursor.current(), b'"');
        self.cursor.advance();

        loop {
            if self.cursor.at_eof() {
                return Err(self.error(ParseErrorKind::UnexpectedEof("during string parse")));
            }
            match self.cursor.current() {
                b'{' => self.parse_braced(buf)?,
                b'"' => break,
                byte => {
                    push_normalized(buf, byte);
                    self.cursor.advance();
                }
            }
        }
        self.cursor.advance();

        Ok(())
    }
}

impl Iterator for RecordParser<'_> {
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

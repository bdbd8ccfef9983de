// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Character source for the record parser.
//!
//! Every character the parser sees has already been folded: ASCII letters
//! are lower-cased and all white space becomes a single space byte. TeX
//! control sequences are stripped on the way in. A control sequence is a
//! backslash followed by either exactly one non-letter or a maximal run of
//! letters, and any white space after it goes too. So `G\"{o}del` reaches the
//! parser as `g{o}del`, and `\emph {Graphs}` as `{graphs}`.
//!
//! The cursor also owns the two side-channel counters: the byte offset of the
//! current character (which becomes a record's offset) and the line number
//! used in diagnostics.

/// Folding, TeX-stripping cursor over raw source bytes.
#[derive(Debug)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    current: u8,
    line: usize,
}

#[inline]
fn fold(byte: u8) -> u8 {
    match byte {
        b'A'..=b'Z' => byte.to_ascii_lowercase(),
        b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => b' ',
        _ => byte,
    }
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        let mut cursor = Self {
            bytes,
            pos: 0,
            current: 0,
            line: 1,
        };
        cursor.fill();
        cursor
    }

    /// The current (folded) character; 0 at end of input.
    #[inline]
    pub fn current(&self) -> u8 {
        self.current
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Byte offset of the current character in the source.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Line of the current character, counting from 1.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    fn fill(&mut self) {
        match self.bytes.get(self.pos) {
            Some(&byte) => {
                if byte == b'\n' {
                    self.line += 1;
                }
                self.current = fold(byte);
            }
            None => self.current = 0,
        }
    }

    fn step(&mut self) {
        if self.pos < self.bytes.len() {
            self.pos += 1;
        }
        self.fill();
    }

    /// Move to the next character, skipping any TeX control sequences.
    pub fn advance(&mut self) {
        self.step();
        while self.current == b'\\' && !self.at_eof() {
            self.step();
            if self.current.is_ascii_alphabetic() {
                while self.current.is_ascii_alphabetic() {
                    self.step();
                }
            } else {
                self.step();
            }
            while self.current == b' ' {
                self.step();
            }
        }
    }

    /// Advance past white space.
    pub fn skip_white(&mut self) {
        while self.current == b' ' {
            self.advance();
        }
    }
}

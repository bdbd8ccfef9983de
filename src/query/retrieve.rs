// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Reproducing records verbatim from their source.
//!
//! The index only knows where a record starts. To print it we seek there and
//! echo characters until the record closes. First everything through the `@`
//! and the opening bracket, then the body. In the body, braces nest. A `"`
//! opens or closes a quoted string, but only outside braces. The record
//! ends at the first `}` or `)` that is outside both.
//!
//! TeX control sequences are echoed but otherwise ignored, exactly as the
//! parser's cursor strips them, so `\"` and `\}` never count as structure.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};

use super::open::LoadedIndex;
use super::IndexMatches;
use crate::error::QueryError;

/// Echoes every byte it reads and hands back only the bytes that are not
/// part of a control sequence.
struct Echo<'a, R, W: ?Sized> {
    bytes: io::Bytes<&'a mut R>,
    out: &'a mut W,
}

impl<R: Read, W: Write + ?Sized> Echo<'_, R, W> {
    fn raw(&mut self) -> io::Result<u8> {
        let byte = self.bytes.next().unwrap_or_else(|| {
            Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "source ended inside record",
            ))
        })?;
        self.out.write_all(&[byte])?;
        Ok(byte)
    }

    /// The next byte outside a control sequence. A control sequence is a
    /// backslash and one non-letter or a run of letters, plus any white
    /// space after it.
    fn next(&mut self) -> io::Result<u8> {
        let mut byte = self.raw()?;
        while byte == b'\\' {
            let first = self.raw()?;
            byte = self.raw()?;
            if first.is_ascii_alphabetic() {
                while byte.is_ascii_alphabetic() {
                    byte = self.raw()?;
                }
            }
            while byte.is_ascii_whitespace() || byte == 0x0b {
                byte = self.raw()?;
            }
        }
        Ok(byte)
    }
}

/// Copy the record starting at `offset` from `source` to `out`.
pub fn copy_record<R, W>(source: &mut R, offset: u64, out: &mut W) -> io::Result<()>
where
    R: BufRead + Seek,
    W: Write + ?Sized,
{
    source.seek(SeekFrom::Start(offset))?;
    let mut echo = Echo {
        bytes: source.by_ref().bytes(),
        out,
    };

    // Through "@type{" or "@type(".
    let mut byte = echo.raw()?;
    while byte != b'@' {
        byte = echo.raw()?;
    }
    while byte != b'{' && byte != b'(' {
        byte = echo.next()?;
    }

    let mut depth = 0usize;
    let mut quoted = false;
    loop {
        match echo.next()? {
            b'{' => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b'"' if depth == 0 => quoted = !quoted,
            b'}' | b')' if depth == 0 && !quoted => return Ok(()),
            _ => {}
        }
    }
}

/// Print every matched record: a blank line, the source path, the record,
/// and a newline, grouped by index and ascending within each.
pub fn write_matches<W: Write + ?Sized>(
    indexes: &[LoadedIndex],
    matches: &[IndexMatches],
    out: &mut W,
) -> Result<(), QueryError> {
    for group in matches {
        let Some(loaded) = indexes.get(group.index) else {
            continue;
        };
        let source_path = loaded.source();
        let mut source = BufReader::new(File::open(source_path)?);

        for &record in &group.records {
            let Some(&offset) = loaded.index.offsets.get(record as usize) else {
                continue;
            };
            writeln!(out, "\n{}", source_path.display())?;
            copy_record(&mut source, offset, out).map_err(|err| QueryError::Retrieve {
                path: source_path.to_path_buf(),
                record,
                reason: err.to_string(),
            })?;
            writeln!(out)?;
        }
    }
    Ok(())
}

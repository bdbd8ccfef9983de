// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: fixed-width little-endian integers and short
//! length-prefixed strings.
//!
//! Strings carry a one-byte length, which caps them at 255 bytes. Index words
//! are capped far lower (see [`MAX_WORD`]), and the reader enforces that cap
//! so a damaged length byte is caught as soon as it is read.

use super::header::MAX_WORD;
use crate::error::IndexError;

// ============================================================================
// WRITING
// ============================================================================

pub fn put_u8(buf: &mut Vec<u8>, value: u8) {
    buf.push(value);
}

pub fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_u64(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_i64(buf: &mut Vec<u8>, value: i64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Write a one-byte length followed by the string bytes. Only ASCII is
/// accepted, matching what [`ByteReader::read_str`] will read back.
pub fn put_str(buf: &mut Vec<u8>, value: &str) -> Result<(), IndexError> {
    let bytes = value.as_bytes();
    if bytes.len() > MAX_WORD {
        return Err(IndexError::WordTooLong(bytes.len()));
    }
    if !bytes.is_ascii() {
        return Err(IndexError::NonAscii(value.to_string()));
    }
    buf.push(bytes.len() as u8);
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Write a count as `u32`, rejecting anything wider.
pub fn put_count(buf: &mut Vec<u8>, count: usize, what: &str) -> Result<(), IndexError> {
    let count = u32::try_from(count)
        .map_err(|_| IndexError::Corrupt(format!("too many {what} ({count})")))?;
    put_u32(buf, count);
    Ok(())
}

// ============================================================================
// READING
// ============================================================================

/// Bounds-checked cursor over index bytes.
#[derive(Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], IndexError> {
        if len > self.remaining() {
            return Err(IndexError::Truncated(what));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], IndexError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, what)?);
        Ok(out)
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8, IndexError> {
        Ok(self.read_array::<1>(what)?[0])
    }

    pub fn read_u32(&mut self, what: &'static str) -> Result<u32, IndexError> {
        self.read_array(what).map(u32::from_le_bytes)
    }

    pub fn read_u64(&mut self, what: &'static str) -> Result<u64, IndexError> {
        self.read_array(what).map(u64::from_le_bytes)
    }

    pub fn read_i64(&mut self, what: &'static str) -> Result<i64, IndexError> {
        self.read_array(what).map(i64::from_le_bytes)
    }

    /// Read a length-prefixed ASCII string of at most [`MAX_WORD`] bytes.
    pub fn read_str(&mut self, what: &'static str) -> Result<String, IndexError> {
        let len = self.read_u8(what)? as usize;
        if len > MAX_WORD {
            return Err(IndexError::WordTooLong(len));
        }
        let bytes = self.read_bytes(len, what)?;
        if !bytes.is_ascii() {
            return Err(IndexError::Corrupt(format!("non-ASCII bytes in {what}")));
        }
        // ASCII is valid UTF-8
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read a `u32` element count and check that `count * min_size` bytes
    /// could still follow, so a damaged count can't force a huge allocation.
    pub fn read_count(&mut self, min_size: usize, what: &'static str) -> Result<usize, IndexError> {
        let count = self.read_u32(what)? as usize;
        let needed = count
            .checked_mul(min_size)
            .ok_or(IndexError::Truncated(what))?;
        if needed > self.remaining() {
            return Err(IndexError::Truncated(what));
        }
        Ok(count)
    }
}

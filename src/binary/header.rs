// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index file header: a single line of ASCII text.
//!
//! ```text
//! bibindex <format> <major> <minor> <path-length> <path>\n
//! ```
//!
//! The version triple is the compatibility contract. Any mismatch means the
//! index was written by a different build and must be regenerated rather than
//! read. The path length comes before the path so that source paths may
//! contain spaces. Being text, the header can be checked with `head -1`.

use std::fmt;
use std::path::Path;

use super::encoding::ByteReader;
use crate::error::IndexError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Leading token of every index file.
pub const MAGIC: &str = "bibindex";

/// Binary layout version. Bumped whenever the body encoding changes.
pub const FORMAT_VERSION: u32 = 4;

/// Program major version.
pub const MAJOR_VERSION: u32 = 1;

/// Program minor version.
pub const MINOR_VERSION: u32 = 0;

/// Maximum word (and field name) length in bytes. Words must be strictly
/// shorter than this to be indexed.
pub const MAX_WORD: usize = 100;

/// Maximum distinct field names per index.
pub const MAX_FIELDS: usize = 64;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum source path length stored in a header.
pub const MAX_PATH_LEN: usize = 4096;

/// Maximum digits in one header number.
const MAX_DIGITS: usize = 10;

// ============================================================================
// VERSION
// ============================================================================

/// Format/major/minor version triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub format: u32,
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// The version this build reads and writes.
    pub const CURRENT: Version = Version {
        format: FORMAT_VERSION,
        major: MAJOR_VERSION,
        minor: MINOR_VERSION,
    };

    pub fn is_current(self) -> bool {
        self == Self::CURRENT
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.format, self.major, self.minor)
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// Parsed header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHeader {
    pub version: Version,
    /// Source file the index was built from, as given to the indexer.
    pub source: String,
}

impl IndexHeader {
    /// Header for a fresh index of `source` at the current version.
    pub fn new(source: &Path) -> Result<Self, IndexError> {
        let source = source
            .to_str()
            .ok_or_else(|| IndexError::NonUtf8Path(source.to_path_buf()))?;
        if source.len() > MAX_PATH_LEN {
            return Err(IndexError::Corrupt(format!(
                "source path longer than {MAX_PATH_LEN} bytes"
            )));
        }
        Ok(Self {
            version: Version::CURRENT,
            source: source.to_string(),
        })
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let Version {
            format,
            major,
            minor,
        } = self.version;
        let line = format!(
            "{MAGIC} {format} {major} {minor} {} {}\n",
            self.source.len(),
            self.source
        );
        buf.extend_from_slice(line.as_bytes());
    }

    /// Parse the header line. The version is not checked here.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, IndexError> {
        let magic = reader.read_bytes(MAGIC.len(), "magic")?;
        if magic != MAGIC.as_bytes() || reader.read_u8("magic")? != b' ' {
            return Err(IndexError::Corrupt("not a bibindex file".into()));
        }

        let format = read_number(reader, "format version")?;
        let major = read_number(reader, "major version")?;
        let minor = read_number(reader, "minor version")?;
        let path_len = read_number(reader, "path length")? as usize;
        if path_len > MAX_PATH_LEN {
            return Err(IndexError::Corrupt(format!(
                "source path length {path_len} exceeds {MAX_PATH_LEN}"
            )));
        }

        let path = reader.read_bytes(path_len, "source path")?;
        let source = std::str::from_utf8(path)
            .map_err(|_| IndexError::Corrupt("source path is not UTF-8".into()))?
            .to_string();
        if reader.read_u8("header end")? != b'\n' {
            return Err(IndexError::Corrupt("header line not terminated".into()));
        }

        Ok(Self {
            version: Version {
                format,
                major,
                minor,
            },
            source,
        })
    }
}

/// Read ASCII decimal digits up to and including a single space.
fn read_number(reader: &mut ByteReader<'_>, what: &'static str) -> Result<u32, IndexError> {
    let mut value: u32 = 0;
    let mut digits = 0;
    loop {
        match reader.read_u8(what)? {
            b' ' if digits > 0 => return Ok(value),
            byte @ b'0'..=b'9' if digits < MAX_DIGITS => {
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u32::from(byte - b'0')))
                    .ok_or_else(|| IndexError::Corrupt(format!("{what} out of range")))?;
                digits += 1;
            }
            _ => return Err(IndexError::Corrupt(format!("malformed {what} in header"))),
        }
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Capabilities the core borrows from its environment.
//!
//! Opening an index may need to rebuild it, and printing results goes through
//! a pager. Both run another program and wait for it. Staleness checks need a
//! file's modification time. All of that goes through [`Host`] so tests can
//! swap in a host that rebuilds in-process and records what it was asked to
//! do.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;
use std::time::UNIX_EPOCH;

/// External programs and file metadata.
pub trait Host {
    /// Run `program` with `args`, block until it exits, and report whether
    /// it exited successfully.
    fn run(&self, program: &OsStr, args: &[OsString]) -> io::Result<bool>;

    /// Modification time of `path` in whole seconds since the Unix epoch.
    fn modified(&self, path: &Path) -> io::Result<i64>;
}

/// The real thing: `std::process` and filesystem metadata.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl Host for SystemHost {
    fn run(&self, program: &OsStr, args: &[OsString]) -> io::Result<bool> {
        tracing::debug!(program = ?program, ?args, "running");
        let status = Command::new(program).args(args).status()?;
        Ok(status.success())
    }

    fn modified(&self, path: &Path) -> io::Result<i64> {
        modified_secs(path)
    }
}

/// Modification time of `path` in whole seconds since the Unix epoch.
///
/// Times before the epoch come out negative.
pub fn modified_secs(path: &Path) -> io::Result<i64> {
    let modified = fs::metadata(path)?.modified()?;
    let secs = match modified.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    };
    Ok(secs)
}

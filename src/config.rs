// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-user settings from `~/.biblookrc`.
//!
//! The file is JSON with every key optional:
//!
//! ```json
//! {
//!   "search_path": "~/tex/bib:/usr/share/bib",
//!   "index_dir": "/home/me/.cache/bix",
//!   "verbosity": 2,
//!   "pager": "less",
//!   "update": true,
//!   "ignore_fields": ["abstract", "url"],
//!   "indexer": "/usr/local/bin/biblook"
//! }
//! ```
//!
//! Command-line flags win over the environment (`BIBINPUTS`, `PAGER`), which
//! wins over this file, which wins over the built-in defaults. The
//! environment step is handled by the argument parser, so each accessor here
//! just takes the flag value and falls back.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::build::split_search_path;
use crate::error::ConfigError;

/// Config file name, looked for in `$HOME`.
pub const CONFIG_FILE: &str = ".biblookrc";

/// Pager used when nothing else is configured.
pub const DEFAULT_PAGER: &str = "more";

/// Errors only.
pub const DEFAULT_VERBOSITY: u8 = 1;

/// Highest meaningful verbosity (statistics).
pub const MAX_VERBOSITY: u8 = 3;

/// Settings read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub search_path: Option<String>,
    pub index_dir: Option<PathBuf>,
    pub verbosity: Option<u8>,
    pub pager: Option<String>,
    pub update: Option<bool>,
    pub ignore_fields: Vec<String>,
    pub indexer: Option<PathBuf>,
}

impl Config {
    /// `$HOME/.biblookrc`, if `HOME` is set.
    pub fn default_path() -> Option<PathBuf> {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))
    }

    /// Parse config text; `path` is only used in errors.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Directories to search, from the flag (or `BIBINPUTS`), else the file,
    /// else the current directory.
    pub fn search_dirs(&self, flag: Option<&str>) -> Vec<PathBuf> {
        split_search_path(flag.or(self.search_path.as_deref()).unwrap_or("."))
    }

    pub fn index_dir(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf).or_else(|| self.index_dir.clone())
    }

    /// Verbosity 0-3; larger values are clamped.
    pub fn verbosity(&self, flag: Option<u8>) -> u8 {
        flag.or(self.verbosity)
            .unwrap_or(DEFAULT_VERBOSITY)
            .min(MAX_VERBOSITY)
    }

    pub fn pager(&self, flag: Option<&str>) -> String {
        flag.or(self.pager.as_deref())
            .unwrap_or(DEFAULT_PAGER)
            .to_string()
    }

    /// Whether stale indexes are rebuilt. On unless disabled by either the
    /// flag or the file.
    pub fn update(&self, no_update: bool) -> bool {
        !no_update && self.update.unwrap_or(true)
    }

    /// Fields from the file plus those given on the command line.
    pub fn ignore_fields(&self, flag: &[String]) -> Vec<String> {
        let mut fields: Vec<String> = self
            .ignore_fields
            .iter()
            .chain(flag)
            .map(|f| f.trim().to_ascii_lowercase())
            .filter(|f| !f.is_empty())
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }

    /// Program that rebuilds stale indexes: the configured one, else this
    /// executable.
    pub fn indexer(&self) -> PathBuf {
        self.indexer
            .clone()
            .or_else(|| env::current_exe().ok())
            .unwrap_or_else(|| PathBuf::from("biblook"))
    }
}

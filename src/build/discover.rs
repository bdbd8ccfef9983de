// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search-path handling: where sources and indexes live.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of bibliography sources.
pub const SOURCE_EXT: &str = "bib";

/// Extension of finished index files.
pub const INDEX_EXT: &str = "bix";

/// Extension of an index still being written.
pub const TEMP_EXT: &str = "tbx";

/// Split a colon-separated search path into directories.
///
/// Elements are trimmed and empty ones dropped. An empty path means the
/// current directory, and `.` is expanded to it.
pub fn split_search_path(path: &str) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = path
        .split(':')
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .map(expand_dot)
        .collect();
    if dirs.is_empty() {
        dirs.push(expand_dot("."));
    }
    dirs
}

fn expand_dot(dir: &str) -> PathBuf {
    if dir == "." {
        if let Ok(cwd) = env::current_dir() {
            return cwd;
        }
    }
    PathBuf::from(dir)
}

/// Every file with extension `ext` directly inside `dirs`, sorted by name
/// within each directory, directories in the order given.
///
/// Unreadable directories are skipped.
pub fn files_with_extension(dirs: &[PathBuf], ext: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for dir in dirs {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!("skipping {}: {err}", dir.display());
                continue;
            }
        };
        let mut here: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == ext))
            .collect();
        here.sort();
        found.extend(here);
    }
    found
}

/// `name` with extension `ext` added unless it already has it.
pub fn with_extension(name: &str, ext: &str) -> PathBuf {
    let path = PathBuf::from(name);
    if path.extension().is_some_and(|e| e == ext) {
        path
    } else {
        PathBuf::from(format!("{name}.{ext}"))
    }
}

/// Locate `name` (extension `ext` implied) in the search directories.
///
/// A name with a directory component is only looked for where it says.
pub fn resolve(name: &str, dirs: &[PathBuf], ext: &str) -> Option<PathBuf> {
    let file = with_extension(name, ext);
    if has_directory(&file) {
        return file.is_file().then_some(file);
    }
    dirs.iter()
        .map(|dir| dir.join(&file))
        .find(|candidate| candidate.is_file())
}

fn has_directory(path: &Path) -> bool {
    path.parent().is_some_and(|p| !p.as_os_str().is_empty())
}

/// Where the index for `source` goes: `index_dir` if given, else next to the
/// source.
pub fn index_path(source: &Path, index_dir: Option<&Path>) -> PathBuf {
    let stem = source.file_stem().unwrap_or(source.as_os_str());
    let dir = index_dir
        .map(Path::to_path_buf)
        .or_else(|| source.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    // Append rather than set_extension, which would eat a dotted stem.
    dir.join(format!("{}.{INDEX_EXT}", stem.to_string_lossy()))
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction.
//!
//! A [`BuildSession`] owns everything one source file needs while it is
//! being indexed: the field tables, the record offsets, and the list of
//! ignored fields. Records are numbered in source order as they are parsed.
//! Macro definitions take no number. When the source is done the session
//! compacts and sorts its tables into an [`IndexFile`].
//!
//! [`build_index`] wraps one session with the file handling: it stamps the
//! index with the source's modification time and publishes it by writing
//! `<name>.tbx` and renaming that over `<name>.bix`, so an interrupted or
//! failed build leaves any previous index in place. [`run_build`] loops over
//! several sources. A failure in one file is reported and the rest proceed.

pub mod discover;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::binary::{IndexFile, IndexHeader, MAX_WORD};
use crate::error::{BuildError, IndexError};
use crate::host::modified_secs;
use crate::parse::{Record, RecordKind, RecordParser};
use crate::tables::FieldTables;

pub use discover::{
    files_with_extension, index_path, resolve, split_search_path, INDEX_EXT, SOURCE_EXT, TEMP_EXT,
};

/// Shortest word worth indexing.
pub const MIN_WORD: usize = 2;

/// How much of an oversized word to show in a warning.
const WARN_PREFIX: usize = 30;

/// Settings shared by every file in one run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Directories searched for sources named without a directory.
    pub search_dirs: Vec<PathBuf>,
    /// Where indexes are written; next to each source when unset.
    pub index_dir: Option<PathBuf>,
    /// Fields whose words are never indexed.
    pub ignore_fields: Vec<String>,
    /// Show a progress bar when indexing several files.
    pub progress: bool,
}

/// Counts from one finished build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub records: usize,
    pub fields: usize,
    pub words: usize,
    pub postings: usize,
    pub growths: usize,
    pub skipped_words: usize,
    pub skipped_fields: usize,
}

/// Result of indexing one source file.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub source: PathBuf,
    pub index: PathBuf,
    pub stats: BuildStats,
}

// ============================================================================
// BUILD SESSION
// ============================================================================

/// Mutable state for indexing one source.
#[derive(Debug)]
pub struct BuildSession {
    source: PathBuf,
    tables: FieldTables,
    offsets: Vec<u64>,
    skipped_words: usize,
    skipped_fields: usize,
}

impl BuildSession {
    /// Start a session for `source`, with `ignore_fields` registered as
    /// sinks up front.
    pub fn new(source: &Path, ignore_fields: &[String]) -> Result<Self, BuildError> {
        let mut tables = FieldTables::new();
        for name in ignore_fields {
            tables
                .ignore(&name.to_ascii_lowercase())
                .map_err(|source_err| BuildError::Table {
                    path: source.to_path_buf(),
                    source: source_err,
                })?;
        }
        Ok(Self {
            source: source.to_path_buf(),
            tables,
            offsets: Vec::new(),
            skipped_words: 0,
            skipped_fields: 0,
        })
    }

    /// Records numbered so far.
    pub fn record_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn tables(&self) -> &FieldTables {
        &self.tables
    }

    /// Parse all of `text` and add its records.
    pub fn index_source(&mut self, text: &[u8]) -> Result<(), BuildError> {
        let mut parser = RecordParser::new(text);
        while let Some(record) = parser.next_record().map_err(|err| BuildError::Parse {
            path: self.source.clone(),
            source: err,
        })? {
            self.add_record(&record)?;
        }
        tracing::debug!(
            "{}: {} macros defined",
            self.source.display(),
            parser.macros().len()
        );
        Ok(())
    }

    /// Number `record` and index its field words.
    pub fn add_record(&mut self, record: &Record) -> Result<(), BuildError> {
        if record.kind == RecordKind::StringDef {
            return Ok(());
        }

        let number = self.offsets.len() as u32;
        self.offsets.push(record.offset);

        for field in &record.fields {
            if !field.name.is_ascii() {
                self.skipped_fields += 1;
                tracing::warn!(
                    "{}: record at line {}: non-ASCII field name, skipped: {}",
                    self.source.display(),
                    record.line,
                    field.name
                );
                continue;
            }
            for word in field.words() {
                if word.len() < MIN_WORD {
                    continue;
                }
                if word.len() >= MAX_WORD {
                    self.skipped_words += 1;
                    let shown: String = word.chars().take(WARN_PREFIX).collect();
                    tracing::warn!(
                        "{}: record at line {}: word too long, skipped: {shown}...",
                        self.source.display(),
                        record.line
                    );
                    continue;
                }
                self.tables
                    .insert(&field.name, word, number)
                    .map_err(|err| BuildError::Table {
                        path: self.source.clone(),
                        source: err,
                    })?;
            }
        }
        Ok(())
    }

    /// Compact and sort into an index stamped with `mtime`.
    pub fn finish(self, mtime: i64) -> Result<(IndexFile, BuildStats), BuildError> {
        let header = IndexHeader::new(&self.source).map_err(|err| BuildError::Write {
            path: self.source.clone(),
            source: err,
        })?;

        let growths = self.tables.iter().map(|t| t.growths()).sum();
        let fields = self.tables.into_sorted();
        let index = IndexFile {
            header,
            mtime,
            offsets: self.offsets,
            fields,
        };

        let stats = BuildStats {
            records: index.record_count(),
            fields: index.fields.len(),
            words: index.word_count(),
            postings: index.posting_count(),
            growths,
            skipped_words: self.skipped_words,
            skipped_fields: self.skipped_fields,
        };
        Ok((index, stats))
    }
}

// ============================================================================
// FILE-LEVEL BUILD
// ============================================================================

/// Index one source file and publish `<name>.bix`.
pub fn build_index(source: &Path, options: &BuildOptions) -> Result<BuildSummary, BuildError> {
    let read_err = |err: io::Error| {
        if err.kind() == io::ErrorKind::NotFound {
            BuildError::NotFound(source.to_path_buf())
        } else {
            BuildError::Read {
                path: source.to_path_buf(),
                source: err,
            }
        }
    };

    let mtime = modified_secs(source).map_err(read_err)?;
    let text = fs::read(source).map_err(read_err)?;
    let stored = fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());

    tracing::info!("indexing {}", stored.display());
    let mut session = BuildSession::new(&stored, &options.ignore_fields)?;
    session.index_source(&text)?;
    let (index, stats) = session.finish(mtime)?;

    let target = index_path(&stored, options.index_dir.as_deref());
    publish(&index, &target)?;

    tracing::debug!(
        "{}: {} records, {} fields, {} words, {} postings, {} table growths",
        target.display(),
        stats.records,
        stats.fields,
        stats.words,
        stats.postings,
        stats.growths
    );

    Ok(BuildSummary {
        source: stored,
        index: target,
        stats,
    })
}

/// Write to the temporary name, then rename over `target`.
fn publish(index: &IndexFile, target: &Path) -> Result<(), BuildError> {
    let temp = target.with_extension(TEMP_EXT);
    let result = index
        .write_to(&temp)
        .and_then(|()| fs::rename(&temp, target).map_err(IndexError::from));
    if let Err(err) = result {
        let _ = fs::remove_file(&temp);
        return Err(BuildError::Write {
            path: target.to_path_buf(),
            source: err,
        });
    }
    Ok(())
}

/// Outcome of a multi-file run.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub built: Vec<BuildSummary>,
    pub failed: usize,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Create a progress style for the build bar
#[cfg(feature = "progress")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .map(|style| style.progress_chars("━━╸"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Index each named source, or every `.bib` in the search directories when
/// `names` is empty.
///
/// Errors are logged per file and counted; they never stop the run.
pub fn run_build(names: &[String], options: &BuildOptions) -> BuildReport {
    let mut report = BuildReport::default();

    let sources: Vec<Result<PathBuf, BuildError>> = if names.is_empty() {
        files_with_extension(&options.search_dirs, SOURCE_EXT)
            .into_iter()
            .map(Ok)
            .collect()
    } else {
        names
            .iter()
            .map(|name| {
                resolve(name, &options.search_dirs, SOURCE_EXT)
                    .ok_or_else(|| BuildError::NotFound(PathBuf::from(name)))
            })
            .collect()
    };

    #[cfg(feature = "progress")]
    let bar = (options.progress && sources.len() > 1).then(|| {
        let bar = ProgressBar::new(sources.len() as u64);
        bar.set_style(create_progress_style());
        bar.set_prefix("Indexing");
        bar
    });

    for source in sources {
        #[cfg(feature = "progress")]
        if let (Some(bar), Ok(path)) = (&bar, &source) {
            bar.set_message(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        }

        match source.and_then(|path| build_index(&path, options)) {
            Ok(summary) => report.built.push(summary),
            Err(err) => {
                tracing::error!("{err}");
                report.failed += 1;
            }
        }

        #[cfg(feature = "progress")]
        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }

    #[cfg(feature = "progress")]
    if let Some(bar) = bar {
        bar.finish_with_message(format!("{} indexed", report.built.len()));
    }

    report
}

//! Multi-word boolean lookup over BibTeX files.
//!
//! Building scans a `.bib` file once, records where each entry starts, and
//! collects every word of every field into per-field inverted lists. The
//! result is written as a compact `.bix` index next to the source. Querying
//! loads one or more indexes, answers "records containing all of these words"
//! with bitmap set algebra, and prints the matching entries verbatim from the
//! source.
//!
//! # Architecture
//!
//! ```text
//! build:   ┌──────────┐     ┌──────────┐     ┌──────────┐
//!  .bib ──▶│  parse   │────▶│  tables  │────▶│  binary  │──▶ .bix
//!          │ (records,│     │ (double- │     │ (sorted, │
//!          │  macros) │     │  hashed) │     │  LE)     │
//!          └──────────┘     └──────────┘     └──────────┘
//!
//! query:   ┌──────────┐     ┌──────────┐     ┌──────────┐
//!  .bix ──▶│  open    │────▶│  engine  │────▶│ retrieve │──▶ records
//!          │ (stale?  │     │ (AND of  │     │ (seek +  │
//!          │ rebuild) │     │  ORs)    │     │  echo)   │
//!          └──────────┘     └──────────┘     └──────────┘
//! ```
//!
//! | Module   | Role                                                   |
//! |----------|--------------------------------------------------------|
//! | `parse`  | Record parser, TeX stripping, `@string` macros         |
//! | `tables` | Extendible open-addressing tables used while building  |
//! | `binary` | Index file format: writer and validating loader        |
//! | `build`  | Build sessions, `.tbx` → `.bix` publication            |
//! | `query`  | Index opening, result sets, record retrieval           |
//! | `host`   | Running programs and reading file times                |
//! | `config` | `~/.biblookrc`                                          |
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use biblook::build::{build_index, BuildOptions};
//! use biblook::host::SystemHost;
//! use biblook::query::{open_index, parse_query, OpenOptions, QueryEngine, QueryOutcome};
//!
//! let built = build_index(Path::new("refs.bib"), &BuildOptions::default())?;
//!
//! let options = OpenOptions {
//!     search_dirs: vec![".".into()],
//!     update: true,
//!     indexer: "biblook".into(),
//! };
//! let loaded = open_index("refs", &options, &SystemHost)?;
//! let mut engine = QueryEngine::new(vec![loaded]);
//! if let QueryOutcome::Matches(groups) = engine.evaluate(&parse_query("graph search*", false)) {
//!     println!("{} records from {}", groups.len(), built.index.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod binary;
pub mod build;
pub mod config;
pub mod error;
pub mod host;
pub mod parse;
pub mod query;
pub mod tables;
pub mod testing;

pub use binary::{IndexFile, IndexHeader, Version};
pub use build::{build_index, run_build, BuildOptions, BuildSession};
pub use config::Config;
pub use error::{BuildError, ConfigError, IndexError, ParseError, QueryError, TableError};
pub use host::{Host, SystemHost};
pub use parse::{Record, RecordParser};
pub use query::{parse_query, QueryEngine, QueryOutcome, QueryWord};
pub use tables::{FieldIndex, FieldTable, FieldTables, WordEntry};

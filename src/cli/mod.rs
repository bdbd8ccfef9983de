// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the biblook command-line interface.
//!
//! Three subcommands: `index` to build `.bix` indexes from `.bib` sources,
//! `lookup` to query them (interactively, or once with `-q`), and `inspect`
//! to examine an index file. Unset flags fall back to the environment, then
//! to `~/.biblookrc`, then to built-in defaults.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "biblook",
    about = "Index BibTeX files and look up records by the words they contain",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build indexes for bibliography files
    Index {
        /// Colon-separated directories to search for sources
        #[arg(short = 's', long = "search", env = "BIBINPUTS")]
        search_path: Option<String>,

        /// Directory to write indexes into (default: next to each source)
        #[arg(short = 'w', long = "write-dir")]
        index_dir: Option<PathBuf>,

        /// Verbosity: 0 silent, 1 errors, 2 progress, 3 statistics
        #[arg(short = 'p', long = "verbosity")]
        verbosity: Option<u8>,

        /// Fields whose words are never indexed
        #[arg(long = "ignore", value_delimiter = ',')]
        ignore: Vec<String>,

        /// Sources to index (default: every .bib in the search directories)
        files: Vec<String>,
    },

    /// Look up records containing all of the given words
    Lookup {
        /// Colon-separated directories to search for indexes
        #[arg(short = 's', long = "search", env = "BIBINPUTS")]
        search_path: Option<String>,

        /// Program used to page results
        #[arg(short = 'd', long = "pager", env = "PAGER")]
        pager: Option<String>,

        /// Verbosity: 0 silent, 1 errors, 2 progress, 3 statistics
        #[arg(short = 'p', long = "verbosity")]
        verbosity: Option<u8>,

        /// Skip stale indexes instead of rebuilding them
        #[arg(long)]
        no_update: bool,

        /// Treat every query word as a prefix
        #[arg(long)]
        prefix: bool,

        /// Run a single query instead of prompting
        #[arg(short = 'q', long)]
        query: Option<String>,

        /// Indexes to open (default: every .bix in the search directories)
        files: Vec<String>,
    },

    /// Inspect a .bix file
    Inspect {
        /// Path to .bix file
        file: PathBuf,
    },
}

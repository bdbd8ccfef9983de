// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use biblook::build::{files_with_extension, run_build, BuildOptions, INDEX_EXT};
use biblook::config::Config;
use biblook::error::ConfigError;
use biblook::host::{Host, SystemHost};
use biblook::query::{
    open_index, parse_query, unmatched_report, write_matches, OpenOptions, QueryEngine,
    QueryOutcome,
};
use biblook::IndexFile;

mod cli;
use cli::{Cli, Commands};

/// Prompt shown before each interactive query.
const PROMPT: &str = ": ";

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (config, config_err) = load_config();

    match cli.command {
        Commands::Index {
            search_path,
            index_dir,
            verbosity,
            ignore,
            files,
        } => {
            let verbosity = config.verbosity(verbosity);
            init_logging(verbosity, config_err);
            let options = BuildOptions {
                search_dirs: config.search_dirs(search_path.as_deref()),
                index_dir: config.index_dir(index_dir.as_deref()),
                ignore_fields: config.ignore_fields(&ignore),
                progress: verbosity >= 2 && atty::is(atty::Stream::Stderr),
            };
            run_index(&files, &options)
        }
        Commands::Lookup {
            search_path,
            pager,
            verbosity,
            no_update,
            prefix,
            query,
            files,
        } => {
            let verbosity = config.verbosity(verbosity);
            init_logging(verbosity, config_err);
            let session = Lookup {
                options: OpenOptions {
                    search_dirs: config.search_dirs(search_path.as_deref()),
                    update: config.update(no_update),
                    indexer: config.indexer(),
                },
                pager: config.pager(pager.as_deref()),
                all_prefix: prefix,
                verbose: verbosity > 0,
                paging: atty::is(atty::Stream::Stdout),
            };
            match session.run(&files, query.as_deref(), &SystemHost) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    tracing::error!("{err}");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Inspect { file } => {
            init_logging(config.verbosity(None), config_err);
            inspect_index_file(&file)
        }
    }
}

fn load_config() -> (Config, Option<ConfigError>) {
    let Some(path) = Config::default_path() else {
        return (Config::default(), None);
    };
    match Config::load(&path) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    }
}

/// Route `tracing` output to stderr at the level `verbosity` asks for.
fn init_logging(verbosity: u8, config_err: Option<ConfigError>) {
    let level = match verbosity {
        0 => None,
        1 => Some(Level::ERROR),
        2 => Some(Level::INFO),
        _ => Some(Level::DEBUG),
    };
    if let Some(level) = level {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .without_time()
            .with_target(false)
            .init();
    }
    if let Some(err) = config_err {
        tracing::error!("{err}; using defaults");
    }
}

fn run_index(files: &[String], options: &BuildOptions) -> ExitCode {
    let report = run_build(files, options);
    let records: usize = report.built.iter().map(|s| s.stats.records).sum();
    tracing::info!(
        "indexed {} files ({} records), {} failed",
        report.built.len(),
        records,
        report.failed
    );
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ============================================================================
// LOOKUP
// ============================================================================

struct Lookup {
    options: OpenOptions,
    pager: String,
    all_prefix: bool,
    verbose: bool,
    /// Hand results to the pager instead of writing them straight out.
    paging: bool,
}

impl Lookup {
    fn run(
        &self,
        files: &[String],
        query: Option<&str>,
        host: &dyn Host,
    ) -> Result<(), biblook::QueryError> {
        let names: Vec<String> = if files.is_empty() {
            files_with_extension(&self.options.search_dirs, INDEX_EXT)
                .into_iter()
                .map(|p| p.display().to_string())
                .collect()
        } else {
            files.to_vec()
        };

        let mut loaded = Vec::new();
        for name in &names {
            match open_index(name, &self.options, host) {
                Ok(index) => {
                    tracing::info!(
                        "opened {} ({} records)",
                        index.path.display(),
                        index.record_count()
                    );
                    loaded.push(index);
                }
                Err(err) if err.is_session_fatal() => return Err(err),
                Err(err) => tracing::error!("{err}"),
            }
        }

        if loaded.is_empty() {
            tracing::error!("No index files found.");
            return Ok(());
        }

        let mut engine = QueryEngine::new(loaded);
        if let Some(query) = query {
            return self.answer(&mut engine, query, host, &mut io::stdout().lock());
        }

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut line = String::new();
        loop {
            write!(stdout, "{PROMPT}")?;
            stdout.flush()?;
            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                writeln!(stdout)?;
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }
            self.answer(&mut engine, &line, host, &mut stdout)?;
        }
    }

    fn answer(
        &self,
        engine: &mut QueryEngine,
        line: &str,
        host: &dyn Host,
        out: &mut dyn Write,
    ) -> Result<(), biblook::QueryError> {
        let words = parse_query(line, self.all_prefix);
        if words.is_empty() {
            return Ok(());
        }

        match engine.evaluate(&words) {
            QueryOutcome::Unmatched(words) => {
                if self.verbose {
                    writeln!(out, "{}\n", unmatched_report(&words))?;
                }
                Ok(())
            }
            QueryOutcome::Matches(groups) => {
                if groups.is_empty() {
                    return Ok(());
                }
                if self.paging {
                    self.page(engine, &groups, host, out)
                } else {
                    write_matches(engine.indexes(), &groups, out)?;
                    out.flush()?;
                    Ok(())
                }
            }
        }
    }

    /// Write results to a temporary file and show it through the pager.
    /// If the pager can't be started the file goes to `out` instead.
    fn page(
        &self,
        engine: &QueryEngine,
        groups: &[biblook::query::IndexMatches],
        host: &dyn Host,
        out: &mut dyn Write,
    ) -> Result<(), biblook::QueryError> {
        let mut file = tempfile::Builder::new().prefix("biblook").tempfile()?;
        write_matches(engine.indexes(), groups, file.as_file_mut())?;
        file.as_file_mut().flush()?;

        let mut parts = self.pager.split_whitespace();
        let program = parts.next().unwrap_or(biblook::config::DEFAULT_PAGER);
        let mut args: Vec<OsString> = parts.map(OsString::from).collect();
        args.push(file.path().as_os_str().to_os_string());

        match host.run(OsStr::new(program), &args) {
            Ok(true) => {}
            Ok(false) => tracing::error!("{program} exited unsuccessfully"),
            Err(err) => {
                tracing::error!("can't run {program}: {err}");
                out.write_all(&fs::read(file.path())?)?;
            }
        }
        writeln!(out)?;
        Ok(())
    }
}

// ============================================================================
// INSPECT
// ============================================================================

fn inspect_index_file(path: &Path) -> ExitCode {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!("can't read {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };
    let index = match IndexFile::from_bytes(&bytes) {
        Ok(index) => index,
        Err(err) => {
            tracing::error!("{}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let colored = cli::display::use_colors();
    for line in cli::display::inspect_report(path, &index, bytes.len(), colored) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}

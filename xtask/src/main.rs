//! Custom cargo commands for the biblook crate.
//!
//! Usage:
//!   cargo xtask verify    - Run full verification suite
//!   cargo xtask test      - Run all tests
//!   cargo xtask check     - Quick check (check + test + clippy)
//!   cargo xtask bench     - Run benchmarks
//!   cargo xtask fuzz      - Run each fuzz target briefly

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

/// Fuzz targets under fuzz/fuzz_targets.
const FUZZ_TARGETS: &[&str] = &["index_loading", "record_parsing"];

/// Seconds per fuzz target in `cargo xtask fuzz`.
const FUZZ_SECONDS: u32 = 60;

fn main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("check") => check()?,
        Some("bench") => bench()?,
        Some("fuzz") => fuzz()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify    Run full verification suite (tests + clippy + format limits)
  test      Run all Rust tests
  check     Quick check (cargo check + test + clippy)
  bench     Run benchmarks
  fuzz      Run each fuzz target for {FUZZ_SECONDS}s (needs nightly + cargo-fuzz)
"#
    );
}

/// Full verification suite
fn verify() -> Result<()> {
    println!("==========================================");
    println!("biblook Verification Suite");
    println!("==========================================\n");

    println!("[1/4] Checking format limits...");
    verify_constants()?;
    println!("✓ Limits fit the on-disk encoding\n");

    println!("[2/4] Running Rust tests...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ All Rust tests passed\n");

    println!("[3/4] Testing without default features...");
    run_cargo(&["test", "--quiet", "--no-default-features"])?;
    println!("✓ Tests pass without progress bars\n");

    println!("[4/4] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--all-targets", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    println!("==========================================");
    println!("✓ ALL VERIFICATION CHECKS PASSED");
    println!("==========================================");

    Ok(())
}

/// Run all tests
fn test() -> Result<()> {
    run_cargo(&["test"])
}

/// Quick check
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check", "--all-targets"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Run benchmarks
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

/// Run every fuzz target for a fixed time
fn fuzz() -> Result<()> {
    let fuzz_dir = project_root()?.join("fuzz");
    for target in FUZZ_TARGETS {
        println!("Fuzzing {target} for {FUZZ_SECONDS}s...");
        let status = Command::new("cargo")
            .args(["+nightly", "fuzz", "run", target, "--"])
            .arg(format!("-max_total_time={FUZZ_SECONDS}"))
            .current_dir(&fuzz_dir)
            .status()
            .with_context(|| format!("Failed to run cargo fuzz for {target}"))?;
        if !status.success() {
            bail!("fuzz target {target} failed");
        }
    }
    Ok(())
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("no current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}

/// Strings and the field count are stored behind a single length byte, so
/// the limits in header.rs must stay below 256.
fn verify_constants() -> Result<()> {
    let root = project_root()?;
    let header_rs = std::fs::read_to_string(root.join("src/binary/header.rs"))
        .context("Failed to read src/binary/header.rs")?;

    for name in ["MAX_WORD", "MAX_FIELDS"] {
        let value = extract_const(&header_rs, name)
            .with_context(|| format!("{name} not found in header.rs"))?;
        if value > 255 {
            bail!("{name} = {value} does not fit in a length byte");
        }
        println!("  {name} = {value}");
    }

    Ok(())
}

fn extract_const(content: &str, name: &str) -> Option<u64> {
    // Look for "pub const MAX_WORD: usize = 100;"
    let prefix = format!("pub const {name}:");
    content
        .lines()
        .find(|line| line.trim_start().starts_with(&prefix))
        .and_then(|line| line.split('=').nth(1))
        .map(|value| value.trim().trim_end_matches(';').replace('_', ""))
        .and_then(|value| value.parse().ok())
}

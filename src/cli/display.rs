// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the biblook CLI.
//!
//! Box drawing for `inspect` and a few formatters. Colors are plain ANSI and
//! only used when stdout is a terminal and `NO_COLOR` is unset.
//!
//! Every drawing function returns the line instead of printing it, so the
//! whole report can be checked in tests and written wherever the caller likes.

use std::path::Path;

use biblook::binary::IndexFile;

// Box drawing constants - width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 72;

// ═══════════════════════════════════════════════════════════════════════════
// COLORS
// ═══════════════════════════════════════════════════════════════════════════

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

pub use colors::*;

/// Check if colors should be used (TTY detection)
pub fn use_colors() -> bool {
    // Respect NO_COLOR standard
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Apply styles when `colored`, otherwise return plain text
pub fn styled(colored: bool, styles: &[&str], text: &str) -> String {
    if colored {
        format!("{}{}{}", styles.join(""), text, RESET)
    } else {
        text.to_string()
    }
}

/// Calculate visible length (excluding ANSI codes)
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// Box renderer with a fixed color decision.
#[derive(Debug, Clone, Copy)]
pub struct Boxes {
    pub colored: bool,
}

impl Boxes {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn border(&self, s: &str) -> String {
        styled(self.colored, &[GRAY], s)
    }

    /// Content line: │ content          │
    pub fn row(&self, content: &str) -> String {
        let pad = BOX_WIDTH.saturating_sub(visible_len(content));
        format!(
            "{}{}{}{}",
            self.border("│"),
            content,
            " ".repeat(pad),
            self.border("│")
        )
    }

    /// Section header: ┌─ LABEL ──────────┐
    pub fn top(&self, label: &str) -> String {
        self.labelled('┌', '┐', label)
    }

    /// Section divider: ├─ LABEL ──────────┤
    pub fn mid(&self, label: &str) -> String {
        self.labelled('├', '┤', label)
    }

    /// Section footer: └──────────────────┘
    pub fn bottom(&self) -> String {
        self.border(&format!("└{}┘", "─".repeat(BOX_WIDTH)))
    }

    fn labelled(&self, left: char, right: char, label: &str) -> String {
        let label_part = format!(" {} ", styled(self.colored, &[BOLD, CYAN], label));
        let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part) + 1);
        format!(
            "{}{}{}",
            self.border(&format!("{left}─")),
            label_part,
            self.border(&format!("{}{right}", "─".repeat(remaining)))
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Left-pad a styled string to a fixed visible width
pub fn pad_left(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - visible), s)
    }
}

/// Right-pad a styled string to a fixed visible width
pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Truncate a path to max_len, adding ... prefix if needed
pub fn truncate_path(path: &str, max_len: usize) -> String {
    let count = path.chars().count();
    if count <= max_len {
        path.to_string()
    } else {
        let keep = max_len.saturating_sub(3);
        let tail: String = path.chars().skip(count - keep).collect();
        format!("...{tail}")
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT REPORT
// ═══════════════════════════════════════════════════════════════════════════

/// Lines describing `index`, read from `path` (`file_len` bytes).
pub fn inspect_report(path: &Path, index: &IndexFile, file_len: usize, colored: bool) -> Vec<String> {
    let b = Boxes::new(colored);
    let label_width = 12;
    let kv = |key: &str, value: &str| {
        b.row(&format!(
            " {} {}",
            pad_right(&styled(colored, &[DIM], key), label_width),
            truncate_path(value, BOX_WIDTH - label_width - 3)
        ))
    };

    let mut lines = vec![
        b.top("INDEX"),
        kv("file", &path.display().to_string()),
        kv("size", &format_size(file_len)),
        kv("version", &index.header.version.to_string()),
        kv("source", &index.header.source),
        kv("mtime", &index.mtime.to_string()),
        kv("records", &index.record_count().to_string()),
        b.mid("FIELDS"),
        b.row(&format!(
            " {}{}{}",
            pad_right(&styled(colored, &[BOLD], "field"), 24),
            pad_left(&styled(colored, &[BOLD], "words"), 12),
            pad_left(&styled(colored, &[BOLD], "postings"), 12)
        )),
    ];

    for field in &index.fields {
        let postings: usize = field.words.iter().map(|w| w.postings().len()).sum();
        lines.push(b.row(&format!(
            " {}{}{}",
            pad_right(&styled(colored, &[GREEN], &field.name), 24),
            pad_left(&field.words.len().to_string(), 12),
            pad_left(&postings.to_string(), 12)
        )));
    }
    if index.fields.is_empty() {
        lines.push(b.row(&styled(colored, &[YELLOW], " (no fields)")));
    }

    lines.push(b.row(&format!(
        " {}{}{}",
        pad_right(&styled(colored, &[BOLD], "total"), 24),
        pad_left(&index.word_count().to_string(), 12),
        pad_left(&index.posting_count().to_string(), 12)
    )));
    lines.push(b.bottom());
    lines
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Record parsing and retrieval over arbitrary source text.
//!
//! Whatever the parser accepts must index cleanly, and every record offset
//! it reports must retrieve without running off the end of the source,
//! stopping at the record's own closing bracket.

#![no_main]

use std::io::Cursor;
use std::path::Path;

use biblook::build::BuildSession;
use biblook::query::copy_record;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut session) = BuildSession::new(Path::new("fuzz.bib"), &[]) else {
        return;
    };
    if session.index_source(data).is_err() {
        return;
    }
    let Ok((index, _)) = session.finish(0) else {
        return;
    };

    let mut source = Cursor::new(data);
    for &offset in &index.offsets {
        assert_eq!(data[offset as usize], b'@');
        let mut out = Vec::new();
        assert!(
            copy_record(&mut source, offset, &mut out).is_ok(),
            "record at {offset} ran off the end of the source"
        );
        assert_eq!(out.first(), Some(&b'@'));
        assert!(matches!(out.last(), Some(b'}' | b')')));
    }
});

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index loading under adversarial input.
//!
//! A damaged or hostile `.bix` file must produce an error, never a panic or
//! an allocation sized by a lying count field.

#![no_main]

use biblook::IndexFile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(index) = IndexFile::from_bytes(data) else {
        return;
    };

    let records = index.record_count() as u32;
    for field in &index.fields {
        assert!(field.words.windows(2).all(|w| w[0].word() < w[1].word()));
        for entry in &field.words {
            let postings = entry.postings();
            assert!(postings.iter().all(|&p| p < records));
            assert!(postings.windows(2).all(|p| p[0] < p[1]));
        }
    }

    // Whatever loads must survive a re-encode.
    let bytes = index.to_bytes().expect("loaded index re-encodes");
    assert_eq!(IndexFile::from_bytes(&bytes).ok(), Some(index));
});

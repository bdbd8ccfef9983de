//! Offsets, retrieval, and encoding over generated bibliographies.

use std::io::Cursor;

use biblook::query::copy_record;
use biblook::testing::index_with_source;
use biblook::IndexFile;
use proptest::prelude::*;

use crate::bibliography::{records, render};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every record offset retrieves that record's exact text.
    #[test]
    fn prop_retrieval_reproduces_each_record(records in records()) {
        let (text, rendered) = render(&records);
        let index = index_with_source(&text, "/refs/generated.bib");
        prop_assert_eq!(index.record_count(), records.len());

        let mut source = Cursor::new(text.as_bytes());
        for (offset, expected) in index.offsets.iter().zip(&rendered) {
            let mut out = Vec::new();
            copy_record(&mut source, *offset, &mut out).unwrap();
            prop_assert_eq!(String::from_utf8(out).unwrap(), expected.as_str());
        }
    }

    /// Encoding then loading gives back the same index.
    #[test]
    fn prop_encoded_index_loads_unchanged(records in records(), mtime in any::<i64>()) {
        let (text, _) = render(&records);
        let mut index = index_with_source(&text, "/refs/generated.bib");
        index.mtime = mtime;

        let bytes = index.to_bytes().unwrap();
        prop_assert_eq!(IndexFile::from_bytes(&bytes).unwrap(), index);
    }

    /// Loading never panics on a damaged file.
    #[test]
    fn prop_damaged_index_never_panics(records in records(), at in any::<prop::sample::Index>(), byte in any::<u8>()) {
        let (text, _) = render(&records);
        let mut bytes = index_with_source(&text, "/refs/generated.bib").to_bytes().unwrap();
        let at = at.index(bytes.len());
        bytes[at] = byte;
        let _ = IndexFile::from_bytes(&bytes);
    }
}

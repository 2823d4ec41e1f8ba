//! Fuzz target for ArchiveEditor with arbitrary byte input.
//!
//! This target feeds potentially malformed or adversarial archives through
//! both substitution modes. The goal is to find panics, hangs, or memory
//! issues in the member loop.
//!
//! Run with: cargo +nightly fuzz run archive_rewrite
//!
//! The first byte selects the mode and the search string, the rest is the
//! archive.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use zipfnr::edit::{ArchiveEditor, Substitution};
use zipfnr::progress::NoProgress;
use zipfnr::{DecodePolicy, RewriteOptions};

const PATTERNS: &[&str] = &["a", "txt", "/", ".", "\u{e9}"];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, archive)) = data.split_first() else {
        return;
    };
    let find = PATTERNS[selector as usize % PATTERNS.len()];
    let substitution = if selector & 0x80 == 0 {
        match Substitution::text(find, "REPLACED") {
            Ok(sub) => sub,
            Err(_) => return,
        }
    } else {
        Substitution::filename(find, "")
    };

    // We don't care about the result - we're looking for panics or hangs
    let Ok(mut editor) = ArchiveEditor::open(Cursor::new(archive)) else {
        return;
    };
    let _ = editor.plan(&substitution);

    let Ok(editor) = ArchiveEditor::open(Cursor::new(archive)) else {
        return;
    };
    let editor = editor.with_options(RewriteOptions::new().decode_policy(DecodePolicy::Skip));
    let _ = editor.apply(Cursor::new(Vec::new()), &substitution, &mut NoProgress);
});

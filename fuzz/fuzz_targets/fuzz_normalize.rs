#![no_main]

use jsonschema_arena_core::{normalize_document, NormalizeOptions};
use libfuzzer_sys::fuzz_target;

// Accepts arbitrary bytes, attempts to parse as JSON, feeds to normalize_document().
// Goal: no panics, even on malformed arenas (dangling keys, alias cycles,
// hand-made parent links). Errors are fine.
fuzz_target!(|data: &[u8]| {
    if let Ok(document) = serde_json::from_slice::<serde_json::Value>(data) {
        let options = NormalizeOptions {
            max_iterations: 16,
            ..NormalizeOptions::default()
        };
        let _ = normalize_document(&document, &options);
    }
});

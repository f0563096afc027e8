#![no_main]

use libfuzzer_sys::fuzz_target;
use mcequery_core::{lint, resolve_scope, LintOptions};

fuzz_target!(|data: &[u8]| {
    if let Ok(sql) = std::str::from_utf8(data) {
        let diagnostics = lint(sql, &LintOptions::default().with_known_tables(&["Master List"]));
        for diagnostic in &diagnostics {
            assert!(diagnostic.end_index <= sql.len());
        }
        let _ = resolve_scope(sql);
    }
});

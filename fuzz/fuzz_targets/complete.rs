#![no_main]

use libfuzzer_sys::fuzz_target;
use mcequery_core::{complete, CompletionRequest, StaticMetadata, TableSource};

fuzz_target!(|data: &[u8]| {
    let Some((&cursor, rest)) = data.split_first() else {
        return;
    };
    let Ok(sql) = std::str::from_utf8(rest) else {
        return;
    };

    let request = CompletionRequest::new(sql, usize::from(cursor))
        .explicit()
        .with_tables(vec![TableSource::new("Contacts"), TableSource::shared("Shared DE")]);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let items = runtime.block_on(complete(&request, &StaticMetadata::new()));
    for item in &items {
        assert!(item.replace_offsets.end_offset <= sql.len());
    }
});

//! Completion item output.

use mcequery_core::CompletionItem;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Render completion items as a table in the order the engine returned them.
pub fn format_completion_table(file: &str, items: &[CompletionItem]) -> String {
    if items.is_empty() {
        return format!("== [{file}]\nNo completions.\n");
    }
    let mut builder = Builder::default();
    builder.push_record(["Label", "Kind", "Insert", "Detail", "Replace"]);
    for item in items {
        builder.push_record([
            item.label.clone(),
            item.kind.as_str().to_string(),
            item.insert_text.clone(),
            item.detail.clone().unwrap_or_default(),
            format!(
                "{}..{}",
                item.replace_offsets.start_offset, item.replace_offsets.end_offset
            ),
        ]);
    }
    format!(
        "== [{file}]\n{}\n",
        builder.build().with(Style::rounded())
    )
}

pub fn format_completion_json(items: &[CompletionItem], compact: bool) -> String {
    super::to_json(items, compact)
}

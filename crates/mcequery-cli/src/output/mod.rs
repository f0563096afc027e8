//! Output formatting modules.

pub mod completion;
pub mod lint;
pub mod schema;

pub use completion::{format_completion_json, format_completion_table};
pub use lint::{format_lint_json, format_lint_results, FileLintResult, LintIssue};
pub use schema::{format_schema_json, format_schema_table, FileSchemaResult};

/// Serialize `value` as pretty or compact JSON.
pub(crate) fn to_json<T: serde::Serialize + ?Sized>(value: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.unwrap_or_default()
}

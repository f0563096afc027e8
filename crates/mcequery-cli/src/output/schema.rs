//! Inferred schema output.

use mcequery_core::InferredField;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Schema inference outcome for one input.
#[derive(Serialize)]
pub struct FileSchemaResult {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<InferredField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn optional(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Render each file's schema as a table of name, type and sizes.
pub fn format_schema_table(results: &[FileSchemaResult]) -> String {
    let mut out = String::new();
    for result in results {
        out.push_str(&format!("== [{}]\n", result.file));
        if let Some(error) = &result.error {
            out.push_str(&format!("error: {error}\n"));
            continue;
        }
        let mut builder = Builder::default();
        builder.push_record(["Name", "Type", "Length", "Precision", "Scale"]);
        for field in result.fields.iter().flatten() {
            builder.push_record([
                field.name.clone(),
                field.field_type.to_string(),
                optional(field.length),
                optional(field.precision),
                optional(field.scale),
            ]);
        }
        out.push_str(&builder.build().with(Style::rounded()).to_string());
        out.push('\n');
    }
    out
}

pub fn format_schema_json(results: &[FileSchemaResult], compact: bool) -> String {
    super::to_json(results, compact)
}

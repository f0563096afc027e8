//! Decoration Mapper: diagnostics and table references as editor marker ranges.
//!
//! Ranges are clamped to the text and snapped to UTF-8 boundaries; ranges
//! that end up empty are dropped.

use crate::helpers::floor_char_boundary;
use crate::types::{Decoration, DecorationKind, Diagnostic, Span, TableReference};

pub fn diagnostic_decorations(sql: &str, diagnostics: &[Diagnostic]) -> Vec<Decoration> {
    diagnostics
        .iter()
        .filter_map(|diagnostic| decoration(sql, diagnostic.span(), diagnostic.severity.into()))
        .collect()
}

pub fn table_decorations(sql: &str, tables: &[TableReference]) -> Vec<Decoration> {
    tables
        .iter()
        .filter_map(|table| {
            let kind = if table.is_subquery {
                DecorationKind::Subquery
            } else {
                DecorationKind::Table
            };
            decoration(sql, table.span(), kind)
        })
        .collect()
}

fn decoration(sql: &str, span: Span, kind: DecorationKind) -> Option<Decoration> {
    let start = floor_char_boundary(sql, span.start);
    let end = floor_char_boundary(sql, span.end);
    (start < end).then_some(Decoration {
        start_index: start,
        end_index: end,
        kind,
    })
}

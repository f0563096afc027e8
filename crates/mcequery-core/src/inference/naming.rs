//! Output column names: unnamed expressions get a name, duplicates a suffix.

use std::collections::HashSet;

use crate::scope::model::{ColumnExpression, ProjectionItem};

/// Longest name a Data Extension field may have.
pub const MAX_NAME_LENGTH: usize = 128;

const FALLBACK_NAME: &str = "Column";

/// Name of a projected expression: its alias, the column it copies, or the
/// function it calls.
pub fn base_name(item: &ProjectionItem) -> String {
    match item {
        ProjectionItem::Expr {
            alias: Some(alias), ..
        } => alias.clone(),
        ProjectionItem::Expr { expr, .. } => match expr {
            ColumnExpression::Column(column) => column.name.clone(),
            ColumnExpression::Function(call) => call.name.clone(),
            ColumnExpression::Cast { expr, .. } => match expr.as_ref() {
                ColumnExpression::Column(column) => column.name.clone(),
                _ => FALLBACK_NAME.to_string(),
            },
            _ => FALLBACK_NAME.to_string(),
        },
        ProjectionItem::Wildcard { .. } | ProjectionItem::QualifiedWildcard { .. } => {
            FALLBACK_NAME.to_string()
        }
    }
}

/// Truncates to `max` characters.
fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

/// Makes names unique case-insensitively. Later duplicates get `_1`, `_2`, ...
/// in encounter order; names are cut to [`MAX_NAME_LENGTH`] first.
pub fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let base = truncate(&name, MAX_NAME_LENGTH);
        let mut candidate = base.clone();
        let mut counter = 0usize;
        while taken.contains(&candidate.to_lowercase()) {
            counter += 1;
            let suffix = format!("_{counter}");
            let room = MAX_NAME_LENGTH.saturating_sub(suffix.chars().count());
            candidate = format!("{}{suffix}", truncate(&base, room));
        }
        taken.insert(candidate.to_lowercase());
        out.push(candidate);
    }

    out
}

//! Expansion of a trailing `SELECT *` into an explicit, qualified column list.

use futures_util::future::join_all;
use tracing::debug;

use crate::completion::context::qualifier_before;
use crate::helpers::bracket_if_needed;
use crate::metadata::{fields_for_table, MetadataFetcher};
use crate::types::{AsteriskExpansion, ReplaceOffsets, TableReference};

/// Expands the `*` that ends `text_before_cursor`.
///
/// Only the outermost SELECT's tables take part. Two or more of them without
/// an alias cannot be told apart, which is reported before any fetch. A
/// qualified `alias.*` expands that one table and replaces `alias.*` whole.
pub async fn expand_asterisk(
    text_before_cursor: &str,
    cursor_offset: usize,
    tables_in_scope: &[TableReference],
    fetcher: &dyn MetadataFetcher,
) -> AsteriskExpansion {
    if let Some(star) = text_before_cursor.strip_suffix('*') {
        if let Some((qualifier, start)) = star_qualifier(star) {
            return expand_qualified(&qualifier, start, cursor_offset, tables_in_scope, fetcher)
                .await;
        }
    }

    let tables = outermost_tables(tables_in_scope);

    let unaliased = tables.iter().filter(|table| table.alias.is_none()).count();
    if unaliased > 1 {
        return AsteriskExpansion::Issue {
            message: "Add table aliases to expand *".to_string(),
            detail: format!(
                "{unaliased} tables in FROM have no alias, so their columns cannot be qualified."
            ),
        };
    }

    if !text_before_cursor.ends_with('*') || cursor_offset == 0 {
        return AsteriskExpansion::None;
    }

    let qualify = tables.len() > 1 || tables.iter().any(|table| table.alias.is_some());
    let columns_per_table = join_all(tables.iter().map(|table| async move {
        let qualifier = qualify.then(|| bracket_if_needed(qualifier_for(table)));
        qualified_columns(table, qualifier.as_deref(), fetcher).await
    }))
    .await;

    let columns: Vec<String> = columns_per_table.into_iter().flatten().collect();
    debug!(tables = tables.len(), columns = columns.len(), "expanded asterisk");
    expansion(columns, ReplaceOffsets::new(cursor_offset - 1, cursor_offset))
}

async fn expand_qualified(
    qualifier: &str,
    start: usize,
    cursor_offset: usize,
    tables_in_scope: &[TableReference],
    fetcher: &dyn MetadataFetcher,
) -> AsteriskExpansion {
    let Some(table) = tables_in_scope.iter().rev().find(|table| {
        table
            .alias
            .as_deref()
            .is_some_and(|alias| alias.eq_ignore_ascii_case(qualifier))
            || table.name.eq_ignore_ascii_case(qualifier)
    }) else {
        debug!(qualifier, "qualified asterisk does not name a table in scope");
        return AsteriskExpansion::None;
    };

    let qualifier = bracket_if_needed(qualifier);
    let columns = qualified_columns(table, Some(qualifier.as_str()), fetcher).await;
    debug!(table = table.name.as_str(), columns = columns.len(), "expanded qualified asterisk");
    expansion(columns, ReplaceOffsets::new(start, cursor_offset))
}

/// The `alias.` or `[alias].` ending `text`, with the offset it starts at.
fn star_qualifier(text: &str) -> Option<(String, usize)> {
    let (qualifier, _) = qualifier_before(text, text.len())?;
    let before_dot = &text[..text.len() - 1];
    let start = if before_dot.ends_with(']') {
        before_dot.rfind('[')?
    } else {
        before_dot.len() - qualifier.len()
    };
    Some((qualifier, start))
}

async fn qualified_columns(
    table: &TableReference,
    qualifier: Option<&str>,
    fetcher: &dyn MetadataFetcher,
) -> Vec<String> {
    let names: Vec<String> = if table.is_subquery {
        table.output_fields.clone()
    } else {
        fields_for_table(fetcher, &table.name)
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|field| field.name)
            .collect()
    };
    names
        .into_iter()
        .map(|name| match qualifier {
            Some(qualifier) => format!("{qualifier}.{}", bracket_if_needed(&name)),
            None => bracket_if_needed(&name),
        })
        .collect()
}

fn expansion(columns: Vec<String>, replace_offsets: ReplaceOffsets) -> AsteriskExpansion {
    if columns.is_empty() {
        return AsteriskExpansion::Issue {
            message: "No columns found to expand *".to_string(),
            detail: "None of the tables in FROM have known fields.".to_string(),
        };
    }
    AsteriskExpansion::Expand {
        column_count: columns.len(),
        expanded_columns: columns.join(", "),
        replace_offsets,
    }
}

fn outermost_tables(tables: &[TableReference]) -> Vec<&TableReference> {
    let Some(depth) = tables.iter().map(|table| table.scope_depth).min() else {
        return Vec::new();
    };
    tables
        .iter()
        .filter(|table| table.scope_depth == depth)
        .collect()
}

/// Alias, or the object name without an `ENT.` style schema.
fn qualifier_for(table: &TableReference) -> &str {
    match &table.alias {
        Some(alias) => alias,
        None => table
            .name
            .rsplit_once('.')
            .map_or(table.name.as_str(), |(_, name)| name),
    }
}

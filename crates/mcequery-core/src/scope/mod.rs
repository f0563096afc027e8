//! Scope Resolver: table and alias bindings of a statement.
//!
//! Resolution is fail-soft. SQL that does not parse yields an empty scope so
//! the token-driven parts of lint and completion keep working.

mod extract;
pub mod model;
mod strategies;

use tracing::debug;

use crate::error::ParseError;
use crate::parser::parse_sql;
use crate::types::Scope;

pub use model::{
    ColumnExpression, ColumnRef, FunctionCall, GroupByClause, LiteralValue, ProjectionItem,
    QueryModel, SelectBlock,
};

/// Resolves every FROM/JOIN entry of `sql`, including nested ones.
pub fn resolve_scope(sql: &str) -> Scope {
    match analyze(sql) {
        Some(model) => {
            debug!(tables = model.tables.len(), "resolved scope");
            Scope::from_tables(model.tables)
        }
        None => Scope::empty(),
    }
}

/// Like [`resolve_scope`], but repairs an in-progress statement first.
pub fn resolve_scope_for_completion(sql: &str, cursor_offset: usize) -> Scope {
    let Some(repaired) = strategies::parse_for_completion(sql, cursor_offset) else {
        return Scope::empty();
    };
    let Some(model) = extract::build_model(&repaired.statements, &repaired.text) else {
        return Scope::empty();
    };

    let limit = sql.len();
    let tables = model
        .tables
        .into_iter()
        .map(|mut table| {
            let span = table.span().clamp_to(limit);
            table.start_index = span.start;
            table.end_index = span.end;
            table
        })
        .collect();
    Scope::from_tables(tables)
}

/// Parses `sql` and builds its query model; `None` when it does not parse or
/// is not a query.
pub(crate) fn analyze(sql: &str) -> Option<QueryModel> {
    let statements = parse_sql(sql).ok()?;
    extract::build_model(&statements, sql)
}

/// Like [`analyze`], but keeps the parse error.
pub(crate) fn analyze_strict(sql: &str) -> Result<Option<QueryModel>, ParseError> {
    let statements = parse_sql(sql)?;
    Ok(extract::build_model(&statements, sql))
}

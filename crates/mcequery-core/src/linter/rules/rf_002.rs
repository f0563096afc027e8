//! LINT_RF_002: Ambiguous unqualified column.
//!
//! An unqualified column whose name exists in more than one table of the same
//! SELECT is rejected at run time. Qualifying it with an alias resolves it,
//! even when the name still collides elsewhere.

use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::scope::model::{ColumnExpression, ColumnRef, GroupByClause, ProjectionItem, SelectBlock};
use crate::types::{issue_codes, Diagnostic};

pub struct AmbiguousColumn;

impl LintRule for AmbiguousColumn {
    fn code(&self) -> &'static str {
        issue_codes::LINT_RF_002
    }

    fn name(&self) -> &'static str {
        "Ambiguous column"
    }

    fn description(&self) -> &'static str {
        "Unqualified columns that exist in more than one joined table."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Semantic
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let Some(model) = &ctx.model else {
            return Vec::new();
        };
        model
            .blocks
            .iter()
            .flat_map(|block| check_block(ctx, block))
            .collect()
    }
}

fn check_block(ctx: &LintContext, block: &SelectBlock) -> Vec<Diagnostic> {
    if block.sources.len() < 2 {
        return Vec::new();
    }
    let table_fields: Vec<(&str, Vec<String>)> = block
        .tables()
        .filter_map(|table| ctx.fields_for(table).map(|fields| (table.visible_name(), fields)))
        .collect();
    if table_fields.len() < 2 {
        return Vec::new();
    }

    let mut refs: Vec<&ColumnRef> = Vec::new();
    for item in &block.projection {
        if let ProjectionItem::Expr { expr, .. } = item {
            refs.extend(expr.column_refs());
        }
    }
    refs.extend(block.filters.iter().flat_map(ColumnExpression::column_refs));
    if let GroupByClause::Expressions(grouped) = &block.group_by {
        refs.extend(grouped.iter().flat_map(|g| g.expr.column_refs()));
    }
    // ORDER BY may name a projection alias instead of a column
    let aliases: Vec<&str> = block.aliases().collect();
    refs.extend(
        block
            .order_by
            .iter()
            .flat_map(ColumnExpression::column_refs)
            .filter(|column| {
                column.qualifier.is_some()
                    || !aliases.iter().any(|alias| alias.eq_ignore_ascii_case(&column.name))
            }),
    );

    refs.into_iter()
        .filter(|column| column.qualifier.is_none())
        .filter_map(|column| {
            let owners: Vec<&str> = table_fields
                .iter()
                .filter(|(_, fields)| fields.iter().any(|f| f.eq_ignore_ascii_case(&column.name)))
                .map(|(table, _)| *table)
                .collect();
            (owners.len() > 1).then(|| {
                Diagnostic::error(
                    issue_codes::LINT_RF_002,
                    format!(
                        "Column \"{}\" is ambiguous; it exists in {}. Qualify it with a table alias.",
                        column.name,
                        owners.join(" and ")
                    ),
                )
                .with_span(column.span)
            })
        })
        .collect()
}

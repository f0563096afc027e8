//! LINT_AG_001: Aggregate and GROUP BY consistency.
//!
//! A SELECT list that mixes aggregates with plain column expressions needs a
//! GROUP BY covering every plain expression. Once a GROUP BY is present,
//! every non-aggregate column expression must be covered by it. Window
//! functions and constants never need grouping.

use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::scope::model::{
    ColumnExpression, ColumnRef, GroupByClause, GroupedExpression, ProjectionItem, SelectBlock,
};
use crate::types::{issue_codes, Diagnostic, Span};

pub struct AggregateGrouping;

impl LintRule for AggregateGrouping {
    fn code(&self) -> &'static str {
        issue_codes::LINT_AG_001
    }

    fn name(&self) -> &'static str {
        "Aggregate without GROUP BY"
    }

    fn description(&self) -> &'static str {
        "Non-aggregated SELECT expressions must appear in GROUP BY when aggregates are used."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Semantic
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let Some(model) = &ctx.model else {
            return Vec::new();
        };
        model.blocks.iter().flat_map(check_block).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemClass {
    Aggregate,
    NonAggregate,
    Constant,
}

fn classify(item: &ProjectionItem) -> ItemClass {
    match item {
        ProjectionItem::Wildcard { .. } | ProjectionItem::QualifiedWildcard { .. } => {
            ItemClass::NonAggregate
        }
        ProjectionItem::Expr { expr, .. } => {
            if !expr.bare_column_refs().is_empty() {
                ItemClass::NonAggregate
            } else if expr.contains_aggregate() {
                ItemClass::Aggregate
            } else {
                ItemClass::Constant
            }
        }
    }
}

fn check_block(block: &SelectBlock) -> Vec<Diagnostic> {
    let classes: Vec<ItemClass> = block.projection.iter().map(classify).collect();

    match &block.group_by {
        GroupByClause::All => Vec::new(),
        GroupByClause::None => {
            let has_aggregate = classes.contains(&ItemClass::Aggregate);
            if !has_aggregate {
                return Vec::new();
            }
            block
                .projection
                .iter()
                .zip(&classes)
                .filter(|(_, class)| **class == ItemClass::NonAggregate)
                .map(|(item, _)| ungrouped(item, None))
                .collect()
        }
        GroupByClause::Expressions(grouped) => block
            .projection
            .iter()
            .zip(&classes)
            .filter(|(_, class)| **class == ItemClass::NonAggregate)
            .filter_map(|(item, _)| match item {
                ProjectionItem::Expr { expr, key, .. } => {
                    if grouped.iter().any(|g| &g.key == key) {
                        return None;
                    }
                    expr.bare_column_refs()
                        .into_iter()
                        .find(|column| !is_grouped(column, grouped))
                        .map(|column| ungrouped(item, Some(column)))
                }
                _ => Some(ungrouped(item, None)),
            })
            .collect(),
    }
}

fn is_grouped(column: &ColumnRef, grouped: &[GroupedExpression]) -> bool {
    grouped.iter().any(|g| match &g.expr {
        ColumnExpression::Column(key) => {
            key.name.eq_ignore_ascii_case(&column.name)
                && match (&key.qualifier, &column.qualifier) {
                    (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                    _ => true,
                }
        }
        _ => false,
    })
}

fn ungrouped(item: &ProjectionItem, column: Option<&ColumnRef>) -> Diagnostic {
    let (message, span): (String, Span) = match item {
        ProjectionItem::Wildcard { span } | ProjectionItem::QualifiedWildcard { span, .. } => (
            "SELECT * cannot be combined with aggregate functions; list the columns and add them to GROUP BY.".to_string(),
            *span,
        ),
        ProjectionItem::Expr { expr, span, .. } => {
            let column = column.or_else(|| expr.bare_column_refs().into_iter().next());
            let name = column.map(|c| c.name.as_str()).unwrap_or("expression");
            (
                format!(
                    "Column \"{name}\" must appear in the GROUP BY clause or be used in an aggregate function."
                ),
                *span,
            )
        }
    };
    Diagnostic::error(issue_codes::LINT_AG_001, message).with_span(span)
}

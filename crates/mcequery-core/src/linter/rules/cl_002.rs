//! LINT_CL_002: OFFSET without ORDER BY.
//!
//! T-SQL only allows `OFFSET n ROWS` after an ORDER BY of the same query.
//! Each parenthesized level tracks its own ORDER BY, so the ORDER BY of a
//! window or subquery does not count for the enclosing query.

use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::tokens::{SqlToken, SqlTokenKind};
use crate::types::{issue_codes, Diagnostic};

pub struct OffsetWithoutOrderBy;

impl LintRule for OffsetWithoutOrderBy {
    fn code(&self) -> &'static str {
        issue_codes::LINT_CL_002
    }

    fn name(&self) -> &'static str {
        "OFFSET without ORDER BY"
    }

    fn description(&self) -> &'static str {
        "OFFSET ... ROWS requires an ORDER BY clause in the same query."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Lexical
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let tokens = &ctx.tokens;
        let mut diagnostics = Vec::new();
        let mut ordered: Vec<bool> = vec![false];

        for (index, token) in tokens.iter().enumerate() {
            if token.is_symbol("(") {
                ordered.push(false);
            } else if token.is_symbol(")") {
                if ordered.len() > 1 {
                    ordered.pop();
                }
            } else if token.is_word("SELECT") {
                set_top(&mut ordered, false);
            } else if token.is_word("ORDER") && tokens.get(index + 1).is_some_and(|t| t.is_word("BY"))
            {
                set_top(&mut ordered, true);
            } else if token.is_word("OFFSET")
                && starts_offset_clause(tokens.get(index + 1))
                && !ordered.last().copied().unwrap_or(false)
            {
                diagnostics.push(
                    Diagnostic::error(
                        issue_codes::LINT_CL_002,
                        "OFFSET requires an ORDER BY clause. Add ORDER BY before OFFSET ... ROWS.",
                    )
                    .with_span(token.span),
                );
            }
        }

        diagnostics
    }
}

fn set_top(stack: &mut [bool], value: bool) {
    if let Some(top) = stack.last_mut() {
        *top = value;
    }
}

/// `OFFSET 10`, `OFFSET (@n)` or `OFFSET @n`; a column named Offset is not.
fn starts_offset_clause(next: Option<&SqlToken>) -> bool {
    next.is_some_and(|token| {
        token.kind == SqlTokenKind::Number
            || token.is_symbol("(")
            || (token.kind == SqlTokenKind::Word && token.value.starts_with('@'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::config::LintOptions;

    fn check_sql(sql: &str) -> Vec<Diagnostic> {
        let ctx = LintContext::new(sql, &LintOptions::default());
        OffsetWithoutOrderBy.check(&ctx)
    }

    #[test]
    fn test_offset_with_order_by() {
        assert!(
            check_sql("SELECT Id FROM T ORDER BY Id OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY")
                .is_empty()
        );
    }

    #[test]
    fn test_offset_without_order_by() {
        let sql = "SELECT Id FROM T OFFSET 10 ROWS";
        let diagnostics = check_sql(sql);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(&sql[diagnostics[0].start_index..diagnostics[0].end_index], "OFFSET");
    }

    #[test]
    fn test_window_order_by_does_not_count() {
        let sql = "SELECT ROW_NUMBER() OVER (ORDER BY Id) AS n FROM T OFFSET 5 ROWS";
        assert_eq!(check_sql(sql).len(), 1);
    }

    #[test]
    fn test_column_named_offset() {
        assert!(check_sql("SELECT Offset FROM T").is_empty());
    }
}

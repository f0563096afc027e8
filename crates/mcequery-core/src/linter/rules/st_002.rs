//! LINT_ST_002: Common Table Expression.
//!
//! The parser accepts `WITH name AS (...)`, but the platform does not run it.
//! Table hints such as `WITH (NOLOCK)` and `TOP n WITH TIES` are not CTEs.

use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::tokens::SqlToken;
use crate::types::{issue_codes, Diagnostic};

pub struct CommonTableExpression;

const MESSAGE: &str = "Common Table Expressions (WITH ... AS) are not supported. Move the CTE body into a subquery in the FROM clause.";

impl LintRule for CommonTableExpression {
    fn code(&self) -> &'static str {
        issue_codes::LINT_ST_002
    }

    fn name(&self) -> &'static str {
        "Common Table Expression"
    }

    fn description(&self) -> &'static str {
        "WITH ... AS (...) is rejected by the platform; use a derived table instead."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Lexical
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let tokens = &ctx.tokens;
        tokens
            .iter()
            .enumerate()
            .filter(|(index, token)| token.is_word("WITH") && starts_cte(&tokens[index + 1..]))
            .map(|(_, token)| {
                Diagnostic::error(issue_codes::LINT_ST_002, MESSAGE).with_span(token.span)
            })
            .collect()
    }
}

/// `name [(columns)] AS (` following a WITH.
fn starts_cte(rest: &[SqlToken]) -> bool {
    let mut position = 0;
    let Some(name) = rest.first() else {
        return false;
    };
    if !name.is_identifier() || name.is_word("TIES") {
        return false;
    }
    position += 1;

    if rest.get(position).is_some_and(|t| t.is_symbol("(")) {
        let Some(close) = rest[position..].iter().position(|t| t.is_symbol(")")) else {
            return false;
        };
        position += close + 1;
    }

    rest.get(position).is_some_and(|t| t.is_word("AS"))
        && rest.get(position + 1).is_some_and(|t| t.is_symbol("("))
}

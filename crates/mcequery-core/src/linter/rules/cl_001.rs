//! LINT_CL_001: LIMIT clause.

use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::types::{issue_codes, Diagnostic};

pub struct LimitClause;

impl LintRule for LimitClause {
    fn code(&self) -> &'static str {
        issue_codes::LINT_CL_001
    }

    fn name(&self) -> &'static str {
        "LIMIT clause"
    }

    fn description(&self) -> &'static str {
        "T-SQL has no LIMIT; use SELECT TOP n or OFFSET ... FETCH."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Lexical
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        ctx.tokens
            .iter()
            .filter(|token| token.is_word("LIMIT"))
            .map(|token| {
                Diagnostic::error(
                    issue_codes::LINT_CL_001,
                    "LIMIT is not supported. Use SELECT TOP n instead, e.g. SELECT TOP 10 ...",
                )
                .with_span(token.span)
            })
            .collect()
    }
}

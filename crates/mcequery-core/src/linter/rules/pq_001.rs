//! LINT_PQ_001: Missing SELECT.

use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::types::{issue_codes, Diagnostic, Span};

pub struct MissingSelect;

impl LintRule for MissingSelect {
    fn code(&self) -> &'static str {
        issue_codes::LINT_PQ_001
    }

    fn name(&self) -> &'static str {
        "Missing SELECT"
    }

    fn description(&self) -> &'static str {
        "Every query needs a SELECT statement."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Lexical
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let Some(first) = ctx.tokens.first() else {
            return Vec::new();
        };
        if ctx.tokens.iter().any(|token| token.is_word("SELECT")) {
            return Vec::new();
        }
        let last = ctx.tokens.last().unwrap_or(first);
        vec![Diagnostic::prereq(
            issue_codes::LINT_PQ_001,
            "Start the query with SELECT to choose the columns to return.",
        )
        .with_span(Span::new(first.span.start, last.span.end))]
    }
}

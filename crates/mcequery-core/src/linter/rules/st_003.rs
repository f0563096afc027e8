//! LINT_ST_003: Temporary table.
//!
//! `#temp` and `##global` tables do not exist on the platform; intermediate
//! results belong in a staging Data Extension.

use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::tokens::SqlTokenKind;
use crate::types::{issue_codes, Diagnostic, Span};

pub struct TempTable;

impl LintRule for TempTable {
    fn code(&self) -> &'static str {
        issue_codes::LINT_ST_003
    }

    fn name(&self) -> &'static str {
        "Temporary table"
    }

    fn description(&self) -> &'static str {
        "Temporary tables are not available; write intermediate results to a Data Extension."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Lexical
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let tokens = &ctx.tokens;
        let mut diagnostics = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            let span = if token.kind == SqlTokenKind::Word && token.value.starts_with('#') {
                Some(token.span)
            } else if token.is_symbol("#") {
                // tokenizers that split `#` from the name
                tokens
                    .get(index + 1)
                    .filter(|next| next.is_identifier() && next.span.start == token.span.end)
                    .map(|next| Span::new(token.span.start, next.span.end))
            } else {
                None
            };

            if let Some(span) = span {
                let name = &ctx.sql[span.start..span.end];
                diagnostics.push(
                    Diagnostic::warning(
                        issue_codes::LINT_ST_003,
                        format!(
                            "Temporary table {name} is not supported. Use a staging Data Extension for intermediate results."
                        ),
                    )
                    .with_span(span),
                );
            }
        }

        diagnostics
    }
}

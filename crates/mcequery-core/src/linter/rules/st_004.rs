//! LINT_ST_004: SELECT ... INTO.
//!
//! A query activity writes its result set to the target Data Extension chosen
//! on the activity; `SELECT ... INTO` would create a table and is rejected.

use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::types::{issue_codes, Diagnostic};

pub struct SelectInto;

impl LintRule for SelectInto {
    fn code(&self) -> &'static str {
        issue_codes::LINT_ST_004
    }

    fn name(&self) -> &'static str {
        "SELECT INTO"
    }

    fn description(&self) -> &'static str {
        "SELECT ... INTO is rejected; the target Data Extension is set on the query activity."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Lexical
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        // a parsed query names its INTO targets; otherwise scan tokens
        if let Some(model) = &ctx.model {
            if model.blocks.iter().all(|block| block.into.is_none()) {
                return Vec::new();
            }
        }

        let tokens = &ctx.tokens;
        let mut diagnostics = Vec::new();
        let mut saw_select = false;

        for (index, token) in tokens.iter().enumerate() {
            if token.is_word("SELECT") {
                saw_select = true;
                continue;
            }
            if !token.is_word("INTO") || !saw_select {
                continue;
            }
            // INSERT INTO / MERGE INTO are reported as prohibited statements
            let previous = index.checked_sub(1).and_then(|i| tokens.get(i));
            if previous.is_some_and(|t| t.is_word("INSERT") || t.is_word("MERGE")) {
                continue;
            }
            diagnostics.push(
                Diagnostic::error(
                    issue_codes::LINT_ST_004,
                    "SELECT ... INTO is not supported. Remove the INTO clause and set the target Data Extension on the query activity.",
                )
                .with_span(token.span),
            );
        }

        diagnostics
    }
}

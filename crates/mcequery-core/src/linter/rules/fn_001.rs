//! LINT_FN_001: Unsupported function.

use crate::catalog::functions::is_unsupported_function;
use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::tokens::SqlTokenKind;
use crate::types::{issue_codes, Diagnostic};

pub struct UnsupportedFunction;

impl LintRule for UnsupportedFunction {
    fn code(&self) -> &'static str {
        issue_codes::LINT_FN_001
    }

    fn name(&self) -> &'static str {
        "Unsupported function"
    }

    fn description(&self) -> &'static str {
        "Calls to functions the query platform does not provide."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Lexical
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let tokens = &ctx.tokens;
        tokens
            .iter()
            .enumerate()
            .filter(|(index, token)| {
                token.kind == SqlTokenKind::Word
                    && tokens.get(index + 1).is_some_and(|next| next.is_symbol("("))
                    && !(*index > 0 && tokens[index - 1].is_symbol("."))
                    && is_unsupported_function(&token.value)
            })
            .map(|(_, token)| {
                Diagnostic::error(
                    issue_codes::LINT_FN_001,
                    format!(
                        "{}() is not available in Marketing Cloud SQL.",
                        token.upper()
                    ),
                )
                .with_span(token.span)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::config::LintOptions;
    use rstest::rstest;

    fn check_sql(sql: &str) -> Vec<Diagnostic> {
        let ctx = LintContext::new(sql, &LintOptions::default());
        UnsupportedFunction.check(&ctx)
    }

    #[test]
    fn test_nested_call_flagged() {
        let sql = "SELECT UPPER(string_agg(Name, ',')) FROM T";
        let diagnostics = check_sql(sql);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("STRING_AGG"));
        assert!(diagnostics[0].message.contains("not available"));
    }

    #[rstest]
    #[case("SELECT JSON_VALUE(Data, '$.a') FROM T")]
    #[case("SELECT ISJSON(Data) FROM T")]
    #[case("SELECT JSON_QUERY(Data, '$.b') FROM T")]
    #[case("SELECT UPPER(Name) FROM T")]
    fn test_allowed_functions(#[case] sql: &str) {
        assert!(check_sql(sql).is_empty());
    }

    #[test]
    fn test_name_without_call_is_ignored() {
        assert!(check_sql("SELECT String_Agg FROM T").is_empty());
    }
}

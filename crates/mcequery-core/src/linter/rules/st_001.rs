//! LINT_ST_001: Prohibited statement keyword.
//!
//! Queries are read-only SELECT statements. Data modification, DDL, dynamic
//! SQL, variables, cursors and procedural blocks are rejected by the platform.

use crate::catalog::keywords::{prohibited_keyword, CURSOR_MESSAGE, TRY_CATCH_MESSAGE};
use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::types::{issue_codes, Diagnostic};

pub struct ProhibitedStatement;

impl LintRule for ProhibitedStatement {
    fn code(&self) -> &'static str {
        issue_codes::LINT_ST_001
    }

    fn name(&self) -> &'static str {
        "Prohibited statement"
    }

    fn description(&self) -> &'static str {
        "Only read-only SELECT statements can run; writes, DDL and procedural code are rejected."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Lexical
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let tokens = &ctx.tokens;
        let mut diagnostics = Vec::new();
        let mut saw_update = false;

        for (index, token) in tokens.iter().enumerate() {
            if token.kind != crate::tokens::SqlTokenKind::Word {
                continue;
            }
            let after_period = index > 0 && tokens[index - 1].is_symbol(".");
            if after_period {
                continue;
            }
            let Some(entry) = prohibited_keyword(&token.value) else {
                continue;
            };

            let message = match entry.keyword {
                "DECLARE" => {
                    let declares_cursor = tokens[index + 1..]
                        .iter()
                        .take_while(|t| !t.is_symbol(";") && !t.is_word("DECLARE"))
                        .any(|t| t.is_word("CURSOR"));
                    if declares_cursor {
                        CURSOR_MESSAGE
                    } else {
                        entry.message
                    }
                }
                "BEGIN" if tokens.get(index + 1).is_some_and(|t| t.is_word("TRY")) => {
                    TRY_CATCH_MESSAGE
                }
                // part of the UPDATE already reported
                "SET" if saw_update => continue,
                _ => entry.message,
            };
            if entry.keyword == "UPDATE" {
                saw_update = true;
            }

            diagnostics.push(
                Diagnostic::error(issue_codes::LINT_ST_001, message).with_span(token.span),
            );
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::config::LintOptions;

    fn check_sql(sql: &str) -> Vec<Diagnostic> {
        let ctx = LintContext::new(sql, &LintOptions::default());
        ProhibitedStatement.check(&ctx)
    }

    #[test]
    fn test_delete_is_flagged() {
        let diagnostics = check_sql("DELETE FROM [Contacts] WHERE Id = 1");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].start_index, 0);
        assert_eq!(diagnostics[0].end_index, 6);
        assert!(diagnostics[0].message.contains("not supported"));
    }

    #[test]
    fn test_bracketed_keyword_is_ignored() {
        assert!(check_sql("SELECT * FROM [DELETE Me]").is_empty());
        assert!(check_sql("SELECT 'DROP TABLE x' AS Note FROM T").is_empty());
        assert!(check_sql("SELECT a -- UPDATE later\nFROM T").is_empty());
    }

    #[test]
    fn test_cursor_declaration_message() {
        let diagnostics = check_sql("DECLARE c CURSOR FOR SELECT Id FROM T");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, CURSOR_MESSAGE);
    }

    #[test]
    fn test_try_catch_message() {
        let diagnostics = check_sql("BEGIN TRY SELECT 1 END TRY BEGIN CATCH SELECT 2 END CATCH");
        assert_eq!(diagnostics[0].message, TRY_CATCH_MESSAGE);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_if_begin_end() {
        let diagnostics = check_sql("IF 1 = 1 BEGIN SELECT 1 END");
        let keywords: Vec<_> = diagnostics
            .iter()
            .map(|d| &"IF 1 = 1 BEGIN SELECT 1 END"[d.start_index..d.end_index])
            .collect();
        assert_eq!(keywords, vec!["IF", "BEGIN"]);
    }

    #[test]
    fn test_update_set_reported_once() {
        assert_eq!(check_sql("UPDATE T SET a = 1").len(), 1);
    }

    #[test]
    fn test_qualified_column_named_like_keyword() {
        assert!(check_sql("SELECT t.Update FROM T t").is_empty());
    }
}

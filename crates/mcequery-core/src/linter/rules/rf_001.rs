//! LINT_RF_001: Unbracketed multi-word table name.
//!
//! Data Extension names may contain spaces. Written without brackets, the
//! parser reads `FROM My Data Extension` as a table followed by an alias and
//! garbage, so the name has to be bracketed.

use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::tokens::{SqlToken, SqlTokenKind};
use crate::types::{issue_codes, Diagnostic, Span};

pub struct UnbracketedMultiWordName;

/// Words that end the table-name run after FROM/JOIN.
const RUN_TERMINATORS: &[&str] = &[
    "AS", "ON", "WHERE", "GROUP", "HAVING", "ORDER", "UNION", "EXCEPT", "INTERSECT", "JOIN",
    "INNER", "LEFT", "RIGHT", "FULL", "CROSS", "OUTER", "WITH", "OPTION", "FOR", "INTO", "SELECT",
    "FROM", "UNPIVOT", "PIVOT", "TABLESAMPLE", "APPLY", "WINDOW", "OFFSET", "FETCH",
];

/// Unquoted words in a row this long cannot be `table alias`.
const UNKNOWN_RUN_THRESHOLD: usize = 3;

impl LintRule for UnbracketedMultiWordName {
    fn code(&self) -> &'static str {
        issue_codes::LINT_RF_001
    }

    fn name(&self) -> &'static str {
        "Unbracketed multi-word name"
    }

    fn description(&self) -> &'static str {
        "Table names containing spaces must be wrapped in [brackets]."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Lexical
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let tokens = &ctx.tokens;
        let known: Vec<String> = ctx
            .known_tables()
            .filter(|name| name.contains(' '))
            .map(normalize_name)
            .collect();

        let mut diagnostics = Vec::new();
        for (index, token) in tokens.iter().enumerate() {
            if !(token.is_word("FROM") || token.is_word("JOIN")) {
                continue;
            }
            let run = word_run(&tokens[index + 1..]);
            if run.len() < 2 {
                continue;
            }

            let matched = (2..=run.len()).rev().find(|&len| {
                let candidate = normalize_name(&join_words(&run[..len]));
                known.contains(&candidate)
            });
            let length = match matched {
                Some(len) => len,
                None if run.len() >= UNKNOWN_RUN_THRESHOLD => run.len(),
                None => continue,
            };

            let name = join_words(&run[..length]);
            let span = Span::new(run[0].span.start, run[length - 1].span.end);
            diagnostics.push(
                Diagnostic::warning(
                    issue_codes::LINT_RF_001,
                    format!("Table name \"{name}\" contains spaces and must be wrapped in brackets: [{name}]"),
                )
                .with_span(span),
            );
        }

        diagnostics
    }
}

fn word_run(tokens: &[SqlToken]) -> &[SqlToken] {
    let length = tokens
        .iter()
        .take_while(|token| {
            token.kind == SqlTokenKind::Word
                && !token.value.starts_with('#')
                && !RUN_TERMINATORS.iter().any(|word| token.is_word(word))
        })
        .count();
    &tokens[..length]
}

fn join_words(tokens: &[SqlToken]) -> String {
    tokens
        .iter()
        .map(|token| token.value.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

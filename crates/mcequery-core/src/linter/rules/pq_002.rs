//! LINT_PQ_002: Columns referenced without a FROM clause.

use crate::linter::rule::{LintContext, LintEngine, LintRule};
use crate::tokens::{SqlToken, SqlTokenKind};
use crate::types::{issue_codes, Diagnostic};

pub struct MissingFrom;

/// Words in a SELECT list that are syntax, not column names.
const STRUCTURAL_WORDS: &[&str] = &[
    "SELECT", "TOP", "PERCENT", "DISTINCT", "ALL", "AS", "CASE", "WHEN", "THEN", "ELSE", "END",
    "AND", "OR", "NOT", "NULL", "IS", "IN", "LIKE", "BETWEEN", "EXISTS", "WITH", "TIES", "UNION",
    "EXCEPT", "INTERSECT", "TRUE", "FALSE", "ORDER", "BY", "ASC", "DESC", "OVER", "PARTITION",
    "INTO", "WHERE", "GROUP", "HAVING", "ROWS", "RANGE", "COLLATE",
];

/// Functions whose first argument is a date-part keyword rather than a column.
const DATE_PART_FUNCTIONS: &[&str] = &["DATEPART", "DATEADD", "DATEDIFF", "DATENAME", "DATETRUNC"];

impl LintRule for MissingFrom {
    fn code(&self) -> &'static str {
        issue_codes::LINT_PQ_002
    }

    fn name(&self) -> &'static str {
        "Missing FROM"
    }

    fn description(&self) -> &'static str {
        "Column references need a FROM clause naming the Data Extension they come from."
    }

    fn engine(&self) -> LintEngine {
        LintEngine::Lexical
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let tokens = &ctx.tokens;
        if ctx
            .model
            .as_ref()
            .and_then(|model| model.main_block())
            .is_some_and(|block| block.has_from)
        {
            return Vec::new();
        }
        let Some(select) = tokens.iter().position(|token| token.is_word("SELECT")) else {
            return Vec::new();
        };
        if tokens.iter().any(|token| token.is_word("FROM")) {
            return Vec::new();
        }

        let column = (select + 1..tokens.len()).find(|&index| is_column_reference(tokens, index));
        match column {
            Some(index) => vec![Diagnostic::prereq(
                issue_codes::LINT_PQ_002,
                "Add a FROM clause naming the Data Extension these columns come from.",
            )
            .with_span(tokens[index].span)],
            None => Vec::new(),
        }
    }
}

fn is_column_reference(tokens: &[SqlToken], index: usize) -> bool {
    let token = &tokens[index];
    let candidate = match token.kind {
        SqlTokenKind::QuotedIdentifier => true,
        SqlTokenKind::Word => {
            !token.value.starts_with('@')
                && !STRUCTURAL_WORDS.iter().any(|word| token.is_word(word))
        }
        _ => false,
    };
    if !candidate {
        return false;
    }

    let next = tokens.get(index + 1);
    if next.is_some_and(|t| t.is_symbol("(")) {
        return false;
    }
    let previous = index.checked_sub(1).map(|i| &tokens[i]);
    if previous.is_some_and(|t| t.is_word("AS")) {
        return false;
    }
    let date_part_argument = previous.is_some_and(|t| t.is_symbol("("))
        && index
            .checked_sub(2)
            .map(|i| &tokens[i])
            .is_some_and(|f| DATE_PART_FUNCTIONS.iter().any(|name| f.is_word(name)));
    !date_part_argument
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::config::LintOptions;

    fn check_sql(sql: &str) -> Vec<Diagnostic> {
        let ctx = LintContext::new(sql, &LintOptions::default());
        MissingFrom.check(&ctx)
    }

    #[test]
    fn test_column_without_from() {
        let sql = "SELECT EmailAddress, FirstName";
        let diagnostics = check_sql(sql);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            &sql[diagnostics[0].start_index..diagnostics[0].end_index],
            "EmailAddress"
        );
    }

    #[test]
    fn test_expressions_without_columns() {
        assert!(check_sql("SELECT 1 AS One, GETDATE() AS Now").is_empty());
        assert!(check_sql("SELECT DATEPART(year, GETDATE()) AS Y").is_empty());
        assert!(check_sql("SELECT CAST('1' AS INT) AS N").is_empty());
    }

    #[test]
    fn test_with_from() {
        assert!(check_sql("SELECT EmailAddress FROM [Contacts]").is_empty());
    }
}

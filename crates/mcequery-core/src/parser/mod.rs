//! Parser adapter over sqlparser's T-SQL dialect.

use crate::error::ParseError;
use sqlparser::ast::Statement;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;

/// Parses SQL text with the T-SQL dialect used by the query platform.
pub fn parse_sql(sql: &str) -> Result<Vec<Statement>, ParseError> {
    let dialect = MsSqlDialect {};
    Ok(Parser::parse_sql(&dialect, sql)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_select() {
        let statements = parse_sql("SELECT SubscriberKey FROM [My Data Extension]").unwrap();
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_parse_top() {
        assert!(parse_sql("SELECT TOP 10 EmailAddress FROM _Subscribers").is_ok());
    }

    #[test]
    fn test_parse_invalid_sql() {
        let err = parse_sql("SELECT * FROM").unwrap_err();
        assert!(!err.message.is_empty());
    }
}

//! Error types for SQL parsing, schema inference and metadata lookups.
//!
//! Lint and completion never fail: they degrade to partial results instead.
//! Only [`infer_schema`](crate::infer_schema) surfaces errors to the caller, since
//! the schema-creation flow has to show an actionable message.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::trace;

/// Error encountered during SQL parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable error message.
    pub message: String,
    /// Location reported by the parser, if any.
    pub position: Option<Position>,
    pub kind: ParseErrorKind,
}

/// Position information for a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

/// Category of parse error for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseErrorKind {
    #[default]
    SyntaxError,
    MissingClause,
    UnexpectedEof,
    UnsupportedFeature,
    LexerError,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            kind: ParseErrorKind::SyntaxError,
        }
    }

    /// Parses position from the sqlparser message suffix `Line: X, Column: Y`.
    fn parse_position_from_message(message: &str) -> Option<Position> {
        static POSITION_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = POSITION_REGEX.get_or_init(|| {
            Regex::new(r"Line:\s*(\d+)\s*,\s*Column:\s*(\d+)").expect("Invalid regex pattern")
        });

        let result = re.captures(message).and_then(|caps| {
            let line: usize = caps.get(1)?.as_str().parse().ok()?;
            let column: usize = caps.get(2)?.as_str().parse().ok()?;
            Some(Position { line, column })
        });

        if result.is_none() && message.contains("Line") {
            trace!("no position found in parser message: {message}");
        }

        result
    }

    fn infer_kind_from_message(message: &str) -> ParseErrorKind {
        let lower = message.to_lowercase();
        if lower.contains("unexpected end") || lower.contains("eof") {
            ParseErrorKind::UnexpectedEof
        } else if lower.contains("expected") {
            ParseErrorKind::MissingClause
        } else if lower.contains("not supported") || lower.contains("unsupported") {
            ParseErrorKind::UnsupportedFeature
        } else if lower.contains("unterminated") || lower.contains("tokenizer") {
            ParseErrorKind::LexerError
        } else {
            ParseErrorKind::SyntaxError
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error")?;
        if let Some(pos) = self.position {
            write!(f, " at line {}, column {}", pos.line, pos.column)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<sqlparser::parser::ParserError> for ParseError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        let message = err.to_string();
        let position = Self::parse_position_from_message(&message);
        let kind = Self::infer_kind_from_message(&message);
        Self {
            message,
            position,
            kind,
        }
    }
}

/// Failure of [`infer_schema`](crate::infer_schema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("Unable to read the query: {0}")]
    Parse(#[from] ParseError),

    #[error("Only SELECT queries can be used to create a schema")]
    NotASelect,

    #[error("The query does not produce any columns. List the columns to return in the SELECT clause")]
    NoColumns,
}

/// Error returned by a [`MetadataFetcher`](crate::MetadataFetcher).
///
/// The analysis core never propagates this: a failed lookup is treated as an
/// unknown table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("metadata request failed: {0}")]
    Request(String),

    #[error("metadata request for '{0}' timed out")]
    Timeout(String),
}

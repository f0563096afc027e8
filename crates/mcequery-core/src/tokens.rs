//! Token stream with byte-offset spans for the text-scan rules and cursor context.
//!
//! Tokenization is fail-soft: when sqlparser rejects the text (an unterminated
//! string, bracket or comment, usually because the user is still typing) the
//! tail is repaired and tokenization retried. Tokens introduced by the repair
//! are dropped and spans are clamped to the original text.

use sqlparser::dialect::MsSqlDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, TokenWithSpan, Tokenizer, Whitespace};
use tracing::trace;

use crate::helpers::line_col_to_offset;
use crate::types::Span;

/// Suffixes tried, in order, to close whatever construct the text left open.
const REPAIR_SUFFIXES: &[&str] = &["'", "]", "\"", "*/", "']", "*/'"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlTokenKind {
    /// Unquoted keyword or identifier.
    Word,
    /// `[bracketed]` or `"double quoted"` identifier.
    QuotedIdentifier,
    StringLiteral,
    Number,
    Comment,
    Whitespace,
    /// Punctuation and operators.
    Symbol,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlToken {
    pub kind: SqlTokenKind,
    /// Identifier or keyword value without quotes; the token text otherwise.
    pub value: String,
    pub span: Span,
    /// True when sqlparser recognized a word as a reserved keyword.
    pub is_keyword: bool,
}

impl SqlToken {
    /// Case-insensitive match against an unquoted word.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == SqlTokenKind::Word && self.value.eq_ignore_ascii_case(word)
    }

    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == SqlTokenKind::Symbol && self.value == symbol
    }

    pub fn is_identifier(&self) -> bool {
        matches!(
            self.kind,
            SqlTokenKind::Word | SqlTokenKind::QuotedIdentifier
        )
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, SqlTokenKind::Whitespace | SqlTokenKind::Comment)
    }

    pub fn upper(&self) -> String {
        self.value.to_ascii_uppercase()
    }
}

/// Tokenizes `sql`, including whitespace and comments.
pub fn tokenize(sql: &str) -> Vec<SqlToken> {
    if let Some(tokens) = tokenize_exact(sql, sql) {
        return tokens;
    }

    for suffix in REPAIR_SUFFIXES {
        let repaired = format!("{sql}{suffix}");
        if let Some(tokens) = tokenize_exact(&repaired, sql) {
            trace!("tokenized after closing tail with {suffix:?}");
            return tokens;
        }
    }

    trace!("tokenizer repair failed; no tokens produced");
    Vec::new()
}

/// Tokens that carry meaning: whitespace and comments removed.
pub fn significant_tokens(sql: &str) -> Vec<SqlToken> {
    tokenize(sql)
        .into_iter()
        .filter(|token| !token.is_trivia())
        .collect()
}

fn tokenize_exact(text: &str, original: &str) -> Option<Vec<SqlToken>> {
    let dialect = MsSqlDialect {};
    let mut tokenizer = Tokenizer::new(&dialect, text);
    let tokens: Vec<TokenWithSpan> = tokenizer.tokenize_with_location().ok()?;

    let limit = original.len();
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        if matches!(token.token, Token::EOF) {
            continue;
        }
        let Some(span) = token_span_to_offsets(text, &token.span) else {
            continue;
        };
        if span.start >= limit && limit < text.len() {
            continue;
        }
        let (kind, value, is_keyword) = classify_token(&token.token);
        out.push(SqlToken {
            kind,
            value,
            span: span.clamp_to(limit),
            is_keyword,
        });
    }
    Some(out)
}

fn token_span_to_offsets(sql: &str, span: &sqlparser::tokenizer::Span) -> Option<Span> {
    let start = line_col_to_offset(sql, span.start.line as usize, span.start.column as usize)?;
    let end = line_col_to_offset(sql, span.end.line as usize, span.end.column as usize)?;
    Some(Span::new(start, end))
}

fn classify_token(token: &Token) -> (SqlTokenKind, String, bool) {
    match token {
        Token::Word(word) if word.quote_style.is_some() => {
            (SqlTokenKind::QuotedIdentifier, word.value.clone(), false)
        }
        Token::Word(word) => (
            SqlTokenKind::Word,
            word.value.clone(),
            word.keyword != Keyword::NoKeyword,
        ),
        Token::Number(value, _) => (SqlTokenKind::Number, value.clone(), false),
        Token::SingleQuotedString(value)
        | Token::DoubleQuotedString(value)
        | Token::NationalStringLiteral(value)
        | Token::EscapedStringLiteral(value)
        | Token::HexStringLiteral(value) => (SqlTokenKind::StringLiteral, value.clone(), false),
        Token::Whitespace(Whitespace::SingleLineComment { .. })
        | Token::Whitespace(Whitespace::MultiLineComment(_)) => {
            (SqlTokenKind::Comment, token.to_string(), false)
        }
        Token::Whitespace(_) => (SqlTokenKind::Whitespace, token.to_string(), false),
        Token::Comma
        | Token::Period
        | Token::LParen
        | Token::RParen
        | Token::SemiColon
        | Token::Mul
        | Token::Eq
        | Token::Neq
        | Token::Lt
        | Token::Gt
        | Token::LtEq
        | Token::GtEq
        | Token::Plus
        | Token::Minus
        | Token::Div
        | Token::Mod
        | Token::Sharp
        | Token::AtSign
        | Token::LBracket
        | Token::RBracket => (SqlTokenKind::Symbol, token.to_string(), false),
        _ => (SqlTokenKind::Other, token.to_string(), false),
    }
}

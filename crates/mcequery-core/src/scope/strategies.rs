//! Repair strategies that let an in-progress statement parse.
//!
//! Tried from cheapest to most invasive until one parses: the text as-is,
//! single fixes, all applicable fixes combined, then truncation before the
//! last clause keyword.

use sqlparser::ast::Statement;
use tracing::trace;

use crate::parser::parse_sql;
use crate::tokens::{significant_tokens, SqlToken};

/// Upper bound on synthesized closing parentheses.
const MAX_PAREN_FIXES: usize = 20;

/// Upper bound on truncation attempts for pathological input.
const MAX_TRUNCATION_ATTEMPTS: usize = 50;

/// Placeholder used where the user has not typed an identifier yet.
const PLACEHOLDER: &str = "_x_";

const CLAUSE_KEYWORDS: &[&str] = &[
    "WHERE", "GROUP", "HAVING", "ORDER", "UNION", "EXCEPT", "INTERSECT", "ON", "JOIN", "INNER",
    "LEFT", "RIGHT", "FULL", "CROSS",
];

type SqlFix = fn(&str, usize) -> Option<String>;

/// Parsed statements plus the text they were parsed from.
pub(crate) struct Repaired {
    pub statements: Vec<Statement>,
    pub text: String,
}

pub(crate) fn parse_for_completion(sql: &str, cursor_offset: usize) -> Option<Repaired> {
    if sql.trim().is_empty() {
        return None;
    }
    if let Some(repaired) = try_parse(sql) {
        return Some(repaired);
    }

    let fixes: [(&str, SqlFix); 5] = [
        ("dangling qualifier", fix_dangling_qualifier),
        ("trailing comma", fix_trailing_comma),
        ("incomplete select", fix_incomplete_select),
        ("incomplete from", fix_incomplete_from),
        ("unclosed parens", fix_unclosed_parens),
    ];

    for (name, fix) in fixes {
        if let Some(fixed) = fix(sql, cursor_offset) {
            if let Some(repaired) = try_parse(&fixed) {
                trace!(strategy = name, "parsed after repair");
                return Some(repaired);
            }
        }
    }

    // Several problems at once, e.g. `SELECT a. FROM (SELECT ...`
    let mut combined = sql.to_string();
    let mut applied = false;
    for (_, fix) in fixes {
        if let Some(fixed) = fix(&combined, cursor_offset.min(combined.len())) {
            combined = fixed;
            applied = true;
        }
    }
    if applied {
        if let Some(repaired) = try_parse(&combined) {
            trace!(strategy = "combined", "parsed after repair");
            return Some(repaired);
        }
    }

    for candidate in truncation_candidates(sql)
        .into_iter()
        .take(MAX_TRUNCATION_ATTEMPTS)
    {
        let truncated = &sql[..candidate];
        if truncated.trim().is_empty() {
            continue;
        }
        if let Some(repaired) = try_parse(truncated) {
            trace!(strategy = "truncated", at = candidate, "parsed after repair");
            return Some(repaired);
        }
        if let Some(repaired) = fix_unclosed_parens(truncated, candidate).and_then(|t| try_parse(&t))
        {
            trace!(strategy = "truncated+parens", at = candidate, "parsed after repair");
            return Some(repaired);
        }
    }

    trace!("no repair strategy produced a parse");
    None
}

fn try_parse(text: &str) -> Option<Repaired> {
    parse_sql(text)
        .ok()
        .filter(|statements| !statements.is_empty())
        .map(|statements| Repaired {
            statements,
            text: text.to_string(),
        })
}

/// `SELECT a.| FROM T a` becomes `SELECT a._x_ FROM T a`.
fn fix_dangling_qualifier(sql: &str, cursor_offset: usize) -> Option<String> {
    if cursor_offset == 0 || !sql.is_char_boundary(cursor_offset) {
        return None;
    }
    if !sql[..cursor_offset].ends_with('.') {
        return None;
    }
    let mut fixed = sql.to_string();
    fixed.insert_str(cursor_offset, PLACEHOLDER);
    Some(fixed)
}

/// `SELECT a, FROM T` becomes `SELECT a FROM T`.
fn fix_trailing_comma(sql: &str, _cursor_offset: usize) -> Option<String> {
    let tokens = significant_tokens(sql);
    let position = tokens
        .windows(2)
        .rposition(|pair| pair[0].is_symbol(",") && pair[1].is_word("FROM"))?;
    let comma = &tokens[position];
    let mut fixed = sql.to_string();
    fixed.replace_range(comma.span.start..comma.span.end, " ");
    Some(fixed)
}

/// `SELECT FROM T` (cursor in an empty SELECT list) becomes `SELECT 1 FROM T`.
fn fix_incomplete_select(sql: &str, _cursor_offset: usize) -> Option<String> {
    let tokens = significant_tokens(sql);
    let select = tokens.iter().position(|t| t.is_word("SELECT"))?;
    let next = tokens.get(select + 1);
    let empty_list = next.is_none_or(|token| token.is_word("FROM"));
    if !empty_list {
        return None;
    }
    let mut fixed = sql.to_string();
    fixed.insert_str(tokens[select].span.end, " 1");
    Some(fixed)
}

/// `SELECT a FROM` becomes `SELECT a FROM _x_`; a dangling `JOIN` or `ON` gets
/// the same treatment.
fn fix_incomplete_from(sql: &str, _cursor_offset: usize) -> Option<String> {
    let tokens = significant_tokens(sql);
    let last: &SqlToken = tokens.last()?;
    if last.is_word("FROM") || last.is_word("JOIN") {
        return Some(format!("{sql} {PLACEHOLDER}"));
    }
    if last.is_word("ON") || last.is_word("WHERE") || last.is_word("AND") || last.is_word("OR") {
        return Some(format!("{sql} 1 = 1"));
    }
    None
}

fn fix_unclosed_parens(sql: &str, _cursor_offset: usize) -> Option<String> {
    let tokens = significant_tokens(sql);
    let open = tokens.iter().filter(|t| t.is_symbol("(")).count();
    let close = tokens.iter().filter(|t| t.is_symbol(")")).count();
    if open <= close {
        return None;
    }
    let missing = open - close;
    if missing > MAX_PAREN_FIXES {
        return None;
    }
    Some(format!("{sql}{}", ")".repeat(missing)))
}

/// Offsets just before clause keywords, latest first.
fn truncation_candidates(sql: &str) -> Vec<usize> {
    let mut candidates: Vec<usize> = significant_tokens(sql)
        .iter()
        .filter(|token| {
            CLAUSE_KEYWORDS
                .iter()
                .any(|keyword| token.is_word(keyword))
        })
        .map(|token| token.span.start)
        .filter(|&start| start > 0)
        .collect();
    candidates.sort_unstable_by(|a, b| b.cmp(a));
    candidates.dedup();
    candidates
}

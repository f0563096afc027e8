//! Cursor context: where the cursor sits relative to the statement's tokens.
//!
//! Every helper takes byte offsets and tolerates offsets past the end of the
//! text or inside a multi-byte character.

use crate::helpers::floor_char_boundary;
use crate::tokens::{significant_tokens, tokenize, SqlToken, SqlTokenKind};
use crate::types::{ReplaceOffsets, Span};

/// Clause the cursor is in, judged by the most recent clause keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    /// Nothing typed yet, or only unrelated tokens.
    Start,
    Select,
    From,
    Join,
    Where,
    On,
    GroupBy,
    OrderBy,
    Having,
}

/// The in-progress token at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialToken {
    /// Start of the token, including an opening `[`.
    pub start: usize,
    /// Text typed so far, without the opening `[`.
    pub word: String,
    /// Inside an unclosed `[...]`.
    pub bracketed: bool,
}

impl PartialToken {
    pub fn span(&self, cursor: usize) -> Span {
        Span::new(self.start, cursor)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '@' | '#' | '$')
}

/// True when the cursor is inside a string literal or a comment.
pub fn in_literal_or_comment(text: &str, cursor: usize) -> bool {
    let cursor = floor_char_boundary(text, cursor);
    let prefix = &text[..cursor];
    let Some(last) = tokenize(prefix).pop() else {
        return false;
    };
    if last.span.end < cursor {
        return false;
    }
    let raw = &prefix[last.span.start..last.span.end];
    match last.kind {
        SqlTokenKind::StringLiteral => !is_closed_string(raw),
        SqlTokenKind::Comment if raw.starts_with("--") => !raw.ends_with('\n'),
        SqlTokenKind::Comment => !(raw.len() >= 4 && raw.ends_with("*/")),
        _ => false,
    }
}

/// `'abc'` and `N'it''s'` are closed, `'abc` and `'it''` are not.
fn is_closed_string(raw: &str) -> bool {
    let body = raw.trim_start_matches(['N', 'n', 'E', 'e', 'X', 'x']);
    body.len() >= 2 && body.ends_with('\'') && body.matches('\'').count() % 2 == 0
}

/// The token being typed at `cursor`.
pub fn partial_token(text: &str, cursor: usize) -> PartialToken {
    let cursor = floor_char_boundary(text, cursor);
    let prefix = &text[..cursor];

    if let Some(open) = open_bracket(prefix) {
        return PartialToken {
            start: open,
            word: prefix[open + 1..].to_string(),
            bracketed: true,
        };
    }

    let start = prefix
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_word_char(*ch))
        .last()
        .map(|(index, _)| index)
        .unwrap_or(cursor);
    PartialToken {
        start,
        word: prefix[start..].to_string(),
        bracketed: false,
    }
}

/// Offset of a `[` on the current line that has not been closed yet.
fn open_bracket(prefix: &str) -> Option<usize> {
    let line_start = prefix.rfind('\n').map_or(0, |index| index + 1);
    let line = &prefix[line_start..];
    let open = line.rfind('[')?;
    if line[open..].contains(']') {
        return None;
    }
    Some(line_start + open)
}

/// The qualifier before a dot ending right at `token_start`, and the offset
/// right after that dot. Handles `alias.` and `[My Alias].`.
pub fn qualifier_before(text: &str, token_start: usize) -> Option<(String, usize)> {
    let token_start = floor_char_boundary(text, token_start);
    let before_dot = text[..token_start].strip_suffix('.')?;

    let qualifier = if let Some(inner) = before_dot.strip_suffix(']') {
        let open = inner.rfind('[')?;
        inner[open + 1..].to_string()
    } else {
        let start = before_dot
            .char_indices()
            .rev()
            .take_while(|(_, ch)| is_word_char(*ch))
            .last()
            .map(|(index, _)| index)?;
        before_dot[start..].to_string()
    };

    (!qualifier.is_empty()).then_some((qualifier, token_start))
}

/// Significant tokens that end at or before `offset`.
pub fn tokens_before(text: &str, offset: usize) -> Vec<SqlToken> {
    let offset = floor_char_boundary(text, offset);
    significant_tokens(&text[..offset])
}

/// Clause of the most recent clause keyword in `tokens`.
pub fn current_clause(tokens: &[SqlToken]) -> Clause {
    for (index, token) in tokens.iter().enumerate().rev() {
        let followed_by_by = tokens.get(index + 1).is_some_and(|next| next.is_word("BY"));
        let clause = match token.upper().as_str() {
            "SELECT" => Clause::Select,
            "FROM" => Clause::From,
            "JOIN" | "APPLY" => Clause::Join,
            "WHERE" => Clause::Where,
            "ON" => Clause::On,
            "HAVING" => Clause::Having,
            "GROUP" if followed_by_by => Clause::GroupBy,
            "ORDER" if followed_by_by => Clause::OrderBy,
            _ => continue,
        };
        if token.kind == SqlTokenKind::Word {
            return clause;
        }
    }
    Clause::Start
}

/// The cursor is where a table name goes: right after FROM/JOIN, after a
/// comma in the FROM list, or after an `ENT.` qualifier there.
pub fn expects_table_name(tokens: &[SqlToken]) -> bool {
    let Some(last) = tokens.last() else {
        return false;
    };
    if last.is_word("FROM") || last.is_word("JOIN") {
        return true;
    }
    if last.is_symbol(",") {
        return current_clause(tokens) == Clause::From;
    }
    if last.is_symbol(".") && tokens.len() >= 2 && tokens[tokens.len() - 2].is_word("ENT") {
        return expects_table_name(&tokens[..tokens.len() - 2]);
    }
    false
}

/// A `*` after `tokens` would be a SELECT-list item: it follows SELECT,
/// DISTINCT, ALL, a TOP clause, or a comma of the SELECT list itself.
pub fn starts_select_item(tokens: &[SqlToken]) -> bool {
    let Some(last) = tokens.last() else {
        return false;
    };
    if last.is_word("SELECT") || last.is_word("DISTINCT") || last.is_word("ALL") {
        return true;
    }
    if last.is_symbol(",") {
        return comma_in_select_list(&tokens[..tokens.len() - 1]);
    }
    ends_top_clause(tokens)
}

/// The comma ending `tokens` separates SELECT-list items at the SELECT's own
/// parenthesis depth.
fn comma_in_select_list(tokens: &[SqlToken]) -> bool {
    let mut depth = 0usize;
    for token in tokens.iter().rev() {
        if token.is_symbol(")") {
            depth += 1;
        } else if token.is_symbol("(") {
            if depth == 0 {
                return false;
            }
            depth -= 1;
        } else if depth == 0 && token.kind == SqlTokenKind::Word {
            match token.upper().as_str() {
                "SELECT" => return true,
                "FROM" | "WHERE" | "GROUP" | "ORDER" | "HAVING" | "JOIN" | "ON" | "APPLY" => {
                    return false
                }
                _ => {}
            }
        }
    }
    false
}

/// `TOP n`, `TOP (n)`, optionally with `PERCENT` and `WITH TIES`.
fn ends_top_clause(tokens: &[SqlToken]) -> bool {
    let mut end = tokens.len();
    if end >= 2 && tokens[end - 1].is_word("TIES") && tokens[end - 2].is_word("WITH") {
        end -= 2;
    }
    if end >= 1 && tokens[end - 1].is_word("PERCENT") {
        end -= 1;
    }
    let tokens = &tokens[..end];
    match tokens.last() {
        Some(last) if last.kind == SqlTokenKind::Number => {
            tokens.len() >= 2 && tokens[tokens.len() - 2].is_word("TOP")
        }
        Some(last) if last.is_symbol(")") => {
            let mut depth = 0usize;
            for (index, token) in tokens.iter().enumerate().rev() {
                if token.is_symbol(")") {
                    depth += 1;
                } else if token.is_symbol("(") {
                    depth -= 1;
                    if depth == 0 {
                        return index > 0 && tokens[index - 1].is_word("TOP");
                    }
                }
            }
            false
        }
        _ => false,
    }
}

/// Nesting level of the innermost parenthesized query around `cursor`, and
/// its byte range from `(` through the matching `)` (or the end of text).
/// Level 0 spans the whole text.
pub fn enclosing_query(text: &str, cursor: usize) -> (usize, Span) {
    let tokens = significant_tokens(text);
    let mut open: Vec<(usize, bool)> = Vec::new();
    let mut rest = tokens.len();
    for (index, token) in tokens.iter().enumerate() {
        if token.span.start >= cursor {
            rest = index;
            break;
        }
        if token.is_symbol("(") {
            let opens_query = tokens
                .get(index + 1)
                .is_some_and(|next| next.is_word("SELECT") || next.is_word("WITH"));
            open.push((token.span.start, opens_query));
        } else if token.is_symbol(")") {
            open.pop();
        }
    }

    let level = open.iter().filter(|(_, opens_query)| *opens_query).count();
    let Some(position) = open.iter().rposition(|(_, opens_query)| *opens_query) else {
        return (0, Span::new(0, text.len()));
    };

    let mut depth = open.len();
    let mut end = text.len();
    for token in &tokens[rest..] {
        if token.is_symbol("(") {
            depth += 1;
        } else if token.is_symbol(")") {
            depth -= 1;
            if depth == position {
                end = token.span.end;
                break;
            }
        }
    }
    (level, Span::new(open[position].0, end))
}

/// Range an accepted item replaces: the partial token, stretched over the
/// rest of the editor's word and an auto-inserted closing bracket.
pub fn replace_range(
    text: &str,
    start: usize,
    cursor: usize,
    word_range: Option<Span>,
    bracket_range: Option<Span>,
) -> ReplaceOffsets {
    let cursor = floor_char_boundary(text, cursor);
    let mut start = start.min(cursor);
    let mut end = cursor;

    if let Some(range) = word_range.map(|range| range.clamp_to(text.len())) {
        if range.start <= cursor && range.end >= cursor {
            end = end.max(range.end);
        }
    }
    if let Some(range) = bracket_range.map(|range| range.clamp_to(text.len())) {
        if range.start <= cursor && range.end >= cursor {
            start = start.min(range.start);
            end = end.max(range.end);
        }
    } else if text[start..].starts_with('[') && text[end..].starts_with(']') {
        end += 1;
    }

    ReplaceOffsets::new(start, floor_char_boundary(text, end))
}

/// Ranking of `label` against typed text: exact, prefix, substring, none.
pub fn prefix_score(label: &str, typed: &str) -> i32 {
    if typed.is_empty() {
        return 0;
    }
    let label = label.to_lowercase();
    let typed = typed.to_lowercase();
    if label == typed {
        300
    } else if label.starts_with(&typed) {
        200
    } else if label.contains(&typed) {
        100
    } else {
        0
    }
}

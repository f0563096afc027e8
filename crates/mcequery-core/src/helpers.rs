//! Small text helpers shared across components.

/// Converts a 1-based line and column (counted in characters, as sqlparser
/// reports them) into a byte offset.
///
/// A column one past the last character of a line maps to the line end.
pub fn line_col_to_offset(sql: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 || column == 0 {
        return None;
    }

    let bytes = sql.as_bytes();
    let mut current_line = 1;
    let mut offset = 0;

    while current_line < line {
        let remaining = bytes.get(offset..)?;
        let newline_pos = remaining.iter().position(|&b| b == b'\n')?;
        offset += newline_pos + 1;
        current_line += 1;
    }

    let line_start = offset;
    let remaining = bytes.get(line_start..)?;
    let line_len = remaining
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(remaining.len());
    let line_end = line_start + line_len;
    let line_slice = &sql[line_start..line_end];

    let mut current_column = 1;
    for (rel_offset, _) in line_slice.char_indices() {
        if current_column == column {
            return Some(line_start + rel_offset);
        }
        current_column += 1;
    }

    if column == current_column {
        return Some(line_end);
    }

    None
}

/// Largest char boundary of `text` that is `<= offset`.
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Strips one level of `[...]` or `"..."` quoting from an identifier.
pub fn unquote_identifier(name: &str) -> &str {
    let trimmed = name.trim();
    if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return inner;
    }
    if let Some(inner) = trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return inner;
    }
    trimmed
}

/// Brackets a field or table name when it cannot be written bare.
pub fn bracket_if_needed(name: &str) -> String {
    let needs_brackets = name.is_empty()
        || name.chars().any(|ch| !(ch.is_alphanumeric() || ch == '_'))
        || name.starts_with(|ch: char| ch.is_ascii_digit());
    if needs_brackets {
        format!("[{name}]")
    } else {
        name.to_string()
    }
}

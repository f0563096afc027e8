//! Keyword suggestions per clause.

use super::context::{prefix_score, Clause};
use crate::types::{CompletionItem, CompletionItemKind, ReplaceOffsets};

/// Keywords that open a table position; inserted with a bracket pair and the
/// cursor placed inside.
const TABLE_KEYWORDS: &[&str] = &[
    "FROM",
    "JOIN",
    "INNER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "FULL JOIN",
    "CROSS JOIN",
    "LEFT OUTER JOIN",
];

const START: &[&str] = &["SELECT"];

const SELECT_LIST: &[&str] = &[
    "FROM", "TOP", "DISTINCT", "AS", "CASE", "WHEN", "THEN", "ELSE", "END", "CAST", "CONVERT",
    "COUNT", "SUM", "AVG", "MIN", "MAX", "ISNULL", "COALESCE",
];

const AFTER_TABLE: &[&str] = &[
    "WHERE",
    "INNER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "FULL JOIN",
    "CROSS JOIN",
    "JOIN",
    "ON",
    "AS",
    "GROUP BY",
    "ORDER BY",
    "UNION",
    "UNION ALL",
];

const CONDITION: &[&str] = &[
    "AND", "OR", "NOT", "IN", "LIKE", "BETWEEN", "IS NULL", "IS NOT NULL", "EXISTS", "GROUP BY",
    "ORDER BY",
];

const GROUP_BY: &[&str] = &["HAVING", "ORDER BY"];

const ORDER_BY: &[&str] = &["ASC", "DESC", "OFFSET", "ROWS", "FETCH NEXT", "ONLY"];

pub fn keywords_for(clause: Clause) -> &'static [&'static str] {
    match clause {
        Clause::Start => START,
        Clause::Select => SELECT_LIST,
        Clause::From | Clause::Join => AFTER_TABLE,
        Clause::Where | Clause::On | Clause::Having => CONDITION,
        Clause::GroupBy => GROUP_BY,
        Clause::OrderBy => ORDER_BY,
    }
}

/// Keyword items for `clause`, filtered by the typed word.
///
/// `rank_prefix` leads every sort text, so callers can demote keywords below
/// table or field suggestions.
pub fn keyword_items(
    clause: Clause,
    typed: &str,
    replace: ReplaceOffsets,
    rank_prefix: char,
) -> Vec<CompletionItem> {
    keywords_for(clause)
        .iter()
        .enumerate()
        .filter(|(_, keyword)| typed.is_empty() || prefix_score(keyword, typed) >= 200)
        .map(|(index, keyword)| {
            let item = if TABLE_KEYWORDS.contains(keyword) {
                CompletionItem::new(
                    *keyword,
                    format!("{keyword} [$0]"),
                    CompletionItemKind::Snippet,
                    replace,
                )
                .as_snippet()
            } else {
                CompletionItem::new(*keyword, *keyword, CompletionItemKind::Keyword, replace)
            };
            item.with_sort_text(format!("{rank_prefix}-{index:03}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_is_bracket_snippet() {
        let items = keyword_items(Clause::Select, "fr", ReplaceOffsets::new(9, 11), '5');
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].insert_text, "FROM [$0]");
        assert!(items[0].insert_as_snippet);
        assert_eq!(items[0].kind, CompletionItemKind::Snippet);
    }

    #[test]
    fn test_plain_keyword_inserts_literally() {
        let items = keyword_items(Clause::From, "wh", ReplaceOffsets::new(0, 2), '5');
        assert_eq!(items[0].insert_text, "WHERE");
        assert!(!items[0].insert_as_snippet);
    }

    #[test]
    fn test_start_of_statement() {
        let items = keyword_items(Clause::Start, "", ReplaceOffsets::empty_at(0), '5');
        assert_eq!(items.iter().map(|i| i.label.as_str()).collect::<Vec<_>>(), vec!["SELECT"]);
    }
}

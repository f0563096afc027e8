use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Span, TableReference};

/// A table the editor may offer after FROM/JOIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableSource {
    pub name: String,
    /// Shared across business units; referenced through the `ENT.` qualifier.
    #[serde(default)]
    pub shared: bool,
}

impl TableSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: false,
        }
    }

    pub fn shared(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: true,
        }
    }
}

/// Tuning knobs for the completion engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionOptions {
    /// Minimum partial-word length before non-explicit completion fires.
    pub min_word_length: usize,
    pub max_table_suggestions: usize,
    /// How many ranked table suggestions get a live field count.
    pub field_count_fanout: usize,
    /// Offer the platform system data views; also makes `_` an immediate trigger.
    pub system_views_loaded: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            min_word_length: 2,
            max_table_suggestions: 50,
            field_count_fanout: 10,
            system_views_loaded: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub text: String,
    /// Byte offset of the cursor in `text`.
    pub cursor_offset: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_character: Option<char>,
    #[serde(default)]
    pub is_explicit_trigger: bool,
    /// Pre-resolved scope. Resolved from `text` when empty.
    #[serde(default)]
    pub tables_in_scope: Vec<TableReference>,
    #[serde(default)]
    pub available_tables: Vec<TableSource>,
    /// Whether the account has a parent business unit, which enables shared sources.
    #[serde(default)]
    pub has_tenant: bool,
    /// Editor's word range at the cursor, if the caller has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_range: Option<Span>,
    /// Range of an enclosing `[...]` pair, including an auto-inserted `]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket_range: Option<Span>,
    #[serde(default)]
    pub options: CompletionOptions,
}

impl CompletionRequest {
    pub fn new(text: impl Into<String>, cursor_offset: usize) -> Self {
        Self {
            text: text.into(),
            cursor_offset,
            ..Self::default()
        }
    }

    /// Request with the cursor at the end of `text`.
    pub fn at_end(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor_offset = text.len();
        Self::new(text, cursor_offset)
    }

    pub fn explicit(mut self) -> Self {
        self.is_explicit_trigger = true;
        self
    }

    pub fn with_trigger(mut self, trigger: char) -> Self {
        self.trigger_character = Some(trigger);
        self
    }

    pub fn with_tables(mut self, tables: Vec<TableSource>) -> Self {
        self.available_tables = tables;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum CompletionItemKind {
    Keyword,
    Table,
    Field,
    Snippet,
    Expansion,
    Issue,
}

impl CompletionItemKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CompletionItemKind::Keyword => "keyword",
            CompletionItemKind::Table => "table",
            CompletionItemKind::Field => "field",
            CompletionItemKind::Snippet => "snippet",
            CompletionItemKind::Expansion => "expansion",
            CompletionItemKind::Issue => "issue",
        }
    }
}

/// Byte range in the request text that an accepted item replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOffsets {
    pub start_offset: usize,
    pub end_offset: usize,
}

impl ReplaceOffsets {
    pub fn new(start_offset: usize, end_offset: usize) -> Self {
        Self {
            start_offset,
            end_offset,
        }
    }

    pub fn empty_at(offset: usize) -> Self {
        Self::new(offset, offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    pub insert_text: String,
    pub kind: CompletionItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub insert_as_snippet: bool,
    pub replace_offsets: ReplaceOffsets,
}

impl CompletionItem {
    pub fn new(
        label: impl Into<String>,
        insert_text: impl Into<String>,
        kind: CompletionItemKind,
        replace_offsets: ReplaceOffsets,
    ) -> Self {
        Self {
            label: label.into(),
            insert_text: insert_text.into(),
            kind,
            sort_text: None,
            detail: None,
            insert_as_snippet: false,
            replace_offsets,
        }
    }

    pub fn with_sort_text(mut self, sort_text: impl Into<String>) -> Self {
        self.sort_text = Some(sort_text.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn as_snippet(mut self) -> Self {
        self.insert_as_snippet = true;
        self
    }
}

/// Outcome of expanding a trailing `*` into an explicit column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum AsteriskExpansion {
    None,
    Issue {
        message: String,
        detail: String,
    },
    Expand {
        expanded_columns: String,
        column_count: usize,
        replace_offsets: ReplaceOffsets,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion_serializes_tagged() {
        let expansion = AsteriskExpansion::Expand {
            expanded_columns: "s.LastName".to_string(),
            column_count: 1,
            replace_offsets: ReplaceOffsets::new(7, 8),
        };
        let json = serde_json::to_value(&expansion).unwrap();
        assert_eq!(json["type"], "expand");
        assert_eq!(json["columnCount"], 1);
        assert_eq!(json["replaceOffsets"]["startOffset"], 7);
    }

    #[test]
    fn test_options_default_from_empty_json() {
        let options: CompletionOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, CompletionOptions::default());
        assert_eq!(options.min_word_length, 2);
    }

    #[test]
    fn test_snippet_flag_omitted_when_false() {
        let item = CompletionItem::new(
            "SELECT",
            "SELECT",
            CompletionItemKind::Keyword,
            ReplaceOffsets::empty_at(0),
        );
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("insertAsSnippet").is_none());
        assert_eq!(json["kind"], "keyword");
    }
}

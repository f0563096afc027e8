//! Integration tests for the completion engine.

mod common;

use common::account_metadata;
use mcequery_core::{complete, CompletionItemKind, CompletionRequest, ReplaceOffsets, Span, TableSource};

fn labels(items: &[mcequery_core::CompletionItem]) -> Vec<&str> {
    items.iter().map(|item| item.label.as_str()).collect()
}

#[tokio::test]
async fn alias_dot_returns_fields_of_that_table_only() {
    let sql = "SELECT o. FROM [Contacts] c JOIN [Orders] o ON c.SubscriberKey = o.SubscriberKey";
    let request = CompletionRequest::new(sql, 9).with_trigger('.');
    let items = complete(&request, &account_metadata()).await;
    let mut found = labels(&items);
    found.sort_unstable();
    assert_eq!(found, vec!["OrderId", "PlacedOn", "SubscriberKey", "Total"]);
    assert!(items.iter().all(|item| item.replace_offsets.start_offset == 9));
}

#[tokio::test]
async fn alias_dot_ignores_minimum_word_length() {
    let sql = "SELECT c.E FROM [Contacts] c";
    let request = CompletionRequest::new(sql, 10);
    let items = complete(&request, &account_metadata()).await;
    assert_eq!(items[0].label, "EmailAddress");
    assert!(items.iter().all(|item| item.kind == CompletionItemKind::Field));
    assert_eq!(items[0].replace_offsets, ReplaceOffsets::new(9, 10));
}

#[tokio::test]
async fn bracketed_alias_resolves() {
    let sql = "SELECT [c]. FROM [Contacts] [c]";
    let request = CompletionRequest::new(sql, 11).with_trigger('.');
    let items = complete(&request, &account_metadata()).await;
    assert_eq!(items.len(), 4);
}

#[tokio::test]
async fn subquery_alias_uses_projected_names() {
    let sql = "SELECT s. FROM (SELECT EmailAddress AS Email, Age FROM [Contacts]) s";
    let request = CompletionRequest::new(sql, 9).with_trigger('.');
    let items = complete(&request, &account_metadata()).await;
    let mut found = labels(&items);
    found.sort_unstable();
    assert_eq!(found, vec!["Age", "Email"]);
}

#[tokio::test]
async fn from_offers_tables_before_keywords() {
    let request = CompletionRequest::at_end("SELECT * FROM ")
        .explicit()
        .with_tables(vec![TableSource::new("Contacts"), TableSource::new("Orders")]);
    let items = complete(&request, &account_metadata()).await;

    let first_keyword = items
        .iter()
        .position(|item| matches!(item.kind, CompletionItemKind::Keyword | CompletionItemKind::Snippet))
        .unwrap();
    let last_table = items
        .iter()
        .rposition(|item| item.kind == CompletionItemKind::Table)
        .unwrap();
    assert!(last_table < first_keyword);
    assert!(items
        .iter()
        .any(|item| item.label == "_Sent" && item.insert_text == "[_Sent]"));
    assert!(items[0].sort_text < items[first_keyword].sort_text);
}

#[tokio::test]
async fn fanout_limits_field_counts() {
    let mut request = CompletionRequest::at_end("SELECT * FROM ")
        .explicit()
        .with_tables(vec![TableSource::new("Contacts"), TableSource::new("Orders")]);
    request.options.field_count_fanout = 1;
    request.options.system_views_loaded = false;
    let items = complete(&request, &account_metadata()).await;
    let tables: Vec<_> = items
        .iter()
        .filter(|item| item.kind == CompletionItemKind::Table)
        .collect();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].detail.as_deref(), Some("4 fields"));
    assert_eq!(tables[1].detail, None);
}

#[tokio::test]
async fn table_suggestions_are_capped_and_deduplicated() {
    let mut request = CompletionRequest::at_end("SELECT * FROM ")
        .explicit()
        .with_tables(vec![
            TableSource::new("Contacts"),
            TableSource::new("contacts"),
            TableSource::new("Orders"),
            TableSource::new("Zebra"),
        ]);
    request.options.max_table_suggestions = 2;
    request.options.system_views_loaded = false;
    let items = complete(&request, &account_metadata()).await;
    let tables: Vec<_> = items
        .iter()
        .filter(|item| item.kind == CompletionItemKind::Table)
        .map(|item| item.label.as_str())
        .collect();
    assert_eq!(tables, vec!["Contacts", "Orders"]);
}

#[tokio::test]
async fn closing_bracket_is_absorbed() {
    let sql = "SELECT * FROM [Ord]";
    let request = CompletionRequest::new(sql, 18)
        .with_trigger('[')
        .with_tables(vec![TableSource::new("Orders")]);
    let items = complete(&request, &account_metadata()).await;
    assert_eq!(items[0].insert_text, "[Orders]");
    assert_eq!(items[0].replace_offsets, ReplaceOffsets::new(14, 19));
}

#[tokio::test]
async fn editor_bracket_range_wins() {
    let sql = "SELECT * FROM [Ord]";
    let mut request = CompletionRequest::new(sql, 18).with_tables(vec![TableSource::new("Orders")]);
    request.trigger_character = Some('[');
    request.bracket_range = Some(Span::new(14, 19));
    let items = complete(&request, &account_metadata()).await;
    assert_eq!(items[0].replace_offsets, ReplaceOffsets::new(14, 19));
}

#[tokio::test]
async fn shared_qualifier_lists_shared_tables() {
    let mut request = CompletionRequest::at_end("SELECT * FROM ENT.")
        .with_trigger('.')
        .with_tables(vec![TableSource::new("Contacts"), TableSource::shared("Global Preferences")]);
    request.has_tenant = true;
    let items = complete(&request, &account_metadata()).await;
    let tables: Vec<_> = items
        .iter()
        .filter(|item| item.kind == CompletionItemKind::Table)
        .collect();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].insert_text, "ENT.[Global Preferences]");
    assert_eq!(tables[0].replace_offsets, ReplaceOffsets::new(14, 18));
}

#[tokio::test]
async fn underscore_triggers_system_views() {
    let request = CompletionRequest::at_end("SELECT * FROM _").with_trigger('_');
    let items = complete(&request, &account_metadata()).await;
    assert!(items.iter().any(|item| item.label == "_Sent"));

    let mut request = CompletionRequest::at_end("SELECT * FROM _").with_trigger('_');
    request.options.system_views_loaded = false;
    assert!(complete(&request, &account_metadata()).await.is_empty());
}

#[tokio::test]
async fn from_keyword_opens_brackets() {
    let request = CompletionRequest::at_end("SELECT EmailAddress FR");
    let items = complete(&request, &account_metadata()).await;
    let from = items.iter().find(|item| item.label == "FROM").unwrap();
    assert_eq!(from.insert_text, "FROM [$0]");
    assert!(from.insert_as_snippet);
}

#[tokio::test]
async fn comment_blocks_completion() {
    let request = CompletionRequest::at_end("SELECT * -- FROM Con").explicit();
    assert!(complete(&request, &account_metadata()).await.is_empty());
}

#[tokio::test]
async fn explicit_star_with_two_unaliased_tables_is_issue() {
    let sql = "SELECT * FROM [Contacts], [Orders]";
    let request = CompletionRequest::new(sql, 8).explicit();
    let items = complete(&request, &account_metadata()).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, CompletionItemKind::Issue);
}

#[tokio::test]
async fn unparsable_statement_still_gets_keywords() {
    let request = CompletionRequest::at_end("SELECT ((( WHE").explicit();
    let items = complete(&request, &account_metadata()).await;
    assert!(items.iter().all(|item| item.kind != CompletionItemKind::Field));
}

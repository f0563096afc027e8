//! Integration tests for `SELECT *` expansion.

mod common;

use common::account_metadata;
use mcequery_core::{
    expand_asterisk, resolve_scope_for_completion, AsteriskExpansion, ReplaceOffsets,
    TableReference,
};

async fn expand(text_before_cursor: &str, full_sql: &str) -> AsteriskExpansion {
    let cursor = text_before_cursor.len();
    let scope = resolve_scope_for_completion(full_sql, cursor);
    expand_asterisk(text_before_cursor, cursor, &scope.tables, &account_metadata()).await
}

#[tokio::test]
async fn two_unaliased_tables_need_aliases() {
    let result = expand("SELECT *", "SELECT * FROM [Contacts] JOIN [Orders] ON 1 = 1").await;
    let AsteriskExpansion::Issue { message, .. } = result else {
        panic!("expected an issue, got {result:?}");
    };
    assert_eq!(message, "Add table aliases to expand *");
}

#[tokio::test]
async fn subquery_columns_are_qualified_and_bracketed() {
    let tables = vec![TableReference::subquery(
        "s",
        vec!["First Name".to_string(), "LastName".to_string()],
    )];
    let result = expand_asterisk("SELECT *", 8, &tables, &account_metadata()).await;
    assert_eq!(
        result,
        AsteriskExpansion::Expand {
            expanded_columns: "s.[First Name], s.LastName".to_string(),
            column_count: 2,
            replace_offsets: ReplaceOffsets::new(7, 8),
        }
    );
}

#[tokio::test]
async fn single_unaliased_table_is_not_qualified() {
    let result = expand("SELECT *", "SELECT * FROM [Subscribers]").await;
    let AsteriskExpansion::Expand {
        expanded_columns,
        column_count,
        ..
    } = result
    else {
        panic!("expected an expansion, got {result:?}");
    };
    assert_eq!(column_count, 3);
    assert_eq!(expanded_columns, "SubscriberKey, EmailAddress, Status");
}

#[tokio::test]
async fn joined_tables_expand_in_declaration_order() {
    let sql = "SELECT * FROM [Subscribers] s JOIN [Orders] o ON s.SubscriberKey = o.SubscriberKey";
    let result = expand("SELECT *", sql).await;
    let AsteriskExpansion::Expand {
        expanded_columns,
        column_count,
        ..
    } = result
    else {
        panic!("expected an expansion, got {result:?}");
    };
    assert_eq!(column_count, 7);
    assert!(expanded_columns.starts_with("s.SubscriberKey, s.EmailAddress, s.Status, o.OrderId"));
}

#[tokio::test]
async fn nested_tables_do_not_take_part() {
    let sql = "SELECT * FROM [Subscribers] s WHERE s.SubscriberKey IN (SELECT SubscriberKey FROM [Orders])";
    let result = expand("SELECT *", sql).await;
    let AsteriskExpansion::Expand { column_count, .. } = result else {
        panic!("expected an expansion, got {result:?}");
    };
    assert_eq!(column_count, 3);
}

#[tokio::test]
async fn unknown_tables_report_no_columns() {
    let result = expand("SELECT *", "SELECT * FROM [Nowhere] n").await;
    assert!(matches!(
        result,
        AsteriskExpansion::Issue { ref message, .. } if message == "No columns found to expand *"
    ));
}

#[tokio::test]
async fn no_trailing_star_is_a_no_op() {
    let result = expand("SELECT a", "SELECT a FROM [Contacts] c").await;
    assert_eq!(result, AsteriskExpansion::None);
}

#[tokio::test]
async fn system_views_expand_without_metadata() {
    let result = expand("SELECT *", "SELECT * FROM _Job j").await;
    let AsteriskExpansion::Expand {
        expanded_columns, ..
    } = result
    else {
        panic!("expected an expansion, got {result:?}");
    };
    assert!(expanded_columns.starts_with("j."));
    assert!(expanded_columns.contains("j.JobID"));
}

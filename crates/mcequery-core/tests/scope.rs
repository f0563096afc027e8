//! Integration tests for scope resolution.

use mcequery_core::{resolve_scope, resolve_scope_for_completion};

#[test]
fn aliases_and_spans_point_at_the_table_names() {
    let sql = "SELECT c.EmailAddress FROM [Contacts] AS c INNER JOIN _Open o ON c.SubscriberKey = o.SubscriberKey";
    let scope = resolve_scope(sql);

    assert_eq!(scope.tables.len(), 2);
    let contacts = &scope.tables[0];
    assert_eq!(contacts.name, "Contacts");
    assert_eq!(contacts.alias.as_deref(), Some("c"));
    assert_eq!(&sql[contacts.start_index..contacts.end_index], "[Contacts]");
    assert_eq!(scope.map.resolve("O"), Some("_Open"));
    assert_eq!(scope.map.resolve("contacts"), Some("Contacts"));
}

#[test]
fn nested_selects_are_one_level_deeper() {
    let sql = "SELECT * FROM [Contacts] c WHERE c.SubscriberKey IN (SELECT SubscriberKey FROM [Orders])";
    let scope = resolve_scope(sql);
    let depths: Vec<_> = scope
        .tables
        .iter()
        .map(|table| (table.name.as_str(), table.scope_depth))
        .collect();
    assert_eq!(depths, vec![("Contacts", 0), ("Orders", 1)]);
}

#[test]
fn derived_table_exposes_its_columns() {
    let scope = resolve_scope(
        "SELECT d.Email FROM (SELECT EmailAddress AS Email, Age FROM [Contacts]) d",
    );
    let derived = scope.lookup("d").unwrap();
    assert!(derived.is_subquery);
    assert_eq!(derived.output_fields, vec!["Email", "Age"]);
}

#[test]
fn cte_reference_reads_as_subquery() {
    let scope = resolve_scope(
        "WITH active AS (SELECT SubscriberKey FROM [Subscribers] WHERE Status = 'Active') SELECT a.SubscriberKey FROM active a",
    );
    let active = scope.lookup("a").unwrap();
    assert!(active.is_subquery);
    assert_eq!(active.name, "active");
    assert_eq!(active.output_fields, vec!["SubscriberKey"]);
}

#[test]
fn duplicate_alias_binds_to_the_last_declaration() {
    let scope = resolve_scope("SELECT x.Id FROM [First] x JOIN [Second] x ON 1 = 1");
    assert_eq!(scope.lookup("x").map(|t| t.name.as_str()), Some("Second"));
    assert_eq!(scope.map.resolve("x"), Some("Second"));
}

#[test]
fn unparsable_statement_is_empty() {
    assert!(resolve_scope("SELECT * FROM").is_empty());
}

#[test]
fn completion_repairs_dangling_join() {
    let sql = "SELECT * FROM [Contacts] c JOIN ";
    let scope = resolve_scope_for_completion(sql, sql.len());
    assert_eq!(scope.lookup("c").map(|t| t.name.as_str()), Some("Contacts"));
    assert!(scope.tables.iter().all(|table| table.end_index <= sql.len()));
}

#[test]
fn completion_repairs_unclosed_subquery() {
    let sql = "SELECT s. FROM (SELECT EmailAddress FROM [Contacts]";
    let scope = resolve_scope_for_completion(sql, 9);
    assert!(scope.tables.iter().any(|table| table.name == "Contacts"));
}

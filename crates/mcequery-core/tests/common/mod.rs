use mcequery_core::{Field, FieldType, StaticMetadata};

/// Metadata for a small subscriber/order account used across the tests.
#[allow(dead_code)]
pub fn account_metadata() -> StaticMetadata {
    StaticMetadata::new()
        .with_table(
            "Contacts",
            vec![
                Field::new("SubscriberKey", FieldType::Text).with_length(254),
                Field::new("EmailAddress", FieldType::EmailAddress).with_length(254),
                Field::text("First Name", 50),
                Field::new("Age", FieldType::Integer),
            ],
        )
        .with_table(
            "Subscribers",
            vec![
                Field::new("SubscriberKey", FieldType::Text).with_length(254),
                Field::new("EmailAddress", FieldType::EmailAddress).with_length(254),
                Field::text("Status", 20),
            ],
        )
        .with_table(
            "Orders",
            vec![
                Field::new("OrderId", FieldType::Integer),
                Field::text("SubscriberKey", 254),
                Field::new("Total", FieldType::Decimal),
                Field::new("PlacedOn", FieldType::Date),
            ],
        )
}

/// Diagnostic codes of `sql` with default options.
#[allow(dead_code)]
pub fn codes(sql: &str) -> Vec<String> {
    mcequery_core::lint(sql, &mcequery_core::LintOptions::default())
        .into_iter()
        .map(|diagnostic| diagnostic.code)
        .collect()
}

//! Account metadata loaded from a JSON description of the account's tables.
//!
//! ```json
//! { "tables": [ { "name": "Contacts", "shared": false,
//!                 "fields": [ { "name": "EmailAddress", "type": "EmailAddress", "length": 254 } ] } ] }
//! ```

use anyhow::{Context, Result};
use mcequery_core::{Field, StaticMetadata, TableSource};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct MetadataFile {
    #[serde(default)]
    tables: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    name: String,
    #[serde(default)]
    shared: bool,
    #[serde(default)]
    fields: Vec<Field>,
}

/// Everything the CLI knows about the account: the fetcher plus the table
/// list offered by completion and used to spot multi-word names.
#[derive(Debug, Clone, Default)]
pub struct AccountMetadata {
    pub fetcher: StaticMetadata,
    pub tables: Vec<TableSource>,
}

impl AccountMetadata {
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|table| table.name.as_str()).collect()
    }

    /// Whether any table is shared from a parent business unit.
    pub fn has_shared_tables(&self) -> bool {
        self.tables.iter().any(|table| table.shared)
    }
}

/// Load account metadata from `path`; an absent path yields an empty account.
pub fn load_metadata(path: Option<&Path>) -> Result<AccountMetadata> {
    let Some(path) = path else {
        return Ok(AccountMetadata::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata file: {}", path.display()))?;
    parse_metadata(&content)
        .with_context(|| format!("Failed to parse metadata file: {}", path.display()))
}

fn parse_metadata(content: &str) -> Result<AccountMetadata> {
    let file: MetadataFile = serde_json::from_str(content)?;
    let mut account = AccountMetadata::default();
    for table in file.tables {
        account.fetcher.insert(&table.name, table.fields);
        account.tables.push(TableSource {
            name: table.name,
            shared: table.shared,
        });
    }
    Ok(account)
}

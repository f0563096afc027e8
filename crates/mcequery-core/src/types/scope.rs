use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Span;

/// One FROM/JOIN entry of a statement, possibly nested inside a subquery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    /// Table name as written (without brackets). For derived tables this is the alias.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub is_subquery: bool,
    /// Projected column names of a subquery, so `alias.` can complete without a fetch.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_fields: Vec<String>,
    /// Nesting depth of the SELECT that owns this reference (0 = outermost).
    #[serde(default)]
    pub scope_depth: usize,
    #[serde(default)]
    pub start_index: usize,
    #[serde(default)]
    pub end_index: usize,
}

impl TableReference {
    pub fn table(name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            name: name.into(),
            alias,
            is_subquery: false,
            output_fields: Vec::new(),
            scope_depth: 0,
            start_index: 0,
            end_index: 0,
        }
    }

    pub fn subquery(alias: impl Into<String>, output_fields: Vec<String>) -> Self {
        let alias = alias.into();
        Self {
            name: alias.clone(),
            alias: Some(alias),
            is_subquery: true,
            output_fields,
            scope_depth: 0,
            start_index: 0,
            end_index: 0,
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.scope_depth = depth;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.start_index = span.start;
        self.end_index = span.end;
        self
    }

    pub fn span(&self) -> Span {
        Span::new(self.start_index, self.end_index)
    }

    /// The name other clauses use to refer to this table: the alias when present.
    pub fn visible_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Case-insensitive mapping from alias-or-table-name to the canonical table name.
///
/// Keys are stored lower-cased. Later bindings replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ScopeMap(HashMap<String, String>);

impl ScopeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, table_name: &str) {
        self.0.insert(key.to_lowercase(), table_name.to_string());
    }

    /// Resolves an alias or table name to its canonical table name.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Builds the map for a list of references in declaration order.
    pub fn from_tables(tables: &[TableReference]) -> Self {
        let mut map = Self::new();
        for table in tables {
            map.insert(&table.name, &table.name);
            if let Some(alias) = &table.alias {
                map.insert(alias, &table.name);
            }
        }
        map
    }
}

/// Table bindings derived from one statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub tables: Vec<TableReference>,
    pub map: ScopeMap,
}

impl Scope {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: Vec<TableReference>) -> Self {
        let map = ScopeMap::from_tables(&tables);
        Self { tables, map }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Finds the reference bound to an alias or table name.
    ///
    /// When several references share the key, the most recently declared one wins.
    pub fn lookup(&self, key: &str) -> Option<&TableReference> {
        self.tables.iter().rev().find(|table| {
            table
                .alias
                .as_deref()
                .is_some_and(|alias| alias.eq_ignore_ascii_case(key))
                || table.name.eq_ignore_ascii_case(key)
        })
    }
}

//! Lint rule trait and the context rules run against.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::config::LintOptions;
use crate::catalog::system_view_fields;
use crate::scope::{analyze, QueryModel};
use crate::tokens::{significant_tokens, SqlToken};
use crate::types::{Diagnostic, TableReference};

/// How a rule looks at the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum LintEngine {
    /// Token scan; runs even when the statement does not parse.
    Lexical,
    /// Needs the parsed query model; skipped on parse failure.
    Semantic,
}

/// Input shared by every rule for one lint pass.
pub struct LintContext<'a> {
    pub sql: &'a str,
    /// Tokens without whitespace and comments.
    pub tokens: Vec<SqlToken>,
    /// `None` when the SQL does not parse as a query.
    pub model: Option<QueryModel>,
    table_fields: HashMap<String, Vec<String>>,
    known_tables: Vec<String>,
}

impl<'a> LintContext<'a> {
    pub fn new(sql: &'a str, options: &LintOptions) -> Self {
        Self {
            sql,
            tokens: significant_tokens(sql),
            model: analyze(sql),
            table_fields: options
                .table_fields
                .iter()
                .map(|(table, fields)| (table.to_lowercase(), fields.clone()))
                .collect(),
            known_tables: options.known_tables.clone(),
        }
    }

    /// Field names a FROM entry exposes: a subquery's projected names, then
    /// caller-supplied metadata, then the system view catalog.
    pub fn fields_for(&self, table: &TableReference) -> Option<Vec<String>> {
        if table.is_subquery {
            return Some(table.output_fields.clone());
        }
        if let Some(fields) = self.table_fields.get(&table.name.to_lowercase()) {
            return Some(fields.clone());
        }
        system_view_fields(&table.name)
            .map(|fields| fields.into_iter().map(|field| field.name).collect())
    }

    /// Table names known to exist, from both the explicit list and the
    /// metadata map.
    pub fn known_tables(&self) -> impl Iterator<Item = &str> {
        self.known_tables
            .iter()
            .map(String::as_str)
            .chain(self.table_fields.keys().map(String::as_str))
    }
}

/// A single lint rule.
pub trait LintRule: Send + Sync {
    /// Machine-readable rule code (e.g., "LINT_ST_001").
    fn code(&self) -> &'static str;

    /// Short human-readable name.
    fn name(&self) -> &'static str;

    /// Longer description of what this rule checks.
    fn description(&self) -> &'static str;

    fn engine(&self) -> LintEngine;

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic>;
}

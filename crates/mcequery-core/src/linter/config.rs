//! Configuration for the linter.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Controls which lint rules run. By default all rules are enabled.
///
/// The rule catalogs themselves (prohibited keywords, unsupported functions)
/// are fixed and cannot be changed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LintConfig {
    /// Master toggle for linting (default: true).
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Rule codes to disable (e.g., ["LINT_ST_003"]).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_rules: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled_rules: Vec::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

impl LintConfig {
    pub fn is_rule_enabled(&self, code: &str) -> bool {
        self.enabled
            && !self
                .disabled_rules
                .iter()
                .any(|rule| rule.eq_ignore_ascii_case(code))
    }
}

/// Everything the linter knows besides the SQL text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LintOptions {
    #[serde(default)]
    pub config: LintConfig,

    /// Field names per table, used for ambiguous-column detection.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub table_fields: HashMap<String, Vec<String>>,

    /// Table names the account has, used to spot unbracketed multi-word names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_tables: Vec<String>,
}

impl LintOptions {
    pub fn with_config(config: LintConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_table(mut self, name: &str, fields: &[&str]) -> Self {
        self.table_fields.insert(
            name.to_string(),
            fields.iter().map(|field| (*field).to_string()).collect(),
        );
        self
    }

    pub fn with_known_tables(mut self, tables: &[&str]) -> Self {
        self.known_tables
            .extend(tables.iter().map(|table| (*table).to_string()));
        self
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Severity, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum DecorationKind {
    Error,
    Warning,
    Prereq,
    Table,
    Subquery,
}

impl From<Severity> for DecorationKind {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => DecorationKind::Error,
            Severity::Warning => DecorationKind::Warning,
            Severity::Prereq => DecorationKind::Prereq,
        }
    }
}

/// An editor marker range over the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub start_index: usize,
    pub end_index: usize,
    pub kind: DecorationKind,
}

impl Decoration {
    pub fn span(&self) -> Span {
        Span::new(self.start_index, self.end_index)
    }
}

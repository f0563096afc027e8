//! Common types shared by every analysis component.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A byte range in the source SQL string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    /// Byte offset from start of SQL string (inclusive)
    pub start: usize,
    /// Byte offset from start of SQL string (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Clamps both ends into `[0, len]` so offsets never escape the source text.
    pub fn clamp_to(self, len: usize) -> Self {
        let start = self.start.min(len);
        Self {
            start,
            end: self.end.clamp(start, len),
        }
    }
}

/// Diagnostic severity.
///
/// `Error` blocks execution of the query. `Warning` and `Prereq` are advisory;
/// `Prereq` marks a statement that is not complete yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Prereq,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Prereq => "prereq",
        }
    }

    /// Sort rank used to order diagnostics that share a location.
    pub(crate) const fn rank(&self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Prereq => 2,
        }
    }
}

/// A lint finding for one region of the query text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Machine-readable rule code
    pub code: String,

    /// Human-readable message
    pub message: String,

    pub severity: Severity,

    /// Byte offset where the flagged region starts (inclusive)
    pub start_index: usize,

    /// Byte offset where the flagged region ends (exclusive)
    pub end_index: usize,
}

impl Diagnostic {
    fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
            start_index: 0,
            end_index: 0,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn prereq(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Prereq, code, message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.start_index = span.start;
        self.end_index = span.end;
        self
    }

    pub fn span(&self) -> Span {
        Span::new(self.start_index, self.end_index)
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Machine-readable diagnostic codes.
pub mod issue_codes {
    // Statement shape
    pub const LINT_ST_001: &str = "LINT_ST_001";
    pub const LINT_ST_002: &str = "LINT_ST_002";
    pub const LINT_ST_003: &str = "LINT_ST_003";
    pub const LINT_ST_004: &str = "LINT_ST_004";

    // Clauses
    pub const LINT_CL_001: &str = "LINT_CL_001";
    pub const LINT_CL_002: &str = "LINT_CL_002";

    // Functions
    pub const LINT_FN_001: &str = "LINT_FN_001";

    // Aggregation
    pub const LINT_AG_001: &str = "LINT_AG_001";

    // References
    pub const LINT_RF_001: &str = "LINT_RF_001";
    pub const LINT_RF_002: &str = "LINT_RF_002";

    // Prerequisites
    pub const LINT_PQ_001: &str = "LINT_PQ_001";
    pub const LINT_PQ_002: &str = "LINT_PQ_002";
}

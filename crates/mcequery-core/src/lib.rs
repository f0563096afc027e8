//! Analysis core for the Marketing Cloud Engagement query dialect.
//!
//! Lints T-SQL against the platform's restrictions, computes editor
//! completions and infers the output schema of a SELECT without running it.
//! Every entry point is stateless; table metadata comes in through the
//! [`MetadataFetcher`] seam.

pub mod catalog;
pub mod completion;
pub mod decoration;
pub mod error;
pub mod helpers;
pub mod inference;
pub mod linter;
pub mod metadata;
pub mod parser;
pub mod scope;
pub mod tokens;
pub mod types;

pub use completion::{complete, expand_asterisk};
pub use decoration::{diagnostic_decorations, table_decorations};
pub use error::{InferenceError, MetadataError, ParseError};
pub use inference::infer_schema;
pub use linter::config::{LintConfig, LintOptions};
pub use linter::{has_blocking_errors, lint, lint_with_metadata, Linter};
pub use metadata::{CachingFetcher, MetadataFetcher, StaticMetadata};
pub use parser::parse_sql;
pub use scope::{resolve_scope, resolve_scope_for_completion};

pub use types::{
    issue_codes, AsteriskExpansion, CompletionItem, CompletionItemKind, CompletionOptions,
    CompletionRequest, Decoration, DecorationKind, Diagnostic, Field, FieldType, InferredField,
    ReplaceOffsets, Scope, ScopeMap, Severity, Span, TableReference, TableSource,
};

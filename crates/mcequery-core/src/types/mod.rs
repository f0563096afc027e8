//! Public data types of the analysis API.
//!
//! Every type serializes with camelCase field names so results can be handed
//! to an editor front end unchanged.

mod common;
mod completion;
mod decoration;
mod schema;
mod scope;

pub use common::{issue_codes, Diagnostic, Severity, Span};
pub use completion::{
    AsteriskExpansion, CompletionItem, CompletionItemKind, CompletionOptions, CompletionRequest,
    ReplaceOffsets, TableSource,
};
pub use decoration::{Decoration, DecorationKind};
pub use schema::{Field, FieldType, InferredField};
pub use scope::{Scope, ScopeMap, TableReference};

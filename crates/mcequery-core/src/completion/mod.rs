//! Completion Engine: cursor-driven suggestions for the query editor.
//!
//! The decision order is fixed. Literals and comments get nothing, a
//! trailing `*` on explicit request gets an expansion, short words get
//! nothing unless the trigger is immediate, and then the cursor position
//! picks between alias fields, table names, SELECT-list fields and plain
//! keywords.

pub mod asterisk;
pub mod context;
pub mod keywords;

use futures_util::future::join_all;
use tracing::debug;

use crate::catalog::SYSTEM_VIEWS;
use crate::helpers::{bracket_if_needed, floor_char_boundary};
use crate::metadata::{fields_for_table, MetadataFetcher};
use crate::scope::resolve_scope_for_completion;
use crate::types::{
    AsteriskExpansion, CompletionItem, CompletionItemKind, CompletionRequest, Field,
    ReplaceOffsets, Scope, TableReference,
};

pub use asterisk::expand_asterisk;
use context::{
    current_clause, enclosing_query, expects_table_name, in_literal_or_comment, partial_token,
    prefix_score, qualifier_before, replace_range, starts_select_item, tokens_before, Clause,
};
use crate::tokens::SqlToken;
use keywords::keyword_items;

/// Sort-text rank for suggestions shown ahead of keywords.
const PRIMARY_RANK: char = '0';
/// Sort-text rank for keywords when something better is offered.
const DEMOTED_RANK: char = '9';
/// Sort-text rank for keywords on their own.
const KEYWORD_RANK: char = '5';

const SHARED_QUALIFIER: &str = "ENT";

/// Suggestions for the cursor position in `request`.
pub async fn complete(
    request: &CompletionRequest,
    fetcher: &dyn MetadataFetcher,
) -> Vec<CompletionItem> {
    let text = request.text.as_str();
    let cursor = floor_char_boundary(text, request.cursor_offset);

    if in_literal_or_comment(text, cursor) {
        debug!(cursor, "cursor inside literal or comment");
        return Vec::new();
    }

    let scope = if request.tables_in_scope.is_empty() {
        resolve_scope_for_completion(text, cursor)
    } else {
        Scope::from_tables(request.tables_in_scope.clone())
    };

    let prefix = &text[..cursor];
    if request.is_explicit_trigger && prefix.ends_with('*') {
        let tokens = tokens_before(text, cursor);
        if current_clause(&tokens) == Clause::Select && star_is_select_item(&tokens) {
            match expand_asterisk(prefix, cursor, &scope.tables, fetcher).await {
                AsteriskExpansion::None => {}
                AsteriskExpansion::Issue { message, detail } => {
                    debug!("asterisk expansion reported an issue");
                    return vec![CompletionItem::new(
                        message,
                        "*",
                        CompletionItemKind::Issue,
                        ReplaceOffsets::new(cursor - 1, cursor),
                    )
                    .with_detail(detail)];
                }
                AsteriskExpansion::Expand {
                    expanded_columns,
                    column_count,
                    replace_offsets,
                } => {
                    debug!(column_count, "asterisk expanded");
                    return vec![CompletionItem::new(
                        format!("Expand * to {column_count} columns"),
                        expanded_columns.clone(),
                        CompletionItemKind::Expansion,
                        replace_offsets,
                    )
                    .with_detail(expanded_columns)];
                }
            }
        }
    }

    let token = partial_token(text, cursor);
    let qualifier = qualifier_before(text, token.start);
    let immediate = is_immediate_trigger(request) || qualifier.is_some();
    if !request.is_explicit_trigger
        && !immediate
        && token.word.chars().count() < request.options.min_word_length
    {
        return Vec::new();
    }

    let tokens = tokens_before(text, token.start);
    let clause = current_clause(&tokens);
    let replace = replace_range(
        text,
        token.start,
        cursor,
        request.word_range,
        request.bracket_range,
    );

    if let Some((qualifier, after_dot)) = &qualifier {
        let shared_prefix = qualifier.eq_ignore_ascii_case(SHARED_QUALIFIER)
            && expects_table_name(&tokens);
        if !shared_prefix {
            let Some(table) = scope.lookup(qualifier) else {
                debug!(qualifier = qualifier.as_str(), "qualifier not in scope");
                return Vec::new();
            };
            debug!(table = table.name.as_str(), "completing alias fields");
            let replace = replace_range(
                text,
                *after_dot,
                cursor,
                request.word_range,
                request.bracket_range,
            );
            let fields = table_fields(table, fetcher).await;
            return field_items(&fields, None, &token.word, replace);
        }
    }

    if expects_table_name(&tokens) || (token.bracketed && matches!(clause, Clause::From | Clause::Join)) {
        debug!("completing table names");
        let shared_prefix = qualifier.is_some();
        let start = if shared_prefix {
            // replace the typed `ENT.` too
            token.start.saturating_sub(SHARED_QUALIFIER.len() + 1)
        } else {
            token.start
        };
        let replace = replace_range(text, start, cursor, request.word_range, request.bracket_range);
        let mut items = table_items(request, &token.word, shared_prefix, replace, fetcher).await;
        items.extend(keyword_items(clause, &token.word, replace, DEMOTED_RANK));
        return items;
    }

    if clause == Clause::Select {
        let primary = cursor_block_tables(text, cursor, &scope.tables);
        if let [table] = primary.as_slice() {
            debug!(table = table.name.as_str(), "completing select-list fields");
            let fields = table_fields(table, fetcher).await;
            let mut items = field_items(&fields, table.alias.as_deref(), &token.word, replace);
            items.extend(keyword_items(clause, &token.word, replace, DEMOTED_RANK));
            return items;
        }
    }

    keyword_items(clause, &token.word, replace, KEYWORD_RANK)
}

fn is_immediate_trigger(request: &CompletionRequest) -> bool {
    match request.trigger_character {
        Some('.') | Some('[') => true,
        Some('_') => request.options.system_views_loaded,
        _ => false,
    }
}

/// `tokens` end with a `*` or `alias.*` that is a SELECT-list item, not a
/// multiplication or a `COUNT(*)` argument.
fn star_is_select_item(tokens: &[SqlToken]) -> bool {
    let Some((star, before)) = tokens.split_last() else {
        return false;
    };
    if !star.is_symbol("*") {
        return false;
    }
    match before {
        [head @ .., qualifier, dot] if dot.is_symbol(".") && qualifier.is_identifier() => {
            starts_select_item(head)
        }
        _ => starts_select_item(before),
    }
}

/// Tables of the SELECT the cursor is in: the innermost parenthesized query
/// around it, or the outermost query.
fn cursor_block_tables<'a>(
    text: &str,
    cursor: usize,
    tables: &'a [TableReference],
) -> Vec<&'a TableReference> {
    let (level, range) = enclosing_query(text, cursor);
    if level == 0 {
        return outermost(tables);
    }
    let at_level = tables.iter().filter(|table| table.scope_depth == level);
    let inside: Vec<&TableReference> = at_level
        .clone()
        .filter(|table| table.start_index > range.start && table.end_index <= range.end)
        .collect();
    if inside.is_empty() {
        at_level.collect()
    } else {
        inside
    }
}

fn outermost(tables: &[TableReference]) -> Vec<&TableReference> {
    let Some(depth) = tables.iter().map(|table| table.scope_depth).min() else {
        return Vec::new();
    };
    tables
        .iter()
        .filter(|table| table.scope_depth == depth)
        .collect()
}

/// Fields of a scope entry. Subqueries expose their projected names as text.
async fn table_fields(table: &TableReference, fetcher: &dyn MetadataFetcher) -> Vec<Field> {
    if table.is_subquery {
        return table
            .output_fields
            .iter()
            .map(|name| Field::new(name.clone(), crate::types::FieldType::Text))
            .collect();
    }
    fields_for_table(fetcher, &table.name)
        .await
        .unwrap_or_default()
}

fn field_items(
    fields: &[Field],
    alias: Option<&str>,
    typed: &str,
    replace: ReplaceOffsets,
) -> Vec<CompletionItem> {
    let mut ranked: Vec<(i32, &Field)> = fields
        .iter()
        .map(|field| (prefix_score(&field.name, typed), field))
        .filter(|(score, _)| typed.is_empty() || *score > 0)
        .collect();
    ranked.sort_by(|(a, left), (b, right)| b.cmp(a).then_with(|| left.name.cmp(&right.name)));

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (_, field))| {
            let name = bracket_if_needed(&field.name);
            let insert_text = match alias {
                Some(alias) => format!("{}.{name}", bracket_if_needed(alias)),
                None => name,
            };
            let detail = match field.length {
                Some(length) => format!("{} ({length})", field.field_type),
                None => field.field_type.to_string(),
            };
            CompletionItem::new(field.name.clone(), insert_text, CompletionItemKind::Field, replace)
                .with_sort_text(format!("{PRIMARY_RANK}-{index:04}"))
                .with_detail(detail)
        })
        .collect()
}

struct TableCandidate {
    name: String,
    shared: bool,
    score: i32,
}

async fn table_items(
    request: &CompletionRequest,
    typed: &str,
    shared_only: bool,
    replace: ReplaceOffsets,
    fetcher: &dyn MetadataFetcher,
) -> Vec<CompletionItem> {
    let options = &request.options;
    let system_views = SYSTEM_VIEWS
        .iter()
        .filter(|_| options.system_views_loaded)
        .map(|(name, _)| (name.to_string(), false));
    let sources = request
        .available_tables
        .iter()
        .filter(|table| !table.shared || request.has_tenant)
        .map(|table| (table.name.clone(), table.shared))
        .chain(system_views);

    let mut candidates: Vec<TableCandidate> = Vec::new();
    for (name, shared) in sources {
        if shared_only && !shared {
            continue;
        }
        let score = prefix_score(&name, typed);
        if !typed.is_empty() && score == 0 {
            continue;
        }
        let duplicate = candidates
            .iter()
            .any(|c| c.shared == shared && c.name.eq_ignore_ascii_case(&name));
        if !duplicate {
            candidates.push(TableCandidate { name, shared, score });
        }
    }
    candidates.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    candidates.truncate(options.max_table_suggestions);

    let fanout = options.field_count_fanout.min(candidates.len());
    let counts = join_all(candidates[..fanout].iter().map(|candidate| async move {
        fields_for_table(fetcher, &candidate.name)
            .await
            .map(|fields| fields.len())
    }))
    .await;

    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let bracketed = format!("[{}]", candidate.name);
            let insert_text = if candidate.shared {
                format!("{SHARED_QUALIFIER}.{bracketed}")
            } else {
                bracketed
            };
            let label = if candidate.shared {
                format!("{SHARED_QUALIFIER}.{}", candidate.name)
            } else {
                candidate.name.clone()
            };
            let mut item = CompletionItem::new(label, insert_text, CompletionItemKind::Table, replace)
                .with_sort_text(format!("{PRIMARY_RANK}-{index:04}"));
            if let Some(Some(count)) = counts.get(index) {
                item = item.with_detail(format!("{count} fields"));
            }
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::StaticMetadata;
    use crate::types::TableSource;

    fn metadata() -> StaticMetadata {
        StaticMetadata::new()
            .with_table(
                "Contacts",
                vec![Field::text("EmailAddress", 254), Field::text("First Name", 50)],
            )
            .with_table("Orders", vec![Field::text("OrderId", 50)])
    }

    #[tokio::test]
    async fn test_inside_string_returns_nothing() {
        let request = CompletionRequest::at_end("SELECT 'Con").explicit();
        assert!(complete(&request, &metadata()).await.is_empty());
    }

    #[tokio::test]
    async fn test_short_word_without_trigger() {
        let request = CompletionRequest::at_end("SELECT E");
        assert!(complete(&request, &metadata()).await.is_empty());
    }

    #[tokio::test]
    async fn test_alias_dot_fields() {
        let sql = "SELECT c. FROM [Contacts] c";
        let request = CompletionRequest::new(sql, 9).with_trigger('.');
        let items = complete(&request, &metadata()).await;
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.kind == CompletionItemKind::Field));
        assert!(items.iter().all(|i| i.replace_offsets == ReplaceOffsets::new(9, 9)));
        assert!(items.iter().any(|i| i.insert_text == "[First Name]"));
    }

    #[tokio::test]
    async fn test_table_position() {
        let request = CompletionRequest::at_end("SELECT * FROM Con")
            .with_tables(vec![TableSource::new("Contacts"), TableSource::new("Orders")]);
        let items = complete(&request, &metadata()).await;
        assert_eq!(items[0].label, "Contacts");
        assert_eq!(items[0].insert_text, "[Contacts]");
        assert_eq!(items[0].detail.as_deref(), Some("2 fields"));
        assert_eq!(items[0].replace_offsets, ReplaceOffsets::new(14, 17));
        assert!(items.iter().all(|i| i.label != "Orders"));
    }

    #[tokio::test]
    async fn test_shared_tables_need_tenant() {
        let tables = vec![TableSource::shared("Global Contacts")];
        let request = CompletionRequest::at_end("SELECT * FROM Glo").with_tables(tables.clone());
        assert!(complete(&request, &metadata()).await.is_empty());

        let mut request = CompletionRequest::at_end("SELECT * FROM Glo").with_tables(tables);
        request.has_tenant = true;
        let items = complete(&request, &metadata()).await;
        assert_eq!(items[0].insert_text, "ENT.[Global Contacts]");
    }

    #[tokio::test]
    async fn test_select_list_single_table() {
        let sql = "SELECT Em FROM [Contacts] c";
        let request = CompletionRequest::new(sql, 9);
        let items = complete(&request, &metadata()).await;
        assert_eq!(items[0].label, "EmailAddress");
        assert_eq!(items[0].insert_text, "c.EmailAddress");
        assert_eq!(items[0].kind, CompletionItemKind::Field);
    }

    #[tokio::test]
    async fn test_explicit_star_expands() {
        let sql = "SELECT * FROM [Contacts] c";
        let request = CompletionRequest::new(sql, 8).explicit();
        let items = complete(&request, &metadata()).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, CompletionItemKind::Expansion);
        assert_eq!(items[0].insert_text, "c.EmailAddress, c.[First Name]");
        assert_eq!(items[0].replace_offsets, ReplaceOffsets::new(7, 8));
    }

    #[tokio::test]
    async fn test_qualified_star_replaces_alias_and_star() {
        let sql = "SELECT c.* FROM [Contacts] c JOIN [Orders] o ON 1 = 1";
        let request = CompletionRequest::new(sql, 10).explicit();
        let items = complete(&request, &metadata()).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].insert_text, "c.EmailAddress, c.[First Name]");
        assert_eq!(items[0].replace_offsets, ReplaceOffsets::new(7, 10));

        let edited = format!("{}{}{}", &sql[..7], items[0].insert_text, &sql[10..]);
        assert!(edited.starts_with("SELECT c.EmailAddress, c.[First Name] FROM"));
    }

    #[tokio::test]
    async fn test_star_inside_count_is_not_expanded() {
        let sql = "SELECT COUNT(*";
        let mut request = CompletionRequest::new(sql, sql.len()).explicit();
        request.tables_in_scope = vec![TableReference::table("Contacts", Some("c".to_string()))];
        let items = complete(&request, &metadata()).await;
        assert!(items
            .iter()
            .all(|i| !matches!(i.kind, CompletionItemKind::Expansion | CompletionItemKind::Issue)));
    }

    #[tokio::test]
    async fn test_multiplication_star_is_not_expanded() {
        let sql = "SELECT Age * FROM [Contacts] c";
        let request = CompletionRequest::new(sql, 12).explicit();
        let items = complete(&request, &metadata()).await;
        assert!(items
            .iter()
            .all(|i| !matches!(i.kind, CompletionItemKind::Expansion | CompletionItemKind::Issue)));
    }

    #[tokio::test]
    async fn test_select_list_inside_derived_table() {
        let sql = "SELECT * FROM (SELECT Em FROM [Contacts]) s";
        let request = CompletionRequest::new(sql, 24);
        let items = complete(&request, &metadata()).await;
        assert_eq!(items[0].label, "EmailAddress");
        assert_eq!(items[0].insert_text, "EmailAddress");
    }

    #[tokio::test]
    async fn test_default_keywords() {
        let request = CompletionRequest::at_end("SEL");
        let items = complete(&request, &metadata()).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].insert_text, "SELECT");
    }
}

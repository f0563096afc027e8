//! Schema Type Inferencer: the output columns of a SELECT, typed without
//! running it.
//!
//! Field metadata for every real table in the statement is fetched up front
//! (concurrently, system views first). Typing itself is a synchronous walk
//! over the query model. Derived tables and CTEs are typed recursively so
//! their column types flow into the enclosing SELECT.

pub mod naming;
pub mod types;

use std::collections::HashMap;

use tracing::debug;

use crate::error::InferenceError;
use crate::metadata::{fields_for_tables, MetadataFetcher};
use crate::scope::analyze_strict;
use crate::scope::model::{ColumnExpression, ColumnRef, ProjectionItem, QueryModel, SelectBlock};
use crate::types::{Field, FieldType, InferredField, TableReference};
use naming::{base_name, dedupe_names};
use types::{
    binary_type, cast_target_type, function_type, literal_type, ColumnType, DEFAULT_PRECISION,
    DEFAULT_SCALE, DEFAULT_TEXT_LENGTH, FUNCTION_TEXT_LENGTH,
};

/// Nesting limit for derived-table typing.
const MAX_DERIVED_DEPTH: usize = 16;

/// Infers the output schema of `sql`.
pub async fn infer_schema(
    sql: &str,
    fetcher: &dyn MetadataFetcher,
) -> Result<Vec<InferredField>, InferenceError> {
    let model = analyze_strict(sql)?.ok_or(InferenceError::NotASelect)?;

    let mut names: Vec<String> = Vec::new();
    for table in model.tables.iter().filter(|table| !table.is_subquery) {
        if !names.iter().any(|name| name.eq_ignore_ascii_case(&table.name)) {
            names.push(table.name.clone());
        }
    }
    let fetched = fields_for_tables(fetcher, &names).await;
    let catalog: HashMap<String, Vec<Field>> = names
        .into_iter()
        .zip(fetched)
        .filter_map(|(name, fields)| fields.map(|fields| (name.to_lowercase(), fields)))
        .collect();

    let inferencer = Inferencer {
        model: &model,
        catalog: &catalog,
    };
    let main = model.main_block_index().ok_or(InferenceError::NoColumns)?;
    let columns = inferencer.block_columns(main, 0);
    if columns.is_empty() {
        return Err(InferenceError::NoColumns);
    }
    debug!(columns = columns.len(), tables = catalog.len(), "inferred schema");

    let (names, types): (Vec<String>, Vec<ColumnType>) = columns.into_iter().unzip();
    Ok(dedupe_names(names)
        .into_iter()
        .zip(types)
        .map(|(name, column_type)| finalize(name, column_type))
        .collect())
}

struct Inferencer<'a> {
    model: &'a QueryModel,
    /// Fields per real table, keyed by lower-cased name.
    catalog: &'a HashMap<String, Vec<Field>>,
}

impl Inferencer<'_> {
    /// Named, typed columns of one SELECT. Star items are skipped.
    fn block_columns(&self, index: usize, nesting: usize) -> Vec<(String, ColumnType)> {
        let Some(block) = self.model.block(index) else {
            return Vec::new();
        };
        block
            .projection
            .iter()
            .filter_map(|item| match item {
                ProjectionItem::Expr { expr, .. } => {
                    Some((base_name(item), self.expr_type(block, expr, nesting)))
                }
                _ => None,
            })
            .collect()
    }

    fn expr_type(&self, block: &SelectBlock, expr: &ColumnExpression, nesting: usize) -> ColumnType {
        match expr {
            ColumnExpression::Column(column) => self.column_type(block, column, nesting),
            ColumnExpression::Literal(literal) => literal_type(*literal),
            ColumnExpression::Function(call) => {
                let arguments: Vec<ColumnType> = call
                    .args
                    .iter()
                    .map(|arg| self.expr_type(block, arg, nesting))
                    .collect();
                function_type(call, &arguments)
            }
            ColumnExpression::Cast { target, .. } => cast_target_type(target),
            ColumnExpression::Case {
                results,
                else_result,
                ..
            } => results
                .first()
                .or(else_result.as_deref())
                .map(|branch| self.expr_type(block, branch, nesting))
                .unwrap_or_else(ColumnType::unknown),
            ColumnExpression::Binary { left, right, .. } => binary_type(
                self.expr_type(block, left, nesting),
                self.expr_type(block, right, nesting),
            ),
            ColumnExpression::Unary(inner) => self.expr_type(block, inner, nesting),
            ColumnExpression::Subquery(Some(index)) if nesting < MAX_DERIVED_DEPTH => self
                .block_columns(*index, nesting + 1)
                .into_iter()
                .next()
                .map(|(_, column_type)| column_type)
                .unwrap_or_else(ColumnType::unknown),
            ColumnExpression::Subquery(_) | ColumnExpression::Other(_) => ColumnType::unknown(),
        }
    }

    /// Resolves a column through its qualifier, else by searching the
    /// SELECT's own tables and then every table of the statement.
    fn column_type(&self, block: &SelectBlock, column: &ColumnRef, nesting: usize) -> ColumnType {
        if let Some(qualifier) = &column.qualifier {
            let qualifier = qualifier.rsplit('.').next().unwrap_or(qualifier);
            let source = block
                .sources
                .iter()
                .find(|source| names_table(&source.reference, qualifier))
                .map(|source| (&source.reference, source.body))
                .or_else(|| {
                    self.model
                        .tables
                        .iter()
                        .rev()
                        .find(|table| names_table(table, qualifier))
                        .map(|table| (table, None))
                });
            return source
                .and_then(|(table, body)| self.table_column(table, body, &column.name, nesting))
                .unwrap_or_else(ColumnType::unknown);
        }

        block
            .sources
            .iter()
            .find_map(|source| {
                self.table_column(&source.reference, source.body, &column.name, nesting)
            })
            .or_else(|| {
                self.model
                    .tables
                    .iter()
                    .find_map(|table| self.table_column(table, None, &column.name, nesting))
            })
            .unwrap_or_else(ColumnType::unknown)
    }

    fn table_column(
        &self,
        table: &TableReference,
        body: Option<usize>,
        name: &str,
        nesting: usize,
    ) -> Option<ColumnType> {
        if table.is_subquery {
            let exposes = table
                .output_fields
                .iter()
                .any(|field| field.eq_ignore_ascii_case(name));
            if !exposes {
                return None;
            }
            let typed = body
                .filter(|_| nesting < MAX_DERIVED_DEPTH)
                .and_then(|index| {
                    self.block_columns(index, nesting + 1)
                        .into_iter()
                        .find(|(column, _)| column.eq_ignore_ascii_case(name))
                        .map(|(_, column_type)| column_type)
                });
            return Some(typed.unwrap_or_else(ColumnType::unknown));
        }

        self.catalog
            .get(&table.name.to_lowercase())?
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
            .map(ColumnType::from_field)
    }
}

fn names_table(table: &TableReference, qualifier: &str) -> bool {
    table
        .alias
        .as_deref()
        .is_some_and(|alias| alias.eq_ignore_ascii_case(qualifier))
        || table.name.eq_ignore_ascii_case(qualifier)
        || table
            .name
            .rsplit('.')
            .next()
            .is_some_and(|name| name.eq_ignore_ascii_case(qualifier))
}

/// Fills the attributes every output field must carry.
fn finalize(name: String, column_type: ColumnType) -> InferredField {
    let field_type = column_type.field_type;
    let (length, precision, scale) = if field_type.is_textual() {
        let fallback = if column_type.from_function {
            FUNCTION_TEXT_LENGTH
        } else {
            DEFAULT_TEXT_LENGTH
        };
        (Some(column_type.length.unwrap_or(fallback)), None, None)
    } else if field_type == FieldType::Decimal {
        (
            None,
            Some(column_type.precision.unwrap_or(DEFAULT_PRECISION)),
            Some(column_type.scale.unwrap_or(DEFAULT_SCALE)),
        )
    } else {
        (None, None, None)
    };

    InferredField {
        name,
        field_type,
        length,
        scale,
        precision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::StaticMetadata;

    fn metadata() -> StaticMetadata {
        StaticMetadata::new().with_table(
            "Orders",
            vec![
                Field::new("Id", FieldType::Integer),
                Field::new("Amount", FieldType::Decimal),
                Field::text("Customer", 100),
                Field::new("PlacedOn", FieldType::Date),
            ],
        )
    }

    async fn infer(sql: &str) -> Vec<InferredField> {
        infer_schema(sql, &metadata()).await.unwrap()
    }

    #[tokio::test]
    async fn test_count_star() {
        let fields = infer("SELECT COUNT(*) FROM [Orders]").await;
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, FieldType::Integer);
    }

    #[tokio::test]
    async fn test_cast_to_varchar() {
        let fields = infer("SELECT CAST(ID AS VARCHAR(10)) FROM [T]").await;
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert_eq!(fields[0].length, Some(10));
    }

    #[tokio::test]
    async fn test_column_types_come_from_metadata() {
        let fields = infer("SELECT o.Customer, Amount, PlacedOn FROM [Orders] o").await;
        assert_eq!(fields[0].length, Some(100));
        assert_eq!(fields[1].field_type, FieldType::Decimal);
        assert_eq!((fields[1].precision, fields[1].scale), (Some(18), Some(2)));
        assert_eq!(fields[2].field_type, FieldType::Date);
    }

    #[tokio::test]
    async fn test_unresolved_column_is_text() {
        let fields = infer("SELECT Missing FROM [Orders]").await;
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert_eq!(fields[0].length, Some(DEFAULT_TEXT_LENGTH));
    }

    #[tokio::test]
    async fn test_derived_table_types_flow_out() {
        let fields =
            infer("SELECT s.Total FROM (SELECT SUM(Amount) AS Total FROM [Orders]) s").await;
        assert_eq!(fields[0].name, "Total");
        assert_eq!(fields[0].field_type, FieldType::Decimal);
    }

    #[tokio::test]
    async fn test_cte_types_flow_out() {
        let fields = infer("WITH c AS (SELECT Id FROM [Orders]) SELECT Id FROM c").await;
        assert_eq!(fields[0].field_type, FieldType::Integer);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_suffixed() {
        let fields = infer("SELECT Id, Id, o.Id FROM [Orders] o").await;
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Id_1", "Id_2"]);
    }

    #[tokio::test]
    async fn test_function_text_is_wide() {
        let fields = infer("SELECT UPPER(Customer) AS U FROM [Orders]").await;
        assert_eq!(fields[0].length, Some(FUNCTION_TEXT_LENGTH));
    }

    #[tokio::test]
    async fn test_errors() {
        assert!(matches!(
            infer_schema("SELEC x FRM", &metadata()).await,
            Err(InferenceError::Parse(_))
        ));
        assert!(matches!(
            infer_schema("SELECT * FROM [Orders]", &metadata()).await,
            Err(InferenceError::NoColumns)
        ));
        assert!(matches!(
            infer_schema("DELETE FROM [Orders]", &metadata()).await,
            Err(InferenceError::NotASelect)
        ));
    }
}

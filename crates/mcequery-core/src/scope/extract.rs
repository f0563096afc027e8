//! Lowers sqlparser statements into the [`QueryModel`].

use sqlparser::ast::{
    DuplicateTreatment, Expr, FunctionArg, FunctionArgExpr, FunctionArguments, GroupByExpr, Ident,
    JoinConstraint, JoinOperator, ObjectName, OrderByKind, Query, Select, SelectItem,
    SelectItemQualifiedWildcardKind, SetExpr, Spanned, Statement, TableFactor, TableWithJoins,
    Value,
};

use super::model::{
    ColumnExpression, ColumnRef, CteDefinition, FunctionCall, GroupByClause, GroupedExpression,
    LiteralValue, ProjectionItem, QueryModel, SelectBlock, SourceTable,
};
use crate::helpers::line_col_to_offset;
use crate::types::{Span, TableReference};

/// Nesting limit; deeper subqueries are ignored.
const MAX_DEPTH: usize = 50;

/// Date functions whose first argument is a datepart keyword, not a column.
const DATEPART_FUNCTIONS: &[&str] = &[
    "DATEADD",
    "DATEDIFF",
    "DATEDIFF_BIG",
    "DATENAME",
    "DATEPART",
    "DATETRUNC",
];

/// Builds the model for the first query statement, if any.
pub(crate) fn build_model(statements: &[Statement], sql: &str) -> Option<QueryModel> {
    let query = statements.iter().find_map(|statement| match statement {
        Statement::Query(query) => Some(query),
        _ => None,
    })?;

    let mut extractor = Extractor {
        sql,
        model: QueryModel::default(),
        visible_ctes: Vec::new(),
    };
    let (_, order_by) = extractor.query_with_order(query, 0);
    extractor.model.order_by = order_by;
    Some(extractor.model)
}

struct Extractor<'s> {
    sql: &'s str,
    model: QueryModel,
    visible_ctes: Vec<CteDefinition>,
}

impl Extractor<'_> {
    /// Lowers a query and returns the index of its first SELECT.
    fn query(&mut self, query: &Query, depth: usize) -> Option<usize> {
        self.query_with_order(query, depth).0
    }

    fn query_with_order(
        &mut self,
        query: &Query,
        depth: usize,
    ) -> (Option<usize>, Vec<ColumnExpression>) {
        if depth > MAX_DEPTH {
            return (None, Vec::new());
        }

        let scope_mark = self.visible_ctes.len();
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                let body = self.query(&cte.query, depth + 1);
                let declared: Vec<String> = cte
                    .alias
                    .columns
                    .iter()
                    .map(|column| column.name.value.clone())
                    .collect();
                let output_fields = if declared.is_empty() {
                    body.and_then(|index| self.model.block(index))
                        .map(SelectBlock::output_names)
                        .unwrap_or_default()
                } else {
                    declared
                };
                let definition = CteDefinition {
                    name: cte.alias.name.value.clone(),
                    output_fields,
                    body,
                };
                self.visible_ctes.push(definition);
            }
        }

        let first = self.set_expr(&query.body, depth);
        let order_by = self.order_by(query, depth);

        if let (Some(index), SetExpr::Select(_)) = (first, query.body.as_ref()) {
            if let Some(block) = self.model.blocks.get_mut(index) {
                block.order_by = order_by.clone();
            }
        }

        self.visible_ctes.truncate(scope_mark);
        (first, order_by)
    }

    fn order_by(&mut self, query: &Query, depth: usize) -> Vec<ColumnExpression> {
        let Some(order_by) = &query.order_by else {
            return Vec::new();
        };
        match &order_by.kind {
            OrderByKind::Expressions(exprs) => exprs
                .iter()
                .map(|order_expr| self.expr(&order_expr.expr, depth))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn set_expr(&mut self, body: &SetExpr, depth: usize) -> Option<usize> {
        match body {
            SetExpr::Select(select) => Some(self.select(select, depth)),
            SetExpr::Query(query) => self.query(query, depth),
            SetExpr::SetOperation { left, right, .. } => {
                let first = self.set_expr(left, depth);
                self.set_expr(right, depth);
                first
            }
            _ => None,
        }
    }

    fn select(&mut self, select: &Select, depth: usize) -> usize {
        let index = self.model.blocks.len();
        self.model.blocks.push(SelectBlock {
            depth,
            sources: Vec::new(),
            projection: Vec::new(),
            group_by: GroupByClause::None,
            filters: Vec::new(),
            order_by: Vec::new(),
            into: None,
            has_from: !select.from.is_empty(),
        });

        let mut sources = Vec::new();
        let mut filters = Vec::new();
        for table in &select.from {
            self.table_with_joins(table, depth, &mut sources, &mut filters);
        }

        let projection = select
            .projection
            .iter()
            .map(|item| self.projection_item(item, depth))
            .collect();

        if let Some(selection) = &select.selection {
            filters.push(self.expr(selection, depth));
        }
        if let Some(having) = &select.having {
            filters.push(self.expr(having, depth));
        }

        let group_by = match &select.group_by {
            GroupByExpr::All(_) => GroupByClause::All,
            GroupByExpr::Expressions(exprs, _) if exprs.is_empty() => GroupByClause::None,
            GroupByExpr::Expressions(exprs, _) => GroupByClause::Expressions(
                exprs
                    .iter()
                    .map(|expr| GroupedExpression {
                        expr: self.expr(expr, depth),
                        key: normalized_key(expr),
                    })
                    .collect(),
            ),
        };

        let into = select.into.as_ref().map(|into| object_name_text(&into.name));

        if let Some(block) = self.model.blocks.get_mut(index) {
            block.sources = sources;
            block.projection = projection;
            block.group_by = group_by;
            block.filters = filters;
            block.into = into;
        }
        index
    }

    fn table_with_joins(
        &mut self,
        table: &TableWithJoins,
        depth: usize,
        sources: &mut Vec<SourceTable>,
        filters: &mut Vec<ColumnExpression>,
    ) {
        self.table_factor(&table.relation, depth, sources, filters);
        for join in &table.joins {
            self.table_factor(&join.relation, depth, sources, filters);
            if let Some(JoinConstraint::On(on)) = join_constraint(&join.join_operator) {
                filters.push(self.expr(on, depth));
            }
        }
    }

    fn table_factor(
        &mut self,
        factor: &TableFactor,
        depth: usize,
        sources: &mut Vec<SourceTable>,
        filters: &mut Vec<ColumnExpression>,
    ) {
        match factor {
            TableFactor::Table { name, alias, .. } => {
                let table_name = object_name_text(name);
                let alias_name = alias.as_ref().map(|alias| alias.name.value.clone());
                let span = self.object_name_span(name);

                let cte = (name.0.len() == 1)
                    .then(|| {
                        self.visible_ctes
                            .iter()
                            .rev()
                            .find(|cte| cte.name.eq_ignore_ascii_case(&table_name))
                            .cloned()
                    })
                    .flatten();

                let (reference, body) = match cte {
                    Some(cte) => (
                        TableReference {
                            name: cte.name.clone(),
                            alias: alias_name,
                            is_subquery: true,
                            output_fields: cte.output_fields.clone(),
                            scope_depth: depth,
                            start_index: span.start,
                            end_index: span.end,
                        },
                        cte.body,
                    ),
                    None => (
                        TableReference::table(table_name, alias_name)
                            .with_depth(depth)
                            .with_span(span),
                        None,
                    ),
                };
                self.push_source(reference, body, sources);
            }
            TableFactor::Derived {
                subquery, alias, ..
            } => {
                let position = self.model.tables.len();
                let body = self.query(subquery, depth + 1);
                let Some(alias) = alias else {
                    return;
                };
                let declared: Vec<String> = alias
                    .columns
                    .iter()
                    .map(|column| column.name.value.clone())
                    .collect();
                let output_fields = if declared.is_empty() {
                    body.and_then(|index| self.model.block(index))
                        .map(SelectBlock::output_names)
                        .unwrap_or_default()
                } else {
                    declared
                };
                let span = self.ident_span(&alias.name);
                let reference = TableReference::subquery(alias.name.value.clone(), output_fields)
                    .with_depth(depth)
                    .with_span(span);
                self.model.tables.insert(position, reference.clone());
                sources.push(SourceTable { reference, body });
            }
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => self.table_with_joins(table_with_joins, depth, sources, filters),
            _ => {}
        }
    }

    fn push_source(
        &mut self,
        reference: TableReference,
        body: Option<usize>,
        sources: &mut Vec<SourceTable>,
    ) {
        self.model.tables.push(reference.clone());
        sources.push(SourceTable { reference, body });
    }

    fn projection_item(&mut self, item: &SelectItem, depth: usize) -> ProjectionItem {
        let span = self.node_span(item.span());
        match item {
            SelectItem::Wildcard(_) => ProjectionItem::Wildcard { span },
            SelectItem::QualifiedWildcard(kind, _) => {
                let qualifier = match kind {
                    SelectItemQualifiedWildcardKind::ObjectName(name) => object_name_text(name),
                    other => other.to_string(),
                };
                ProjectionItem::QualifiedWildcard { qualifier, span }
            }
            SelectItem::UnnamedExpr(expr) => ProjectionItem::Expr {
                expr: self.expr(expr, depth),
                alias: None,
                key: normalized_key(expr),
                span,
            },
            SelectItem::ExprWithAlias { expr, alias } => ProjectionItem::Expr {
                expr: self.expr(expr, depth),
                alias: Some(alias.value.clone()),
                key: normalized_key(expr),
                span,
            },
        }
    }

    fn expr(&mut self, expr: &Expr, depth: usize) -> ColumnExpression {
        match expr {
            Expr::Identifier(ident) => ColumnExpression::Column(ColumnRef {
                qualifier: None,
                name: ident.value.clone(),
                span: self.ident_span(ident),
            }),
            Expr::CompoundIdentifier(parts) => match parts.split_last() {
                Some((last, rest)) => ColumnExpression::Column(ColumnRef {
                    qualifier: (!rest.is_empty()).then(|| {
                        rest.iter()
                            .map(|part| part.value.as_str())
                            .collect::<Vec<_>>()
                            .join(".")
                    }),
                    name: last.value.clone(),
                    span: self.ident_span(last),
                }),
                None => ColumnExpression::Other(Vec::new()),
            },
            Expr::Value(value) => ColumnExpression::Literal(literal_value(&value.value)),
            Expr::Function(function) => {
                let name = function
                    .name
                    .0
                    .last()
                    .and_then(|part| part.as_ident())
                    .map(|ident| ident.value.to_ascii_uppercase())
                    .unwrap_or_else(|| function.name.to_string().to_ascii_uppercase());
                let skip_datepart = DATEPART_FUNCTIONS.contains(&name.as_str());

                let mut args = Vec::new();
                let mut star_arg = false;
                let mut distinct = false;
                match &function.args {
                    FunctionArguments::List(list) => {
                        distinct = matches!(
                            list.duplicate_treatment,
                            Some(DuplicateTreatment::Distinct)
                        );
                        for (position, arg) in list.args.iter().enumerate() {
                            match arg {
                                FunctionArg::Unnamed(FunctionArgExpr::Expr(Expr::Identifier(
                                    _,
                                ))) if skip_datepart && position == 0 => {}
                                FunctionArg::Unnamed(FunctionArgExpr::Expr(arg))
                                | FunctionArg::Named {
                                    arg: FunctionArgExpr::Expr(arg),
                                    ..
                                } => args.push(self.expr(arg, depth)),
                                FunctionArg::Unnamed(FunctionArgExpr::Wildcard)
                                | FunctionArg::Unnamed(FunctionArgExpr::QualifiedWildcard(_)) => {
                                    star_arg = true
                                }
                                _ => {}
                            }
                        }
                    }
                    FunctionArguments::Subquery(query) => {
                        let index = self.query(query, depth + 1);
                        args.push(ColumnExpression::Subquery(index));
                    }
                    FunctionArguments::None => {}
                }

                ColumnExpression::Function(FunctionCall {
                    name,
                    args,
                    star_arg,
                    distinct,
                    is_window: function.over.is_some(),
                })
            }
            Expr::Cast {
                expr: inner,
                data_type,
                ..
            } => ColumnExpression::Cast {
                expr: Box::new(self.expr(inner, depth)),
                target: data_type.to_string().to_ascii_uppercase(),
            },
            Expr::Convert {
                expr: inner,
                data_type,
                ..
            } => {
                let inner = self.expr(inner, depth);
                match data_type {
                    Some(data_type) => ColumnExpression::Cast {
                        expr: Box::new(inner),
                        target: data_type.to_string().to_ascii_uppercase(),
                    },
                    None => ColumnExpression::Other(vec![inner]),
                }
            }
            Expr::Case {
                operand,
                conditions,
                else_result,
                ..
            } => ColumnExpression::Case {
                operand: operand
                    .as_ref()
                    .map(|operand| Box::new(self.expr(operand, depth))),
                conditions: conditions
                    .iter()
                    .map(|when| self.expr(&when.condition, depth))
                    .collect(),
                results: conditions
                    .iter()
                    .map(|when| self.expr(&when.result, depth))
                    .collect(),
                else_result: else_result
                    .as_ref()
                    .map(|result| Box::new(self.expr(result, depth))),
            },
            Expr::BinaryOp { left, op, right } => ColumnExpression::Binary {
                op: op.to_string(),
                left: Box::new(self.expr(left, depth)),
                right: Box::new(self.expr(right, depth)),
            },
            Expr::UnaryOp { expr: inner, .. } => {
                ColumnExpression::Unary(Box::new(self.expr(inner, depth)))
            }
            Expr::Nested(inner) => self.expr(inner, depth),
            Expr::Subquery(query) => ColumnExpression::Subquery(self.query(query, depth + 1)),
            Expr::InSubquery {
                expr: inner,
                subquery,
                ..
            } => {
                let inner = self.expr(inner, depth);
                self.query(subquery, depth + 1);
                ColumnExpression::Other(vec![inner])
            }
            Expr::Exists { subquery, .. } => {
                self.query(subquery, depth + 1);
                ColumnExpression::Other(Vec::new())
            }
            Expr::Between {
                expr: inner,
                low,
                high,
                ..
            } => ColumnExpression::Other(vec![
                self.expr(inner, depth),
                self.expr(low, depth),
                self.expr(high, depth),
            ]),
            Expr::InList {
                expr: inner, list, ..
            } => {
                let mut children = vec![self.expr(inner, depth)];
                children.extend(list.iter().map(|item| self.expr(item, depth)));
                ColumnExpression::Other(children)
            }
            Expr::IsNull(inner)
            | Expr::IsNotNull(inner)
            | Expr::IsTrue(inner)
            | Expr::IsFalse(inner) => ColumnExpression::Other(vec![self.expr(inner, depth)]),
            Expr::Like {
                expr: inner,
                pattern,
                ..
            } => ColumnExpression::Other(vec![self.expr(inner, depth), self.expr(pattern, depth)]),
            _ => ColumnExpression::Other(Vec::new()),
        }
    }

    fn ident_span(&self, ident: &Ident) -> Span {
        self.node_span(ident.span)
    }

    fn object_name_span(&self, name: &ObjectName) -> Span {
        self.node_span(name.span())
    }

    fn node_span(&self, span: sqlparser::tokenizer::Span) -> Span {
        let start = line_col_to_offset(self.sql, span.start.line as usize, span.start.column as usize);
        let end = line_col_to_offset(self.sql, span.end.line as usize, span.end.column as usize);
        match (start, end) {
            (Some(start), Some(end)) if start <= end => Span::new(start, end),
            (Some(start), _) => Span::new(start, start),
            _ => Span::new(0, 0),
        }
    }
}

fn join_constraint(operator: &JoinOperator) -> Option<&JoinConstraint> {
    match operator {
        JoinOperator::Join(constraint)
        | JoinOperator::Inner(constraint)
        | JoinOperator::Left(constraint)
        | JoinOperator::LeftOuter(constraint)
        | JoinOperator::Right(constraint)
        | JoinOperator::RightOuter(constraint)
        | JoinOperator::FullOuter(constraint) => Some(constraint),
        _ => None,
    }
}

/// Dotted name with quoting removed: `ENT.[My DE]` becomes `ENT.My DE`.
fn object_name_text(name: &ObjectName) -> String {
    name.0
        .iter()
        .map(|part| match part.as_ident() {
            Some(ident) => ident.value.clone(),
            None => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn literal_value(value: &Value) -> LiteralValue {
    match value {
        Value::Number(text, _) => {
            if text.contains(&['.', 'e', 'E'][..]) {
                LiteralValue::Decimal
            } else {
                LiteralValue::Integer
            }
        }
        Value::Boolean(_) => LiteralValue::Boolean,
        Value::Null => LiteralValue::Null,
        _ => LiteralValue::String,
    }
}

/// Source text with case, whitespace and identifier quoting erased.
pub(crate) fn normalized_key(expr: &Expr) -> String {
    expr.to_string()
        .chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(ch, '[' | ']' | '"'))
        .flat_map(char::to_lowercase)
        .collect()
}

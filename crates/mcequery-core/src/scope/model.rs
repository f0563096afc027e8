//! Parser-independent view of a SELECT statement.
//!
//! Lint rules and the schema inferencer consume these types; only
//! [`super::extract`] touches sqlparser AST nodes.

use crate::types::{Span, TableReference};

/// Everything the analysis components need from one parsed statement.
#[derive(Debug, Clone, Default)]
pub struct QueryModel {
    /// Every SELECT in the statement, outermost first.
    pub blocks: Vec<SelectBlock>,
    /// Every FROM/JOIN entry in declaration order.
    pub tables: Vec<TableReference>,
    /// ORDER BY of the outermost query.
    pub order_by: Vec<ColumnExpression>,
}

impl QueryModel {
    /// Index of the first SELECT of the outermost query (the left side of a
    /// UNION).
    pub fn main_block_index(&self) -> Option<usize> {
        self.blocks.iter().position(|block| block.depth == 0)
    }

    pub fn main_block(&self) -> Option<&SelectBlock> {
        self.main_block_index().and_then(|index| self.block(index))
    }

    pub fn block(&self, index: usize) -> Option<&SelectBlock> {
        self.blocks.get(index)
    }
}

#[derive(Debug, Clone)]
pub struct CteDefinition {
    pub name: String,
    pub output_fields: Vec<String>,
    /// Index of the body's first SELECT in [`QueryModel::blocks`].
    pub body: Option<usize>,
}

/// A FROM/JOIN entry owned by one SELECT, plus the SELECT that produces its
/// rows when it is a derived table or CTE.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub reference: TableReference,
    pub body: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum GroupByClause {
    None,
    Expressions(Vec<GroupedExpression>),
    All,
}

#[derive(Debug, Clone)]
pub struct GroupedExpression {
    pub expr: ColumnExpression,
    /// Normalized source text used to match SELECT-list expressions.
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct SelectBlock {
    pub depth: usize,
    pub sources: Vec<SourceTable>,
    pub projection: Vec<ProjectionItem>,
    pub group_by: GroupByClause,
    /// WHERE, HAVING and JOIN conditions.
    pub filters: Vec<ColumnExpression>,
    /// ORDER BY of the query whose body is exactly this SELECT.
    pub order_by: Vec<ColumnExpression>,
    /// Target of `SELECT ... INTO`.
    pub into: Option<String>,
    pub has_from: bool,
}

impl SelectBlock {
    pub fn tables(&self) -> impl Iterator<Item = &TableReference> {
        self.sources.iter().map(|source| &source.reference)
    }

    /// Names the SELECT list exposes to an enclosing query.
    pub fn output_names(&self) -> Vec<String> {
        self.projection
            .iter()
            .filter_map(ProjectionItem::output_name)
            .collect()
    }

    /// Projection aliases, which ORDER BY may reference.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.projection.iter().filter_map(|item| match item {
            ProjectionItem::Expr {
                alias: Some(alias), ..
            } => Some(alias.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum ProjectionItem {
    Wildcard {
        span: Span,
    },
    QualifiedWildcard {
        qualifier: String,
        span: Span,
    },
    Expr {
        expr: ColumnExpression,
        alias: Option<String>,
        key: String,
        span: Span,
    },
}

impl ProjectionItem {
    /// Column name as seen from outside the SELECT. Unaliased computed
    /// expressions have none.
    pub fn output_name(&self) -> Option<String> {
        match self {
            ProjectionItem::Expr {
                alias: Some(alias), ..
            } => Some(alias.clone()),
            ProjectionItem::Expr {
                expr: ColumnExpression::Column(column),
                ..
            } => Some(column.name.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub qualifier: Option<String>,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralValue {
    String,
    Integer,
    Decimal,
    Boolean,
    Null,
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    /// Upper-cased, unqualified function name.
    pub name: String,
    pub args: Vec<ColumnExpression>,
    /// `COUNT(*)` style star argument.
    pub star_arg: bool,
    pub distinct: bool,
    /// Has an `OVER (...)` clause.
    pub is_window: bool,
}

/// Closed set of expression shapes the analysis components reason about.
#[derive(Debug, Clone)]
pub enum ColumnExpression {
    Column(ColumnRef),
    Literal(LiteralValue),
    Function(FunctionCall),
    Cast {
        expr: Box<ColumnExpression>,
        /// Upper-cased target type as written, e.g. `VARCHAR(10)`.
        target: String,
    },
    Case {
        operand: Option<Box<ColumnExpression>>,
        conditions: Vec<ColumnExpression>,
        results: Vec<ColumnExpression>,
        else_result: Option<Box<ColumnExpression>>,
    },
    Binary {
        op: String,
        left: Box<ColumnExpression>,
        right: Box<ColumnExpression>,
    },
    Unary(Box<ColumnExpression>),
    /// Scalar subquery; the index points into [`QueryModel::blocks`].
    Subquery(Option<usize>),
    /// Anything else, with the sub-expressions it contains.
    Other(Vec<ColumnExpression>),
}

impl ColumnExpression {
    /// Visits this expression and every sub-expression, parents first.
    pub fn walk<'a>(&'a self, visitor: &mut dyn FnMut(&'a ColumnExpression)) {
        visitor(self);
        for child in self.children() {
            child.walk(visitor);
        }
    }

    pub fn children(&self) -> Vec<&ColumnExpression> {
        match self {
            ColumnExpression::Column(_)
            | ColumnExpression::Literal(_)
            | ColumnExpression::Subquery(_) => Vec::new(),
            ColumnExpression::Function(call) => call.args.iter().collect(),
            ColumnExpression::Cast { expr, .. } | ColumnExpression::Unary(expr) => {
                vec![expr.as_ref()]
            }
            ColumnExpression::Case {
                operand,
                conditions,
                results,
                else_result,
            } => operand
                .iter()
                .map(|op| op.as_ref())
                .chain(conditions.iter())
                .chain(results.iter())
                .chain(else_result.iter().map(|e| e.as_ref()))
                .collect(),
            ColumnExpression::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            ColumnExpression::Other(children) => children.iter().collect(),
        }
    }

    /// Every column reference in the expression.
    pub fn column_refs(&self) -> Vec<&ColumnRef> {
        let mut refs = Vec::new();
        self.walk(&mut |expr| {
            if let ColumnExpression::Column(column) = expr {
                refs.push(column);
            }
        });
        refs
    }

    /// Column references not enclosed in an aggregate or window call.
    pub fn bare_column_refs(&self) -> Vec<&ColumnRef> {
        let mut refs = Vec::new();
        collect_bare_refs(self, &mut refs);
        refs
    }

    pub fn contains_aggregate(&self) -> bool {
        let mut found = false;
        self.walk(&mut |expr| {
            if let ColumnExpression::Function(call) = expr {
                if call.is_aggregate() {
                    found = true;
                }
            }
        });
        found
    }

    pub fn contains_window(&self) -> bool {
        let mut found = false;
        self.walk(&mut |expr| {
            if let ColumnExpression::Function(call) = expr {
                if call.is_window {
                    found = true;
                }
            }
        });
        found
    }
}

impl FunctionCall {
    /// An aggregate call; windowed aggregates are not.
    pub fn is_aggregate(&self) -> bool {
        !self.is_window && crate::catalog::functions::is_aggregate_function(&self.name)
    }
}

fn collect_bare_refs<'a>(expr: &'a ColumnExpression, out: &mut Vec<&'a ColumnRef>) {
    match expr {
        ColumnExpression::Column(column) => out.push(column),
        ColumnExpression::Function(call) if call.is_aggregate() || call.is_window => {}
        _ => {
            for child in expr.children() {
                collect_bare_refs(child, out);
            }
        }
    }
}

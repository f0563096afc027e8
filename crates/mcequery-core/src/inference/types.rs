//! Type rules for expressions: literals, casts, functions and operators.

use crate::catalog::functions::{
    is_aggregate_function, is_argument_typed_function, is_coalescing_function,
    is_date_function, is_decimal_aggregate, is_decimal_function, is_integer_function,
    is_string_function,
};
use crate::scope::model::{FunctionCall, LiteralValue};
use crate::types::{Field, FieldType};

/// Length of text columns when nothing more specific is known.
pub const DEFAULT_TEXT_LENGTH: u32 = 254;
/// Length of text produced by a function, whose width cannot be bounded.
pub const FUNCTION_TEXT_LENGTH: u32 = 4000;
pub const DEFAULT_PRECISION: u32 = 18;
pub const DEFAULT_SCALE: u32 = 2;

/// Inferred type of one expression before output normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnType {
    pub field_type: FieldType,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    /// Text computed by a function rather than copied from a column.
    pub from_function: bool,
}

impl ColumnType {
    pub const fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            length: None,
            precision: None,
            scale: None,
            from_function: false,
        }
    }

    pub const fn text(length: u32) -> Self {
        Self {
            length: Some(length),
            ..Self::of(FieldType::Text)
        }
    }

    /// Text of unknown width.
    pub const fn unknown() -> Self {
        Self::text(DEFAULT_TEXT_LENGTH)
    }

    pub const fn function_text() -> Self {
        Self {
            from_function: true,
            ..Self::text(FUNCTION_TEXT_LENGTH)
        }
    }

    pub const fn decimal(precision: u32, scale: u32) -> Self {
        Self {
            precision: Some(precision),
            scale: Some(scale),
            ..Self::of(FieldType::Decimal)
        }
    }

    pub const fn default_decimal() -> Self {
        Self::decimal(DEFAULT_PRECISION, DEFAULT_SCALE)
    }

    pub fn from_field(field: &Field) -> Self {
        Self {
            length: field.length,
            ..Self::of(field.field_type)
        }
    }

    pub fn is_decimal(&self) -> bool {
        self.field_type == FieldType::Decimal
    }

    pub fn is_integer(&self) -> bool {
        self.field_type == FieldType::Integer
    }
}

pub fn literal_type(literal: LiteralValue) -> ColumnType {
    match literal {
        LiteralValue::String | LiteralValue::Null => ColumnType::unknown(),
        LiteralValue::Integer => ColumnType::of(FieldType::Integer),
        LiteralValue::Decimal => ColumnType::default_decimal(),
        LiteralValue::Boolean => ColumnType::of(FieldType::Boolean),
    }
}

/// Type named by a CAST/CONVERT target such as `VARCHAR(10)` or `DECIMAL(9, 4)`.
pub fn cast_target_type(target: &str) -> ColumnType {
    let (base, arguments) = match target.split_once('(') {
        Some((base, rest)) => (base.trim(), rest.trim_end_matches(')')),
        None => (target.trim(), ""),
    };
    let numbers: Vec<Option<u32>> = arguments
        .split(',')
        .map(|argument| argument.trim().parse().ok())
        .collect();
    let first = numbers.first().copied().flatten();
    let second = numbers.get(1).copied().flatten();

    match base.to_ascii_uppercase().as_str() {
        "INT" | "INTEGER" | "BIGINT" | "SMALLINT" | "TINYINT" => ColumnType::of(FieldType::Integer),
        "DECIMAL" | "NUMERIC" | "DEC" => ColumnType::decimal(
            first.unwrap_or(DEFAULT_PRECISION),
            second.unwrap_or(if first.is_some() { 0 } else { DEFAULT_SCALE }),
        ),
        "FLOAT" | "REAL" | "MONEY" | "SMALLMONEY" | "DOUBLE" | "DOUBLE PRECISION" => {
            ColumnType::default_decimal()
        }
        "DATE" | "DATETIME" | "DATETIME2" | "SMALLDATETIME" | "DATETIMEOFFSET" | "TIME" => {
            ColumnType::of(FieldType::Date)
        }
        "CHAR" | "VARCHAR" | "NCHAR" | "NVARCHAR" | "CHARACTER VARYING" | "TEXT" | "NTEXT" => {
            // `(MAX)` and a missing length both fall back to a fixed width
            let max = arguments.trim().eq_ignore_ascii_case("MAX");
            ColumnType::text(match (first, max) {
                (Some(length), _) => length,
                (None, true) => FUNCTION_TEXT_LENGTH,
                (None, false) => DEFAULT_TEXT_LENGTH,
            })
        }
        "BIT" | "BOOLEAN" => ColumnType::of(FieldType::Boolean),
        _ => ColumnType::unknown(),
    }
}

/// Result type of a function call, given the types of its arguments.
pub fn function_type(call: &FunctionCall, arguments: &[ColumnType]) -> ColumnType {
    let name = call.name.as_str();
    let first = arguments.first().copied();

    if is_aggregate_function(name) {
        return match name {
            "COUNT" | "COUNT_BIG" | "GROUPING" | "GROUPING_ID" | "CHECKSUM_AGG" => {
                ColumnType::of(FieldType::Integer)
            }
            "SUM" if first.is_some_and(|t| t.is_decimal()) => ColumnType::default_decimal(),
            "SUM" => ColumnType::of(FieldType::Integer),
            "MIN" | "MAX" => first.unwrap_or_else(ColumnType::unknown),
            _ if is_decimal_aggregate(name) => ColumnType::default_decimal(),
            _ => ColumnType::unknown(),
        };
    }
    if is_coalescing_function(name) {
        return first_typed(call, arguments);
    }
    if is_argument_typed_function(name) {
        return first.unwrap_or_else(ColumnType::default_decimal);
    }
    // DAY/MONTH/YEAR/DATEPART/DATEDIFF are numeric, not dates
    if is_integer_function(name) {
        return ColumnType::of(FieldType::Integer);
    }
    if is_date_function(name) {
        return ColumnType::of(FieldType::Date);
    }
    if is_decimal_function(name) {
        return ColumnType::default_decimal();
    }
    if is_string_function(name) {
        return ColumnType::function_text();
    }
    ColumnType::function_text()
}

/// Type of the first argument that is not a bare NULL.
fn first_typed(call: &FunctionCall, arguments: &[ColumnType]) -> ColumnType {
    call.args
        .iter()
        .zip(arguments)
        .find(|(argument, _)| {
            !matches!(
                argument,
                crate::scope::model::ColumnExpression::Literal(LiteralValue::Null)
            )
        })
        .map(|(_, column_type)| *column_type)
        .unwrap_or_else(ColumnType::unknown)
}

/// Arithmetic and string operators: decimal wins, then integer, else text.
pub fn binary_type(left: ColumnType, right: ColumnType) -> ColumnType {
    if left.is_decimal() || right.is_decimal() {
        ColumnType::default_decimal()
    } else if left.is_integer() || right.is_integer() {
        ColumnType::of(FieldType::Integer)
    } else {
        ColumnType::unknown()
    }
}

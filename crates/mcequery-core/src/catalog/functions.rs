//! Function catalogs: what the platform rejects, what it accepts, and what
//! each supported scalar function returns.
//!
//! All names are upper-case; lookups upper-case their input.

/// Functions the query platform rejects.
pub const UNSUPPORTED_FUNCTIONS: &[&str] = &[
    "APP_NAME",
    "APPROX_COUNT_DISTINCT",
    "APPROX_PERCENTILE_CONT",
    "APPROX_PERCENTILE_DISC",
    "CURSOR_STATUS",
    "DATE_BUCKET",
    "DB_ID",
    "DB_NAME",
    "ERROR_LINE",
    "ERROR_MESSAGE",
    "ERROR_NUMBER",
    "ERROR_PROCEDURE",
    "ERROR_SEVERITY",
    "ERROR_STATE",
    "EVENTDATA",
    "GENERATE_SERIES",
    "GREATEST",
    "HOST_NAME",
    "JSON_ARRAY",
    "JSON_MODIFY",
    "JSON_OBJECT",
    "JSON_PATH_EXISTS",
    "LEAST",
    "NEWSEQUENTIALID",
    "OBJECT_ID",
    "OBJECT_NAME",
    "OPENDATASOURCE",
    "OPENJSON",
    "OPENQUERY",
    "OPENROWSET",
    "OPENXML",
    "SCHEMA_NAME",
    "STRING_AGG",
    "STRING_SPLIT",
    "SUSER_NAME",
    "TRIM_ARRAY",
    "USER_NAME",
];

/// Functions that look like unsupported ones but are accepted.
pub const ALLOWED_FUNCTIONS: &[&str] = &["ISJSON", "JSON_QUERY", "JSON_VALUE"];

pub const AGGREGATE_FUNCTIONS: &[&str] = &[
    "AVG",
    "CHECKSUM_AGG",
    "COUNT",
    "COUNT_BIG",
    "GROUPING",
    "GROUPING_ID",
    "MAX",
    "MIN",
    "STDEV",
    "STDEVP",
    "SUM",
    "VAR",
    "VARP",
];

/// Aggregates whose result is always decimal.
pub const DECIMAL_AGGREGATES: &[&str] = &["AVG", "STDEV", "STDEVP", "VAR", "VARP"];

pub const STRING_FUNCTIONS: &[&str] = &[
    "CHAR",
    "CONCAT",
    "CONCAT_WS",
    "FORMAT",
    "FORMATMESSAGE",
    "JSON_QUERY",
    "JSON_VALUE",
    "LEFT",
    "LOWER",
    "LTRIM",
    "NCHAR",
    "NEWID",
    "QUOTENAME",
    "REPLACE",
    "REPLICATE",
    "REVERSE",
    "RIGHT",
    "RTRIM",
    "SOUNDEX",
    "SPACE",
    "STR",
    "STUFF",
    "SUBSTRING",
    "TRANSLATE",
    "TRIM",
    "UPPER",
    "DATENAME",
];

pub const DATE_FUNCTIONS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "DATEADD",
    "DATEFROMPARTS",
    "DATETIMEFROMPARTS",
    "EOMONTH",
    "GETDATE",
    "GETUTCDATE",
    "SYSDATETIME",
    "SYSDATETIMEOFFSET",
    "SYSUTCDATETIME",
    "SWITCHOFFSET",
    "TODATETIMEOFFSET",
];

pub const INTEGER_FUNCTIONS: &[&str] = &[
    "ASCII",
    "CHARINDEX",
    "DATEDIFF",
    "DATEDIFF_BIG",
    "DATEPART",
    "DAY",
    "DENSE_RANK",
    "DIFFERENCE",
    "ISDATE",
    "ISJSON",
    "ISNUMERIC",
    "LEN",
    "DATALENGTH",
    "MONTH",
    "NTILE",
    "PATINDEX",
    "RANK",
    "ROW_NUMBER",
    "UNICODE",
    "YEAR",
];

pub const DECIMAL_FUNCTIONS: &[&str] = &[
    "ACOS", "ASIN", "ATAN", "ATN2", "COS", "COT", "DEGREES", "EXP", "LOG", "LOG10", "PI", "POWER",
    "RADIANS", "RAND", "SIN", "SQRT", "SQUARE", "TAN",
];

/// Functions whose result has the type of their first argument.
pub const ARGUMENT_TYPED_FUNCTIONS: &[&str] = &["ABS", "CEILING", "FLOOR", "ROUND", "SIGN"];

/// Functions returning the first typed argument among several.
pub const COALESCING_FUNCTIONS: &[&str] = &["COALESCE", "IIF", "ISNULL", "NULLIF"];

fn contains(list: &[&str], name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    list.iter().any(|entry| *entry == upper)
}

pub fn is_unsupported_function(name: &str) -> bool {
    !contains(ALLOWED_FUNCTIONS, name) && contains(UNSUPPORTED_FUNCTIONS, name)
}

pub fn is_aggregate_function(name: &str) -> bool {
    contains(AGGREGATE_FUNCTIONS, name)
}

pub fn is_decimal_aggregate(name: &str) -> bool {
    contains(DECIMAL_AGGREGATES, name)
}

pub fn is_string_function(name: &str) -> bool {
    contains(STRING_FUNCTIONS, name)
}

pub fn is_date_function(name: &str) -> bool {
    contains(DATE_FUNCTIONS, name)
}

pub fn is_integer_function(name: &str) -> bool {
    contains(INTEGER_FUNCTIONS, name)
}

pub fn is_decimal_function(name: &str) -> bool {
    contains(DECIMAL_FUNCTIONS, name)
}

pub fn is_argument_typed_function(name: &str) -> bool {
    contains(ARGUMENT_TYPED_FUNCTIONS, name)
}

pub fn is_coalescing_function(name: &str) -> bool {
    contains(COALESCING_FUNCTIONS, name)
}

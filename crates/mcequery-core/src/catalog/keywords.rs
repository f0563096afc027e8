//! Statement keywords the query platform refuses, with the message shown for each.
//!
//! Queries run read-only against Data Extensions: anything that writes,
//! changes schema, or introduces procedural control flow is rejected.

pub struct ProhibitedKeyword {
    pub keyword: &'static str,
    pub message: &'static str,
}

const READ_ONLY: &str = "Queries are read-only. Use a SELECT statement and choose the target Data Extension and data action (Overwrite, Update, Append) in the query activity instead.";

pub const PROHIBITED_KEYWORDS: &[ProhibitedKeyword] = &[
    ProhibitedKeyword {
        keyword: "INSERT",
        message: "INSERT is not supported. Queries are read-only; the query activity's data action writes results to the target Data Extension.",
    },
    ProhibitedKeyword {
        keyword: "UPDATE",
        message: "UPDATE is not supported. Queries are read-only; use the Update data action on the query activity instead.",
    },
    ProhibitedKeyword {
        keyword: "DELETE",
        message: "DELETE is not supported. Queries are read-only; use the Overwrite data action to replace target rows.",
    },
    ProhibitedKeyword {
        keyword: "MERGE",
        message: READ_ONLY,
    },
    ProhibitedKeyword {
        keyword: "TRUNCATE",
        message: READ_ONLY,
    },
    ProhibitedKeyword {
        keyword: "CREATE",
        message: "CREATE is not supported. Data Extensions are created outside of queries.",
    },
    ProhibitedKeyword {
        keyword: "ALTER",
        message: "ALTER is not supported. Data Extension schemas cannot be changed from a query.",
    },
    ProhibitedKeyword {
        keyword: "DROP",
        message: "DROP is not supported. Data Extensions cannot be removed from a query.",
    },
    ProhibitedKeyword {
        keyword: "EXEC",
        message: "EXEC is not supported. Stored procedures and dynamic SQL cannot be run from a query.",
    },
    ProhibitedKeyword {
        keyword: "EXECUTE",
        message: "EXECUTE is not supported. Stored procedures and dynamic SQL cannot be run from a query.",
    },
    ProhibitedKeyword {
        keyword: "GRANT",
        message: "GRANT is not supported. Permissions cannot be changed from a query.",
    },
    ProhibitedKeyword {
        keyword: "REVOKE",
        message: "REVOKE is not supported. Permissions cannot be changed from a query.",
    },
    ProhibitedKeyword {
        keyword: "DECLARE",
        message: "Variables are not supported. DECLARE cannot be used; inline the value in the query instead.",
    },
    ProhibitedKeyword {
        keyword: "SET",
        message: "SET is not supported. Session options and variables cannot be changed from a query.",
    },
    ProhibitedKeyword {
        keyword: "IF",
        message: "IF is not supported. Procedural control flow cannot be used; use a CASE expression instead.",
    },
    ProhibitedKeyword {
        keyword: "WHILE",
        message: "WHILE is not supported. Loops cannot be used in a query.",
    },
    ProhibitedKeyword {
        keyword: "BEGIN",
        message: "BEGIN...END blocks are not supported. A query must be a single SELECT statement.",
    },
    ProhibitedKeyword {
        keyword: "USE",
        message: "USE is not supported. Reference Data Extensions by name, or with the ENT. prefix for shared ones.",
    },
];

pub const CURSOR_MESSAGE: &str =
    "Cursors are not supported. Rewrite the logic as a set-based SELECT statement.";

pub const TRY_CATCH_MESSAGE: &str =
    "TRY...CATCH is not supported. Errors cannot be handled inside a query.";

pub fn prohibited_keyword(word: &str) -> Option<&'static ProhibitedKeyword> {
    PROHIBITED_KEYWORDS
        .iter()
        .find(|entry| entry.keyword.eq_ignore_ascii_case(word))
}

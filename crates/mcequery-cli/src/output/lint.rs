//! Lint output formatting (sqlfluff-style).

use mcequery_core::{Diagnostic, Severity};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt::{self, Write};
use std::time::Duration;

/// Per-file lint result used by the formatter.
pub struct FileLintResult {
    pub name: String,
    pub issues: Vec<LintIssue>,
}

impl FileLintResult {
    /// Resolves each diagnostic of `sql` to a line and column.
    pub fn new(name: impl Into<String>, sql: &str, diagnostics: &[Diagnostic]) -> Self {
        let issues = diagnostics
            .iter()
            .map(|diagnostic| {
                let (line, col) = offset_to_line_col(sql, diagnostic.start_index);
                LintIssue {
                    line,
                    col,
                    code: diagnostic.code.clone(),
                    message: diagnostic.message.clone(),
                    severity: diagnostic.severity,
                }
            })
            .collect();
        Self {
            name: name.into(),
            issues,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }
}

/// A lint issue resolved to line:col.
#[derive(Serialize)]
pub struct LintIssue {
    pub line: usize,
    #[serde(rename = "column")]
    pub col: usize,
    pub code: String,
    pub message: String,
    pub severity: Severity,
}

/// Convert a byte offset into a 1-based (line, col) pair.
pub fn offset_to_line_col(sql: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(sql.len());
    let mut line = 1usize;
    let mut col = 1usize;

    for (i, ch) in sql.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

#[derive(Clone, Copy)]
enum FileStatus {
    Pass,
    Warn,
    Fail,
}

impl FileStatus {
    fn of(file: &FileLintResult) -> Self {
        if file.has_errors() {
            FileStatus::Fail
        } else if file.issues.is_empty() {
            FileStatus::Pass
        } else {
            FileStatus::Warn
        }
    }

    fn label(self, colored: bool) -> String {
        let (text, painted) = match self {
            FileStatus::Pass => ("PASS", "PASS".green().to_string()),
            FileStatus::Warn => ("WARN", "WARN".yellow().to_string()),
            FileStatus::Fail => ("FAIL", "FAIL".red().to_string()),
        };
        if colored {
            painted
        } else {
            text.to_string()
        }
    }
}

/// Format lint results as human-readable sqlfluff-style text.
///
/// A file fails when it has at least one `error`; warnings and prerequisites
/// alone mark it `WARN`.
pub fn format_lint_results(results: &[FileLintResult], colored: bool, elapsed: Duration) -> String {
    let mut out = String::new();
    let _ = write_report(&mut out, results, colored, elapsed);
    out
}

fn write_report(
    out: &mut String,
    results: &[FileLintResult],
    colored: bool,
    elapsed: Duration,
) -> fmt::Result {
    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut violations = 0usize;

    for file in results {
        violations += file.issues.len();
        if file.has_errors() {
            failed += 1;
        } else {
            passed += 1;
        }
        write_file_section(out, file, colored)?;
    }

    writeln!(out, "All Finished in {}!", format_elapsed(elapsed))?;
    writeln!(
        out,
        "  {} passed. {} failed. {} violations found.",
        count_str(passed, colored, FileStatus::Pass),
        count_str(failed, colored, FileStatus::Fail),
        violations
    )
}

fn write_file_section(out: &mut String, file: &FileLintResult, colored: bool) -> fmt::Result {
    writeln!(out, "== [{}] {}", file.name, FileStatus::of(file).label(colored))?;

    let mut sorted: Vec<&LintIssue> = file.issues.iter().collect();
    sorted.sort_by_key(|issue| (issue.line, issue.col));

    for issue in sorted {
        let code = if colored {
            match issue.severity {
                Severity::Error => issue.code.red().to_string(),
                Severity::Warning => issue.code.yellow().to_string(),
                Severity::Prereq => issue.code.blue().to_string(),
            }
        } else {
            issue.code.clone()
        };

        writeln!(
            out,
            "L:{:>4} | P:{:>4} | {} | {}",
            issue.line, issue.col, code, issue.message
        )?;
    }
    Ok(())
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs >= 1.0 {
        format!("{secs:.2}s")
    } else if elapsed.as_millis() >= 1 {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{}us", elapsed.as_micros())
    }
}

fn count_str(count: usize, colored: bool, status: FileStatus) -> String {
    let s = format!("{count} file{}", if count == 1 { "" } else { "s" });
    match (colored && count > 0, status) {
        (true, FileStatus::Fail) => s.red().to_string(),
        (true, _) => s.green().to_string(),
        (false, _) => s,
    }
}

#[derive(Serialize)]
struct FileJson<'a> {
    file: &'a str,
    violations: &'a [LintIssue],
}

/// Format lint results as JSON.
pub fn format_lint_json(results: &[FileLintResult], compact: bool) -> String {
    let files: Vec<FileJson<'_>> = results
        .iter()
        .map(|file| FileJson {
            file: &file.name,
            violations: &file.issues,
        })
        .collect();
    super::to_json(&files, compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(line: usize, col: usize, code: &str, severity: Severity) -> LintIssue {
        LintIssue {
            line,
            col,
            code: code.to_string(),
            message: "message".to_string(),
            severity,
        }
    }

    #[test]
    fn test_offset_to_line_col() {
        let sql = "SELECT 1\nFROM t";
        assert_eq!(offset_to_line_col(sql, 0), (1, 1));
        assert_eq!(offset_to_line_col(sql, 9), (2, 1));
        assert_eq!(offset_to_line_col(sql, 14), (2, 6));
        assert_eq!(offset_to_line_col(sql, 100), (2, 7));
    }

    #[test]
    fn test_offset_to_line_col_counts_characters() {
        let sql = "SELECT 'é' FROM t";
        let from = sql.find("FROM").unwrap();
        assert_eq!(offset_to_line_col(sql, from), (1, 12));
    }

    #[test]
    fn test_diagnostics_resolve_to_positions() {
        let sql = "SELECT a\nFROM t LIMIT 1";
        let diagnostics = mcequery_core::lint(sql, &Default::default());
        let file = FileLintResult::new("q.sql", sql, &diagnostics);
        assert_eq!(file.issues.len(), 1);
        assert_eq!((file.issues[0].line, file.issues[0].col), (2, 8));
        assert!(file.has_errors());
    }

    #[test]
    fn test_format_pass() {
        let results = vec![FileLintResult {
            name: "clean.sql".to_string(),
            issues: vec![],
        }];

        let output = format_lint_results(&results, false, Duration::from_millis(250));
        assert!(output.contains("== [clean.sql] PASS"));
        assert!(output.contains("All Finished in 250ms!"));
        assert!(output.contains("1 file passed"));
        assert!(output.contains("0 files failed"));
        assert!(output.contains("0 violations"));
    }

    #[test]
    fn test_format_fail_sorts_rows() {
        let results = vec![FileLintResult {
            name: "bad.sql".to_string(),
            issues: vec![
                issue(7, 1, "LINT_ST_003", Severity::Warning),
                issue(3, 12, "LINT_CL_001", Severity::Error),
            ],
        }];

        let output = format_lint_results(&results, false, Duration::from_secs_f64(1.5));
        assert!(output.contains("== [bad.sql] FAIL"));
        assert!(output.contains("All Finished in 1.50s!"));
        let first = output.find("L:   3 | P:  12 | LINT_CL_001").unwrap();
        let second = output.find("L:   7 | P:   1 | LINT_ST_003").unwrap();
        assert!(first < second);
        assert!(output.contains("2 violations"));
    }

    #[test]
    fn test_warnings_alone_do_not_fail() {
        let results = vec![FileLintResult {
            name: "draft.sql".to_string(),
            issues: vec![issue(1, 1, "LINT_PQ_002", Severity::Prereq)],
        }];

        let output = format_lint_results(&results, false, Duration::from_micros(700));
        assert!(output.contains("== [draft.sql] WARN"));
        assert!(output.contains("1 file passed"));
        assert!(output.contains("All Finished in 700us!"));
    }

    #[test]
    fn test_format_lint_json() {
        let results = vec![FileLintResult {
            name: "test.sql".to_string(),
            issues: vec![issue(1, 8, "LINT_CL_001", Severity::Error)],
        }];

        let json = format_lint_json(&results, false);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let arr = parsed.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["file"], "test.sql");
        assert_eq!(arr[0]["violations"][0]["code"], "LINT_CL_001");
        assert_eq!(arr[0]["violations"][0]["column"], 8);
        assert_eq!(arr[0]["violations"][0]["severity"], "error");
    }
}

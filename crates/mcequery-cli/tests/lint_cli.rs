use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

/// Triggers LINT_CL_001 (LIMIT is not supported).
const SQL_WITH_ERROR: &str = "SELECT EmailAddress FROM [Contacts] LIMIT 10";
/// Only an advisory temp-table warning.
const SQL_WITH_WARNING: &str = "SELECT Id FROM #staging";
const SQL_CLEAN: &str = "SELECT c.EmailAddress FROM [Contacts] c";

const METADATA: &str = r#"{"tables":[
    {"name":"Contacts","fields":[
        {"name":"SubscriberKey","type":"Text","length":254},
        {"name":"EmailAddress","type":"EmailAddress","length":254},
        {"name":"Age","type":"Number"}
    ]},
    {"name":"Orders","fields":[
        {"name":"SubscriberKey","type":"Text","length":254},
        {"name":"Total","type":"Decimal"}
    ]},
    {"name":"Master Subscribers","fields":[{"name":"Email","type":"EmailAddress"}]}
]}"#;

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write file");
    path.to_str().expect("utf-8 path").to_string()
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mcequery"))
        .args(args)
        .output()
        .expect("run CLI")
}

#[test]
fn test_lint_clean_file() {
    let dir = tempdir().expect("temp dir");
    let sql = write(dir.path(), "clean.sql", SQL_CLEAN);

    let output = run(&[&sql]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Expected exit 0, got: {stdout}");
    assert!(stdout.contains("PASS"), "Expected PASS in output: {stdout}");
    assert!(stdout.contains("0 violations"), "Expected 0 violations: {stdout}");
}

#[test]
fn test_lint_error_exits_one() {
    let dir = tempdir().expect("temp dir");
    let sql = write(dir.path(), "bad.sql", SQL_WITH_ERROR);

    let output = run(&[&sql]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "Expected exit 1, got: {stdout}");
    assert!(stdout.contains("FAIL"), "Expected FAIL in output: {stdout}");
    assert!(stdout.contains("LINT_CL_001"), "Expected LINT_CL_001: {stdout}");
    assert!(stdout.contains("L:   1 | P:  37"), "Expected position of LIMIT: {stdout}");
}

#[test]
fn test_lint_warning_exits_zero() {
    let dir = tempdir().expect("temp dir");
    let sql = write(dir.path(), "draft.sql", SQL_WITH_WARNING);

    let output = run(&[&sql]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Expected exit 0, got: {stdout}");
    assert!(stdout.contains("WARN"), "Expected WARN in output: {stdout}");
    assert!(stdout.contains("LINT_ST_003"), "Expected LINT_ST_003: {stdout}");
}

#[test]
fn test_exclude_rules() {
    let dir = tempdir().expect("temp dir");
    let sql = write(dir.path(), "bad.sql", SQL_WITH_ERROR);

    let output = run(&["--exclude-rules", "LINT_CL_001", &sql]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Expected exit 0, got: {stdout}");
    assert!(!stdout.contains("LINT_CL_001"), "Rule should be excluded: {stdout}");
}

#[test]
fn test_metadata_enables_ambiguity_and_name_checks() {
    let dir = tempdir().expect("temp dir");
    let metadata = write(dir.path(), "tables.json", METADATA);
    let ambiguous = write(
        dir.path(),
        "ambiguous.sql",
        "SELECT SubscriberKey FROM [Contacts] c JOIN [Orders] o ON c.SubscriberKey = o.SubscriberKey",
    );
    let unbracketed = write(dir.path(), "names.sql", "SELECT Email FROM Master Subscribers");

    let output = run(&["--metadata", &metadata, "--format", "json", &ambiguous, &unbracketed]);
    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("JSON output");
    assert_eq!(parsed[0]["violations"][0]["code"], "LINT_RF_002");
    assert_eq!(parsed[1]["violations"][0]["code"], "LINT_RF_001");
}

#[test]
fn test_infer_schema_json() {
    let dir = tempdir().expect("temp dir");
    let metadata = write(dir.path(), "tables.json", METADATA);
    let sql = write(
        dir.path(),
        "schema.sql",
        "SELECT c.EmailAddress, COUNT(*) AS Orders FROM [Contacts] c JOIN [Orders] o ON c.SubscriberKey = o.SubscriberKey GROUP BY c.EmailAddress",
    );

    let output = run(&["--metadata", &metadata, "--infer", "--format", "json", &sql]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Expected exit 0, got: {stdout}");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    let fields = &parsed[0]["fields"];
    assert_eq!(fields[0]["name"], "EmailAddress");
    assert_eq!(fields[0]["type"], "EmailAddress");
    assert_eq!(fields[1]["name"], "Orders");
    assert_eq!(fields[1]["type"], "Number");
}

#[test]
fn test_infer_rejects_non_select() {
    let dir = tempdir().expect("temp dir");
    let sql = write(dir.path(), "update.sql", "UPDATE [Contacts] SET Age = 1");

    let output = run(&["--infer", "--quiet", &sql]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "Expected exit 1, got: {stdout}");
    assert!(stdout.contains("Only SELECT queries"), "Expected error row: {stdout}");
}

#[test]
fn test_complete_after_from() {
    let dir = tempdir().expect("temp dir");
    let metadata = write(dir.path(), "tables.json", METADATA);
    let sql = write(dir.path(), "partial.sql", "SELECT * FROM ");

    let output = run(&["--metadata", &metadata, "--complete", "14", "-f", "json", &sql]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Expected exit 0, got: {stdout}");
    let items: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    let labels: Vec<&str> = items
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|item| item["label"].as_str())
        .collect();
    assert!(labels.contains(&"Contacts"), "Expected Contacts: {labels:?}");
    assert!(labels.contains(&"Master Subscribers"), "Expected Master Subscribers: {labels:?}");
}

#[test]
fn test_missing_metadata_file_is_config_error() {
    let dir = tempdir().expect("temp dir");
    let sql = write(dir.path(), "clean.sql", SQL_CLEAN);

    let output = run(&["--metadata", "/nonexistent/tables.json", &sql]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(66));
    assert!(stderr.contains("Failed to read metadata file"), "stderr: {stderr}");
}

#[test]
fn test_stdin_input() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(env!("CARGO_BIN_EXE_mcequery"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn CLI");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(SQL_WITH_ERROR.as_bytes())
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait CLI");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("== [<stdin>] FAIL"), "stdout: {stdout}");
}

//! CLI diff integration tests
//!
//! These tests run the `fieldwise` binary against documents written to a
//! temporary directory and check its output and exit code.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn fieldwise(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fieldwise"))
        .args(args)
        .env_remove("FIELDWISE__IGNORE_COLLECTION_ORDER")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_equal_documents_exit_zero() {
    let dir = TempDir::new().unwrap();
    let actual = write(&dir, "actual.json", r#"{"name": "Ada", "tags": ["a", "b"]}"#);
    let expected = write(&dir, "expected.yaml", "name: Ada\ntags:\n  - a\n  - b\n");

    let output = fieldwise(&["diff", actual.to_str().unwrap(), expected.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("The documents are equal"));
}

#[test]
fn test_differences_exit_one_with_report() {
    let dir = TempDir::new().unwrap();
    let actual = write(&dir, "actual.json", r#"{"name": "Ada", "age": 36}"#);
    let expected = write(&dir, "expected.toml", "name = \"Ada\"\nage = 37\n");

    let output = fieldwise(&["diff", actual.to_str().unwrap(), expected.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let report = stdout(&output);
    assert!(report.starts_with("Expecting actual:"));
    assert!(report.contains("field/property 'age' differ:\n- actual value  : 36\n- expected value: 37"));
}

#[test]
fn test_json_report() {
    let dir = TempDir::new().unwrap();
    let actual = write(&dir, "actual.json", r#"{"name": "Ada", "address": {"city": "Paris"}}"#);
    let expected = write(&dir, "expected.json", r#"{"name": "Ada", "address": {"city": "Rome"}}"#);

    let output = fieldwise(&[
        "diff",
        actual.to_str().unwrap(),
        expected.to_str().unwrap(),
        "--format",
        "json",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["equal"], serde_json::json!(false));
    assert_eq!(report["differences"][0]["path"], "address.city");
    assert_eq!(report["differences"][0]["actual"], "\"Paris\"");
    assert_eq!(report["differences"][0]["expected"], "\"Rome\"");
}

#[test]
fn test_settings_file_ignores_fields() {
    let dir = TempDir::new().unwrap();
    let actual = write(&dir, "actual.json", r#"{"id": 1, "items": [1, 2], "updated_at": "x"}"#);
    let expected = write(&dir, "expected.json", r#"{"id": 2, "items": [2, 1], "updated_at": "y"}"#);
    let settings = write(
        &dir,
        "fieldwise.toml",
        "ignored_fields = [\"id\"]\nignored_fields_regexes = [\".*_at\"]\nignore_collection_order = true\n",
    );

    let output = fieldwise(&[
        "diff",
        actual.to_str().unwrap(),
        expected.to_str().unwrap(),
        "--settings",
        settings.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
}

#[test]
fn test_unsupported_format_exits_two() {
    let dir = TempDir::new().unwrap();
    let actual = write(&dir, "actual.xml", "<a/>");
    let expected = write(&dir, "expected.json", "{}");

    let output = fieldwise(&["diff", actual.to_str().unwrap(), expected.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported document format: xml"));
}

#[test]
fn test_invalid_settings_exit_two() {
    let dir = TempDir::new().unwrap();
    let actual = write(&dir, "actual.json", "{}");
    let settings = write(&dir, "fieldwise.json", r#"{"ignored_fields_regexes": ["("]}"#);

    let output = fieldwise(&[
        "diff",
        actual.to_str().unwrap(),
        actual.to_str().unwrap(),
        "--settings",
        settings.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid regex '('"));
}

#[test]
fn test_describe_prints_configuration() {
    let dir = TempDir::new().unwrap();
    let settings = write(
        &dir,
        "fieldwise.yaml",
        "ignored_fields:\n  - id\nstrict_type_checking: true\n",
    );

    let output = fieldwise(&["describe", "--settings", settings.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let description = stdout(&output);
    assert!(description.contains("- the following fields were ignored in the comparison: id\n"));
    assert!(description.contains("- the introspection strategy used was: comparing fields\n"));
}

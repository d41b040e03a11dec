//! End-to-end tests for the `term-shape` binary.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
        .display()
        .to_string()
}

fn term_shape(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_term-shape"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_valid_file_exits_zero() {
    let path = fixture("simple_valid.csv");
    let output = term_shape(&["-c", "3", "--no-color", &path]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim_end(), format!("{path} is valid"));
}

#[test]
fn test_invalid_file_exits_one() {
    let path = fixture("non_quadralateral_invalid.csv");
    let output = term_shape(&["--columns", "2", "--no-color", &path]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output).trim_end(),
        format!("{path} is invalid. expected 2 columns but found 3 in this row: ['val3', 'val4', 'val5']")
    );
}

#[test]
fn test_record_number_flag() {
    let path = fixture("non_quadralateral_invalid.csv");
    let output = term_shape(&["-c", "2", "--no-color", "--show-record-number", &path]);
    assert!(stdout(&output).contains("(record 3)"));
}

#[test]
fn test_wrong_delimiter_is_invalid() {
    let path = fixture("complex_escaping_valid.csv");
    let output = term_shape(&["-c", "3", "-d", "|", "--no-color", &path]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_tab_delimiter() {
    let path = fixture("scores_valid.tsv");
    let output = term_shape(&["-c", "3", "-d", "\\t", &path]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_mixed_inputs_report_each() {
    let good = fixture("simple_valid.csv");
    let bad = fixture("non_quadralateral_invalid.csv");
    let output = term_shape(&["-c", "3", "--no-color", &good, &bad]);

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("is valid"));
    assert!(lines[1].contains("is invalid"));
}

#[test]
fn test_missing_file_exits_two() {
    let good = fixture("simple_valid.csv");
    let output = term_shape(&["-c", "3", &good, "/no/such/table.csv"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("/no/such/table.csv"));
    // The readable input is still reported.
    assert!(stdout(&output).contains("is valid"));
}

#[test]
fn test_bad_delimiter_exits_two() {
    let path = fixture("simple_valid.csv");
    let output = term_shape(&["-c", "3", "-d", ";;", &path]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("single ASCII character"));
}

#[test]
fn test_json_output() {
    let path = fixture("non_quadralateral_invalid.csv");
    let output = term_shape(&["-c", "2", "--format", "json", &path]);

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["is_valid"], false);
    assert_eq!(value["first_offending_row"]["width"], 3);
}

#[test]
fn test_stdin_input() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_term-shape"))
        .args(["-c", "2", "--no-color", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"a,b\nc,d,e\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output).trim_end(),
        "<stdin> is invalid. expected 2 columns but found 3 in this row: ['c', 'd', 'e']"
    );
}

#[test]
fn test_glob_reports_each_file_even_when_one_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.csv"), "id,name\n1,Alice\n").unwrap();
    std::fs::write(dir.path().join("b.csv"), b"id,name\n\xff\xfe,Bob\n").unwrap();
    std::fs::write(dir.path().join("c.csv"), "id,name\n2\n").unwrap();

    let pattern = format!("{}/*.csv", dir.path().display());
    let output = term_shape(&["-c", "2", &pattern]);

    assert_eq!(output.status.code(), Some(2));
    let text = stdout(&output);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("a.csv is valid"));
    assert!(lines[1].contains("c.csv is invalid"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("b.csv"));
    assert!(stderr.contains("CSV error"));
}

#[test]
fn test_piped_output_has_no_ansi_escapes() {
    let path = fixture("non_quadralateral_invalid.csv");
    let output = term_shape(&["-c", "2", &path]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout(&output).contains('\x1b'));
}

#[test]
fn test_blank_line_in_file_is_a_row() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("gaps.csv");
    std::fs::write(&path, "a,b\n\nc,d\n").unwrap();
    let path = path.display().to_string();

    let output = term_shape(&["-c", "2", &path]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output).trim_end(),
        format!("{path} is invalid. expected 2 columns but found 0 in this row: []")
    );
}

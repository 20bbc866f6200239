// CLI integration tests: run the tbscan binary against log fixtures

use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn temp_log(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn run_json(args: &[&str]) -> serde_json::Value {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tbscan");
    cmd.arg("--format").arg("json").args(args);

    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Grouped JSON over the sample log: repeated unique violations fold into one row
#[test]
fn test_json_groups_repeated_tracebacks() {
    let path = fixture("odoo_sample.log");
    let value = run_json(&[path.to_str().unwrap()]);

    assert_eq!(value["summary"]["blocks_detected"], 4);
    assert_eq!(value["summary"]["records_retained"], 4);

    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["exception_kind"], "psycopg2.errors.UniqueViolation");
    assert_eq!(results[0]["count"], 2);
    assert_eq!(results[0]["first_timestamp"], "2025-01-15T09:12:44.310");
    assert_eq!(results[0]["examples"].as_array().unwrap().len(), 2);
    assert!(results[0]["hints"][0]
        .as_str()
        .unwrap()
        .contains("unique constraint"));

    assert_eq!(results[1]["exception_kind"], "ValueError");
    assert!(results[1]["hints"][0].as_str().unwrap().contains("XML ID"));

    assert_eq!(results[2]["exception_kind"], "ZeroDivisionError");
    assert_eq!(results[2]["hints"].as_array().unwrap().len(), 0);
}

/// --no-group lists every traceback in file order
#[test]
fn test_json_flat_mode() {
    let path = fixture("odoo_sample.log");
    let value = run_json(&["--no-group", path.to_str().unwrap()]);

    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r["count"] == 1));
    assert_eq!(results[3]["exception_kind"], "ZeroDivisionError");
    assert_eq!(value["summary"]["grouped"], false);
}

/// --since keeps only the later day
#[test]
fn test_since_filters_earlier_tracebacks() {
    let path = fixture("odoo_sample.log");
    let value = run_json(&["--since", "2025-01-16", path.to_str().unwrap()]);

    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["exception_kind"], "ZeroDivisionError");
    assert_eq!(value["summary"]["blocks_detected"], 4);
}

/// --until with a time keeps only the first occurrence
#[test]
fn test_until_with_time() {
    let path = fixture("odoo_sample.log");
    let value = run_json(&["--until", "2025-01-15 10:00:00", path.to_str().unwrap()]);

    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["count"], 1);
}

/// --since past every timestamp: blocks found, nothing retained, still success
#[test]
fn test_since_after_everything_is_empty() {
    let path = fixture("odoo_sample.log");
    let value = run_json(&["--since", "2031-01-01 00:00:00", path.to_str().unwrap()]);

    assert_eq!(value["summary"]["blocks_detected"], 4);
    assert_eq!(value["results"].as_array().unwrap().len(), 0);
}

/// --no-suggest leaves hint lists empty
#[test]
fn test_no_suggest() {
    let path = fixture("odoo_sample.log");
    let value = run_json(&["--no-suggest", path.to_str().unwrap()]);

    for result in value["results"].as_array().unwrap() {
        assert_eq!(result["hints"].as_array().unwrap().len(), 0);
    }
}

#[test]
fn test_table_output_default() {
    let path = fixture("odoo_sample.log");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tbscan");
    cmd.arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("psycopg2.errors.UniqueViolation"))
        .stdout(predicate::str::contains("hint:"))
        .stdout(predicate::str::contains("4 total (3 rows, 4 tracebacks detected)"));
}

#[test]
fn test_csv_output() {
    let path = fixture("odoo_sample.log");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tbscan");
    cmd.arg("--output").arg("csv").arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with(
            "exception_kind,message,count,first_timestamp,hints\n",
        ))
        .stdout(predicate::str::contains("ZeroDivisionError,division by zero,1,"));
}

#[test]
fn test_log_without_tracebacks() {
    let log = temp_log("2025-01-15 08:00:00,001 1 INFO prod odoo: all quiet\n");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tbscan");
    cmd.arg(log.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No tracebacks found."));
}

#[test]
fn test_missing_file_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tbscan");
    cmd.arg("/nonexistent/dir/odoo.log");

    cmd.assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to read log"));
}

#[test]
fn test_malformed_since_is_usage_error() {
    let path = fixture("odoo_sample.log");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tbscan");
    cmd.arg("--since").arg("last week").arg(&path);

    cmd.assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--since"));
}

#[test]
fn test_custom_rules_file() {
    let rules = temp_log(
        r#"
[[rule]]
pattern = "ZeroDivisionError"
hint = "Guard the divisor in _compute_qty"
"#,
    );
    let path = fixture("odoo_sample.log");
    let value = run_json(&[
        "--rules",
        rules.path().to_str().unwrap(),
        path.to_str().unwrap(),
    ]);

    let zero = value["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["exception_kind"] == "ZeroDivisionError")
        .unwrap()
        .clone();
    assert_eq!(zero["hints"][0], "Guard the divisor in _compute_qty");
}

#[test]
fn test_invalid_rule_pattern_fails() {
    let rules = temp_log("[[rule]]\npattern = \"(unclosed\"\nhint = \"x\"\n");
    let path = fixture("odoo_sample.log");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tbscan");
    cmd.arg("--rules").arg(rules.path()).arg(&path);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid hint pattern"));
}

/// Timestamp six lines above the traceback is out of reach; any bound drops it
#[test]
fn test_timestamp_beyond_lookback_is_excluded_when_filtering() {
    let log = temp_log(
        "2025-01-15 09:00:00,000 1 ERROR prod odoo: context follows\n\
         a\nb\nc\nd\ne\n\
         Traceback (most recent call last):\n\
         KeyError: 'x'\n",
    );

    let unfiltered = run_json(&[log.path().to_str().unwrap()]);
    assert!(unfiltered["results"][0]["first_timestamp"].is_null());

    let filtered = run_json(&["--since", "2000-01-01", log.path().to_str().unwrap()]);
    assert_eq!(filtered["results"].as_array().unwrap().len(), 0);
}

#[test]
fn test_invalid_utf8_does_not_abort() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"Traceback (most recent call last):\nValueError: bad \xff\xfe byte\n")
        .unwrap();

    let value = run_json(&[file.path().to_str().unwrap()]);
    assert_eq!(value["results"][0]["exception_kind"], "ValueError");
}

#[test]
fn test_debug_logs_to_stderr_only() {
    let path = fixture("odoo_sample.log");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tbscan");
    cmd.arg("--debug").arg("--format").arg("json").arg(&path);

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    // stdout must stay valid JSON even with logging enabled
    let _: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(String::from_utf8_lossy(&output.stderr).contains("extracted failure blocks"));
}

// Regression tests: the binary turns an NDJSON event stream into TAP.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

const PASSING_RUN: &str = concat!(
    r#"{"type":"TEST_START","data":{"description":"some test"}}"#,
    "\n",
    r#"{"type":"ASSERTION","data":{"pass":true,"description":"works"}}"#,
    "\n",
);

#[test]
fn cli_writes_tap_for_passing_run() {
    let mut cmd = Command::cargo_bin("tapline").unwrap();
    cmd.write_stdin(PASSING_RUN);
    cmd.assert().success().stdout(
        "TAP version 13\n# some test\nok 1 - works\n\n1..1\n# tests 1\n# pass  1\n# fail  0\n# skip  0\n",
    );
}

#[test]
fn cli_fails_when_an_assertion_fails() {
    let mut cmd = Command::cargo_bin("tapline").unwrap();
    cmd.write_stdin(
        r#"{"type":"ASSERTION","data":{"pass":false,"description":"eq","actual":{"a":123},"expected":{"b":456}}}"#,
    );
    cmd.assert()
        .failure()
        .stdout(contains("not ok 1 - eq").and(contains(r#"    actual: {"a":123}"#)));
}

#[test]
fn cli_reports_miette_diagnostics_on_bad_input() {
    let mut cmd = Command::cargo_bin("tapline").unwrap();
    cmd.write_stdin("this is not json\n");
    cmd.assert()
        .failure()
        .stderr(contains("tapline::input::json").or(contains("input line 1")));
}

#[test]
fn cli_prints_bail_out_line() {
    let mut cmd = Command::cargo_bin("tapline").unwrap();
    cmd.write_stdin(r#"{"type":"BAIL_OUT","data":"boom"}"#);
    cmd.assert()
        .failure()
        .stdout(contains("Bail out! Unhandled error."))
        .stderr(contains("bailed out"));
}

#[test]
fn cli_accepts_bail_out_without_data() {
    let mut cmd = Command::cargo_bin("tapline").unwrap();
    cmd.write_stdin("{\"type\":\"BAIL_OUT\"}\n");
    cmd.assert()
        .failure()
        .stdout(contains("Bail out! Unhandled error."))
        .stderr(contains("unknown error"));
}

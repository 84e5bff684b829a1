//! TAP writer output, line for line.

mod common;

use common::{capture_writer, lines, object};
use tapline::value::Map;
use tapline::{AssertionId, AssertionResult, SummaryCounts, TestStart, Value};

#[test]
fn print_with_no_padding() {
    let mut writer = capture_writer();
    writer.print("test");
    assert_eq!(lines(&writer), ["test"]);
}

#[test]
fn print_with_padding() {
    let mut writer = capture_writer();
    writer.print_indented("test", 2);
    assert_eq!(lines(&writer), ["        test"]);
}

#[test]
fn print_comment_with_no_padding() {
    let mut writer = capture_writer();
    writer.print_comment("test");
    assert_eq!(lines(&writer), ["# test"]);
}

#[test]
fn print_comment_with_padding() {
    let mut writer = capture_writer();
    writer.print_comment_indented("test", 1);
    assert_eq!(lines(&writer), ["    # test"]);
}

#[test]
fn print_header() {
    let mut writer = capture_writer();
    writer.print_header();
    assert_eq!(lines(&writer), ["TAP version 13"]);
}

#[test]
fn print_bail_out() {
    let mut writer = capture_writer();
    writer.print_bail_out();
    assert_eq!(lines(&writer), ["Bail out! Unhandled error."]);
}

#[test]
fn print_test_start() {
    let mut writer = capture_writer();
    writer.print_test_start(&TestStart::new("some test"));
    assert_eq!(lines(&writer), ["# some test"]);
}

#[cfg(test)]
mod print_assertion {
    use super::*;

    #[test]
    fn simple_passing_assertion() {
        let mut writer = capture_writer();
        writer.print_assertion(&AssertionResult::passed("some test"), AssertionId(66));
        assert_eq!(lines(&writer), ["ok 66 - some test"]);
    }

    #[test]
    fn simple_failing_assertion() {
        let mut writer = capture_writer();
        let result = AssertionResult::failed(
            "some failing test",
            object([("a", 123.into())]),
            object([("b", 456.into())]),
        );
        writer.print_assertion(&result, AssertionId(666));
        assert_eq!(
            lines(&writer),
            [
                "not ok 666 - some failing test",
                "  ---",
                r#"    actual: {"a":123}"#,
                r#"    expected: {"b":456}"#,
                "  ...",
            ]
        );
    }

    #[test]
    fn es6_map_failing_assertion() {
        let mut writer = capture_writer();
        let actual: Map = [("a", 123)].into_iter().collect();
        let expected: Map = [("b", 456)].into_iter().collect();
        let result = AssertionResult::failed("some failing test", actual, expected);
        writer.print_assertion(&result, AssertionId(666));
        assert_eq!(
            lines(&writer),
            [
                "not ok 666 - some failing test",
                "  ---",
                r#"    actual: {"Map":{"a":123}}"#,
                r#"    expected: {"Map":{"b":456}}"#,
                "  ...",
            ]
        );
    }

    #[test]
    fn absent_payload_reads_as_undefined() {
        let mut writer = capture_writer();
        let result = AssertionResult::failed("truthy", Value::Undefined, "undefined");
        writer.print_assertion(&result, AssertionId(1));
        assert_eq!(lines(&writer)[2], "    actual: undefined");
        assert_eq!(lines(&writer)[3], r#"    expected: "undefined""#);
    }

    #[test]
    fn operator_and_location_are_included_when_known() {
        let mut writer = capture_writer();
        let mut result = AssertionResult::failed("eq", 1, 2);
        result.operator = Some("equal".to_string());
        result.at = Some("math.test.js:10:5".to_string());
        writer.print_assertion(&result, AssertionId(3));
        assert_eq!(
            lines(&writer),
            [
                "not ok 3 - eq",
                "  ---",
                "    operator: equal",
                "    actual: 1",
                "    expected: 2",
                "    at: math.test.js:10:5",
                "  ...",
            ]
        );
    }

    #[test]
    fn skipped_assertion_has_directive() {
        let mut writer = capture_writer();
        writer.print_assertion(&AssertionResult::skipped("later"), AssertionId(4));
        assert_eq!(lines(&writer), ["ok 4 - later # SKIP"]);
    }

    #[test]
    fn circular_payload_still_prints() {
        let mut writer = capture_writer();
        let actual = object([("name", "loop".into())]);
        actual.insert("me", actual.clone());
        writer.print_assertion(
            &AssertionResult::failed("cycle", actual, Value::Null),
            AssertionId(5),
        );
        assert_eq!(
            lines(&writer)[2],
            r#"    actual: {"name":"loop","me":"[__CIRCULAR_REF__]"}"#
        );
    }
}

#[test]
fn print_summary() {
    let mut writer = capture_writer();
    writer.print_summary(&SummaryCounts {
        success: 3,
        skip: 1,
        failure: 5,
        total: 9,
    });
    assert_eq!(
        lines(&writer),
        ["", "1..9", "# tests 9", "# pass  3", "# fail  5", "# skip  1"]
    );
}

#[test]
fn closure_sink_receives_lines() {
    let mut seen = Vec::new();
    {
        let mut writer = tapline::TapWriter::new(|line: &str| seen.push(line.to_string()));
        writer.print_header();
        writer.print_comment("hi");
    }
    assert_eq!(seen, ["TAP version 13", "# hi"]);
}

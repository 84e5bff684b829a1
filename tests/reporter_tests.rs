//! Reporter bookkeeping over whole event streams.

mod common;

use std::io::{self, Write};

use common::{capture_writer, object};
use tapline::cli::report_lines;
use tapline::{
    AssertionResult, BailOut, Event, IoSink, SummaryCounts, TapReporter, TapWriter, TaplineError,
    TestEnd, TestStart,
};

fn run(events: &[Event]) -> (SummaryCounts, Vec<String>) {
    let (counts, sink) = TapReporter::new(capture_writer())
        .run(events)
        .expect("stream without bail-out");
    (counts, sink.into_lines())
}

#[test]
fn numbers_assertions_and_prints_summary() {
    let events = [
        Event::TestStart(TestStart::new("arithmetic")),
        Event::Assertion(AssertionResult::passed("adds")),
        Event::Assertion(AssertionResult::failed("subtracts", 1, 2)),
        Event::Assertion(AssertionResult::skipped("divides")),
        Event::TestEnd(TestEnd::default()),
    ];
    let (counts, lines) = run(&events);

    assert_eq!(
        counts,
        SummaryCounts {
            success: 1,
            skip: 1,
            failure: 1,
            total: 3,
        }
    );
    assert_eq!(
        lines,
        [
            "TAP version 13",
            "# arithmetic",
            "ok 1 - adds",
            "not ok 2 - subtracts",
            "  ---",
            "    actual: 1",
            "    expected: 2",
            "  ...",
            "ok 3 - divides # SKIP",
            "",
            "1..3",
            "# tests 3",
            "# pass  1",
            "# fail  1",
            "# skip  1",
        ]
    );
}

#[test]
fn empty_stream_still_has_header_and_plan() {
    let (counts, lines) = run(&[]);
    assert_eq!(counts, SummaryCounts::default());
    assert_eq!(
        lines,
        ["TAP version 13", "", "1..0", "# tests 0", "# pass  0", "# fail  0", "# skip  0"]
    );
}

#[test]
fn upstream_summary_wins() {
    let upstream = SummaryCounts {
        success: 3,
        skip: 1,
        failure: 5,
        total: 9,
    };
    let events = [
        Event::Assertion(AssertionResult::passed("only")),
        Event::Summary(upstream),
    ];
    let (counts, lines) = run(&events);
    assert_eq!(counts, upstream);
    assert!(lines.ends_with(&[
        "1..9".to_string(),
        "# tests 9".to_string(),
        "# pass  3".to_string(),
        "# fail  5".to_string(),
        "# skip  1".to_string(),
    ]));
}

#[test]
fn bail_out_stops_the_run() {
    let mut reporter = TapReporter::new(capture_writer());
    reporter
        .report(&Event::Assertion(AssertionResult::passed("before")))
        .unwrap();
    let error = reporter
        .report(&Event::BailOut(BailOut {
            error: object([("message", "boom".into())]).into(),
        }))
        .unwrap_err();

    match error {
        TaplineError::BailOut { reason } => assert_eq!(reason, r#"{"message":"boom"}"#),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(reporter.counts().total, 1);
}

#[test]
fn bail_out_without_data_has_unknown_reason() {
    let input = concat!(
        r#"{"type":"ASSERTION","data":{"pass":true,"description":"before"}}"#,
        "\n",
        r#"{"type":"BAIL_OUT"}"#,
        "\n",
        r#"{"type":"ASSERTION","data":{"pass":false,"description":"never read"}}"#,
        "\n",
    );
    let error = report_lines(TapReporter::new(capture_writer()), input.as_bytes()).unwrap_err();
    match error {
        TaplineError::BailOut { reason } => assert_eq!(reason, "unknown error"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reads_events_line_by_line() {
    let input = concat!(
        r#"{"type":"TEST_START","data":{"description":"suite"}}"#,
        "\n\n",
        r#"{"type":"ASSERTION","data":{"pass":false,"description":"eq","actual":{"a":123},"expected":{"b":456}}}"#,
        "\n",
    );
    let failures = report_lines(TapReporter::new(capture_writer()), input.as_bytes()).unwrap();
    assert_eq!(failures, 1);
}

/// Refuses every write, like stdout after the reader went away.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn closed_output_stops_reading() {
    let input = concat!(
        r#"{"type":"ASSERTION","data":{"pass":false,"description":"unseen"}}"#,
        "\n",
        "not json\n",
    );
    let reporter = TapReporter::new(TapWriter::new(IoSink::new(ClosedPipe)));
    let failures = report_lines(reporter, input.as_bytes()).unwrap();
    assert_eq!(failures, 0);
}

#[test]
fn malformed_line_reports_its_number() {
    let input = "{\"type\":\"TEST_START\",\"data\":{\"description\":\"x\"}}\nnot json\n";
    let error = report_lines(TapReporter::new(capture_writer()), input.as_bytes()).unwrap_err();
    assert!(matches!(error, TaplineError::InvalidEvent { line: 2, .. }));
}

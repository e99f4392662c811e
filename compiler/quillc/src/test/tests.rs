use std::path::Path;

use pretty_assertions::assert_eq;
use quill_eval::{buffer_handler, silent_handler, EvalConfig};

use super::*;

fn run_with(config: TestRunnerConfig, source: &str) -> FileSummary {
    TestRunner::with_config(config)
        .print_handler(silent_handler())
        .run_source(Path::new("inline.js"), source)
}

fn run(source: &str) -> FileSummary {
    run_with(TestRunnerConfig::default(), source)
}

fn failure(result: &TestResult) -> &str {
    match &result.outcome {
        TestOutcome::Failed(error) => error,
        other => panic!("expected a failure, got {other:?}"),
    }
}

#[test]
fn file_without_cases_is_one_test() {
    let summary = run("assert(1 + 1 === 2); assertEqual('a' + 1, 'a1');");
    assert_eq!(summary.errors, Vec::<String>::new());
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.results[0].name, "inline");
}

#[test]
fn failed_assertion_outside_a_case_stops_the_file() {
    let summary = run("assert(false, 'nope'); assert(true);");
    assert_eq!(summary.total(), 0);
    assert_eq!(summary.errors.len(), 1);
    assert!(
        summary.errors[0].starts_with("Uncaught Assertion failed: nope (condition is falsy)"),
        "{}",
        summary.errors[0]
    );
    assert!(summary.has_failures());
}

#[test]
fn cases_fail_independently() {
    let summary = run("
        test('adds', () => { assertEqual(1 + 2, 3); });
        test('compares', () => { assertEqual('a', 'b'); });
        test('throws', () => { null.x; });
    ");
    assert_eq!((summary.passed, summary.failed), (1, 2));
    assert!(summary.errors.is_empty());
    assert!(failure(&summary.results[1])
        .starts_with("Assertion failed: expected b (string), got a (string)"));
    assert!(failure(&summary.results[2])
        .starts_with("TypeError: Cannot read properties of null (reading 'x')"));
}

#[test]
fn assert_error_checks_the_message() {
    let summary = run("
        assertError(() => { throw 'boom'; }, 'boom');
        assertError(() => undefinedName, 'is not defined');
        let caught = '';
        try { assertError(() => 1); } catch (e) { caught = e; }
        assert(caught.startsWith('Assertion failed: expected an error'), caught);
        try { assertError(() => { throw 'x'; }, 'y'); } catch (e) { caught = e; }
        assert(caught.includes(\"containing 'y'\"), caught);
    ");
    assert_eq!(summary.errors, Vec::<String>::new());
    assert_eq!(summary.passed, 1);
}

#[test]
fn filter_skips_other_cases() {
    let config = TestRunnerConfig {
        filter: Some("keep".to_string()),
        ..TestRunnerConfig::default()
    };
    let summary = run_with(
        config,
        "test('keep me', () => {}); test('drop', () => { assert(false); });",
    );
    assert_eq!((summary.passed, summary.skipped, summary.failed), (1, 1, 0));
    assert!(summary.results[1].outcome.is_skipped());
}

#[test]
fn loop_limit_inside_a_case_stops_the_file() {
    let config = TestRunnerConfig {
        eval: EvalConfig::default().loop_limit(10),
        ..TestRunnerConfig::default()
    };
    let summary = run_with(config, "test('spin', () => { while (true) {} });");
    assert!(summary.results.is_empty());
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("infinite loop detected"));
}

#[test]
fn syntax_errors_are_file_errors() {
    let summary = run("const x;");
    assert_eq!(summary.total(), 0);
    assert_eq!(summary.errors.len(), 1);
}

#[test]
fn scripts_print_through_the_handler() {
    let handler = buffer_handler();
    let summary = TestRunner::new()
        .print_handler(handler.clone())
        .run_source(Path::new("print.js"), "print('hi', 1); console.log([1, 2]);");
    assert!(!summary.has_failures());
    assert_eq!(handler.get_output(), "hi 1\n1,2\n");
}

#[test]
fn summary_exit_codes() {
    let mut summary = TestSummary::new();
    assert_eq!(summary.exit_code(), 2);
    summary.add_file(run("assert(true);"));
    assert_eq!(summary.exit_code(), 0);
    summary.add_file(run("assert(false);"));
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(summary.error_files, 1);
}

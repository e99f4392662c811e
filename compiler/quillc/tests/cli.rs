//! End-to-end checks of the `quill` binary.

#![allow(clippy::unwrap_used, reason = "process spawning in tests")]

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn quill(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quill"))
        .args(args)
        .current_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn run_prints_script_output() {
    let output = quill(&["run", "run/hello.js"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "hello quill 2\n");
}

#[test]
fn bare_script_path_runs_it() {
    let output = quill(&["run/hello.js"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "hello quill 2\n");
}

#[test]
fn loop_limit_flag_stops_runaway_scripts() {
    let output = quill(&["run", "run/spin.js", "--loop-limit=5"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("E6005"), "{err}");
    assert!(err.contains("more than 5 iterations"), "{err}");
}

#[test]
fn uncaught_errors_exit_with_a_diagnostic() {
    let output = quill(&["run", "run/uncaught.js"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("ReferenceError: missing is not defined"), "{err}");
    assert!(err.contains("run/uncaught.js"), "{err}");
}

#[test]
fn invalid_flags_are_rejected() {
    let output = quill(&["run", "run/hello.js", "--loop-limit=many"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("--loop-limit"));
}

#[test]
fn check_reports_syntax_errors() {
    let output = quill(&["check", "parse_errors/const_reassignment.js"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("E2003"));

    let output = quill(&["check", "run/hello.js"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "OK: run/hello.js\n");
}

#[test]
fn missing_files_are_reported() {
    let output = quill(&["check", "no/such/file.js"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "cannot find file 'no/such/file.js'\n");
}

#[test]
fn lex_and_parse_dump_the_front_end() {
    let output = quill(&["lex", "run/hello.js"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Tokens for 'run/hello.js'"));

    let output = quill(&["parse", "run/hello.js"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Binding records for 'run/hello.js' (2 functions):"), "{text}");
    assert!(text.contains("fn#1 greet (arrow)"), "{text}");
}

#[test]
fn test_command_runs_script_fixtures() {
    let output = quill(&["test", "scripts"]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).ends_with("OK\n"));

    let output = quill(&["test", "parse_errors"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("FAILED"));
}

#[test]
fn unknown_commands_print_usage() {
    let output = quill(&["frobnicate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown command: frobnicate"));
    assert!(stdout(&output).contains("Usage: quill <command>"));
}

//! Command handlers for the Quill CLI.
//!
//! Each submodule implements one command (run, test, check, lex, parse).
//! Shared helpers like `read_file` and `report` live here in the module
//! root.

use quill_diagnostic::emitter::{emit, ColorMode};
use quill_diagnostic::Diagnostic;
use quill_eval::EvalConfig;

mod check;
mod debug;
mod run;
mod test;

pub use check::check_file;
pub use debug::{lex_file, parse_file};
pub use run::run_file;
pub use test::run_tests;

/// Read a file from disk, exiting with a user-friendly error message on failure.
pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Render `diagnostic` to stderr, colored when stderr is a terminal.
pub(crate) fn report(path: &str, diagnostic: &Diagnostic, source: &str) {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let colors = ColorMode::Auto.should_use_colors(is_tty);
    let mut stderr = std::io::stderr().lock();
    if emit(&mut stderr, diagnostic, source, colors).is_err() {
        eprintln!("{diagnostic}");
    }
    eprintln!("  in {path}");
}

/// Apply a `--loop-limit=N` or `--max-depth=N` flag to `config`.
///
/// Returns `Ok(false)` when `arg` is not a limit flag.
pub fn apply_limit_flag(config: &mut EvalConfig, arg: &str) -> Result<bool, String> {
    if let Some(value) = arg.strip_prefix("--loop-limit=") {
        config.loop_limit = parse_limit("--loop-limit", value)?;
        Ok(true)
    } else if let Some(value) = arg.strip_prefix("--max-depth=") {
        config.max_call_depth = parse_limit("--max-depth", value)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn parse_limit(flag: &str, value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!(
            "invalid value '{value}' for {flag}: expected a positive integer"
        )),
        Ok(n) => Ok(n),
    }
}

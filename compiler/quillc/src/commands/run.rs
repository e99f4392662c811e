//! The `run` command: evaluate a script with the standard library.

use quill_eval::{EvalConfig, Interpreter};

use super::{read_file, report};

/// Evaluate the file at `path`, exiting with status 1 after rendering a
/// diagnostic on any lexical, syntax or runtime error.
pub fn run_file(path: &str, config: EvalConfig) {
    let content = read_file(path);
    let mut interpreter = Interpreter::builder().config(config).build();

    let start = std::time::Instant::now();
    let result = interpreter.run_source(&content);
    tracing::debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        ok = result.is_ok(),
        "script finished"
    );

    if let Err(err) = result {
        report(path, &err.to_diagnostic(), &content);
        std::process::exit(1);
    }
}

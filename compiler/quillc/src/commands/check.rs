//! The `check` command: tokenize and parse without running.

use super::{read_file, report};

/// Report lexical, syntax and binding errors in `path`.
pub fn check_file(path: &str) {
    let content = read_file(path);
    match quill_parse::parse_source(&content) {
        Ok(program) => {
            tracing::debug!(functions = program.functions().count(), "check passed");
            println!("OK: {path}");
        }
        Err(err) => {
            report(path, &err.to_diagnostic(), &content);
            std::process::exit(1);
        }
    }
}

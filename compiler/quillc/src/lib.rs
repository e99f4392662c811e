//! Quill command-line driver.
//!
//! The binary (`quill`) is a thin argument dispatcher over [`commands`];
//! the script test runner lives in [`test`] so integration tests can drive
//! it without spawning processes.
//!
//! # Pipeline
//!
//! ```text
//! source ──► quill_lexer::tokenize ──► Vec<Token>
//!                                         │
//!                                         ▼
//!                    quill_parse::parse ──► Program (binding records resolved)
//!                                         │
//!                                         ▼
//!                Interpreter::evaluate ──► completion value
//! ```

use std::sync::Once;

pub mod commands;
pub mod test;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Only takes effect when `RUST_LOG` is set, e.g.
/// `RUST_LOG=quill_eval=trace quill run script.js`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}

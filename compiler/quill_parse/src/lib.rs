//! Parser for Quill.
//!
//! Builds a [`Program`] from tokens and runs the binding analyzer over it in
//! the same pass, so the returned program is ready to evaluate: every
//! identifier has its storage, every function its frame layout.
//!
//! Errors are fatal. The first lexical, syntax or binding error aborts the
//! parse with a [`ParseError`] carrying the line and column.

mod cursor;
mod error;
mod grammar;
mod resolve;

use quill_ir::{Program, Token};

pub use error::ParseError;
pub use resolve::{is_reserved, RESERVED_WORDS};

/// Parse a token stream produced by `quill_lexer::tokenize`.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    grammar::Parser::new(tokens).parse_program()
}

/// Tokenize and parse `source`.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    let tokens = quill_lexer::tokenize(source)?;
    parse(tokens)
}

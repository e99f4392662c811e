//! Parse and binding errors.

use quill_diagnostic::{Diagnostic, ErrorCode};
use quill_ir::{Position, TokenKind};
use quill_lexer::LexError;

/// First error found while parsing or analyzing a program.
///
/// Parsing stops at the first error; there is no recovery.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {position}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub position: Position,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, position: Position) -> Self {
        ParseError {
            code,
            message: message.into(),
            position,
        }
    }

    pub(crate) fn unexpected(found: TokenKind, text: &str, position: Position) -> Self {
        let message = match found {
            TokenKind::Eof => "Unexpected end of input".to_owned(),
            TokenKind::Ident | TokenKind::Number | TokenKind::RestIdent => {
                format!("Unexpected token '{text}'")
            }
            TokenKind::String | TokenKind::Template => "Unexpected string".to_owned(),
            other => format!("Unexpected token '{}'", other.describe()),
        };
        ParseError::new(ErrorCode::E1001, message, position)
    }

    pub(crate) fn expected(what: &str, found: TokenKind, position: Position) -> Self {
        ParseError::new(
            ErrorCode::E1001,
            format!("Expected {what} but found {}", found.describe()),
            position,
        )
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code, self.message.clone(), self.position)
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(err.kind.code(), err.kind.to_string(), err.position)
    }
}

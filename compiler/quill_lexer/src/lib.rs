//! Tokenizer for Quill.
//!
//! [`tokenize`] turns source text into a flat `Vec<Token>` ending in
//! [`TokenKind::Eof`]. Fixed tokens come from a `logos` automaton (see
//! `raw`); literals with nesting rules are scanned by its callbacks.
//!
//! Template literals are not lexed recursively here: each `${...}` region
//! becomes a [`TemplatePart`] holding the raw expression source, which the
//! parser re-tokenizes with [`tokenize_at`] so positions stay accurate.

mod escape;
mod raw;

use logos::Logos;
use quill_diagnostic::{Diagnostic, ErrorCode};
use quill_ir::{Keyword, Number, Position, TemplatePart, Token, TokenKind};
use tracing::debug;

pub use escape::{unescape, EscapeError};
use raw::{RawPart, RawToken};

/// What went wrong while tokenizing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("line break in string literal")]
    NewlineInString,
    #[error("unterminated template literal")]
    UnterminatedTemplate,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid number literal")]
    InvalidNumber,
}

impl Default for LexErrorKind {
    // logos reports unmatched input with the default value; the driver
    // fills in the actual character
    fn default() -> Self {
        LexErrorKind::UnexpectedCharacter('\0')
    }
}

impl LexErrorKind {
    pub fn code(self) -> ErrorCode {
        match self {
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::UnexpectedCharacter(_) => ErrorCode::E0002,
            LexErrorKind::InvalidNumber => ErrorCode::E0003,
            LexErrorKind::NewlineInString => ErrorCode::E0004,
            LexErrorKind::InvalidEscape => ErrorCode::E0005,
            LexErrorKind::UnterminatedTemplate => ErrorCode::E0006,
            LexErrorKind::UnterminatedComment => ErrorCode::E0007,
        }
    }
}

/// A fatal tokenizer error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

impl LexError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.kind.code(), self.kind.to_string(), self.position)
    }
}

/// Tokenize a whole source file.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize_at(source, Position::START)
}

/// Tokenize `source` as if it began at `origin`.
///
/// Used for template interpolations, whose text is a slice of a larger file.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn tokenize_at(source: &str, origin: Position) -> Result<Vec<Token>, LexError> {
    let index = LineIndex::new(source, origin);
    let mut tokens = Vec::new();
    let mut newline_before = false;
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let slice = lexer.slice();
        let position = index.position(span.start);
        let raw = match result {
            Ok(raw) => raw,
            Err(LexErrorKind::UnexpectedCharacter(_)) => {
                let found = slice.chars().next().unwrap_or('\0');
                return Err(LexError {
                    kind: LexErrorKind::UnexpectedCharacter(found),
                    position,
                });
            }
            Err(kind) => return Err(LexError { kind, position }),
        };

        let (kind, text) = match raw {
            RawToken::Newline | RawToken::LineComment => {
                newline_before |= raw == RawToken::Newline;
                continue;
            }
            RawToken::BlockComment => {
                newline_before |= memchr::memchr(b'\n', slice.as_bytes()).is_some();
                continue;
            }
            RawToken::Word => (word_kind(slice), slice.to_owned()),
            RawToken::RestWord => (TokenKind::RestIdent, slice[3..].to_owned()),
            RawToken::Number => {
                if Number::parse_literal(slice).is_none() {
                    return Err(LexError {
                        kind: LexErrorKind::InvalidNumber,
                        position,
                    });
                }
                (TokenKind::Number, slice.to_owned())
            }
            RawToken::Quoted => {
                let inner = &slice[1..slice.len() - 1];
                let cooked = unescape(inner).map_err(|e| LexError {
                    kind: LexErrorKind::InvalidEscape,
                    position: index.position(span.start + 1 + e.offset),
                })?;
                (TokenKind::String, cooked)
            }
            RawToken::Template(ref parts) => {
                let mut token = Token::new(TokenKind::Template, slice, position);
                token.newline_before = newline_before;
                token.parts = template_parts(source, &index, parts);
                tokens.push(token);
                newline_before = false;
                continue;
            }
            RawToken::Operator(op) => (TokenKind::Operator(op), op.as_str().to_owned()),
            RawToken::Punct(p) => (TokenKind::Punct(p), p.as_str().to_owned()),
        };

        let mut token = Token::new(kind, text, position);
        token.newline_before = newline_before;
        newline_before = false;
        tokens.push(token);
    }

    let mut eof = Token::new(TokenKind::Eof, "", index.position(source.len()));
    eof.newline_before = newline_before;
    tokens.push(eof);
    debug!(count = tokens.len(), "tokenized");
    Ok(tokens)
}

fn word_kind(word: &str) -> TokenKind {
    match word {
        "NaN" | "Infinity" => TokenKind::Number,
        _ => Keyword::from_text(word).map_or(TokenKind::Ident, TokenKind::Keyword),
    }
}

fn template_parts(source: &str, index: &LineIndex, parts: &[RawPart]) -> Vec<TemplatePart> {
    parts
        .iter()
        .map(|part| TemplatePart {
            kind: part.kind,
            text: source[part.range.clone()].to_owned(),
            position: index.position(part.range.start),
        })
        .collect()
}

/// Maps byte offsets to line/column positions.
struct LineIndex<'a> {
    source: &'a str,
    origin: Position,
    /// Byte offsets at which lines after the first begin.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str, origin: Position) -> Self {
        let line_starts = memchr::memchr_iter(b'\n', source.as_bytes())
            .map(|i| i + 1)
            .collect();
        LineIndex {
            source,
            origin,
            line_starts,
        }
    }

    fn position(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = if line == 0 { 0 } else { self.line_starts[line - 1] };
        let chars = self.source[line_start..offset].chars().count() as u32;
        let column = if line == 0 {
            self.origin.column + chars
        } else {
            chars + 1
        };
        Position::new(
            self.origin.offset + offset as u32,
            self.origin.line + line as u32,
            column,
        )
    }
}

#[cfg(test)]
mod tests;

//! Raw token automaton.
//!
//! Fixed tokens and simple classes (words, numbers) are matched by `logos`.
//! Quoted strings, template literals and block comments are scanned by
//! callbacks that bump the lexer past the whole literal, so the automaton
//! never has to express their nesting rules.

use std::ops::Range;

use logos::{Lexer, Logos};
use memchr::memmem;
use quill_ir::{Op, Punct, TemplatePartKind};

use crate::LexErrorKind;

/// Byte range of one template segment, relative to the scanned source.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RawPart {
    pub kind: TemplatePartKind,
    pub range: Range<usize>,
}

#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\x0C]+")]
pub(crate) enum RawToken {
    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[token("\"", |lex| quoted(lex, b'"'))]
    #[token("'", |lex| quoted(lex, b'\''))]
    Quoted,

    #[token("`", template)]
    Template(Vec<RawPart>),

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,

    #[regex(r"\.\.\.[A-Za-z_$][A-Za-z0-9_$]*")]
    RestWord,

    #[regex(r"[0-9]", number)]
    #[regex(r"\.[0-9]", number)]
    Number,

    #[token("===", |_| Op::StrictEq)]
    #[token("!==", |_| Op::StrictNotEq)]
    #[token("**=", |_| Op::StarStarAssign)]
    #[token("==", |_| Op::Eq)]
    #[token("!=", |_| Op::NotEq)]
    #[token("<=", |_| Op::LtEq)]
    #[token(">=", |_| Op::GtEq)]
    #[token("++", |_| Op::PlusPlus)]
    #[token("--", |_| Op::MinusMinus)]
    #[token("+=", |_| Op::PlusAssign)]
    #[token("-=", |_| Op::MinusAssign)]
    #[token("*=", |_| Op::StarAssign)]
    #[token("/=", |_| Op::SlashAssign)]
    #[token("%=", |_| Op::PercentAssign)]
    #[token("&&", |_| Op::AndAnd)]
    #[token("||", |_| Op::OrOr)]
    #[token("=>", |_| Op::Arrow)]
    #[token("??", |_| Op::Nullish)]
    #[token("?.", |_| Op::OptionalDot)]
    #[token("**", |_| Op::StarStar)]
    #[token("+", |_| Op::Plus)]
    #[token("-", |_| Op::Minus)]
    #[token("*", |_| Op::Star)]
    #[token("/", |_| Op::Slash)]
    #[token("%", |_| Op::Percent)]
    #[token("!", |_| Op::Bang)]
    #[token("<", |_| Op::Lt)]
    #[token(">", |_| Op::Gt)]
    #[token("=", |_| Op::Assign)]
    Operator(Op),

    #[token(";", |_| Punct::Semicolon)]
    #[token(",", |_| Punct::Comma)]
    #[token(".", |_| Punct::Dot)]
    #[token(":", |_| Punct::Colon)]
    #[token("(", |_| Punct::LParen)]
    #[token(")", |_| Punct::RParen)]
    #[token("[", |_| Punct::LBracket)]
    #[token("]", |_| Punct::RBracket)]
    #[token("{", |_| Punct::LBrace)]
    #[token("}", |_| Punct::RBrace)]
    #[token("?", |_| Punct::Question)]
    Punct(Punct),
}

/// Extend a numeric literal past its first character(s).
///
/// Scanned by hand so a trailing `e` or `x` without digits ends the literal
/// instead of forcing the automaton to backtrack.
fn number(lex: &mut Lexer<'_, RawToken>) {
    let started_with_dot = lex.slice().starts_with('.');
    let hex_prefix = lex.slice() == "0";
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    if hex_prefix
        && matches!(bytes.first(), Some(b'x' | b'X'))
        && bytes.get(1).is_some_and(u8::is_ascii_hexdigit)
    {
        i = 1;
        while bytes.get(i).is_some_and(u8::is_ascii_hexdigit) {
            i += 1;
        }
        lex.bump(i);
        return;
    }
    let mut seen_dot = started_with_dot;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'0'..=b'9' => i += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                i += 1;
            }
            _ => break,
        }
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        if bytes.get(j).is_some_and(u8::is_ascii_digit) {
            while bytes.get(j).is_some_and(u8::is_ascii_digit) {
                j += 1;
            }
            i = j;
        }
    }
    lex.bump(i);
}

fn block_comment(lex: &mut Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    match memmem::find(rest.as_bytes(), b"*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(rest.len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

fn quoted(lex: &mut Lexer<'_, RawToken>, quote: u8) -> Result<(), LexErrorKind> {
    let rest = lex.remainder().as_bytes();
    match skip_quoted(rest, 0, quote) {
        Ok(end) => {
            lex.bump(end);
            Ok(())
        }
        Err((stop, kind)) => {
            lex.bump(stop);
            Err(kind)
        }
    }
}

fn template(lex: &mut Lexer<'_, RawToken>) -> Result<Vec<RawPart>, LexErrorKind> {
    let base = lex.span().end;
    let bytes = lex.remainder().as_bytes();
    let mut parts = Vec::new();
    let mut text_start = 0;
    let mut i = 0;
    let result = loop {
        let Some(&b) = bytes.get(i) else {
            break Err((bytes.len(), LexErrorKind::UnterminatedTemplate));
        };
        match b {
            b'\\' => i += 2,
            b'`' => {
                push_text(&mut parts, base, text_start, i);
                break Ok(i + 1);
            }
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                push_text(&mut parts, base, text_start, i);
                let start = i + 2;
                match skip_interpolation(bytes, start) {
                    Ok(close) => {
                        parts.push(RawPart {
                            kind: TemplatePartKind::Expr,
                            range: base + start..base + close,
                        });
                        i = close + 1;
                        text_start = i;
                    }
                    Err(err) => break Err(err),
                }
            }
            _ => i += 1,
        }
    };
    match result {
        Ok(end) => {
            lex.bump(end);
            Ok(parts)
        }
        Err((stop, kind)) => {
            lex.bump(stop.min(bytes.len()));
            Err(kind)
        }
    }
}

fn push_text(parts: &mut Vec<RawPart>, base: usize, start: usize, end: usize) {
    if end > start {
        parts.push(RawPart {
            kind: TemplatePartKind::Text,
            range: base + start..base + end,
        });
    }
}

type ScanResult = Result<usize, (usize, LexErrorKind)>;

/// Index just past the closing `quote`, scanning from `i`.
fn skip_quoted(bytes: &[u8], mut i: usize, quote: u8) -> ScanResult {
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\\' => {
                // `\` + CRLF is one line continuation
                i += if bytes.get(i + 1) == Some(&b'\r') && bytes.get(i + 2) == Some(&b'\n') {
                    3
                } else {
                    2
                };
            }
            b'\n' => return Err((i, LexErrorKind::NewlineInString)),
            b if b == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err((bytes.len(), LexErrorKind::UnterminatedString))
}

/// Index of the `}` closing an interpolation that starts at `i`.
fn skip_interpolation(bytes: &[u8], mut i: usize) -> ScanResult {
    let mut depth = 0usize;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Ok(i),
            b'}' => depth -= 1,
            b'"' | b'\'' => {
                i = skip_quoted(bytes, i + 1, b)?;
                continue;
            }
            b'`' => {
                i = skip_template(bytes, i + 1)?;
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = memchr::memchr(b'\n', &bytes[i..]).map_or(bytes.len(), |n| i + n);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                match memmem::find(&bytes[i + 2..], b"*/") {
                    Some(n) => i += n + 4,
                    None => return Err((bytes.len(), LexErrorKind::UnterminatedComment)),
                }
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    Err((bytes.len(), LexErrorKind::UnterminatedTemplate))
}

/// Index just past the closing backtick of a nested template.
fn skip_template(bytes: &[u8], mut i: usize) -> ScanResult {
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\\' => i += 2,
            b'`' => return Ok(i + 1),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i = skip_interpolation(bytes, i + 2)? + 1;
            }
            _ => i += 1,
        }
    }
    Err((bytes.len(), LexErrorKind::UnterminatedTemplate))
}

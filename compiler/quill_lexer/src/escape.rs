//! Escape sequence resolution.
//!
//! Plain string literals are cooked while lexing. Template literal text is
//! kept raw in the token and cooked by the parser with the same function.

/// Failure to cook a literal: byte offset of the offending backslash.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct EscapeError {
    pub offset: usize,
}

/// Resolve backslash escapes in `raw`.
///
/// Supports the single-character escapes, `\xHH`, `\uHHHH`, `\u{H...}`
/// and line continuations. A backslash before any other character yields
/// that character. Lone surrogates become U+FFFD.
pub fn unescape(raw: &str) -> Result<String, EscapeError> {
    if !raw.contains('\\') {
        return Ok(raw.to_owned());
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();
    while let Some((at, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let err = EscapeError { offset: at };
        let Some((_, esc)) = chars.next() else {
            return Err(err);
        };
        match esc {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            '\n' => {}
            '\r' => {
                if chars.peek().is_some_and(|&(_, c)| c == '\n') {
                    chars.next();
                }
            }
            'x' => {
                let code = take_hex(&mut chars, 2).ok_or(err)?;
                out.push(char::from_u32(code).ok_or(err)?);
            }
            'u' => {
                let code = if chars.peek().is_some_and(|&(_, c)| c == '{') {
                    chars.next();
                    let mut code = 0u32;
                    let mut digits = 0;
                    loop {
                        match chars.next() {
                            Some((_, '}')) if digits > 0 => break,
                            Some((_, c)) if c.is_ascii_hexdigit() && digits < 6 => {
                                code = code * 16 + c.to_digit(16).unwrap_or(0);
                                digits += 1;
                            }
                            _ => return Err(err),
                        }
                    }
                    code
                } else {
                    take_hex(&mut chars, 4).ok_or(err)?
                };
                push_code_unit(&mut out, &mut chars, code).ok_or(err)?;
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn take_hex(chars: &mut Chars<'_>, count: usize) -> Option<u32> {
    let mut code = 0u32;
    for _ in 0..count {
        let (_, c) = chars.next()?;
        code = code * 16 + c.to_digit(16)?;
    }
    Some(code)
}

/// Push a `\u` code, pairing a high surrogate with a following `\uDCxx`.
fn push_code_unit(out: &mut String, chars: &mut Chars<'_>, code: u32) -> Option<()> {
    if !(0xD800..0xDC00).contains(&code) {
        out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
        return Some(());
    }
    let mut lookahead = chars.clone();
    if let (Some((_, '\\')), Some((_, 'u'))) = (lookahead.next(), lookahead.next()) {
        if let Some(low) = take_hex(&mut lookahead, 4) {
            if (0xDC00..0xE000).contains(&low) {
                *chars = lookahead;
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                out.push(char::from_u32(combined)?);
                return Some(());
            }
        }
    }
    out.push('\u{FFFD}');
    Some(())
}

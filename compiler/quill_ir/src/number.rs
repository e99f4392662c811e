//! Three-tier numeric representation.
//!
//! Numbers are `int32`, `int64` or `float64`. Integer results stay in the
//! narrowest integer tier that holds them; anything written with a decimal
//! point or an exponent is a double. Arithmetic on these tiers lives in the
//! evaluator; this module owns parsing and formatting so the lexer-facing
//! literal rules and the runtime string coercion agree.

use std::fmt;

/// A numeric value in one of the three tiers.
#[derive(Copy, Clone, Debug)]
pub enum Number {
    Int(i32),
    Long(i64),
    Double(f64),
}

impl Number {
    pub const NAN: Number = Number::Double(f64::NAN);
    pub const ZERO: Number = Number::Int(0);

    /// Narrowest integer tier holding `value`.
    #[inline]
    pub fn from_i64(value: i64) -> Number {
        match i32::try_from(value) {
            Ok(v) => Number::Int(v),
            Err(_) => Number::Long(value),
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => f64::from(v),
            Number::Long(v) => v as f64,
            Number::Double(v) => v,
        }
    }

    /// Integer view for the `int64` tier. Doubles truncate toward zero.
    #[inline]
    pub fn as_i64(self) -> i64 {
        match self {
            Number::Int(v) => i64::from(v),
            Number::Long(v) => v,
            Number::Double(v) => v as i64,
        }
    }

    pub fn is_double(self) -> bool {
        matches!(self, Number::Double(_))
    }

    pub fn is_nan(self) -> bool {
        matches!(self, Number::Double(v) if v.is_nan())
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(v) => v == 0,
            Number::Long(v) => v == 0,
            Number::Double(v) => v == 0.0,
        }
    }

    /// Non-negative integral value usable as an array index.
    pub fn as_index(self) -> Option<usize> {
        match self {
            Number::Int(v) => usize::try_from(v).ok(),
            Number::Long(v) => usize::try_from(v).ok(),
            Number::Double(v) if v >= 0.0 && v.fract() == 0.0 && v < 9.007_199_254_740_992e15 => {
                Some(v as usize)
            }
            Number::Double(_) => None,
        }
    }

    /// Coerce string contents to a number.
    ///
    /// Blank text is zero, `NaN`/`Infinity` are recognised by name, `0x`
    /// prefixes parse as hexadecimal, plain integers take the narrowest
    /// integer tier, decimal or exponent forms become doubles and
    /// everything else is `NaN`.
    pub fn parse(text: &str) -> Number {
        let s = text.trim();
        if s.is_empty() {
            return Number::ZERO;
        }
        match s {
            "NaN" => return Number::NAN,
            "Infinity" | "+Infinity" => return Number::Double(f64::INFINITY),
            "-Infinity" => return Number::Double(f64::NEG_INFINITY),
            _ => {}
        }
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return parse_hex(hex).unwrap_or(Number::NAN);
        }
        if is_integer_text(s) {
            return match s.parse::<i64>() {
                Ok(v) => Number::from_i64(v),
                Err(_) => s.parse::<f64>().map_or(Number::NAN, Number::Double),
            };
        }
        if is_decimal_text(s) {
            return s.parse::<f64>().map_or(Number::NAN, Number::Double);
        }
        Number::NAN
    }

    /// Interpret the raw text of a numeric literal token.
    ///
    /// Returns `None` when the text is not a well-formed literal. Leading
    /// zeros do not select octal; `010` is ten.
    pub fn parse_literal(text: &str) -> Option<Number> {
        match text {
            "NaN" => return Some(Number::NAN),
            "Infinity" => return Some(Number::Double(f64::INFINITY)),
            _ => {}
        }
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            return parse_hex(hex);
        }
        if text.bytes().all(|b| b.is_ascii_digit()) && !text.is_empty() {
            return Some(match text.parse::<i64>() {
                Ok(v) => Number::from_i64(v),
                Err(_) => Number::Double(text.parse::<f64>().ok()?),
            });
        }
        if is_decimal_text(text) {
            return text.parse::<f64>().ok().map(Number::Double);
        }
        None
    }
}

fn parse_hex(digits: &str) -> Option<Number> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match u64::from_str_radix(digits, 16) {
        Ok(v) => Some(match i64::try_from(v) {
            Ok(v) => Number::from_i64(v),
            Err(_) => Number::Double(v as f64),
        }),
        // more than 16 hex digits
        Err(_) => Some(Number::Double(
            digits
                .bytes()
                .fold(0.0, |acc, b| acc * 16.0 + f64::from(hex_value(b))),
        )),
    }
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

fn is_integer_text(s: &str) -> bool {
    let digits = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal_text(s: &str) -> bool {
    let body = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    let (mantissa, exponent) = match body.find(|c: char| c == 'e' || c == 'E') {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };
    let mut digits = 0;
    let mut dots = 0;
    for b in mantissa.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return false,
        }
    }
    if digits == 0 || dots > 1 {
        return false;
    }
    match exponent {
        None => true,
        Some(e) => {
            let e = e.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(e);
            !e.is_empty() && e.bytes().all(|b| b.is_ascii_digit())
        }
    }
}

/// Numeric equality across tiers. `NaN` is unequal to everything.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) if a.is_double() || b.is_double() => a.as_f64() == b.as_f64(),
            (a, b) => a.as_i64() == b.as_i64(),
        }
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Number::Int(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Double(v)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Long(v) => write!(f, "{v}"),
            Number::Double(v) => fmt_double(v, f),
        }
    }
}

fn fmt_double(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("NaN");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if v == 0.0 {
        return f.write_str("0");
    }
    let abs = v.abs();
    if (1e-6..1e21).contains(&abs) {
        return write!(f, "{v}");
    }
    let sci = format!("{v:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
        _ => f.write_str(&sci),
    }
}

#[cfg(test)]
mod tests;

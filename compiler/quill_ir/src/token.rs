//! Token types produced by the lexer.

use std::fmt;

use crate::Position;

/// A lexed token.
///
/// `text` is the identifier name, the raw numeric literal, or the cooked
/// (escape-resolved) contents of a string literal. Template literals keep
/// their segments in `parts` with escapes left unresolved.
#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
    /// A line break separates this token from the previous one.
    pub newline_before: bool,
    pub parts: Vec<TemplatePart>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
            newline_before: false,
            parts: Vec::new(),
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

/// Token classification.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    Keyword(Keyword),
    Ident,
    Number,
    String,
    Template,
    Operator(Op),
    Punct(Punct),
    /// `...name` lexed as one token.
    RestIdent,
    Eof,
}

impl TokenKind {
    /// Short human-readable description for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Keyword(k) => k.as_str(),
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Template => "template string",
            TokenKind::Operator(op) => op.as_str(),
            TokenKind::Punct(p) => p.as_str(),
            TokenKind::RestIdent => "rest identifier",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal,)* }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }

            pub fn from_text(text: &str) -> Option<$name> {
                match text {
                    $($text => Some($name::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

text_enum! {
    /// Reserved keywords with syntactic meaning.
    Keyword {
        Break => "break",
        Case => "case",
        Catch => "catch",
        Const => "const",
        Continue => "continue",
        Default => "default",
        Do => "do",
        Else => "else",
        False => "false",
        Finally => "finally",
        For => "for",
        Function => "function",
        If => "if",
        In => "in",
        Let => "let",
        Null => "null",
        Return => "return",
        Switch => "switch",
        This => "this",
        Throw => "throw",
        True => "true",
        Try => "try",
        Typeof => "typeof",
        Undefined => "undefined",
        While => "while",
    }
}

text_enum! {
    /// Operators.
    Op {
        StrictEq => "===",
        StrictNotEq => "!==",
        StarStarAssign => "**=",
        Eq => "==",
        NotEq => "!=",
        LtEq => "<=",
        GtEq => ">=",
        PlusPlus => "++",
        MinusMinus => "--",
        PlusAssign => "+=",
        MinusAssign => "-=",
        StarAssign => "*=",
        SlashAssign => "/=",
        PercentAssign => "%=",
        AndAnd => "&&",
        OrOr => "||",
        Arrow => "=>",
        Nullish => "??",
        OptionalDot => "?.",
        StarStar => "**",
        Plus => "+",
        Minus => "-",
        Star => "*",
        Slash => "/",
        Percent => "%",
        Bang => "!",
        Lt => "<",
        Gt => ">",
        Assign => "=",
    }
}

text_enum! {
    /// Punctuation.
    Punct {
        Semicolon => ";",
        Comma => ",",
        Dot => ".",
        Colon => ":",
        LParen => "(",
        RParen => ")",
        LBracket => "[",
        RBracket => "]",
        LBrace => "{",
        RBrace => "}",
        Question => "?",
    }
}

/// One segment of a template literal.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TemplatePart {
    pub kind: TemplatePartKind,
    /// Raw source text: literal text with escapes unresolved, or the
    /// expression source between `${` and `}`.
    pub text: String,
    pub position: Position,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TemplatePartKind {
    Text,
    Expr,
}

#[cfg(test)]
mod tests;

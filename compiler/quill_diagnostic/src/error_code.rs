use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: lexical errors
/// - E1xxx: syntax errors
/// - E2xxx: binding analysis errors
/// - E6xxx: runtime errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexical errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Character that starts no token
    E0002,
    /// Malformed number literal
    E0003,
    /// Raw line break inside a quoted string
    E0004,
    /// Invalid escape sequence
    E0005,
    /// Unterminated template literal
    E0006,
    /// Unterminated block comment
    E0007,

    // Syntax errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Missing statement terminator
    E1003,
    /// Expected identifier
    E1004,
    /// Invalid assignment target
    E1005,
    /// `const` without initializer
    E1006,
    /// Malformed destructuring pattern
    E1007,

    // Binding errors (E2xxx)
    /// Duplicate declaration in one block
    E2001,
    /// Reserved word used as a name
    E2002,
    /// Assignment to a constant
    E2003,
    /// Use of a `let`/`const` binding before its declaration
    E2004,

    // Runtime errors (E6xxx)
    /// Reference error
    E6001,
    /// Type error
    E6002,
    /// Range error
    E6003,
    /// Uncaught thrown value
    E6004,
    /// Iteration ceiling exceeded
    E6005,
}

/// Compilation or execution phase an error code belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    Lexical,
    Syntax,
    Binding,
    Runtime,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
        }
    }

    pub fn phase(self) -> Phase {
        match self.as_str().as_bytes()[1] {
            b'0' => Phase::Lexical,
            b'1' => Phase::Syntax,
            b'2' => Phase::Binding,
            _ => Phase::Runtime,
        }
    }

    /// Short description of the error class.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated string literal",
            ErrorCode::E0002 => "unexpected character",
            ErrorCode::E0003 => "invalid number literal",
            ErrorCode::E0004 => "line break in string literal",
            ErrorCode::E0005 => "invalid escape sequence",
            ErrorCode::E0006 => "unterminated template literal",
            ErrorCode::E0007 => "unterminated block comment",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected expression",
            ErrorCode::E1003 => "missing statement terminator",
            ErrorCode::E1004 => "expected identifier",
            ErrorCode::E1005 => "invalid assignment target",
            ErrorCode::E1006 => "missing initializer in const declaration",
            ErrorCode::E1007 => "invalid destructuring pattern",
            ErrorCode::E2001 => "duplicate declaration",
            ErrorCode::E2002 => "reserved word",
            ErrorCode::E2003 => "assignment to constant",
            ErrorCode::E2004 => "used before declaration",
            ErrorCode::E6001 => "reference error",
            ErrorCode::E6002 => "type error",
            ErrorCode::E6003 => "range error",
            ErrorCode::E6004 => "uncaught exception",
            ErrorCode::E6005 => "infinite loop detected",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

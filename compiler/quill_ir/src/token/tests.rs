use super::*;
use pretty_assertions::assert_eq;

#[test]
fn keyword_text_round_trips() {
    for kw in Keyword::ALL {
        assert_eq!(Keyword::from_text(kw.as_str()), Some(*kw));
    }
    assert_eq!(Keyword::from_text("var"), None);
    assert_eq!(Keyword::from_text("of"), None);
}

#[test]
fn operator_lookup() {
    assert_eq!(Op::from_text("?."), Some(Op::OptionalDot));
    assert_eq!(Op::from_text("**="), Some(Op::StarStarAssign));
    assert_eq!(Op::from_text("&"), None);
}

#[test]
fn describe_kinds() {
    assert_eq!(TokenKind::Punct(Punct::LBrace).describe(), "{");
    assert_eq!(TokenKind::Eof.to_string(), "end of input");
    assert_eq!(TokenKind::Keyword(Keyword::Let).to_string(), "let");
}

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use quill_ir::{Op, Punct, TemplatePartKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap_or_else(|e| panic!("lex failed: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn texts(source: &str) -> Vec<String> {
    tokenize(source)
        .unwrap_or_else(|e| panic!("lex failed: {e}"))
        .into_iter()
        .map(|t| t.text)
        .collect()
}

fn error(source: &str) -> LexError {
    match tokenize(source) {
        Ok(tokens) => panic!("expected error, got {tokens:?}"),
        Err(e) => e,
    }
}

#[test]
fn declaration_tokens() {
    assert_eq!(
        kinds("let x = 42;"),
        vec![
            TokenKind::Keyword(Keyword::Let),
            TokenKind::Ident,
            TokenKind::Operator(Op::Assign),
            TokenKind::Number,
            TokenKind::Punct(Punct::Semicolon),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn longest_operator_wins() {
    assert_eq!(
        kinds("a === b !== c ?? d?.e ** f"),
        vec![
            TokenKind::Ident,
            TokenKind::Operator(Op::StrictEq),
            TokenKind::Ident,
            TokenKind::Operator(Op::StrictNotEq),
            TokenKind::Ident,
            TokenKind::Operator(Op::Nullish),
            TokenKind::Ident,
            TokenKind::Operator(Op::OptionalDot),
            TokenKind::Ident,
            TokenKind::Operator(Op::StarStar),
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn number_forms_keep_raw_text() {
    assert_eq!(
        texts("0x1F 010 1.5e3 .25 7. NaN Infinity"),
        vec!["0x1F", "010", "1.5e3", ".25", "7.", "NaN", "Infinity", ""]
    );
    assert!(kinds("NaN Infinity")[..2]
        .iter()
        .all(|k| *k == TokenKind::Number));
}

#[test]
fn exponent_without_digits_ends_the_number() {
    assert_eq!(texts("1em"), vec!["1", "em", ""]);
    assert_eq!(texts("0xg"), vec!["0", "xg", ""]);
}

#[test]
fn strings_are_cooked() {
    let tokens = tokenize(r#"'a\nb' "q\"" 'A\x42' 'tab\t'"#).unwrap_or_default();
    let cooked: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(cooked, vec!["a\nb", "q\"", "AB", "tab\t", ""]);
}

#[test]
fn line_continuation_in_string() {
    assert_eq!(texts("'ab\\\ncd'"), vec!["abcd", ""]);
}

#[test]
fn rest_identifier_is_one_token() {
    let tokens = tokenize("[a, ...rest]").unwrap_or_default();
    assert_eq!(tokens[3].kind, TokenKind::RestIdent);
    assert_eq!(tokens[3].text, "rest");
}

#[test]
fn reserved_words_lex_as_identifiers() {
    assert_eq!(kinds("var class of"), vec![
        TokenKind::Ident,
        TokenKind::Ident,
        TokenKind::Ident,
        TokenKind::Eof
    ]);
}

#[test]
fn positions_track_lines_and_columns() {
    let tokens = tokenize("let a;\n  a = 1;").unwrap_or_default();
    assert_eq!(tokens[0].position, Position::new(0, 1, 1));
    assert_eq!(tokens[3].position, Position::new(9, 2, 3));
    assert!(tokens[3].newline_before);
    assert!(!tokens[4].newline_before);
}

#[test]
fn comments_are_skipped_and_multiline_block_counts_as_newline() {
    let tokens = tokenize("a // one\n/* two\nthree */ b /* x */ c").unwrap_or_default();
    let names: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", ""]);
    assert!(tokens[1].newline_before);
    assert!(!tokens[2].newline_before);
}

#[test]
fn template_parts_alternate_text_and_expressions() {
    let tokens = tokenize("`a ${x + 1} b ${ {k: '}'}.k }`").unwrap_or_default();
    assert_eq!(tokens[0].kind, TokenKind::Template);
    let parts: Vec<(TemplatePartKind, &str)> = tokens[0]
        .parts
        .iter()
        .map(|p| (p.kind, p.text.as_str()))
        .collect();
    assert_eq!(
        parts,
        vec![
            (TemplatePartKind::Text, "a "),
            (TemplatePartKind::Expr, "x + 1"),
            (TemplatePartKind::Text, " b "),
            (TemplatePartKind::Expr, " {k: '}'}.k "),
        ]
    );
    assert_eq!(tokens[0].parts[1].position, Position::new(5, 1, 6));
}

#[test]
fn template_text_escapes_are_deferred() {
    let tokens = tokenize(r"`a\n${b}`").unwrap_or_default();
    assert_eq!(tokens[0].parts[0].text, r"a\n");
}

#[test]
fn nested_template_inside_interpolation() {
    let tokens = tokenize("`x${`y${z}`}w`").unwrap_or_default();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].parts[1].text, "`y${z}`");
    assert_eq!(tokens[0].parts[2].text, "w");
}

#[test]
fn multiline_template_is_allowed() {
    let tokens = tokenize("`line1\nline2` x").unwrap_or_default();
    assert_eq!(tokens[1].position.line, 2);
}

#[test]
fn tokenize_at_offsets_positions() {
    let tokens = tokenize_at("a\nb", Position::new(10, 3, 7)).unwrap_or_default();
    assert_eq!(tokens[0].position, Position::new(10, 3, 7));
    assert_eq!(tokens[1].position, Position::new(12, 4, 1));
}

#[test]
fn unterminated_string_is_fatal() {
    let err = error("let s = 'abc");
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.position, Position::new(8, 1, 9));
}

#[test]
fn raw_newline_in_string_is_fatal() {
    assert_eq!(error("'ab\ncd'").kind, LexErrorKind::NewlineInString);
}

#[test]
fn unterminated_block_comment_is_fatal() {
    let err = error("a /* never closed");
    assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
    assert_eq!(err.position.column, 3);
}

#[test]
fn unterminated_template_is_fatal() {
    assert_eq!(error("`abc ${x").kind, LexErrorKind::UnterminatedTemplate);
    assert_eq!(error("`abc").kind, LexErrorKind::UnterminatedTemplate);
}

#[test]
fn bad_escapes_are_fatal() {
    let err = error(r"'ok \u00zz'");
    assert_eq!(err.kind, LexErrorKind::InvalidEscape);
    assert_eq!(err.position.column, 5);
    assert_eq!(error(r"'\x4'").kind, LexErrorKind::InvalidEscape);
}

#[test]
fn unexpected_character_names_it() {
    let err = error("a # b");
    assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('#'));
    assert_eq!(err.to_string(), "unexpected character '#' at 1:3");
    assert_eq!(err.to_diagnostic().code, ErrorCode::E0002);
}

#[test]
fn unescape_handles_surrogate_pairs_and_braces() {
    assert_eq!(unescape(r"\uD83D\uDE00"), Ok("\u{1F600}".to_string()));
    assert_eq!(unescape(r"\uD83D!"), Ok("\u{FFFD}!".to_string()));
    assert_eq!(unescape(r"\u{1F600}"), Ok("\u{1F600}".to_string()));
    assert_eq!(unescape(r"\q"), Ok("q".to_string()));
    assert_eq!(unescape(r"ab\"), Err(EscapeError { offset: 2 }));
}

proptest! {
    #[test]
    fn tokenize_never_panics(source in "\\PC{0,64}") {
        let _ = tokenize(&source);
    }

    #[test]
    fn identifiers_round_trip(name in "[a-z_][a-z0-9_]{0,12}") {
        let tokens = tokenize(&name).unwrap_or_default();
        prop_assert_eq!(tokens[0].text.as_str(), name.as_str());
    }
}

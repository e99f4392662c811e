use super::*;
use pretty_assertions::assert_eq;

#[test]
fn advance_counts_columns_and_lines() {
    let pos = Position::START.advance("ab\ncd");
    assert_eq!(pos, Position::new(5, 2, 3));
}

#[test]
fn advance_counts_characters_not_bytes_for_columns() {
    let pos = Position::START.advance("é");
    assert_eq!(pos.offset, 2);
    assert_eq!(pos.column, 2);
}

#[test]
fn display_is_line_colon_column() {
    assert_eq!(Position::new(10, 3, 7).to_string(), "3:7");
}

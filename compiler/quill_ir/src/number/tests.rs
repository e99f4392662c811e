use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn tier(n: Number) -> &'static str {
    match n {
        Number::Int(_) => "int",
        Number::Long(_) => "long",
        Number::Double(_) => "double",
    }
}

#[test]
fn parse_blank_is_zero() {
    assert_eq!(tier(Number::parse("")), "int");
    assert_eq!(Number::parse("   "), Number::Int(0));
}

#[test]
fn parse_picks_narrowest_integer_tier() {
    assert_eq!(tier(Number::parse("42")), "int");
    assert_eq!(tier(Number::parse("2147483647")), "int");
    assert_eq!(tier(Number::parse("2147483648")), "long");
    assert_eq!(tier(Number::parse("-7")), "int");
    assert_eq!(Number::parse("-7"), Number::Int(-7));
}

#[test]
fn parse_decimal_and_exponent_are_doubles() {
    assert_eq!(tier(Number::parse("1.0")), "double");
    assert_eq!(tier(Number::parse("1e3")), "double");
    assert_eq!(Number::parse("1e3"), Number::Int(1000));
    assert_eq!(Number::parse(" 2.5 "), Number::Double(2.5));
}

#[test]
fn parse_hex_and_names() {
    assert_eq!(Number::parse("0xff"), Number::Int(255));
    assert!(Number::parse("NaN").is_nan());
    assert_eq!(Number::parse("Infinity").as_f64(), f64::INFINITY);
    assert_eq!(Number::parse("-Infinity").as_f64(), f64::NEG_INFINITY);
}

#[test]
fn parse_garbage_is_nan() {
    assert!(Number::parse("abc").is_nan());
    assert!(Number::parse("12px").is_nan());
    assert!(Number::parse("inf").is_nan());
    assert!(Number::parse("0x").is_nan());
    assert!(Number::parse("1.2.3").is_nan());
}

#[test]
fn literal_forms() {
    assert_eq!(Number::parse_literal("010"), Some(Number::Int(10)));
    assert_eq!(Number::parse_literal("0x1F"), Some(Number::Int(31)));
    assert_eq!(Number::parse_literal("1.5e2"), Some(Number::Double(150.0)));
    assert_eq!(Number::parse_literal(".5"), Some(Number::Double(0.5)));
    assert_eq!(
        Number::parse_literal("9999999999"),
        Some(Number::Long(9_999_999_999))
    );
    assert_eq!(Number::parse_literal("1e"), None);
}

#[test]
fn equality_crosses_tiers() {
    assert_eq!(Number::Int(5), Number::Long(5));
    assert_eq!(Number::Int(5), Number::Double(5.0));
    assert_ne!(Number::NAN, Number::NAN);
    assert_ne!(Number::Long(1), Number::Double(1.5));
}

#[test]
fn display_formats() {
    assert_eq!(Number::Int(-3).to_string(), "-3");
    assert_eq!(Number::Double(5.0).to_string(), "5");
    assert_eq!(Number::Double(2.5).to_string(), "2.5");
    assert_eq!(Number::Double(-0.0).to_string(), "0");
    assert_eq!(Number::NAN.to_string(), "NaN");
    assert_eq!(Number::Double(f64::NEG_INFINITY).to_string(), "-Infinity");
    assert_eq!(Number::Double(1e21).to_string(), "1e+21");
    assert_eq!(Number::Double(1e-7).to_string(), "1e-7");
}

#[test]
fn index_conversion() {
    assert_eq!(Number::Int(3).as_index(), Some(3));
    assert_eq!(Number::Int(-1).as_index(), None);
    assert_eq!(Number::Double(2.0).as_index(), Some(2));
    assert_eq!(Number::Double(2.5).as_index(), None);
}

proptest! {
    #[test]
    fn integers_format_and_parse_back(v in any::<i64>()) {
        let n = Number::from_i64(v);
        prop_assert_eq!(Number::parse(&n.to_string()), n);
    }

    #[test]
    fn finite_doubles_format_and_parse_back(v in -1e300f64..1e300f64) {
        let text = Number::Double(v).to_string();
        prop_assert_eq!(Number::parse(&text).as_f64(), v);
    }
}

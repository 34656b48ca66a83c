use peg_interpret::{Parser, Specification, Value};

#[test]
fn matches_exact_literal() {
    let spec = Specification::parse("main = \"hello\"\n").unwrap();
    let mut parser = Parser::new(&spec);
    assert_eq!(
        parser.parse("hello", "main", true).unwrap(),
        Value::Str("hello".to_string())
    );
}

#[test]
fn fails_on_truncated_input() {
    let spec = Specification::parse("main = \"hello\"\n").unwrap();
    let mut parser = Parser::new(&spec);
    let err = parser.parse("hell", "main", true).unwrap_err();
    assert!(err.to_string().contains("Expected"));
}

#[test]
fn closed_parse_rejects_trailing_input() {
    let spec = Specification::parse("main = \"hello\"\n").unwrap();
    let mut parser = Parser::new(&spec);
    let err = parser.parse("hellos", "main", true).unwrap_err();
    assert!(err.to_string().contains("EOF"));
}

#[test]
fn open_parse_accepts_trailing_input() {
    let spec = Specification::parse("main = \"hello\"\n").unwrap();
    let mut parser = Parser::new(&spec);
    assert!(parser.parse("hellos", "main", false).is_ok());
}

#[test]
fn escape_sequences_are_interpreted() {
    let spec = Specification::parse("main = \"a\\tb\\nc\"\n").unwrap();
    let mut parser = Parser::new(&spec);
    assert_eq!(
        parser.parse("a\tb\nc", "main", true).unwrap(),
        Value::Str("a\tb\nc".to_string())
    );
}

#[test]
fn decimal_x_escape_is_not_hex() {
    // \x65 is decimal 65 -> 'A', not hex 0x65 ('e').
    let spec = Specification::parse("main = \"\\x65\"\n").unwrap();
    let mut parser = Parser::new(&spec);
    assert_eq!(
        parser.parse("A", "main", true).unwrap(),
        Value::Str("A".to_string())
    );
}

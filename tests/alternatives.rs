use peg_interpret::{Parser, Specification, Value};

#[test]
fn second_alternative_matches_when_first_fails() {
    let spec = Specification::parse("main = \"a\" | \"b\"\n").unwrap();
    let mut parser = Parser::new(&spec);
    assert_eq!(
        parser.parse("b", "main", true).unwrap(),
        Value::Str("b".to_string())
    );
}

#[test]
fn all_alternatives_failing_reports_both() {
    let spec = Specification::parse("main = \"a\" | \"b\"\n").unwrap();
    let mut parser = Parser::new(&spec);
    let err = parser.parse("c", "main", true).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains('a'));
    assert!(msg.contains('b'));
}

#[test]
fn ordered_choice_first_match_wins_even_if_shorter() {
    // "cat" wins over "category" on input "category" — PEG has no
    // longest-match rule, the first alternative that matches is final.
    let spec = Specification::parse("word = \"cat\" | \"category\"\n").unwrap();
    let mut parser = Parser::new(&spec);
    assert_eq!(
        parser.parse("category", "word", false).unwrap(),
        Value::Str("cat".to_string())
    );
}

#[test]
fn failed_alternative_does_not_advance_cursor_for_the_next_one() {
    // If backtracking weren't exact, "ab" would fail to match the second
    // alternative because the cursor would still be offset from the first
    // attempt.
    let spec = Specification::parse("main = \"xy\" | \"ab\"\n").unwrap();
    let mut parser = Parser::new(&spec);
    assert_eq!(
        parser.parse("ab", "main", true).unwrap(),
        Value::Str("ab".to_string())
    );
}

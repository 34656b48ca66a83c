use std::sync::Arc;

use peg_interpret::{Parser, ParseFail, Specification, Value};

/// A triggered `ParseFail` from a callback forbids the enclosing rule from
/// trying further alternatives (§7), even though an alternative further
/// down would otherwise match.
#[test]
fn triggered_failure_skips_remaining_alternatives() {
    let spec = Specification::parse("guard = ...\nmain = guard | \"anything\"\n").unwrap();
    let mut parser = Parser::new(&spec);
    parser.context.register_extern(
        "guard",
        Arc::new(|p: &mut Parser, _args: &[Value]| {
            Err(ParseFail::new(p.position(), "definitively rejected").triggered())
        }),
    );
    let err = parser.parse("anything", "main", true).unwrap_err();
    assert!(err.to_string().contains("definitively rejected"));
}

#[test]
fn triggered_failure_still_allows_backtracking_one_level_up() {
    // The trigger is definitive for `guarded`'s own alternatives, but once
    // it surfaces to `main` it is an ordinary failure again, so `main`'s
    // second alternative still gets a chance.
    let spec = Specification::parse(
        "guard = ...\nguarded = guard | \"never\"\nmain = guarded | \"fallback\"\n",
    )
    .unwrap();
    let mut parser = Parser::new(&spec);
    parser.context.register_extern(
        "guard",
        Arc::new(|p: &mut Parser, _args: &[Value]| {
            Err(ParseFail::new(p.position(), "definitively rejected").triggered())
        }),
    );
    assert_eq!(
        parser.parse("fallback", "main", true).unwrap(),
        Value::Str("fallback".to_string())
    );
}

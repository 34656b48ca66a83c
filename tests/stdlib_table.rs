use rstest::rstest;

use peg_interpret::{Parser, Specification};

#[rstest]
#[case::digit("7", true)]
#[case::letter("a", false)]
#[case::space(" ", false)]
fn numeric_builtin_matches_only_digits(#[case] input: &str, #[case] expect_ok: bool) {
    let spec = Specification::parse("digit = ...\nmain = digit\n").unwrap();
    let mut parser = Parser::new(&spec);
    let numeric = parser.context.extern_fn("numeric").unwrap();
    parser.context.register_extern("digit", numeric);
    assert_eq!(parser.parse(input, "main", true).is_ok(), expect_ok);
}

#[rstest]
#[case::lower("a", true)]
#[case::upper("A", false)]
fn lowercase_builtin_matches_only_lowercase(#[case] input: &str, #[case] expect_ok: bool) {
    let spec = Specification::parse("ch = ...\nmain = ch\n").unwrap();
    let mut parser = Parser::new(&spec);
    let lowercase = parser.context.extern_fn("lowercase").unwrap();
    parser.context.register_extern("ch", lowercase);
    assert_eq!(parser.parse(input, "main", true).is_ok(), expect_ok);
}

#[rstest]
#[case::matches("hello", "hello", true)]
#[case::truncated("hello", "hell", false)]
#[case::trailing("hello", "hellos", false)]
fn literal_rule_against_several_inputs(
    #[case] literal: &str,
    #[case] input: &str,
    #[case] expect_ok: bool,
) {
    let spec = Specification::parse(&format!("main = \"{literal}\"\n")).unwrap();
    let mut parser = Parser::new(&spec);
    assert_eq!(parser.parse(input, "main", true).is_ok(), expect_ok);
}

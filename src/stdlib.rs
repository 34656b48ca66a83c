//! Default builtin externs (§4.3): `any`, `lookahead`, `lowercase`,
//! `uppercase`, `numeric`. Installed into every fresh [`crate::engine::Parser`]
//! context; a host program may override or remove any of them before
//! calling `parse`.

use std::sync::Arc;

use crate::context::Context;
use crate::engine::Parser;
use crate::error::ParseFail;
use crate::value::Value;

/// Registers the default builtins into `context`.
pub fn install(context: &mut Context) {
    context.register_extern("any", Arc::new(any));
    context.register_extern("lookahead", Arc::new(lookahead));
    context.register_extern("lowercase", Arc::new(lowercase));
    context.register_extern("uppercase", Arc::new(uppercase));
    context.register_extern("numeric", Arc::new(numeric));
}

fn any(parser: &mut Parser, _args: &[Value]) -> Result<Value, ParseFail> {
    parser.consume_char().map(Value::Char)
}

fn consume_matching(
    parser: &mut Parser,
    label: &str,
    pred: impl Fn(char) -> bool,
) -> Result<Value, ParseFail> {
    let pos = parser.position();
    let c = parser.consume_char()?;
    if pred(c) {
        Ok(Value::Char(c))
    } else {
        Err(ParseFail::new(pos, format!("Expected a {label} character, saw '{c}'")))
    }
}

fn lowercase(parser: &mut Parser, _args: &[Value]) -> Result<Value, ParseFail> {
    consume_matching(parser, "lowercase", |c| c.is_lowercase())
}

fn uppercase(parser: &mut Parser, _args: &[Value]) -> Result<Value, ParseFail> {
    consume_matching(parser, "uppercase", |c| c.is_uppercase())
}

fn numeric(parser: &mut Parser, _args: &[Value]) -> Result<Value, ParseFail> {
    consume_matching(parser, "numeric", |c| c.is_numeric())
}

/// `lookahead(pattern)`: matches the rule named by `pattern` without
/// consuming input (§4.2 "Lookahead"), exposed here as a builtin so
/// grammars can use it as an ordinary reference, e.g. `lookahead<digit>`.
fn lookahead(parser: &mut Parser, args: &[Value]) -> Result<Value, ParseFail> {
    let pos = parser.position();
    let name = args
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| ParseFail::new(pos, "lookahead requires a rule-name argument"))?
        .to_string();
    parser
        .lookahead(&name)
        .map_err(|e| ParseFail::new(pos, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::Specification;

    #[test]
    fn any_consumes_one_character_and_fails_at_eof() {
        let spec = Specification::parse("c = ...\nmain = c c\n").unwrap();
        let mut p = Parser::new(&spec);
        p.context.register_extern("c", Arc::new(any));
        assert_eq!(p.parse("ab", "main", true).unwrap(), Value::Str("ab".to_string()));

        let mut p2 = Parser::new(&spec);
        p2.context.register_extern("c", Arc::new(any));
        assert!(p2.parse("a", "main", true).is_err());
    }

    #[test]
    fn numeric_rejects_non_digit() {
        let spec = Specification::parse("digit = ...\nmain = digit\n").unwrap();
        let mut p = Parser::new(&spec);
        p.context.register_extern("digit", Arc::new(numeric));
        assert!(p.parse("a", "main", true).is_err());
    }

    #[test]
    fn numeric_accepts_digit() {
        let spec = Specification::parse("digit = ...\nmain = digit\n").unwrap();
        let mut p = Parser::new(&spec);
        p.context.register_extern("digit", Arc::new(numeric));
        assert_eq!(p.parse("7", "main", true).unwrap(), Value::Char('7'));
    }

    #[test]
    fn lookahead_builtin_matches_without_consuming() {
        let spec = Specification::parse(
            "lookahead = ...\na_lit = \"a\"\nmain = lookahead<a_lit> \"a\"\n",
        )
        .unwrap();
        let mut p = Parser::new(&spec);
        assert_eq!(p.parse("a", "main", true).unwrap(), Value::Str("a".to_string()));
    }
}

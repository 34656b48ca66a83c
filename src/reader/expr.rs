//! Recursive-descent parser for the rule-expression surface syntax (§4.1):
//! literals, references (with optional template arguments), bindings,
//! actions and alternation.
//!
//! This mirrors `original_source/parser.py`'s single-pass scanner in
//! structure (one state machine, by character class) but is expressed the
//! way the teacher's own hand-written `syn::parse::Parse` implementations
//! are: small recursive functions over a cursor, forking for lookahead
//! instead of a flat index-juggling loop.

use std::sync::Arc;

use crate::ast::{Alternative, BoundElement, Rule, RuleElement};
use crate::cursor::Cursor;
use crate::error::StructuralError;

/// Characters that terminate a bareword reference (§4.1).
const REF_TERMINATORS: &[char] = &['"', '\'', '<', '>', '|', '$', '-'];

fn is_ref_terminator(c: char, extra: &[char]) -> bool {
    c.is_whitespace() || REF_TERMINATORS.contains(&c) || extra.contains(&c)
}

/// Parses a full rule body (everything after `=`) into its alternatives.
/// Rejects an empty/whitespace-only body up front, per §4.1.
pub fn parse_rule_body(body: &str) -> Result<Vec<Alternative>, StructuralError> {
    if body.trim().is_empty() {
        return Err(StructuralError::syntax(
            "rule source can't be empty.\nTip: use '\"\"' instead.",
        ));
    }
    let mut cur = Cursor::new(body);
    let alternatives = read_alternatives(&mut cur, &[])?;
    cur.skip_whitespace();
    if !cur.is_eof() {
        return Err(StructuralError::syntax(format!(
            "unexpected trailing input: {:?}",
            cur.rest()
        )));
    }
    Ok(alternatives)
}

/// Parses a sequence of alternatives until EOF or a character in `stop` is
/// encountered (the caller is responsible for consuming that stop
/// character — used by template-argument parsing, where `,` and `>` bound
/// one argument without being consumed here).
fn read_alternatives(cur: &mut Cursor, stop: &[char]) -> Result<Vec<Alternative>, StructuralError> {
    let mut alternatives = Vec::new();
    let mut seq: Vec<BoundElement> = Vec::new();

    loop {
        cur.skip_whitespace();
        match cur.peek() {
            None => {
                alternatives.push(Alternative {
                    sequence: std::mem::take(&mut seq),
                    action: None,
                });
                break;
            }
            Some(c) if stop.contains(&c) => {
                alternatives.push(Alternative {
                    sequence: std::mem::take(&mut seq),
                    action: None,
                });
                break;
            }
            Some('"') | Some('\'') => {
                let lit = read_literal(cur)?;
                seq.push(BoundElement::unbound(RuleElement::Literal(lit)));
            }
            Some('|') => {
                cur.bump();
                alternatives.push(Alternative {
                    sequence: std::mem::take(&mut seq),
                    action: None,
                });
            }
            Some('$') => {
                cur.bump();
                let name = cur.eat_while(|c| !is_ref_terminator(c, stop)).to_string();
                if name.is_empty() {
                    return Err(StructuralError::syntax("empty identifier after '$'"));
                }
                match seq.last_mut() {
                    Some(elem) => elem.binding = Some(name),
                    None => {
                        return Err(StructuralError::syntax(
                            "'$' binding has no preceding element",
                        ))
                    }
                }
            }
            Some('-') if cur.rest().starts_with("->") => {
                cur.bump();
                cur.bump();
                let action = read_action(cur)?;
                alternatives.push(Alternative {
                    sequence: std::mem::take(&mut seq),
                    action: Some(action),
                });
                cur.skip_whitespace();
                match cur.peek() {
                    None => break,
                    Some(c) if stop.contains(&c) => break,
                    Some('|') => {
                        cur.bump();
                    }
                    Some(other) => {
                        return Err(StructuralError::syntax(format!(
                            "expected '|' or end of rule after action, found '{other}'"
                        )))
                    }
                }
            }
            Some('<') => {
                return Err(StructuralError::syntax("unexpected '<'"));
            }
            Some(_) => {
                let elem = read_reference(cur, stop)?;
                seq.push(BoundElement::unbound(elem));
            }
        }
    }

    Ok(alternatives)
}

fn read_literal(cur: &mut Cursor) -> Result<String, StructuralError> {
    let quote = cur.bump().expect("caller already peeked a quote");
    let mut value = String::new();
    loop {
        match cur.bump() {
            None => return Err(StructuralError::syntax("unexpected EOF in string literal")),
            Some(c) if c == quote => break,
            Some('\\') => {
                let escaped = cur
                    .bump()
                    .ok_or_else(|| StructuralError::syntax("unexpected EOF in string literal"))?;
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    '\\' => value.push('\\'),
                    '"' => value.push('"'),
                    '\'' => value.push('\''),
                    'x' => {
                        let mut digits = String::new();
                        for _ in 0..2 {
                            let d = cur.bump().ok_or_else(|| {
                                StructuralError::syntax("unexpected EOF in \\x escape")
                            })?;
                            digits.push(d);
                        }
                        let code: u32 = digits
                            .parse()
                            .map_err(|_| StructuralError::syntax("invalid \\x escape"))?;
                        let ch = char::from_u32(code)
                            .ok_or_else(|| StructuralError::syntax("invalid \\x codepoint"))?;
                        value.push(ch);
                    }
                    _ => return Err(StructuralError::syntax("unknown escape sequence")),
                }
            }
            Some(c) => value.push(c),
        }
    }
    Ok(value)
}

fn read_reference(cur: &mut Cursor, stop: &[char]) -> Result<RuleElement, StructuralError> {
    let name = cur.eat_while(|c| !is_ref_terminator(c, stop)).to_string();
    if name.is_empty() {
        return Err(StructuralError::syntax(format!(
            "unexpected character '{}'",
            cur.peek().unwrap_or('\0')
        )));
    }
    let mut args = Vec::new();
    if cur.peek() == Some('<') {
        cur.bump();
        loop {
            let arg_alts = read_alternatives(cur, &[',', '>'])?;
            if is_empty_argument(&arg_alts) {
                return Err(StructuralError::syntax("too many commas"));
            }
            args.push(Arc::new(Rule::new_alternatives(None, Vec::new(), arg_alts)));
            match cur.bump() {
                Some(',') => continue,
                Some('>') => break,
                _ => return Err(StructuralError::syntax("unexpected EOF in template arguments")),
            }
        }
    }
    Ok(RuleElement::Ref { name, args })
}

fn is_empty_argument(alts: &[Alternative]) -> bool {
    alts.len() == 1 && alts[0].sequence.is_empty() && alts[0].action.is_none()
}

/// Scans a brace-balanced, string-literal-aware action body: `{ ... }`.
/// `cur` must be positioned right after `->`.
fn read_action(cur: &mut Cursor) -> Result<String, StructuralError> {
    cur.skip_whitespace();
    if !cur.eat_char('{') {
        return Err(StructuralError::syntax("expected '{' to start action"));
    }
    let start = cur.pos;
    let mut depth: u32 = 1;
    loop {
        match cur.peek() {
            None => return Err(StructuralError::syntax("unexpected EOF in action")),
            Some('{') => {
                cur.bump();
                depth += 1;
            }
            Some('}') => {
                cur.bump();
                depth -= 1;
                if depth == 0 {
                    let text = cur.slice_from(start);
                    // Drop the closing brace we just consumed.
                    let text = &text[..text.len() - 1];
                    return Ok(text.trim().to_string());
                }
            }
            Some(q @ ('"' | '\'')) => {
                cur.bump();
                loop {
                    match cur.bump() {
                        None => return Err(StructuralError::syntax("unexpected EOF in action")),
                        Some('\\') => {
                            if cur.bump().is_none() {
                                return Err(StructuralError::syntax("unexpected EOF in action"));
                            }
                        }
                        Some(c) if c == q => break,
                        Some(_) => {}
                    }
                }
            }
            Some(_) => {
                cur.bump();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_literal() {
        let alts = parse_rule_body("\"hello\"").unwrap();
        assert_eq!(alts.len(), 1);
        assert_eq!(alts[0].sequence.len(), 1);
        match &alts[0].sequence[0].element {
            RuleElement::Literal(s) => assert_eq!(s, "hello"),
            _ => panic!("expected literal"),
        }
    }

    #[test]
    fn parses_alternation() {
        let alts = parse_rule_body("\"a\" | \"b\"").unwrap();
        assert_eq!(alts.len(), 2);
    }

    #[test]
    fn parses_binding_and_action() {
        let alts = parse_rule_body("n$name -> { \"Hello, \" + name }").unwrap();
        assert_eq!(alts.len(), 1);
        assert_eq!(alts[0].sequence[0].binding.as_deref(), Some("name"));
        assert_eq!(alts[0].action.as_deref(), Some("\"Hello, \" + name"));
    }

    #[test]
    fn parses_template_arguments_with_choice() {
        let alts = parse_rule_body("pair<\"ab\" | \"cd\">").unwrap();
        match &alts[0].sequence[0].element {
            RuleElement::Ref { name, args } => {
                assert_eq!(name, "pair");
                assert_eq!(args.len(), 1);
            }
            _ => panic!("expected ref"),
        }
    }

    #[test]
    fn rejects_empty_body() {
        assert!(parse_rule_body("   ").is_err());
    }

    #[test]
    fn rejects_leading_angle_bracket() {
        assert!(parse_rule_body("<x>").is_err());
    }

    #[test]
    fn rejects_unknown_escape() {
        assert!(parse_rule_body("\"\\q\"").is_err());
    }

    #[test]
    fn rejects_unterminated_literal() {
        assert!(parse_rule_body("\"abc").is_err());
    }

    #[test]
    fn decimal_hex_like_escape_is_decimal() {
        // \x65 -> decimal 65 -> 'A', not hex 0x65.
        let alts = parse_rule_body("\"\\x65\"").unwrap();
        match &alts[0].sequence[0].element {
            RuleElement::Literal(s) => assert_eq!(s, "A"),
            _ => panic!("expected literal"),
        }
    }

    #[test]
    fn action_as_last_token_terminates_at_eof() {
        let alts = parse_rule_body("\"a\" -> { 1 }").unwrap();
        assert_eq!(alts.len(), 1);
        assert_eq!(alts[0].action.as_deref(), Some("1"));
    }
}

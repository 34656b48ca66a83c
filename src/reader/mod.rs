//! The grammar reader: turns specification source text into a map of
//! `name -> Rule`. Handles the specification-file format (comments,
//! continuation, blank-line separation, `include` overlay, §6) and, per
//! logical line, the rule-definition grammar (§4.1).

mod expr;

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::{Param, Rule};
use crate::cursor::Cursor;
use crate::error::StructuralError;
use crate::loader::SpecLoader;

/// Parses a specification with no `include` support; an `include` line is
/// a structural error.
pub fn read_document(text: &str, base: Option<&str>) -> Result<HashMap<String, Arc<Rule>>, StructuralError> {
    let mut rules = HashMap::new();
    for logical_line in split_logical_lines(text) {
        if let Some(name) = logical_line.strip_prefix("include ") {
            let _ = base;
            return Err(StructuralError::syntax(format!(
                "'include {}' requires a loader (use Specification::parse_with_loader)",
                name.trim()
            )));
        }
        let (name, rule) = parse_rule_line(&logical_line)?;
        rules.insert(name, rule);
    }
    Ok(rules)
}

/// Parses a specification rooted at `base`, resolving `include` lines via
/// `loader`. Included rule maps are overlaid in encounter order so that a
/// later definition (either from a later include, or from `text` itself)
/// always wins.
pub fn read_document_with_includes(
    text: &str,
    base: &str,
    loader: &dyn SpecLoader,
) -> Result<HashMap<String, Arc<Rule>>, StructuralError> {
    let mut rules = HashMap::new();
    for logical_line in split_logical_lines(text) {
        if let Some(include_name) = logical_line.strip_prefix("include ") {
            let include_name = include_name.trim();
            let (included_base, included_text) = loader.load_sibling(base, include_name)?;
            let included_rules =
                read_document_with_includes(&included_text, &included_base, loader)?;
            rules.extend(included_rules);
            continue;
        }
        let (name, rule) = parse_rule_line(&logical_line)?;
        rules.insert(name, rule);
    }
    Ok(rules)
}

/// Splits `text` into logical lines: comment lines (`#` at column 0) are
/// dropped, blank lines separate logical lines, and any line whose first
/// character is whitespace continues the previous logical line (§6).
fn split_logical_lines(text: &str) -> Vec<String> {
    let mut logical_lines = Vec::new();
    let mut current: Option<String> = None;

    let flush = |current: &mut Option<String>, out: &mut Vec<String>| {
        if let Some(line) = current.take() {
            if !line.trim().is_empty() {
                out.push(line);
            }
        }
    };

    for raw_line in text.lines() {
        if raw_line.is_empty() {
            flush(&mut current, &mut logical_lines);
            continue;
        }
        if raw_line.starts_with('#') {
            continue;
        }
        let starts_with_whitespace = raw_line
            .chars()
            .next()
            .map(|c| c.is_whitespace())
            .unwrap_or(false);
        if starts_with_whitespace {
            match &mut current {
                Some(line) => {
                    line.push(' ');
                    line.push_str(raw_line.trim_start());
                }
                None => {
                    // A continuation with nothing to continue: treat as its
                    // own logical line rather than silently dropping it.
                    current = Some(raw_line.trim_start().to_string());
                }
            }
        } else {
            flush(&mut current, &mut logical_lines);
            current = Some(raw_line.to_string());
        }
    }
    flush(&mut current, &mut logical_lines);
    logical_lines
}

/// Parses one logical line: `name ["<" param ("," param)* ">"] "=" body`.
fn parse_rule_line(line: &str) -> Result<(String, Arc<Rule>), StructuralError> {
    let mut cur = Cursor::new(line);
    cur.skip_whitespace();
    let name = cur
        .eat_while(|c| !c.is_whitespace() && c != '<' && c != '=')
        .to_string();
    if name.is_empty() {
        return Err(StructuralError::syntax(format!(
            "formal error: expected a rule name in '{line}'"
        )));
    }
    cur.skip_whitespace();

    let mut params = Vec::new();
    if cur.peek() == Some('<') {
        cur.bump();
        loop {
            cur.skip_whitespace();
            let pname = cur.eat_while(|c| c.is_alphanumeric() || c == '_').to_string();
            if pname.is_empty() {
                return Err(StructuralError::syntax(format!(
                    "formal error: expected a parameter name in '{line}'"
                )));
            }
            cur.skip_whitespace();
            let default = if cur.peek() == Some('=') {
                cur.bump();
                cur.skip_whitespace();
                let default_name = cur.eat_while(|c| c.is_alphanumeric() || c == '_').to_string();
                if default_name.is_empty() {
                    return Err(StructuralError::syntax(format!(
                        "formal error: expected a default rule name in '{line}'"
                    )));
                }
                Some(default_name)
            } else {
                None
            };
            params.push(Param {
                name: pname,
                default,
            });
            cur.skip_whitespace();
            match cur.bump() {
                Some(',') => continue,
                Some('>') => break,
                _ => {
                    return Err(StructuralError::syntax(format!(
                        "formal error: expected ',' or '>' in parameter list of '{line}'"
                    )))
                }
            }
        }
        cur.skip_whitespace();
    }

    if !cur.eat_char('=') {
        return Err(StructuralError::syntax(format!(
            "formal error: expected '=' in '{line}'"
        )));
    }

    let body = cur.rest();
    if body.trim() == "..." {
        if !params.is_empty() {
            return Err(StructuralError::syntax(format!(
                "extern rule '{name}' cannot declare parameters"
            )));
        }
        return Ok((name.clone(), Arc::new(Rule::new_extern(name))));
    }

    let alternatives = expr::parse_rule_body(body)?;
    Ok((
        name.clone(),
        Arc::new(Rule::new_alternatives(Some(name), params, alternatives)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_continuation_lines() {
        let text = "main = \"a\"\n  | \"b\"\n";
        let lines = split_logical_lines(text);
        assert_eq!(lines, vec!["main = \"a\" | \"b\""]);
    }

    #[test]
    fn ignores_comments_and_blank_lines() {
        let text = "# a comment\n\nmain = \"a\"\n\n# trailing\n";
        let lines = split_logical_lines(text);
        assert_eq!(lines, vec!["main = \"a\""]);
    }

    #[test]
    fn parses_extern_rule() {
        let rules = read_document("digit = ...\n", None).unwrap();
        assert!(rules.get("digit").unwrap().is_extern());
    }

    #[test]
    fn parses_parameterised_rule_with_default() {
        let rules = read_document("greet<x = alice> = x\n", None).unwrap();
        let rule = rules.get("greet").unwrap();
        assert_eq!(rule.params.len(), 1);
        assert_eq!(rule.params[0].default.as_deref(), Some("alice"));
    }

    #[test]
    fn rejects_bare_include_without_loader() {
        assert!(read_document("include other\n", None).is_err());
    }
}

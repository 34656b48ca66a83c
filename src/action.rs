//! The action bridge: evaluates action expressions in the merged scope of
//! bindings and context (§4.4).
//!
//! The embedding of the host language's expression evaluator is, per §1,
//! an external collaborator — THE CORE only requires the contract
//! (`ActionEvaluator`). `ExprEvaluator` is this crate's default,
//! self-contained realisation: a tiny expression sub-language (string/int/
//! bool literals, bareword lookups, `+` concatenation, and `name(args...)`
//! calls into context externs), built with `winnow` the way the teacher's
//! own generated parsers are.

use std::sync::Arc;

use winnow::ascii::{dec_int, multispace0};
use winnow::combinator::{alt, delimited, opt, preceded, repeat, separated};
use winnow::prelude::*;
use winnow::token::{literal, none_of, one_of};

use crate::context::Scope;
use crate::error::{EngineError, StructuralError};
use crate::value::Value;

/// The contract an action expression is evaluated under: `context ⊕
/// bindings`, returning the alternative's result.
pub trait ActionEvaluator: Send + Sync {
    fn eval(
        &self,
        parser: &mut crate::engine::Parser,
        source: &str,
        scope: &Scope,
    ) -> Result<Value, EngineError>;
}

#[derive(Debug, Clone)]
enum Expr {
    Str(String),
    Int(i64),
    Bool(bool),
    Ident(String),
    Call(String, Vec<Expr>),
    Concat(Box<Expr>, Box<Expr>),
}

/// The default action-expression evaluator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExprEvaluator;

impl ActionEvaluator for ExprEvaluator {
    fn eval(
        &self,
        parser: &mut crate::engine::Parser,
        source: &str,
        scope: &Scope,
    ) -> Result<Value, EngineError> {
        let mut input = source;
        let expr = parse_expr
            .parse_next(&mut input)
            .map_err(|e| StructuralError::syntax(format!("invalid action expression: {e}")))?;
        skip_ws(&mut input);
        if !input.is_empty() {
            return Err(StructuralError::syntax(format!(
                "unexpected trailing text in action: {input:?}"
            ))
            .into());
        }
        eval_expr(parser, &expr, scope)
    }
}

fn skip_ws(input: &mut &str) {
    let _ = multispace0::<_, winnow::error::ContextError>.parse_next(input);
}

fn eval_expr(
    parser: &mut crate::engine::Parser,
    expr: &Expr,
    scope: &Scope,
) -> Result<Value, EngineError> {
    match expr {
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Int(i) => Ok(Value::Int(*i)),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Ident(name) => scope
            .lookup(name)
            .cloned()
            .ok_or_else(|| StructuralError::name(format!("'{name}' is not bound")).into()),
        Expr::Call(name, arg_exprs) => {
            let f = scope
                .context
                .extern_fn(name)
                .ok_or_else(|| StructuralError::name(format!("'{name}' is not callable")))?;
            let mut args = Vec::with_capacity(arg_exprs.len());
            for a in arg_exprs {
                args.push(eval_expr(parser, a, scope)?);
            }
            Ok(f(parser, &args)?)
        }
        Expr::Concat(lhs, rhs) => {
            let l = eval_expr(parser, lhs, scope)?;
            let r = eval_expr(parser, rhs, scope)?;
            l.concat(&r).ok_or_else(|| {
                StructuralError::type_err(format!("cannot concatenate {l:?} and {r:?}")).into()
            })
        }
    }
}

fn parse_expr(input: &mut &str) -> PResult<Expr> {
    let first = parse_term(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((multispace0, literal("+"), multispace0), parse_term)).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, next| Expr::Concat(Box::new(acc), Box::new(next))))
}

fn parse_term(input: &mut &str) -> PResult<Expr> {
    preceded(
        multispace0,
        alt((parse_string, parse_bool, parse_int, parse_call_or_ident, parse_paren)),
    )
    .parse_next(input)
}

fn parse_paren(input: &mut &str) -> PResult<Expr> {
    delimited((literal("("), multispace0), parse_expr, (multispace0, literal(")"))).parse_next(input)
}

fn parse_bool(input: &mut &str) -> PResult<Expr> {
    alt((
        literal("true").value(Expr::Bool(true)),
        literal("false").value(Expr::Bool(false)),
    ))
    .parse_next(input)
}

fn parse_int(input: &mut &str) -> PResult<Expr> {
    let n: i64 = dec_int.parse_next(input)?;
    Ok(Expr::Int(n))
}

fn parse_ident_text(input: &mut &str) -> PResult<String> {
    winnow::token::take_while(1.., |c: char| c.is_alphanumeric() || c == '_')
        .parse_next(input)
        .map(|s: &str| s.to_string())
}

fn parse_call_or_ident(input: &mut &str) -> PResult<Expr> {
    let name = parse_ident_text(input)?;
    let args = opt(delimited(
        (multispace0, literal("(")),
        separated(0.., preceded(multispace0, parse_expr), (multispace0, literal(","))),
        (multispace0, literal(")")),
    ))
    .parse_next(input)?;
    Ok(match args {
        Some(args) => Expr::Call(name, args),
        None => Expr::Ident(name),
    })
}

fn dquoted_raw(input: &mut &str) -> PResult<&str> {
    delimited(
        literal('"'),
        repeat(0.., alt((none_of(['\\', '"']), escaped_char('"'))))
            .map(|_: Vec<char>| ())
            .take(),
        literal('"'),
    )
    .parse_next(input)
}

fn squoted_raw(input: &mut &str) -> PResult<&str> {
    delimited(
        literal('\''),
        repeat(0.., alt((none_of(['\\', '\'']), escaped_char('\''))))
            .map(|_: Vec<char>| ())
            .take(),
        literal('\''),
    )
    .parse_next(input)
}

/// Consumes a backslash-escape sequence and yields the escaped character
/// itself (the raw slice, escapes untouched, is what we ultimately keep —
/// `unescape` below does the real interpretation over that slice).
fn escaped_char(quote: char) -> impl FnMut(&mut &str) -> PResult<char> {
    move |input: &mut &str| {
        preceded(literal('\\'), one_of(['\\', 'n', 't', quote])).parse_next(input)
    }
}

fn parse_string(input: &mut &str) -> PResult<Expr> {
    alt((dquoted_raw, squoted_raw))
        .map(|raw| Expr::Str(unescape(raw)))
        .parse_next(input)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Arc-friendly handle to an [`ActionEvaluator`] a `Parser` holds.
pub type BoxedEvaluator = Arc<dyn ActionEvaluator>;

//! The parse engine: an ordered-choice, backtracking matcher over a cursor
//! into the input string (§4.2).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::action::{ActionEvaluator, ExprEvaluator};
use crate::ast::{Alternative, Rule, RuleBody, RuleElement};
use crate::context::{Context, Scope};
use crate::error::{EngineError, ParseFail, StructuralError};
use crate::namespace::{build_namespace, Binding, Namespace};
use crate::specification::Specification;
use crate::stdlib;
use crate::value::Value;

/// Parser state, living for the duration of one top-level [`Parser::parse`]
/// call (§3 "Parser state"). `context` is writable before `parse` is
/// invoked; it is the host-provided free-variable map seen by actions and
/// Extern callbacks.
pub struct Parser<'s> {
    spec: &'s Specification,
    input: String,
    cursor: usize,
    pub context: Context,
    evaluator: Arc<dyn ActionEvaluator>,
}

impl<'s> Parser<'s> {
    /// A parser against `spec`, with the default stdlib builtins installed
    /// into its context and the default expression evaluator as its
    /// action evaluator.
    pub fn new(spec: &'s Specification) -> Self {
        let mut context = Context::new();
        stdlib::install(&mut context);
        Parser {
            spec,
            input: String::new(),
            cursor: 0,
            context,
            evaluator: Arc::new(ExprEvaluator),
        }
    }

    /// Swaps in a different action evaluator (the host-language expression
    /// evaluator is an external collaborator per §1; this crate's default
    /// is [`ExprEvaluator`]).
    pub fn with_evaluator(mut self, evaluator: Arc<dyn ActionEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Entry point (§4.2): parses `input` against `start_rule`. When
    /// `closed`, the entire input must be consumed or the parse fails with
    /// "Expected EOF".
    pub fn parse(
        &mut self,
        input: &str,
        start_rule: &str,
        closed: bool,
    ) -> Result<Value, EngineError> {
        self.input = input.to_string();
        self.cursor = 0;

        let rule = self.spec.get(start_rule).ok_or_else(|| {
            StructuralError::name(format!("rule '{start_rule}' is not defined"))
        })?;

        let value = self.match_rule(&rule, &[], None).map_err(|e| match e {
            EngineError::Fail(f) => EngineError::Fail(f.untrigger()),
            structural => structural,
        })?;

        if closed && self.cursor != self.input.chars().count() {
            return Err(ParseFail::new(
                self.cursor,
                format!(
                    "Expected EOF, found {:?}",
                    self.rest_preview()
                ),
            )
            .into());
        }
        Ok(value)
    }

    /// Exposed to callbacks: matches `rule_name` with the cursor restored
    /// afterward regardless of outcome (§4.2 "Lookahead").
    pub fn lookahead(&mut self, rule_name: &str) -> Result<Value, EngineError> {
        let rule = self.spec.get(rule_name).ok_or_else(|| {
            StructuralError::name(format!("rule '{rule_name}' is not defined"))
        })?;
        let saved = self.cursor;
        let result = self.match_rule(&rule, &[], None);
        self.cursor = saved;
        result
    }

    /// Exposed to callbacks: consumes and returns one character; fails on
    /// EOF without advancing (§4.2 "Character consumption").
    pub fn consume_char(&mut self) -> Result<char, ParseFail> {
        match self.peek_char() {
            Some(c) => {
                self.cursor += 1;
                Ok(c)
            }
            None => Err(ParseFail::new(self.cursor, "Unexpected EOF")),
        }
    }

    /// Exposed to callbacks: consumes the literal string `s` or fails
    /// without advancing.
    pub fn consume_string(&mut self, s: &str) -> Result<String, ParseFail> {
        self.match_literal(s)?;
        Ok(s.to_string())
    }

    /// Exposed to callbacks: dispatches to another Extern rule's callback
    /// directly (§6 `consume_pattern`).
    pub fn consume_pattern(&mut self, name: &str, args: &[Value]) -> Result<Value, EngineError> {
        let f = self
            .context
            .extern_fn(name)
            .ok_or_else(|| StructuralError::name(format!("'{name}' is not a registered extern")))?;
        Ok(f(self, args)?)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.byte_offset(self.cursor)..].chars().next()
    }

    /// Converts a character-index cursor position to a byte offset. The
    /// engine counts positions in characters (§3), so non-ASCII input is
    /// walked once per lookup; inputs in this interpreter's domain
    /// (grammar-driven text parsing) are not expected to be large enough
    /// for this to matter.
    fn byte_offset(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map(|(b, _)| b)
            .unwrap_or(self.input.len())
    }

    fn rest_preview(&self) -> String {
        let start = self.byte_offset(self.cursor);
        let rest = &self.input[start..];
        rest.chars().take(20).collect()
    }

    fn match_literal(&mut self, s: &str) -> Result<String, ParseFail> {
        let start = self.cursor;
        let start_byte = self.byte_offset(start);
        let len = s.chars().count();
        let end_byte = self.byte_offset(start + len);
        if self.input.len() >= end_byte && &self.input[start_byte..end_byte] == s {
            self.cursor = start + len;
            Ok(s.to_string())
        } else {
            Err(ParseFail::new(
                start,
                format!("Expected {s:?}, saw {:?}", self.rest_preview()),
            ))
        }
    }

    /// `match(rule, args, augmented_namespace)` (§4.2). Structural errors
    /// (unresolved names, arity/type mismatches, missing callbacks) are
    /// never represented as `ParseFail`s: they propagate as
    /// `EngineError::Structural` straight through every frame below, so
    /// they abort the parse instead of becoming eligible for backtracking
    /// (§7). Only a callback-raised, `triggered` `ParseFail` gets the
    /// catch-and-untrigger-one-frame-up treatment, in `match_alternatives`.
    fn match_rule(
        &mut self,
        rule: &Arc<Rule>,
        args: &[Arc<Rule>],
        namespace: Option<Arc<Namespace>>,
    ) -> Result<Value, EngineError> {
        match &rule.body {
            RuleBody::Extern => self.match_extern(rule, args),
            RuleBody::Alternatives(alternatives) => {
                let namespace = self.resolve_namespace(rule, args, namespace)?;
                self.match_alternatives(rule, alternatives, namespace)
            }
        }
    }

    /// Builds the augmented namespace whenever `rule` declares any
    /// parameters, even for a zero-argument call site — `build_namespace`
    /// fills missing trailing arguments from each parameter's declared
    /// default, so a rule whose parameters are all defaulted must still go
    /// through it rather than short-circuiting on an empty `args` slice.
    fn resolve_namespace(
        &self,
        rule: &Rule,
        args: &[Arc<Rule>],
        inherited: Option<Arc<Namespace>>,
    ) -> Result<Option<Arc<Namespace>>, EngineError> {
        if rule.params.is_empty() {
            return Ok(inherited);
        }
        let built = build_namespace(self.spec, rule, args, inherited.as_ref())?;
        Ok(Some(Arc::new(built)))
    }

    /// `args` here are the Ref site's template arguments. Extern rules
    /// declare no formal parameters (the reader rejects `= ...` rules with
    /// params), so each argument must itself be a bare rule reference
    /// (e.g. `lookahead<digit>`) — its name is forwarded to the callback
    /// as a `Value::Str`, letting builtins like `lookahead` know which
    /// rule to apply without the engine actually matching it first.
    fn match_extern(&mut self, rule: &Rule, args: &[Arc<Rule>]) -> Result<Value, EngineError> {
        let name = rule
            .name
            .as_deref()
            .expect("Extern rules are always named");
        let f = self.context.extern_fn(name).ok_or_else(|| {
            StructuralError::name(format!("extern rule '{name}' has no registered callback"))
        })?;
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let arg_name = arg.bare_ref_name().ok_or_else(|| {
                StructuralError::type_err(format!(
                    "extern rule '{name}' only accepts bare rule-name arguments"
                ))
            })?;
            values.push(Value::Str(arg_name.to_string()));
        }
        f(self, &values).map_err(EngineError::from)
    }

    fn match_alternatives(
        &mut self,
        rule: &Rule,
        alternatives: &[Alternative],
        namespace: Option<Arc<Namespace>>,
    ) -> Result<Value, EngineError> {
        let start = self.cursor;
        let mut failures = Vec::new();

        for alt in alternatives {
            self.cursor = start;
            match self.match_alternative(alt, namespace.as_ref()) {
                Ok(value) => {
                    trace!(rule = rule.name.as_deref().unwrap_or("<anon>"), "matched");
                    return Ok(value);
                }
                Err(EngineError::Structural(e)) => {
                    self.cursor = start;
                    return Err(EngineError::Structural(e));
                }
                Err(EngineError::Fail(fail)) if fail.triggered => {
                    self.cursor = start;
                    return Err(fail.untrigger().into());
                }
                Err(EngineError::Fail(fail)) => {
                    self.cursor = start;
                    failures.push(fail);
                }
            }
        }

        debug!(
            rule = rule.name.as_deref().unwrap_or("<anon>"),
            alternatives = alternatives.len(),
            "all alternatives failed"
        );
        Err(ParseFail::combine(start, failures).into())
    }

    fn match_alternative(
        &mut self,
        alt: &Alternative,
        namespace: Option<&Arc<Namespace>>,
    ) -> Result<Value, EngineError> {
        let start = self.cursor;
        let mut bindings: HashMap<String, Value> = HashMap::new();
        let mut last = Value::Unit;

        for element in &alt.sequence {
            let value = self.match_element(&element.element, namespace)?;
            if let Some(name) = &element.binding {
                bindings.insert(name.clone(), value.clone());
            }
            last = value;
        }

        if let Some(action) = &alt.action {
            // The scope borrows a snapshot of the context rather than
            // `self.context` directly: the evaluator needs `&mut self` to
            // recurse into extern calls, which an active borrow of
            // `self.context` would forbid.
            let context_snapshot = self.context.clone();
            let scope = Scope {
                context: &context_snapshot,
                bindings: &bindings,
            };
            let evaluator = self.evaluator.clone();
            return evaluator.eval(self, action, &scope);
        }

        if alt.sequence.len() == 1 {
            Ok(last)
        } else {
            let matched = self.slice_chars(start, self.cursor);
            Ok(Value::Str(matched))
        }
    }

    fn slice_chars(&self, start: usize, end: usize) -> String {
        let start_byte = self.byte_offset(start);
        let end_byte = self.byte_offset(end);
        self.input[start_byte..end_byte].to_string()
    }

    fn match_element(
        &mut self,
        element: &RuleElement,
        namespace: Option<&Arc<Namespace>>,
    ) -> Result<Value, EngineError> {
        match element {
            RuleElement::Literal(s) => self
                .match_literal(s)
                .map(Value::Str)
                .map_err(EngineError::from),
            RuleElement::Inline(rule) => self.match_rule(rule, &[], namespace.cloned()),
            RuleElement::Ref { name, args } => {
                if let Some(Binding { rule, captured }) =
                    namespace.and_then(|ns| ns.get(name.as_str()))
                {
                    let rule = rule.clone();
                    let captured = captured.clone();
                    self.match_rule(&rule, &[], captured)
                } else {
                    let rule = self.spec.get(name).ok_or_else(|| {
                        StructuralError::name(format!("rule '{name}' is not defined"))
                    })?;
                    // `args` are captured together with the namespace active
                    // at this call site (see `namespace::build_namespace`),
                    // so free parameter references nested inside an argument
                    // resolve lexically rather than against the callee.
                    let call_ns = namespace.cloned();
                    self.match_rule(&rule, args, call_ns)
                }
            }
        }
    }
}

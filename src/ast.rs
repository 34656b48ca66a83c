//! The Rule AST: tagged variants representing rule elements and whole rules.
//!
//! Rules reference each other by name (late binding through the
//! `Specification`) or occasionally by value (as parameter arguments). The
//! graph may be cyclic; cross-references are string keys, never owning
//! pointers, so no cycle needs breaking at construction (see design notes,
//! "Rule graph sharing").

use std::sync::Arc;

/// A primitive that can be matched at a position, optionally bound to a name.
#[derive(Debug, Clone)]
pub struct BoundElement {
    pub element: RuleElement,
    pub binding: Option<String>,
}

impl BoundElement {
    pub fn unbound(element: RuleElement) -> Self {
        BoundElement {
            element,
            binding: None,
        }
    }
}

/// A primitive that can be matched at a position.
#[derive(Debug, Clone)]
pub enum RuleElement {
    /// Matches the exact string `s`.
    Literal(String),
    /// Matches the rule `name`, passing argument rules `args`.
    Ref { name: String, args: Vec<Arc<Rule>> },
    /// An anonymous rule substituted in place of a `Ref` once it has
    /// resolved against a parameter namespace rather than the
    /// `Specification`. Never produced by the grammar reader directly —
    /// constructed transiently by the engine (see `SPEC_FULL.md` §3).
    Inline(Arc<Rule>),
}

/// One ordered sequence of elements, optionally followed by an action.
#[derive(Debug, Clone)]
pub struct Alternative {
    pub sequence: Vec<BoundElement>,
    /// Raw action source text (host expression language), brace-balanced
    /// extraction only — opaque to the grammar layer.
    pub action: Option<String>,
}

/// A rule parameter: a name and an optional default (the name of another
/// rule, resolved lazily against the `Specification` at call entry).
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub default: Option<String>,
}

/// A named (or anonymous) grammar production.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub body: RuleBody,
}

#[derive(Debug, Clone)]
pub enum RuleBody {
    /// A non-empty ordered list of alternatives.
    Alternatives(Vec<Alternative>),
    /// Body was exactly `...`: delegates to a host callback keyed by the
    /// rule's own name.
    Extern,
}

impl Rule {
    pub fn new_alternatives(
        name: Option<String>,
        params: Vec<Param>,
        alternatives: Vec<Alternative>,
    ) -> Self {
        Rule {
            name,
            params,
            body: RuleBody::Alternatives(alternatives),
        }
    }

    pub fn new_extern(name: String) -> Self {
        Rule {
            name: Some(name),
            params: Vec::new(),
            body: RuleBody::Extern,
        }
    }

    pub fn is_extern(&self) -> bool {
        matches!(self.body, RuleBody::Extern)
    }

    /// If this rule is nothing but a single bare reference (no args, no
    /// binding, no action) — the shape a template argument like `digit` in
    /// `lookahead<digit>` takes — returns the referenced name. Used to let
    /// externs such as the `lookahead` builtin take a rule name as an
    /// argument despite Extern rules declaring no formal parameters.
    pub fn bare_ref_name(&self) -> Option<&str> {
        let RuleBody::Alternatives(alts) = &self.body else {
            return None;
        };
        let [alt] = alts.as_slice() else {
            return None;
        };
        if alt.action.is_some() {
            return None;
        }
        let [elem] = alt.sequence.as_slice() else {
            return None;
        };
        if elem.binding.is_some() {
            return None;
        }
        match &elem.element {
            RuleElement::Ref { name, args } if args.is_empty() => Some(name.as_str()),
            _ => None,
        }
    }
}

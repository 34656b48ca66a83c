//! The host context: free variables visible to action expressions, and the
//! callable externs backing `Extern` rules and the stdlib builtins.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ParseFail;
use crate::value::Value;

/// A host callback. Trusted to advance the parser's cursor itself and to
/// raise `ParseFail` for ordinary mismatches (§4.3).
pub type ExternFn = Arc<dyn Fn(&mut crate::engine::Parser, &[Value]) -> Result<Value, ParseFail> + Send + Sync>;

#[derive(Clone, Default)]
pub struct Context {
    values: HashMap<String, Value>,
    externs: HashMap<String, ExternFn>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn register_extern(&mut self, name: impl Into<String>, f: ExternFn) {
        self.externs.insert(name.into(), f);
    }

    pub fn extern_fn(&self, name: &str) -> Option<ExternFn> {
        self.externs.get(name).cloned()
    }

    pub fn has_extern(&self, name: &str) -> bool {
        self.externs.contains_key(name)
    }
}

/// The scope an action expression evaluates in: `context ⊕ bindings`, with
/// bindings shadowing the context (§4.4).
pub struct Scope<'a> {
    pub context: &'a Context,
    pub bindings: &'a HashMap<String, Value>,
}

impl<'a> Scope<'a> {
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name).or_else(|| self.context.get(name))
    }
}

//! `Specification`: a named, read-only mapping of rule identifiers to rule
//! AST nodes, shared across concurrent top-level parses.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::Rule;
use crate::error::StructuralError;
use crate::loader::SpecLoader;
use crate::reader;

#[derive(Debug, Clone, Default)]
pub struct Specification {
    rules: HashMap<String, Arc<Rule>>,
}

impl Specification {
    /// Parses a single specification document with no `include` resolution.
    /// An `include` line in `text` is a structural error here — use
    /// [`Specification::parse_with_loader`] when includes must resolve.
    pub fn parse(text: &str) -> Result<Specification, StructuralError> {
        let rules = reader::read_document(text, None)?;
        Ok(Specification { rules })
    }

    /// Parses `text` (the specification rooted at `base`), resolving any
    /// `include X` lines via `loader`. Included specifications are parsed
    /// first; the current file's definitions are overlaid on top
    /// (later wins), per §6.
    pub fn parse_with_loader(
        text: &str,
        base: &str,
        loader: &dyn SpecLoader,
    ) -> Result<Specification, StructuralError> {
        let rules = reader::read_document_with_includes(text, base, loader)?;
        Ok(Specification { rules })
    }

    pub fn get(&self, name: &str) -> Option<Arc<Rule>> {
        self.rules.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|s| s.as_str())
    }
}

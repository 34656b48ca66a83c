//! Parameter binding: resolves rule-parameter names to concrete rules
//! during matching.
//!
//! Rather than cloning rule bodies per invocation — which produces
//! quadratic blowup on nested parameterised calls, the approach one source
//! draft took — an immutable *augmented namespace* (name → binding) is
//! threaded through the recursive matcher. Parameter references are
//! resolved by name-lookup at the moment an element is about to be
//! matched; defaults are resolved at call entry.
//!
//! A binding pairs the argument `Rule` with the namespace that was active
//! at its textual call site, so that free parameter references nested
//! inside an argument resolve lexically rather than against the callee's
//! own namespace (see `SPEC_FULL.md` §3, "Captured namespace").

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::Rule;
use crate::error::StructuralError;
use crate::specification::Specification;

#[derive(Debug, Clone)]
pub struct Binding {
    pub rule: Arc<Rule>,
    pub captured: Option<Arc<Namespace>>,
}

pub type Namespace = HashMap<String, Binding>;

/// Builds the namespace for a call that supplied `args`, as described in
/// §4.2 step 1: defaults first, then `args` overlaid pairwise, with each
/// argument captured together with the namespace active at its call site.
pub fn build_namespace(
    spec: &Specification,
    rule: &Rule,
    args: &[Arc<Rule>],
    call_site_ns: Option<&Arc<Namespace>>,
) -> Result<Namespace, StructuralError> {
    if args.len() > rule.params.len() {
        return Err(StructuralError::type_err(format!(
            "rule '{}' expects at most {} argument(s), but got {}",
            rule.name.as_deref().unwrap_or("<anonymous>"),
            rule.params.len(),
            args.len()
        )));
    }

    let mut ns = Namespace::new();
    for (i, param) in rule.params.iter().enumerate() {
        if let Some(arg) = args.get(i) {
            ns.insert(
                param.name.clone(),
                Binding {
                    rule: arg.clone(),
                    captured: call_site_ns.cloned(),
                },
            );
        } else if let Some(default_name) = &param.default {
            let default_rule = spec.get(default_name).ok_or_else(|| {
                StructuralError::name(format!(
                    "default argument '{}' for parameter '{}' of rule '{}' is not defined",
                    default_name,
                    param.name,
                    rule.name.as_deref().unwrap_or("<anonymous>")
                ))
            })?;
            ns.insert(
                param.name.clone(),
                Binding {
                    rule: default_rule,
                    captured: None,
                },
            );
        } else {
            return Err(StructuralError::type_err(format!(
                "rule '{}' is missing required argument '{}'",
                rule.name.as_deref().unwrap_or("<anonymous>"),
                param.name
            )));
        }
    }
    Ok(ns)
}

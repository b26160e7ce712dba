//! Whole-document validation.
//!
//! Parses every rule expression, optionally enforces the document's
//! namespace on it, and stores the canonical re-serialization back on the
//! rule. The caller's document is never touched: validation operates on a
//! deep copy and either returns it whole or fails at the first bad rule.

use logfence_foundation::Result;
use logfence_query::{parse_expr, to_query};
use logfence_tenancy::enforce_expr;

use crate::document::RuleDocument;

/// Validates a rule document.
///
/// Iterates groups and rules in document order. Each rule's expression is
/// parsed; with `enforce_namespace`, every stream selector in it is then
/// rewritten to pin the document's namespace. The rule's `expr` is replaced
/// by the canonical form of the validated expression.
///
/// Cluster-scoped documents validate syntax only and pass
/// `enforce_namespace = false`; tenant-scoped documents always enforce.
///
/// # Errors
/// Fails on the first rule whose expression does not parse or violates the
/// namespace invariant. The error carries the rule's label, and no partial
/// document is returned.
pub fn validate(document: &RuleDocument, enforce_namespace: bool) -> Result<RuleDocument> {
    let mut copy = document.clone();
    let namespace = copy.namespace.clone();

    for group in &mut copy.groups {
        for rule in &mut group.rules {
            let mut expr = parse_expr(&rule.expr).map_err(|e| e.with_rule(rule.label()))?;

            if enforce_namespace {
                enforce_expr(&namespace, &mut expr).map_err(|e| e.with_rule(rule.label()))?;
            }

            rule.expr = to_query(&expr);
        }
    }

    Ok(copy)
}

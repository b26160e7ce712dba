//! The matcher enforcer and the expression walker.
//!
//! `enforce_matchers` applies the namespace invariant to one flat matcher
//! list; `enforce_expr` walks an expression tree and applies it to every
//! selector leaf. The walk dispatches exhaustively over the closed `Expr`
//! set, so a grammar change that adds a node kind fails to compile until
//! the walker learns about it.

use logfence_foundation::{Error, LabelMatcher, Result};
use logfence_query::Expr;

/// Rewrites a matcher list so it pins the target namespace.
///
/// Scans matchers in order. Any matcher on the reserved `namespace` label
/// must already be an exact match for `ns`; otherwise the whole call fails
/// with a namespace mismatch and no partial result. Compliant namespace
/// matchers are dropped, and exactly one synthesized `namespace="<ns>"`
/// matcher is appended last. All other matchers keep their relative order.
///
/// # Errors
/// Returns `NamespaceMismatch` if the author pinned a conflicting or
/// malformed namespace matcher.
pub fn enforce_matchers(ns: &str, matchers: Vec<LabelMatcher>) -> Result<Vec<LabelMatcher>> {
    let mut result = Vec::with_capacity(matchers.len() + 1);

    for matcher in matchers {
        if matcher.is_namespace() {
            if !matcher.pins_namespace(ns) {
                return Err(Error::namespace_mismatch(matcher.to_string(), ns));
            }
            // Compliant duplicate; the synthesized matcher replaces it.
        } else {
            result.push(matcher);
        }
    }

    result.push(LabelMatcher::namespace(ns));
    Ok(result)
}

/// Walks an expression and enforces the namespace on every selector.
///
/// The tree is rewritten in place. Selectors are the sole leaves; all other
/// node kinds recurse into their children, including **both** operands of a
/// binary operation and through nested log-range wrappers. Pipeline stages
/// are text-only operations and are never inspected.
///
/// # Errors
/// Returns `NamespaceMismatch` from the first offending selector; the
/// expression may be partially rewritten in that case and must be discarded.
pub fn enforce_expr(ns: &str, expr: &mut Expr) -> Result<()> {
    match expr {
        Expr::Selector { matchers, .. } => {
            let taken = std::mem::take(matchers);
            *matchers = enforce_matchers(ns, taken)?;
            Ok(())
        }

        Expr::Filter { child, .. }
        | Expr::LogRange { child, .. }
        | Expr::RangeAggregation { child, .. }
        | Expr::VectorAggregation { child, .. }
        | Expr::Pipeline { child, .. } => enforce_expr(ns, child),

        Expr::BinaryOp { left, right, .. } => {
            enforce_expr(ns, left)?;
            enforce_expr(ns, right)
        }
    }
}

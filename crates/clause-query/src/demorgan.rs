//! De Morgan normalization of the clause tree.
//!
//! Pushes every `Not` down through `And`/`Or` so that, afterwards, a `Not`
//! only ever wraps a leaf clause:
//! - `NOT (A AND B)` becomes `NOT A OR NOT B`
//! - `NOT (A OR B)` becomes `NOT A AND NOT B`
//! - `NOT NOT A` becomes `A`
//!
//! Leaves are left as they are; their factories resolve negation through the
//! deferred flag on the query result.

use crate::clause::Clause;

/// Normalizes a clause tree. The function never mutates shared state; a new
/// tree is returned.
pub fn normalize_clause(clause: Clause) -> Clause {
    match clause {
        Clause::And(children) => Clause::And(children.into_iter().map(normalize_clause).collect()),
        Clause::Or(children) => Clause::Or(children.into_iter().map(normalize_clause).collect()),
        Clause::Not(inner) => negate_clause(*inner),
        leaf => leaf,
    }
}

/// Returns the normalized form of `NOT clause`.
fn negate_clause(clause: Clause) -> Clause {
    match clause {
        // Double negation cancels out
        Clause::Not(inner) => normalize_clause(*inner),
        Clause::And(children) => Clause::Or(children.into_iter().map(negate_clause).collect()),
        Clause::Or(children) => Clause::And(children.into_iter().map(negate_clause).collect()),
        leaf => Clause::Not(Box::new(leaf)),
    }
}

/// True when no `Not` wraps anything other than a leaf.
pub fn is_normalized(clause: &Clause) -> bool {
    match clause {
        Clause::Not(inner) => inner.is_leaf(),
        Clause::And(children) | Clause::Or(children) => children.iter().all(is_normalized),
        _ => true,
    }
}

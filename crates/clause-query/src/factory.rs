//! Field and operator query factories.
//!
//! A [`ClauseQueryFactory`] turns one terminal clause into a deferred-negation
//! result. Most fields use a [`GenericClauseQueryFactory`], which resolves the
//! operand and dispatches to the first [`OperatorSpecificQueryFactory`] that
//! claims the operator:
//! - Equality (`=`, `!=`, `in`, `not in`, `is`, `is not`)
//! - Relational over sortable values (`<`, `<=`, `>`, `>=`)
//! - Relational over ordered constants
//! - Free-text matching (`~`, `!~`)
//!
//! History clauses (`WAS`, `CHANGED`) have their own factories backed by a
//! change-history index.

mod equality;
mod generic;
mod history;
mod like;
mod ordered;
mod relational;
mod traits;

pub use equality::EqualityQueryFactory;
pub use generic::GenericClauseQueryFactory;
pub use history::{
    ChangeHistoryIndex, ChangeHistoryQueryFactory, ChangedClauseQueryFactory, HistorySearch,
    ResolvedPredicate, WasClauseQueryFactory,
};
pub use like::LikeQueryFactory;
pub use ordered::OrderedRelationalQueryFactory;
pub use relational::{EmptyLiteralPolicy, RelationalQueryFactory};
pub use traits::{ClauseQueryFactory, OperatorSpecificQueryFactory};

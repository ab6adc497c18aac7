//! Search-engine query model.
//!
//! A self-contained value model of the boolean query objects handed to the
//! full-text index. It mirrors Lucene's query classes closely enough that
//! the textual rendering (`Display`) matches Lucene's `toString()` output:
//! - Term, phrase, prefix, wildcard, fuzzy and range leaves
//! - Boolean queries with MUST / SHOULD / MUST_NOT occurrences
//! - Boosts and the match-all query
//! - Marker fields for visibility and non-empty guards

mod boolean;
mod fields;
mod query;

pub use boolean::{BooleanClause, BooleanQuery, Occur};
pub use fields::{
    non_empty_query, visibility_query, DOCUMENT_ID_FIELD, NON_EMPTY_FIELD_IDS, VISIBLE_FIELD_IDS,
};
pub use query::{FuzzyQuery, PhraseQuery, Query, RangeQuery, Term};

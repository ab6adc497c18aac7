//! Deferred-negation query results and their composition helpers.

use crate::lucene::{visibility_query, BooleanQuery, Occur, Query};

/// A query plus a flag saying whether it must be negated by whoever
/// composes it.
///
/// Negation is resolved at composition time: an AND places a negated
/// result as `MUST_NOT`, an OR wraps it in its own prohibited sub-query.
/// The false result (an empty boolean query, not negated) is the
/// uniform "contributes nothing" value.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFactoryResult {
    query: Query,
    must_not_occur: bool,
}

impl QueryFactoryResult {
    pub fn new(query: Query, must_not_occur: bool) -> Self {
        Self {
            query,
            must_not_occur,
        }
    }

    pub fn wrap(query: impl Into<Query>) -> Self {
        Self::new(query.into(), false)
    }

    pub fn false_result() -> Self {
        Self::new(Query::empty(), false)
    }

    pub fn is_false_result(&self) -> bool {
        !self.must_not_occur && self.query.is_empty_boolean()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn must_not_occur(&self) -> bool {
        self.must_not_occur
    }

    pub fn into_parts(self) -> (Query, bool) {
        (self.query, self.must_not_occur)
    }

    /// Flips the deferred negation flag.
    pub fn negate(self) -> Self {
        Self::new(self.query, !self.must_not_occur)
    }

    /// Combines results as a logical OR.
    ///
    /// False results are absorbed; a lone survivor is returned untouched.
    /// Otherwise every survivor becomes a SHOULD clause, negated ones as
    /// `SHOULD (MUST_NOT q)`.
    pub fn merge_results_with_should(results: Vec<QueryFactoryResult>) -> Self {
        let mut remaining: Vec<QueryFactoryResult> = results
            .into_iter()
            .filter(|result| !result.is_false_result())
            .collect();

        match remaining.len() {
            0 => Self::false_result(),
            1 => remaining.remove(0),
            _ => {
                let mut merged = BooleanQuery::new();
                for result in remaining {
                    add_with_should(result, &mut merged);
                }
                Self::wrap(merged)
            }
        }
    }

    /// ANDs a result with the `visiblefieldids:<field>` marker, leaving the
    /// false result alone.
    pub fn wrap_with_visibility_query(field: &str, result: QueryFactoryResult) -> Self {
        if result.is_false_result() {
            return result;
        }
        let occur = if result.must_not_occur {
            Occur::MustNot
        } else {
            Occur::Must
        };
        let wrapped = BooleanQuery::new()
            .with(result.query, occur)
            .with(visibility_query(field), Occur::Must);
        Self::wrap(wrapped)
    }
}

/// Adds `result` to `target` as a SHOULD clause, wrapping negated results
/// in their own prohibited sub-query.
pub(crate) fn add_with_should(result: QueryFactoryResult, target: &mut BooleanQuery) {
    let (query, must_not_occur) = result.into_parts();
    if must_not_occur {
        target.add(Query::must_not(query), Occur::Should);
    } else {
        target.add(query, Occur::Should);
    }
}

/// Adds `result` to `target` as MUST or MUST_NOT according to its flag.
pub(crate) fn add_with_must(result: QueryFactoryResult, target: &mut BooleanQuery) {
    let (query, must_not_occur) = result.into_parts();
    let occur = if must_not_occur {
        Occur::MustNot
    } else {
        Occur::Must
    };
    target.add(query, occur);
}

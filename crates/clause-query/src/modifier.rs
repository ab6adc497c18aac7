//! Final rewrite applied to a compiled query before it is handed to the
//! search engine.

use crate::config::QueryBuilderConfig;
use crate::error::{QueryError, Result};
use crate::lucene::{BooleanQuery, Occur, Query};

pub trait QueryModifier: Send + Sync {
    fn modify(&self, query: Query) -> Result<Query>;
}

/// Makes purely negative boolean queries executable and enforces the
/// engine's clause limit.
#[derive(Debug, Clone, Copy)]
pub struct DefaultQueryModifier {
    max_clause_count: usize,
    add_match_all: bool,
}

impl DefaultQueryModifier {
    pub fn new(max_clause_count: usize) -> Self {
        Self {
            max_clause_count,
            add_match_all: true,
        }
    }

    pub fn from_config(config: &QueryBuilderConfig) -> Self {
        Self {
            max_clause_count: config.max_clause_count,
            add_match_all: config.add_match_all_to_negative_queries,
        }
    }

    pub fn with_match_all(mut self, add_match_all: bool) -> Self {
        self.add_match_all = add_match_all;
        self
    }
}

impl QueryModifier for DefaultQueryModifier {
    fn modify(&self, query: Query) -> Result<Query> {
        let query = if self.add_match_all {
            anchor_negative_queries(query)
        } else {
            query
        };

        let width = query.max_clause_width();
        if width > self.max_clause_count {
            return Err(QueryError::TooManyClauses {
                count: width,
                limit: self.max_clause_count,
            });
        }
        Ok(query)
    }
}

/// Prepends `+*:*` to every boolean node whose clauses are all prohibited.
fn anchor_negative_queries(query: Query) -> Query {
    match query {
        Query::Boolean(boolean) => {
            let mut rewritten = BooleanQuery::new();
            for clause in boolean.into_clauses() {
                rewritten.add(anchor_negative_queries(clause.query), clause.occur);
            }
            if rewritten.is_purely_negative() {
                rewritten.insert(0, Query::MatchAll, Occur::Must);
            }
            Query::Boolean(rewritten)
        }
        Query::Boosted { query, boost } => Query::Boosted {
            query: Box::new(anchor_negative_queries(*query)),
            boost,
        },
        other => other,
    }
}

/// Leaves the query untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpQueryModifier;

impl QueryModifier for NoOpQueryModifier {
    fn modify(&self, query: Query) -> Result<Query> {
        Ok(query)
    }
}

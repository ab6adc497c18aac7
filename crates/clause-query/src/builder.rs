//! Top-level entry point: clause tree in, search query out.
//!
//! A compilation normalizes the clause tree, walks it with a
//! [`QueryVisitor`], then hands the result to a [`QueryModifier`]. A clause
//! that expands past the clause limit, in the visitor or in the modifier, is
//! reported as [`QueryError::ClauseTooComplex`].

use std::sync::Arc;

use rayon::prelude::*;

use crate::clause::Clause;
use crate::config::QueryBuilderConfig;
use crate::context::QueryCreationContext;
use crate::demorgan::normalize_clause;
use crate::error::{QueryError, Result};
use crate::factory::{ChangedClauseQueryFactory, WasClauseQueryFactory};
use crate::lucene::Query;
use crate::modifier::{DefaultQueryModifier, QueryModifier};
use crate::registry::QueryRegistry;
use crate::visitor::QueryVisitor;

pub trait LuceneQueryBuilder: Send + Sync {
    fn create_lucene_query(&self, context: &QueryCreationContext, clause: &Clause) -> Result<Query>;
}

/// Shared, read-only builder; one instance serves concurrent compilations.
pub struct DefaultLuceneQueryBuilder {
    registry: Arc<dyn QueryRegistry>,
    was_factory: Arc<dyn WasClauseQueryFactory>,
    changed_factory: Arc<dyn ChangedClauseQueryFactory>,
    modifier: Arc<dyn QueryModifier>,
    config: QueryBuilderConfig,
}

impl DefaultLuceneQueryBuilder {
    pub fn new(
        registry: Arc<dyn QueryRegistry>,
        was_factory: Arc<dyn WasClauseQueryFactory>,
        changed_factory: Arc<dyn ChangedClauseQueryFactory>,
        config: QueryBuilderConfig,
    ) -> Self {
        Self {
            registry,
            was_factory,
            changed_factory,
            modifier: Arc::new(DefaultQueryModifier::from_config(&config)),
            config,
        }
    }

    pub fn with_modifier(mut self, modifier: Arc<dyn QueryModifier>) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn config(&self) -> &QueryBuilderConfig {
        &self.config
    }

    /// Compiles independent clauses in parallel, one result per clause in
    /// input order.
    pub fn create_lucene_queries(
        &self,
        context: &QueryCreationContext,
        clauses: &[Clause],
    ) -> Vec<Result<Query>> {
        clauses
            .par_iter()
            .map(|clause| self.create_lucene_query(context, clause))
            .collect()
    }

    fn compile(&self, context: &QueryCreationContext, clause: &Clause) -> Result<Query> {
        let normalized = normalize_clause(clause.clone());
        let visitor = QueryVisitor::new(
            self.registry.as_ref(),
            self.was_factory.as_ref(),
            self.changed_factory.as_ref(),
            context,
        )
        .with_max_clause_count(self.config.max_clause_count);
        let query = visitor.create_query(&normalized)?;
        self.modifier.modify(query)
    }
}

impl LuceneQueryBuilder for DefaultLuceneQueryBuilder {
    fn create_lucene_query(&self, context: &QueryCreationContext, clause: &Clause) -> Result<Query> {
        match self.compile(context, clause) {
            Ok(query) => Ok(query),
            Err(QueryError::TooManyClauses { count, limit }) => {
                log::warn!(
                    "Clause too complex count={} limit={} clause={}",
                    count,
                    limit,
                    clause
                );
                Err(QueryError::ClauseTooComplex {
                    clause: clause.to_string(),
                })
            }
            Err(error @ QueryError::IllegalState(_)) => {
                log::error!("Query compilation aborted clause={} error={}", clause, error);
                Err(error)
            }
            Err(error) => Err(error),
        }
    }
}

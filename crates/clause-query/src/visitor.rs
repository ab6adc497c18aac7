//! Recursive compilation of a normalized clause tree.

use crate::clause::{Clause, TerminalClause};
use crate::config::DEFAULT_MAX_CLAUSE_COUNT;
use crate::context::QueryCreationContext;
use crate::error::{QueryError, Result};
use crate::factory::{ChangedClauseQueryFactory, WasClauseQueryFactory};
use crate::lucene::{BooleanQuery, Query};
use crate::registry::QueryRegistry;
use crate::result::{add_with_must, add_with_should, QueryFactoryResult};

/// Walks one clause tree for one compilation. Expects the tree to be
/// De Morgan normalized: a `Not` wrapping a compound clause is an invariant
/// violation.
pub struct QueryVisitor<'a> {
    registry: &'a dyn QueryRegistry,
    was_factory: &'a dyn WasClauseQueryFactory,
    changed_factory: &'a dyn ChangedClauseQueryFactory,
    context: &'a QueryCreationContext,
    max_clause_count: usize,
}

impl<'a> QueryVisitor<'a> {
    pub fn new(
        registry: &'a dyn QueryRegistry,
        was_factory: &'a dyn WasClauseQueryFactory,
        changed_factory: &'a dyn ChangedClauseQueryFactory,
        context: &'a QueryCreationContext,
    ) -> Self {
        Self {
            registry,
            was_factory,
            changed_factory,
            context,
            max_clause_count: DEFAULT_MAX_CLAUSE_COUNT,
        }
    }

    pub fn with_max_clause_count(mut self, max_clause_count: usize) -> Self {
        self.max_clause_count = max_clause_count;
        self
    }

    /// Compiles `clause` into a plain query, turning a negated result into
    /// a single prohibited clause.
    pub fn create_query(&self, clause: &Clause) -> Result<Query> {
        let (query, must_not_occur) = self.visit(clause)?.into_parts();
        if must_not_occur {
            Ok(Query::must_not(query))
        } else {
            Ok(query)
        }
    }

    pub fn visit(&self, clause: &Clause) -> Result<QueryFactoryResult> {
        match clause {
            Clause::And(children) => self.visit_and(children),
            Clause::Or(children) => self.visit_or(children),
            Clause::Not(inner) => self.visit_not(inner),
            Clause::Terminal(terminal) => Ok(self.visit_terminal(terminal)),
            Clause::Was(was) => Ok(self.was_factory.was_query(self.context, was)),
            Clause::Changed(changed) => Ok(self.changed_factory.changed_query(self.context, changed)),
        }
    }

    fn visit_and(&self, children: &[Clause]) -> Result<QueryFactoryResult> {
        self.check_width(children.len())?;
        let mut query = BooleanQuery::new();
        for child in children {
            add_with_must(self.visit(child)?, &mut query);
        }
        Ok(QueryFactoryResult::wrap(query))
    }

    fn visit_or(&self, children: &[Clause]) -> Result<QueryFactoryResult> {
        self.check_width(children.len())?;
        let mut query = BooleanQuery::new();
        for child in children {
            add_with_should(self.visit(child)?, &mut query);
        }
        Ok(QueryFactoryResult::wrap(query))
    }

    fn visit_not(&self, inner: &Clause) -> Result<QueryFactoryResult> {
        if !inner.is_leaf() {
            return Err(QueryError::IllegalState(format!(
                "NOT wrapping a compound clause reached the query visitor: NOT {inner}"
            )));
        }
        let result = self.visit(inner)?;
        if result.is_false_result() {
            Ok(result)
        } else {
            Ok(result.negate())
        }
    }

    fn visit_terminal(&self, clause: &TerminalClause) -> QueryFactoryResult {
        let mut factories = self.registry.clause_query_factories(self.context, clause);
        match factories.len() {
            0 => {
                log::debug!(
                    "No query factory field={} operator={}",
                    clause.field,
                    clause.operator
                );
                QueryFactoryResult::false_result()
            }
            1 => factories.remove(0).query(self.context, clause),
            _ => QueryFactoryResult::merge_results_with_should(
                factories
                    .iter()
                    .map(|factory| factory.query(self.context, clause))
                    .collect(),
            ),
        }
    }

    fn check_width(&self, count: usize) -> Result<()> {
        if count > self.max_clause_count {
            return Err(QueryError::TooManyClauses {
                count,
                limit: self.max_clause_count,
            });
        }
        Ok(())
    }
}

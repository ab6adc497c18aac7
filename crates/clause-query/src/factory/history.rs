use std::sync::Arc;

use fnv::FnvHashMap;

use crate::clause::{ChangedClause, HistoryPredicate, Operator, PredicateOperator, QueryLiteral, WasClause};
use crate::context::QueryCreationContext;
use crate::index_value::IndexInfoResolver;
use crate::lucene::{BooleanQuery, Occur, Query, DOCUMENT_ID_FIELD};
use crate::operand::OperandResolver;
use crate::result::QueryFactoryResult;

/// Builds the query for a `WAS` clause.
pub trait WasClauseQueryFactory: Send + Sync {
    fn was_query(&self, context: &QueryCreationContext, clause: &WasClause) -> QueryFactoryResult;
}

/// Builds the query for a `CHANGED` clause.
pub trait ChangedClauseQueryFactory: Send + Sync {
    fn changed_query(
        &self,
        context: &QueryCreationContext,
        clause: &ChangedClause,
    ) -> QueryFactoryResult;
}

/// A history predicate with its operand resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPredicate {
    pub operator: PredicateOperator,
    pub values: Vec<QueryLiteral>,
}

/// One lookup against the change-history store.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySearch {
    /// Lower-cased clause field name.
    pub field: String,
    /// `Was`, `WasIn` or `Changed`; negative forms are resolved by negating
    /// the positive search.
    pub operator: Operator,
    /// Index values the field must have held.
    pub values: Vec<String>,
    /// Whether "held no value" also matches.
    pub include_empty: bool,
    pub predicates: Vec<ResolvedPredicate>,
}

/// External store answering history searches with matching document ids.
pub trait ChangeHistoryIndex: Send + Sync {
    fn matching_documents(&self, search: &HistorySearch) -> Vec<u64>;
}

/// Answers `WAS` and `CHANGED` clauses through a [`ChangeHistoryIndex`],
/// producing a disjunction over the matching document ids.
pub struct ChangeHistoryQueryFactory {
    index: Arc<dyn ChangeHistoryIndex>,
    operand_resolver: Arc<dyn OperandResolver>,
    resolvers: FnvHashMap<String, Arc<dyn IndexInfoResolver>>,
}

impl ChangeHistoryQueryFactory {
    pub fn new(index: Arc<dyn ChangeHistoryIndex>, operand_resolver: Arc<dyn OperandResolver>) -> Self {
        Self {
            index,
            operand_resolver,
            resolvers: FnvHashMap::default(),
        }
    }

    /// Resolves literals of `field` through `resolver` instead of using
    /// their text.
    pub fn with_field_resolver(mut self, field: &str, resolver: Arc<dyn IndexInfoResolver>) -> Self {
        self.resolvers.insert(field.to_lowercase(), resolver);
        self
    }

    fn index_values(&self, field: &str, literals: &[QueryLiteral]) -> (Vec<String>, bool) {
        let resolver = self.resolvers.get(field);
        let mut values = Vec::new();
        let mut include_empty = false;
        for literal in literals {
            if literal.is_empty() {
                include_empty = true;
                continue;
            }
            match resolver {
                Some(resolver) => values.extend(resolver.index_values(literal)),
                None => values.extend(literal.as_text()),
            }
        }
        (values, include_empty)
    }

    fn predicates(
        &self,
        context: &QueryCreationContext,
        field: &str,
        predicates: &[HistoryPredicate],
    ) -> Vec<ResolvedPredicate> {
        predicates
            .iter()
            .map(|predicate| ResolvedPredicate {
                operator: predicate.operator,
                values: self.operand_resolver.values(context, &predicate.operand, field),
            })
            .collect()
    }

    fn documents_query(&self, search: &HistorySearch) -> QueryFactoryResult {
        let documents = self.index.matching_documents(search);
        if documents.is_empty() {
            log::debug!("No history matches field={} operator={}", search.field, search.operator);
            return QueryFactoryResult::false_result();
        }

        let mut query = BooleanQuery::new();
        for document in documents {
            query.add(Query::term(DOCUMENT_ID_FIELD, document.to_string()), Occur::Should);
        }
        QueryFactoryResult::wrap(query)
    }
}

impl WasClauseQueryFactory for ChangeHistoryQueryFactory {
    fn was_query(&self, context: &QueryCreationContext, clause: &WasClause) -> QueryFactoryResult {
        let operator = match clause.operator {
            Operator::Was | Operator::WasNot => Operator::Was,
            Operator::WasIn | Operator::WasNotIn => Operator::WasIn,
            other => {
                log::debug!("Unsupported history operator field={} operator={}", clause.field, other);
                return QueryFactoryResult::false_result();
            }
        };
        let negated = clause.operator.is_negative();

        let field = clause.field.to_lowercase();
        let literals = self.operand_resolver.values(context, &clause.operand, &clause.field);
        let (values, include_empty) = self.index_values(&field, &literals);
        if values.is_empty() && !include_empty {
            return QueryFactoryResult::false_result();
        }

        let search = HistorySearch {
            predicates: self.predicates(context, &clause.field, &clause.predicates),
            field,
            operator,
            values,
            include_empty,
        };
        let result = self.documents_query(&search);
        if negated && !result.is_false_result() {
            result.negate()
        } else {
            result
        }
    }
}

impl ChangedClauseQueryFactory for ChangeHistoryQueryFactory {
    fn changed_query(
        &self,
        context: &QueryCreationContext,
        clause: &ChangedClause,
    ) -> QueryFactoryResult {
        let search = HistorySearch {
            field: clause.field.to_lowercase(),
            operator: Operator::Changed,
            values: Vec::new(),
            include_empty: false,
            predicates: self.predicates(context, &clause.field, &clause.predicates),
        };
        self.documents_query(&search)
    }
}

use std::sync::Arc;

use crate::clause::{Operator, QueryLiteral};
use crate::index_value::IndexInfoResolver;
use crate::lucene::{non_empty_query, visibility_query, BooleanQuery, Occur, Query};
use crate::result::QueryFactoryResult;

use super::traits::OperatorSpecificQueryFactory;

/// Equality, inequality and set membership over index values.
///
/// Empty literals are matched either through a configured sentinel value
/// indexed in place of "no value", or through the visibility and
/// non-empty marker fields.
pub struct EqualityQueryFactory {
    resolver: Arc<dyn IndexInfoResolver>,
    empty_index_value: Option<String>,
}

impl EqualityQueryFactory {
    pub fn new(resolver: Arc<dyn IndexInfoResolver>) -> Self {
        Self {
            resolver,
            empty_index_value: None,
        }
    }

    pub fn with_empty_index_value(mut self, value: impl Into<String>) -> Self {
        self.empty_index_value = Some(value.into());
        self
    }

    /// Documents where the field holds no value.
    pub fn is_empty_query(&self, field: &str) -> Query {
        match &self.empty_index_value {
            Some(sentinel) => Query::term(field, sentinel.as_str()),
            None => BooleanQuery::new()
                .with(non_empty_query(field), Occur::MustNot)
                .with(visibility_query(field), Occur::Must)
                .into(),
        }
    }

    /// Documents where the field holds some value.
    pub fn is_not_empty_query(&self, field: &str) -> Query {
        match &self.empty_index_value {
            Some(sentinel) => BooleanQuery::new()
                .with(Query::term(field, sentinel.as_str()), Occur::MustNot)
                .with(visibility_query(field), Occur::Must)
                .into(),
            None => non_empty_query(field),
        }
    }

    /// Index values for the literals, in order. `None` marks an empty
    /// literal with no sentinel configured; unresolvable literals are dropped.
    fn index_values(&self, literals: &[QueryLiteral]) -> Vec<Option<String>> {
        let mut values = Vec::new();
        for literal in literals {
            if literal.is_empty() {
                values.push(self.empty_index_value.clone());
                continue;
            }
            let resolved = self.resolver.index_values(literal);
            if resolved.is_empty() {
                log::debug!("Literal does not resolve literal={:?}", literal);
            }
            values.extend(resolved.into_iter().map(Some));
        }
        values
    }

    fn value_query(&self, field: &str, value: &Option<String>) -> Query {
        match value {
            Some(value) => Query::term(field, value.as_str()),
            None => self.is_empty_query(field),
        }
    }

    fn handle_equals(&self, field: &str, values: &[Option<String>]) -> QueryFactoryResult {
        match values {
            [] => QueryFactoryResult::false_result(),
            [single] => QueryFactoryResult::wrap(self.value_query(field, single)),
            _ => {
                let mut query = BooleanQuery::new();
                for value in values {
                    query.add(self.value_query(field, value), Occur::Should);
                }
                QueryFactoryResult::wrap(query)
            }
        }
    }

    fn handle_not_equals(&self, field: &str, values: &[Option<String>]) -> QueryFactoryResult {
        let excluded: Vec<&String> = values.iter().flatten().collect();
        if excluded.is_empty() {
            return QueryFactoryResult::wrap(self.is_not_empty_query(field));
        }

        let mut query = BooleanQuery::new().with(self.is_not_empty_query(field), Occur::Must);
        for value in excluded {
            query.add(Query::term(field, value.as_str()), Occur::MustNot);
        }
        query.add(visibility_query(field), Occur::Must);
        QueryFactoryResult::wrap(query)
    }
}

impl OperatorSpecificQueryFactory for EqualityQueryFactory {
    fn handles_operator(&self, operator: Operator) -> bool {
        matches!(
            operator,
            Operator::Equals
                | Operator::NotEquals
                | Operator::In
                | Operator::NotIn
                | Operator::Is
                | Operator::IsNot
        )
    }

    fn create_query_for_single_value(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        match operator {
            Operator::Equals | Operator::Is => {
                self.handle_equals(field, &self.index_values(literals))
            }
            Operator::NotEquals | Operator::IsNot => {
                self.handle_not_equals(field, &self.index_values(literals))
            }
            _ => QueryFactoryResult::false_result(),
        }
    }

    fn create_query_for_multiple_values(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        match operator {
            Operator::In => self.handle_equals(field, &self.index_values(literals)),
            Operator::NotIn => self.handle_not_equals(field, &self.index_values(literals)),
            _ => QueryFactoryResult::false_result(),
        }
    }

    fn create_query_for_empty_operand(&self, field: &str, operator: Operator) -> QueryFactoryResult {
        match operator {
            Operator::Equals | Operator::Is | Operator::In => {
                QueryFactoryResult::wrap(self.is_empty_query(field))
            }
            Operator::NotEquals | Operator::IsNot | Operator::NotIn => {
                QueryFactoryResult::wrap(self.is_not_empty_query(field))
            }
            _ => QueryFactoryResult::false_result(),
        }
    }
}

use std::sync::Arc;

use crate::clause::{Operator, QueryLiteral};
use crate::index_value::{ConstantOrdering, IndexInfoResolver};
use crate::lucene::{BooleanQuery, Occur, Query};
use crate::result::QueryFactoryResult;

use super::traits::OperatorSpecificQueryFactory;

/// Relational operators over constants with a domain order, such as
/// priorities. `priority > Major` expands to every id ordered above Major.
pub struct OrderedRelationalQueryFactory {
    resolver: Arc<dyn IndexInfoResolver>,
    ordering: Arc<ConstantOrdering>,
}

impl OrderedRelationalQueryFactory {
    pub fn new(resolver: Arc<dyn IndexInfoResolver>, ordering: Arc<ConstantOrdering>) -> Self {
        Self { resolver, ordering }
    }

    fn query_for_id(&self, field: &str, operator: Operator, id: &str) -> Option<Query> {
        let ids = match operator {
            Operator::LessThan => self.ordering.below(id, false),
            Operator::LessThanEquals => self.ordering.below(id, true),
            Operator::GreaterThan => self.ordering.above(id, false),
            Operator::GreaterThanEquals => self.ordering.above(id, true),
            _ => None,
        }?;
        if ids.is_empty() {
            return None;
        }

        let mut query = BooleanQuery::new();
        for id in ids {
            query.add(Query::term(field, id.as_str()), Occur::Should);
        }
        Some(query.into())
    }
}

impl OperatorSpecificQueryFactory for OrderedRelationalQueryFactory {
    fn handles_operator(&self, operator: Operator) -> bool {
        operator.is_relational()
    }

    fn create_query_for_single_value(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        if !self.handles_operator(operator) {
            return QueryFactoryResult::false_result();
        }

        let mut queries: Vec<Query> = literals
            .iter()
            .filter(|literal| !literal.is_empty())
            .flat_map(|literal| self.resolver.index_values(literal))
            .filter_map(|id| self.query_for_id(field, operator, &id))
            .collect();

        match queries.len() {
            0 => QueryFactoryResult::false_result(),
            1 => QueryFactoryResult::wrap(queries.remove(0)),
            _ => {
                let mut combined = BooleanQuery::new();
                for query in queries {
                    combined.add(query, Occur::Should);
                }
                QueryFactoryResult::wrap(combined)
            }
        }
    }

    fn create_query_for_multiple_values(
        &self,
        _field: &str,
        _operator: Operator,
        _literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        QueryFactoryResult::false_result()
    }

    fn create_query_for_empty_operand(&self, _field: &str, _operator: Operator) -> QueryFactoryResult {
        QueryFactoryResult::false_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_value::ConstantIndexInfoResolver;

    /// Trivial < Minor < Major < Blocker; "Major" names two constants.
    fn factory() -> OrderedRelationalQueryFactory {
        let resolver = ConstantIndexInfoResolver::new([
            ("5", "Trivial"),
            ("4", "Minor"),
            ("3", "Major"),
            ("1", "Blocker"),
            ("30", "Major"),
        ]);
        let ordering = ConstantOrdering::new(["5", "4", "3", "1"]);
        OrderedRelationalQueryFactory::new(Arc::new(resolver), Arc::new(ordering))
    }

    #[test]
    fn expands_to_ids_on_the_requested_side() {
        let factory = factory();
        let minor = [QueryLiteral::string("Minor")];
        assert_eq!(
            factory
                .create_query_for_single_value("priority", Operator::GreaterThan, &minor)
                .query()
                .to_string(),
            "priority:3 priority:1"
        );
        assert_eq!(
            factory
                .create_query_for_single_value("priority", Operator::LessThanEquals, &minor)
                .query()
                .to_string(),
            "priority:5 priority:4"
        );
    }

    #[test]
    fn lowest_constant_has_nothing_below() {
        let result = factory().create_query_for_single_value(
            "priority",
            Operator::LessThan,
            &[QueryLiteral::string("Trivial")],
        );
        assert_eq!(result, QueryFactoryResult::false_result());
    }

    #[test]
    fn unordered_ids_contribute_nothing() {
        // "Major" resolves to 3 (ordered) and 30 (not ordered).
        let result = factory().create_query_for_single_value(
            "priority",
            Operator::GreaterThanEquals,
            &[QueryLiteral::string("major")],
        );
        assert_eq!(result.query().to_string(), "priority:3 priority:1");
    }

    #[test]
    fn several_literals_are_or_ed() {
        let result = factory().create_query_for_single_value(
            "priority",
            Operator::GreaterThan,
            &[
                QueryLiteral::string("Major"),
                QueryLiteral::Empty,
                QueryLiteral::string("nope"),
                QueryLiteral::Long(4),
            ],
        );
        assert_eq!(
            result.query().to_string(),
            "(priority:1) (priority:3 priority:1)"
        );
    }

    #[test]
    fn unsupported_shapes_are_false_results() {
        let factory = factory();
        let false_result = QueryFactoryResult::false_result();
        assert_eq!(
            factory.create_query_for_single_value("priority", Operator::LessThan, &[]),
            false_result
        );
        assert_eq!(
            factory.create_query_for_single_value(
                "priority",
                Operator::Equals,
                &[QueryLiteral::string("Major")]
            ),
            false_result
        );
        assert_eq!(
            factory.create_query_for_multiple_values("priority", Operator::In, &[]),
            false_result
        );
        assert_eq!(
            factory.create_query_for_empty_operand("priority", Operator::Equals),
            false_result
        );
    }
}

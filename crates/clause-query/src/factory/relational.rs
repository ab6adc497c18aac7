use std::sync::Arc;

use crate::clause::{Operator, QueryLiteral};
use crate::index_value::{RangeBounds, RangeValueConverter};
use crate::lucene::{BooleanQuery, Occur, Query, RangeQuery};
use crate::result::QueryFactoryResult;

use super::traits::OperatorSpecificQueryFactory;

/// What an empty literal means on the relational path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyLiteralPolicy {
    /// Contributes nothing (numbers, durations).
    #[default]
    Ignore,
    /// Drops the bound, matching any value present (dates).
    OpenEnded,
}

/// `<`, `<=`, `>`, `>=` over a single literal, as a range on the field's
/// sortable encoding.
pub struct RelationalQueryFactory {
    converter: Arc<dyn RangeValueConverter>,
    empty_index_value: Option<String>,
    empty_literal: EmptyLiteralPolicy,
}

impl RelationalQueryFactory {
    pub fn new(converter: Arc<dyn RangeValueConverter>) -> Self {
        Self {
            converter,
            empty_index_value: None,
            empty_literal: EmptyLiteralPolicy::Ignore,
        }
    }

    /// Excludes documents holding the sentinel indexed for "no value".
    pub fn with_empty_index_value(mut self, value: impl Into<String>) -> Self {
        self.empty_index_value = Some(value.into());
        self
    }

    pub fn with_empty_literal_policy(mut self, policy: EmptyLiteralPolicy) -> Self {
        self.empty_literal = policy;
        self
    }

    fn range_query(&self, field: &str, operator: Operator, literal: &QueryLiteral) -> Option<RangeQuery> {
        if literal.is_empty() {
            return match self.empty_literal {
                EmptyLiteralPolicy::Ignore => None,
                EmptyLiteralPolicy::OpenEnded => Some(RangeQuery::unbounded(field)),
            };
        }
        let RangeBounds { lower, upper } = self.converter.range_bounds(literal)?;
        match operator {
            Operator::LessThan => Some(RangeQuery::below(field, lower, false)),
            Operator::LessThanEquals => Some(RangeQuery::below(field, upper, true)),
            Operator::GreaterThan => Some(RangeQuery::above(field, upper, false)),
            Operator::GreaterThanEquals => Some(RangeQuery::above(field, lower, true)),
            _ => None,
        }
    }
}

impl OperatorSpecificQueryFactory for RelationalQueryFactory {
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

        let mut ranges: Vec<RangeQuery> = literals
            .iter()
            .filter_map(|literal| self.range_query(field, operator, literal))
            .collect();
        if ranges.len() != 1 {
            log::debug!(
                "Relational query needs exactly one bound field={} bounds={}",
                field,
                ranges.len()
            );
            return QueryFactoryResult::false_result();
        }

        let range = Query::Range(ranges.remove(0));
        match &self.empty_index_value {
            Some(sentinel) => QueryFactoryResult::wrap(
                BooleanQuery::new()
                    .with(range, Occur::Must)
                    .with(Query::term(field, sentinel.as_str()), Occur::MustNot),
            ),
            None => QueryFactoryResult::wrap(range),
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
    use crate::index_value::{DateIndexValueConverter, LongIndexValueConverter};

    fn numbers() -> RelationalQueryFactory {
        RelationalQueryFactory::new(Arc::new(LongIndexValueConverter::new()))
    }

    fn dates() -> RelationalQueryFactory {
        RelationalQueryFactory::new(Arc::new(DateIndexValueConverter::new()))
            .with_empty_literal_policy(EmptyLiteralPolicy::OpenEnded)
    }

    fn render(result: QueryFactoryResult) -> String {
        result.query().to_string()
    }

    #[test]
    fn handles_relational_operators_only() {
        let factory = numbers();
        assert!(factory.handles_operator(Operator::LessThan));
        assert!(factory.handles_operator(Operator::GreaterThanEquals));
        assert!(!factory.handles_operator(Operator::Equals));
        assert!(!factory.handles_operator(Operator::In));
    }

    #[test]
    fn numeric_ranges() {
        let factory = numbers();
        let one = [QueryLiteral::Long(10)];
        assert_eq!(
            render(factory.create_query_for_single_value("votes", Operator::LessThan, &one)),
            "votes:[* TO 10}"
        );
        assert_eq!(
            render(factory.create_query_for_single_value("votes", Operator::LessThanEquals, &one)),
            "votes:[* TO 10]"
        );
        assert_eq!(
            render(factory.create_query_for_single_value("votes", Operator::GreaterThan, &one)),
            "votes:{10 TO *]"
        );
        assert_eq!(
            render(factory.create_query_for_single_value("votes", Operator::GreaterThanEquals, &one)),
            "votes:[10 TO *]"
        );
    }

    #[test]
    fn sentinel_adds_guard_clause() {
        let factory = numbers().with_empty_index_value("-1");
        let result = factory.create_query_for_single_value(
            "votes",
            Operator::LessThan,
            &[QueryLiteral::Long(10)],
        );
        assert!(!result.must_not_occur());
        assert_eq!(render(result), "+votes:[* TO 10} -votes:-1");
    }

    #[test]
    fn numeric_empty_literal_is_ignored() {
        let factory = numbers();
        assert_eq!(
            factory.create_query_for_single_value("votes", Operator::LessThan, &[QueryLiteral::Empty]),
            QueryFactoryResult::false_result()
        );
        assert_eq!(
            render(factory.create_query_for_single_value(
                "votes",
                Operator::LessThan,
                &[QueryLiteral::Empty, QueryLiteral::Long(3)],
            )),
            "votes:[* TO 3}"
        );
    }

    #[test]
    fn date_empty_literal_is_open_ended() {
        let factory = dates();
        assert_eq!(
            render(factory.create_query_for_single_value(
                "created",
                Operator::GreaterThan,
                &[QueryLiteral::Empty]
            )),
            "created:[* TO *]"
        );
    }

    #[test]
    fn date_bounds_follow_the_day() {
        let factory = dates();
        let day = [QueryLiteral::string("2024-01-15")];
        assert_eq!(
            render(factory.create_query_for_single_value("created", Operator::LessThan, &day)),
            "created:[* TO 202401150000}"
        );
        assert_eq!(
            render(factory.create_query_for_single_value("created", Operator::LessThanEquals, &day)),
            "created:[* TO 202401152359]"
        );
        assert_eq!(
            render(factory.create_query_for_single_value("created", Operator::GreaterThan, &day)),
            "created:{202401152359 TO *]"
        );
        assert_eq!(
            render(factory.create_query_for_single_value("created", Operator::GreaterThanEquals, &day)),
            "created:[202401150000 TO *]"
        );
    }

    #[test]
    fn degenerate_inputs_are_false_results() {
        let factory = numbers();
        let false_result = QueryFactoryResult::false_result();
        assert_eq!(
            factory.create_query_for_single_value("votes", Operator::LessThan, &[]),
            false_result
        );
        assert_eq!(
            factory.create_query_for_single_value(
                "votes",
                Operator::LessThan,
                &[QueryLiteral::Long(1), QueryLiteral::Long(2)]
            ),
            false_result
        );
        assert_eq!(
            factory.create_query_for_single_value("votes", Operator::LessThan, &[QueryLiteral::string("x")]),
            false_result
        );
        assert_eq!(
            factory.create_query_for_single_value("votes", Operator::Equals, &[QueryLiteral::Long(1)]),
            false_result
        );
        assert_eq!(
            factory.create_query_for_multiple_values("votes", Operator::LessThan, &[QueryLiteral::Long(1)]),
            false_result
        );
        assert_eq!(
            factory.create_query_for_empty_operand("votes", Operator::LessThan),
            false_result
        );
    }
}

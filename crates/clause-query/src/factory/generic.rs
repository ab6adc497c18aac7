use std::sync::Arc;

use crate::clause::TerminalClause;
use crate::context::QueryCreationContext;
use crate::operand::OperandResolver;
use crate::result::QueryFactoryResult;

use super::traits::{ClauseQueryFactory, OperatorSpecificQueryFactory};

/// Resolves the clause operand and hands it to the first operator factory
/// that handles the clause's operator. Later factories are never consulted
/// once an earlier one claims the operator.
pub struct GenericClauseQueryFactory {
    index_field: String,
    factories: Vec<Arc<dyn OperatorSpecificQueryFactory>>,
    operand_resolver: Arc<dyn OperandResolver>,
    visibility_guard: bool,
}

impl GenericClauseQueryFactory {
    pub fn new(
        index_field: impl Into<String>,
        factories: Vec<Arc<dyn OperatorSpecificQueryFactory>>,
        operand_resolver: Arc<dyn OperandResolver>,
    ) -> Self {
        Self {
            index_field: index_field.into(),
            factories,
            operand_resolver,
            visibility_guard: false,
        }
    }

    /// ANDs every result with the field's visibility marker, for fields that
    /// may be absent from a document altogether.
    pub fn with_visibility_guard(mut self) -> Self {
        self.visibility_guard = true;
        self
    }

    pub fn index_field(&self) -> &str {
        &self.index_field
    }

    fn dispatch(
        &self,
        context: &QueryCreationContext,
        clause: &TerminalClause,
    ) -> QueryFactoryResult {
        let operator = clause.operator;
        let Some(factory) = self
            .factories
            .iter()
            .find(|factory| factory.handles_operator(operator))
        else {
            log::debug!(
                "No operator factory field={} operator={}",
                clause.field,
                operator
            );
            return QueryFactoryResult::false_result();
        };

        let operand = &clause.operand;
        if self.operand_resolver.is_empty_operand(operand) {
            return factory.create_query_for_empty_operand(&self.index_field, operator);
        }

        let literals = self.operand_resolver.values(context, operand, &clause.field);
        if self.operand_resolver.is_list_operand(operand) {
            factory.create_query_for_multiple_values(&self.index_field, operator, &literals)
        } else {
            factory.create_query_for_single_value(&self.index_field, operator, &literals)
        }
    }
}

impl ClauseQueryFactory for GenericClauseQueryFactory {
    fn query(
        &self,
        context: &QueryCreationContext,
        clause: &TerminalClause,
    ) -> QueryFactoryResult {
        let result = self.dispatch(context, clause);
        if self.visibility_guard {
            QueryFactoryResult::wrap_with_visibility_query(&self.index_field, result)
        } else {
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Operand, Operator, QueryLiteral};
    use crate::lucene::Query;
    use crate::operand::DefaultOperandResolver;

    /// Records which entry point was used by rendering it into the query.
    struct Recording {
        operators: Vec<Operator>,
        tag: &'static str,
    }

    impl OperatorSpecificQueryFactory for Recording {
        fn handles_operator(&self, operator: Operator) -> bool {
            self.operators.contains(&operator)
        }

        fn create_query_for_single_value(
            &self,
            field: &str,
            _operator: Operator,
            literals: &[QueryLiteral],
        ) -> QueryFactoryResult {
            QueryFactoryResult::wrap(Query::term(
                field,
                format!("{}-single-{}", self.tag, literals.len()),
            ))
        }

        fn create_query_for_multiple_values(
            &self,
            field: &str,
            _operator: Operator,
            literals: &[QueryLiteral],
        ) -> QueryFactoryResult {
            QueryFactoryResult::wrap(Query::term(
                field,
                format!("{}-multi-{}", self.tag, literals.len()),
            ))
        }

        fn create_query_for_empty_operand(
            &self,
            field: &str,
            _operator: Operator,
        ) -> QueryFactoryResult {
            QueryFactoryResult::wrap(Query::term(field, format!("{}-empty", self.tag)))
        }
    }

    fn factory() -> GenericClauseQueryFactory {
        GenericClauseQueryFactory::new(
            "idx",
            vec![
                Arc::new(Recording {
                    operators: vec![Operator::Equals, Operator::In],
                    tag: "first",
                }),
                Arc::new(Recording {
                    operators: vec![Operator::Equals, Operator::LessThan],
                    tag: "second",
                }),
            ],
            Arc::new(DefaultOperandResolver::new()),
        )
    }

    fn run(factory: &GenericClauseQueryFactory, operator: Operator, operand: Operand) -> String {
        let clause = TerminalClause::new("clause", operator, operand);
        factory
            .query(&QueryCreationContext::default(), &clause)
            .query()
            .to_string()
    }

    #[test]
    fn dispatches_to_first_matching_factory() {
        let factory = factory();
        assert_eq!(run(&factory, Operator::Equals, Operand::Long(1)), "idx:first-single-1");
        assert_eq!(
            run(&factory, Operator::LessThan, Operand::Long(1)),
            "idx:second-single-1"
        );
    }

    #[test]
    fn selects_entry_point_by_operand_shape() {
        let factory = factory();
        assert_eq!(
            run(
                &factory,
                Operator::In,
                Operand::List(vec![Operand::Long(1), Operand::Long(2)])
            ),
            "idx:first-multi-2"
        );
        assert_eq!(run(&factory, Operator::Equals, Operand::Empty), "idx:first-empty");
    }

    #[test]
    fn unhandled_operator_is_false_result() {
        let clause = TerminalClause::new("clause", Operator::Like, Operand::string("x"));
        assert_eq!(
            factory().query(&QueryCreationContext::default(), &clause),
            QueryFactoryResult::false_result()
        );
    }

    #[test]
    fn visibility_guard_wraps_results() {
        let factory = factory().with_visibility_guard();
        assert_eq!(
            run(&factory, Operator::Equals, Operand::Long(1)),
            "+idx:first-single-1 +visiblefieldids:idx"
        );
        assert_eq!(run(&factory, Operator::Like, Operand::Long(1)), "");
    }
}

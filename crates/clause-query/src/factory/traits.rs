use crate::clause::{Operator, QueryLiteral, TerminalClause};
use crate::context::QueryCreationContext;
use crate::result::QueryFactoryResult;

/// Builds the query for a terminal clause on one field.
///
/// Implementations are built once and shared by concurrent compilations.
pub trait ClauseQueryFactory: Send + Sync {
    fn query(&self, context: &QueryCreationContext, clause: &TerminalClause)
        -> QueryFactoryResult;
}

/// Builds queries for a fixed set of operators from resolved literals.
///
/// Operators the factory does not handle, and inputs it cannot express,
/// produce the false result.
pub trait OperatorSpecificQueryFactory: Send + Sync {
    fn handles_operator(&self, operator: Operator) -> bool;

    fn create_query_for_single_value(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult;

    fn create_query_for_multiple_values(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult;

    fn create_query_for_empty_operand(&self, field: &str, operator: Operator)
        -> QueryFactoryResult;
}

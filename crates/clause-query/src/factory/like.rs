use crate::clause::{Operator, QueryLiteral};
use crate::lucene::{non_empty_query, visibility_query, BooleanQuery, Occur, Query};
use crate::result::QueryFactoryResult;
use crate::text::{TextAnalyzer, TextQueryParser};

use super::traits::OperatorSpecificQueryFactory;

/// `~` / `!~` free-text matching, plus `IS [NOT] EMPTY` for text fields.
///
/// Each literal is parsed as a text expression. Malformed expressions and
/// blank text contribute the false result instead of an error.
pub struct LikeQueryFactory {
    analyzer: TextAnalyzer,
    handles_empty: bool,
}

impl Default for LikeQueryFactory {
    fn default() -> Self {
        Self {
            analyzer: TextAnalyzer::new(),
            handles_empty: true,
        }
    }
}

impl LikeQueryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls whether empty literals and the empty/visibility guards take
    /// part in the generated queries.
    pub fn with_handles_empty(mut self, handles_empty: bool) -> Self {
        self.handles_empty = handles_empty;
        self
    }

    pub fn with_analyzer(mut self, analyzer: TextAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Parses one literal. `None` for blank text, malformed expressions and
    /// expressions with no searchable terms.
    fn text_query(&self, field: &str, literal: &QueryLiteral) -> Option<Query> {
        let text = literal.as_text()?;
        if text.trim().is_empty() {
            return None;
        }
        match TextQueryParser::parse(field, &self.analyzer, &text) {
            Ok(query) if query.is_empty_boolean() => {
                log::debug!("Text expression has no terms field={} text={:?}", field, text);
                None
            }
            Ok(query) => Some(query),
            Err(err) => {
                log::debug!("Unable to parse text expression field={} error={}", field, err);
                None
            }
        }
    }

    fn is_empty_query(field: &str) -> Query {
        BooleanQuery::new()
            .with(non_empty_query(field), Occur::MustNot)
            .with(visibility_query(field), Occur::Must)
            .into()
    }

    fn single_literal(&self, field: &str, operator: Operator, literal: &QueryLiteral) -> QueryFactoryResult {
        let Some(query) = self.text_query(field, literal) else {
            return QueryFactoryResult::false_result();
        };

        let occur = if operator == Operator::Like {
            Occur::Must
        } else {
            Occur::MustNot
        };
        let mut result = BooleanQuery::new().with(query, occur);
        if self.handles_empty {
            result.add(non_empty_query(field), Occur::Must);
            result.add(visibility_query(field), Occur::Must);
        }
        QueryFactoryResult::wrap(result)
    }

    fn several_literals(&self, field: &str, operator: Operator, literals: &[QueryLiteral]) -> QueryFactoryResult {
        let positive = operator == Operator::Like;
        let mut combined = BooleanQuery::new();

        for literal in literals {
            if literal.is_empty() {
                if !self.handles_empty {
                    continue;
                }
                if positive {
                    combined.add(Self::is_empty_query(field), Occur::Should);
                } else {
                    combined.add(non_empty_query(field), Occur::Must);
                }
                continue;
            }

            let Some(query) = self.text_query(field, literal) else {
                return QueryFactoryResult::false_result();
            };
            combined.add(query, if positive { Occur::Should } else { Occur::MustNot });
        }

        if combined.is_empty() {
            return QueryFactoryResult::false_result();
        }
        QueryFactoryResult::wrap(BooleanQuery::new().with(combined.into(), Occur::Must))
    }
}

impl OperatorSpecificQueryFactory for LikeQueryFactory {
    fn handles_operator(&self, operator: Operator) -> bool {
        matches!(
            operator,
            Operator::Like | Operator::NotLike | Operator::Is | Operator::IsNot
        )
    }

    fn create_query_for_single_value(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        if !matches!(operator, Operator::Like | Operator::NotLike) {
            return QueryFactoryResult::false_result();
        }
        match literals {
            [] => QueryFactoryResult::false_result(),
            [QueryLiteral::Empty] => self.create_query_for_empty_operand(field, operator),
            [literal] => self.single_literal(field, operator, literal),
            _ => self.several_literals(field, operator, literals),
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

    fn create_query_for_empty_operand(&self, field: &str, operator: Operator) -> QueryFactoryResult {
        match operator {
            Operator::Like | Operator::Is => QueryFactoryResult::wrap(Self::is_empty_query(field)),
            Operator::NotLike | Operator::IsNot => QueryFactoryResult::wrap(non_empty_query(field)),
            _ => QueryFactoryResult::false_result(),
        }
    }
}

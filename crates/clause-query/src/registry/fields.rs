use std::sync::Arc;

use crate::config::{FieldKind, FieldPermission, SearchFieldConfig};
use crate::factory::{
    EmptyLiteralPolicy, EqualityQueryFactory, GenericClauseQueryFactory, LikeQueryFactory,
    OperatorSpecificQueryFactory, OrderedRelationalQueryFactory, RelationalQueryFactory,
};
use crate::index_value::{
    ConstantIndexInfoResolver, ConstantOrdering, ConverterInfoResolver,
    DateIndexValueConverter, DurationIndexValueConverter, IndexInfoResolver,
    LongIndexValueConverter, StringIndexValueConverter,
};
use crate::operand::OperandResolver;

use super::handler::{AlwaysPermitted, AuthenticatedOnly, ClauseHandler, ClausePermission, UsersOnly};

/// The generic factory for a configured field, guarded by its permission.
pub(super) fn build_handler(
    field: &SearchFieldConfig,
    operand_resolver: Arc<dyn OperandResolver>,
) -> ClauseHandler {
    let mut factory = GenericClauseQueryFactory::new(
        field.index_field.clone(),
        operator_factories(field),
        operand_resolver,
    );
    if field.visibility_guard {
        factory = factory.with_visibility_guard();
    }
    ClauseHandler::new(Arc::new(factory)).with_permission(permission(&field.permission))
}

fn permission(permission: &FieldPermission) -> Arc<dyn ClausePermission> {
    match permission {
        FieldPermission::Everyone => Arc::new(AlwaysPermitted),
        FieldPermission::Authenticated => Arc::new(AuthenticatedOnly),
        FieldPermission::Users(names) => Arc::new(UsersOnly::new(names)),
    }
}

fn operator_factories(field: &SearchFieldConfig) -> Vec<Arc<dyn OperatorSpecificQueryFactory>> {
    match field.kind {
        FieldKind::Exact => exact_factories(field),
        FieldKind::Text => {
            let like: Arc<dyn OperatorSpecificQueryFactory> = Arc::new(LikeQueryFactory::new());
            vec![like]
        }
        FieldKind::Number => {
            let mut converter = LongIndexValueConverter::new();
            if let Some(multiplier) = field.multiplier {
                converter = converter.with_multiplier(multiplier);
            }
            if field.sortable {
                converter = converter.sortable();
            }
            vec![
                equality(field, Arc::new(ConverterInfoResolver::new(converter))),
                relational(field, RelationalQueryFactory::new(Arc::new(converter))),
            ]
        }
        FieldKind::Date => {
            let converter = DateIndexValueConverter::new();
            let relational_factory = RelationalQueryFactory::new(Arc::new(converter))
                .with_empty_literal_policy(EmptyLiteralPolicy::OpenEnded);
            vec![
                equality(field, Arc::new(ConverterInfoResolver::new(converter))),
                relational(field, relational_factory),
            ]
        }
        FieldKind::Duration => {
            let mut converter = DurationIndexValueConverter::new();
            if field.sortable {
                converter = converter.sortable();
            }
            vec![
                equality(field, Arc::new(ConverterInfoResolver::new(converter))),
                relational(field, RelationalQueryFactory::new(Arc::new(converter))),
            ]
        }
    }
}

fn exact_factories(field: &SearchFieldConfig) -> Vec<Arc<dyn OperatorSpecificQueryFactory>> {
    if field.constants.is_empty() {
        let converter = if field.lowercase {
            StringIndexValueConverter::lowercased()
        } else {
            StringIndexValueConverter::new()
        };
        return vec![equality(field, Arc::new(ConverterInfoResolver::new(converter)))];
    }

    let resolver: Arc<dyn IndexInfoResolver> = Arc::new(ConstantIndexInfoResolver::new(
        field
            .constants
            .iter()
            .map(|constant| (constant.id.as_str(), constant.name.as_str())),
    ));
    let mut factories = vec![equality(field, Arc::clone(&resolver))];
    if field.ordered {
        let ordering = ConstantOrdering::new(field.constants.iter().map(|constant| constant.id.as_str()));
        factories.push(Arc::new(OrderedRelationalQueryFactory::new(
            resolver,
            Arc::new(ordering),
        )));
    }
    factories
}

fn equality(
    field: &SearchFieldConfig,
    resolver: Arc<dyn IndexInfoResolver>,
) -> Arc<dyn OperatorSpecificQueryFactory> {
    let mut factory = EqualityQueryFactory::new(resolver);
    if let Some(sentinel) = &field.empty_index_value {
        factory = factory.with_empty_index_value(sentinel.as_str());
    }
    Arc::new(factory)
}

fn relational(
    field: &SearchFieldConfig,
    mut factory: RelationalQueryFactory,
) -> Arc<dyn OperatorSpecificQueryFactory> {
    if let Some(sentinel) = &field.empty_index_value {
        factory = factory.with_empty_index_value(sentinel.as_str());
    }
    Arc::new(factory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Operand, Operator, TerminalClause};
    use crate::config::ConstantConfig;
    use crate::context::QueryCreationContext;
    use crate::operand::DefaultOperandResolver;

    fn compile(field: &SearchFieldConfig, clause: TerminalClause) -> String {
        let handler = build_handler(field, Arc::new(DefaultOperandResolver::with_builtin_functions()));
        handler
            .factory()
            .query(&QueryCreationContext::default(), &clause)
            .query()
            .to_string()
    }

    fn priority() -> SearchFieldConfig {
        let mut field = SearchFieldConfig::new("priority", "priority", FieldKind::Exact);
        field.constants = [("1", "Low"), ("2", "Medium"), ("3", "High")]
            .into_iter()
            .map(|(id, name)| ConstantConfig {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();
        field.ordered = true;
        field
    }

    #[test]
    fn exact_field_resolves_constants() {
        let clause = TerminalClause::new("priority", Operator::Equals, Operand::string("high"));
        assert_eq!(compile(&priority(), clause), "priority:3");

        let clause = TerminalClause::new("priority", Operator::GreaterThanEquals, Operand::string("Medium"));
        assert_eq!(compile(&priority(), clause), "priority:2 priority:3");
    }

    #[test]
    fn exact_field_without_constants_uses_text() {
        let mut field = SearchFieldConfig::new("reporter", "reporter", FieldKind::Exact);
        field.lowercase = true;
        let clause = TerminalClause::new("reporter", Operator::Equals, Operand::string("Fred"));
        assert_eq!(compile(&field, clause), "reporter:fred");

        let clause = TerminalClause::new("reporter", Operator::LessThan, Operand::string("Fred"));
        assert_eq!(compile(&field, clause), "");
    }

    #[test]
    fn number_field_with_sentinel() {
        let mut field = SearchFieldConfig::new("votes", "votes", FieldKind::Number);
        field.empty_index_value = Some("-1".to_string());
        let clause = TerminalClause::new("votes", Operator::LessThan, Operand::Long(5));
        assert_eq!(compile(&field, clause), "+votes:[* TO 5} -votes:-1");

        let clause = TerminalClause::new("votes", Operator::Is, Operand::Empty);
        assert_eq!(compile(&field, clause), "votes:-1");
    }

    #[test]
    fn date_field_relational() {
        let field = SearchFieldConfig::new("created", "created", FieldKind::Date);
        let clause = TerminalClause::new("created", Operator::GreaterThanEquals, Operand::string("2024-03-05"));
        assert_eq!(compile(&field, clause), "created:[202403050000 TO *]");
    }

    #[test]
    fn text_field_with_visibility_guard() {
        let mut field = SearchFieldConfig::new("summary", "summary", FieldKind::Text);
        field.visibility_guard = true;
        let clause = TerminalClause::new("summary", Operator::Like, Operand::string("crash"));
        assert_eq!(
            compile(&field, clause),
            "+(+summary:crash +nonemptyfieldids:summary +visiblefieldids:summary) +visiblefieldids:summary"
        );
    }
}

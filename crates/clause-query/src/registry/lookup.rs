use std::sync::Arc;

use fnv::FnvHashMap;

use crate::config::FieldRegistryConfig;
use crate::context::User;
use crate::error::Result;
use crate::operand::OperandResolver;

use super::fields::build_handler;
use super::handler::ClauseHandler;

/// Source of the handlers registered for a clause field name.
pub trait ClauseHandlerLookup: Send + Sync {
    /// Every handler for `field`, ignoring permissions.
    fn handlers(&self, field: &str) -> Vec<ClauseHandler>;

    /// The handlers for `field` that `user` may use. `None` is the
    /// anonymous user.
    fn handlers_for_user(&self, user: Option<&User>, field: &str) -> Vec<ClauseHandler>;
}

/// In-memory handler table keyed by lower-cased clause name. Built once,
/// then shared read-only between compilations.
#[derive(Clone, Default)]
pub struct FieldHandlerRegistry {
    handlers: FnvHashMap<String, Vec<ClauseHandler>>,
}

impl FieldHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard handlers for every configured field.
    pub fn from_config(
        config: &FieldRegistryConfig,
        operand_resolver: Arc<dyn OperandResolver>,
    ) -> Result<Self> {
        config.validate()?;
        let mut registry = Self::new();
        for field in &config.fields {
            let handler = build_handler(field, Arc::clone(&operand_resolver));
            for name in &field.clause_names {
                registry.register(name, handler.clone());
            }
        }
        log::debug!("Built field registry fields={}", registry.handlers.len());
        Ok(registry)
    }

    /// Adds a handler for `clause_name`; a name may carry several.
    pub fn register(&mut self, clause_name: &str, handler: ClauseHandler) {
        let key = clause_name.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        self.handlers.entry(key).or_default().push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn registered(&self, field: &str) -> &[ClauseHandler] {
        self.handlers
            .get(&field.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl ClauseHandlerLookup for FieldHandlerRegistry {
    fn handlers(&self, field: &str) -> Vec<ClauseHandler> {
        self.registered(field).to_vec()
    }

    fn handlers_for_user(&self, user: Option<&User>, field: &str) -> Vec<ClauseHandler> {
        self.registered(field)
            .iter()
            .filter(|handler| handler.permits(user))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Operand, Operator, TerminalClause};
    use crate::config::{FieldKind, FieldPermission, SearchFieldConfig};
    use crate::context::QueryCreationContext;
    use crate::operand::DefaultOperandResolver;
    use crate::registry::UsersOnly;

    fn resolver() -> Arc<dyn OperandResolver> {
        Arc::new(DefaultOperandResolver::with_builtin_functions())
    }

    fn config() -> FieldRegistryConfig {
        let mut votes = SearchFieldConfig::new("votes", "votes", FieldKind::Number);
        votes.clause_names.push("Score".to_string());
        let mut secret = SearchFieldConfig::new("secret", "secret", FieldKind::Exact);
        secret.permission = FieldPermission::Users(vec!["fred".to_string()]);
        FieldRegistryConfig {
            fields: vec![votes, secret],
        }
    }

    #[test]
    fn looks_up_clause_names_case_insensitively() {
        let registry = FieldHandlerRegistry::from_config(&config(), resolver()).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.handlers("VOTES").len(), 1);
        assert_eq!(registry.handlers("score").len(), 1);
        assert!(registry.handlers("unknown").is_empty());

        let clause = TerminalClause::new("score", Operator::Equals, Operand::Long(3));
        let handler = &registry.handlers("score")[0];
        let result = handler.factory().query(&QueryCreationContext::default(), &clause);
        assert_eq!(result.query().to_string(), "votes:3");
    }

    #[test]
    fn filters_handlers_by_permission() {
        let registry = FieldHandlerRegistry::from_config(&config(), resolver()).unwrap();
        let fred = User::new("fred");
        let bob = User::new("bob");

        assert_eq!(registry.handlers_for_user(Some(&fred), "secret").len(), 1);
        assert!(registry.handlers_for_user(Some(&bob), "secret").is_empty());
        assert!(registry.handlers_for_user(None, "secret").is_empty());
        assert_eq!(registry.handlers("secret").len(), 1);
        assert_eq!(registry.handlers_for_user(None, "votes").len(), 1);
    }

    #[test]
    fn one_name_may_carry_several_handlers() {
        let mut registry = FieldHandlerRegistry::from_config(&config(), resolver()).unwrap();
        let extra = registry.handlers("votes")[0]
            .clone()
            .with_permission(Arc::new(UsersOnly::new(["bob"])));
        registry.register("Votes", extra);
        let blank = registry.handlers("votes")[0].clone();
        registry.register("  ", blank);

        assert_eq!(registry.handlers("votes").len(), 2);
        assert_eq!(registry.handlers_for_user(None, "votes").len(), 1);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = config();
        config.fields[0].multiplier = Some(0);
        assert!(FieldHandlerRegistry::from_config(&config, resolver()).is_err());
    }
}

use std::sync::Arc;

use crate::clause::TerminalClause;
use crate::context::{HandlerScope, QueryCreationContext};
use crate::factory::ClauseQueryFactory;

use super::lookup::ClauseHandlerLookup;

/// Resolves the candidate factories for a terminal clause.
pub trait QueryRegistry: Send + Sync {
    /// Factories registered for the clause's field, in registration order.
    /// Empty when the field is unknown or not visible to the context.
    fn clause_query_factories(
        &self,
        context: &QueryCreationContext,
        clause: &TerminalClause,
    ) -> Vec<Arc<dyn ClauseQueryFactory>>;
}

/// Registry backed by a [`ClauseHandlerLookup`], filtering by the context
/// user unless security is overridden.
#[derive(Clone)]
pub struct DefaultQueryRegistry {
    lookup: Arc<dyn ClauseHandlerLookup>,
}

impl DefaultQueryRegistry {
    pub fn new(lookup: Arc<dyn ClauseHandlerLookup>) -> Self {
        Self { lookup }
    }
}

impl QueryRegistry for DefaultQueryRegistry {
    fn clause_query_factories(
        &self,
        context: &QueryCreationContext,
        clause: &TerminalClause,
    ) -> Vec<Arc<dyn ClauseQueryFactory>> {
        let handlers = match context.handler_scope() {
            HandlerScope::OverrideSecurity => self.lookup.handlers(&clause.field),
            HandlerScope::User(user) => self.lookup.handlers_for_user(user, &clause.field),
        };
        if handlers.is_empty() {
            log::debug!("No clause handlers field={}", clause.field);
        }
        handlers
            .into_iter()
            .map(|handler| Arc::clone(handler.factory()))
            .collect()
    }
}

//! Field name to query factory lookup.
//!
//! A [`ClauseHandlerLookup`] maps clause field names to handlers, each
//! pairing a factory with the permission guarding it. The
//! [`DefaultQueryRegistry`] picks the user-scoped or the security-override
//! lookup path from the creation context.

mod fields;
mod handler;
mod lookup;
mod query_registry;

pub use handler::{AlwaysPermitted, AuthenticatedOnly, ClauseHandler, ClausePermission, UsersOnly};
pub use lookup::{ClauseHandlerLookup, FieldHandlerRegistry};
pub use query_registry::{DefaultQueryRegistry, QueryRegistry};

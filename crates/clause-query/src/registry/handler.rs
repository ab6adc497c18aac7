use std::sync::Arc;

use fnv::FnvHashSet;

use crate::context::User;
use crate::factory::ClauseQueryFactory;

/// Decides whether a user may search a field.
pub trait ClausePermission: Send + Sync {
    fn has_permission(&self, user: Option<&User>) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPermitted;

impl ClausePermission for AlwaysPermitted {
    fn has_permission(&self, _user: Option<&User>) -> bool {
        true
    }
}

/// Any signed-in user.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthenticatedOnly;

impl ClausePermission for AuthenticatedOnly {
    fn has_permission(&self, user: Option<&User>) -> bool {
        user.is_some()
    }
}

/// A fixed set of users, matched by case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct UsersOnly {
    names: FnvHashSet<String>,
}

impl UsersOnly {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl ClausePermission for UsersOnly {
    fn has_permission(&self, user: Option<&User>) -> bool {
        user.is_some_and(|user| self.names.contains(&user.name.to_lowercase()))
    }
}

/// A query factory registered for a field, with the permission guarding it.
#[derive(Clone)]
pub struct ClauseHandler {
    factory: Arc<dyn ClauseQueryFactory>,
    permission: Arc<dyn ClausePermission>,
}

impl ClauseHandler {
    /// A handler usable by everyone.
    pub fn new(factory: Arc<dyn ClauseQueryFactory>) -> Self {
        Self {
            factory,
            permission: Arc::new(AlwaysPermitted),
        }
    }

    pub fn with_permission(mut self, permission: Arc<dyn ClausePermission>) -> Self {
        self.permission = permission;
        self
    }

    pub fn factory(&self) -> &Arc<dyn ClauseQueryFactory> {
        &self.factory
    }

    pub fn permits(&self, user: Option<&User>) -> bool {
        self.permission.has_permission(user)
    }
}

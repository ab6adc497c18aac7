//! Per-compilation creation context.

/// The identity a compilation runs as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Read-only context carried through one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCreationContext {
    user: Option<User>,
    security_overridden: bool,
}

impl QueryCreationContext {
    /// A context whose field lookups are filtered by `user`'s permissions.
    /// `None` is the anonymous user.
    pub fn for_user(user: Option<User>) -> Self {
        Self {
            user,
            security_overridden: false,
        }
    }

    /// A context that bypasses per-user field security. The user is still
    /// recorded so that operand functions can refer to it.
    pub fn override_security(user: Option<User>) -> Self {
        Self {
            user,
            security_overridden: true,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_security_overridden(&self) -> bool {
        self.security_overridden
    }

    /// Exactly one lookup path applies to any given context.
    pub fn handler_scope(&self) -> HandlerScope<'_> {
        if self.security_overridden {
            HandlerScope::OverrideSecurity
        } else {
            HandlerScope::User(self.user.as_ref())
        }
    }
}

/// Which registry lookup path a call uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerScope<'a> {
    User(Option<&'a User>),
    OverrideSecurity,
}

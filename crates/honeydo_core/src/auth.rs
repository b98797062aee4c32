//! Authenticated-user context passed into every service call.
//!
//! # Responsibility
//! - Model the identity handed over by the external auth provider.
//! - Keep session lookup out of the services so authorization is testable.
//!
//! # Invariants
//! - `None` from [`AuthProvider::current_user`] always means "no session".

use serde::{Deserialize, Serialize};

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Opaque user id issued by the auth provider.
    pub id: String,
    pub email: String,
}

impl AuthUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// Source of the current request's user.
pub trait AuthProvider {
    /// Returns the signed-in user, or `None` when there is no valid session.
    fn current_user(&self) -> Option<AuthUser>;
}

impl AuthProvider for AuthUser {
    fn current_user(&self) -> Option<AuthUser> {
        Some(self.clone())
    }
}

impl<T: AuthProvider> AuthProvider for Option<T> {
    fn current_user(&self) -> Option<AuthUser> {
        self.as_ref().and_then(|inner| inner.current_user())
    }
}

impl<T: AuthProvider + ?Sized> AuthProvider for &T {
    fn current_user(&self) -> Option<AuthUser> {
        (**self).current_user()
    }
}

/// Provider for callers without a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl AuthProvider for Anonymous {
    fn current_user(&self) -> Option<AuthUser> {
        None
    }
}

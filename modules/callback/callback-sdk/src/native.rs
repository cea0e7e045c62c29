//! Contracts of the native security layer the bridge logs users into.
//!
//! The bridge never builds a subject itself. It receives the current
//! request's subject and security manager explicitly, bundled in a
//! [`SecurityEnvironment`], and only asks them to log in and to drop cached
//! authorization data.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use authbridge_security::{AuthenticationToken, PrincipalCollection};

use crate::error::{LoginError, RealmError};

/// The security framework's view of the user behind the current request.
#[async_trait]
pub trait Subject: Send + Sync {
    /// Log the subject in with `token`. On success the subject's principals
    /// are those of the token.
    ///
    /// # Errors
    ///
    /// - `Authentication` if no realm accepts the token
    /// - `Action` if login needs an HTTP response sent first
    async fn login(&self, token: AuthenticationToken) -> Result<(), LoginError>;

    async fn logout(&self);

    /// Principals the subject is currently known as, if any.
    fn principals(&self) -> Option<PrincipalCollection>;

    fn is_authenticated(&self) -> bool;

    fn is_remembered(&self) -> bool;
}

/// A trust source that authenticates tokens and may cache authorization
/// data per principal.
pub trait Realm: Send + Sync {
    fn name(&self) -> &str;

    fn supports(&self, _token: &AuthenticationToken) -> bool {
        true
    }

    /// Authenticate `token`, returning the principals it resolves to.
    ///
    /// # Errors
    ///
    /// Returns `LoginError` if the token is rejected.
    fn authenticate(&self, token: &AuthenticationToken) -> Result<PrincipalCollection, LoginError>;

    /// Whether this realm keeps an authorization cache.
    fn is_cache_capable(&self) -> bool {
        false
    }

    /// Drop cached authorization data for `principals`.
    ///
    /// # Errors
    ///
    /// Returns `RealmError` if the cache could not be cleared.
    fn clear_cache(&self, _principals: &PrincipalCollection) -> Result<(), RealmError> {
        Ok(())
    }
}

/// The security manager owning the registered realms.
pub trait SecurityManager: Send + Sync {
    /// Registered realms, in registration order. Read-only.
    fn realms(&self) -> &[Arc<dyn Realm>];
}

/// The current request's subject together with the security manager it
/// belongs to.
#[derive(Clone)]
pub struct SecurityEnvironment {
    manager: Arc<dyn SecurityManager>,
    subject: Arc<dyn Subject>,
}

impl SecurityEnvironment {
    #[must_use]
    pub fn new(manager: Arc<dyn SecurityManager>, subject: Arc<dyn Subject>) -> Self {
        Self { manager, subject }
    }

    #[must_use]
    pub fn manager(&self) -> &dyn SecurityManager {
        self.manager.as_ref()
    }

    #[must_use]
    pub fn subject(&self) -> &dyn Subject {
        self.subject.as_ref()
    }
}

impl fmt::Debug for SecurityEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityEnvironment")
            .field("realms", &self.manager.realms().len())
            .field("authenticated", &self.subject.is_authenticated())
            .finish()
    }
}

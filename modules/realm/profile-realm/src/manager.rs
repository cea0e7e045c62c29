//! Security manager owning the registered realms.

use std::sync::Arc;

use authbridge_security::{AuthenticationToken, PrincipalCollection};
use callback_sdk::{LoginError, Realm, SecurityEnvironment, SecurityManager};

use crate::subject::RequestSubject;

/// Holds the realms registered at startup. The list never changes
/// afterwards.
pub struct RealmSecurityManager {
    realms: Vec<Arc<dyn Realm>>,
}

impl RealmSecurityManager {
    #[must_use]
    pub fn new(realms: Vec<Arc<dyn Realm>>) -> Self {
        Self { realms }
    }

    /// Authenticate `token` with the first realm that supports it.
    ///
    /// # Errors
    ///
    /// Returns `Authentication` if no realm supports the token, or the
    /// realm's error if it rejects it.
    pub fn authenticate(
        &self,
        token: &AuthenticationToken,
    ) -> Result<PrincipalCollection, LoginError> {
        let Some(realm) = self.realms.iter().find(|realm| realm.supports(token)) else {
            return Err(LoginError::Authentication(
                "no realm supports the authentication token".to_owned(),
            ));
        };
        let principals = realm.authenticate(token)?;
        tracing::debug!(realm = realm.name(), %principals, "token authenticated");
        Ok(principals)
    }

    /// Drop cached authorization data for `principals` in every
    /// cache-capable realm. Failures are logged and skipped.
    pub fn clear_caches(&self, principals: &PrincipalCollection) {
        for realm in self.realms.iter().filter(|realm| realm.is_cache_capable()) {
            if let Err(e) = realm.clear_cache(principals) {
                tracing::warn!(realm = realm.name(), error = %e, "failed to clear authorization cache");
            }
        }
    }

    /// A fresh, anonymous subject for one request.
    #[must_use]
    pub fn subject(self: &Arc<Self>) -> Arc<RequestSubject> {
        Arc::new(RequestSubject::new(Arc::clone(self)))
    }

    /// The security environment of one request: this manager and a fresh
    /// subject.
    #[must_use]
    pub fn environment(self: &Arc<Self>) -> SecurityEnvironment {
        SecurityEnvironment::new(Arc::clone(self) as Arc<dyn SecurityManager>, self.subject())
    }
}

impl SecurityManager for RealmSecurityManager {
    fn realms(&self) -> &[Arc<dyn Realm>] {
        &self.realms
    }
}

impl std::fmt::Debug for RealmSecurityManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealmSecurityManager")
            .field(
                "realms",
                &self.realms.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

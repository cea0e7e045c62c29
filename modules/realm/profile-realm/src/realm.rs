//! Realm authenticating profile tokens.

use std::collections::BTreeSet;
use std::sync::Arc;

use authbridge_security::{AuthenticationToken, PrincipalCollection};
use callback_sdk::{LoginError, Realm, RealmError};
use dashmap::DashMap;

/// Permission granting everything.
pub const WILDCARD_PERMISSION: &str = "*";

/// Roles and permissions of a principal collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationInfo {
    roles: BTreeSet<String>,
    permissions: BTreeSet<String>,
}

impl AuthorizationInfo {
    /// Union of the roles and permissions of every principal.
    #[must_use]
    pub fn from_principals(principals: &PrincipalCollection) -> Self {
        let mut info = Self::default();
        for principal in principals {
            info.roles.extend(principal.roles().iter().cloned());
            info.permissions
                .extend(principal.permissions().iter().cloned());
        }
        info
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Whether `permission` is granted, exactly or through `*`.
    #[must_use]
    pub fn is_permitted(&self, permission: &str) -> bool {
        self.permissions.contains(WILDCARD_PERMISSION) || self.permissions.contains(permission)
    }
}

/// Realm trusting the profiles produced by the authentication engine.
///
/// Authorization info is derived from the principals' roles and permissions
/// and cached per principal collection until [`Realm::clear_cache`] drops it.
pub struct ProfileRealm {
    name: String,
    cache: Option<DashMap<PrincipalCollection, Arc<AuthorizationInfo>>>,
}

impl ProfileRealm {
    /// Realm with an authorization cache.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cache: Some(DashMap::new()),
        }
    }

    /// Realm computing authorization info on every call.
    #[must_use]
    pub fn without_cache(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cache: None,
        }
    }

    #[must_use]
    pub fn authorization_info(&self, principals: &PrincipalCollection) -> Arc<AuthorizationInfo> {
        let Some(cache) = &self.cache else {
            return Arc::new(AuthorizationInfo::from_principals(principals));
        };
        if let Some(info) = cache.get(principals) {
            return Arc::clone(&info);
        }
        let info = Arc::new(AuthorizationInfo::from_principals(principals));
        cache.insert(principals.clone(), Arc::clone(&info));
        tracing::trace!(realm = %self.name, %principals, "authorization info cached");
        info
    }

    #[must_use]
    pub fn has_role(&self, principals: &PrincipalCollection, role: &str) -> bool {
        self.authorization_info(principals).has_role(role)
    }

    #[must_use]
    pub fn is_permitted(&self, principals: &PrincipalCollection, permission: &str) -> bool {
        self.authorization_info(principals).is_permitted(permission)
    }

    /// Number of cached principal collections.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.as_ref().map_or(0, DashMap::len)
    }
}

impl std::fmt::Debug for ProfileRealm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileRealm")
            .field("name", &self.name)
            .field("cached_entries", &self.cached_entries())
            .finish()
    }
}

impl Realm for ProfileRealm {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, token: &AuthenticationToken) -> bool {
        !token.profiles().is_empty()
    }

    fn authenticate(&self, token: &AuthenticationToken) -> Result<PrincipalCollection, LoginError> {
        if token.profiles().iter().all(|p| p.is_anonymous()) {
            return Err(LoginError::Authentication(format!(
                "realm '{}' does not accept anonymous profiles",
                self.name
            )));
        }
        Ok(token.principals())
    }

    fn is_cache_capable(&self) -> bool {
        self.cache.is_some()
    }

    fn clear_cache(&self, principals: &PrincipalCollection) -> Result<(), RealmError> {
        if let Some(cache) = &self.cache
            && cache.remove(principals).is_some()
        {
            tracing::debug!(realm = %self.name, %principals, "authorization cache entry dropped");
        }
        Ok(())
    }
}

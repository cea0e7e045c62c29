//! Per-request subject.

use std::sync::Arc;

use async_trait::async_trait;
use authbridge_security::{AuthenticationToken, PrincipalCollection};
use callback_sdk::{LoginError, Subject};
use parking_lot::RwLock;

use crate::manager::RealmSecurityManager;

#[derive(Debug, Default)]
struct SubjectState {
    principals: Option<PrincipalCollection>,
    authenticated: bool,
    remembered: bool,
}

/// The subject of one request. Starts anonymous; `login` and `logout` are
/// the only ways to change it.
#[derive(Debug)]
pub struct RequestSubject {
    manager: Arc<RealmSecurityManager>,
    state: RwLock<SubjectState>,
}

impl RequestSubject {
    #[must_use]
    pub fn new(manager: Arc<RealmSecurityManager>) -> Self {
        Self {
            manager,
            state: RwLock::new(SubjectState::default()),
        }
    }
}

#[async_trait]
impl Subject for RequestSubject {
    async fn login(&self, token: AuthenticationToken) -> Result<(), LoginError> {
        let principals = self.manager.authenticate(&token)?;
        let remembered = token.is_remember_me();

        *self.state.write() = SubjectState {
            principals: Some(principals),
            authenticated: !remembered,
            remembered,
        };
        tracing::debug!(remembered, "subject logged in");
        Ok(())
    }

    async fn logout(&self) {
        let previous = std::mem::take(&mut *self.state.write());
        if let Some(principals) = previous.principals {
            self.manager.clear_caches(&principals);
            tracing::debug!(%principals, "subject logged out");
        }
    }

    fn principals(&self) -> Option<PrincipalCollection> {
        self.state.read().principals.clone()
    }

    fn is_authenticated(&self) -> bool {
        self.state.read().authenticated
    }

    fn is_remembered(&self) -> bool {
        self.state.read().remembered
    }
}

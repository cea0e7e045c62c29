#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Fakes of the native security layer that record what the bridge asks of
//! them.

use std::sync::Arc;

use async_trait::async_trait;
use authbridge_security::{AuthenticationToken, PrincipalCollection, Profile, ProfileMap};
use callback_sdk::{
    HttpAction, LoginError, Realm, RealmError, SecurityEnvironment, SecurityManager, Subject,
};
use parking_lot::Mutex;

/// One `Subject::login` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCall {
    pub clients: Vec<String>,
    pub remember_me: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum LoginOutcome {
    Accept,
    RejectCredentials,
    RequestRedirect,
}

pub struct RecordingSubject {
    outcome: LoginOutcome,
    calls: Mutex<Vec<LoginCall>>,
    principals: Mutex<Option<PrincipalCollection>>,
}

impl RecordingSubject {
    pub fn new() -> Arc<Self> {
        Self::with_outcome(LoginOutcome::Accept)
    }

    pub fn with_outcome(outcome: LoginOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
            principals: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> Vec<LoginCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Subject for RecordingSubject {
    async fn login(&self, token: AuthenticationToken) -> Result<(), LoginError> {
        self.calls.lock().push(LoginCall {
            clients: token
                .profiles()
                .client_names()
                .map(str::to_owned)
                .collect(),
            remember_me: token.is_remember_me(),
        });
        match self.outcome {
            LoginOutcome::Accept => {
                *self.principals.lock() = Some(token.principals());
                Ok(())
            }
            LoginOutcome::RejectCredentials => {
                Err(LoginError::Authentication("account locked".to_owned()))
            }
            LoginOutcome::RequestRedirect => {
                Err(LoginError::Action(HttpAction::redirect("/mfa")))
            }
        }
    }

    async fn logout(&self) {
        *self.principals.lock() = None;
    }

    fn principals(&self) -> Option<PrincipalCollection> {
        self.principals.lock().clone()
    }

    fn is_authenticated(&self) -> bool {
        self.calls
            .lock()
            .last()
            .is_some_and(|call| !call.remember_me)
    }

    fn is_remembered(&self) -> bool {
        self.calls
            .lock()
            .last()
            .is_some_and(|call| call.remember_me)
    }
}

/// Realm counting cache invalidations.
pub struct CountingRealm {
    name: String,
    cache_capable: bool,
    failing: bool,
    cleared: Mutex<Vec<PrincipalCollection>>,
}

impl CountingRealm {
    pub fn caching(name: &str) -> Arc<Self> {
        Self::build(name, true, false)
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Self::build(name, true, true)
    }

    pub fn plain(name: &str) -> Arc<Self> {
        Self::build(name, false, false)
    }

    fn build(name: &str, cache_capable: bool, failing: bool) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            cache_capable,
            failing,
            cleared: Mutex::new(Vec::new()),
        })
    }

    pub fn clear_calls(&self) -> usize {
        self.cleared.lock().len()
    }

    pub fn cleared(&self) -> Vec<PrincipalCollection> {
        self.cleared.lock().clone()
    }
}

impl Realm for CountingRealm {
    fn name(&self) -> &str {
        &self.name
    }

    fn authenticate(&self, token: &AuthenticationToken) -> Result<PrincipalCollection, LoginError> {
        Ok(token.principals())
    }

    fn is_cache_capable(&self) -> bool {
        self.cache_capable
    }

    fn clear_cache(&self, principals: &PrincipalCollection) -> Result<(), RealmError> {
        self.cleared.lock().push(principals.clone());
        if self.failing {
            return Err(RealmError::CacheInvalidation {
                realm: self.name.clone(),
                reason: "cache backend unavailable".to_owned(),
            });
        }
        Ok(())
    }
}

pub struct FixedManager {
    realms: Vec<Arc<dyn Realm>>,
}

impl SecurityManager for FixedManager {
    fn realms(&self) -> &[Arc<dyn Realm>] {
        &self.realms
    }
}

pub fn environment(
    subject: &Arc<RecordingSubject>,
    realms: &[Arc<CountingRealm>],
) -> SecurityEnvironment {
    let realms = realms
        .iter()
        .map(|realm| Arc::clone(realm) as Arc<dyn Realm>)
        .collect();
    SecurityEnvironment::new(
        Arc::new(FixedManager { realms }),
        Arc::clone(subject) as Arc<dyn Subject>,
    )
}

pub fn fresh(client: &str, id: &str) -> Profile {
    Profile::builder(client, id).build()
}

pub fn remembered(client: &str, id: &str) -> Profile {
    Profile::builder(client, id).remembered(true).build()
}

pub fn map(profiles: impl IntoIterator<Item = Profile>) -> ProfileMap {
    profiles.into_iter().collect()
}

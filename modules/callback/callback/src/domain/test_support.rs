#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use authbridge_security::{AuthenticationToken, PrincipalCollection};
use bytes::Bytes;
use callback_sdk::{
    LoginError, Realm, SecurityEnvironment, SecurityManager, SessionStore, Subject, WebContext,
};
use http::Request;

pub struct NoRealms;

impl SecurityManager for NoRealms {
    fn realms(&self) -> &[Arc<dyn Realm>] {
        &[]
    }
}

/// Subject that accepts every login and counts them.
#[derive(Default)]
pub struct CountingSubject {
    pub logins: AtomicUsize,
}

#[async_trait]
impl Subject for CountingSubject {
    async fn login(&self, _token: AuthenticationToken) -> Result<(), LoginError> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&self) {}

    fn principals(&self) -> Option<PrincipalCollection> {
        None
    }

    fn is_authenticated(&self) -> bool {
        false
    }

    fn is_remembered(&self) -> bool {
        false
    }
}

pub fn environment() -> SecurityEnvironment {
    SecurityEnvironment::new(Arc::new(NoRealms), Arc::new(CountingSubject::default()))
}

pub fn get(uri: &str) -> Request<Bytes> {
    Request::get(uri).body(Bytes::new()).unwrap()
}

pub fn context(request: Request<Bytes>, store: Arc<dyn SessionStore>) -> WebContext {
    WebContext::new(request, store, environment())
}

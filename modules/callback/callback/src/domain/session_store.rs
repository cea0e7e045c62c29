//! Default session store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use callback_sdk::{CallbackError, SessionStore, WebContext};
use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use crate::config::{DEFAULT_SESSION_COOKIE, DEFAULT_SESSION_IDLE_TIMEOUT_SECS};

#[derive(Debug)]
struct Session {
    data: HashMap<String, Value>,
    last_access: Instant,
}

impl Session {
    fn new(data: HashMap<String, Value>) -> Self {
        Self {
            data,
            last_access: Instant::now(),
        }
    }

    fn is_expired(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_access) > idle_timeout
    }
}

/// Process-local sessions identified by a cookie.
///
/// A session is created on the first write and announced with a
/// `Set-Cookie` header. Ids the store does not know are ignored, so a
/// client cannot pick its own session id.
///
/// Every access refreshes a session; one left untouched for longer than the
/// idle timeout is gone. Expired sessions are dropped when looked up and
/// purged whenever a new session is created.
#[derive(Debug)]
pub struct InMemorySessionStore {
    cookie_name: String,
    idle_timeout: Duration,
    sessions: DashMap<String, Session>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_COOKIE)
    }
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new(cookie_name: &str) -> Self {
        Self {
            cookie_name: cookie_name.to_owned(),
            idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_TIMEOUT_SECS),
            sessions: DashMap::new(),
        }
    }

    #[must_use]
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Number of stored sessions, expired ones not yet purged included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every session idle for longer than the timeout.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| !session.is_expired(now, self.idle_timeout));
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            tracing::debug!(purged, "expired sessions purged");
        }
    }

    /// Id of the live session of `ctx`, refreshing its last access.
    fn current_id(&self, ctx: &WebContext) -> Option<String> {
        let id = ctx
            .session_id()
            .or_else(|| ctx.request_cookie(&self.cookie_name))?;
        let now = Instant::now();
        let live = match self.sessions.get_mut(id) {
            Some(mut session) if !session.is_expired(now, self.idle_timeout) => {
                session.last_access = now;
                true
            }
            Some(_) => false,
            None => return None,
        };
        if !live {
            self.sessions.remove(id);
            tracing::debug!(cookie = %self.cookie_name, "expired session dropped");
            return None;
        }
        Some(id.to_owned())
    }

    fn create(
        &self,
        ctx: &mut WebContext,
        data: HashMap<String, Value>,
    ) -> Result<String, CallbackError> {
        self.purge_expired();
        let id = Uuid::new_v4().to_string();
        ctx.response_mut()
            .set_cookie(&self.cookie_name, &id)
            .map_err(|e| CallbackError::Session(e.to_string()))?;
        self.sessions.insert(id.clone(), Session::new(data));
        ctx.set_session_id(Some(id.clone()));
        tracing::debug!(cookie = %self.cookie_name, "session created");
        Ok(id)
    }
}

impl SessionStore for InMemorySessionStore {
    fn session_id(
        &self,
        ctx: &mut WebContext,
        create: bool,
    ) -> Result<Option<String>, CallbackError> {
        if let Some(id) = self.current_id(ctx) {
            ctx.set_session_id(Some(id.clone()));
            return Ok(Some(id));
        }
        if create {
            return self.create(ctx, HashMap::new()).map(Some);
        }
        Ok(None)
    }

    fn get(&self, ctx: &WebContext, key: &str) -> Option<Value> {
        let id = self.current_id(ctx)?;
        self.sessions
            .get(&id)
            .and_then(|session| session.data.get(key).cloned())
    }

    fn set(&self, ctx: &mut WebContext, key: &str, value: Value) -> Result<(), CallbackError> {
        let id = match self.current_id(ctx) {
            Some(id) => id,
            None => self.create(ctx, HashMap::new())?,
        };
        self.sessions
            .entry(id)
            .or_insert_with(|| Session::new(HashMap::new()))
            .data
            .insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, ctx: &mut WebContext, key: &str) -> Option<Value> {
        let id = self.current_id(ctx)?;
        self.sessions
            .get_mut(&id)
            .and_then(|mut session| session.data.remove(key))
    }

    fn destroy_session(&self, ctx: &mut WebContext) -> bool {
        let Some(id) = self.current_id(ctx) else {
            return false;
        };
        ctx.set_session_id(None);
        self.sessions.remove(&id).is_some()
    }

    fn renew_session(&self, ctx: &mut WebContext) -> Result<bool, CallbackError> {
        let Some(old) = self.current_id(ctx) else {
            return Ok(false);
        };
        let data = self
            .sessions
            .remove(&old)
            .map(|(_, session)| session.data)
            .unwrap_or_default();
        self.create(ctx, data)?;
        Ok(true)
    }
}

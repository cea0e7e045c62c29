use serde_json::Value;

use crate::context::WebContext;
use crate::error::CallbackError;

/// Session storage keyed by the session the request belongs to.
///
/// Implementations resolve the session from the context (cookie, header,
/// ...) and record a newly created session id on it.
pub trait SessionStore: Send + Sync {
    /// Id of the request's session, creating one when `create` is set.
    ///
    /// # Errors
    ///
    /// Returns `Session` if a new session could not be created.
    fn session_id(&self, ctx: &mut WebContext, create: bool) -> Result<Option<String>, CallbackError>;

    fn get(&self, ctx: &WebContext, key: &str) -> Option<Value>;

    /// Store `value` under `key`, creating the session if needed.
    ///
    /// # Errors
    ///
    /// Returns `Session` if the value could not be stored.
    fn set(&self, ctx: &mut WebContext, key: &str, value: Value) -> Result<(), CallbackError>;

    fn remove(&self, ctx: &mut WebContext, key: &str) -> Option<Value>;

    /// Drop the request's session. Returns whether one existed.
    fn destroy_session(&self, ctx: &mut WebContext) -> bool;

    /// Move the request's session data to a fresh session id. Returns
    /// whether a session existed.
    ///
    /// # Errors
    ///
    /// Returns `Session` if the new session could not be created.
    fn renew_session(&self, ctx: &mut WebContext) -> Result<bool, CallbackError>;
}

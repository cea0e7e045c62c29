//! Completion delegate trait.
//!
//! The callback filter adapts the inbound request into a [`WebContext`] and
//! hands it to a `CallbackLogic` exactly once. The logic finishes the
//! protocol handshake, logs the user in and decides the response.

use async_trait::async_trait;

use crate::action::HttpAction;
use crate::adapter::HttpActionAdapter;
use crate::config::SecurityConfig;
use crate::context::WebContext;
use crate::error::CallbackError;
use crate::models::CallbackOptions;

#[async_trait]
pub trait CallbackLogic: Send + Sync {
    /// Complete the indirect login carried by `ctx`.
    ///
    /// Returns the action the callback ended with (typically a redirect to
    /// the originally requested URL). The action has been written to the
    /// context's response and passed to `adapter` before returning.
    ///
    /// # Errors
    ///
    /// - `Technical` if no single client matches the callback, or login
    ///   produced an HTTP action
    /// - `Client` if the protocol client failed
    /// - `Authentication` if the native layer rejected the login
    /// - `Session` if session storage failed
    async fn perform(
        &self,
        ctx: &mut WebContext,
        config: &SecurityConfig,
        adapter: &dyn HttpActionAdapter,
        options: &CallbackOptions,
    ) -> Result<HttpAction, CallbackError>;
}

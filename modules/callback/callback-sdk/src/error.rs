//! Error types for the callback module and the native security contracts.

use thiserror::Error;

use crate::action::HttpAction;

/// Errors a callback can end with.
///
/// Expected protocol outcomes (redirects, 401 pages, ...) are not errors;
/// they travel as [`HttpAction`] values.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// Required configuration is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The callback cannot be completed and no meaningful HTTP action
    /// exists for it.
    #[error("technical error: {0}")]
    Technical(String),

    /// The native security layer rejected the login.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Session storage failed.
    #[error("session error: {0}")]
    Session(String),

    /// The protocol client failed.
    #[error("client '{client}' failed: {source}")]
    Client {
        client: String,
        #[source]
        source: ClientError,
    },
}

impl From<LoginError> for CallbackError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::Action(action) => {
                Self::Technical(format!("login requested an HTTP action ({action})"))
            }
            LoginError::Authentication(msg) => Self::Authentication(msg),
        }
    }
}

/// Errors returned by a protocol client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials were present but could not be validated.
    #[error("invalid credentials: {0}")]
    Credentials(String),

    /// The identity provider failed or was unreachable.
    #[error("identity provider error: {0}")]
    Upstream(String),
}

/// Errors returned by a native login.
#[derive(Debug, Error)]
pub enum LoginError {
    /// No realm accepted the token.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Login needs an HTTP response sent first.
    #[error("login requested an HTTP action: {0}")]
    Action(HttpAction),
}

/// Errors returned by a realm.
#[derive(Debug, Error)]
pub enum RealmError {
    #[error("cache invalidation failed in realm '{realm}': {reason}")]
    CacheInvalidation { realm: String, reason: String },
}

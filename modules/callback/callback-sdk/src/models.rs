//! Callback models and well-known keys.

/// Redirect target when neither a requested URL nor a default URL is known.
pub const DEFAULT_URL: &str = "/";

/// Request parameter naming the client a callback belongs to.
pub const DEFAULT_CLIENT_NAME_PARAMETER: &str = "client_name";

/// Session key under which the user's profiles are kept.
pub const PROFILES_SESSION_KEY: &str = "authbridge.profiles";

/// Session key of the URL the user asked for before being sent to log in.
pub const REQUESTED_URL_SESSION_KEY: &str = "authbridge.requested_url";

/// Per-filter options handed to [`crate::CallbackLogic::perform`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CallbackOptions {
    /// Redirect target after login when no URL was requested.
    pub default_url: Option<String>,
    /// Keep the profiles in the session, not only in the request.
    pub save_in_session: bool,
    /// Accumulate profiles across logins instead of replacing them.
    pub multi_profile: bool,
    /// Move session data to a fresh session id on login.
    pub renew_session: bool,
    /// Only accept callbacks for this client.
    pub client: Option<String>,
}

impl Default for CallbackOptions {
    fn default() -> Self {
        Self {
            default_url: None,
            save_in_session: true,
            multi_profile: false,
            renew_session: true,
            client: None,
        }
    }
}

impl CallbackOptions {
    /// The URL to fall back to after login.
    #[must_use]
    pub fn default_url_or_root(&self) -> &str {
        self.default_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_URL)
    }
}

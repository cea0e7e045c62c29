//! Configuration for the callback filter.

use std::path::Path;
use std::time::Duration;

use callback_sdk::CallbackOptions;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix of environment variables overriding the file configuration.
pub const ENV_PREFIX: &str = "AUTHBRIDGE_CALLBACK_";

/// Default name of the cookie carrying the in-memory session id.
pub const DEFAULT_SESSION_COOKIE: &str = "AUTHBRIDGE_SESSION";

/// Default idle lifetime of an in-memory session: 30 minutes.
pub const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

/// Callback filter configuration.
///
/// Built once at startup; the filter only reads it afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct CallbackFilterConfig {
    /// Redirect target after login when no URL was requested. `/` if unset.
    pub default_url: Option<String>,

    /// Keep profiles in the session, not only in the request.
    pub save_in_session: bool,

    /// Accumulate profiles of successive logins through different clients.
    pub multi_profile: bool,

    /// Move session data to a fresh session id on login.
    pub renew_session: bool,

    /// Only accept callbacks for this client.
    pub client: Option<String>,

    /// Cookie carrying the id of the default in-memory session store.
    pub session_cookie_name: String,

    /// Seconds an in-memory session may stay untouched before it is dropped.
    pub session_idle_timeout_secs: u64,
}

impl Default for CallbackFilterConfig {
    fn default() -> Self {
        let options = CallbackOptions::default();
        Self {
            default_url: options.default_url,
            save_in_session: options.save_in_session,
            multi_profile: options.multi_profile,
            renew_session: options.renew_session,
            client: options.client,
            session_cookie_name: DEFAULT_SESSION_COOKIE.to_owned(),
            session_idle_timeout_secs: DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
        }
    }
}

impl CallbackFilterConfig {
    /// Load defaults, then the YAML file at `path` (if given), then
    /// `AUTHBRIDGE_CALLBACK_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the result is invalid.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let cfg: Self = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns an error if the cookie name is not a valid cookie token, the
    /// session idle timeout is zero, or a configured URL or client name is
    /// blank.
    pub fn validate(&self) -> anyhow::Result<()> {
        let cookie_ok = !self.session_cookie_name.is_empty()
            && self
                .session_cookie_name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !cookie_ok {
            anyhow::bail!(
                "invalid session_cookie_name '{}': expected ASCII letters, digits, '_' or '-'",
                self.session_cookie_name
            );
        }
        if self.session_idle_timeout_secs == 0 {
            anyhow::bail!("session_idle_timeout_secs must be greater than zero");
        }
        if let Some(url) = self.default_url.as_deref() {
            if url.trim().is_empty() {
                anyhow::bail!("default_url must not be blank");
            }
            if http::HeaderValue::from_str(url).is_err() {
                anyhow::bail!(
                    "default_url '{}' cannot be sent as a Location header",
                    url.escape_debug()
                );
            }
        }
        if self.client.as_deref().is_some_and(|c| c.trim().is_empty()) {
            anyhow::bail!("client must not be blank");
        }
        Ok(())
    }

    #[must_use]
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    #[must_use]
    pub fn options(&self) -> CallbackOptions {
        CallbackOptions {
            default_url: self.default_url.clone(),
            save_in_session: self.save_in_session,
            multi_profile: self.multi_profile,
            renew_session: self.renew_session,
            client: self.client.clone(),
        }
    }
}

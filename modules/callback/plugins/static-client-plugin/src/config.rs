//! Configuration for the static client plugin.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Prefix of environment variables overriding the file configuration.
pub const ENV_PREFIX: &str = "AUTHBRIDGE_STATIC_CLIENT_";

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticClientConfig {
    /// Client name, matched against the callback's client-name parameter.
    pub name: String,

    /// Where the client sends users to log in.
    pub login_url: String,

    /// Authentication mode.
    pub mode: StaticClientMode,

    /// Callback parameter carrying the code.
    pub code_parameter: String,

    /// Identity returned in `accept_all` mode.
    pub default_identity: IdentityConfig,

    /// Code-to-identity mappings for `static_codes` mode.
    pub codes: Vec<CodeMapping>,
}

impl Default for StaticClientConfig {
    fn default() -> Self {
        Self {
            name: "StaticClient".to_owned(),
            login_url: "/static-login".to_owned(),
            mode: StaticClientMode::AcceptAll,
            code_parameter: "code".to_owned(),
            default_identity: IdentityConfig::default(),
            codes: Vec::new(),
        }
    }
}

/// Authentication mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StaticClientMode {
    /// Accept any non-empty code and return the default identity.
    #[default]
    AcceptAll,
    /// Map specific codes to specific identities.
    StaticCodes,
}

/// Identity a code logs in.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// User id at this client.
    pub id: String,

    pub attributes: BTreeMap<String, Value>,

    pub roles: Vec<String>,

    pub permissions: Vec<String>,

    /// Issue a remembered (remember-me) profile instead of a fresh one.
    pub remembered: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            id: "dev-user".to_owned(),
            attributes: BTreeMap::new(),
            roles: vec!["user".to_owned()],
            permissions: Vec::new(),
            remembered: false,
        }
    }
}

/// Maps a static code to a specific identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CodeMapping {
    /// The code value to match.
    pub code: String,
    /// The identity to return when this code is presented.
    pub identity: IdentityConfig,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("code '{0}' is mapped more than once")]
    DuplicateCode(String),
}

impl StaticClientConfig {
    /// Load defaults, then the YAML file at `path` (if given), then
    /// `AUTHBRIDGE_STATIC_CLIENT_*` environment variables.
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
    /// Returns `ConfigError` if a required value is empty or a code is
    /// mapped twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Empty("name"));
        }
        if self.login_url.is_empty() {
            return Err(ConfigError::Empty("login_url"));
        }
        if self.code_parameter.is_empty() {
            return Err(ConfigError::Empty("code_parameter"));
        }

        let mut seen = HashSet::new();
        for mapping in &self.codes {
            if mapping.code.is_empty() {
                return Err(ConfigError::Empty("code"));
            }
            if mapping.identity.id.is_empty() {
                return Err(ConfigError::Empty("identity.id"));
            }
            if !seen.insert(mapping.code.as_str()) {
                return Err(ConfigError::DuplicateCode(mapping.code.clone()));
            }
        }
        Ok(())
    }
}

//! Code-to-profile resolution for the static client.

use std::collections::HashMap;

use authbridge_security::Profile;

use crate::config::{IdentityConfig, StaticClientConfig, StaticClientMode};

/// Static indirect client.
///
/// Resolves the callback code to a profile based on configuration mode:
/// - `accept_all`: any non-empty code maps to the default identity
/// - `static_codes`: specific codes map to specific identities
#[derive(Debug)]
pub struct StaticClient {
    pub(super) name: String,
    pub(super) login_url: String,
    pub(super) code_parameter: String,
    mode: StaticClientMode,
    default_identity: IdentityConfig,
    code_map: HashMap<String, IdentityConfig>,
}

impl StaticClient {
    /// Create a client from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticClientConfig) -> Self {
        let code_map = cfg
            .codes
            .iter()
            .map(|m| (m.code.clone(), m.identity.clone()))
            .collect();

        Self {
            name: cfg.name.clone(),
            login_url: cfg.login_url.clone(),
            code_parameter: cfg.code_parameter.clone(),
            mode: cfg.mode,
            default_identity: cfg.default_identity.clone(),
            code_map,
        }
    }

    #[must_use]
    pub fn code_parameter(&self) -> &str {
        &self.code_parameter
    }

    /// Resolve a callback code to the profile it logs in.
    ///
    /// Returns `None` if the code is empty or (in `static_codes` mode)
    /// unknown.
    #[must_use]
    pub fn resolve(&self, code: &str) -> Option<Profile> {
        if code.is_empty() {
            return None;
        }

        let identity = match self.mode {
            StaticClientMode::AcceptAll => &self.default_identity,
            StaticClientMode::StaticCodes => self.code_map.get(code)?,
        };

        Some(build_profile(&self.name, identity, code))
    }
}

fn build_profile(client_name: &str, identity: &IdentityConfig, code: &str) -> Profile {
    Profile::builder(client_name, &identity.id)
        .attributes(identity.attributes.clone())
        .roles(identity.roles.clone())
        .permissions(identity.permissions.clone())
        .remembered(identity.remembered)
        .access_token(code.to_owned())
        .build()
}

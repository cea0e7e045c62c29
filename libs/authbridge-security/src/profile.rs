use std::collections::BTreeMap;

use secrecy::SecretString;
use serde_json::Value;

/// Client name carried by anonymous profiles.
pub const ANONYMOUS_CLIENT_NAME: &str = "AnonymousClient";

/// `Profile` is the identity record an authentication client issues once a
/// login exchange completed.
///
/// Profiles are immutable after [`ProfileBuilder::build`]; the bridge only
/// reads them, stores them in a [`crate::ProfileMap`] and hands them to the
/// native login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    /// Name of the client (authentication source) that issued the profile.
    client_name: String,
    /// Identifier of the user at that client.
    id: String,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    permissions: Vec<String>,
    /// Issued from a persistent (remember-me) authentication rather than a
    /// live login exchange.
    #[serde(default)]
    remembered: bool,
    /// Placeholder identity for unauthenticated requests.
    #[serde(default)]
    anonymous: bool,
    /// Upstream access token, if the protocol produced one. Never serialized,
    /// so it does not end up in session storage.
    #[serde(skip)]
    access_token: Option<SecretString>,
}

impl Profile {
    /// Start building a profile issued by `client_name` for user `id`.
    #[must_use]
    pub fn builder(client_name: &str, id: &str) -> ProfileBuilder {
        ProfileBuilder {
            client_name: client_name.to_owned(),
            id: id.to_owned(),
            ..ProfileBuilder::default()
        }
    }

    /// The anonymous profile. It never counts as an authentication.
    #[must_use]
    pub fn anonymous() -> Self {
        let mut builder = Self::builder(ANONYMOUS_CLIENT_NAME, "anonymous");
        builder.anonymous = true;
        builder.build()
    }

    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    #[must_use]
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    #[must_use]
    pub fn is_remembered(&self) -> bool {
        self.remembered
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&SecretString> {
        self.access_token.as_ref()
    }
}

#[derive(Default)]
pub struct ProfileBuilder {
    client_name: String,
    id: String,
    attributes: BTreeMap<String, Value>,
    roles: Vec<String>,
    permissions: Vec<String>,
    remembered: bool,
    anonymous: bool,
    access_token: Option<SecretString>,
}

impl ProfileBuilder {
    #[must_use]
    pub fn attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn attributes(mut self, attributes: BTreeMap<String, Value>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    #[must_use]
    pub fn role(mut self, role: &str) -> Self {
        self.roles.push(role.to_owned());
        self
    }

    #[must_use]
    pub fn roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    #[must_use]
    pub fn permission(mut self, permission: &str) -> Self {
        self.permissions.push(permission.to_owned());
        self
    }

    #[must_use]
    pub fn permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = permissions;
        self
    }

    #[must_use]
    pub fn remembered(mut self, remembered: bool) -> Self {
        self.remembered = remembered;
        self
    }

    #[must_use]
    pub fn access_token(mut self, token: impl Into<SecretString>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Profile {
        Profile {
            client_name: self.client_name,
            id: self.id,
            attributes: self.attributes,
            roles: self.roles,
            permissions: self.permissions,
            remembered: self.remembered,
            anonymous: self.anonymous,
            access_token: self.access_token,
        }
    }
}

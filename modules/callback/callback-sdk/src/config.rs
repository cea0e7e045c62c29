//! Security configuration shared by every request.

use std::fmt;
use std::sync::Arc;

use crate::client::IndirectClient;
use crate::models::DEFAULT_CLIENT_NAME_PARAMETER;
use crate::session::SessionStore;

/// The engine's registered clients.
#[derive(Clone)]
pub struct Clients {
    client_name_parameter: String,
    clients: Vec<Arc<dyn IndirectClient>>,
}

impl Clients {
    #[must_use]
    pub fn new(clients: Vec<Arc<dyn IndirectClient>>) -> Self {
        Self {
            client_name_parameter: DEFAULT_CLIENT_NAME_PARAMETER.to_owned(),
            clients,
        }
    }

    #[must_use]
    pub fn with_client_name_parameter(mut self, parameter: &str) -> Self {
        parameter.clone_into(&mut self.client_name_parameter);
        self
    }

    #[must_use]
    pub fn client_name_parameter(&self) -> &str {
        &self.client_name_parameter
    }

    /// Find a client by name, ignoring ASCII case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Arc<dyn IndirectClient>> {
        self.clients
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clients.iter().map(|c| c.name())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl fmt::Debug for Clients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clients")
            .field("client_name_parameter", &self.client_name_parameter)
            .field("clients", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Engine configuration: clients plus an optional session store override.
///
/// Built once at startup and only read afterwards.
#[derive(Clone)]
pub struct SecurityConfig {
    clients: Clients,
    session_store: Option<Arc<dyn SessionStore>>,
}

impl SecurityConfig {
    #[must_use]
    pub fn new(clients: Clients) -> Self {
        Self {
            clients,
            session_store: None,
        }
    }

    #[must_use]
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    #[must_use]
    pub fn clients(&self) -> &Clients {
        &self.clients
    }

    #[must_use]
    pub fn session_store(&self) -> Option<&Arc<dyn SessionStore>> {
        self.session_store.as_ref()
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("clients", &self.clients)
            .field("session_store", &self.session_store.is_some())
            .finish()
    }
}

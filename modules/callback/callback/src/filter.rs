//! The callback filter: one inbound callback request in, one delegated
//! completion out.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use callback_sdk::{
    CallbackError, CallbackLogic, CallbackOptions, HttpAction, HttpActionAdapter,
    NopHttpActionAdapter, SecurityConfig, SecurityEnvironment, SessionStore, WebContext,
    WebResponse,
};
use http::Request;

use crate::config::CallbackFilterConfig;
use crate::domain::{BridgeCallbackLogic, InMemorySessionStore};

/// What a handled callback produced.
#[derive(Debug, Clone)]
pub struct CallbackOutcome {
    /// The action the completion ended with.
    pub action: HttpAction,
    /// The response built for the request, with the action applied.
    pub response: WebResponse,
}

/// Completes indirect logins on the callback URL.
///
/// Immutable once built and meant to be shared (`Arc`) by every request.
/// Each call to [`CallbackFilter::handle`] builds a fresh [`WebContext`] and
/// delegates to the configured [`CallbackLogic`] exactly once.
#[derive(Clone)]
pub struct CallbackFilter {
    config: CallbackFilterConfig,
    options: CallbackOptions,
    security_config: Option<Arc<SecurityConfig>>,
    callback_logic: Arc<dyn CallbackLogic>,
    http_action_adapter: Option<Arc<dyn HttpActionAdapter>>,
    default_session_store: Arc<InMemorySessionStore>,
}

impl CallbackFilter {
    /// Filter with the default delegate and no security configuration yet.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if `config` does not pass
    /// [`CallbackFilterConfig::validate`].
    pub fn new(config: CallbackFilterConfig) -> Result<Self, CallbackError> {
        config
            .validate()
            .map_err(|e| CallbackError::Configuration(e.to_string()))?;
        let options = config.options();
        let default_session_store = Arc::new(
            InMemorySessionStore::new(&config.session_cookie_name)
                .with_idle_timeout(config.session_idle_timeout()),
        );
        Ok(Self {
            config,
            options,
            security_config: None,
            callback_logic: Arc::new(BridgeCallbackLogic),
            http_action_adapter: None,
            default_session_store,
        })
    }

    #[must_use]
    pub fn with_security_config(mut self, security_config: Arc<SecurityConfig>) -> Self {
        self.security_config = Some(security_config);
        self
    }

    #[must_use]
    pub fn with_callback_logic(mut self, callback_logic: Arc<dyn CallbackLogic>) -> Self {
        self.callback_logic = callback_logic;
        self
    }

    #[must_use]
    pub fn with_http_action_adapter(mut self, adapter: Arc<dyn HttpActionAdapter>) -> Self {
        self.http_action_adapter = Some(adapter);
        self
    }

    #[must_use]
    pub fn config(&self) -> &CallbackFilterConfig {
        &self.config
    }

    #[must_use]
    pub fn options(&self) -> &CallbackOptions {
        &self.options
    }

    /// Store used when the security configuration brings none.
    #[must_use]
    pub fn default_session_store(&self) -> &Arc<InMemorySessionStore> {
        &self.default_session_store
    }

    /// Complete the login carried by `request` for the subject in `security`.
    ///
    /// # Errors
    ///
    /// - `Configuration` if no security configuration was set; the request
    ///   is not looked at
    /// - any error of the completion delegate, unchanged
    #[tracing::instrument(
        skip_all,
        fields(method = %request.method(), path = %request.uri().path())
    )]
    pub async fn handle(
        &self,
        request: Request<Bytes>,
        security: SecurityEnvironment,
    ) -> Result<CallbackOutcome, CallbackError> {
        let Some(security_config) = self.security_config.as_deref() else {
            tracing::error!("callback filter used without a security configuration");
            return Err(CallbackError::Configuration(
                "security configuration is required".to_owned(),
            ));
        };

        let session_store: Arc<dyn SessionStore> = match security_config.session_store() {
            Some(store) => Arc::clone(store),
            None => self.default_session_store.clone(),
        };
        let mut ctx = WebContext::new(request, session_store, security);

        let adapter: &dyn HttpActionAdapter = match self.http_action_adapter.as_deref() {
            Some(adapter) => adapter,
            None => &NopHttpActionAdapter,
        };

        match self
            .callback_logic
            .perform(&mut ctx, security_config, adapter, &self.options)
            .await
        {
            Ok(action) => {
                tracing::debug!(%action, "callback completed");
                Ok(CallbackOutcome {
                    action,
                    response: ctx.into_response(),
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "callback failed");
                Err(e)
            }
        }
    }
}

impl fmt::Debug for CallbackFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackFilter")
            .field("options", &self.options)
            .field("security_config", &self.security_config)
            .field("http_action_adapter", &self.http_action_adapter.is_some())
            .finish_non_exhaustive()
    }
}

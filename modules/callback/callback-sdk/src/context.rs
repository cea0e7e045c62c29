//! Request-scoped context.

use std::fmt;
use std::sync::Arc;

use authbridge_security::ProfileMap;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, COOKIE, HeaderName, LOCATION, SET_COOKIE};
use http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use serde_json::Value;

use crate::action::HttpAction;
use crate::error::CallbackError;
use crate::native::SecurityEnvironment;
use crate::session::SessionStore;

/// Everything a callback works on for one request: the inbound request, the
/// response being built, the session store, and the native security
/// environment of the request.
///
/// Created fresh per request and dropped with it.
pub struct WebContext {
    request: Request<Bytes>,
    parameters: Vec<(String, String)>,
    response: WebResponse,
    session_store: Arc<dyn SessionStore>,
    session_id: Option<String>,
    security: SecurityEnvironment,
    profiles: Option<ProfileMap>,
}

impl WebContext {
    #[must_use]
    pub fn new(
        request: Request<Bytes>,
        session_store: Arc<dyn SessionStore>,
        security: SecurityEnvironment,
    ) -> Self {
        let parameters = parse_parameters(&request);
        Self {
            request,
            parameters,
            response: WebResponse::default(),
            session_store,
            session_id: None,
            security,
            profiles: None,
        }
    }

    #[must_use]
    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    #[must_use]
    pub fn full_request_url(&self) -> String {
        self.request.uri().to_string()
    }

    /// First value of a query or form parameter.
    #[must_use]
    pub fn request_parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn request_header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn request_cookie(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn response(&self) -> &WebResponse {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut WebResponse {
        &mut self.response
    }

    #[must_use]
    pub fn into_response(self) -> WebResponse {
        self.response
    }

    #[must_use]
    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.session_store)
    }

    /// Session id assigned to this request by the session store, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn set_session_id(&mut self, id: Option<String>) {
        self.session_id = id;
    }

    #[must_use]
    pub fn security(&self) -> &SecurityEnvironment {
        &self.security
    }

    /// Profiles saved during this request.
    #[must_use]
    pub fn request_profiles(&self) -> Option<&ProfileMap> {
        self.profiles.as_ref()
    }

    pub fn set_request_profiles(&mut self, profiles: ProfileMap) {
        self.profiles = Some(profiles);
    }

    pub fn clear_request_profiles(&mut self) {
        self.profiles = None;
    }

    #[must_use]
    pub fn session_get(&self, key: &str) -> Option<Value> {
        self.session_store.get(self, key)
    }

    /// # Errors
    ///
    /// Propagates the session store's error.
    pub fn session_set(&mut self, key: &str, value: Value) -> Result<(), CallbackError> {
        let store = Arc::clone(&self.session_store);
        store.set(self, key, value)
    }

    pub fn session_remove(&mut self, key: &str) -> Option<Value> {
        let store = Arc::clone(&self.session_store);
        store.remove(self, key)
    }

    /// Write `action` to the response.
    ///
    /// # Errors
    ///
    /// Returns `Technical` if the action's location is not a valid header
    /// value.
    pub fn apply_action(&mut self, action: &HttpAction) -> Result<(), CallbackError> {
        self.response.set_status(action.status());
        if let Some(location) = action.location() {
            self.response.set_header(LOCATION, location)?;
        }
        if let Some(body) = action.body() {
            self.response.set_body(body);
        }
        Ok(())
    }
}

impl fmt::Debug for WebContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebContext")
            .field("method", self.request.method())
            .field("uri", self.request.uri())
            .field("session_id", &self.session_id)
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

fn parse_parameters(request: &Request<Bytes>) -> Vec<(String, String)> {
    let mut parameters: Vec<(String, String)> = request
        .uri()
        .query()
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();

    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));
    if is_form {
        let form: Vec<(String, String)> =
            serde_urlencoded::from_bytes(request.body()).unwrap_or_default();
        parameters.extend(form);
    }

    parameters
}

/// The response a callback builds.
#[derive(Debug, Clone)]
pub struct WebResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<String>,
}

impl Default for WebResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl WebResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header(LOCATION.as_str())
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn set_body(&mut self, body: &str) {
        self.body = Some(body.to_owned());
    }

    /// # Errors
    ///
    /// Returns `Technical` if `value` is not a valid header value.
    pub fn set_header(&mut self, name: HeaderName, value: &str) -> Result<(), CallbackError> {
        let value = header_value(&name, value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Set a session cookie. An earlier `Set-Cookie` for the same name is
    /// replaced; cookies of other names are kept.
    ///
    /// # Errors
    ///
    /// Returns `Technical` if the cookie does not form a valid header value.
    pub fn set_cookie(&mut self, name: &str, value: &str) -> Result<(), CallbackError> {
        let cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax");
        let value = header_value(&SET_COOKIE, &cookie)?;
        let prefix = format!("{name}=");
        let kept: Vec<HeaderValue> = self
            .headers
            .get_all(SET_COOKIE)
            .iter()
            .filter(|v| !v.as_bytes().starts_with(prefix.as_bytes()))
            .cloned()
            .collect();
        self.headers.remove(SET_COOKIE);
        for other in kept {
            self.headers.append(SET_COOKIE, other);
        }
        self.headers.append(SET_COOKIE, value);
        Ok(())
    }

    /// `Set-Cookie` values, in the order they were added.
    pub fn cookies(&self) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
    }
}

fn header_value(name: &HeaderName, value: &str) -> Result<HeaderValue, CallbackError> {
    HeaderValue::from_str(value)
        .map_err(|e| CallbackError::Technical(format!("invalid {name} header value: {e}")))
}

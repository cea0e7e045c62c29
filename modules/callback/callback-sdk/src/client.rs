//! Protocol client trait implemented by engine plugins.

use async_trait::async_trait;
use authbridge_security::Profile;

use crate::action::{Flow, HttpAction};
use crate::context::WebContext;
use crate::error::ClientError;

/// A client of the authentication engine that logs users in through a
/// redirect to an identity provider (OAuth, CAS, SAML, ...).
#[async_trait]
pub trait IndirectClient: Send + Sync {
    /// Unique client name, matched against the callback's client-name
    /// parameter.
    fn name(&self) -> &str;

    /// The action sending the browser to the identity provider's login page.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the login URL cannot be built.
    fn redirect_action(&self, ctx: &WebContext) -> Result<HttpAction, ClientError>;

    /// Validate the credentials carried by the callback request and build
    /// the user's profile.
    ///
    /// `Continue(None)` means the callback carried no usable credentials;
    /// `Action` means the client needs a response sent instead.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` when the identity provider could not be reached
    /// or answered with something unusable.
    async fn user_profile(&self, ctx: &WebContext) -> Result<Flow<Option<Profile>>, ClientError>;
}

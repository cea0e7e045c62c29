//! `IndirectClient` implementation for the static client.

use async_trait::async_trait;
use authbridge_security::Profile;
use callback_sdk::{ClientError, Flow, HttpAction, IndirectClient, WebContext};

use super::service::StaticClient;

#[async_trait]
impl IndirectClient for StaticClient {
    fn name(&self) -> &str {
        &self.name
    }

    fn redirect_action(&self, _ctx: &WebContext) -> Result<HttpAction, ClientError> {
        Ok(HttpAction::redirect(&self.login_url))
    }

    async fn user_profile(&self, ctx: &WebContext) -> Result<Flow<Option<Profile>>, ClientError> {
        let code = match ctx.request_parameter(&self.code_parameter) {
            Some(code) if !code.is_empty() => code,
            _ => {
                tracing::debug!(client = %self.name, "callback without code");
                return Ok(Flow::Action(HttpAction::unauthorized()));
            }
        };

        let profile = self.resolve(code);
        if profile.is_none() {
            tracing::warn!(client = %self.name, "callback code not recognized");
        }
        Ok(Flow::Continue(profile))
    }
}

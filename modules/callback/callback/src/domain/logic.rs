//! Default completion delegate.

use std::sync::Arc;

use async_trait::async_trait;
use authbridge_security::Profile;
use callback_sdk::{
    CallbackError, CallbackLogic, CallbackOptions, Flow, HttpAction, HttpActionAdapter,
    IndirectClient, REQUESTED_URL_SESSION_KEY, SecurityConfig, WebContext,
};
use http::{HeaderValue, Method};

use super::populator::populate_subject;
use super::profile_manager::ProfileManager;

/// Completes the callback of an indirect client.
///
/// 1. finds the client the callback belongs to
/// 2. asks it for the user's profile
/// 3. saves the profile and logs the native subject in
/// 4. redirects to the URL the user originally asked for
#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeCallbackLogic;

impl BridgeCallbackLogic {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn save_and_login(
        ctx: &mut WebContext,
        profile: Profile,
        options: &CallbackOptions,
    ) -> Result<(), CallbackError> {
        let profiles = ProfileManager::new(ctx).save(
            options.save_in_session,
            profile,
            options.multi_profile,
        )?;

        let level = populate_subject(Some(&profiles), ctx.security()).await?;
        tracing::info!(trust = %level, "callback login completed");

        if options.renew_session {
            let store = ctx.session_store();
            if store.renew_session(ctx)? {
                tracing::debug!("session renewed after login");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CallbackLogic for BridgeCallbackLogic {
    #[tracing::instrument(skip_all, fields(client))]
    async fn perform(
        &self,
        ctx: &mut WebContext,
        config: &SecurityConfig,
        adapter: &dyn HttpActionAdapter,
        options: &CallbackOptions,
    ) -> Result<HttpAction, CallbackError> {
        let client = find_client(ctx, config, options)?;
        tracing::Span::current().record("client", client.name());

        let flow = client
            .user_profile(ctx)
            .await
            .map_err(|source| CallbackError::Client {
                client: client.name().to_owned(),
                source,
            })?;

        let action = match flow {
            Flow::Action(action) => {
                tracing::debug!(%action, "client answered with an HTTP action");
                action
            }
            Flow::Continue(Some(profile)) => {
                Self::save_and_login(ctx, profile, options).await?;
                redirect_to_original_url(ctx, options)
            }
            Flow::Continue(None) => {
                tracing::debug!("callback carried no usable credentials");
                redirect_to_original_url(ctx, options)
            }
        };

        ctx.apply_action(&action)?;
        adapter.adapt(&action, ctx);
        Ok(action)
    }
}

/// The client named by the callback request, checked against the
/// filter's restriction. Without a name in the request, the restriction or
/// the only registered client is used.
fn find_client(
    ctx: &WebContext,
    config: &SecurityConfig,
    options: &CallbackOptions,
) -> Result<Arc<dyn IndirectClient>, CallbackError> {
    let clients = config.clients();
    let requested = ctx.request_parameter(clients.client_name_parameter());

    let name = match (requested, options.client.as_deref()) {
        (Some(requested), Some(restricted)) if !requested.eq_ignore_ascii_case(restricted) => {
            return Err(CallbackError::Technical(format!(
                "callback for client '{requested}' but only '{restricted}' is accepted here"
            )));
        }
        (Some(name), _) | (None, Some(name)) => name,
        (None, None) => {
            let mut names = clients.names();
            match (names.next(), names.next()) {
                (Some(only), None) => only,
                _ => {
                    return Err(CallbackError::Technical(format!(
                        "callback request has no '{}' parameter and no default client",
                        clients.client_name_parameter()
                    )));
                }
            }
        }
    };

    clients
        .find(name)
        .ok_or_else(|| CallbackError::Technical(format!("unknown client '{name}'")))
}

/// Redirect to the URL saved before the login started (consuming it), else
/// to the default URL, else to `/`. A URL that cannot be sent as a
/// `Location` header is skipped.
fn redirect_to_original_url(ctx: &mut WebContext, options: &CallbackOptions) -> HttpAction {
    let requested = ctx
        .session_remove(REQUESTED_URL_SESSION_KEY)
        .and_then(|value| value.as_str().map(str::to_owned))
        .filter(|url| is_valid_location(url, "requested URL"));
    let location = requested
        .as_deref()
        .or_else(|| {
            Some(options.default_url_or_root())
                .filter(|url| is_valid_location(url, "default URL"))
        })
        .unwrap_or("/");

    if *ctx.method() == Method::POST {
        HttpAction::see_other(location)
    } else {
        HttpAction::redirect(location)
    }
}

fn is_valid_location(url: &str, what: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    let valid = HeaderValue::from_str(url).is_ok();
    if !valid {
        tracing::warn!(what, "ignoring redirect target that is not a valid Location header");
    }
    valid
}

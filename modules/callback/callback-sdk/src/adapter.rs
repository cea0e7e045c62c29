use crate::action::HttpAction;
use crate::context::WebContext;

/// Hook through which the embedding application observes (and may further
/// translate) the action a callback ended with.
///
/// The action has already been written to the context's response when
/// `adapt` is called.
pub trait HttpActionAdapter: Send + Sync {
    fn adapt(&self, action: &HttpAction, ctx: &mut WebContext);
}

/// Adapter that leaves the response untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopHttpActionAdapter;

impl HttpActionAdapter for NopHttpActionAdapter {
    fn adapt(&self, _action: &HttpAction, _ctx: &mut WebContext) {}
}

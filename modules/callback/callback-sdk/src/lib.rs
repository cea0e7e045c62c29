#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Callback SDK
//!
//! Contracts between the callback bridge, the authentication engine and the
//! native security layer:
//!
//! - [`CallbackLogic`] - completes an indirect login on the callback request
//! - [`IndirectClient`] - one protocol client of the engine (OAuth, CAS, ...)
//! - [`HttpActionAdapter`] - lets the embedding application observe actions
//! - [`SessionStore`] - per-request session storage
//! - [`Subject`], [`SecurityManager`], [`Realm`] - the native security layer
//! - [`WebContext`] - request-scoped context the above operate on
//! - [`CallbackError`] - error types
//!
//! ## Usage
//!
//! ```ignore
//! use callback_sdk::{CallbackLogic, CallbackOptions, NopHttpActionAdapter, WebContext};
//!
//! let mut ctx = WebContext::new(request, session_store, security);
//! let action = logic
//!     .perform(&mut ctx, &config, &NopHttpActionAdapter, &CallbackOptions::default())
//!     .await?;
//! ```

pub mod action;
pub mod adapter;
pub mod api;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod native;
pub mod session;

// Re-export main types at crate root
pub use action::{Flow, HttpAction};
pub use adapter::{HttpActionAdapter, NopHttpActionAdapter};
pub use api::CallbackLogic;
pub use client::IndirectClient;
pub use config::{Clients, SecurityConfig};
pub use context::{WebContext, WebResponse};
pub use error::{CallbackError, ClientError, LoginError, RealmError};
pub use models::{
    CallbackOptions, DEFAULT_CLIENT_NAME_PARAMETER, DEFAULT_URL, PROFILES_SESSION_KEY,
    REQUESTED_URL_SESSION_KEY,
};
pub use native::{Realm, SecurityEnvironment, SecurityManager, Subject};
pub use session::SessionStore;

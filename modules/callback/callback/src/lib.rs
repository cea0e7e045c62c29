//! Callback Module
//!
//! Finishes indirect (redirect-based) logins on the callback URL and turns
//! the resulting profiles into a logged-in native subject.
//!
//! - [`CallbackFilter`] - adapts one callback request and delegates to a
//!   [`callback_sdk::CallbackLogic`]
//! - [`BridgeCallbackLogic`] - the default delegate
//! - [`populate_subject`] - trust classification, native login and realm
//!   cache invalidation
//! - [`InMemorySessionStore`] - default session storage
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod filter;

pub use config::CallbackFilterConfig;
pub use domain::{BridgeCallbackLogic, InMemorySessionStore, ProfileManager, populate_subject};
pub use filter::{CallbackFilter, CallbackOutcome};

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Client Plugin
//!
//! An indirect client that needs no identity provider: the callback's `code`
//! parameter is mapped to a configured identity. Meant for development and
//! testing of the callback flow.
//!
//! ## Modes
//!
//! - **`accept_all`** (default): any non-empty code logs in the default
//!   identity.
//! - **`static_codes`**: specific codes map to specific identities; unknown
//!   codes carry no credentials.
//!
//! A callback without a code is answered with `401 Unauthorized`.
//!
//! ## Configuration
//!
//! ```yaml
//! name: StaticClient
//! login_url: /static-login
//! mode: static_codes
//! code_parameter: code
//! default_identity:
//!   id: dev-user
//!   roles: ["user"]
//! codes:
//!   - code: alice-code
//!     identity:
//!       id: alice
//!       roles: ["admin"]
//!       attributes:
//!         email: alice@example.com
//!   - code: bob-remembered
//!     identity:
//!       id: bob
//!       remembered: true
//! ```

pub mod config;
pub mod domain;

pub use config::{CodeMapping, ConfigError, IdentityConfig, StaticClientConfig, StaticClientMode};
pub use domain::StaticClient;

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Identity model shared by the callback bridge and the native security layer.
//!
//! - [`Profile`] - one authenticated identity issued by one client
//! - [`ProfileMap`] - ordered client-name to profile mapping
//! - [`PrincipalCollection`] - the principals a subject is logged in as
//! - [`AuthenticationToken`] - what the bridge hands to a native login
//! - [`TrustLevel`] - classification of a profile set

pub mod principal;
pub mod profile;
pub mod profile_map;
pub mod token;
pub mod trust;

pub use principal::{Principal, PrincipalCollection};
pub use profile::{ANONYMOUS_CLIENT_NAME, Profile, ProfileBuilder};
pub use profile_map::{ProfileMap, ProfileMapError};
pub use token::AuthenticationToken;
pub use trust::{Authorizer, IsFullyAuthenticated, IsRemembered, TrustLevel};

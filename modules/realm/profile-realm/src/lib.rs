#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Profile Realm
//!
//! A native security layer fitting the bridge's contracts:
//!
//! - [`ProfileRealm`] - authenticates profile tokens and caches the
//!   authorization info of each principal collection
//! - [`RealmSecurityManager`] - owns the realms and authenticates tokens
//! - [`RequestSubject`] - the subject of one request
//!
//! ## Usage
//!
//! ```ignore
//! let realm = Arc::new(ProfileRealm::new("profiles"));
//! let manager = Arc::new(RealmSecurityManager::new(vec![realm.clone()]));
//!
//! // per request
//! let security = manager.environment();
//! filter.handle(request, security).await?;
//! ```

pub mod manager;
pub mod realm;
pub mod subject;

pub use manager::RealmSecurityManager;
pub use realm::{AuthorizationInfo, ProfileRealm};
pub use subject::RequestSubject;

//! Trust classification of a profile set.

use std::fmt;

use crate::profile::Profile;
use crate::profile_map::ProfileMap;

/// Predicate over the flattened profiles of a user.
pub trait Authorizer {
    fn is_authorized(&self, profiles: &[&Profile]) -> bool;
}

/// At least one profile comes from a live, non-remembered authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsFullyAuthenticated;

impl Authorizer for IsFullyAuthenticated {
    fn is_authorized(&self, profiles: &[&Profile]) -> bool {
        profiles
            .iter()
            .any(|p| !p.is_anonymous() && !p.is_remembered())
    }
}

/// At least one profile comes from a remembered authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsRemembered;

impl Authorizer for IsRemembered {
    fn is_authorized(&self, profiles: &[&Profile]) -> bool {
        profiles
            .iter()
            .any(|p| !p.is_anonymous() && p.is_remembered())
    }
}

/// How much a set of profiles can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrustLevel {
    None,
    Remembered,
    FullyAuthenticated,
}

impl TrustLevel {
    /// Classify flattened profiles. A fresh authentication wins over any
    /// number of remembered ones.
    #[must_use]
    pub fn classify(profiles: &[&Profile]) -> Self {
        if IsFullyAuthenticated.is_authorized(profiles) {
            Self::FullyAuthenticated
        } else if IsRemembered.is_authorized(profiles) {
            Self::Remembered
        } else {
            Self::None
        }
    }

    #[must_use]
    pub fn of(profiles: &ProfileMap) -> Self {
        Self::classify(&profiles.flatten())
    }

    /// The remember-me flag a login at this level carries, or `None` when
    /// this level does not warrant a login.
    #[must_use]
    pub fn remember_me(self) -> Option<bool> {
        match self {
            Self::None => None,
            Self::Remembered => Some(true),
            Self::FullyAuthenticated => Some(false),
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Remembered => "remembered",
            Self::FullyAuthenticated => "fully_authenticated",
        })
    }
}

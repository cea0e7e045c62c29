use crate::principal::PrincipalCollection;
use crate::profile::Profile;
use crate::profile_map::ProfileMap;

/// Token passed to the native login: the user's profiles plus whether the
/// login only rests on a remembered (persistent) authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationToken {
    profiles: ProfileMap,
    remembered: bool,
}

impl AuthenticationToken {
    #[must_use]
    pub fn new(profiles: ProfileMap, remembered: bool) -> Self {
        Self {
            profiles,
            remembered,
        }
    }

    #[must_use]
    pub fn profiles(&self) -> &ProfileMap {
        &self.profiles
    }

    #[must_use]
    pub fn is_remember_me(&self) -> bool {
        self.remembered
    }

    /// The profile the subject is primarily identified by.
    #[must_use]
    pub fn principal(&self) -> Option<&Profile> {
        self.profiles.first()
    }

    #[must_use]
    pub fn principals(&self) -> PrincipalCollection {
        PrincipalCollection::from_profiles(&self.profiles)
    }
}

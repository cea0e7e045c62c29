//! Ordered mapping from client name to [`Profile`].

use thiserror::Error;

use crate::profile::Profile;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileMapError {
    #[error("duplicate profile for client '{0}'")]
    DuplicateClient(String),
}

/// Profiles of the current user, one per client, in the order the logins
/// happened.
///
/// Keys are the profiles' client names and are unique. Inserting a profile
/// for a client that is already present replaces it in place.
///
/// Serializes as an ordered list of profiles; deserialization rejects a list
/// holding two profiles of the same client.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(into = "Vec<Profile>", try_from = "Vec<Profile>")]
pub struct ProfileMap {
    entries: Vec<Profile>,
}

impl ProfileMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `profile` under its client name, returning the profile it replaced.
    pub fn insert(&mut self, profile: Profile) -> Option<Profile> {
        match self.position(profile.client_name()) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx], profile)),
            None => {
                self.entries.push(profile);
                None
            }
        }
    }

    pub fn remove(&mut self, client_name: &str) -> Option<Profile> {
        self.position(client_name)
            .map(|idx| self.entries.remove(idx))
    }

    #[must_use]
    pub fn get(&self, client_name: &str) -> Option<&Profile> {
        self.position(client_name).map(|idx| &self.entries[idx])
    }

    #[must_use]
    pub fn contains(&self, client_name: &str) -> bool {
        self.position(client_name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The profile of the earliest login still present.
    #[must_use]
    pub fn first(&self) -> Option<&Profile> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Profile> {
        self.entries.iter()
    }

    pub fn client_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Profile::client_name)
    }

    /// Flatten into a list of profiles, insertion order preserved.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Profile> {
        self.entries.iter().collect()
    }

    fn position(&self, client_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|p| p.client_name() == client_name)
    }
}

impl IntoIterator for ProfileMap {
    type Item = Profile;
    type IntoIter = std::vec::IntoIter<Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProfileMap {
    type Item = &'a Profile;
    type IntoIter = std::slice::Iter<'a, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Later profiles replace earlier ones of the same client.
impl FromIterator<Profile> for ProfileMap {
    fn from_iter<I: IntoIterator<Item = Profile>>(iter: I) -> Self {
        let mut map = Self::new();
        for profile in iter {
            map.insert(profile);
        }
        map
    }
}

impl From<ProfileMap> for Vec<Profile> {
    fn from(map: ProfileMap) -> Self {
        map.entries
    }
}

impl TryFrom<Vec<Profile>> for ProfileMap {
    type Error = ProfileMapError;

    fn try_from(profiles: Vec<Profile>) -> Result<Self, Self::Error> {
        let mut map = Self::new();
        for profile in profiles {
            if map.contains(profile.client_name()) {
                return Err(ProfileMapError::DuplicateClient(
                    profile.client_name().to_owned(),
                ));
            }
            map.entries.push(profile);
        }
        Ok(map)
    }
}

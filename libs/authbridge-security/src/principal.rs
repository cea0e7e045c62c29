use std::fmt;
use std::hash::{Hash, Hasher};

use crate::profile::Profile;
use crate::profile_map::ProfileMap;

/// A single identity a subject is known as, derived from one [`Profile`].
///
/// Roles and permissions are snapshotted from the profile so that realms can
/// compute authorization data from principals alone. Equality and hashing
/// only look at the identity (client name and id), so a principal whose
/// roles changed still matches its cached entries.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Principal {
    client_name: String,
    id: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    permissions: Vec<String>,
}

impl Principal {
    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    #[must_use]
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }
}

impl PartialEq for Principal {
    fn eq(&self, other: &Self) -> bool {
        self.client_name == other.client_name && self.id == other.id
    }
}

impl Eq for Principal {}

impl Hash for Principal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.client_name.hash(state);
        self.id.hash(state);
    }
}

impl From<&Profile> for Principal {
    fn from(profile: &Profile) -> Self {
        Self {
            client_name: profile.client_name().to_owned(),
            id: profile.id().to_owned(),
            roles: profile.roles().to_vec(),
            permissions: profile.permissions().to_vec(),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.client_name, self.id)
    }
}

/// Ordered principals of one subject. The first one is the primary principal.
///
/// Used as the key of realm authorization caches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PrincipalCollection {
    principals: Vec<Principal>,
}

impl PrincipalCollection {
    #[must_use]
    pub fn from_profiles(profiles: &ProfileMap) -> Self {
        Self {
            principals: profiles.iter().map(Principal::from).collect(),
        }
    }

    #[must_use]
    pub fn primary(&self) -> Option<&Principal> {
        self.principals.first()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Principal> {
        self.principals.iter()
    }
}

impl<'a> IntoIterator for &'a PrincipalCollection {
    type Item = &'a Principal;
    type IntoIter = std::slice::Iter<'a, Principal>;

    fn into_iter(self) -> Self::IntoIter {
        self.principals.iter()
    }
}

impl fmt::Display for PrincipalCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, principal) in self.principals.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{principal}")?;
        }
        f.write_str("]")
    }
}

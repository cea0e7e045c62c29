//! Profile persistence across the request and the session.

use authbridge_security::{Profile, ProfileMap};
use callback_sdk::{CallbackError, PROFILES_SESSION_KEY, WebContext};

/// Reads and writes the current user's profiles.
///
/// Profiles saved during a request are always visible to the rest of that
/// request; they outlive it only when saved into the session.
pub struct ProfileManager<'a> {
    ctx: &'a mut WebContext,
}

impl<'a> ProfileManager<'a> {
    #[must_use]
    pub fn new(ctx: &'a mut WebContext) -> Self {
        Self { ctx }
    }

    /// All profiles: those of the request, then (if asked) those of the
    /// session. A session profile replaces a request profile of the same
    /// client.
    ///
    /// # Errors
    ///
    /// Returns `Session` if the stored profiles cannot be read.
    pub fn get_all(&self, read_from_session: bool) -> Result<ProfileMap, CallbackError> {
        let mut profiles = self.ctx.request_profiles().cloned().unwrap_or_default();
        if read_from_session {
            for profile in self.session_profiles()? {
                profiles.insert(profile);
            }
        }
        Ok(profiles)
    }

    /// The first profile, if any.
    ///
    /// # Errors
    ///
    /// Returns `Session` if the stored profiles cannot be read.
    pub fn get(&self, read_from_session: bool) -> Result<Option<Profile>, CallbackError> {
        Ok(self.get_all(read_from_session)?.first().cloned())
    }

    /// Save `profile` and return the resulting profiles.
    ///
    /// With `multi_profile` the profile joins the existing ones (moving to
    /// the end if its client already had one); otherwise it replaces them.
    ///
    /// # Errors
    ///
    /// Returns `Session` if the profiles cannot be read from or written to
    /// the session.
    pub fn save(
        &mut self,
        save_in_session: bool,
        profile: Profile,
        multi_profile: bool,
    ) -> Result<ProfileMap, CallbackError> {
        let mut profiles = if multi_profile {
            let mut all = self.get_all(save_in_session)?;
            all.remove(profile.client_name());
            all
        } else {
            ProfileMap::new()
        };
        profiles.insert(profile);

        if save_in_session {
            let value = serde_json::to_value(&profiles)
                .map_err(|e| CallbackError::Session(format!("cannot store profiles: {e}")))?;
            self.ctx.session_set(PROFILES_SESSION_KEY, value)?;
        }
        self.ctx.set_request_profiles(profiles.clone());

        tracing::debug!(
            clients = ?profiles.client_names().collect::<Vec<_>>(),
            save_in_session,
            "profiles saved"
        );
        Ok(profiles)
    }

    /// Forget the profiles of the request and, if asked, of the session.
    pub fn remove(&mut self, remove_from_session: bool) {
        if remove_from_session {
            self.ctx.session_remove(PROFILES_SESSION_KEY);
        }
        self.ctx.clear_request_profiles();
    }

    fn session_profiles(&self) -> Result<ProfileMap, CallbackError> {
        match self.ctx.session_get(PROFILES_SESSION_KEY) {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| CallbackError::Session(format!("stored profiles are unreadable: {e}"))),
            None => Ok(ProfileMap::new()),
        }
    }
}

//! Turns authenticated profiles into a logged-in native subject.

use authbridge_security::{AuthenticationToken, PrincipalCollection, ProfileMap, TrustLevel};
use callback_sdk::{CallbackError, SecurityEnvironment};

/// Log the request's subject in with `profiles` and invalidate the
/// authorization caches of every cache-capable realm.
///
/// The trust level decides the login:
/// - `FullyAuthenticated`: login with `remember_me = false`
/// - `Remembered`: login with `remember_me = true`
/// - `None`: nothing happens
///
/// Absent or empty profiles leave the subject and every cache untouched.
/// Cache invalidation is best-effort per realm: a failing realm is logged
/// and the remaining realms are still cleared.
///
/// # Errors
///
/// - `Technical` if the login asked for an HTTP action to be sent
/// - `Authentication` if the native layer rejected the login
#[tracing::instrument(skip_all, fields(profiles = profiles.map_or(0, ProfileMap::len)))]
pub async fn populate_subject(
    profiles: Option<&ProfileMap>,
    security: &SecurityEnvironment,
) -> Result<TrustLevel, CallbackError> {
    let Some(profiles) = profiles.filter(|p| !p.is_empty()) else {
        tracing::trace!("no profiles, subject unchanged");
        return Ok(TrustLevel::None);
    };

    let level = TrustLevel::classify(&profiles.flatten());
    let Some(remember_me) = level.remember_me() else {
        tracing::debug!("profiles grant no trust, subject unchanged");
        return Ok(level);
    };

    let token = AuthenticationToken::new(profiles.clone(), remember_me);
    security.subject().login(token).await?;
    tracing::debug!(trust = %level, "subject logged in");

    let principals = security
        .subject()
        .principals()
        .unwrap_or_else(|| PrincipalCollection::from_profiles(profiles));
    clear_authorization_caches(security, &principals);

    Ok(level)
}

fn clear_authorization_caches(security: &SecurityEnvironment, principals: &PrincipalCollection) {
    for realm in security
        .manager()
        .realms()
        .iter()
        .filter(|realm| realm.is_cache_capable())
    {
        match realm.clear_cache(principals) {
            Ok(()) => tracing::trace!(realm = realm.name(), %principals, "authorization cache cleared"),
            Err(e) => tracing::warn!(
                realm = realm.name(),
                %principals,
                error = %e,
                "failed to clear authorization cache"
            ),
        }
    }
}

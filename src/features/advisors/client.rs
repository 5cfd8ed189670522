//! Client wrappers for advisor profile endpoints.

use crate::{
    app_lib::{ApiClient, AppError, bearer},
    features::advisors::types::{AdvisorProfile, AdvisorProfileForm},
};
use secrecy::SecretString;

/// Creates the advisor profile for the token's account.
pub async fn create_profile(
    api: &ApiClient,
    token: &SecretString,
    profile: &AdvisorProfileForm,
) -> Result<(), AppError> {
    api.post_json_empty("/api/advisors/profile", profile, &[bearer(token)])
        .await
}

/// Fetches the advisor profile. Returns `None` when the advisor has not
/// created one yet (404).
pub async fn fetch_profile(
    api: &ApiClient,
    token: &SecretString,
) -> Result<Option<AdvisorProfile>, AppError> {
    match api
        .get_json("/api/advisors/profile", &[], &[bearer(token)])
        .await
    {
        Ok(profile) => Ok(Some(profile)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

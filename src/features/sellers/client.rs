//! Client wrappers for seller profile and match endpoints.

use crate::{
    app_lib::{ApiClient, AppError, bearer},
    features::sellers::types::{SellerMatch, SellerProfile, SellerProfilePayload, SortBy},
};
use secrecy::SecretString;
use serde_json::Value;

pub async fn create_profile(
    api: &ApiClient,
    token: &SecretString,
    payload: &SellerProfilePayload<'_>,
) -> Result<(), AppError> {
    api.post_json_empty("/api/sellers/profile", payload, &[bearer(token)])
        .await
}

pub async fn fetch_profile(api: &ApiClient, token: &SecretString) -> Result<SellerProfile, AppError> {
    api.get_json("/api/sellers/profile", &[], &[bearer(token)])
        .await
}

/// Partially updates the profile with the fields in `payload`.
pub async fn update_profile(
    api: &ApiClient,
    token: &SecretString,
    payload: &SellerProfilePayload<'_>,
) -> Result<(), AppError> {
    let _: Value = api
        .patch_json("/api/sellers/profile", payload, &[bearer(token)])
        .await?;
    Ok(())
}

/// Advisors matching the seller's profile, in the requested order.
pub async fn fetch_matches(
    api: &ApiClient,
    token: &SecretString,
    sort: SortBy,
) -> Result<Vec<SellerMatch>, AppError> {
    api.get_json(
        "/api/sellers/matches",
        &[("sortBy", sort.as_str())],
        &[bearer(token)],
    )
    .await
}

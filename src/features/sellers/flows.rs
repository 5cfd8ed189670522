//! Seller screens: profile creation, the dashboard (profile plus matches) and
//! profile edits made from it.

use super::{
    client,
    types::{SellerMatch, SellerProfile, SellerProfileForm, SortBy},
};
use crate::{
    app_lib::{ApiClient, Notice, Outcome},
    routes::Route,
    session::SessionContext,
};
use serde_json::{Value, json};
use tracing::{instrument, warn};

pub const TRY_AGAIN_LATER: &str = "Something went wrong. Please try again later.";
pub const NO_TOKEN: &str = "No token found, please log in again.";

#[instrument(skip_all)]
pub async fn create_profile(
    api: &ApiClient,
    session: &SessionContext,
    form: &SellerProfileForm,
) -> Outcome {
    let Some(token) = session.access_token() else {
        return Outcome::new()
            .with(Notice::error("Please login first to create profile."))
            .redirect(Route::SellerLogin);
    };
    if let Err(errors) = form.validate_create() {
        return Outcome::invalid(&errors);
    }

    match client::create_profile(api, token, &form.payload()).await {
        Ok(()) => Outcome::new()
            .with(Notice::success(
                "Seller profile created successfully! Redirecting to dashboard...",
            ))
            .redirect(Route::SellerDashboard),
        Err(err) if err.is_transport() => Outcome::new().with(Notice::error(TRY_AGAIN_LATER)),
        Err(err) => Outcome::new().with(Notice::error(
            err.server_message_or("Failed to create profile. Please try again."),
        )),
    }
}

/// Saves dashboard edits and mirrors them into the cached user.
#[instrument(skip_all)]
pub async fn update_profile(
    api: &ApiClient,
    session: &mut SessionContext,
    form: &SellerProfileForm,
) -> Outcome {
    let Some(token) = session.access_token().cloned() else {
        return Outcome::new().with(Notice::error("Unauthorized! Please log in again."));
    };
    if let Err(errors) = form.validate_update() {
        return Outcome::invalid(&errors);
    }

    let payload = form.payload();
    if let Err(err) = client::update_profile(api, &token, &payload).await {
        let message = if err.is_transport() {
            TRY_AGAIN_LATER.to_string()
        } else {
            err.server_message_or("Failed to update profile")
        };
        return Outcome::new().with(Notice::error(message));
    }

    let mut outcome = Outcome::new().with(Notice::success("Seller profile updated successfully"));
    if let Some(mut user) = session.user().cloned() {
        if !form.full_name.trim().is_empty() {
            user.name = form.full_name.trim().to_string();
            user.extra
                .insert("fullName".to_string(), json!(user.name.clone()));
        }
        if let Ok(Value::Object(fields)) = serde_json::to_value(&payload) {
            user.extra.extend(fields);
        }
        if let Err(err) = session.store_user(user) {
            outcome.push(Notice::error(err.to_string()));
        }
    }
    outcome
}

/// Everything the seller dashboard shows. Either half may be missing; each
/// failure adds its own notice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SellerDashboard {
    pub profile: Option<SellerProfile>,
    pub matches: Vec<SellerMatch>,
    pub outcome: Outcome,
}

#[instrument(skip(api, session))]
pub async fn dashboard(api: &ApiClient, session: &SessionContext, sort: SortBy) -> SellerDashboard {
    let Some(token) = session.access_token() else {
        return SellerDashboard {
            outcome: Outcome::new().with(Notice::error(NO_TOKEN)),
            ..SellerDashboard::default()
        };
    };

    let mut view = SellerDashboard::default();

    match client::fetch_profile(api, token).await {
        Ok(profile) => {
            view.profile = Some(profile);
            view.outcome
                .push(Notice::success("Seller profile loaded successfully"));
        }
        Err(err) => {
            warn!("seller profile fetch failed: {err}");
            view.outcome.push(Notice::error(
                err.server_message_or("Failed to fetch seller profile"),
            ));
        }
    }

    match client::fetch_matches(api, token, sort).await {
        Ok(matches) => view.matches = matches,
        Err(err) => {
            warn!("matches fetch failed: {err}");
            view.outcome
                .push(Notice::error(err.server_message_or("Failed to fetch matches")));
        }
    }

    view
}

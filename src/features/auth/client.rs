//! Client wrappers for the auth endpoints. These helpers centralize paths and
//! headers so flows never assemble credentials by hand.

use crate::{
    app_lib::{ApiClient, AppError, bearer},
    features::auth::types::{
        AuthResponse, CsrfTokenResponse, ForgotPasswordRequest, LoginRequest, MessageResponse,
        RegisterRequest, ResetPasswordRequest, UserProfile,
    },
};
use secrecy::SecretString;
use serde_json::json;

/// Logs in with email and password.
/// Must never log the request; it carries the password.
pub async fn login(api: &ApiClient, request: &LoginRequest<'_>) -> Result<AuthResponse, AppError> {
    api.post_json("/api/auth/login", request, &[]).await
}

/// Creates an account. The response may omit tokens until the email is verified.
pub async fn register(
    api: &ApiClient,
    request: &RegisterRequest<'_>,
) -> Result<AuthResponse, AppError> {
    api.post_json("/api/auth/register", request, &[]).await
}

/// Invalidates the session server-side.
pub async fn logout(api: &ApiClient, token: &SecretString) -> Result<(), AppError> {
    api.post_json_empty("/api/auth/logout", &json!({}), &[bearer(token)])
        .await
}

/// Fetches the profile the bearer token belongs to. Also accepts the
/// password-reset and email-verification tokens.
pub async fn fetch_profile(api: &ApiClient, token: &SecretString) -> Result<UserProfile, AppError> {
    api.get_json("/api/auth/profile", &[], &[bearer(token)])
        .await
}

/// Asks the backend for a CSRF token bound to the access token.
pub async fn fetch_csrf_token(
    api: &ApiClient,
    token: &SecretString,
) -> Result<CsrfTokenResponse, AppError> {
    api.get_json("/api/auth/csrf-token", &[], &[bearer(token)])
        .await
}

/// Sends a reset link. The backend answers the same way for unknown emails.
pub async fn forgot_password(
    api: &ApiClient,
    request: &ForgotPasswordRequest<'_>,
) -> Result<MessageResponse, AppError> {
    api.post_json("/api/auth/forgot-password", request, &[])
        .await
}

/// Must never log the request; it carries the reset token and new password.
pub async fn reset_password(
    api: &ApiClient,
    request: &ResetPasswordRequest<'_>,
) -> Result<MessageResponse, AppError> {
    api.post_json("/api/auth/reset-password", request, &[])
        .await
}

pub async fn verify_email(api: &ApiClient, token: &str) -> Result<MessageResponse, AppError> {
    api.get_json("/api/auth/verify-email", &[("token", token)], &[])
        .await
}

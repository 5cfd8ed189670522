//! Auth screens as flows: each validates its form, calls the backend and
//! returns the notices and redirect the screen would show. Failures never
//! escape a flow as errors.

use super::{
    client,
    types::{
        AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
        Role,
    },
};
use crate::{
    app_lib::{ApiClient, AppError, Notice, Outcome},
    routes::Route,
    session::{LoginTokens, SessionContext},
    validation::{self, ValidationErrors, password},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

pub const NETWORK_ERROR: &str = "Network error. Please try again later.";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";
pub const LOGIN_SUCCESS: &str = "Login successful";
pub const VERIFY_EMAIL_FIRST: &str = "Please check your email to verify your account.";
pub const SELLER_UNAUTHORIZED: &str =
    "You are not authorized. Please check your email for the verification link";
pub const ADVISOR_UNAUTHORIZED: &str = "Incorrect email or password";
pub const CSRF_FETCH_FAILED: &str = "Failed to fetch CSRF token";
pub const REGISTER_SUCCESS: &str = "Registration successful! Please check your email to verify.";
pub const RESET_TOKEN_MISSING: &str = "Reset token missing";

#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    /// # Errors
    /// Returns every failed field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("email", validation::email(&self.email));
        errors.check(
            "password",
            password::login_password(self.password.expose_secret()),
        );
        errors.into_result()
    }
}

#[derive(Debug)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub role: Role,
}

impl RegisterForm {
    /// # Errors
    /// Returns every failed field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "firstName",
            validation::required(&self.first_name, "First name is required"),
        );
        errors.check(
            "lastName",
            validation::required(&self.last_name, "Last name is required"),
        );
        errors.check("email", validation::email(&self.email));
        errors.check(
            "password",
            password::registration_password(self.password.expose_secret()),
        );
        errors.into_result()
    }

    /// Display name sent to the backend: trimmed first and last name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

fn secret(value: Option<String>) -> Option<SecretString> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

fn login_tokens(response: AuthResponse) -> LoginTokens {
    LoginTokens {
        access_token: secret(response.access_token),
        refresh_token: secret(response.refresh_token),
        user: response.user,
    }
}

fn storage_failure(err: &AppError) -> Notice {
    Notice::error(err.to_string())
}

/// Shows a login page and submits it. Showing the page clears any previous
/// session, so a failed login always leaves the user logged out.
#[instrument(skip(api, session, form))]
pub async fn login(
    api: &ApiClient,
    session: &mut SessionContext,
    role: Role,
    form: &LoginForm,
) -> Outcome {
    if let Err(err) = session.reset() {
        return Outcome::new().with(storage_failure(&err));
    }
    if let Err(errors) = form.validate() {
        return Outcome::invalid(&errors);
    }

    let request = LoginRequest {
        email: form.email.trim(),
        password: form.password.expose_secret(),
    };
    let result = client::login(api, &request).await;

    match role {
        Role::Seller => seller_login(api, session, result).await,
        Role::Advisor => advisor_login(api, session, result).await,
        Role::Unknown => Outcome::new().with(Notice::error("Choose the seller or advisor login")),
    }
}

async fn seller_login(
    api: &ApiClient,
    session: &mut SessionContext,
    result: Result<AuthResponse, AppError>,
) -> Outcome {
    let response = match result {
        Ok(response) => response,
        Err(err) if err.is_unauthorized() => {
            return Outcome::new().with(Notice::error(SELLER_UNAUTHORIZED));
        }
        Err(err) if err.is_transport() => return Outcome::new().with(Notice::error(NETWORK_ERROR)),
        Err(err) => {
            return Outcome::new().with(Notice::error(err.server_message_or(SOMETHING_WENT_WRONG)));
        }
    };

    let Some(role) = response
        .user
        .as_ref()
        .filter(|user| user.is_email_verified)
        .map(|user| user.role)
    else {
        info!("seller email not verified");
        return Outcome::new().with(Notice::error(VERIFY_EMAIL_FIRST));
    };

    let mut outcome = Outcome::new().with(Notice::success(LOGIN_SUCCESS));
    if let Err(err) = session.store_login(login_tokens(response)) {
        outcome.push(storage_failure(&err));
        return outcome;
    }
    bootstrap_csrf(api, session, &mut outcome).await;

    let destination = match role {
        Role::Seller => Route::SellerDashboard,
        _ => Route::Home,
    };
    outcome.redirect(destination)
}

async fn advisor_login(
    api: &ApiClient,
    session: &mut SessionContext,
    result: Result<AuthResponse, AppError>,
) -> Outcome {
    let response = match result {
        Ok(response) => response,
        Err(err) if err.is_unauthorized() => {
            return Outcome::new().with(Notice::error(ADVISOR_UNAUTHORIZED));
        }
        Err(err) if err.is_transport() => return Outcome::new().with(Notice::error(NETWORK_ERROR)),
        Err(err) => {
            return Outcome::new().with(Notice::error(err.server_message_or(SOMETHING_WENT_WRONG)));
        }
    };

    let mut outcome = Outcome::new().with(Notice::success(LOGIN_SUCCESS));
    if let Err(err) = session.store_login(login_tokens(response)) {
        outcome.push(storage_failure(&err));
        return outcome;
    }
    bootstrap_csrf(api, session, &mut outcome).await;
    outcome.redirect(Route::AdvisorPayments)
}

/// Fetches and stores the CSRF token for the fresh access token. A failure is
/// reported but keeps the login: the user stays signed in, unable to pay.
pub async fn bootstrap_csrf(api: &ApiClient, session: &mut SessionContext, outcome: &mut Outcome) {
    let Some(token) = session.access_token().cloned() else {
        warn!("login response carried no access token");
        outcome.push(Notice::error(CSRF_FETCH_FAILED));
        return;
    };

    match client::fetch_csrf_token(api, &token).await {
        Ok(response) if !response.csrf_token.trim().is_empty() => {
            if let Err(err) = session.store_csrf_token(SecretString::from(response.csrf_token)) {
                outcome.push(storage_failure(&err));
            }
        }
        Ok(_) => outcome.push(Notice::error(CSRF_FETCH_FAILED)),
        Err(err) => {
            warn!("CSRF token fetch failed: {err}");
            outcome.push(Notice::error(err.server_message_or(CSRF_FETCH_FAILED)));
        }
    }
}

#[instrument(skip(api, session, form), fields(role = %form.role))]
pub async fn register(api: &ApiClient, session: &mut SessionContext, form: &RegisterForm) -> Outcome {
    if let Err(errors) = form.validate() {
        return Outcome::invalid(&errors);
    }

    let request = RegisterRequest {
        name: form.full_name(),
        email: form.email.trim(),
        password: form.password.expose_secret(),
        role: form.role,
    };

    match client::register(api, &request).await {
        Ok(response) => {
            let mut outcome = Outcome::new();
            let tokens = login_tokens(response);
            if tokens.access_token.is_some() || tokens.user.is_some() {
                if let Err(err) = session.store_login(tokens) {
                    outcome.push(storage_failure(&err));
                }
            }
            outcome
                .with(Notice::success(REGISTER_SUCCESS))
                .redirect(Route::Continue)
        }
        Err(err) if err.is_transport() => {
            Outcome::new().with(Notice::error("Something went wrong. Try again later."))
        }
        Err(err) => Outcome::new().with(Notice::error(err.server_message_or("Registration failed!"))),
    }
}

/// Best-effort server logout; the local session is cleared either way.
#[instrument(skip_all)]
pub async fn logout(api: &ApiClient, session: &mut SessionContext) -> Outcome {
    let role = session.user().map(|user| user.role);

    if let Some(token) = session.access_token().cloned() {
        if let Err(err) = client::logout(api, &token).await {
            warn!("logout request failed: {err}");
        }
    }

    let mut outcome = Outcome::new();
    match session.clear() {
        Ok(()) => outcome.push(Notice::success("Logged out successfully!")),
        Err(err) => outcome.push(storage_failure(&err)),
    }
    outcome.redirect(Route::login_for(role))
}

#[instrument(skip_all)]
pub async fn forgot_password(api: &ApiClient, email: &str) -> Outcome {
    let mut errors = ValidationErrors::new();
    errors.check("email", validation::email(email));
    if let Err(errors) = errors.into_result() {
        return Outcome::invalid(&errors);
    }

    let request = ForgotPasswordRequest {
        email: email.trim(),
    };
    match client::forgot_password(api, &request).await {
        Ok(response) => Outcome::new()
            .with(Notice::success(
                response
                    .message
                    .unwrap_or_else(|| "Reset link sent to your email".to_string()),
            ))
            .redirect(Route::SellerLogin),
        Err(err) if err.is_transport() => Outcome::new().with(Notice::error(NETWORK_ERROR)),
        Err(err) => Outcome::new().with(Notice::error(err.server_message_or(SOMETHING_WENT_WRONG))),
    }
}

/// Email of the account a reset token belongs to; the token doubles as a
/// bearer credential for the profile endpoint.
///
/// # Errors
/// Returns the notice to show when the lookup fails.
pub async fn reset_account_email(
    api: &ApiClient,
    session: &SessionContext,
) -> Result<String, Notice> {
    let token = session
        .reset_token()
        .ok_or_else(|| Notice::error(RESET_TOKEN_MISSING))?;

    match client::fetch_profile(api, token).await {
        Ok(profile) => Ok(profile.email),
        Err(err) if err.is_transport() => Err(Notice::error("Network error while fetching profile")),
        Err(_) => Err(Notice::error("Failed to fetch email from token")),
    }
}

/// Submits a new password. A `token` from the reset link replaces any token
/// held from earlier in the process.
#[instrument(skip_all)]
pub async fn reset_password(
    api: &ApiClient,
    session: &mut SessionContext,
    token: Option<SecretString>,
    new_password: &SecretString,
) -> Outcome {
    if let Some(token) = token {
        session.set_reset_token(token);
    }
    let Some(token) = session.reset_token().cloned() else {
        return Outcome::new().with(Notice::error(RESET_TOKEN_MISSING));
    };

    let mut errors = ValidationErrors::new();
    errors.check(
        "newPassword",
        password::reset_password(new_password.expose_secret()),
    );
    if let Err(errors) = errors.into_result() {
        return Outcome::invalid(&errors);
    }

    let request = ResetPasswordRequest {
        token: token.expose_secret(),
        new_password: new_password.expose_secret(),
    };
    match client::reset_password(api, &request).await {
        Ok(response) => {
            session.clear_reset_token();
            Outcome::new()
                .with(Notice::success(
                    response
                        .message
                        .unwrap_or_else(|| "Password reset successful".to_string()),
                ))
                .with(Notice::info("Please go back to login page to sign in"))
        }
        Err(err) if err.is_transport() => Outcome::new().with(Notice::error(NETWORK_ERROR)),
        Err(err) => {
            Outcome::new().with(Notice::error(err.server_message_or("Failed to reset password")))
        }
    }
}

/// Confirms an email from the verification link, then caches the profile the
/// link's token belongs to.
#[instrument(skip_all)]
pub async fn verify_email(api: &ApiClient, session: &mut SessionContext, token: &str) -> Outcome {
    let token = token.trim();
    if token.is_empty() {
        return Outcome::new().with(Notice::error("Verification token missing"));
    }

    let mut outcome = match client::verify_email(api, token).await {
        Ok(response) if response.success == Some(true) => Outcome::new().with(Notice::success(
            response
                .message
                .unwrap_or_else(|| "Email verified successfully".to_string()),
        )),
        Ok(response) => {
            return Outcome::new().with(Notice::error(
                response
                    .message
                    .unwrap_or_else(|| "Email verification failed".to_string()),
            ));
        }
        Err(err) if err.is_transport() => {
            return Outcome::new().with(Notice::error(
                "Something went wrong while verifying email or fetching profile",
            ));
        }
        Err(err) => {
            return Outcome::new().with(Notice::error(
                err.server_message_or("Email verification failed"),
            ));
        }
    };

    let bearer = SecretString::from(token);
    match client::fetch_profile(api, &bearer).await {
        Ok(profile) => {
            let role = profile.role;
            if let Err(err) = session.store_user(profile) {
                outcome.push(storage_failure(&err));
            }
            let destination = match role {
                Role::Seller => Route::VerifyEmail,
                _ => Route::AdvisorPayments,
            };
            outcome.redirect(destination)
        }
        Err(err) => {
            warn!("profile fetch after verification failed: {err}");
            outcome.with(Notice::error("Failed to fetch profile"))
        }
    }
}

//! Route guard. UX only: it keeps users off pages they cannot use, while the
//! backend still authorizes every request.
//!
//! The decision is a pure function of the route requirement and the profile
//! just fetched. The guard never writes to the session, and every failure to
//! obtain a profile is treated as "not logged in".

use super::{Route, RouteRequirement};
use crate::{
    app_lib::ApiClient,
    features::auth::{client::fetch_profile, types::Role, types::UserProfile},
    session::SessionContext,
};
use std::future::Future;
use tracing::{debug, instrument, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Render,
    Redirect(Route),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardStatus {
    /// Profile fetch in flight.
    Loading,
    Resolved(Decision),
}

/// Roles whose protected pages can also demand a completed payment, and where
/// an unpaid user of that role is sent.
struct PaymentRule {
    role: Role,
    satisfied: fn(&UserProfile) -> bool,
    redirect: Route,
}

fn payment_verified(profile: &UserProfile) -> bool {
    profile.is_payment_verified
}

const PAYMENT_RULES: &[PaymentRule] = &[PaymentRule {
    role: Role::Advisor,
    satisfied: payment_verified,
    redirect: Route::AdvisorPayments,
}];

/// Decides whether a page with `requirement` renders for `profile`.
/// `None` means there is no usable profile: no token, or the fetch failed.
#[must_use]
pub fn evaluate(requirement: RouteRequirement, profile: Option<&UserProfile>) -> Decision {
    let Some(profile) = profile else {
        return Decision::Redirect(Route::login_for(requirement.required_role));
    };

    if let Some(required) = requirement.required_role {
        if profile.role != required {
            return Decision::Redirect(Route::dashboard_for(profile.role));
        }
    }

    if requirement.requires_payment {
        let unpaid = PAYMENT_RULES
            .iter()
            .find(|rule| rule.role == profile.role && !(rule.satisfied)(profile));
        if let Some(rule) = unpaid {
            return Decision::Redirect(rule.redirect);
        }
    }

    Decision::Render
}

#[derive(Clone, Copy, Debug)]
pub struct RouteGuard<'a> {
    api: &'a ApiClient,
}

impl<'a> RouteGuard<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// State before any request is made. Without a token the redirect is
    /// known immediately; otherwise the guard is loading.
    #[must_use]
    pub fn initial_status(requirement: RouteRequirement, session: &SessionContext) -> GuardStatus {
        if session.is_authenticated() {
            GuardStatus::Loading
        } else {
            GuardStatus::Resolved(evaluate(requirement, None))
        }
    }

    /// Fetches a fresh profile and evaluates `requirement` against it.
    #[instrument(skip(self, session))]
    pub async fn check(&self, requirement: RouteRequirement, session: &SessionContext) -> Decision {
        let Some(token) = session.access_token() else {
            debug!("no access token, skipping profile fetch");
            return evaluate(requirement, None);
        };

        let profile = match fetch_profile(self.api, token).await {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!("profile fetch failed: {err}");
                None
            }
        };

        let decision = evaluate(requirement, profile.as_ref());
        debug!(?decision, "guard resolved");
        decision
    }

    /// Same as `check`, abandoned with `None` if `cancel` completes first
    /// (the user navigated away).
    pub async fn check_until<F>(
        &self,
        requirement: RouteRequirement,
        session: &SessionContext,
        cancel: F,
    ) -> Option<Decision>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            decision = self.check(requirement, session) => Some(decision),
            () = cancel => {
                debug!("guard check cancelled");
                None
            }
        }
    }

    /// Public routes always render.
    pub async fn check_route(&self, route: Route, session: &SessionContext) -> Decision {
        match route.requirement() {
            Some(requirement) => self.check(requirement, session).await,
            None => Decision::Render,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::{AppConfig, AppError};
    use crate::session::LoginTokens;
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn profile(role: &str, paid: bool) -> UserProfile {
        serde_json::from_value(json!({"role": role, "isPaymentVerified": paid}))
            .expect("valid profile")
    }

    fn api_for(server: &MockServer) -> Result<ApiClient, AppError> {
        ApiClient::new(&AppConfig {
            api_base_url: server.uri(),
            ..AppConfig::default()
        })
    }

    fn logged_in() -> Result<SessionContext, AppError> {
        let mut session = SessionContext::in_memory();
        session.store_login(LoginTokens {
            access_token: Some(SecretString::from("at")),
            ..LoginTokens::default()
        })?;
        Ok(session)
    }

    async fn profile_server(status: u16, body: Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .and(header("authorization", "Bearer at"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn evaluate_without_profile_goes_to_login() {
        assert_eq!(
            evaluate(RouteRequirement::role(Role::Seller), None),
            Decision::Redirect(Route::SellerLogin)
        );
        assert_eq!(
            evaluate(RouteRequirement::paid(Role::Advisor), None),
            Decision::Redirect(Route::AdvisorLogin)
        );
        assert_eq!(
            evaluate(RouteRequirement::default(), None),
            Decision::Redirect(Route::Home)
        );
    }

    #[test]
    fn evaluate_role_mismatch_goes_to_actual_dashboard() {
        assert_eq!(
            evaluate(
                RouteRequirement::role(Role::Advisor),
                Some(&profile("seller", false))
            ),
            Decision::Redirect(Route::SellerDashboard)
        );
        assert_eq!(
            evaluate(
                RouteRequirement::role(Role::Seller),
                Some(&profile("advisor", true))
            ),
            Decision::Redirect(Route::AdvisorDashboard)
        );
        assert_eq!(
            evaluate(
                RouteRequirement::role(Role::Seller),
                Some(&profile("buyer", true))
            ),
            Decision::Redirect(Route::Home)
        );
    }

    #[test]
    fn evaluate_payment_only_applies_to_advisors() {
        let unpaid_advisor = profile("advisor", false);
        assert_eq!(
            evaluate(RouteRequirement::paid(Role::Advisor), Some(&unpaid_advisor)),
            Decision::Redirect(Route::AdvisorPayments)
        );
        assert_eq!(
            evaluate(RouteRequirement::role(Role::Advisor), Some(&unpaid_advisor)),
            Decision::Render
        );

        let unpaid_seller = profile("seller", false);
        let paid_for_seller = RouteRequirement {
            required_role: Some(Role::Seller),
            requires_payment: true,
        };
        assert_eq!(
            evaluate(paid_for_seller, Some(&unpaid_seller)),
            Decision::Render
        );
    }

    #[tokio::test]
    async fn no_token_never_fetches_profile() -> Result<(), AppError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"role": "advisor"})))
            .expect(0)
            .mount(&server)
            .await;

        let api = api_for(&server)?;
        let session = SessionContext::in_memory();
        let requirement = RouteRequirement::paid(Role::Advisor);

        assert_eq!(
            RouteGuard::initial_status(requirement, &session),
            GuardStatus::Resolved(Decision::Redirect(Route::AdvisorLogin))
        );
        assert_eq!(
            RouteGuard::new(&api).check(requirement, &session).await,
            Decision::Redirect(Route::AdvisorLogin)
        );
        Ok(())
    }

    #[tokio::test]
    async fn token_present_starts_loading() -> Result<(), AppError> {
        let session = logged_in()?;
        assert_eq!(
            RouteGuard::initial_status(RouteRequirement::role(Role::Seller), &session),
            GuardStatus::Loading
        );
        Ok(())
    }

    #[tokio::test]
    async fn renders_only_when_role_and_payment_match() -> Result<(), AppError> {
        // (profile role, payment verified, expected decision) for a paid advisor page.
        let cases = [
            ("advisor", true, Decision::Render),
            ("advisor", false, Decision::Redirect(Route::AdvisorPayments)),
            ("seller", true, Decision::Redirect(Route::SellerDashboard)),
            ("seller", false, Decision::Redirect(Route::SellerDashboard)),
        ];
        let session = logged_in()?;

        for (role, paid, expected) in cases {
            let server =
                profile_server(200, json!({"role": role, "isPaymentVerified": paid})).await;
            let api = api_for(&server)?;
            let decision = RouteGuard::new(&api)
                .check(RouteRequirement::paid(Role::Advisor), &session)
                .await;
            assert_eq!(decision, expected, "role={role} paid={paid}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_profile_redirects_like_missing_token() -> Result<(), AppError> {
        let server = profile_server(401, json!({"message": "jwt expired"})).await;
        let api = api_for(&server)?;
        let session = logged_in()?;

        let decision = RouteGuard::new(&api)
            .check(RouteRequirement::role(Role::Seller), &session)
            .await;

        assert_eq!(decision, Decision::Redirect(Route::SellerLogin));
        assert!(session.is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn network_error_redirects_like_missing_token() -> Result<(), AppError> {
        // Nothing listens on port 1.
        let api = ApiClient::new(&AppConfig {
            api_base_url: "http://127.0.0.1:1".to_string(),
            ..AppConfig::default()
        })?;
        let session = logged_in()?;

        let decision = RouteGuard::new(&api)
            .check(RouteRequirement::paid(Role::Advisor), &session)
            .await;

        assert_eq!(decision, Decision::Redirect(Route::AdvisorLogin));
        Ok(())
    }

    #[tokio::test]
    async fn public_routes_render_without_fetch() -> Result<(), AppError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        let api = api_for(&server)?;
        let session = logged_in()?;

        assert_eq!(
            RouteGuard::new(&api)
                .check_route(Route::ForgotPassword, &session)
                .await,
            Decision::Render
        );
        Ok(())
    }

    #[tokio::test]
    async fn advisor_pages_render_before_payment() -> Result<(), AppError> {
        let server =
            profile_server(200, json!({"role": "advisor", "isPaymentVerified": false})).await;
        let api = api_for(&server)?;
        let session = logged_in()?;
        let guard = RouteGuard::new(&api);

        for route in [
            Route::AdvisorDashboard,
            Route::AdvisorPayments,
            Route::AdvisorForm,
            Route::AdvisorUpload,
        ] {
            assert_eq!(guard.check_route(route, &session).await, Decision::Render, "{route}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn profile_without_role_passes_roleless_requirement() -> Result<(), AppError> {
        let server = profile_server(200, json!({"email": "ada@firm.com"})).await;
        let api = api_for(&server)?;
        let session = logged_in()?;
        let guard = RouteGuard::new(&api);

        assert_eq!(
            guard.check(RouteRequirement::default(), &session).await,
            Decision::Render
        );
        assert_eq!(
            guard.check(RouteRequirement::role(Role::Seller), &session).await,
            Decision::Redirect(Route::Home)
        );
        Ok(())
    }

    #[tokio::test]
    async fn cancelled_check_yields_no_decision() -> Result<(), AppError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"role": "seller"}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        let api = api_for(&server)?;
        let session = logged_in()?;
        let guard = RouteGuard::new(&api);

        let cancelled = guard
            .check_until(
                RouteRequirement::role(Role::Seller),
                &session,
                tokio::time::sleep(Duration::from_millis(50)),
            )
            .await;
        assert_eq!(cancelled, None);
        Ok(())
    }

    #[tokio::test]
    async fn uncancelled_check_completes() -> Result<(), AppError> {
        let server = profile_server(200, json!({"role": "seller"})).await;
        let api = api_for(&server)?;
        let session = logged_in()?;

        let decision = RouteGuard::new(&api)
            .check_until(
                RouteRequirement::role(Role::Seller),
                &session,
                std::future::pending(),
            )
            .await;
        assert_eq!(decision, Some(Decision::Render));
        Ok(())
    }
}

//! Advisor screens: profile form, upload screen and dashboard.

use super::{
    client,
    types::{AdvisorProfile, AdvisorProfileForm, Testimonial, TestimonialUpload, check_testimonials},
};
use crate::{
    app_lib::{ApiClient, AppError, Notice, Outcome},
    features::{
        auth::{self, Role, UserProfile},
        uploads::{self, UploadFile},
    },
    routes::Route,
    session::SessionContext,
    validation::ValidationErrors,
};
use secrecy::SecretString;
use tracing::{debug, instrument, warn};

pub const NOT_LOGGED_IN: &str = "Please login first to create profile.";
pub const PROFILE_CREATED: &str = "Advisor profile created successfully!";
pub const PROFILE_CREATED_REDIRECT: &str =
    "Advisor profile created successfully! Redirecting to dashboard...";

fn require_token(session: &SessionContext) -> Result<SecretString, Outcome> {
    session.access_token().cloned().ok_or_else(|| {
        Outcome::new()
            .with(Notice::error(NOT_LOGGED_IN))
            .redirect(Route::AdvisorLogin)
    })
}

/// Submits the profile form directly, with an optional logo.
#[instrument(skip_all)]
pub async fn submit_profile(
    api: &ApiClient,
    session: &SessionContext,
    mut form: AdvisorProfileForm,
    logo: Option<UploadFile>,
) -> Outcome {
    let token = match require_token(session) {
        Ok(token) => token,
        Err(outcome) => return outcome,
    };
    if let Err(errors) = form.validate() {
        return Outcome::invalid(&errors);
    }

    let result = async {
        if let Some(logo) = logo {
            form.logo_url = Some(uploads::upload_logo(api, &token, logo).await?);
        }
        client::create_profile(api, &token, &form).await
    }
    .await;

    match result {
        Ok(()) => Outcome::new()
            .with(Notice::success(PROFILE_CREATED))
            .redirect(Route::AdvisorDashboard),
        Err(err) => {
            warn!("advisor profile submission failed: {err}");
            Outcome::new().with(Notice::error("Error submitting form"))
        }
    }
}

/// Upload screen: uploads the logo and every complete testimonial's PDF,
/// merges them into the draft from the profile form and creates the profile.
/// Started-but-incomplete rows are rejected; empty rows are dropped.
#[instrument(skip_all, fields(testimonials = testimonials.len()))]
pub async fn upload_and_submit(
    api: &ApiClient,
    session: &SessionContext,
    draft: AdvisorProfileForm,
    logo: Option<UploadFile>,
    testimonials: Vec<TestimonialUpload>,
) -> Outcome {
    let token = match require_token(session) {
        Ok(token) => token,
        Err(outcome) => return outcome,
    };

    let mut errors = ValidationErrors::new();
    if logo.is_none() {
        errors.add("logoFile", "Logo is required");
    }
    check_testimonials(&testimonials, &mut errors);
    if let Err(errors) = errors.into_result() {
        return Outcome::invalid(&errors);
    }
    let Some(logo) = logo else {
        return Outcome::new().with(Notice::error("Logo is required"));
    };

    match upload_all(api, &token, draft, logo, testimonials).await {
        Ok(()) => Outcome::new()
            .with(Notice::success(PROFILE_CREATED_REDIRECT))
            .redirect(Route::AdvisorDashboard),
        Err(err) => {
            warn!("advisor upload failed: {err}");
            Outcome::new().with(Notice::error("Error submitting form. Please try again."))
        }
    }
}

async fn upload_all(
    api: &ApiClient,
    token: &SecretString,
    mut draft: AdvisorProfileForm,
    logo: UploadFile,
    testimonials: Vec<TestimonialUpload>,
) -> Result<(), AppError> {
    draft.logo_url = Some(uploads::upload_logo(api, token, logo).await?);

    let mut uploaded = Vec::new();
    for entry in testimonials {
        let TestimonialUpload {
            client_name,
            testimonial,
            pdf: Some(pdf),
        } = entry
        else {
            continue;
        };
        if client_name.trim().is_empty() || testimonial.trim().is_empty() {
            continue;
        }
        let pdf_url = uploads::upload_testimonial(api, token, pdf).await?;
        uploaded.push(Testimonial {
            client_name,
            testimonial,
            pdf_url,
        });
    }
    debug!(count = uploaded.len(), "testimonials uploaded");

    draft.testimonials = uploaded;
    client::create_profile(api, token, &draft).await
}

/// What the advisor dashboard shows once it is allowed to render.
#[derive(Clone, Debug, PartialEq)]
pub struct AdvisorDashboard {
    pub user: UserProfile,
    /// `None` when the profile could not be loaded; the page renders without it.
    pub profile: Option<AdvisorProfile>,
}

/// Loads the dashboard or tells the caller where to go instead: login without
/// a usable token, seller login for non-advisors, the profile form when no
/// profile exists yet.
///
/// # Errors
/// Returns the redirect outcome when the dashboard must not render.
#[instrument(skip_all)]
pub async fn dashboard(
    api: &ApiClient,
    session: &SessionContext,
) -> Result<AdvisorDashboard, Outcome> {
    let Some(token) = session.access_token() else {
        return Err(Outcome::new().redirect(Route::AdvisorLogin));
    };

    let user = match auth::client::fetch_profile(api, token).await {
        Ok(user) => user,
        Err(err) => {
            warn!("profile fetch failed: {err}");
            return Err(Outcome::new().redirect(Route::AdvisorLogin));
        }
    };
    if user.role != Role::Advisor {
        return Err(Outcome::new().redirect(Route::SellerLogin));
    }

    let profile = match client::fetch_profile(api, token).await {
        Ok(Some(profile)) => Some(profile),
        Ok(None) => return Err(Outcome::new().redirect(Route::AdvisorForm)),
        Err(err) => {
            warn!("advisor profile fetch failed: {err}");
            None
        }
    };

    Ok(AdvisorDashboard { user, profile })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::AppConfig;
    use crate::session::LoginTokens;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

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

    fn draft() -> Result<AdvisorProfileForm, serde_json::Error> {
        serde_json::from_value(json!({
            "companyName": "Lovelace Advisory",
            "phone": "+44 20 7946 0000",
            "website": "https://lovelace.example.com",
            "industries": ["Technology"],
            "geographies": ["Europe"],
            "yearsExperience": 12,
            "numberOfTransactions": 40,
            "currency": "USD",
            "description": "Sell-side M&A for software companies.",
            "licensing": "FINRA Series 79",
            "revenueRange": {"min": 1000000, "max": 50000000}
        }))
    }

    fn row(name: &str, text: &str, pdf: Option<&str>) -> TestimonialUpload {
        TestimonialUpload {
            client_name: name.to_string(),
            testimonial: text.to_string(),
            pdf: pdf.map(|file| UploadFile::new(file, b"%PDF".to_vec())),
        }
    }

    async fn mount_upload(server: &MockServer, endpoint: &str, url: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(header("authorization", "Bearer at"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": url})))
            .expect(times)
            .mount(server)
            .await;
    }

    async fn mount_advisor_profile(server: &MockServer, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path("/api/advisors/profile"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn mount_user(server: &MockServer, role: &str) {
        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .and(header("authorization", "Bearer at"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"role": role, "isPaymentVerified": true})),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn upload_merges_urls_into_draft() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        mount_upload(&server, "/api/upload/logo", "https://cdn/logo.png", 1).await;
        mount_upload(&server, "/api/upload/testimonial", "https://cdn/acme.pdf", 1).await;
        Mock::given(method("POST"))
            .and(path("/api/advisors/profile"))
            .and(body_partial_json(json!({
                "companyName": "Lovelace Advisory",
                "logoUrl": "https://cdn/logo.png",
                "testimonials": [{
                    "clientName": "Acme",
                    "testimonial": "Closed in 90 days.",
                    "pdfUrl": "https://cdn/acme.pdf"
                }]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = upload_and_submit(
            &api_for(&server)?,
            &logged_in()?,
            draft()?,
            Some(UploadFile::new("logo.png", b"png".to_vec())),
            vec![
                row("Acme", "Closed in 90 days.", Some("acme.pdf")),
                row("", "", None),
            ],
        )
        .await;

        assert!(!outcome.has_errors(), "{outcome:?}");
        assert_eq!(outcome.redirect, Some(Route::AdvisorDashboard));
        Ok(())
    }

    #[tokio::test]
    async fn upload_requires_logo_and_complete_testimonial() -> Result<(), Box<dyn std::error::Error>>
    {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "x"})))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = upload_and_submit(
            &api_for(&server)?,
            &logged_in()?,
            draft()?,
            None,
            vec![row("Acme", "", Some("acme.pdf"))],
        )
        .await;

        assert_eq!(
            outcome.errors(),
            vec![
                "Logo is required",
                "Testimonial required",
                "At least one testimonial is required"
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn upload_failure_is_reported_once() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload/logo"))
            .respond_with(ResponseTemplate::new(413))
            .mount(&server)
            .await;

        let outcome = upload_and_submit(
            &api_for(&server)?,
            &logged_in()?,
            draft()?,
            Some(UploadFile::new("logo.png", b"png".to_vec())),
            vec![row("Acme", "Great.", Some("acme.pdf"))],
        )
        .await;

        assert_eq!(outcome.errors(), vec!["Error submitting form. Please try again."]);
        assert_eq!(outcome.redirect, None);
        Ok(())
    }

    #[tokio::test]
    async fn submit_without_token_goes_to_login() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        let outcome = submit_profile(
            &api_for(&server)?,
            &SessionContext::in_memory(),
            draft()?,
            None,
        )
        .await;
        assert_eq!(outcome.errors(), vec![NOT_LOGGED_IN]);
        assert_eq!(outcome.redirect, Some(Route::AdvisorLogin));
        Ok(())
    }

    #[tokio::test]
    async fn submit_profile_with_testimonial_urls() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/advisors/profile"))
            .and(header("authorization", "Bearer at"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let mut form = draft()?;
        form.testimonials = vec![Testimonial {
            client_name: "Acme".to_string(),
            testimonial: "Closed in 90 days.".to_string(),
            pdf_url: "https://cdn/acme.pdf".to_string(),
        }];
        let outcome = submit_profile(&api_for(&server)?, &logged_in()?, form, None).await;

        assert_eq!(outcome.notices, vec![Notice::success(PROFILE_CREATED)]);
        Ok(())
    }

    #[tokio::test]
    async fn dashboard_without_profile_goes_to_form() -> Result<(), AppError> {
        let server = MockServer::start().await;
        mount_user(&server, "advisor").await;
        mount_advisor_profile(&server, 404, json!({"message": "Not found"})).await;

        let result = dashboard(&api_for(&server)?, &logged_in()?).await;
        assert_eq!(result.err().and_then(|o| o.redirect), Some(Route::AdvisorForm));
        Ok(())
    }

    #[tokio::test]
    async fn dashboard_rejects_sellers() -> Result<(), AppError> {
        let server = MockServer::start().await;
        mount_user(&server, "seller").await;

        let result = dashboard(&api_for(&server)?, &logged_in()?).await;
        assert_eq!(result.err().and_then(|o| o.redirect), Some(Route::SellerLogin));
        Ok(())
    }

    #[tokio::test]
    async fn dashboard_renders_without_profile_on_server_error() -> Result<(), AppError> {
        let server = MockServer::start().await;
        mount_user(&server, "advisor").await;
        mount_advisor_profile(&server, 500, json!({})).await;

        let view = dashboard(&api_for(&server)?, &logged_in()?)
            .await
            .map_err(|_| AppError::Parse("dashboard redirected".into()))?;
        assert_eq!(view.user.role, Role::Advisor);
        assert_eq!(view.profile, None);
        Ok(())
    }

    #[tokio::test]
    async fn dashboard_loads_profile() -> Result<(), AppError> {
        let server = MockServer::start().await;
        mount_user(&server, "advisor").await;
        mount_advisor_profile(
            &server,
            200,
            json!({"companyName": "Lovelace Advisory", "isActive": true, "id": "a-1"}),
        )
        .await;

        let view = dashboard(&api_for(&server)?, &logged_in()?)
            .await
            .map_err(|_| AppError::Parse("dashboard redirected".into()))?;
        let profile = view.profile.unwrap_or_default();
        assert_eq!(profile.company_name, "Lovelace Advisory");
        assert!(profile.is_active);
        assert_eq!(profile.extra.get("id"), Some(&json!("a-1")));
        Ok(())
    }

    #[tokio::test]
    async fn dashboard_without_token_skips_requests() -> Result<(), AppError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = dashboard(&api_for(&server)?, &SessionContext::in_memory()).await;
        assert_eq!(result.err().and_then(|o| o.redirect), Some(Route::AdvisorLogin));
        Ok(())
    }
}

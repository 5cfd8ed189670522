//! Payment endpoints. Every call is state-changing, so each carries the
//! bearer token and the CSRF token.

use crate::{
    app_lib::{ApiClient, AppError, api::Headers, bearer, csrf},
    features::{
        auth::types::MessageResponse,
        payment::types::{
            ConfirmPaymentRequest, CreateIntentRequest, CreateIntentResponse, RedeemCouponRequest,
        },
    },
    session::{CSRF_COOKIE, SessionContext},
};
use tracing::debug;

/// Client for CSRF-protected requests. Resolving the CSRF token happens once,
/// when the client is built, so a missing token fails before any request.
#[derive(Clone)]
pub struct SecureApi<'a> {
    api: &'a ApiClient,
    headers: Headers,
}

impl std::fmt::Debug for SecureApi<'_> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SecureApi")
            .field("api", self.api)
            .finish_non_exhaustive()
    }
}

impl<'a> SecureApi<'a> {
    /// # Errors
    /// Returns `AppError::CsrfUnavailable` when no CSRF token can be found.
    pub fn new(api: &'a ApiClient, session: &mut SessionContext) -> Result<Self, AppError> {
        let csrf_token = session.csrf_token(api.cookie(CSRF_COOKIE))?;
        let mut headers = vec![csrf(&csrf_token)];
        if let Some(token) = session.access_token() {
            headers.push(bearer(token));
        } else {
            debug!("secure request without access token");
        }
        Ok(Self { api, headers })
    }

    pub async fn create_intent(
        &self,
        coupon_code: Option<&str>,
    ) -> Result<CreateIntentResponse, AppError> {
        self.api
            .post_json(
                "/api/payment/create-intent",
                &CreateIntentRequest { coupon_code },
                &self.headers,
            )
            .await
    }

    pub async fn redeem_coupon(&self, code: &str) -> Result<MessageResponse, AppError> {
        self.api
            .post_json(
                "/api/payment/redeem-coupon",
                &RedeemCouponRequest { code },
                &self.headers,
            )
            .await
    }

    /// Records a payment the gateway has confirmed.
    pub async fn confirm(&self, payment_intent_id: &str) -> Result<(), AppError> {
        self.api
            .post_json_empty(
                "/api/payment/confirm",
                &ConfirmPaymentRequest { payment_intent_id },
                &self.headers,
            )
            .await
    }
}

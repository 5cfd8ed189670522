//! Advisor payment screen: coupons and the card payment itself.

use super::{
    client::SecureApi,
    types::{BillingDetails, PaymentConfirmer, PaymentForm, PaymentStatus, check_coupon},
};
use crate::{
    app_lib::{ApiClient, AppError, Notice, Outcome},
    routes::Route,
    session::SessionContext,
};
use tracing::{info, instrument, warn};

/// Listing price in cents before any coupon.
pub const DEFAULT_AMOUNT_CENTS: u64 = 500_000;
/// Coupon that grants a free trial instead of a discount.
pub const FREE_TRIAL_COUPON: &str = "FREETRIAL2024";

/// `$X.YY` for an amount in cents.
#[must_use]
pub fn format_amount(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Notice for a failed protected request. The CSRF and gateway errors carry
/// their own user-facing text.
fn failure(err: &AppError, fallback: &str) -> Notice {
    match err {
        AppError::CsrfUnavailable | AppError::Payment(_) => Notice::error(err.to_string()),
        _ => Notice::error(err.server_message_or(fallback)),
    }
}

/// Result of applying a coupon: what to show and the price to show next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CouponOutcome {
    pub outcome: Outcome,
    pub amount_cents: u64,
}

/// Applies a coupon. The free-trial coupon is redeemed outright; any other
/// coupon re-prices the payment intent.
#[instrument(skip(api, session))]
pub async fn apply_coupon(
    api: &ApiClient,
    session: &mut SessionContext,
    code: &str,
    current_amount: u64,
) -> CouponOutcome {
    let unchanged = |outcome: Outcome| CouponOutcome {
        outcome,
        amount_cents: current_amount,
    };

    let code = code.trim();
    if code.is_empty() {
        return unchanged(Outcome::new().with(Notice::error("Please enter a coupon code")));
    }
    if let Err(message) = check_coupon(code) {
        return unchanged(Outcome::new().with(Notice::error(message)));
    }

    let secure = match SecureApi::new(api, session) {
        Ok(secure) => secure,
        Err(err) => return unchanged(Outcome::new().with(failure(&err, "Error applying coupon"))),
    };

    if code.eq_ignore_ascii_case(FREE_TRIAL_COUPON) {
        return match secure.redeem_coupon(code).await {
            Ok(_) => {
                info!("free trial redeemed");
                unchanged(
                    Outcome::new()
                        .with(Notice::success(
                            "Free trial activated! Redirecting to create your profile...",
                        ))
                        .redirect(Route::AdvisorForm),
                )
            }
            Err(err) => unchanged(
                Outcome::new().with(failure(&err, "Failed to redeem free trial coupon")),
            ),
        };
    }

    match secure.create_intent(Some(code)).await {
        Ok(intent) => match intent.amount {
            Some(amount) => CouponOutcome {
                outcome: Outcome::new().with(Notice::success(format!(
                    "Coupon applied! New amount: {}",
                    format_amount(amount)
                ))),
                amount_cents: amount,
            },
            None => unchanged(Outcome::new().with(Notice::error("Failed to apply coupon"))),
        },
        Err(err) if err.is_transport() => {
            unchanged(Outcome::new().with(Notice::error("Error applying coupon")))
        }
        Err(err) => unchanged(Outcome::new().with(failure(&err, "Failed to apply coupon"))),
    }
}

/// Pays for the listing: creates the intent, has the gateway confirm the card,
/// then records the confirmed intent with the backend.
#[instrument(skip_all)]
pub async fn submit_payment<C: PaymentConfirmer>(
    api: &ApiClient,
    session: &mut SessionContext,
    form: &PaymentForm,
    confirmer: &C,
) -> Outcome {
    if let Err(errors) = form.validate() {
        return Outcome::invalid(&errors);
    }

    let secure = match SecureApi::new(api, session) {
        Ok(secure) => secure,
        Err(err) => {
            return Outcome::new().with(failure(&err, "An unexpected error occurred during payment"));
        }
    };

    let intent = match secure.create_intent(form.coupon_code()).await {
        Ok(intent) => intent,
        Err(err) => {
            return Outcome::new().with(failure(&err, "Failed to create payment intent"));
        }
    };
    let Some(client_secret) = intent.client_secret.filter(|secret| !secret.is_empty()) else {
        return Outcome::new().with(Notice::error("Failed to get client secret from backend"));
    };

    let billing = BillingDetails {
        name: format!("{} {}", form.first_name.trim(), form.last_name.trim()),
        email: session
            .user()
            .map(|user| user.email.clone())
            .unwrap_or_default(),
        country: form.country.trim().to_string(),
        postal_code: form.postal_code.trim().to_string(),
    };

    let confirmed = match confirmer.confirm(&client_secret, &billing).await {
        Ok(confirmed) => confirmed,
        Err(err) => {
            warn!("card confirmation failed: {err}");
            return Outcome::new().with(failure(&err, "Payment failed during card confirmation"));
        }
    };
    if confirmed.status != PaymentStatus::Succeeded {
        return Outcome::new().with(Notice::error(format!(
            "Payment not succeeded. Current status: {}",
            confirmed.status
        )));
    }

    match secure.confirm(&confirmed.id).await {
        Ok(()) => Outcome::new()
            .with(Notice::success(
                "Payment confirmed! Redirecting to create your profile...",
            ))
            .redirect(Route::AdvisorForm),
        Err(err) => {
            warn!("backend payment confirmation failed: {err}");
            Outcome::new().with(failure(
                &err,
                "Payment confirmed by the gateway, but the backend failed to update the profile",
            ))
        }
    }
}

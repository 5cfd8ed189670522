//! Payment form, intent payloads and the seam to the card payment gateway.

use crate::app_lib::AppError;
use crate::validation::{self, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::{fmt, future::Future};

#[derive(Clone, Debug, Default)]
pub struct PaymentForm {
    pub first_name: String,
    pub last_name: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    pub postal_code: String,
    pub coupon: Option<String>,
}

fn check_name(value: &str, label: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{label} is required"));
    }
    if !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err("Only alphabets allowed".to_string());
    }
    validation::length_between(value, 2, 20, label)
}

/// Coupons are letters and digits only.
///
/// # Errors
/// Returns the message shown next to the coupon field.
pub fn check_coupon(code: &str) -> Result<(), String> {
    if code.trim().chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err("Only letters & numbers allowed".to_string())
    }
}

impl PaymentForm {
    /// # Errors
    /// Returns every failed field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("firstName", check_name(&self.first_name, "First name"));
        errors.check("lastName", check_name(&self.last_name, "Last name"));
        errors.check(
            "country",
            validation::required(&self.country, "Country is required"),
        );
        if self.postal_code.trim().is_empty() {
            errors.add("postalCode", "Postal code is required");
        } else if !validation::valid_postal_code(self.postal_code.trim()) {
            errors.add("postalCode", "Invalid postal code");
        }
        if let Some(coupon) = &self.coupon {
            errors.check("coupon", check_coupon(coupon));
        }
        errors.into_result()
    }

    /// Coupon to send, if one was entered.
    #[must_use]
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<&'a str>,
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Amount in cents after any coupon.
    #[serde(default)]
    pub amount: Option<u64>,
}

impl fmt::Debug for CreateIntentResponse {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CreateIntentResponse")
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("amount", &self.amount)
            .finish()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RedeemCouponRequest<'a> {
    pub code: &'a str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest<'a> {
    pub payment_intent_id: &'a str,
}

/// Billing details handed to the gateway with the card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillingDetails {
    pub name: String,
    pub email: String,
    pub country: String,
    pub postal_code: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Succeeded,
    Processing,
    RequiresAction,
    RequiresPaymentMethod,
    Canceled,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Succeeded => "succeeded",
            Self::Processing => "processing",
            Self::RequiresAction => "requires_action",
            Self::RequiresPaymentMethod => "requires_payment_method",
            Self::Canceled => "canceled",
            Self::Other(status) => status,
        };
        formatter.write_str(label)
    }
}

/// Payment intent as reported by the gateway after card confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmedIntent {
    pub id: String,
    pub status: PaymentStatus,
}

/// Card confirmation with the payment gateway. The backend only creates the
/// intent and records the result; the card never passes through it.
pub trait PaymentConfirmer {
    /// # Errors
    /// Returns `AppError::Payment` with the gateway's message when it refuses the card.
    fn confirm(
        &self,
        client_secret: &str,
        billing: &BillingDetails,
    ) -> impl Future<Output = Result<ConfirmedIntent, AppError>> + Send;
}

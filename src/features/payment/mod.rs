//! Advisor listing payment: coupons, intent creation and confirmation.
//! Requests here are CSRF-protected; see `client::SecureApi`.

pub mod client;
pub mod flows;
pub mod types;

pub use types::{BillingDetails, ConfirmedIntent, PaymentConfirmer, PaymentForm, PaymentStatus};

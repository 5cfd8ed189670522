use crate::cli::{actions::report, globals::GlobalArgs};
use crate::{
    app_lib::AppError,
    features::payment::{
        BillingDetails, ConfirmedIntent, PaymentConfirmer, PaymentForm, PaymentStatus,
        flows::{self, DEFAULT_AMOUNT_CENTS},
    },
};
use anyhow::Result;
use tracing::info;

#[derive(Debug)]
pub enum Args {
    ApplyCoupon {
        code: String,
    },
    Pay {
        form: PaymentForm,
        payment_intent_id: Option<String>,
    },
}

/// Card confirmation happens in the gateway's own UI. This confirmer accepts
/// the id of an intent the user already confirmed there.
#[derive(Clone, Debug, Default)]
pub struct ConfirmedIntentId {
    payment_intent_id: Option<String>,
}

impl ConfirmedIntentId {
    #[must_use]
    pub fn new(payment_intent_id: Option<String>) -> Self {
        Self {
            payment_intent_id: payment_intent_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        }
    }
}

/// Intent id part of a client secret (`<intent id>_secret_<nonce>`).
fn intent_id(client_secret: &str) -> &str {
    client_secret
        .split_once("_secret_")
        .map_or(client_secret, |(id, _)| id)
}

impl PaymentConfirmer for ConfirmedIntentId {
    async fn confirm(
        &self,
        client_secret: &str,
        billing: &BillingDetails,
    ) -> Result<ConfirmedIntent, AppError> {
        match &self.payment_intent_id {
            Some(id) => {
                info!(payment_intent_id = %id, country = %billing.country, "using confirmed payment intent");
                Ok(ConfirmedIntent {
                    id: id.clone(),
                    status: PaymentStatus::Succeeded,
                })
            }
            None => Err(AppError::Payment(format!(
                "Confirm payment {} for {} with the payment gateway, then re-run with --payment-intent-id",
                intent_id(client_secret),
                billing.name
            ))),
        }
    }
}

/// Execute a payment action.
/// # Errors
/// Returns an error if the session cannot be loaded or the flow fails.
pub async fn execute(args: Args, globals: &GlobalArgs) -> Result<()> {
    let api = globals.api()?;
    let mut session = globals.session()?;

    match args {
        Args::ApplyCoupon { code } => {
            let result =
                flows::apply_coupon(&api, &mut session, &code, DEFAULT_AMOUNT_CENTS).await;
            println!("amount: {}", flows::format_amount(result.amount_cents));
            report(&result.outcome)
        }
        Args::Pay {
            form,
            payment_intent_id,
        } => {
            let confirmer = ConfirmedIntentId::new(payment_intent_id);
            report(&flows::submit_payment(&api, &mut session, &form, &confirmer).await)
        }
    }
}

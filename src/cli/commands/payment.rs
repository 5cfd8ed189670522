use clap::{Arg, Command};

pub const ARG_CODE: &str = "code";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_COUNTRY: &str = "country";
pub const ARG_POSTAL_CODE: &str = "postal-code";
pub const ARG_COUPON: &str = "coupon";
pub const ARG_PAYMENT_INTENT_ID: &str = "payment-intent-id";

#[must_use]
pub fn with_commands(command: Command) -> Command {
    command
        .subcommand(
            Command::new("apply-coupon")
                .about("Apply a coupon to the listing price")
                .arg(Arg::new(ARG_CODE).long("code").required(true)),
        )
        .subcommand(
            Command::new("pay")
                .about("Pay for the advisor listing")
                .arg(Arg::new(ARG_FIRST_NAME).long("first-name").required(true))
                .arg(Arg::new(ARG_LAST_NAME).long("last-name").required(true))
                .arg(
                    Arg::new(ARG_COUNTRY)
                        .long("country")
                        .help("ISO 3166-1 alpha-2 country code")
                        .required(true),
                )
                .arg(Arg::new(ARG_POSTAL_CODE).long("postal-code").required(true))
                .arg(Arg::new(ARG_COUPON).long("coupon"))
                .arg(
                    Arg::new(ARG_PAYMENT_INTENT_ID)
                        .long("payment-intent-id")
                        .help("Id of a payment intent already confirmed with the payment gateway"),
                ),
        )
}

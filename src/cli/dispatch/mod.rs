//! Maps validated CLI matches to the settings and the action to run.

use crate::app_lib::{AppConfig, ConfigOverrides};
use crate::cli::{
    actions::{Action, auth, payment, profiles},
    commands::{
        ARG_API_URL, ARG_SESSION_FILE, ARG_TIMEOUT,
        auth::{ARG_EMAIL, ARG_FIRST_NAME, ARG_LAST_NAME, ARG_PASSWORD, ARG_ROLE, ARG_ROUTE, ARG_TOKEN},
        payment::{
            ARG_CODE, ARG_COUNTRY, ARG_COUPON, ARG_PAYMENT_INTENT_ID, ARG_POSTAL_CODE,
        },
        profiles::{ARG_DRAFT, ARG_FILE, ARG_LOGO, ARG_SORT, ARG_TESTIMONIAL},
    },
    globals::GlobalArgs,
};
use crate::features::{
    auth::{LoginForm, RegisterForm, Role},
    payment::PaymentForm,
    sellers::SortBy,
};
use crate::routes::Route;
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

fn string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    string(matches, id).with_context(|| format!("missing required argument: --{id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    required(matches, id).map(SecretString::from)
}

fn role(matches: &ArgMatches) -> Result<Role> {
    required(matches, ARG_ROLE)?
        .parse()
        .map_err(|err: String| anyhow!(err))
}

/// Build the shared settings from the global arguments.
///
/// # Errors
/// Returns an error if the resulting configuration is invalid.
pub fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let overrides = ConfigOverrides {
        api_base_url: string(matches, ARG_API_URL),
        session_file: string(matches, ARG_SESSION_FILE),
        timeout_secs: matches.get_one::<u64>(ARG_TIMEOUT).copied(),
    };
    let config = AppConfig::load(overrides).context("invalid configuration")?;
    Ok(GlobalArgs::new(config))
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or malformed.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let (name, sub) = matches
        .subcommand()
        .context("missing command, see --help")?;

    let action = match name {
        "login" => Action::Auth(auth::Args::Login {
            role: role(sub)?,
            form: LoginForm {
                email: required(sub, ARG_EMAIL)?,
                password: secret(sub, ARG_PASSWORD)?,
            },
        }),
        "register" => Action::Auth(auth::Args::Register(RegisterForm {
            first_name: required(sub, ARG_FIRST_NAME)?,
            last_name: required(sub, ARG_LAST_NAME)?,
            email: required(sub, ARG_EMAIL)?,
            password: secret(sub, ARG_PASSWORD)?,
            role: role(sub)?,
        })),
        "logout" => Action::Auth(auth::Args::Logout),
        "whoami" => Action::Auth(auth::Args::Whoami),
        "open" => Action::Auth(auth::Args::Open(
            required(sub, ARG_ROUTE)?
                .parse::<Route>()
                .map_err(|err| anyhow!(err))?,
        )),
        "forgot-password" => Action::Auth(auth::Args::ForgotPassword {
            email: required(sub, ARG_EMAIL)?,
        }),
        "reset-password" => Action::Auth(auth::Args::ResetPassword {
            token: string(sub, ARG_TOKEN).map(SecretString::from),
            password: secret(sub, ARG_PASSWORD)?,
        }),
        "verify-email" => Action::Auth(auth::Args::VerifyEmail {
            token: required(sub, ARG_TOKEN)?,
        }),
        "password-strength" => Action::Auth(auth::Args::PasswordStrength(secret(
            sub,
            ARG_PASSWORD,
        )?)),
        "advisor-profile" => Action::Profiles(profiles::Args::AdvisorProfile {
            file: PathBuf::from(required(sub, ARG_FILE)?),
            logo: string(sub, ARG_LOGO).map(PathBuf::from),
        }),
        "advisor-upload" => Action::Profiles(profiles::Args::AdvisorUpload {
            logo: PathBuf::from(required(sub, ARG_LOGO)?),
            testimonials: sub
                .get_many::<String>(ARG_TESTIMONIAL)
                .map(|values| values.map(|value| profiles::TestimonialArg::parse(value)).collect())
                .unwrap_or_default(),
            draft: string(sub, ARG_DRAFT).map(PathBuf::from),
        }),
        "advisor-dashboard" => Action::Profiles(profiles::Args::AdvisorDashboard),
        "seller-profile" => Action::Profiles(profiles::Args::SellerProfile {
            file: PathBuf::from(required(sub, ARG_FILE)?),
        }),
        "seller-update" => Action::Profiles(profiles::Args::SellerUpdate {
            file: PathBuf::from(required(sub, ARG_FILE)?),
        }),
        "seller-dashboard" => Action::Profiles(profiles::Args::SellerDashboard {
            sort: string(sub, ARG_SORT)
                .map(|sort| sort.parse::<SortBy>())
                .transpose()
                .map_err(|err| anyhow!(err))?
                .unwrap_or_default(),
        }),
        "apply-coupon" => Action::Payment(payment::Args::ApplyCoupon {
            code: required(sub, ARG_CODE)?,
        }),
        "pay" => Action::Payment(payment::Args::Pay {
            form: PaymentForm {
                first_name: required(sub, ARG_FIRST_NAME)?,
                last_name: required(sub, ARG_LAST_NAME)?,
                country: required(sub, ARG_COUNTRY)?,
                postal_code: required(sub, ARG_POSTAL_CODE)?,
                coupon: string(sub, ARG_COUPON),
            },
            payment_intent_id: string(sub, ARG_PAYMENT_INTENT_ID),
        }),
        other => return Err(anyhow!("unknown command: {other}")),
    };

    Ok(action)
}

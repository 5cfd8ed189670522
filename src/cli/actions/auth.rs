use crate::cli::{actions::report, globals::GlobalArgs};
use crate::{
    features::auth::{LoginForm, RegisterForm, Role, client, flows},
    routes::{
        Route,
        guard::{Decision, RouteGuard},
    },
    validation::password::{password_score, password_strength},
};
use anyhow::{Result, bail};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

#[derive(Debug)]
pub enum Args {
    Login { role: Role, form: LoginForm },
    Register(RegisterForm),
    Logout,
    Whoami,
    Open(Route),
    ForgotPassword { email: String },
    ResetPassword {
        token: Option<SecretString>,
        password: SecretString,
    },
    VerifyEmail { token: String },
    PasswordStrength(SecretString),
}

/// Execute an auth action.
/// # Errors
/// Returns an error if the session cannot be loaded or the flow fails.
pub async fn execute(args: Args, globals: &GlobalArgs) -> Result<()> {
    if let Args::PasswordStrength(password) = &args {
        let password = password.expose_secret();
        println!(
            "{} ({}/5)",
            password_strength(password),
            password_score(password)
        );
        return Ok(());
    }

    let api = globals.api()?;
    let mut session = globals.session()?;

    match args {
        Args::Login { role, form } => {
            report(&flows::login(&api, &mut session, role, &form).await)
        }
        Args::Register(form) => report(&flows::register(&api, &mut session, &form).await),
        Args::Logout => report(&flows::logout(&api, &mut session).await),
        Args::Whoami => {
            let Some(token) = session.access_token() else {
                bail!("Not logged in");
            };
            let profile = client::fetch_profile(&api, token).await?;
            println!("{} <{}>", profile.name, profile.email);
            println!("role: {}", profile.role);
            println!("email verified: {}", profile.is_email_verified);
            if profile.role == Role::Advisor {
                println!("payment verified: {}", profile.is_payment_verified);
            }
            session.store_user(profile)?;
            Ok(())
        }
        Args::Open(route) => {
            let guard = RouteGuard::new(&api);
            let cancel = async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    debug!("ctrl-c handler unavailable: {err}");
                    std::future::pending::<()>().await;
                }
            };
            let decision = match route.requirement() {
                Some(requirement) => guard.check_until(requirement, &session, cancel).await,
                None => Some(guard.check_route(route, &session).await),
            };
            match decision {
                Some(Decision::Render) => println!("render {route}"),
                Some(Decision::Redirect(target)) => println!("-> {target}"),
                None => println!("cancelled"),
            }
            Ok(())
        }
        Args::ForgotPassword { email } => report(&flows::forgot_password(&api, &email).await),
        Args::ResetPassword { token, password } => {
            if let Some(token) = token {
                session.set_reset_token(token);
                match flows::reset_account_email(&api, &session).await {
                    Ok(email) => println!("account: {email}"),
                    Err(notice) => eprintln!("{}", notice.message),
                }
            }
            report(&flows::reset_password(&api, &mut session, None, &password).await)
        }
        Args::VerifyEmail { token } => {
            report(&flows::verify_email(&api, &mut session, &token).await)
        }
        Args::PasswordStrength(_) => Ok(()),
    }
}

pub mod auth;
pub mod payment;
pub mod profiles;

// Internal "interpreter" for `Action`.
mod run;

use crate::app_lib::{NoticeKind, Outcome};
use crate::cli::globals::GlobalArgs;
use anyhow::{Result, bail};

#[derive(Debug)]
pub enum Action {
    Auth(auth::Args),
    Profiles(profiles::Args),
    Payment(payment::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action cannot run or its flow reports a failure.
    pub async fn execute(self, globals: &GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }
}

/// Prints what a flow reported. Error notices become the command's error so
/// the process exits non-zero.
fn report(outcome: &Outcome) -> Result<()> {
    for notice in &outcome.notices {
        if notice.kind != NoticeKind::Error {
            println!("{notice}");
        }
    }
    if let Some(route) = outcome.redirect {
        println!("-> {route}");
    }
    let errors = outcome.errors();
    if !errors.is_empty() {
        bail!(errors.join("\n"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::Notice;
    use crate::routes::Route;

    #[test]
    fn test_report_success() {
        let outcome = Outcome::new()
            .with(Notice::success("Login successful"))
            .redirect(Route::SellerDashboard);
        assert!(report(&outcome).is_ok());
    }

    #[test]
    fn test_report_errors_fail_the_command() {
        let outcome = Outcome::new()
            .with(Notice::error("Email is required"))
            .with(Notice::error("Password is required"));
        let err = report(&outcome).err().map(|err| err.to_string());
        assert_eq!(
            err,
            Some("Email is required\nPassword is required".to_string())
        );
    }
}

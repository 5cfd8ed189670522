use crate::cli::actions::{Action, auth, payment, profiles};
use crate::cli::globals::GlobalArgs;
use anyhow::Result;

/// Execute the provided action. Single dispatch point for all CLI actions.
///
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Auth(args) => auth::execute(args, globals).await,
        Action::Profiles(args) => profiles::execute(args, globals).await,
        Action::Payment(args) => payment::execute(args, globals).await,
    }
}

use crate::app_lib::{ApiClient, AppConfig};
use crate::session::{FileSessionStore, SessionContext};
use anyhow::{Context, Result};

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: AppConfig,
}

impl GlobalArgs {
    #[must_use]
    pub const fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn api(&self) -> Result<ApiClient> {
        ApiClient::new(&self.config).context("Failed to build HTTP client")
    }

    /// Session persisted in the configured session file.
    ///
    /// # Errors
    /// Returns an error if the session file exists but cannot be read.
    pub fn session(&self) -> Result<SessionContext> {
        let path = &self.config.session_file;
        SessionContext::load(FileSessionStore::new(path.clone()))
            .with_context(|| format!("Failed to load session from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_session_file_is_empty_session() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let globals = GlobalArgs::new(AppConfig {
            session_file: dir.path().join("session.json"),
            ..AppConfig::default()
        });

        let session = globals.session()?;
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        Ok(())
    }
}

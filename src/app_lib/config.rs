//! Client configuration: backend base URL, session file location and request
//! timeout. Values come from CLI flags or their environment fallbacks; blank
//! overrides are ignored so an empty env var never wipes a default.
//! Configuration values are public; do not store secrets here.

use super::errors::AppError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://advisor-seller-backend.vercel.app";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const SESSION_DIR: &str = "advisor-portal";
const SESSION_FILE: &str = "session.json";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: default_session_file(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Optional values supplied by the caller, typically parsed CLI arguments.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub session_file: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Applies overrides on top of the defaults and validates the result.
    ///
    /// # Errors
    /// Returns `AppError::Config` when the base URL is not an http(s) URL or the
    /// timeout is zero.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, AppError> {
        let mut config = Self::default();
        apply_overrides(&mut config, overrides);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        let url = Url::parse(&self.api_base_url)
            .map_err(|err| AppError::Config(format!("Invalid API base URL: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "Unsupported API base URL scheme: {}",
                url.scheme()
            )));
        }
        if self.timeout.is_zero() {
            return Err(AppError::Config(
                "Request timeout must be greater than zero.".to_string(),
            ));
        }
        Ok(())
    }
}

/// `<config dir>/advisor-portal/session.json`, falling back to the home
/// directory and finally the working directory.
#[must_use]
pub fn default_session_file() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join(SESSION_DIR).join(SESSION_FILE)
    } else if let Some(home_dir) = dirs::home_dir() {
        home_dir
            .join(format!(".{SESSION_DIR}"))
            .join(SESSION_FILE)
    } else {
        PathBuf::from(format!(".{SESSION_DIR}")).join(SESSION_FILE)
    }
}

fn apply_overrides(config: &mut AppConfig, overrides: ConfigOverrides) {
    if let Some(value) = overrides.api_base_url.as_deref().and_then(normalize_value) {
        config.api_base_url = value.trim_end_matches('/').to_string();
    }
    if let Some(value) = overrides.session_file.as_deref().and_then(normalize_value) {
        config.session_file = PathBuf::from(value);
    }
    if let Some(value) = overrides.timeout_secs {
        config.timeout = Duration::from_secs(value);
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

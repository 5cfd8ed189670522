use thiserror::Error;

/// Message used whenever a protected action finds no CSRF token in any source.
pub const CSRF_UNAVAILABLE: &str = "No CSRF token available. Please login again.";

#[derive(Clone, Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Session storage error: {0}")]
    Storage(String),
    #[error("No CSRF token available. Please login again.")]
    CsrfUnavailable,
    /// The payment gateway refused or could not confirm a payment.
    #[error("{0}")]
    Payment(String),
}

impl AppError {
    /// HTTP status of a backend rejection, `None` for local and transport errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// True for failures that never reached the backend (connect errors, timeouts).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }

    /// Message from the backend body when there is one, otherwise `fallback`.
    #[must_use]
    pub fn server_message_or(&self, fallback: &str) -> String {
        match self {
            Self::Http { message, .. } if !message.is_empty() && message != GENERIC_FAILURE => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

/// Body text reported when the backend sends an empty error body.
pub const GENERIC_FAILURE: &str = "Request failed.";

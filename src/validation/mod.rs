//! Synchronous field validation shared by every form. Validators never touch the
//! network: a form either yields its request payload or a list of field errors.

pub mod password;

pub use password::{PasswordStrength, password_score, password_strength};

use regex::Regex;
use std::fmt;
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors of one form submission, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Records the first failing rule of a field, if any.
    pub fn check(&mut self, field: &'static str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// First message reported for `field`.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// # Errors
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();
        write!(formatter, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Required, well-formed email.
///
/// # Errors
/// Returns the message shown next to the field.
pub fn email(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("Email is required".to_string());
    }
    if !valid_email(value) {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(())
}

/// # Errors
/// Returns `message` when the trimmed value is empty.
pub fn required(value: &str, message: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Character-count bounds, inclusive.
///
/// # Errors
/// Returns the matching bound message.
pub fn length_between(value: &str, min: usize, max: usize, label: &str) -> Result<(), String> {
    let count = value.chars().count();
    if count < min {
        return Err(format!("{label} must be at least {min} characters"));
    }
    if count > max {
        return Err(format!("{label} must not exceed {max} characters"));
    }
    Ok(())
}

/// Matches `value` against `pattern`; an invalid pattern never matches.
pub fn matches(value: &str, pattern: &str) -> bool {
    Regex::new(pattern).is_ok_and(|re| re.is_match(value))
}

/// Absolute `http`/`https` URL with a host.
pub fn valid_url(value: &str) -> bool {
    Url::parse(value.trim()).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

/// Loose phone format used on profile creation.
pub fn valid_phone(value: &str) -> bool {
    matches(value, r"^\+?[0-9\- ]+$")
}

/// E.164-style phone format used on profile edits.
pub fn valid_international_phone(value: &str) -> bool {
    matches(value, r"^\+?[1-9]\d{1,14}$")
}

pub fn valid_postal_code(value: &str) -> bool {
    matches(value, r"^[0-9]{4,10}$")
}

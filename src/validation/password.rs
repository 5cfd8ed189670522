//! Password rules: the strength meter shown while typing and the hard
//! requirements enforced at registration and reset.

use std::fmt;

const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        };
        formatter.write_str(label)
    }
}

/// One point each for: length >= 8, uppercase, lowercase, digit, symbol.
pub fn password_score(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| SYMBOLS.contains(c)),
    ];
    checks.into_iter().map(u8::from).sum()
}

pub fn password_strength(password: &str) -> PasswordStrength {
    match password_score(password) {
        0..=2 => PasswordStrength::Weak,
        3 | 4 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

/// Login only checks presence and length.
///
/// # Errors
/// Returns the message shown next to the field.
pub fn login_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }
    Ok(())
}

/// Registration rules: length, one uppercase letter, one digit.
///
/// # Errors
/// Returns the first failing rule.
pub fn registration_password(password: &str) -> Result<(), String> {
    if password.trim().is_empty() {
        return Err("Password is required".to_string());
    }
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number".to_string());
    }
    Ok(())
}

/// Reset rules add a lowercase letter to the registration rules.
///
/// # Errors
/// Returns the first failing rule.
pub fn reset_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("New password is required".to_string());
    }
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number".to_string());
    }
    Ok(())
}

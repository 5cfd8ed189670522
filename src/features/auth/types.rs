//! Request and response types for auth-related API calls. Login and register
//! payloads carry passwords and tokens, so they must never be logged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Advisor,
    Seller,
    /// Any role string other than advisor or seller.
    #[serde(other)]
    Unknown,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Advisor => "advisor",
            Self::Seller => "seller",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "advisor" | "adviser" => Ok(Self::Advisor),
            "seller" => Ok(Self::Seller),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Profile summary returned by `GET /api/auth/profile`. The backend owns it;
/// the client caches a read-only copy that may be stale.
///
/// A missing or unrecognized role reads as [`Role::Unknown`]; the value the
/// backend sent is kept in `raw_role` and written back unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireProfile", into = "WireProfile")]
pub struct UserProfile {
    pub role: Role,
    pub raw_role: Option<Value>,
    pub is_payment_verified: bool,
    pub is_email_verified: bool,
    pub email: String,
    pub name: String,
    pub extra: Map<String, Value>,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Value>,
    #[serde(default)]
    is_payment_verified: bool,
    #[serde(default)]
    is_email_verified: bool,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<WireProfile> for UserProfile {
    fn from(wire: WireProfile) -> Self {
        let role = match wire.role.as_ref().and_then(Value::as_str) {
            Some("advisor") => Role::Advisor,
            Some("seller") => Role::Seller,
            _ => Role::Unknown,
        };
        Self {
            role,
            raw_role: wire.role,
            is_payment_verified: wire.is_payment_verified,
            is_email_verified: wire.is_email_verified,
            email: wire.email,
            name: wire.name,
            extra: wire.extra,
        }
    }
}

impl From<UserProfile> for WireProfile {
    fn from(profile: UserProfile) -> Self {
        let role = match profile.role {
            Role::Unknown => profile.raw_role,
            known => Some(Value::String(known.as_str().to_string())),
        };
        Self {
            role,
            is_payment_verified: profile.is_payment_verified,
            is_email_verified: profile.is_email_verified,
            email: profile.email,
            name: profile.name,
            extra: profile.extra,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: String,
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
}

/// Tokens and user returned by login and registration. Every field is optional
/// because the backend omits them on some paths (unverified registrations).
#[derive(Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthResponse")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub new_password: &'a str,
}

/// Generic `{ message, success }` acknowledgement.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

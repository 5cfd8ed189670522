//! CSRF token provider. The persisted session is the authoritative copy; a
//! backend cookie and an in-memory cache act as fallbacks. The lookup order is
//! an explicit `CsrfPolicy` instead of being implied by code order.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsrfSource {
    /// `csrf-token` cookie set by the backend.
    Cookie,
    /// Token persisted in the session store after login.
    Storage,
    /// Last token this process resolved or was given.
    Memory,
}

/// Name of the cookie the backend may set alongside the login response.
pub const CSRF_COOKIE: &str = "csrf-token";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfPolicy {
    order: Vec<CsrfSource>,
}

impl Default for CsrfPolicy {
    fn default() -> Self {
        Self {
            order: vec![CsrfSource::Cookie, CsrfSource::Storage, CsrfSource::Memory],
        }
    }
}

impl CsrfPolicy {
    /// Custom order; duplicates are dropped, keeping the first occurrence.
    #[must_use]
    pub fn new(order: impl IntoIterator<Item = CsrfSource>) -> Self {
        let mut deduped = Vec::new();
        for source in order {
            if !deduped.contains(&source) {
                deduped.push(source);
            }
        }
        Self { order: deduped }
    }

    #[must_use]
    pub fn order(&self) -> &[CsrfSource] {
        &self.order
    }

    /// First non-empty token in policy order, with the source it came from.
    pub fn resolve(
        &self,
        mut lookup: impl FnMut(CsrfSource) -> Option<SecretString>,
    ) -> Option<(CsrfSource, SecretString)> {
        self.order.iter().find_map(|&source| {
            lookup(source)
                .filter(|token| !token.expose_secret().trim().is_empty())
                .map(|token| (source, token))
        })
    }
}

/// Holds the in-memory cache and the policy. Storage reads and writes go through
/// the owning `SessionContext`.
#[derive(Debug, Default)]
pub struct CsrfTokenProvider {
    policy: CsrfPolicy,
    memory: Option<SecretString>,
}

impl CsrfTokenProvider {
    #[must_use]
    pub fn new(policy: CsrfPolicy) -> Self {
        Self {
            policy,
            memory: None,
        }
    }

    /// Resolves a token from the cookie, the stored value or the cache, caching
    /// whatever wins.
    pub fn get(
        &mut self,
        cookie: Option<SecretString>,
        stored: Option<&SecretString>,
    ) -> Option<SecretString> {
        let memory = self.memory.clone();
        let mut cookie = cookie;
        let (source, token) = self.policy.resolve(|source| match source {
            CsrfSource::Cookie => cookie.take(),
            CsrfSource::Storage => stored.cloned(),
            CsrfSource::Memory => memory.clone(),
        })?;
        debug!(?source, "csrf token resolved");
        self.memory = Some(token.clone());
        Some(token)
    }

    pub fn set(&mut self, token: SecretString) {
        self.memory = Some(token);
    }

    pub fn clear(&mut self) {
        self.memory = None;
    }

    #[must_use]
    pub fn cached(&self) -> Option<&SecretString> {
        self.memory.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn exposed(token: Option<SecretString>) -> Option<String> {
        token.map(|t| t.expose_secret().to_string())
    }

    #[test]
    fn default_order_is_cookie_storage_memory() {
        assert_eq!(
            CsrfPolicy::default().order(),
            &[CsrfSource::Cookie, CsrfSource::Storage, CsrfSource::Memory]
        );
    }

    #[test]
    fn policy_resolves_in_order_and_skips_blank_tokens() {
        let policy = CsrfPolicy::default();
        let resolved = policy.resolve(|source| match source {
            CsrfSource::Cookie => Some(secret("  ")),
            CsrfSource::Storage => Some(secret("stored")),
            CsrfSource::Memory => Some(secret("memory")),
        });
        let (source, token) = resolved.expect("token resolved");
        assert_eq!(source, CsrfSource::Storage);
        assert_eq!(token.expose_secret(), "stored");

        assert!(policy.resolve(|_| None).is_none());
    }

    #[test]
    fn custom_policy_changes_precedence_and_dedupes() {
        let policy = CsrfPolicy::new([
            CsrfSource::Memory,
            CsrfSource::Cookie,
            CsrfSource::Memory,
        ]);
        assert_eq!(policy.order(), &[CsrfSource::Memory, CsrfSource::Cookie]);

        let resolved = policy.resolve(|source| match source {
            CsrfSource::Memory => Some(secret("memory")),
            _ => Some(secret("other")),
        });
        assert_eq!(resolved.map(|(source, _)| source), Some(CsrfSource::Memory));
    }

    #[test]
    fn provider_prefers_cookie_then_storage_then_memory() {
        let mut provider = CsrfTokenProvider::default();
        let stored = secret("stored");

        assert_eq!(
            exposed(provider.get(Some(secret("cookie")), Some(&stored))),
            Some("cookie".to_string())
        );
        assert_eq!(exposed(provider.get(None, Some(&stored))), Some("stored".to_string()));

        // Storage gone: the cache still holds the last resolved token.
        assert_eq!(exposed(provider.get(None, None)), Some("stored".to_string()));
    }

    #[test]
    fn provider_set_and_clear() {
        let mut provider = CsrfTokenProvider::default();
        assert!(provider.get(None, None).is_none());

        provider.set(secret("fresh"));
        assert_eq!(exposed(provider.get(None, None)), Some("fresh".to_string()));

        provider.clear();
        assert!(provider.cached().is_none());
        assert!(provider.get(None, None).is_none());
    }
}

//! Session context handed to every flow that needs credentials. Reads take
//! `&self`; every write takes `&mut self` and goes straight to the backing
//! store, so a context is the single writer of its session.

use super::csrf::{CsrfPolicy, CsrfTokenProvider};
use super::store::{MemorySessionStore, SessionStore, StoredSession};
use crate::app_lib::AppError;
use crate::features::auth::types::UserProfile;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

/// Credentials returned by a successful login or registration.
#[derive(Clone, Default)]
pub struct LoginTokens {
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
    pub user: Option<UserProfile>,
}

pub struct SessionContext {
    store: Box<dyn SessionStore>,
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    csrf_token: Option<SecretString>,
    user: Option<UserProfile>,
    csrf: CsrfTokenProvider,
    reset_token: Option<SecretString>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SessionContext")
            .field("authenticated", &self.access_token.is_some())
            .field("csrf_token", &self.csrf_token.is_some())
            .field("role", &self.user.as_ref().map(|user| user.role))
            .finish_non_exhaustive()
    }
}

fn secret(value: Option<String>) -> Option<SecretString> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

fn exposed(value: Option<&SecretString>) -> Option<String> {
    value.map(|v| v.expose_secret().to_string())
}

impl SessionContext {
    /// Loads the persisted session from `store`.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the store cannot be read.
    pub fn load(store: impl SessionStore + 'static) -> Result<Self, AppError> {
        Self::load_with_policy(store, CsrfPolicy::default())
    }

    /// # Errors
    /// Returns `AppError::Storage` if the store cannot be read.
    pub fn load_with_policy(
        store: impl SessionStore + 'static,
        policy: CsrfPolicy,
    ) -> Result<Self, AppError> {
        let stored = store.load()?;
        Ok(Self {
            store: Box::new(store),
            access_token: secret(stored.access_token),
            refresh_token: secret(stored.refresh_token),
            csrf_token: secret(stored.csrf_token),
            user: stored.user,
            csrf: CsrfTokenProvider::new(policy),
            reset_token: None,
        })
    }

    /// Empty session that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            store: Box::new(MemorySessionStore::default()),
            access_token: None,
            refresh_token: None,
            csrf_token: None,
            user: None,
            csrf: CsrfTokenProvider::default(),
            reset_token: None,
        }
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&SecretString> {
        self.access_token.as_ref()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }

    /// CSRF token persisted after login, without consulting the other sources.
    #[must_use]
    pub fn stored_csrf_token(&self) -> Option<&SecretString> {
        self.csrf_token.as_ref()
    }

    /// Cached user from the last login or profile fetch. May be stale.
    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Clears everything; called whenever a login page is shown.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the store cannot be written.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<(), AppError> {
        self.access_token = None;
        self.refresh_token = None;
        self.csrf_token = None;
        self.user = None;
        self.csrf.clear();
        self.persist()
    }

    /// Logout: same as `reset`, and removes the backing record entirely.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the store cannot be cleared.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), AppError> {
        self.access_token = None;
        self.refresh_token = None;
        self.csrf_token = None;
        self.user = None;
        self.reset_token = None;
        self.csrf.clear();
        self.store.clear()
    }

    /// Stores the access token and, when present, the refresh token and user.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the store cannot be written.
    #[instrument(skip_all)]
    pub fn store_login(&mut self, tokens: LoginTokens) -> Result<(), AppError> {
        if let Some(access_token) = tokens.access_token {
            self.access_token = Some(access_token);
        }
        if let Some(refresh_token) = tokens.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        if let Some(user) = tokens.user {
            self.user = Some(user);
        }
        debug!(authenticated = self.access_token.is_some(), "login stored");
        self.persist()
    }

    /// Replaces the cached user.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the store cannot be written.
    pub fn store_user(&mut self, user: UserProfile) -> Result<(), AppError> {
        self.user = Some(user);
        self.persist()
    }

    /// Persists a freshly issued CSRF token and primes the in-memory cache.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the store cannot be written.
    pub fn store_csrf_token(&mut self, token: SecretString) -> Result<(), AppError> {
        self.csrf.set(token.clone());
        self.csrf_token = Some(token);
        self.persist()
    }

    /// # Errors
    /// Returns `AppError::Storage` if the store cannot be written.
    pub fn clear_csrf_token(&mut self) -> Result<(), AppError> {
        self.csrf.clear();
        self.csrf_token = None;
        self.persist()
    }

    /// Resolves the CSRF token for a protected request following the policy:
    /// backend cookie, persisted value, in-memory cache.
    ///
    /// # Errors
    /// Returns `AppError::CsrfUnavailable` when no source has a token.
    pub fn csrf_token(&mut self, cookie: Option<String>) -> Result<SecretString, AppError> {
        let cookie = secret(cookie);
        self.csrf
            .get(cookie, self.csrf_token.as_ref())
            .ok_or(AppError::CsrfUnavailable)
    }

    /// Password-reset token for this process only; never persisted.
    pub fn set_reset_token(&mut self, token: SecretString) {
        self.reset_token = Some(token);
    }

    #[must_use]
    pub fn reset_token(&self) -> Option<&SecretString> {
        self.reset_token.as_ref()
    }

    pub fn clear_reset_token(&mut self) {
        self.reset_token = None;
    }

    fn persist(&self) -> Result<(), AppError> {
        self.store.save(&StoredSession {
            access_token: exposed(self.access_token.as_ref()),
            refresh_token: exposed(self.refresh_token.as_ref()),
            csrf_token: exposed(self.csrf_token.as_ref()),
            user: self.user.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::types::Role;
    use crate::session::csrf::CsrfSource;
    use serde_json::json;
    use std::sync::Arc;

    /// Store handle shared between the context and the test.
    #[derive(Clone, Default)]
    struct SharedStore(Arc<MemorySessionStore>);

    impl SessionStore for SharedStore {
        fn load(&self) -> Result<StoredSession, AppError> {
            self.0.load()
        }
        fn save(&self, session: &StoredSession) -> Result<(), AppError> {
            self.0.save(session)
        }
        fn clear(&self) -> Result<(), AppError> {
            self.0.clear()
        }
    }

    fn advisor() -> UserProfile {
        serde_json::from_value(json!({"role": "advisor", "isPaymentVerified": false}))
            .expect("valid profile")
    }

    fn login_tokens() -> LoginTokens {
        LoginTokens {
            access_token: Some(SecretString::from("access")),
            refresh_token: Some(SecretString::from("refresh")),
            user: Some(advisor()),
        }
    }

    #[test]
    fn store_login_persists_tokens_and_user() -> Result<(), AppError> {
        let store = SharedStore::default();
        let mut session = SessionContext::load(store.clone())?;
        assert!(!session.is_authenticated());

        session.store_login(login_tokens())?;

        assert!(session.is_authenticated());
        assert_eq!(session.user().map(|u| u.role), Some(Role::Advisor));
        let persisted = store.load()?;
        assert_eq!(persisted.access_token.as_deref(), Some("access"));
        assert_eq!(persisted.refresh_token.as_deref(), Some("refresh"));

        let reloaded = SessionContext::load(store)?;
        assert_eq!(
            reloaded.access_token().map(|t| t.expose_secret().to_string()),
            Some("access".to_string())
        );
        Ok(())
    }

    #[test]
    fn store_login_keeps_fields_the_response_omitted() -> Result<(), AppError> {
        let mut session = SessionContext::in_memory();
        session.store_login(login_tokens())?;
        session.store_login(LoginTokens {
            access_token: Some(SecretString::from("access-2")),
            ..LoginTokens::default()
        })?;

        assert_eq!(
            session.access_token().map(|t| t.expose_secret().to_string()),
            Some("access-2".to_string())
        );
        assert!(session.refresh_token().is_some());
        assert!(session.user().is_some());
        Ok(())
    }

    #[test]
    fn reset_and_clear_wipe_everything() -> Result<(), AppError> {
        let store = SharedStore::default();
        let mut session = SessionContext::load(store.clone())?;
        session.store_login(login_tokens())?;
        session.store_csrf_token(SecretString::from("csrf"))?;
        session.set_reset_token(SecretString::from("reset"));

        session.reset()?;
        assert!(!session.is_authenticated());
        assert!(session.stored_csrf_token().is_none());
        assert!(session.csrf_token(None).is_err());
        assert_eq!(store.load()?, StoredSession::default());

        session.store_login(login_tokens())?;
        session.clear()?;
        assert!(session.user().is_none());
        assert!(session.reset_token().is_none());
        assert_eq!(store.load()?, StoredSession::default());
        Ok(())
    }

    #[test]
    fn csrf_lookup_follows_policy() -> Result<(), AppError> {
        let mut session = SessionContext::in_memory();
        assert!(matches!(session.csrf_token(None), Err(AppError::CsrfUnavailable)));

        session.store_csrf_token(SecretString::from("stored"))?;
        let from_cookie = session.csrf_token(Some("cookie".to_string()))?;
        assert_eq!(from_cookie.expose_secret(), "cookie");

        let from_storage = session.csrf_token(None)?;
        assert_eq!(from_storage.expose_secret(), "stored");

        // An empty cookie value is not a token.
        let blank_cookie = session.csrf_token(Some(" ".to_string()))?;
        assert_eq!(blank_cookie.expose_secret(), "stored");
        Ok(())
    }

    #[test]
    fn memory_cache_survives_storage_loss_until_cleared() -> Result<(), AppError> {
        let store = SharedStore::default();
        let mut session = SessionContext::load_with_policy(
            store.clone(),
            CsrfPolicy::new([CsrfSource::Storage, CsrfSource::Memory]),
        )?;
        session.store_csrf_token(SecretString::from("stored"))?;
        // The storage copy goes away behind the context's back; only the
        // in-memory cache is left.
        session.csrf_token = None;
        assert_eq!(session.csrf_token(None)?.expose_secret(), "stored");

        session.clear_csrf_token()?;
        assert!(matches!(session.csrf_token(None), Err(AppError::CsrfUnavailable)));
        assert_eq!(store.load()?.csrf_token, None);
        Ok(())
    }

    #[test]
    fn blank_persisted_tokens_load_as_absent() -> Result<(), AppError> {
        let store = MemorySessionStore::new(StoredSession {
            access_token: Some(String::new()),
            refresh_token: Some("  ".to_string()),
            csrf_token: None,
            user: None,
        });
        let session = SessionContext::load(store)?;
        assert!(!session.is_authenticated());
        assert!(session.refresh_token().is_none());
        Ok(())
    }
}

//! Session state: persisted credentials, the CSRF token provider and the
//! context object that owns both.

pub mod context;
pub mod csrf;
pub mod store;

pub use context::{LoginTokens, SessionContext};
pub use csrf::{CSRF_COOKIE, CsrfPolicy, CsrfSource, CsrfTokenProvider};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};

//! Auth feature: login, registration, logout, password reset and email
//! verification. Passwords and tokens pass through here, so nothing in this
//! module logs request bodies.
//!
//! Flow overview: a login page clears the session, validates, posts the
//! credentials and stores the returned tokens; a successful login then fetches
//! the CSRF token that payment requests need. Registration stores whatever
//! tokens come back and sends the user to wait for the verification email.

pub mod client;
pub mod flows;
pub mod types;

pub use flows::{LoginForm, RegisterForm};
pub use types::{Role, UserProfile};

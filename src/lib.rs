//! # advisor-portal
//!
//! Client for the advisor/seller onboarding backend. Advisors register, pay for
//! a listing and publish a profile; sellers register and describe the business
//! they want to sell.
//!
//! ## Sessions
//!
//! Credentials (access token, refresh token, cached user, CSRF token) live in a
//! [`session::SessionContext`]. Only code holding `&mut SessionContext` can change
//! them. The context is backed by a [`session::SessionStore`], a JSON file by default.
//!
//! ## Route protection
//!
//! Client routes are enumerated in [`routes::Route`]. Protected routes declare a
//! [`routes::RouteRequirement`]; [`routes::guard::RouteGuard`] fetches a fresh
//! profile and evaluates the requirement with a pure policy function. The guard is
//! UX only: the backend remains the authority on every call.
//!
//! ## Flows
//!
//! Each screen of the portal is a flow under [`features`]. A flow
//! validates its input locally, issues its request(s) and returns an
//! [`app_lib::Outcome`]: the notices to show and the route to go to next.

pub mod app_lib;
pub mod cli;
pub mod features;
pub mod routes;
pub mod session;
pub mod validation;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}

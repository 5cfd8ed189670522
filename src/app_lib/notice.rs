//! User-facing results of a flow: transient notices plus an optional redirect.

use crate::routes::Route;
use crate::validation::ValidationErrors;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        };
        write!(formatter, "[{tag}] {}", self.message)
    }
}

/// What a flow tells its caller to show and where to go next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub notices: Vec<Notice>,
    pub redirect: Option<Route>,
}

impl Outcome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    #[must_use]
    pub fn redirect(mut self, route: Route) -> Self {
        self.redirect = Some(route);
        self
    }

    /// One error notice per failed field; no redirect.
    #[must_use]
    pub fn invalid(errors: &ValidationErrors) -> Self {
        Self {
            notices: errors
                .errors()
                .iter()
                .map(|error| Notice::error(error.message.clone()))
                .collect(),
            redirect: None,
        }
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.notices
            .iter()
            .any(|notice| notice.kind == NoticeKind::Error)
    }

    /// Messages of the error notices, in order.
    #[must_use]
    pub fn errors(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|notice| notice.kind == NoticeKind::Error)
            .map(|notice| notice.message.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_builder_collects_notices() {
        let outcome = Outcome::new()
            .with(Notice::success("Login successful"))
            .with(Notice::error("Failed to fetch CSRF token"))
            .redirect(Route::AdvisorPayments);

        assert!(outcome.has_errors());
        assert_eq!(outcome.errors(), vec!["Failed to fetch CSRF token"]);
        assert_eq!(outcome.redirect, Some(Route::AdvisorPayments));
    }

    #[test]
    fn invalid_form_lists_every_field() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Email is required");
        errors.add("password", "Password is required");

        let outcome = Outcome::invalid(&errors);
        assert_eq!(outcome.errors(), vec!["Email is required", "Password is required"]);
        assert_eq!(outcome.redirect, None);
    }

    #[test]
    fn notice_display_is_tagged() {
        assert_eq!(Notice::info("hello").to_string(), "[info] hello");
        assert_eq!(Notice::error("bad").to_string(), "[error] bad");
    }
}

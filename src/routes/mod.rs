//! Client route table. Every page of the application is a `Route`; protected
//! pages declare a `RouteRequirement` that the guard evaluates before rendering.

pub mod guard;

use crate::features::auth::types::Role;
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Auth,
    SellerLogin,
    SellerRegister,
    AdvisorLogin,
    AdvisorRegister,
    SellerDashboard,
    AdvisorDashboard,
    AdvisorPayments,
    AdvisorForm,
    AdvisorUpload,
    ResetPassword,
    ForgotPassword,
    Continue,
    VerifyEmail,
}

/// Requirement declared by a protected route. Exists only at render time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteRequirement {
    pub required_role: Option<Role>,
    pub requires_payment: bool,
}

impl RouteRequirement {
    #[must_use]
    pub const fn role(role: Role) -> Self {
        Self {
            required_role: Some(role),
            requires_payment: false,
        }
    }

    #[must_use]
    pub const fn paid(role: Role) -> Self {
        Self {
            required_role: Some(role),
            requires_payment: true,
        }
    }
}

impl Route {
    pub const ALL: [Self; 15] = [
        Self::Home,
        Self::Auth,
        Self::SellerLogin,
        Self::SellerRegister,
        Self::AdvisorLogin,
        Self::AdvisorRegister,
        Self::SellerDashboard,
        Self::AdvisorDashboard,
        Self::AdvisorPayments,
        Self::AdvisorForm,
        Self::AdvisorUpload,
        Self::ResetPassword,
        Self::ForgotPassword,
        Self::Continue,
        Self::VerifyEmail,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Auth => "/auth",
            Self::SellerLogin => "/seller-login",
            Self::SellerRegister => "/seller-register",
            Self::AdvisorLogin => "/advisor-login",
            Self::AdvisorRegister => "/advisor-register",
            Self::SellerDashboard => "/seller-dashboard",
            Self::AdvisorDashboard => "/advisor-dashboard",
            Self::AdvisorPayments => "/advisor-payments",
            Self::AdvisorForm => "/advisor-form",
            Self::AdvisorUpload => "/advisor-upload",
            Self::ResetPassword => "/reset-password",
            Self::ForgotPassword => "/forgot-password",
            Self::Continue => "/continue",
            Self::VerifyEmail => "/verify-email",
        }
    }

    /// `None` for public pages.
    #[must_use]
    pub const fn requirement(self) -> Option<RouteRequirement> {
        match self {
            Self::SellerDashboard => Some(RouteRequirement::role(Role::Seller)),
            Self::AdvisorDashboard
            | Self::AdvisorPayments
            | Self::AdvisorForm
            | Self::AdvisorUpload => Some(RouteRequirement::role(Role::Advisor)),
            _ => None,
        }
    }

    /// Login page for a required role, home when no role is required.
    #[must_use]
    pub const fn login_for(role: Option<Role>) -> Self {
        match role {
            Some(Role::Advisor) => Self::AdvisorLogin,
            Some(Role::Seller) => Self::SellerLogin,
            _ => Self::Home,
        }
    }

    /// Dashboard of the role a user actually has, home for unknown roles.
    #[must_use]
    pub const fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Advisor => Self::AdvisorDashboard,
            Role::Seller => Self::SellerDashboard,
            Role::Unknown => Self::Home,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let path = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
        let normalized = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        let normalized = if normalized.starts_with('/') {
            normalized.to_string()
        } else {
            format!("/{normalized}")
        };

        if normalized == "/adviser-payment" {
            return Ok(Self::AdvisorPayments);
        }

        Self::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .ok_or_else(|| format!("unknown route: {trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_through_parse() {
        for route in Route::ALL {
            assert_eq!(route.path().parse::<Route>(), Ok(route));
        }
    }

    #[test]
    fn parse_tolerates_query_slashes_and_alias() {
        assert_eq!("/reset-password?token=abc".parse(), Ok(Route::ResetPassword));
        assert_eq!("seller-dashboard/".parse(), Ok(Route::SellerDashboard));
        assert_eq!("/adviser-payment".parse(), Ok(Route::AdvisorPayments));
        assert_eq!("".parse(), Ok(Route::Home));
        assert!("/buyer-dashboard".parse::<Route>().is_err());
    }

    #[test]
    fn protected_routes_declare_requirements() {
        assert_eq!(
            Route::SellerDashboard.requirement(),
            Some(RouteRequirement::role(Role::Seller))
        );
        for route in [
            Route::AdvisorDashboard,
            Route::AdvisorPayments,
            Route::AdvisorForm,
            Route::AdvisorUpload,
        ] {
            assert_eq!(route.requirement(), Some(RouteRequirement::role(Role::Advisor)));
        }
        for route in [Route::Home, Route::SellerLogin, Route::ResetPassword, Route::Continue] {
            assert_eq!(route.requirement(), None);
        }
    }

    #[test]
    fn login_and_dashboard_targets() {
        assert_eq!(Route::login_for(Some(Role::Advisor)), Route::AdvisorLogin);
        assert_eq!(Route::login_for(Some(Role::Seller)), Route::SellerLogin);
        assert_eq!(Route::login_for(None), Route::Home);
        assert_eq!(Route::dashboard_for(Role::Seller), Route::SellerDashboard);
        assert_eq!(Route::dashboard_for(Role::Unknown), Route::Home);
    }
}

//! Seller profile payloads, match listings and the two seller form rule sets:
//! the looser one used when the profile is created and the stricter one used
//! when it is edited from the dashboard.

use crate::validation::{self, ValidationErrors};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

pub const CURRENCIES: [&str; 4] = ["USD", "PKR", "EUR", "GBP"];
const MIN_UPDATE_REVENUE: f64 = 1_000.0;
const MAX_UPDATE_REVENUE: f64 = 999_999_999.0;

fn default_currency() -> String {
    "USD".to_string()
}

/// Seller profile as entered on the create or edit form. Name and email are
/// shown on the form but are not part of the payload.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfileForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub geography: String,
    #[serde(default)]
    pub annual_revenue: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub description: String,
}

impl Default for SellerProfileForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            company_name: String::new(),
            phone: String::new(),
            website: String::new(),
            industry: String::new(),
            geography: String::new(),
            annual_revenue: None,
            currency: default_currency(),
            description: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfilePayload<'a> {
    pub company_name: &'a str,
    pub phone: &'a str,
    pub website: &'a str,
    pub industry: &'a str,
    pub geography: &'a str,
    pub annual_revenue: f64,
    pub currency: &'a str,
    pub description: &'a str,
}

impl SellerProfileForm {
    #[must_use]
    pub fn payload(&self) -> SellerProfilePayload<'_> {
        SellerProfilePayload {
            company_name: self.company_name.trim(),
            phone: self.phone.trim(),
            website: self.website.trim(),
            industry: self.industry.trim(),
            geography: self.geography.trim(),
            annual_revenue: self.annual_revenue.unwrap_or_default(),
            currency: self.currency.trim(),
            description: self.description.trim(),
        }
    }

    /// Rules for the profile creation form.
    ///
    /// # Errors
    /// Returns every failed field.
    pub fn validate_create(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "fullName",
            validation::required(&self.full_name, "Full Name is required"),
        );
        errors.check("email", validation::email(&self.email));

        if self.company_name.trim().is_empty() {
            errors.add("companyName", "Company name is required");
        } else {
            errors.check(
                "companyName",
                validation::length_between(self.company_name.trim(), 3, usize::MAX, "Company name"),
            );
        }

        if self.phone.trim().is_empty() {
            errors.add("phone", "Phone is required");
        } else if !validation::valid_phone(self.phone.trim()) {
            errors.add("phone", "Enter a valid phone number");
        }

        if self.website.trim().is_empty() {
            errors.add("website", "Website is required");
        } else if !validation::valid_url(&self.website) {
            errors.add("website", "Enter a valid website URL (https://example.com)");
        }

        self.check_selections(&mut errors);

        match self.annual_revenue {
            None => errors.add("annualRevenue", "Annual revenue is required"),
            Some(revenue) if revenue <= 0.0 => {
                errors.add("annualRevenue", "Annual revenue must be positive");
            }
            Some(_) => {}
        }

        errors.check(
            "currency",
            validation::required(&self.currency, "Currency is required"),
        );

        if self.description.trim().is_empty() {
            errors.add("description", "Description is required");
        } else {
            errors.check(
                "description",
                validation::length_between(&self.description, 10, usize::MAX, "Description"),
            );
        }

        errors.into_result()
    }

    /// Rules for editing an existing profile from the dashboard.
    ///
    /// # Errors
    /// Returns every failed field.
    pub fn validate_update(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.company_name.trim().is_empty() {
            errors.add("companyName", "Company name is required");
        } else {
            errors.check(
                "companyName",
                validation::length_between(self.company_name.trim(), 2, 100, "Company name"),
            );
        }

        let phone = self.phone.trim();
        if phone.is_empty() {
            errors.add("phone", "Phone number is required");
        } else if !validation::valid_international_phone(phone) {
            errors.add("phone", "Enter a valid phone number with country code");
        } else if phone.chars().count() < 10 {
            errors.add("phone", "Phone number must be at least 10 digits");
        }

        let website = self.website.trim();
        if website.is_empty() {
            errors.add("website", "Website is required");
        } else if !validation::matches(website, r"^https?://.+\..+") {
            errors.add("website", "Website must be a valid URL (https://example.com)");
        }

        self.check_selections(&mut errors);

        match self.annual_revenue {
            None => errors.add("annualRevenue", "Annual revenue is required"),
            Some(revenue) if revenue < MIN_UPDATE_REVENUE => {
                errors.add("annualRevenue", "Annual revenue must be at least $1,000");
            }
            Some(revenue) if revenue > MAX_UPDATE_REVENUE => {
                errors.add("annualRevenue", "Annual revenue is too large");
            }
            Some(_) => {}
        }

        if !CURRENCIES.contains(&self.currency.trim()) {
            errors.add("currency", "Please select a valid currency");
        }

        if self.description.trim().is_empty() {
            errors.add("description", "Description cannot be empty or just whitespace");
        } else {
            errors.check(
                "description",
                validation::length_between(&self.description, 20, 1000, "Description"),
            );
        }

        errors.into_result()
    }

    fn check_selections(&self, errors: &mut ValidationErrors) {
        errors.check(
            "industry",
            validation::required(&self.industry, "Industry is required"),
        );
        errors.check(
            "geography",
            validation::required(&self.geography, "Geography is required"),
        );
    }
}

/// Seller profile as stored by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub geography: String,
    #[serde(default)]
    pub annual_revenue: Option<f64>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An advisor matched to the seller's profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerMatch {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub years_experience: Option<f64>,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub geographies: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ordering of the match list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Newest,
    Years,
    Company,
}

impl SortBy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Years => "years",
            Self::Company => "company",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "years" => Ok(Self::Years),
            "company" => Ok(Self::Company),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_form() -> SellerProfileForm {
        SellerProfileForm {
            full_name: "Sam Shop".to_string(),
            email: "sam@shop.com".to_string(),
            company_name: "Sam's Shop".to_string(),
            phone: "+1 555-0100".to_string(),
            website: "https://shop.example.com".to_string(),
            industry: "Retail".to_string(),
            geography: "North America".to_string(),
            annual_revenue: Some(250_000.0),
            currency: "USD".to_string(),
            description: "Family-owned retail shop.".to_string(),
        }
    }

    fn update_form() -> SellerProfileForm {
        SellerProfileForm {
            phone: "+15550100123".to_string(),
            description: "Family-owned retail shop since 1998.".to_string(),
            ..create_form()
        }
    }

    #[test]
    fn create_form_rules() {
        assert_eq!(create_form().validate_create(), Ok(()));

        let form = SellerProfileForm {
            company_name: "ab".to_string(),
            phone: "call me".to_string(),
            website: "shop".to_string(),
            annual_revenue: Some(0.0),
            description: "short".to_string(),
            ..create_form()
        };
        let errors = form.validate_create().err().unwrap_or_default();
        assert_eq!(
            errors.message_for("companyName"),
            Some("Company name must be at least 3 characters")
        );
        assert_eq!(errors.message_for("phone"), Some("Enter a valid phone number"));
        assert_eq!(
            errors.message_for("website"),
            Some("Enter a valid website URL (https://example.com)")
        );
        assert_eq!(
            errors.message_for("annualRevenue"),
            Some("Annual revenue must be positive")
        );
        assert_eq!(
            errors.message_for("description"),
            Some("Description must be at least 10 characters")
        );
    }

    #[test]
    fn update_form_rules_are_stricter() {
        assert_eq!(update_form().validate_update(), Ok(()));

        // Valid on creation, rejected on edit.
        let form = create_form();
        assert_eq!(form.validate_create(), Ok(()));
        let errors = form.validate_update().err().unwrap_or_default();
        assert_eq!(
            errors.message_for("phone"),
            Some("Enter a valid phone number with country code")
        );

        let form = SellerProfileForm {
            phone: "+1555".to_string(),
            annual_revenue: Some(999.0),
            currency: "JPY".to_string(),
            description: "   ".to_string(),
            ..update_form()
        };
        let errors = form.validate_update().err().unwrap_or_default();
        assert_eq!(
            errors.message_for("phone"),
            Some("Phone number must be at least 10 digits")
        );
        assert_eq!(
            errors.message_for("annualRevenue"),
            Some("Annual revenue must be at least $1,000")
        );
        assert_eq!(errors.message_for("currency"), Some("Please select a valid currency"));
        assert_eq!(
            errors.message_for("description"),
            Some("Description cannot be empty or just whitespace")
        );
    }

    #[test]
    fn update_revenue_upper_bound() {
        let form = SellerProfileForm {
            annual_revenue: Some(1_000_000_000.0),
            ..update_form()
        };
        let errors = form.validate_update().err().unwrap_or_default();
        assert_eq!(errors.message_for("annualRevenue"), Some("Annual revenue is too large"));
    }

    #[test]
    fn payload_leaves_out_name_and_email() -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(create_form().payload())?;
        assert_eq!(value["companyName"], json!("Sam's Shop"));
        assert_eq!(value["annualRevenue"], json!(250_000.0));
        assert!(value.get("fullName").is_none());
        assert!(value.get("email").is_none());
        Ok(())
    }

    #[test]
    fn sort_by_parses() {
        assert_eq!("Years".parse::<SortBy>(), Ok(SortBy::Years));
        assert_eq!(SortBy::default().as_str(), "newest");
        assert!("oldest".parse::<SortBy>().is_err());
    }
}

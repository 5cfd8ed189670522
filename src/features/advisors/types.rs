//! Advisor profile payloads and their form rules.

use crate::features::uploads::UploadFile;
use crate::validation::{self, ValidationErrors};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MAX_TESTIMONIALS: usize = 5;

fn default_currency() -> String {
    "USD".to_string()
}

/// Something that looks like a testimonial row: a client name, a quote and an
/// attached file. A row with a client name is "started" and must be finished.
pub trait TestimonialEntry {
    fn client_name(&self) -> &str;
    fn text(&self) -> &str;
    fn has_file(&self) -> bool;

    fn is_started(&self) -> bool {
        !self.client_name().trim().is_empty()
    }

    fn is_complete(&self) -> bool {
        self.is_started() && !self.text().trim().is_empty() && self.has_file()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub testimonial: String,
    #[serde(default)]
    pub pdf_url: String,
}

impl TestimonialEntry for Testimonial {
    fn client_name(&self) -> &str {
        &self.client_name
    }

    fn text(&self) -> &str {
        &self.testimonial
    }

    fn has_file(&self) -> bool {
        !self.pdf_url.trim().is_empty()
    }
}

/// Testimonial row on the upload screen, before its PDF is uploaded.
#[derive(Clone, Debug, Default)]
pub struct TestimonialUpload {
    pub client_name: String,
    pub testimonial: String,
    pub pdf: Option<UploadFile>,
}

impl TestimonialEntry for TestimonialUpload {
    fn client_name(&self) -> &str {
        &self.client_name
    }

    fn text(&self) -> &str {
        &self.testimonial
    }

    fn has_file(&self) -> bool {
        self.pdf.is_some()
    }
}

/// Checks the testimonial rows: at most five, started rows finished, and at
/// least one finished row.
pub fn check_testimonials<T: TestimonialEntry>(entries: &[T], errors: &mut ValidationErrors) {
    if entries.len() > MAX_TESTIMONIALS {
        errors.add("testimonials", "You can add up to 5 testimonials only");
    }
    for entry in entries.iter().filter(|entry| entry.is_started()) {
        if entry.text().trim().is_empty() {
            errors.add("testimonials", "Testimonial required");
        }
        if !entry.has_file() {
            errors.add("testimonials", "PDF required");
        }
    }
    if !entries.iter().any(TestimonialEntry::is_complete) {
        errors.add("testimonials", "At least one testimonial is required");
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Advisor profile as filled in on the profile form. Also the draft handed
/// from the form to the upload screen, where logo and testimonials are added.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorProfileForm {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub geographies: Vec<String>,
    #[serde(default)]
    pub years_experience: Option<i64>,
    #[serde(default)]
    pub number_of_transactions: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub licensing: String,
    #[serde(default)]
    pub revenue_range: RevenueRange,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Default for AdvisorProfileForm {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            phone: String::new(),
            website: String::new(),
            industries: Vec::new(),
            geographies: Vec::new(),
            years_experience: None,
            number_of_transactions: None,
            currency: default_currency(),
            description: String::new(),
            licensing: String::new(),
            revenue_range: RevenueRange::default(),
            testimonials: Vec::new(),
            logo_url: None,
        }
    }
}

impl AdvisorProfileForm {
    /// # Errors
    /// Returns every failed field, testimonials included.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.check_fields(&mut errors);
        check_testimonials(&self.testimonials, &mut errors);
        errors.into_result()
    }

    fn check_fields(&self, errors: &mut ValidationErrors) {
        errors.check(
            "companyName",
            validation::required(&self.company_name, "Company name is required"),
        );
        errors.check("phone", validation::required(&self.phone, "Phone is required"));
        if self.website.trim().is_empty() {
            errors.add("website", "Website is required");
        } else if !validation::valid_url(&self.website) {
            errors.add("website", "Invalid URL");
        }
        if self.industries.iter().all(|item| item.trim().is_empty()) {
            errors.add("industries", "Pick at least one industry");
        }
        if self.geographies.iter().all(|item| item.trim().is_empty()) {
            errors.add("geographies", "Pick at least one geography");
        }
        match self.years_experience {
            None => errors.add("yearsExperience", "Years of experience is required"),
            Some(years) if years < 1 => {
                errors.add("yearsExperience", "Years of experience must be at least 1");
            }
            Some(_) => {}
        }
        match self.number_of_transactions {
            None => errors.add("numberOfTransactions", "Number of transactions is required"),
            Some(count) if count < 0 => {
                errors.add("numberOfTransactions", "Number of transactions cannot be negative");
            }
            Some(_) => {}
        }
        errors.check(
            "currency",
            validation::required(&self.currency, "Currency is required"),
        );
        errors.check(
            "description",
            validation::required(&self.description, "Description is required"),
        );
        errors.check(
            "licensing",
            validation::required(&self.licensing, "Licensing is required"),
        );
        if self.revenue_range.min.is_none() {
            errors.add("revenueRange", "Minimum revenue is required");
        }
        if self.revenue_range.max.is_none() {
            errors.add("revenueRange", "Maximum revenue is required");
        }
    }
}

/// Advisor profile as stored by the backend. Only the fields shown on the
/// dashboard are typed; everything else is kept as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorProfile {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub geographies: Vec<String>,
    #[serde(default)]
    pub years_experience: Option<f64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

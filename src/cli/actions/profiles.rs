use crate::cli::{actions::report, globals::GlobalArgs};
use crate::features::{
    advisors::{self, AdvisorProfileForm, TestimonialUpload},
    sellers::{self, SellerProfileForm, SortBy},
    uploads::UploadFile,
};
use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Testimonial given on the command line as `NAME|TEXT|PDF_PATH`. Missing
/// parts are allowed; incomplete rows are dropped by the upload flow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestimonialArg {
    pub client_name: String,
    pub testimonial: String,
    pub pdf: Option<PathBuf>,
}

impl TestimonialArg {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut parts = value.splitn(3, '|').map(str::trim);
        let client_name = parts.next().unwrap_or_default().to_string();
        let testimonial = parts.next().unwrap_or_default().to_string();
        let pdf = parts
            .next()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        Self {
            client_name,
            testimonial,
            pdf,
        }
    }

    async fn load(self) -> Result<TestimonialUpload> {
        let pdf = match &self.pdf {
            Some(path) => Some(UploadFile::read(path).await?),
            None => None,
        };
        Ok(TestimonialUpload {
            client_name: self.client_name,
            testimonial: self.testimonial,
            pdf,
        })
    }
}

#[derive(Debug)]
pub enum Args {
    AdvisorProfile {
        file: PathBuf,
        logo: Option<PathBuf>,
    },
    AdvisorUpload {
        logo: PathBuf,
        testimonials: Vec<TestimonialArg>,
        draft: Option<PathBuf>,
    },
    AdvisorDashboard,
    SellerProfile { file: PathBuf },
    SellerUpdate { file: PathBuf },
    SellerDashboard { sort: SortBy },
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
}

async fn read_logo(path: Option<&Path>) -> Result<Option<UploadFile>> {
    match path {
        Some(path) => Ok(Some(UploadFile::read(path).await?)),
        None => Ok(None),
    }
}

/// Execute a profile action.
/// # Errors
/// Returns an error if an input file cannot be read or the flow fails.
pub async fn execute(args: Args, globals: &GlobalArgs) -> Result<()> {
    let api = globals.api()?;
    let mut session = globals.session()?;

    match args {
        Args::AdvisorProfile { file, logo } => {
            let form: AdvisorProfileForm = read_json(&file).await?;
            let logo = read_logo(logo.as_deref()).await?;
            report(&advisors::flows::submit_profile(&api, &session, form, logo).await)
        }
        Args::AdvisorUpload {
            logo,
            testimonials,
            draft,
        } => {
            let draft = match draft {
                Some(path) => read_json(&path).await?,
                None => AdvisorProfileForm::default(),
            };
            let logo = read_logo(Some(&logo)).await?;
            let mut uploads = Vec::with_capacity(testimonials.len());
            for testimonial in testimonials {
                uploads.push(testimonial.load().await?);
            }
            report(&advisors::flows::upload_and_submit(&api, &session, draft, logo, uploads).await)
        }
        Args::AdvisorDashboard => {
            let dashboard = advisors::flows::dashboard(&api, &session)
                .await
                .or_else(|outcome| {
                    report(&outcome)?;
                    Err(anyhow!("Advisor dashboard unavailable"))
                })?;
            println!("{} <{}>", dashboard.user.name, dashboard.user.email);
            match dashboard.profile {
                Some(profile) => {
                    println!("company: {}", profile.company_name);
                    println!("phone: {}", profile.phone);
                    println!("website: {}", profile.website);
                    println!("industries: {}", profile.industries.join(", "));
                    println!("geographies: {}", profile.geographies.join(", "));
                    println!("active: {}", profile.is_active);
                }
                None => println!("profile unavailable"),
            }
            Ok(())
        }
        Args::SellerProfile { file } => {
            let form: SellerProfileForm = read_json(&file).await?;
            report(&sellers::flows::create_profile(&api, &session, &form).await)
        }
        Args::SellerUpdate { file } => {
            let form: SellerProfileForm = read_json(&file).await?;
            report(&sellers::flows::update_profile(&api, &mut session, &form).await)
        }
        Args::SellerDashboard { sort } => {
            let dashboard = sellers::flows::dashboard(&api, &session, sort).await;
            if let Some(profile) = &dashboard.profile {
                println!("company: {}", profile.company_name);
                println!("industry: {}", profile.industry);
                println!("geography: {}", profile.geography);
            }
            println!("matches ({sort}): {}", dashboard.matches.len());
            for advisor in &dashboard.matches {
                let years = advisor
                    .years_experience
                    .map_or_else(|| "-".to_string(), |years| years.to_string());
                println!("  {} ({years} yrs) {}", advisor.company_name, advisor.website);
            }
            report(&dashboard.outcome)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_testimonial() {
        assert_eq!(
            TestimonialArg::parse("Acme | Great advisor | docs/acme.pdf"),
            TestimonialArg {
                client_name: "Acme".to_string(),
                testimonial: "Great advisor".to_string(),
                pdf: Some(PathBuf::from("docs/acme.pdf")),
            }
        );
    }

    #[test]
    fn test_parse_partial_testimonial() {
        let parsed = TestimonialArg::parse("Acme|Great advisor");
        assert_eq!(parsed.testimonial, "Great advisor");
        assert_eq!(parsed.pdf, None);

        let parsed = TestimonialArg::parse("Acme||");
        assert_eq!(parsed.client_name, "Acme");
        assert!(parsed.testimonial.is_empty());
        assert_eq!(parsed.pdf, None);
    }

    #[test]
    fn test_pdf_path_keeps_extra_separators() {
        let parsed = TestimonialArg::parse("Acme|Fast|a|b.pdf");
        assert_eq!(parsed.pdf, Some(PathBuf::from("a|b.pdf")));
    }

    #[tokio::test]
    async fn test_read_json_reports_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("profile.json");
        tokio::fs::write(&path, "{not json").await?;

        let result: Result<SellerProfileForm> = read_json(&path).await;
        let message = result.err().map(|err| err.to_string()).unwrap_or_default();
        assert!(message.contains("profile.json"), "{message}");
        Ok(())
    }

    #[tokio::test]
    async fn test_read_seller_form() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("seller.json");
        tokio::fs::write(
            &path,
            r#"{"fullName":"Grace Hopper","companyName":"Hopper Labs","annualRevenue":250000}"#,
        )
        .await?;

        let form: SellerProfileForm = read_json(&path).await?;
        assert_eq!(form.company_name, "Hopper Labs");
        assert_eq!(form.annual_revenue, Some(250_000.0));
        assert_eq!(form.currency, "USD");
        Ok(())
    }
}

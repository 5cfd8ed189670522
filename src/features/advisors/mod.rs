//! Advisor feature: profile creation (form and upload screens) and the
//! advisor dashboard.

pub mod client;
pub mod flows;
pub mod types;

pub use types::{AdvisorProfile, AdvisorProfileForm, RevenueRange, Testimonial, TestimonialUpload};

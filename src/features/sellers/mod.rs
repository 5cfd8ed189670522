//! Seller feature: profile creation and editing, and the dashboard listing
//! matched advisors.

pub mod client;
pub mod flows;
pub mod types;

pub use types::{SellerMatch, SellerProfile, SellerProfileForm, SortBy};

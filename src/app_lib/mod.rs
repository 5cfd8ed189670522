//! Shared plumbing for feature clients: configuration, HTTP helpers, the error
//! type and flow outcomes.

pub mod api;
pub mod config;
pub mod errors;
pub mod notice;

pub use api::{ApiClient, bearer, csrf};
pub use config::{AppConfig, ConfigOverrides};
pub use errors::AppError;
pub use notice::{Notice, NoticeKind, Outcome};

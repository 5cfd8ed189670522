//! Application features. Each one has a thin `client` over its endpoints,
//! its payload `types` with form rules, and the `flows` that screens run.

pub mod advisors;
pub mod auth;
pub mod payment;
pub mod sellers;
pub mod uploads;

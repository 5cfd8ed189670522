//! Command-line front end: argument parsing, logging setup and one action per
//! screen of the portal.

pub mod actions;
pub mod globals;
pub mod telemetry;

pub mod commands;
pub mod dispatch;

mod start;
pub use self::start::start;

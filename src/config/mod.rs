//! Configuration module for billdesk
//!
//! - Base directory resolution (environment override or platform default)
//! - Back-office settings persistence

pub mod paths;
pub mod settings;

pub use paths::BilldeskPaths;
pub use settings::Settings;

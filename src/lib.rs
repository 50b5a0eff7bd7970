//! billdesk - billing back office for a coworking space
//!
//! Keeps users, the service catalogue and bills in JSON files, and turns the
//! bills into revenue and subscription reports.
//!
//! # Architecture
//!
//! - `config`: path resolution and user settings
//! - `error`: the crate-wide error type
//! - `models`: money, IDs, bills, services and users
//! - `storage`: JSON repositories with atomic writes
//! - `audit`: append-only audit trail
//! - `services`: business rules on top of storage
//! - `reports`: revenue and subscription aggregation
//! - `display`, `export`, `cli`: terminal output, file export and commands
//!
//! # Example
//!
//! ```rust,ignore
//! use billdesk::reports::{annual_revenue, monthly_revenue};
//!
//! let march = monthly_revenue(&bills, 2018, 3);
//! let year = annual_revenue(&bills, 2018, 2018, 4);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BilldeskError, BilldeskResult};

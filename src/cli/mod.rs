//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Handlers print to
//! stdout; diagnostics go through `tracing` to stderr.

pub mod bill;
pub mod export;
pub mod report;
pub mod service;
pub mod user;

pub use bill::{handle_bill_command, BillCommands};
pub use export::{handle_export_command, ExportCommands};
pub use report::{handle_report_command, ReportCommands};
pub use service::{handle_service_command, ServiceCommands};
pub use user::{handle_user_command, UserCommands};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{BilldeskError, BilldeskResult};
use crate::models::Money;

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> BilldeskResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        BilldeskError::Validation(format!("Invalid date: {}. Use YYYY-MM-DD", s))
    })
}

/// Parse an amount argument such as "250", "250.00" or "250,5"
pub fn parse_money(s: &str) -> BilldeskResult<Money> {
    Money::parse(s).map_err(|e| BilldeskError::Validation(e.to_string()))
}

/// Open `path` for buffered writing
pub(crate) fn create_output(path: &Path) -> BilldeskResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        BilldeskError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

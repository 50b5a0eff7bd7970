//! Subscription Report
//!
//! Counts how many bill lines were sold per service in a year. Only services
//! that are currently available are counted, and service names are matched
//! exactly.

use crate::error::{BilldeskError, BilldeskResult};
use crate::models::Service;
use crate::services::{BillService, ServiceService};
use crate::storage::Storage;
use chrono::{Datelike, NaiveDate};
use std::io::Write;

/// Read-only view of a bill line joined with its bill and service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillLineRecord {
    /// Billing date of the parent bill
    pub billing_date: NaiveDate,
    pub service_name: String,
    /// Current availability of the service
    pub service_available: bool,
}

/// Number of lines for `service_name` on bills dated in `year`
///
/// Lines whose service is no longer available are not counted.
pub fn subscription_count(lines: &[BillLineRecord], service_name: &str, year: i32) -> usize {
    lines
        .iter()
        .filter(|l| {
            l.service_available
                && l.service_name == service_name
                && l.billing_date.year() == year
        })
        .count()
}

/// Subscription count for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSubscription {
    pub service_name: String,
    pub bill_line_count: usize,
}

/// Subscription counts for every available service in a year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionReport {
    pub year: i32,
    pub rows: Vec<ServiceSubscription>,
}

impl SubscriptionReport {
    /// One row per available service, ordered by service name
    pub fn compute(lines: &[BillLineRecord], services: &[Service], year: i32) -> Self {
        let mut names: Vec<&str> = services
            .iter()
            .filter(|s| s.is_available)
            .map(|s| s.name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();

        let rows = names
            .into_iter()
            .map(|name| ServiceSubscription {
                service_name: name.to_string(),
                bill_line_count: subscription_count(lines, name, year),
            })
            .collect();

        Self { year, rows }
    }

    /// Generate the report for `year` from storage
    pub fn generate(storage: &Storage, year: i32) -> BilldeskResult<Self> {
        let lines = BillService::new(storage).line_records()?;
        let services = ServiceService::new(storage).list(Some(true))?;
        tracing::debug!(year, lines = lines.len(), "computing subscription report");
        Ok(Self::compute(&lines, &services, year))
    }

    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.bill_line_count).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Subscriptions {}\n", self.year));
        output.push_str(&"=".repeat(50));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No available services.\n");
            return output;
        }

        output.push_str(&format!("{:<38} {:>11}\n", "Service", "Bill lines"));
        output.push_str(&"-".repeat(50));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<38} {:>11}\n",
                crate::display::report::truncate(&row.service_name, 38),
                row.bill_line_count
            ));
        }

        output.push_str(&"-".repeat(50));
        output.push('\n');
        output.push_str(&format!("{:<38} {:>11}\n", "TOTAL", self.total()));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> BilldeskResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["Year", "Service", "Bill Lines"])?;
        for row in &self.rows {
            csv_writer.write_record([
                self.year.to_string(),
                row.service_name.clone(),
                row.bill_line_count.to_string(),
            ])?;
        }

        csv_writer
            .flush()
            .map_err(|e| BilldeskError::Export(e.to_string()))?;
        Ok(())
    }
}

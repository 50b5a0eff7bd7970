//! CLI commands for reports

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{BilldeskError, BilldeskResult};
use crate::reports::{RevenueBasis, RevenueHistory, SubscriptionReport};
use crate::storage::Storage;

use super::{create_output, parse_date};

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Revenue per month with the annual total (projected for the current year)
    Revenue {
        /// Year to report on, defaults to the current year
        #[arg(short, long, conflicts_with = "all_years")]
        year: Option<i32>,

        /// One row per year from the first bill to today
        #[arg(long)]
        all_years: bool,

        /// billed (every bill) or collected (paid bills only)
        #[arg(short, long)]
        basis: Option<String>,

        /// Compute as if today were this date (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Bill lines sold per available service
    #[command(alias = "subs")]
    Subscriptions {
        /// Year to report on, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> BilldeskResult<()> {
    match cmd {
        ReportCommands::Revenue {
            year,
            all_years,
            basis,
            as_of,
            output,
        } => {
            let today = resolve_today(as_of.as_deref())?;
            let basis = match basis {
                Some(b) => RevenueBasis::parse(&b).ok_or_else(|| {
                    BilldeskError::Validation(format!(
                        "Invalid revenue basis: {}. Use billed or collected",
                        b
                    ))
                })?,
                None => settings.revenue_basis,
            };

            let history = if all_years {
                RevenueHistory::generate(storage, today, basis)?
            } else {
                let year = year.unwrap_or_else(|| today.year());
                RevenueHistory::generate_year(storage, year, today, basis)?
            };

            match output {
                Some(path) => {
                    history.export_csv(create_output(&path)?)?;
                    println!("Revenue report exported to: {}", path.display());
                }
                None => println!("{}", history.format_terminal(&settings.currency_symbol)),
            }
        }

        ReportCommands::Subscriptions { year, output } => {
            let year = year.unwrap_or_else(|| chrono::Local::now().year());
            let report = SubscriptionReport::generate(storage, year)?;

            match output {
                Some(path) => {
                    report.export_csv(create_output(&path)?)?;
                    println!("Subscription report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal()),
            }
        }
    }

    Ok(())
}

fn resolve_today(as_of: Option<&str>) -> BilldeskResult<NaiveDate> {
    match as_of {
        Some(date) => parse_date(date),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

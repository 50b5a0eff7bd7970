//! Revenue Report
//!
//! Sums bill amounts per calendar month and per year. For the current year
//! the annual figure is a projection that annualises the months already
//! completed. Every computation here is a pure function of a bill snapshot
//! and an explicit `today`; nothing reads the clock.

use crate::error::{BilldeskError, BilldeskResult};
use crate::models::{BillingMonth, Money};
use crate::services::BillService;
use crate::storage::Storage;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::io::Write;

/// Read-only view of a bill as seen by the revenue aggregators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillRecord {
    pub amount: Money,
    pub billing_date: NaiveDate,
    pub paid: bool,
}

/// Which bills count towards revenue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RevenueBasis {
    /// Every bill issued, paid or not
    #[default]
    Billed,
    /// Only bills marked as paid
    Collected,
}

impl RevenueBasis {
    pub fn includes(&self, record: &BillRecord) -> bool {
        match self {
            Self::Billed => true,
            Self::Collected => record.paid,
        }
    }

    /// Parse a basis from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "billed" | "all" => Some(Self::Billed),
            "collected" | "paid" => Some(Self::Collected),
            _ => None,
        }
    }
}

impl fmt::Display for RevenueBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Billed => write!(f, "billed"),
            Self::Collected => write!(f, "collected"),
        }
    }
}

/// Sum of bill amounts booked in (`year`, `month`)
///
/// Returns `None` when no bill falls in that month, including months in the
/// future and out-of-range month numbers.
pub fn monthly_revenue(bills: &[BillRecord], year: i32, month: u32) -> Option<Money> {
    let mut matching = bills
        .iter()
        .filter(|b| b.billing_date.year() == year && b.billing_date.month() == month)
        .peekable();

    matching.peek()?;
    Some(matching.map(|b| b.amount).sum())
}

/// Annual revenue figure and whether it is a projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnualRevenue {
    pub total: Money,
    pub is_projected: bool,
}

/// Revenue for `year` as seen from (`current_year`, `current_month`)
///
/// - past years: actual sum of the year's bills
/// - current year: revenue of the completed months, divided by their count
///   and multiplied by twelve. In January no month is complete yet and the
///   projected total is zero.
/// - future years: zero
pub fn annual_revenue(
    bills: &[BillRecord],
    year: i32,
    current_year: i32,
    current_month: u32,
) -> AnnualRevenue {
    match year.cmp(&current_year) {
        Ordering::Less => AnnualRevenue {
            total: bills
                .iter()
                .filter(|b| b.billing_date.year() == year)
                .map(|b| b.amount)
                .sum(),
            is_projected: false,
        },
        Ordering::Greater => AnnualRevenue {
            total: Money::zero(),
            is_projected: false,
        },
        Ordering::Equal => {
            let completed_months = current_month.saturating_sub(1).min(12);
            let to_date: Money = bills
                .iter()
                .filter(|b| {
                    b.billing_date.year() == year && b.billing_date.month() <= completed_months
                })
                .map(|b| b.amount)
                .sum();

            AnnualRevenue {
                total: to_date
                    .mul_div(12, completed_months as i64)
                    .unwrap_or_else(Money::zero),
                is_projected: true,
            }
        }
    }
}

/// Revenue for one month of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRevenue {
    pub month: BillingMonth,
    /// `None` when no bill was booked that month
    pub amount: Option<Money>,
    /// Whether this is the month containing `today`
    pub is_current_period: bool,
}

/// Per-month revenue for one year plus its annual total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRevenueReport {
    pub year: i32,
    /// January first
    pub per_month: [MonthRevenue; 12],
    pub annual_total: Money,
    pub is_projected: bool,
}

impl MonthlyRevenueReport {
    /// Build the report for `year` from a bill snapshot
    ///
    /// A year after `today` has no data: its months are empty even when
    /// bills are dated in it, so the row agrees with its zero total.
    pub fn compute(bills: &[BillRecord], year: i32, today: NaiveDate) -> Self {
        let current = BillingMonth::of(today);
        let is_future = year > today.year();
        let per_month = std::array::from_fn(|index| {
            let month = BillingMonth {
                year,
                month: index as u32 + 1,
            };
            let amount = if is_future {
                None
            } else {
                monthly_revenue(bills, year, month.month)
            };
            MonthRevenue {
                month,
                amount,
                is_current_period: month == current,
            }
        });

        let annual = annual_revenue(bills, year, today.year(), today.month());

        let report = Self {
            year,
            per_month,
            annual_total: annual.total,
            is_projected: annual.is_projected,
        };
        debug_assert!(report.is_projected || report.annual_total == report.recorded_total());
        report
    }

    /// Generate the report for `year` from storage
    pub fn generate(
        storage: &Storage,
        year: i32,
        today: NaiveDate,
        basis: RevenueBasis,
    ) -> BilldeskResult<Self> {
        let bills = revenue_snapshot(storage, basis)?;
        tracing::debug!(year, %basis, bills = bills.len(), "computing revenue report");
        Ok(Self::compute(&bills, year, today))
    }

    /// Sum of the months that have data
    pub fn recorded_total(&self) -> Money {
        self.per_month.iter().filter_map(|m| m.amount).sum()
    }
}

/// One revenue row per year, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueHistory {
    pub basis: RevenueBasis,
    pub as_of: NaiveDate,
    pub years: Vec<MonthlyRevenueReport>,
}

impl RevenueHistory {
    /// Rows from the earliest billing year through the year of `today`
    pub fn compute(bills: &[BillRecord], today: NaiveDate, basis: RevenueBasis) -> Self {
        let current_year = today.year();
        let first_year = bills
            .iter()
            .map(|b| b.billing_date.year())
            .min()
            .unwrap_or(current_year)
            .min(current_year);

        let years = (first_year..=current_year)
            .map(|year| MonthlyRevenueReport::compute(bills, year, today))
            .collect();

        Self {
            basis,
            as_of: today,
            years,
        }
    }

    /// History holding a single year's report
    pub fn single(report: MonthlyRevenueReport, today: NaiveDate, basis: RevenueBasis) -> Self {
        Self {
            basis,
            as_of: today,
            years: vec![report],
        }
    }

    /// Generate the report for one year from storage
    pub fn generate_year(
        storage: &Storage,
        year: i32,
        today: NaiveDate,
        basis: RevenueBasis,
    ) -> BilldeskResult<Self> {
        let report = MonthlyRevenueReport::generate(storage, year, today, basis)?;
        Ok(Self::single(report, today, basis))
    }

    /// Generate the full history from storage
    pub fn generate(storage: &Storage, today: NaiveDate, basis: RevenueBasis) -> BilldeskResult<Self> {
        let bills = revenue_snapshot(storage, basis)?;
        tracing::debug!(%basis, bills = bills.len(), "computing revenue history");
        Ok(Self::compute(&bills, today, basis))
    }

    /// Format the report for terminal display
    ///
    /// The current month is marked with `*` and projected totals with `~`.
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Revenue Report ({}, {}) as of {}\n",
            self.basis, currency_symbol, self.as_of
        ));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');

        output.push_str(&format!("{:<6}", "Year"));
        for name in crate::models::period::MONTH_NAMES {
            output.push_str(&format!(" {:>10}", &name[..3]));
        }
        output.push_str(&format!(" {:>12}\n", "Annual"));
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');

        for report in &self.years {
            output.push_str(&format!("{:<6}", report.year));
            for month in &report.per_month {
                let mut cell = month
                    .amount
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "-".to_string());
                if month.is_current_period {
                    cell.push('*');
                }
                output.push_str(&format!(" {:>10}", cell));
            }
            let annual = if report.is_projected {
                format!("~{}", report.annual_total)
            } else {
                report.annual_total.to_string()
            };
            output.push_str(&format!(" {:>12}\n", annual));
        }

        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        output.push_str("* current month   ~ projected from completed months\n");

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> BilldeskResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec!["Year".to_string()];
        header.extend(crate::models::period::MONTH_NAMES.iter().map(|m| m.to_string()));
        header.push("Annual Total".to_string());
        header.push("Projected".to_string());
        csv_writer.write_record(&header)?;

        for report in &self.years {
            let mut row = vec![report.year.to_string()];
            row.extend(
                report
                    .per_month
                    .iter()
                    .map(|m| m.amount.map(|a| a.to_string()).unwrap_or_default()),
            );
            row.push(report.annual_total.to_string());
            row.push(report.is_projected.to_string());
            csv_writer.write_record(&row)?;
        }

        csv_writer
            .flush()
            .map_err(|e| BilldeskError::Export(e.to_string()))?;
        Ok(())
    }
}

const WIDTH: usize = 6 + 11 * 12 + 13;

/// Bill snapshot filtered by revenue basis
fn revenue_snapshot(storage: &Storage, basis: RevenueBasis) -> BilldeskResult<Vec<BillRecord>> {
    let mut bills = BillService::new(storage).revenue_records()?;
    bills.retain(|b| basis.includes(b));
    Ok(bills)
}

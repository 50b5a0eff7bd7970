//! Calendar month used to bucket bills
//!
//! Revenue is reported per calendar month and bill numbers carry the month
//! they were issued in, so both share this type.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month (e.g., "2018-04")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BillingMonth {
    pub year: i32,
    pub month: u32,
}

impl BillingMonth {
    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// English month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_and_contains() {
        let date = NaiveDate::from_ymd_opt(2017, 4, 30).unwrap();
        let month = BillingMonth::of(date);
        assert_eq!(month, BillingMonth { year: 2017, month: 4 });
        assert!(month.contains(date));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2017, 5, 1).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2018, 4, 1).unwrap()));
    }

    #[test]
    fn test_display() {
        let month = BillingMonth { year: 2018, month: 4 };
        assert_eq!(month.to_string(), "2018-04");
        assert_eq!(BillingMonth { year: 987, month: 11 }.to_string(), "0987-11");
    }

    #[test]
    fn test_ordering() {
        let a = BillingMonth { year: 2017, month: 12 };
        let b = BillingMonth { year: 2018, month: 1 };
        assert!(a < b);
    }
}

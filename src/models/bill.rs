//! Bill and bill line models
//!
//! A bill is issued to one user and holds one or more lines, each pointing
//! at a service. The bill number, billing date and amount are read-only once
//! the bill exists: the amount is always recomputed from the lines.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BillId, BillLineId, ServiceId, UserId};
use super::money::Money;
use super::period::BillingMonth;

/// One service entry on a bill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillLine {
    pub id: BillLineId,
    pub service_id: ServiceId,
    pub quantity: u32,
    /// Unit price at the time the line was added, times quantity
    pub total: Money,
    #[serde(default)]
    pub note: String,
}

impl BillLine {
    /// Create a line priced from the service's current unit price
    pub fn new(service_id: ServiceId, unit_price: Money, quantity: u32) -> Self {
        Self {
            id: BillLineId::new(),
            service_id,
            quantity,
            total: unit_price.times(quantity),
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// An invoice issued to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,

    /// Human-facing number, e.g. "F20180403"
    pub number: String,

    pub user_id: UserId,

    pub billing_date: NaiveDate,

    /// Sum of line totals
    pub amount: Money,

    #[serde(default)]
    pub is_paid: bool,

    #[serde(default)]
    pub issuer_address: String,

    #[serde(default)]
    pub billing_address: String,

    #[serde(default)]
    pub lines: Vec<BillLine>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// Create an empty, unpaid bill
    pub fn new(number: impl Into<String>, user_id: UserId, billing_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: BillId::new(),
            number: number.into(),
            user_id,
            billing_date,
            amount: Money::zero(),
            is_paid: false,
            issuer_address: String::new(),
            billing_address: String::new(),
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bill number for the `sequence`-th bill (1-based) issued in `month`
    pub fn number_for(month: BillingMonth, sequence: usize) -> String {
        format!("F{:04}{:02}{:02}", month.year, month.month, sequence)
    }

    /// Append a line and recompute the amount
    pub fn add_line(&mut self, line: BillLine) {
        self.lines.push(line);
        self.recompute_amount();
    }

    /// Remove a line by ID, returning it if present
    pub fn remove_line(&mut self, line_id: BillLineId) -> Option<BillLine> {
        let index = self.lines.iter().position(|l| l.id == line_id)?;
        let line = self.lines.remove(index);
        self.recompute_amount();
        Some(line)
    }

    fn recompute_amount(&mut self) {
        self.amount = self.lines.iter().map(|l| l.total).sum();
        self.updated_at = Utc::now();
    }

    pub fn set_paid(&mut self, paid: bool) {
        self.is_paid = paid;
        self.updated_at = Utc::now();
    }

    /// Validate the bill
    pub fn validate(&self) -> Result<(), BillValidationError> {
        if self.number.trim().is_empty() {
            return Err(BillValidationError::EmptyNumber);
        }
        if self.amount.is_negative() {
            return Err(BillValidationError::NegativeAmount(self.amount));
        }
        if self.lines.iter().any(|l| l.quantity == 0) {
            return Err(BillValidationError::ZeroQuantity);
        }
        let line_sum: Money = self.lines.iter().map(|l| l.total).sum();
        if line_sum != self.amount {
            return Err(BillValidationError::AmountMismatch {
                amount: self.amount,
                lines: line_sum,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)
    }
}

/// Validation errors for bills
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillValidationError {
    EmptyNumber,
    NegativeAmount(Money),
    ZeroQuantity,
    AmountMismatch { amount: Money, lines: Money },
}

impl fmt::Display for BillValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyNumber => write!(f, "Bill number cannot be empty"),
            Self::NegativeAmount(amount) => write!(f, "Bill amount cannot be negative: {}", amount),
            Self::ZeroQuantity => write!(f, "Bill line quantity must be at least 1"),
            Self::AmountMismatch { amount, lines } => write!(
                f,
                "Bill amount {} does not match the sum of its lines {}",
                amount, lines
            ),
        }
    }
}

impl std::error::Error for BillValidationError {}

//! Service model
//!
//! A billable offering (desk rental, meeting room, ...) with a unit price and
//! an availability flag. Only available services can be added to bills and
//! counted as subscriptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ServiceId;
use super::money::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,

    /// Display name, matched exactly when counting subscriptions
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Unit price
    pub price: Money,

    /// Whether the service can currently be sold
    pub is_available: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Create a new, available service
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        let now = Utc::now();
        Self {
            id: ServiceId::new(),
            name: name.into(),
            description: String::new(),
            price,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn set_available(&mut self, available: bool) {
        self.is_available = available;
        self.updated_at = Utc::now();
    }

    pub fn set_price(&mut self, price: Money) {
        self.price = price;
        self.updated_at = Utc::now();
    }

    /// Validate the service
    pub fn validate(&self) -> Result<(), ServiceValidationError> {
        if self.name.trim().is_empty() {
            return Err(ServiceValidationError::EmptyName);
        }
        if self.name.len() > 100 {
            return Err(ServiceValidationError::NameTooLong(self.name.len()));
        }
        if self.price.is_negative() {
            return Err(ServiceValidationError::NegativePrice(self.price));
        }
        Ok(())
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for services
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativePrice(Money),
}

impl fmt::Display for ServiceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Service name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Service name too long ({} chars, max 100)", len)
            }
            Self::NegativePrice(price) => write!(f, "Service price cannot be negative: {}", price),
        }
    }
}

impl std::error::Error for ServiceValidationError {}

//! User settings for billdesk
//!
//! Manages back-office preferences: currency display, the issuer address
//! printed on new bills, the payment link shown for unpaid bills, and the
//! basis used for revenue reports.

use serde::{Deserialize, Serialize};

use super::paths::BilldeskPaths;
use crate::error::BilldeskError;
use crate::reports::RevenueBasis;

/// Back-office settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Static payment link surfaced next to unpaid bills
    #[serde(default = "default_payment_link")]
    pub payment_link: String,

    /// Address printed as the issuer of new bills
    #[serde(default)]
    pub issuer_address: String,

    /// Which bills count towards revenue reports
    #[serde(default)]
    pub revenue_basis: RevenueBasis,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_payment_link() -> String {
    "https://stripe.com".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            payment_link: default_payment_link(),
            issuer_address: String::new(),
            revenue_basis: RevenueBasis::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &BilldeskPaths) -> Result<Self, BilldeskError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BilldeskError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BilldeskError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BilldeskPaths) -> Result<(), BilldeskError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BilldeskError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BilldeskError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

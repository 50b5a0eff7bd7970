//! Path management for billdesk
//!
//! ## Path Resolution Order
//!
//! 1. `BILLDESK_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory reported by `directories`
//!    (`~/.config/billdesk` on Linux, `%APPDATA%\billdesk\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BilldeskError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "BILLDESK_DATA_DIR";

/// Manages all paths used by billdesk
#[derive(Debug, Clone)]
pub struct BilldeskPaths {
    base_dir: PathBuf,
}

impl BilldeskPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BilldeskError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "billdesk")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    BilldeskError::Config("Could not determine a home directory".into())
                })?
        };

        Ok(Self::with_base_dir(base_dir))
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn bills_file(&self) -> PathBuf {
        self.data_dir().join("bills.json")
    }

    pub fn services_file(&self) -> PathBuf {
        self.data_dir().join("services.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), BilldeskError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BilldeskError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BilldeskError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if billdesk has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

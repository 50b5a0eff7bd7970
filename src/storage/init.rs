//! Storage initialization
//!
//! Handles first-run setup and the default service catalogue

use crate::config::paths::BilldeskPaths;
use crate::error::BilldeskError;
use crate::models::{Money, Service};

use super::file_io::write_json_atomic;
use super::services::ServiceData;

/// Services created on first run: (name, description, price)
const DEFAULT_SERVICES: [(&str, &str, Money); 3] = [
    (
        "Full Time",
        "Dedicated desk, every working day of the month",
        Money::from_units_cents(250, 0),
    ),
    (
        "Mid Time",
        "Shared desk, up to ten days per month",
        Money::from_units_cents(150, 0),
    ),
    (
        "Meeting 1 day",
        "Meeting room for one day",
        Money::from_units_cents(30, 0),
    ),
];

/// Initialize storage for a fresh installation
///
/// Creates directories and, if no service catalogue exists yet, the default
/// services.
pub fn initialize_storage(paths: &BilldeskPaths) -> Result<(), BilldeskError> {
    paths.ensure_directories()?;

    if needs_initialization(paths) {
        create_default_services(paths)?;
    }

    Ok(())
}

fn create_default_services(paths: &BilldeskPaths) -> Result<(), BilldeskError> {
    let services = DEFAULT_SERVICES
        .iter()
        .map(|(name, description, price)| Service::new(*name, *price).with_description(*description))
        .collect();

    write_json_atomic(paths.services_file(), &ServiceData { services })?;
    tracing::info!(count = DEFAULT_SERVICES.len(), "created default services");
    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &BilldeskPaths) -> bool {
    !paths.services_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ServiceRepository;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilldeskPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();
        assert!(!needs_initialization(&paths));
        assert!(paths.data_dir().exists());

        let repo = ServiceRepository::new(paths.services_file());
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 3);
        let full_time = repo.get_by_name("Full Time").unwrap().unwrap();
        assert!(full_time.is_available);
        assert_eq!(full_time.price.cents(), 25000);
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilldeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let custom = ServiceData {
            services: vec![Service::new("Custom", Money::zero())],
        };
        write_json_atomic(paths.services_file(), &custom).unwrap();

        initialize_storage(&paths).unwrap();

        let repo = ServiceRepository::new(paths.services_file());
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 1);
        assert!(repo.get_by_name("Custom").unwrap().is_some());
    }
}

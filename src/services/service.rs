//! Service catalogue management
//!
//! Services are what bill lines point at. Names are unique (exact match) and
//! only available services can be added to new lines.

use crate::audit::EntityType;
use crate::error::{BilldeskError, BilldeskResult};
use crate::models::{Money, Service, ServiceId};
use crate::storage::Storage;

/// Service for managing the catalogue of billable services
pub struct ServiceService<'a> {
    storage: &'a Storage,
}

impl<'a> ServiceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new, available service
    pub fn create(&self, name: &str, price: Money, description: &str) -> BilldeskResult<Service> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BilldeskError::Validation(
                "Service name cannot be empty".into(),
            ));
        }

        if self.storage.services.get_by_name(name)?.is_some() {
            return Err(BilldeskError::Duplicate {
                entity_type: "Service",
                identifier: name.to_string(),
            });
        }

        let service = Service::new(name, price).with_description(description.trim());
        service
            .validate()
            .map_err(|e| BilldeskError::Validation(e.to_string()))?;

        self.storage.services.upsert(service.clone())?;
        self.storage.services.save()?;

        self.storage.log_create(
            EntityType::Service,
            service.id.to_string(),
            Some(service.name.clone()),
            &service,
        )?;

        tracing::info!(service = %service.name, price = %service.price, "created service");
        Ok(service)
    }

    pub fn get(&self, id: ServiceId) -> BilldeskResult<Option<Service>> {
        self.storage.services.get(id)
    }

    /// Find a service by exact name or by ID (full or short form)
    pub fn find(&self, identifier: &str) -> BilldeskResult<Option<Service>> {
        if let Some(service) = self.storage.services.get_by_name(identifier)? {
            return Ok(Some(service));
        }

        if let Ok(id) = identifier.parse::<ServiceId>() {
            return self.storage.services.get(id);
        }

        Ok(self
            .storage
            .services
            .get_all()?
            .into_iter()
            .find(|s| s.id.matches_short(identifier)))
    }

    /// Find a service or fail with a not-found error
    pub fn require(&self, identifier: &str) -> BilldeskResult<Service> {
        self.find(identifier)?
            .ok_or_else(|| BilldeskError::service_not_found(identifier))
    }

    /// List services sorted by name, optionally filtered by availability
    pub fn list(&self, available: Option<bool>) -> BilldeskResult<Vec<Service>> {
        let services = self.storage.services.get_all()?;
        Ok(match available {
            Some(flag) => services
                .into_iter()
                .filter(|s| s.is_available == flag)
                .collect(),
            None => services,
        })
    }

    /// Toggle whether a service can be put on new bill lines
    pub fn set_available(&self, id: ServiceId, available: bool) -> BilldeskResult<Service> {
        self.update(id, |service| service.set_available(available))
    }

    /// Change the unit price used for future bill lines
    pub fn set_price(&self, id: ServiceId, price: Money) -> BilldeskResult<Service> {
        if price.is_negative() {
            return Err(BilldeskError::Validation(format!(
                "Service price cannot be negative: {}",
                price
            )));
        }
        self.update(id, |service| service.set_price(price))
    }

    fn update(&self, id: ServiceId, change: impl FnOnce(&mut Service)) -> BilldeskResult<Service> {
        let mut service = self
            .storage
            .services
            .get(id)?
            .ok_or_else(|| BilldeskError::service_not_found(id.to_string()))?;

        let before = service.clone();
        change(&mut service);

        self.storage.services.upsert(service.clone())?;
        self.storage.services.save()?;

        self.storage.log_update(
            EntityType::Service,
            service.id.to_string(),
            Some(service.name.clone()),
            &before,
            &service,
        )?;

        tracing::info!(service = %service.name, "updated service");
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BilldeskPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilldeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_service() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ServiceService::new(&storage);

        let created = service
            .create("  Full Time ", Money::from_cents(25000), "Dedicated desk")
            .unwrap();
        assert_eq!(created.name, "Full Time");
        assert!(created.is_available);
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ServiceService::new(&storage);
        service.create("Full Time", Money::zero(), "").unwrap();

        let err = service.create("Full Time", Money::zero(), "").unwrap_err();
        assert!(matches!(err, BilldeskError::Duplicate { .. }));

        // Names are matched exactly
        assert!(service.create("full time", Money::zero(), "").is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ServiceService::new(&storage);

        let err = service
            .create("Mid Time", Money::from_cents(-100), "")
            .unwrap_err();
        assert!(err.is_validation());

        let created = service.create("Mid Time", Money::zero(), "").unwrap();
        assert!(service
            .set_price(created.id, Money::from_cents(-1))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_list_filtered_by_availability() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ServiceService::new(&storage);
        service.create("Mid Time", Money::zero(), "").unwrap();
        let retired = service.create("Night Shift", Money::zero(), "").unwrap();
        service.create("Full Time", Money::zero(), "").unwrap();
        service.set_available(retired.id, false).unwrap();

        let names = |list: Vec<Service>| list.into_iter().map(|s| s.name).collect::<Vec<_>>();
        assert_eq!(
            names(service.list(None).unwrap()),
            vec!["Full Time", "Mid Time", "Night Shift"]
        );
        assert_eq!(
            names(service.list(Some(true)).unwrap()),
            vec!["Full Time", "Mid Time"]
        );
        assert_eq!(names(service.list(Some(false)).unwrap()), vec!["Night Shift"]);
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ServiceService::new(&storage);
        let created = service.create("Meeting 1 day", Money::from_cents(3000), "").unwrap();

        assert!(service.find("Meeting 1 day").unwrap().is_some());
        assert!(service.find(&created.id.to_string()).unwrap().is_some());
        assert!(service.find("Meeting").unwrap().is_none());
        assert!(service.require("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_price_is_audited_with_diff() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ServiceService::new(&storage);
        let created = service.create("Full Time", Money::from_cents(25000), "").unwrap();

        let updated = service.set_price(created.id, Money::from_cents(27000)).unwrap();
        assert_eq!(updated.price.cents(), 27000);

        let entries = storage.audit().read_all().unwrap();
        let diff = entries[1].diff_summary.as_deref().unwrap();
        assert!(diff.contains("price: 250.00 -> 270.00"));
    }
}

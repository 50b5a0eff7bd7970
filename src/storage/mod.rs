//! Storage layer for billdesk
//!
//! JSON file storage with atomic writes, in-memory indexes guarded by
//! `RwLock`, and an audit trail for every mutation made through the
//! service layer.

pub mod bills;
pub mod file_io;
pub mod init;
pub mod services;
pub mod users;

pub use bills::BillRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use services::ServiceRepository;
pub use users::UserRepository;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BilldeskPaths;
use crate::error::BilldeskError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BilldeskPaths,
    audit: AuditLogger,
    pub bills: BillRepository,
    pub services: ServiceRepository,
    pub users: UserRepository,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: BilldeskPaths) -> Result<Self, BilldeskError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            bills: BillRepository::new(paths.bills_file()),
            services: ServiceRepository::new(paths.services_file()),
            users: UserRepository::new(paths.users_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &BilldeskPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), BilldeskError> {
        self.users.load()?;
        self.services.load()?;
        self.bills.load()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a create operation in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BilldeskError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update operation, with a field-level diff summary
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), BilldeskError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(before_json), Ok(after_json)) => generate_diff(&before_json, &after_json),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a delete operation in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BilldeskError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, BilldeskError> {
    lock.read()
        .map_err(|e| BilldeskError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, BilldeskError> {
    lock.write()
        .map_err(|e| BilldeskError::Storage(format!("Failed to acquire write lock: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Money, Service};
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilldeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilldeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        storage
            .services
            .upsert(Service::new("Full Time", Money::from_cents(25000)))
            .unwrap();
        storage.services.save().unwrap();

        let mut reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.services.count().unwrap(), 1);
        assert_eq!(reloaded.bills.count().unwrap(), 0);
    }

    #[test]
    fn test_log_update_records_diff() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilldeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let before = Service::new("Full Time", Money::from_cents(25000));
        let mut after = before.clone();
        after.price = Money::from_cents(27000);

        storage
            .log_update(
                EntityType::Service,
                before.id.to_string(),
                Some(before.name.clone()),
                &before,
                &after,
            )
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Update);
        let diff = entries[0].diff_summary.as_deref().unwrap();
        assert!(diff.contains("price: 250.00 -> 270.00"));
    }
}

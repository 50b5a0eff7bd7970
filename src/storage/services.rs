//! Service repository for JSON storage
//!
//! Manages loading and saving services to services.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BilldeskError;
use crate::models::{Service, ServiceId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

/// Serializable service data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct ServiceData {
    pub(crate) services: Vec<Service>,
}

/// Repository for service persistence
pub struct ServiceRepository {
    path: PathBuf,
    data: RwLock<HashMap<ServiceId, Service>>,
    /// Index: exact name -> service_id
    by_name: RwLock<HashMap<String, ServiceId>>,
}

impl ServiceRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_name: RwLock::new(HashMap::new()),
        }
    }

    /// Load services from disk
    pub fn load(&self) -> Result<(), BilldeskError> {
        let file_data: ServiceData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        let mut by_name = write_lock(&self.by_name)?;

        data.clear();
        by_name.clear();

        for service in file_data.services {
            by_name.insert(service.name.clone(), service.id);
            data.insert(service.id, service);
        }

        tracing::debug!(count = data.len(), "loaded services");
        Ok(())
    }

    /// Save services to disk
    pub fn save(&self) -> Result<(), BilldeskError> {
        let file_data = ServiceData {
            services: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: ServiceId) -> Result<Option<Service>, BilldeskError> {
        let data = read_lock(&self.data)?;
        Ok(data.get(&id).cloned())
    }

    /// Get all services, sorted by name
    pub fn get_all(&self) -> Result<Vec<Service>, BilldeskError> {
        let data = read_lock(&self.data)?;
        let mut services: Vec<_> = data.values().cloned().collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    /// Get a service by exact (case-sensitive) name
    pub fn get_by_name(&self, name: &str) -> Result<Option<Service>, BilldeskError> {
        let data = read_lock(&self.data)?;
        let by_name = read_lock(&self.by_name)?;

        Ok(by_name.get(name).and_then(|id| data.get(id)).cloned())
    }

    /// Insert or update a service
    pub fn upsert(&self, service: Service) -> Result<(), BilldeskError> {
        let mut data = write_lock(&self.data)?;
        let mut by_name = write_lock(&self.by_name)?;

        if let Some(old) = data.get(&service.id) {
            by_name.remove(&old.name);
        }
        by_name.insert(service.name.clone(), service.id);
        data.insert(service.id, service);
        Ok(())
    }

    /// Delete a service
    pub fn delete(&self, id: ServiceId) -> Result<bool, BilldeskError> {
        let mut data = write_lock(&self.data)?;
        let mut by_name = write_lock(&self.by_name)?;

        if let Some(service) = data.remove(&id) {
            by_name.remove(&service.name);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn count(&self) -> Result<usize, BilldeskError> {
        Ok(read_lock(&self.data)?.len())
    }
}

//! User management
//!
//! Users are the coworkers bills are issued to. Each carries a profile with
//! the billing address copied onto new bills.

use crate::audit::EntityType;
use crate::error::{BilldeskError, BilldeskResult};
use crate::models::{User, UserId, UserProfile};
use crate::storage::Storage;

/// Fields required to register a user
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub billing_address: String,
    pub is_staff: bool,
}

/// Partial update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub billing_address: Option<String>,
    pub is_active: Option<bool>,
}

/// Service for user management
pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a user together with their profile
    pub fn create(&self, new_user: NewUser) -> BilldeskResult<User> {
        let username = new_user.username.trim();

        if self.storage.users.get_by_username(username)?.is_some() {
            return Err(BilldeskError::Duplicate {
                entity_type: "User",
                identifier: username.to_string(),
            });
        }

        let mut user = User::new(
            username,
            new_user.first_name.trim(),
            new_user.last_name.trim(),
            new_user.email.trim(),
            UserProfile {
                billing_address: new_user.billing_address.trim().to_string(),
            },
        );
        user.is_staff = new_user.is_staff;

        user.validate()
            .map_err(|e| BilldeskError::Validation(e.to_string()))?;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.label()),
            &user,
        )?;

        tracing::info!(username = %user.username, "created user");
        Ok(user)
    }

    pub fn get(&self, id: UserId) -> BilldeskResult<Option<User>> {
        self.storage.users.get(id)
    }

    /// Find a user by username or by ID (full or short form)
    pub fn find(&self, identifier: &str) -> BilldeskResult<Option<User>> {
        if let Some(user) = self.storage.users.get_by_username(identifier)? {
            return Ok(Some(user));
        }

        if let Ok(id) = identifier.parse::<UserId>() {
            return self.storage.users.get(id);
        }

        Ok(self
            .storage
            .users
            .get_all()?
            .into_iter()
            .find(|u| u.id.matches_short(identifier)))
    }

    pub fn require(&self, identifier: &str) -> BilldeskResult<User> {
        self.find(identifier)?
            .ok_or_else(|| BilldeskError::user_not_found(identifier))
    }

    /// All users, sorted by username
    pub fn list(&self) -> BilldeskResult<Vec<User>> {
        self.storage.users.get_all()
    }

    /// Apply a partial update and re-validate
    pub fn update(&self, id: UserId, update: UserUpdate) -> BilldeskResult<User> {
        let mut user = self
            .storage
            .users
            .get(id)?
            .ok_or_else(|| BilldeskError::user_not_found(id.to_string()))?;
        let before = user.clone();

        if let Some(first_name) = update.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(email) = update.email {
            user.email = email.trim().to_string();
        }
        if let Some(address) = update.billing_address {
            user.profile.billing_address = address.trim().to_string();
        }
        if let Some(active) = update.is_active {
            user.is_active = active;
        }

        user.validate()
            .map_err(|e| BilldeskError::Validation(e.to_string()))?;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.label()),
            &before,
            &user,
        )?;

        tracing::info!(username = %user.username, "updated user");
        Ok(user)
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

    fn jane() -> NewUser {
        NewUser {
            username: "jdoe".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            billing_address: "2 place Royale, Nantes".into(),
            is_staff: false,
        }
    }

    #[test]
    fn test_create_user() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);

        let user = users.create(jane()).unwrap();
        assert_eq!(user.label(), "Jane Doe (jdoe)");
        assert_eq!(user.profile.billing_address, "2 place Royale, Nantes");
        assert!(users.find("jdoe").unwrap().is_some());
    }

    #[test]
    fn test_required_fields() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);

        for blank in [
            NewUser { email: String::new(), ..jane() },
            NewUser { first_name: " ".into(), ..jane() },
            NewUser { last_name: String::new(), ..jane() },
            NewUser { billing_address: String::new(), ..jane() },
        ] {
            assert!(users.create(blank).unwrap_err().is_validation());
        }
        assert_eq!(users.list().unwrap().len(), 0);
    }

    #[test]
    fn test_duplicate_username() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        users.create(jane()).unwrap();

        let err = users.create(jane()).unwrap_err();
        assert!(matches!(err, BilldeskError::Duplicate { .. }));
    }

    #[test]
    fn test_update_profile() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let user = users.create(jane()).unwrap();

        let updated = users
            .update(
                user.id,
                UserUpdate {
                    billing_address: Some("Rennes".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.profile.billing_address, "Rennes");
        assert_eq!(updated.email, "jane@example.com");

        let err = users
            .update(
                user.id,
                UserUpdate {
                    email: Some("not-an-email".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
    }
}

//! User repository for JSON storage
//!
//! Manages loading and saving users (with their profiles) to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BilldeskError;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
    /// Index: username -> user_id
    by_username: RwLock<HashMap<String, UserId>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_username: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> Result<(), BilldeskError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        let mut by_username = write_lock(&self.by_username)?;

        data.clear();
        by_username.clear();

        for user in file_data.users {
            by_username.insert(user.username.clone(), user.id);
            data.insert(user.id, user);
        }

        tracing::debug!(count = data.len(), "loaded users");
        Ok(())
    }

    /// Save users to disk
    pub fn save(&self) -> Result<(), BilldeskError> {
        let file_data = UserData {
            users: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>, BilldeskError> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// Get all users, sorted by username
    pub fn get_all(&self) -> Result<Vec<User>, BilldeskError> {
        let data = read_lock(&self.data)?;
        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    /// Get a user by exact username
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>, BilldeskError> {
        let data = read_lock(&self.data)?;
        let by_username = read_lock(&self.by_username)?;

        Ok(by_username.get(username).and_then(|id| data.get(id)).cloned())
    }

    /// Insert or update a user
    pub fn upsert(&self, user: User) -> Result<(), BilldeskError> {
        let mut data = write_lock(&self.data)?;
        let mut by_username = write_lock(&self.by_username)?;

        if let Some(old) = data.get(&user.id) {
            by_username.remove(&old.username);
        }
        by_username.insert(user.username.clone(), user.id);
        data.insert(user.id, user);
        Ok(())
    }

    pub fn count(&self) -> Result<usize, BilldeskError> {
        Ok(read_lock(&self.data)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use tempfile::TempDir;

    fn test_user(username: &str) -> User {
        User::new(
            username,
            "Jane",
            "Doe",
            "jane@example.com",
            UserProfile {
                billing_address: "Nantes".into(),
            },
        )
    }

    #[test]
    fn test_upsert_and_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));
        repo.load().unwrap();

        let user = test_user("jdoe");
        let id = user.id;
        repo.upsert(user).unwrap();

        assert_eq!(repo.get(id).unwrap().unwrap().username, "jdoe");
        assert!(repo.get_by_username("jdoe").unwrap().is_some());
        assert!(repo.get_by_username("JDOE").unwrap().is_none());
    }

    #[test]
    fn test_get_all_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));
        repo.upsert(test_user("zoe")).unwrap();
        repo.upsert(test_user("adam")).unwrap();

        let names: Vec<_> = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["adam", "zoe"]);
    }

    #[test]
    fn test_save_and_reload_keeps_profile() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");
        let repo = UserRepository::new(path.clone());
        let user = test_user("jdoe");
        let id = user.id;
        repo.upsert(user).unwrap();
        repo.save().unwrap();

        let repo2 = UserRepository::new(path);
        repo2.load().unwrap();
        let loaded = repo2.get(id).unwrap().unwrap();
        assert_eq!(loaded.profile.billing_address, "Nantes");
        assert_eq!(repo2.count().unwrap(), 1);
    }
}

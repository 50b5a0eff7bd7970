//! Bill repository for JSON storage
//!
//! Manages loading and saving bills (lines included) to bills.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BilldeskError;
use crate::models::{Bill, BillId, BillingMonth, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BillData {
    bills: Vec<Bill>,
}

/// Repository for bill persistence with indexing
pub struct BillRepository {
    path: PathBuf,
    data: RwLock<HashMap<BillId, Bill>>,
    /// Index: bill number -> bill_id
    by_number: RwLock<HashMap<String, BillId>>,
    /// Index: user_id -> bill_ids
    by_user: RwLock<HashMap<UserId, Vec<BillId>>>,
}

impl BillRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_number: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
        }
    }

    /// Load bills from disk and build indexes
    pub fn load(&self) -> Result<(), BilldeskError> {
        let file_data: BillData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        let mut by_number = write_lock(&self.by_number)?;
        let mut by_user = write_lock(&self.by_user)?;

        data.clear();
        by_number.clear();
        by_user.clear();

        for bill in file_data.bills {
            by_number.insert(bill.number.clone(), bill.id);
            by_user.entry(bill.user_id).or_default().push(bill.id);
            data.insert(bill.id, bill);
        }

        tracing::debug!(count = data.len(), "loaded bills");
        Ok(())
    }

    /// Save bills to disk, oldest first
    pub fn save(&self) -> Result<(), BilldeskError> {
        let mut bills = self.get_all()?;
        bills.reverse();

        let file_data = BillData { bills };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: BillId) -> Result<Option<Bill>, BilldeskError> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// Get all bills, most recent first
    pub fn get_all(&self) -> Result<Vec<Bill>, BilldeskError> {
        let data = read_lock(&self.data)?;
        let mut bills: Vec<_> = data.values().cloned().collect();
        sort_recent_first(&mut bills);
        Ok(bills)
    }

    pub fn get_by_number(&self, number: &str) -> Result<Option<Bill>, BilldeskError> {
        let data = read_lock(&self.data)?;
        let by_number = read_lock(&self.by_number)?;

        Ok(by_number.get(number).and_then(|id| data.get(id)).cloned())
    }

    /// Get the bills issued to a user, most recent first
    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<Bill>, BilldeskError> {
        let data = read_lock(&self.data)?;
        let by_user = read_lock(&self.by_user)?;

        let ids = by_user.get(&user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut bills: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        sort_recent_first(&mut bills);
        Ok(bills)
    }

    /// Number of bills booked in a calendar month
    pub fn count_in_month(&self, month: BillingMonth) -> Result<usize, BilldeskError> {
        let data = read_lock(&self.data)?;
        Ok(data
            .values()
            .filter(|b| month.contains(b.billing_date))
            .count())
    }

    /// Insert or update a bill
    pub fn upsert(&self, bill: Bill) -> Result<(), BilldeskError> {
        let mut data = write_lock(&self.data)?;
        let mut by_number = write_lock(&self.by_number)?;
        let mut by_user = write_lock(&self.by_user)?;

        if let Some(old) = data.get(&bill.id) {
            by_number.remove(&old.number);
            if let Some(ids) = by_user.get_mut(&old.user_id) {
                ids.retain(|id| *id != bill.id);
            }
        }

        by_number.insert(bill.number.clone(), bill.id);
        by_user.entry(bill.user_id).or_default().push(bill.id);
        data.insert(bill.id, bill);
        Ok(())
    }

    /// Delete a bill
    pub fn delete(&self, id: BillId) -> Result<bool, BilldeskError> {
        let mut data = write_lock(&self.data)?;
        let mut by_number = write_lock(&self.by_number)?;
        let mut by_user = write_lock(&self.by_user)?;

        if let Some(bill) = data.remove(&id) {
            by_number.remove(&bill.number);
            if let Some(ids) = by_user.get_mut(&bill.user_id) {
                ids.retain(|bid| *bid != id);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn count(&self) -> Result<usize, BilldeskError> {
        Ok(read_lock(&self.data)?.len())
    }
}

fn sort_recent_first(bills: &mut [Bill]) {
    bills.sort_by(|a, b| {
        b.billing_date
            .cmp(&a.billing_date)
            .then_with(|| b.number.cmp(&a.number))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BillRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BillRepository::new(temp_dir.path().join("bills.json"));
        (temp_dir, repo)
    }

    fn bill(number: &str, user_id: UserId, y: i32, m: u32, d: u32) -> Bill {
        Bill::new(number, user_id, NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_indexes() {
        let (_temp_dir, repo) = create_test_repo();
        let alice = UserId::new();
        let bob = UserId::new();

        repo.upsert(bill("F20180101", alice, 2018, 1, 5)).unwrap();
        repo.upsert(bill("F20180102", bob, 2018, 1, 9)).unwrap();
        repo.upsert(bill("F20180201", alice, 2018, 2, 1)).unwrap();

        assert!(repo.get_by_number("F20180102").unwrap().is_some());
        assert!(repo.get_by_number("F20180103").unwrap().is_none());

        let alice_bills = repo.get_by_user(alice).unwrap();
        assert_eq!(alice_bills.len(), 2);
        assert_eq!(alice_bills[0].number, "F20180201");

        let january = BillingMonth { year: 2018, month: 1 };
        assert_eq!(repo.count_in_month(january).unwrap(), 2);
    }

    #[test]
    fn test_get_all_recent_first() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        repo.upsert(bill("F20170101", user, 2017, 1, 1)).unwrap();
        repo.upsert(bill("F20180101", user, 2018, 1, 1)).unwrap();

        let numbers: Vec<_> = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|b| b.number)
            .collect();
        assert_eq!(numbers, vec!["F20180101", "F20170101"]);
    }

    #[test]
    fn test_delete_clears_indexes() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        let b = bill("F20180101", user, 2018, 1, 5);
        let id = b.id;
        repo.upsert(b).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(repo.get_by_number("F20180101").unwrap().is_none());
        assert!(repo.get_by_user(user).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        let b = bill("F20180101", user, 2018, 1, 5);
        let id = b.id;
        repo.upsert(b).unwrap();
        repo.save().unwrap();

        let repo2 = BillRepository::new(temp_dir.path().join("bills.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(id).unwrap().unwrap().number, "F20180101");
        assert_eq!(repo2.get_by_user(user).unwrap().len(), 1);
    }
}

//! Full database export to JSON

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BilldeskError, BilldeskResult};
use crate::models::{Bill, Money, Service, User};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything in the ledger, plus counts for a quick sanity check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub users: Vec<User>,
    pub services: Vec<Service>,
    /// Bills with their lines, oldest first
    pub bills: Vec<Bill>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub user_count: usize,
    pub service_count: usize,
    pub bill_count: usize,
    pub bill_line_count: usize,
    pub total_billed: Money,
    pub earliest_bill: Option<String>,
    pub latest_bill: Option<String>,
}

impl FullExport {
    pub fn from_storage(storage: &Storage) -> BilldeskResult<Self> {
        let users = storage.users.get_all()?;
        let services = storage.services.get_all()?;
        let mut bills = storage.bills.get_all()?;
        bills.reverse();

        let metadata = ExportMetadata {
            user_count: users.len(),
            service_count: services.len(),
            bill_count: bills.len(),
            bill_line_count: bills.iter().map(|b| b.lines.len()).sum(),
            total_billed: bills.iter().map(|b| b.amount).sum(),
            earliest_bill: bills.iter().map(|b| b.billing_date).min().map(|d| d.to_string()),
            latest_bill: bills.iter().map(|b| b.billing_date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            users,
            services,
            bills,
            metadata,
        })
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write + ?Sized>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> BilldeskResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| BilldeskError::Export(e.to_string()))?;

    tracing::debug!(bills = export.metadata.bill_count, "exported database to JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BilldeskPaths;
    use crate::models::{BillLine, UserProfile};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilldeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seed(storage: &Storage) {
        let user = User::new(
            "jdoe",
            "Jane",
            "Doe",
            "jane@example.com",
            UserProfile {
                billing_address: "Nantes".into(),
            },
        );
        let service = Service::new("Full Time", Money::from_cents(25000));
        for (number, month) in [("F20180101", 1), ("F20180301", 3)] {
            let mut bill = Bill::new(
                number,
                user.id,
                NaiveDate::from_ymd_opt(2018, month, 2).unwrap(),
            );
            bill.add_line(BillLine::new(service.id, service.price, 1));
            storage.bills.upsert(bill).unwrap();
        }
        storage.users.upsert(user).unwrap();
        storage.services.upsert(service).unwrap();
    }

    #[test]
    fn test_metadata() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let export = FullExport::from_storage(&storage).unwrap();
        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.bill_count, 2);
        assert_eq!(export.metadata.bill_line_count, 2);
        assert_eq!(export.metadata.total_billed, Money::from_cents(50000));
        assert_eq!(export.metadata.earliest_bill.as_deref(), Some("2018-01-02"));
        assert_eq!(export.metadata.latest_bill.as_deref(), Some("2018-03-02"));
        assert_eq!(export.bills[0].number, "F20180101");
    }

    #[test]
    fn test_json_parses_back() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let mut out = Vec::new();
        export_full_json(&storage, &mut out, true).unwrap();

        let parsed: FullExport = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.users[0].profile.billing_address, "Nantes");
        assert_eq!(parsed.services[0].name, "Full Time");
    }

    #[test]
    fn test_empty_database() {
        let (_temp_dir, storage) = create_test_storage();
        let export = FullExport::from_storage(&storage).unwrap();
        assert_eq!(export.metadata.bill_count, 0);
        assert!(export.metadata.earliest_bill.is_none());
        assert_eq!(export.metadata.total_billed, Money::zero());
    }
}

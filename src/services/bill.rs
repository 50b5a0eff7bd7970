//! Bill management
//!
//! Creates bills with generated numbers, keeps the amount in sync with the
//! lines, and builds the read-only snapshots the reports consume.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::config::settings::Settings;
use crate::error::{BilldeskError, BilldeskResult};
use crate::models::{Bill, BillId, BillLine, BillLineId, BillingMonth, ServiceId, User, UserId};
use crate::reports::{BillLineRecord, BillRecord};
use crate::storage::Storage;

/// Filter applied when listing bills
#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    pub paid: Option<bool>,
    /// Case-insensitive match on user first/last name, bill number or amount
    pub search: Option<String>,
}

/// A bill as shown in the bill list
#[derive(Debug, Clone)]
pub struct BillSummary {
    pub bill: Bill,
    /// User label, or the raw user ID if the user no longer exists
    pub coworker: String,
    /// Payment link for unpaid bills, "Paid" otherwise
    pub payment: String,
}

/// Text for the payment column of a bill
pub fn payment_status(bill: &Bill, payment_link: &str) -> String {
    if bill.is_paid {
        "Paid".to_string()
    } else {
        payment_link.to_string()
    }
}

/// Service for bill management
pub struct BillService<'a> {
    storage: &'a Storage,
}

impl<'a> BillService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Issue a bill to a user
    ///
    /// Each line is `(service, quantity, note)`. The issuer address comes
    /// from the settings file and the billing address from the user's
    /// profile.
    pub fn create(
        &self,
        user_id: UserId,
        billing_date: NaiveDate,
        lines: &[(ServiceId, u32, String)],
    ) -> BilldeskResult<Bill> {
        let user = self
            .storage
            .users
            .get(user_id)?
            .ok_or_else(|| BilldeskError::user_not_found(user_id.to_string()))?;
        let settings = Settings::load_or_create(self.storage.paths())?;

        let number = self.next_number(BillingMonth::of(billing_date))?;
        let mut bill = Bill::new(number, user.id, billing_date);
        bill.issuer_address = settings.issuer_address.clone();
        bill.billing_address = user.profile.billing_address.clone();

        for (service_id, quantity, note) in lines {
            bill.add_line(self.new_line(*service_id, *quantity, note)?);
        }

        bill.validate()
            .map_err(|e| BilldeskError::Validation(e.to_string()))?;

        self.storage.bills.upsert(bill.clone())?;
        self.storage.bills.save()?;

        self.storage.log_create(
            EntityType::Bill,
            bill.id.to_string(),
            Some(bill.number.clone()),
            &bill,
        )?;

        tracing::info!(number = %bill.number, amount = %bill.amount, user = %user.username, "created bill");
        Ok(bill)
    }

    /// Next free number in `month`, starting at the month's bill count + 1
    fn next_number(&self, month: BillingMonth) -> BilldeskResult<String> {
        let mut sequence = self.storage.bills.count_in_month(month)? + 1;
        loop {
            let number = Bill::number_for(month, sequence);
            if self.storage.bills.get_by_number(&number)?.is_none() {
                return Ok(number);
            }
            sequence += 1;
        }
    }

    /// Price a new line from the service's current price
    fn new_line(&self, service_id: ServiceId, quantity: u32, note: &str) -> BilldeskResult<BillLine> {
        if quantity == 0 {
            return Err(BilldeskError::Validation(
                "Bill line quantity must be at least 1".into(),
            ));
        }

        let service = self
            .storage
            .services
            .get(service_id)?
            .ok_or_else(|| BilldeskError::service_not_found(service_id.to_string()))?;

        if !service.is_available {
            return Err(BilldeskError::Unavailable(service.name));
        }

        Ok(BillLine::new(service.id, service.price, quantity).with_note(note.trim()))
    }

    pub fn get(&self, id: BillId) -> BilldeskResult<Option<Bill>> {
        self.storage.bills.get(id)
    }

    /// Find a bill by number or by ID (full or short form)
    pub fn find(&self, identifier: &str) -> BilldeskResult<Option<Bill>> {
        if let Some(bill) = self.storage.bills.get_by_number(identifier)? {
            return Ok(Some(bill));
        }

        if let Ok(id) = identifier.parse::<BillId>() {
            return self.storage.bills.get(id);
        }

        Ok(self
            .storage
            .bills
            .get_all()?
            .into_iter()
            .find(|b| b.id.matches_short(identifier)))
    }

    pub fn require(&self, identifier: &str) -> BilldeskResult<Bill> {
        self.find(identifier)?
            .ok_or_else(|| BilldeskError::bill_not_found(identifier))
    }

    /// Add a line to an existing bill
    pub fn add_line(
        &self,
        bill_id: BillId,
        service_id: ServiceId,
        quantity: u32,
        note: &str,
    ) -> BilldeskResult<Bill> {
        let line = self.new_line(service_id, quantity, note)?;
        self.update(bill_id, |bill| {
            bill.add_line(line);
            Ok(())
        })
    }

    /// Remove a line from a bill
    pub fn remove_line(&self, bill_id: BillId, line_id: BillLineId) -> BilldeskResult<Bill> {
        self.update(bill_id, |bill| {
            bill.remove_line(line_id).map(|_| ()).ok_or_else(|| {
                BilldeskError::NotFound {
                    entity_type: "Bill line",
                    identifier: line_id.to_string(),
                }
            })
        })
    }

    /// Mark a bill as paid or unpaid
    pub fn set_paid(&self, bill_id: BillId, paid: bool) -> BilldeskResult<Bill> {
        self.update(bill_id, |bill| {
            bill.set_paid(paid);
            Ok(())
        })
    }

    fn update(
        &self,
        bill_id: BillId,
        change: impl FnOnce(&mut Bill) -> BilldeskResult<()>,
    ) -> BilldeskResult<Bill> {
        let mut bill = self
            .storage
            .bills
            .get(bill_id)?
            .ok_or_else(|| BilldeskError::bill_not_found(bill_id.to_string()))?;

        let before = bill.clone();
        change(&mut bill)?;
        bill.validate()
            .map_err(|e| BilldeskError::Validation(e.to_string()))?;

        self.storage.bills.upsert(bill.clone())?;
        self.storage.bills.save()?;

        self.storage.log_update(
            EntityType::Bill,
            bill.id.to_string(),
            Some(bill.number.clone()),
            &before,
            &bill,
        )?;

        tracing::info!(number = %bill.number, amount = %bill.amount, paid = bill.is_paid, "updated bill");
        Ok(bill)
    }

    /// Delete a bill and its lines
    pub fn delete(&self, bill_id: BillId) -> BilldeskResult<Bill> {
        let bill = self
            .storage
            .bills
            .get(bill_id)?
            .ok_or_else(|| BilldeskError::bill_not_found(bill_id.to_string()))?;

        self.storage.bills.delete(bill_id)?;
        self.storage.bills.save()?;

        self.storage.log_delete(
            EntityType::Bill,
            bill.id.to_string(),
            Some(bill.number.clone()),
            &bill,
        )?;

        tracing::info!(number = %bill.number, "deleted bill");
        Ok(bill)
    }

    /// List bills, most recent first
    pub fn list(&self, filter: &BillFilter) -> BilldeskResult<Vec<Bill>> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut bills = self.storage.bills.get_all()?;
        if let Some(paid) = filter.paid {
            bills.retain(|b| b.is_paid == paid);
        }

        if let Some(query) = search {
            let users = self.storage.users.get_all()?;
            bills.retain(|b| {
                let user = users.iter().find(|u| u.id == b.user_id);
                bill_matches(b, user, &query)
            });
        }

        Ok(bills)
    }

    /// List bills with the coworker label and payment column resolved
    pub fn summaries(
        &self,
        filter: &BillFilter,
        payment_link: &str,
    ) -> BilldeskResult<Vec<BillSummary>> {
        self.list(filter)?
            .into_iter()
            .map(|bill| {
                let coworker = self.coworker_label(bill.user_id)?;
                let payment = payment_status(&bill, payment_link);
                Ok(BillSummary {
                    bill,
                    coworker,
                    payment,
                })
            })
            .collect()
    }

    pub fn coworker_label(&self, user_id: UserId) -> BilldeskResult<String> {
        Ok(self
            .storage
            .users
            .get(user_id)?
            .map(|u| u.label())
            .unwrap_or_else(|| user_id.to_string()))
    }

    /// Snapshot of every bill for the revenue aggregators
    pub fn revenue_records(&self) -> BilldeskResult<Vec<BillRecord>> {
        Ok(self
            .storage
            .bills
            .get_all()?
            .iter()
            .map(|b| BillRecord {
                amount: b.amount,
                billing_date: b.billing_date,
                paid: b.is_paid,
            })
            .collect())
    }

    /// Snapshot of every bill line joined with its service
    ///
    /// Lines pointing at a service that no longer exists are skipped.
    pub fn line_records(&self) -> BilldeskResult<Vec<BillLineRecord>> {
        let services = self.storage.services.get_all()?;
        let mut records = Vec::new();

        for bill in self.storage.bills.get_all()? {
            for line in &bill.lines {
                match services.iter().find(|s| s.id == line.service_id) {
                    Some(service) => records.push(BillLineRecord {
                        billing_date: bill.billing_date,
                        service_name: service.name.clone(),
                        service_available: service.is_available,
                    }),
                    None => tracing::debug!(
                        bill = %bill.number,
                        service = %line.service_id,
                        "skipping line with unknown service"
                    ),
                }
            }
        }

        Ok(records)
    }
}

fn bill_matches(bill: &Bill, user: Option<&User>, query: &str) -> bool {
    let user_matches = user.is_some_and(|u| {
        u.first_name.to_lowercase().contains(query) || u.last_name.to_lowercase().contains(query)
    });

    user_matches
        || bill.number.to_lowercase().contains(query)
        || bill.amount.to_string().trim().contains(query)
}

//! Service layer for billdesk
//!
//! Business rules on top of the storage layer: validation, bill numbering,
//! line pricing, and the audit trail for every mutation.

pub mod bill;
pub mod service;
pub mod user;

pub use bill::{payment_status, BillFilter, BillService, BillSummary};
pub use service::ServiceService;
pub use user::{NewUser, UserService, UserUpdate};

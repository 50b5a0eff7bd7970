//! Audit trail for billdesk
//!
//! Every create, update and delete made through the service layer is
//! appended to `audit.log` as one JSON object per line. Updates carry a
//! short field-level diff so the log can be read without a JSON viewer.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;

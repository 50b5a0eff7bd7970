//! Core data models for billdesk
//!
//! Bills with their lines, services, users with profiles, and the money and
//! calendar-month types they share.

pub mod bill;
pub mod ids;
pub mod money;
pub mod period;
pub mod service;
pub mod user;

pub use bill::{Bill, BillLine};
pub use ids::{BillId, BillLineId, ServiceId, UserId};
pub use money::Money;
pub use period::BillingMonth;
pub use service::Service;
pub use user::{User, UserProfile};

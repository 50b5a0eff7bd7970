//! Reports module for billdesk
//!
//! Revenue per month and year (with a projection for the current year) and
//! subscription counts per service. The aggregators are pure functions over
//! read-only bill snapshots; the `generate` constructors build those
//! snapshots from storage.

pub mod revenue;
pub mod subscriptions;

pub use revenue::{
    annual_revenue, monthly_revenue, AnnualRevenue, BillRecord, MonthRevenue,
    MonthlyRevenueReport, RevenueBasis, RevenueHistory,
};
pub use subscriptions::{
    subscription_count, BillLineRecord, ServiceSubscription, SubscriptionReport,
};

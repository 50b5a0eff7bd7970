//! Display formatting for terminal output
//!
//! List views are rendered with `tabled`; detail views are plain aligned
//! text.

pub mod bill;
pub mod report;
pub mod service;
pub mod user;

pub use bill::{format_bill_details, format_bill_list};
pub use service::format_service_list;
pub use user::{format_user_details, format_user_list};

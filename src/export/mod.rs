//! Export module for billdesk
//!
//! - CSV: user mailing list
//! - JSON / YAML: full database export with schema version and counts

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_emails;
pub use json::{export_full_json, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;

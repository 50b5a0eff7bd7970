//! Full database export to YAML

use std::io::Write;

use crate::error::{BilldeskError, BilldeskResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> BilldeskError {
    BilldeskError::Export(e.to_string())
}

/// Export the full database to YAML, preceded by a comment header
pub fn export_full_yaml<W: Write + ?Sized>(storage: &Storage, writer: &mut W) -> BilldeskResult<()> {
    let export = FullExport::from_storage(storage)?;

    writeln!(writer, "# billdesk database export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(export_err)?;

    tracing::debug!(bills = export.metadata.bill_count, "exported database to YAML");
    Ok(())
}

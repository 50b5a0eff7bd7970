//! CLI commands for full database export

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{BilldeskError, BilldeskResult};
use crate::export::{export_full_json, export_full_yaml};
use crate::storage::Storage;

use super::create_output;

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export users, services and bills as JSON
    Json {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line output instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Export users, services and bills as YAML
    Yaml {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> BilldeskResult<()> {
    match cmd {
        ExportCommands::Json { output, compact } => write_to(output, |w| {
            export_full_json(storage, w, !compact)?;
            writeln!(w).map_err(|e| BilldeskError::Export(e.to_string()))
        }),
        ExportCommands::Yaml { output } => write_to(output, |w| export_full_yaml(storage, w)),
    }
}

fn write_to(
    output: Option<PathBuf>,
    export: impl FnOnce(&mut dyn Write) -> BilldeskResult<()>,
) -> BilldeskResult<()> {
    match output {
        Some(path) => {
            let mut writer = create_output(&path)?;
            export(&mut writer)?;
            writer
                .flush()
                .map_err(|e| BilldeskError::Export(e.to_string()))?;
            println!("Exported to: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            export(&mut stdout)?;
        }
    }
    Ok(())
}

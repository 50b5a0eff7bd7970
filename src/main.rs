use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use billdesk::cli::{
    handle_bill_command, handle_export_command, handle_report_command, handle_service_command,
    handle_user_command, BillCommands, ExportCommands, ReportCommands, ServiceCommands,
    UserCommands,
};
use billdesk::config::{paths::BilldeskPaths, settings::Settings};
use billdesk::storage::Storage;

#[derive(Parser)]
#[command(
    name = "billdesk",
    version,
    about = "Billing back office for a coworking space",
    long_about = "billdesk keeps the users, services and bills of a coworking space \
                  and reports revenue per month and per year, with a projection for \
                  the current year, and subscriptions per service."
)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bill management commands
    #[command(subcommand)]
    Bill(BillCommands),

    /// Service catalogue commands
    #[command(subcommand)]
    Service(ServiceCommands),

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Revenue and subscription reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export the whole database
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Create the data directory, default settings and the service catalogue
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "billdesk=debug" } else { "billdesk=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = BilldeskPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    tracing::debug!(base = %paths.base_dir().display(), "resolved paths");

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    if !storage.is_initialized() && !matches!(cli.command, Some(Commands::Init) | None) {
        tracing::warn!("no settings file found, using defaults; run 'billdesk init' first");
    }

    match cli.command {
        Some(Commands::Bill(cmd)) => handle_bill_command(&storage, &settings, cmd)?,
        Some(Commands::Service(cmd)) => handle_service_command(&storage, &settings, cmd)?,
        Some(Commands::User(cmd)) => handle_user_command(&storage, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing billdesk at: {}", paths.base_dir().display());
            billdesk::storage::initialize_storage(&paths)?;
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }
            storage.load_all()?;
            println!("Initialization complete!");
            println!();
            println!("Service catalogue:");
            for service in storage.services.get_all()? {
                println!(
                    "  - {} ({})",
                    service.name,
                    service.price.format_with_symbol(&settings.currency_symbol)
                );
            }
            println!();
            println!("Run 'billdesk user create --help' to register your first coworker.");
        }
        Some(Commands::Config) => {
            println!("billdesk Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency:       {}", settings.currency_symbol);
            println!("  Date format:    {}", settings.date_format);
            println!("  Payment link:   {}", settings.payment_link);
            println!("  Issuer address: {}", settings.issuer_address);
            println!("  Revenue basis:  {}", settings.revenue_basis);
        }
        None => {
            println!("billdesk - coworking billing back office");
            println!();
            println!("Run 'billdesk --help' for usage information.");
        }
    }

    Ok(())
}

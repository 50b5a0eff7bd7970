//! Service catalogue CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_service_list;
use crate::error::BilldeskResult;
use crate::services::ServiceService;
use crate::storage::Storage;

use super::parse_money;

#[derive(Subcommand, Debug)]
pub enum ServiceCommands {
    /// Add a service to the catalogue
    Create {
        name: String,
        /// Unit price, e.g. 250 or 250.00
        price: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List services
    List {
        /// Only services that can be billed
        #[arg(long, conflicts_with = "unavailable")]
        available: bool,
        /// Only retired services
        #[arg(long)]
        unavailable: bool,
    },
    /// Allow a service on new bill lines
    Enable { service: String },
    /// Retire a service from new bill lines
    Disable { service: String },
    /// Change the unit price for future bill lines
    SetPrice { service: String, price: String },
}

pub fn handle_service_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ServiceCommands,
) -> BilldeskResult<()> {
    let services = ServiceService::new(storage);

    match cmd {
        ServiceCommands::Create {
            name,
            price,
            description,
        } => {
            let service = services.create(&name, parse_money(&price)?, &description)?;
            println!(
                "Created service {} at {}",
                service.name,
                service.price.format_with_symbol(&settings.currency_symbol)
            );
        }

        ServiceCommands::List {
            available,
            unavailable,
        } => {
            let filter = match (available, unavailable) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let list = services.list(filter)?;
            println!("{}", format_service_list(&list, &settings.currency_symbol));
        }

        ServiceCommands::Enable { service } => {
            let service = services.require(&service)?;
            let updated = services.set_available(service.id, true)?;
            println!("Service {} is now available", updated.name);
        }

        ServiceCommands::Disable { service } => {
            let service = services.require(&service)?;
            let updated = services.set_available(service.id, false)?;
            println!("Service {} is no longer available", updated.name);
        }

        ServiceCommands::SetPrice { service, price } => {
            let service = services.require(&service)?;
            let updated = services.set_price(service.id, parse_money(&price)?)?;
            println!(
                "Service {} now costs {}",
                updated.name,
                updated.price.format_with_symbol(&settings.currency_symbol)
            );
        }
    }

    Ok(())
}

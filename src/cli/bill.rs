//! Bill CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_bill_details, format_bill_list};
use crate::error::{BilldeskError, BilldeskResult};
use crate::models::{Bill, BillLineId, ServiceId};
use crate::services::{BillFilter, BillService, ServiceService, UserService};
use crate::storage::Storage;

use super::parse_date;

#[derive(Subcommand, Debug)]
pub enum BillCommands {
    /// Issue a bill to a user
    Create {
        /// Username or user ID
        user: String,
        /// Service to bill, as NAME or NAME:QUANTITY (repeatable)
        #[arg(short, long = "line", value_name = "SERVICE[:QTY]", required = true)]
        lines: Vec<String>,
        /// Billing date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Add a line to an existing bill
    AddLine {
        /// Bill number or ID
        bill: String,
        /// Service name or ID
        service: String,
        #[arg(short, long, default_value = "1")]
        quantity: u32,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Remove a line from a bill
    RemoveLine {
        /// Bill number or ID
        bill: String,
        /// Line ID as shown by `bill show`
        line: String,
    },
    /// List bills, most recent first
    List {
        /// Only paid bills
        #[arg(long, conflicts_with = "unpaid")]
        paid: bool,
        /// Only unpaid bills
        #[arg(long)]
        unpaid: bool,
        /// Match user name, bill number or amount
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a bill with its lines
    Show {
        /// Bill number or ID
        bill: String,
    },
    /// Mark a bill as paid
    Pay {
        /// Bill number or ID
        bill: String,
    },
    /// Mark a bill as unpaid
    Unpay {
        /// Bill number or ID
        bill: String,
    },
    /// Delete a bill
    Delete {
        /// Bill number or ID
        bill: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Split a `SERVICE[:QTY]` argument
///
/// A suffix that is not a number is treated as part of the service name.
fn parse_line_spec(spec: &str) -> BilldeskResult<(&str, u32)> {
    let (name, quantity) = match spec.rsplit_once(':') {
        Some((name, qty)) => match qty.trim().parse::<u32>() {
            Ok(qty) => (name.trim(), qty),
            Err(_) => (spec.trim(), 1),
        },
        None => (spec.trim(), 1),
    };

    if name.is_empty() {
        return Err(BilldeskError::Validation(format!(
            "Invalid line '{}': missing service",
            spec
        )));
    }
    Ok((name, quantity))
}

pub fn handle_bill_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BillCommands,
) -> BilldeskResult<()> {
    let bills = BillService::new(storage);
    let services = ServiceService::new(storage);

    match cmd {
        BillCommands::Create { user, lines, date } => {
            let user = UserService::new(storage).require(&user)?;
            let billing_date = match date {
                Some(d) => parse_date(&d)?,
                None => chrono::Local::now().date_naive(),
            };

            let lines = lines
                .iter()
                .map(|spec| {
                    let (name, quantity) = parse_line_spec(spec)?;
                    let service = services.require(name)?;
                    Ok((service.id, quantity, String::new()))
                })
                .collect::<BilldeskResult<Vec<(ServiceId, u32, String)>>>()?;

            let bill = bills.create(user.id, billing_date, &lines)?;
            println!(
                "Created bill {} for {}: {}",
                bill.number,
                user.label(),
                bill.amount.format_with_symbol(&settings.currency_symbol)
            );
        }

        BillCommands::AddLine {
            bill,
            service,
            quantity,
            note,
        } => {
            let bill = bills.require(&bill)?;
            let service = services.require(&service)?;
            let updated =
                bills.add_line(bill.id, service.id, quantity, note.as_deref().unwrap_or(""))?;
            println!(
                "Added {} x {} to {} (total {})",
                quantity,
                service.name,
                updated.number,
                updated.amount.format_with_symbol(&settings.currency_symbol)
            );
        }

        BillCommands::RemoveLine { bill, line } => {
            let bill = bills.require(&bill)?;
            let line_id = find_line(&bill, &line)?;
            let updated = bills.remove_line(bill.id, line_id)?;
            println!(
                "Removed line from {} (total {})",
                updated.number,
                updated.amount.format_with_symbol(&settings.currency_symbol)
            );
        }

        BillCommands::List {
            paid,
            unpaid,
            search,
        } => {
            let filter = BillFilter {
                paid: if paid {
                    Some(true)
                } else if unpaid {
                    Some(false)
                } else {
                    None
                },
                search,
            };
            let summaries = bills.summaries(&filter, &settings.payment_link)?;
            println!("{}", format_bill_list(&summaries, &settings.date_format));
            if !summaries.is_empty() {
                println!("\nTotal: {} bills", summaries.len());
            }
        }

        BillCommands::Show { bill } => {
            let bill = bills.require(&bill)?;
            let coworker = bills.coworker_label(bill.user_id)?;
            let catalogue = services.list(None)?;
            print!(
                "{}",
                format_bill_details(&bill, &coworker, &catalogue, settings)
            );
        }

        BillCommands::Pay { bill } => {
            let bill = bills.require(&bill)?;
            let updated = bills.set_paid(bill.id, true)?;
            println!("Bill {} marked as paid", updated.number);
        }

        BillCommands::Unpay { bill } => {
            let bill = bills.require(&bill)?;
            let updated = bills.set_paid(bill.id, false)?;
            println!("Bill {} marked as unpaid", updated.number);
        }

        BillCommands::Delete { bill, force } => {
            let bill = bills.require(&bill)?;
            if !force {
                println!(
                    "About to delete bill {} ({}). Re-run with --force to confirm.",
                    bill.number,
                    bill.amount.format_with_symbol(&settings.currency_symbol)
                );
                return Ok(());
            }
            let deleted = bills.delete(bill.id)?;
            println!("Deleted bill {}", deleted.number);
        }
    }

    Ok(())
}

fn find_line(bill: &Bill, identifier: &str) -> BilldeskResult<BillLineId> {
    bill.lines
        .iter()
        .find(|l| l.id.to_string() == identifier || l.id.matches_short(identifier))
        .map(|l| l.id)
        .ok_or_else(|| BilldeskError::NotFound {
            entity_type: "Bill line",
            identifier: identifier.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_spec() {
        assert_eq!(parse_line_spec("Full Time").unwrap(), ("Full Time", 1));
        assert_eq!(parse_line_spec("Meeting 1 day:3").unwrap(), ("Meeting 1 day", 3));
        assert_eq!(parse_line_spec("Room: A").unwrap(), ("Room: A", 1));
        assert!(parse_line_spec(":2").unwrap_err().is_validation());
    }
}

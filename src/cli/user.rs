//! User CLI commands

use std::io;
use std::path::PathBuf;

use clap::Subcommand;

use crate::display::{format_user_details, format_user_list};
use crate::error::BilldeskResult;
use crate::export::export_emails;
use crate::services::{NewUser, UserService, UserUpdate};
use crate::storage::Storage;

use super::create_output;

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a user and their billing profile
    Create {
        username: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Address printed on the user's bills
        #[arg(long)]
        address: String,
        #[arg(long)]
        staff: bool,
    },
    /// List users
    List,
    /// Show a user's details
    Show {
        /// Username or user ID
        user: String,
    },
    /// Update a user's details or profile
    Edit {
        /// Username or user ID
        user: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Deactivate the account
        #[arg(long, conflicts_with = "activate")]
        deactivate: bool,
        /// Reactivate the account
        #[arg(long)]
        activate: bool,
    },
    /// Write every user's email as CSV, one per row
    ExportEmails {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn handle_user_command(storage: &Storage, cmd: UserCommands) -> BilldeskResult<()> {
    let users = UserService::new(storage);

    match cmd {
        UserCommands::Create {
            username,
            first_name,
            last_name,
            email,
            address,
            staff,
        } => {
            let user = users.create(NewUser {
                username,
                first_name,
                last_name,
                email,
                billing_address: address,
                is_staff: staff,
            })?;
            println!("Created user {}", user.label());
        }

        UserCommands::List => {
            let list = users.list()?;
            println!("{}", format_user_list(&list));
        }

        UserCommands::Show { user } => {
            let user = users.require(&user)?;
            let bill_count = storage.bills.get_by_user(user.id)?.len();
            print!("{}", format_user_details(&user, bill_count));
        }

        UserCommands::Edit {
            user,
            first_name,
            last_name,
            email,
            address,
            deactivate,
            activate,
        } => {
            let user = users.require(&user)?;
            let is_active = match (activate, deactivate) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let updated = users.update(
                user.id,
                UserUpdate {
                    first_name,
                    last_name,
                    email,
                    billing_address: address,
                    is_active,
                },
            )?;
            println!("Updated user {}", updated.label());
        }

        UserCommands::ExportEmails { output } => {
            let list = users.list()?;
            match output {
                Some(path) => {
                    export_emails(&list, create_output(&path)?)?;
                    println!("Exported {} emails to {}", list.len(), path.display());
                }
                None => export_emails(&list, io::stdout().lock())?,
            }
        }
    }

    Ok(())
}

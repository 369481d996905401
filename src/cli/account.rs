//! Account CLI commands
//!
//! Implements CLI commands for bank account management.

use clap::Subcommand;

use crate::display::account::{format_account_details, format_account_list};
use crate::error::LedgerResult;
use crate::services::AccountService;
use crate::storage::Storage;

use super::parse_money;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new bank account
    Create {
        /// Account name
        name: String,
        /// Opening balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
    },
    /// List all accounts
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Rename an account
    Rename {
        /// Account name or ID
        account: String,
        /// New name
        new_name: String,
    },
    /// Overwrite an account's balance (manual correction)
    SetBalance {
        /// Account name or ID
        account: String,
        /// New balance
        #[arg(allow_hyphen_values = true)]
        balance: String,
    },
    /// Delete an account with no linked transactions or rules
    Delete {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(storage: &Storage, cmd: AccountCommands) -> LedgerResult<()> {
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::Create { name, balance } => {
            let opening = parse_money(&balance, "balance")?;
            let account = service.create(&name, opening)?;

            println!("Created account: {}", account.name);
            println!("  Balance: {}", account.balance);
            println!("  ID: {}", account.id);
        }

        AccountCommands::List => {
            let accounts = service.list()?;
            println!("{}", format_account_list(&accounts));
        }

        AccountCommands::Show { account } => {
            let found = service.require(&account)?;
            print!("{}", format_account_details(&found));
        }

        AccountCommands::Rename { account, new_name } => {
            let found = service.require(&account)?;
            let updated = service.rename(found.id, &new_name)?;
            println!("Renamed account '{}' to '{}'", found.name, updated.name);
        }

        AccountCommands::SetBalance { account, balance } => {
            let found = service.require(&account)?;
            let balance = parse_money(&balance, "balance")?;
            let updated = service.set_balance(found.id, balance)?;
            println!(
                "Balance of '{}' set to {} (was {})",
                updated.name, updated.balance, found.balance
            );
        }

        AccountCommands::Delete { account } => {
            let found = service.require(&account)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted account: {}", deleted.name);
        }
    }

    Ok(())
}

//! Credit card CLI commands

use clap::Subcommand;

use crate::display::credit_card::{format_card_details, format_card_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;
use crate::services::{CreateCreditCardInput, CreditCardService, UpdateCreditCardInput};
use crate::storage::Storage;

use super::{parse_date, parse_money};

/// Credit card subcommands
#[derive(Subcommand)]
pub enum CardCommands {
    /// Add a credit card
    Add {
        /// Card name
        name: String,
        /// Next payment due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: String,
        /// Credit limit
        #[arg(short, long, default_value = "0")]
        limit: String,
        /// Amount currently owed
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
        /// Balance on the last statement
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        statement: String,
        /// Annual interest rate in percent (e.g., 19.99)
        #[arg(short, long, default_value = "0")]
        rate: f64,
    },
    /// List all credit cards
    List,
    /// Show card details
    Show {
        /// Card name or ID
        card: String,
    },
    /// Edit card details
    Edit {
        /// Card name or ID
        card: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
        /// New credit limit
        #[arg(short, long)]
        limit: Option<String>,
        /// Corrected amount owed
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<String>,
        /// New statement balance
        #[arg(short, long, allow_hyphen_values = true)]
        statement: Option<String>,
        /// New interest rate in percent
        #[arg(short, long)]
        rate: Option<f64>,
    },
    /// Delete a card with no linked transactions or rules
    Delete {
        /// Card name or ID
        card: String,
    },
}

/// Handle a credit card command
pub fn handle_card_command(storage: &Storage, cmd: CardCommands) -> LedgerResult<()> {
    let service = CreditCardService::new(storage);

    match cmd {
        CardCommands::Add {
            name,
            due,
            limit,
            balance,
            statement,
            rate,
        } => {
            let input = CreateCreditCardInput {
                name,
                current_balance: parse_money(&balance, "balance")?,
                statement_balance: parse_money(&statement, "statement balance")?,
                interest_rate: rate,
                due_date: parse_date(&due)?,
                credit_limit: parse_money(&limit, "credit limit")?,
            };
            let card = service.create(input)?;

            println!("Added credit card: {}", card.name);
            println!("  Balance: {}", card.current_balance);
            println!("  Limit:   {}", card.credit_limit);
            println!("  Due:     {}", card.due_date);
            println!("  ID: {}", card.id);
        }

        CardCommands::List => {
            let cards = service.list()?;
            println!("{}", format_card_list(&cards));
        }

        CardCommands::Show { card } => {
            let found = service.require(&card)?;
            let today = chrono::Local::now().date_naive();
            print!("{}", format_card_details(&found, today));
        }

        CardCommands::Edit {
            card,
            name,
            due,
            limit,
            balance,
            statement,
            rate,
        } => {
            let found = service.require(&card)?;

            let parse_opt = |value: Option<String>, what: &str| -> LedgerResult<Option<Money>> {
                value.map(|v| parse_money(&v, what)).transpose()
            };

            let input = UpdateCreditCardInput {
                name,
                current_balance: parse_opt(balance, "balance")?,
                statement_balance: parse_opt(statement, "statement balance")?,
                interest_rate: rate,
                due_date: due.as_deref().map(parse_date).transpose()?,
                credit_limit: parse_opt(limit, "credit limit")?,
            };

            if input.name.is_none()
                && input.current_balance.is_none()
                && input.statement_balance.is_none()
                && input.interest_rate.is_none()
                && input.due_date.is_none()
                && input.credit_limit.is_none()
            {
                return Err(LedgerError::Validation(
                    "No changes specified. Use --name, --due, --limit, --balance, --statement or --rate".into(),
                ));
            }

            let updated = service.update(found.id, input)?;
            println!("Updated credit card: {}", updated.name);
        }

        CardCommands::Delete { card } => {
            let found = service.require(&card)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted credit card: {}", deleted.name);
        }
    }

    Ok(())
}

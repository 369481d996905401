//! Transaction CLI commands
//!
//! Implements CLI commands for recording, listing, editing and deleting
//! actual transactions. Every change flows through the reconciler, so linked
//! account and card balances follow along.

use clap::Subcommand;

use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Link, TransactionId};
use crate::services::{
    AccountService, CreateTransactionInput, CreditCardService, TransactionService,
    UpdateTransactionInput,
};
use crate::storage::{Storage, TransactionFilter};

use super::{parse_date, parse_date_or_today, parse_id, parse_kind, parse_money, resolve_link};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Description (e.g., "Groceries at Aldi")
        description: String,
        /// Amount (always positive; use --type for direction)
        amount: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Category
        #[arg(short, long, default_value = "Uncategorized")]
        category: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Bank account the money moved through (name or ID)
        #[arg(short, long)]
        account: Option<String>,
        /// Credit card the expense was charged to (name or ID)
        #[arg(long)]
        card: Option<String>,
    },
    /// List transactions
    List {
        /// Filter by account name or ID
        #[arg(short, long)]
        account: Option<String>,
        /// Filter by credit card name or ID
        #[arg(long)]
        card: Option<String>,
        /// Filter by category name
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by type (income or expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New amount
        #[arg(short = 'A', long)]
        amount: Option<String>,
        /// New type (income or expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// Move to a bank account (name or ID)
        #[arg(short, long, conflicts_with = "unlink")]
        account: Option<String>,
        /// Move to a credit card (name or ID)
        #[arg(long, conflicts_with = "unlink")]
        card: Option<String>,
        /// Detach from any account or card
        #[arg(long)]
        unlink: bool,
    },
    /// Delete a transaction, reversing its balance effect
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            description,
            amount,
            kind,
            category,
            date,
            account,
            card,
        } => {
            let input = CreateTransactionInput {
                description,
                amount: parse_money(&amount, "amount")?,
                date: parse_date_or_today(date.as_deref())?,
                category,
                kind: parse_kind(&kind)?,
                link: resolve_link(storage, account.as_deref(), card.as_deref())?,
            };

            let txn = service.create(input)?;

            println!("Recorded transaction:");
            println!("  ID:       {}", txn.id);
            println!("  Date:     {}", txn.date);
            println!("  Amount:   {} ({})", txn.amount, txn.kind);
            println!("  Category: {}", txn.category);
            print_link_balance(storage, txn.link)?;
        }

        TransactionCommands::List {
            account,
            card,
            category,
            kind,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter {
                from: from.as_deref().map(parse_date).transpose()?,
                to: to.as_deref().map(parse_date).transpose()?,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                category,
                limit: Some(limit),
                ..TransactionFilter::default()
            };

            if let Some(name) = &account {
                filter.account = Some(AccountService::new(storage).require(name)?.id);
            }
            if let Some(name) = &card {
                filter.card = Some(CreditCardService::new(storage).require(name)?.id);
            }

            let transactions = service.list(&filter)?;
            print!("{}", format_transaction_register(&transactions));
        }

        TransactionCommands::Show { id } => {
            let txn = service.require(parse_id(&id, "transaction")?)?;
            print!("{}", format_transaction_details(&txn));
        }

        TransactionCommands::Edit {
            id,
            description,
            amount,
            kind,
            category,
            date,
            account,
            card,
            unlink,
        } => {
            let id: TransactionId = parse_id(&id, "transaction")?;

            let link = if unlink {
                Some(Link::None)
            } else if account.is_some() || card.is_some() {
                Some(resolve_link(storage, account.as_deref(), card.as_deref())?)
            } else {
                None
            };

            let input = UpdateTransactionInput {
                description,
                amount: amount.as_deref().map(|a| parse_money(a, "amount")).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                category,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                link,
            };

            if input.description.is_none()
                && input.amount.is_none()
                && input.date.is_none()
                && input.category.is_none()
                && input.kind.is_none()
                && input.link.is_none()
            {
                return Err(LedgerError::Validation(
                    "No changes specified. See 'cashflow txn edit --help'".into(),
                ));
            }

            let updated = service.update(id, input)?;
            println!("Updated transaction: {}", updated.id);
            print_link_balance(storage, updated.link)?;
        }

        TransactionCommands::Delete { id } => {
            let deleted = service.delete(parse_id(&id, "transaction")?)?;
            println!(
                "Deleted transaction {}: {} {}",
                deleted.id, deleted.description, deleted.amount
            );
            print_link_balance(storage, deleted.link)?;
        }
    }

    Ok(())
}

/// Print the balance of the linked account or card after a change
fn print_link_balance(storage: &Storage, link: Link) -> LedgerResult<()> {
    match link {
        Link::Account(id) => {
            if let Some(account) = storage.accounts.get(id)? {
                println!("  {} balance: {}", account.name, account.balance);
            }
        }
        Link::CreditCard(id) => {
            if let Some(card) = storage.cards.get(id)? {
                println!("  {} balance: {}", card.name, card.current_balance);
            }
        }
        Link::None => {}
    }
    Ok(())
}

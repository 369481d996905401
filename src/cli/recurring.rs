//! Recurring transaction CLI commands

use clap::Subcommand;

use crate::display::recurring::{format_rule_details, format_rule_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Frequency, Link, RecurringRuleId};
use crate::services::{CreateRuleInput, RecurringService, RuleFilter, UpdateRuleInput};
use crate::storage::Storage;

use super::{
    parse_date, parse_date_or_today, parse_id, parse_kind, parse_money, parse_month_or_current,
    resolve_link,
};

/// Recurring transaction subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// Add a recurring income or expense
    Add {
        /// Description (e.g., "Rent")
        description: String,
        /// Amount per occurrence
        amount: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// weekly, bi-weekly, semi-monthly, monthly, quarterly, annually or one-time
        #[arg(short, long, default_value = "monthly")]
        frequency: String,
        /// Category
        #[arg(short, long, default_value = "General")]
        category: String,
        /// First date the rule applies (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start: Option<String>,
        /// Last date the rule applies (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Link to a bank account (name or ID)
        #[arg(short, long)]
        account: Option<String>,
        /// Link to a credit card (name or ID)
        #[arg(long)]
        card: Option<String>,
    },
    /// List recurring transactions
    List {
        /// Only show active rules
        #[arg(long)]
        active: bool,
        /// Filter by type (income or expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Month used for the monthly equivalent column (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Show rule details
    Show {
        /// Rule ID
        id: String,
    },
    /// Edit a recurring transaction
    Edit {
        /// Rule ID
        id: String,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New amount
        #[arg(short = 'A', long)]
        amount: Option<String>,
        /// New type (income or expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New frequency
        #[arg(short, long)]
        frequency: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New start date
        #[arg(long)]
        start: Option<String>,
        /// New end date
        #[arg(long, conflicts_with = "no_end")]
        end: Option<String>,
        /// Remove the end date
        #[arg(long)]
        no_end: bool,
        /// Link to a bank account (name or ID)
        #[arg(short, long, conflicts_with = "unlink")]
        account: Option<String>,
        /// Link to a credit card (name or ID)
        #[arg(long, conflicts_with = "unlink")]
        card: Option<String>,
        /// Remove the account or card link
        #[arg(long)]
        unlink: bool,
    },
    /// Pause a rule so reports and forecasts ignore it
    Pause {
        /// Rule ID
        id: String,
    },
    /// Resume a paused rule
    Resume {
        /// Rule ID
        id: String,
    },
    /// Delete a recurring transaction
    Delete {
        /// Rule ID
        id: String,
    },
}

/// Handle a recurring transaction command
pub fn handle_recurring_command(storage: &Storage, cmd: RecurringCommands) -> LedgerResult<()> {
    let service = RecurringService::new(storage);

    match cmd {
        RecurringCommands::Add {
            description,
            amount,
            kind,
            frequency,
            category,
            start,
            end,
            account,
            card,
        } => {
            let input = CreateRuleInput {
                description,
                amount: parse_money(&amount, "amount")?,
                kind: parse_kind(&kind)?,
                frequency: Frequency::parse(&frequency),
                start_date: parse_date_or_today(start.as_deref())?,
                end_date: end.as_deref().map(parse_date).transpose()?,
                category,
                link: resolve_link(storage, account.as_deref(), card.as_deref())?,
            };
            let rule = service.create(input)?;

            println!("Added recurring {}: {}", rule.kind.as_str(), rule.description);
            println!("  Amount:    {} {}", rule.amount, rule.frequency);
            println!("  Starts:    {}", rule.start_date);
            println!("  Linked to: {}", rule.link);
            println!("  ID: {}", rule.id);
        }

        RecurringCommands::List {
            active,
            kind,
            category,
            month,
        } => {
            let filter = RuleFilter {
                active_only: active,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                category,
            };
            let month = parse_month_or_current(month.as_deref())?;
            let rules = service.list(&filter)?;
            println!("{}", format_rule_list(&rules, month));
        }

        RecurringCommands::Show { id } => {
            let rule = service.require(parse_id(&id, "recurring")?)?;
            print!("{}", format_rule_details(&rule));
        }

        RecurringCommands::Edit {
            id,
            description,
            amount,
            kind,
            frequency,
            category,
            start,
            end,
            no_end,
            account,
            card,
            unlink,
        } => {
            let id: RecurringRuleId = parse_id(&id, "recurring")?;

            let end_date = if no_end {
                Some(None)
            } else {
                end.as_deref().map(parse_date).transpose()?.map(Some)
            };

            let link = if unlink {
                Some(Link::None)
            } else if account.is_some() || card.is_some() {
                Some(resolve_link(storage, account.as_deref(), card.as_deref())?)
            } else {
                None
            };

            let input = UpdateRuleInput {
                description,
                amount: amount.as_deref().map(|a| parse_money(a, "amount")).transpose()?,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                frequency: frequency.as_deref().map(Frequency::parse),
                start_date: start.as_deref().map(parse_date).transpose()?,
                end_date,
                category,
                link,
            };

            if input.description.is_none()
                && input.amount.is_none()
                && input.kind.is_none()
                && input.frequency.is_none()
                && input.start_date.is_none()
                && input.end_date.is_none()
                && input.category.is_none()
                && input.link.is_none()
            {
                return Err(LedgerError::Validation(
                    "No changes specified. See 'cashflow recurring edit --help'".into(),
                ));
            }

            let updated = service.update(id, input)?;
            println!("Updated recurring transaction: {}", updated.description);
        }

        RecurringCommands::Pause { id } => {
            let rule = service.set_active(parse_id(&id, "recurring")?, false)?;
            println!("Paused: {}", rule.description);
        }

        RecurringCommands::Resume { id } => {
            let rule = service.set_active(parse_id(&id, "recurring")?, true)?;
            println!("Resumed: {}", rule.description);
        }

        RecurringCommands::Delete { id } => {
            let rule = service.delete(parse_id(&id, "recurring")?)?;
            println!("Deleted recurring transaction: {}", rule.description);
        }
    }

    Ok(())
}

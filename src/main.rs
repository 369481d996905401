use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cashflow::cli::{
    handle_account_command, handle_audit_command, handle_card_command, handle_import_command,
    handle_recurring_command, handle_report_command, handle_transaction_command,
};
use cashflow::config::paths::DATA_DIR_ENV;
use cashflow::config::{LedgerPaths, Settings};
use cashflow::storage::Storage;

#[derive(Parser)]
#[command(
    name = "cashflow",
    version,
    about = "Personal cash-flow ledger and balance forecaster",
    long_about = "cashflow tracks bank accounts, credit cards, recurring income and \
                  expenses, and actual transactions. Recording a transaction keeps the \
                  linked balance in step, and reports compare what was expected with \
                  what happened and project balances forward."
)]
struct Cli {
    /// Directory holding the settings, database and audit log
    #[arg(long, global = true, env = DATA_DIR_ENV, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bank account management commands
    #[command(subcommand)]
    Account(cashflow::cli::AccountCommands),

    /// Credit card management commands
    #[command(subcommand)]
    Card(cashflow::cli::CardCommands),

    /// Recurring income and expense commands
    #[command(subcommand, alias = "rec")]
    Recurring(cashflow::cli::RecurringCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(cashflow::cli::TransactionCommands),

    /// Import transactions from a CSV file
    Import(cashflow::cli::ImportArgs),

    /// Reports and forecasts
    #[command(subcommand)]
    Report(cashflow::cli::ReportCommands),

    /// Show recent entries from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize a new ledger
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    cashflow::logging::init_tracing();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => LedgerPaths::with_base_dir(dir),
        None => LedgerPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing cashflow at: {}", paths.base_dir().display());
            Storage::open(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  cashflow account create Checking --balance 1000");
            println!("  cashflow recurring add Rent 1500 --type expense --frequency monthly");
            println!("  cashflow report forecast");
        }
        Some(Commands::Config) => {
            println!("cashflow Configuration");
            println!("======================");
            println!("Data directory: {}", paths.base_dir().display());
            println!("Database:       {}", paths.database_file().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!("Initialized:    {}", if paths.is_initialized() { "Yes" } else { "No" });
            println!();
            println!("Settings:");
            println!("  Forecast months:        {}", settings.forecast_months());
            println!("  Low balance threshold:  {}", settings.low_balance_threshold);
            println!("  Utilization warning:    {:.0}%", settings.utilization_warning_percent);
            println!("  Due soon window (days): {}", settings.due_soon_days);
        }
        Some(Commands::Account(cmd)) => handle_account_command(&Storage::open(&paths)?, cmd)?,
        Some(Commands::Card(cmd)) => handle_card_command(&Storage::open(&paths)?, cmd)?,
        Some(Commands::Recurring(cmd)) => handle_recurring_command(&Storage::open(&paths)?, cmd)?,
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&Storage::open(&paths)?, cmd)?
        }
        Some(Commands::Import(args)) => handle_import_command(&Storage::open(&paths)?, args)?,
        Some(Commands::Report(cmd)) => {
            handle_report_command(&Storage::open(&paths)?, &settings, cmd)?
        }
        Some(Commands::Audit { limit }) => handle_audit_command(&Storage::open(&paths)?, limit)?,
        None => {
            println!("cashflow - personal cash-flow ledger");
            println!();
            println!("Run 'cashflow --help' for usage information.");
        }
    }

    Ok(())
}

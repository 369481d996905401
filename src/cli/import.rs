//! CLI command handler for CSV import
//!
//! Detects the column layout from the file's header row, applies any
//! overrides from the command line, and records each row as a transaction.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use csv::ReaderBuilder;

use crate::error::{LedgerError, LedgerResult};
use crate::services::{AmountSign, ColumnMapping, ImportService};
use crate::storage::Storage;

use super::resolve_link;

/// How the amount column decides income versus expense
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SignArg {
    /// Negative amounts are expenses, positive are income
    Signed,
    /// Every row is an expense
    Expense,
    /// Every row is income
    Income,
    /// Use the file's type column
    Column,
}

impl From<SignArg> for AmountSign {
    fn from(arg: SignArg) -> Self {
        match arg {
            SignArg::Signed => AmountSign::SignedAmount,
            SignArg::Expense => AmountSign::AllExpenses,
            SignArg::Income => AmountSign::AllIncome,
            SignArg::Column => AmountSign::TypeColumnOnly,
        }
    }
}

/// Arguments for `cashflow import`
#[derive(Args)]
pub struct ImportArgs {
    /// Path to the CSV file
    pub file: PathBuf,
    /// Link every imported row to this bank account (name or ID)
    #[arg(short, long)]
    pub account: Option<String>,
    /// Link every imported row to this credit card (name or ID)
    #[arg(long)]
    pub card: Option<String>,
    /// How amounts map to income or expense (detected from the header if omitted)
    #[arg(long, value_enum)]
    pub sign: Option<SignArg>,
    /// Date format of the date column (chrono syntax, e.g. "%m/%d/%Y")
    #[arg(long)]
    pub date_format: Option<String>,
    /// Category for rows without one
    #[arg(short, long)]
    pub category: Option<String>,
}

/// Handle the import command
pub fn handle_import_command(storage: &Storage, args: ImportArgs) -> LedgerResult<()> {
    let import_service = ImportService::new(storage);

    if !args.file.exists() {
        return Err(LedgerError::Import(format!(
            "File not found: {}",
            args.file.display()
        )));
    }

    // Try to detect mapping from CSV header
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(&args.file)?;
    let headers = reader.headers()?.clone();
    let mut mapping = import_service.detect_mapping_from_headers(&headers);

    let link = resolve_link(storage, args.account.as_deref(), args.card.as_deref())?;
    mapping = mapping.with_link(link);

    // Card statements list charges as positive numbers
    if link.credit_card_id().is_some() && mapping.type_column.is_none() {
        mapping = mapping
            .with_amount_sign(AmountSign::AllExpenses)
            .with_date_format(&ColumnMapping::credit_card().date_format);
    }
    if let Some(sign) = args.sign {
        mapping = mapping.with_amount_sign(sign.into());
    }
    if let Some(format) = &args.date_format {
        mapping = mapping.with_date_format(format);
    }
    if let Some(category) = &args.category {
        mapping = mapping.with_default_category(category);
    }

    let result = import_service.import_file(&args.file, &mapping)?;

    println!("Import from '{}'", args.file.display());
    println!("{}", "=".repeat(40));
    println!("  Imported:  {}", result.imported);
    println!("  Failed:    {}", result.failed_count());

    if !result.failed.is_empty() {
        println!();
        println!("Rows not imported:");
        for error in result.failed.iter().take(10) {
            println!("  Row {}: {}", error.row_number, error.message);
        }
        if result.failed.len() > 10 {
            println!("  ... and {} more", result.failed.len() - 10);
        }
    }

    Ok(())
}

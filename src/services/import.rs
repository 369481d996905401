//! CSV Import service
//!
//! Imports actual transactions from bank or card CSV exports. Each row goes
//! through [`TransactionService::create`], so every imported row is validated
//! and reconciled exactly like a hand-entered one. A bad row is reported with
//! its row number and does not stop the rest of the file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::{info, warn};

use crate::error::LedgerResult;
use crate::models::{Link, Money, TransactionId, TransactionKind};
use crate::services::transaction::{CreateTransactionInput, TransactionService};
use crate::storage::Storage;

/// How a row's amount decides between income and expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountSign {
    /// Negative amounts are expenses, everything else is income
    #[default]
    SignedAmount,
    /// Every row is an expense (typical for card statements)
    AllExpenses,
    /// Every row is income
    AllIncome,
    /// Only the type column decides; rows without one use the default kind
    TypeColumnOnly,
}

/// Column mapping configuration for CSV import
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Index of the date column
    pub date_column: usize,
    /// Index of the description column
    pub description_column: usize,
    /// Index of the amount column
    pub amount_column: usize,
    /// Index of the category column
    pub category_column: Option<usize>,
    /// Index of the income/expense type column
    pub type_column: Option<usize>,
    /// Date format string (e.g., "%Y-%m-%d", "%m/%d/%Y")
    pub date_format: String,
    /// Whether the first row is a header
    pub has_header: bool,
    /// Delimiter character
    pub delimiter: char,
    pub amount_sign: AmountSign,
    /// Category for rows without one
    pub default_category: String,
    /// Kind for rows whose kind cannot be read from the file
    pub default_kind: TransactionKind,
    /// Account or card every imported row is linked to
    pub link: Link,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: 0,
            description_column: 1,
            amount_column: 2,
            category_column: None,
            type_column: None,
            date_format: "%Y-%m-%d".to_string(),
            has_header: true,
            delimiter: ',',
            amount_sign: AmountSign::SignedAmount,
            default_category: "Uncategorized".to_string(),
            default_kind: TransactionKind::Expense,
            link: Link::None,
        }
    }
}

impl ColumnMapping {
    /// Create a new column mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Common mapping for credit card CSV exports
    pub fn credit_card() -> Self {
        Self {
            date_format: "%m/%d/%Y".to_string(),
            amount_sign: AmountSign::AllExpenses,
            ..Self::default()
        }
    }

    /// Set the date format
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    /// Set whether first row is header
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_amount_sign(mut self, sign: AmountSign) -> Self {
        self.amount_sign = sign;
        self
    }

    pub fn with_default_category(mut self, category: &str) -> Self {
        self.default_category = category.to_string();
        self
    }

    /// Link every imported row to an account or card
    pub fn with_link(mut self, link: Link) -> Self {
        self.link = link;
        self
    }
}

/// Map a free-form type label onto a transaction kind
///
/// Unknown labels count as expenses.
pub fn normalize_type(label: &str) -> TransactionKind {
    match label.trim().to_lowercase().as_str() {
        "income" | "credit" | "deposit" | "refund" | "inflow" => TransactionKind::Income,
        _ => TransactionKind::Expense,
    }
}

/// A parsed row from the CSV before import
#[derive(Debug, Clone)]
pub struct ParsedTransaction {
    /// 1-based data row, not counting the header
    pub row_number: usize,
    pub date: NaiveDate,
    pub description: String,
    /// Magnitude; the direction lives in `kind`
    pub amount: Money,
    pub kind: TransactionKind,
    pub category: String,
}

/// A row that could not be parsed or imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row_number: usize,
    pub message: String,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Number of transactions imported
    pub imported: usize,
    /// IDs of imported transactions
    pub imported_ids: Vec<TransactionId>,
    /// Rows that were skipped, in file order
    pub failed: Vec<RowError>,
}

impl ImportResult {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import every row of the CSV file at `path`
    pub fn import_file(&self, path: &Path, mapping: &ColumnMapping) -> LedgerResult<ImportResult> {
        let file = File::open(path)?;
        let result = self.import_from_reader(file, mapping)?;
        info!(
            file = %path.display(),
            imported = result.imported,
            failed = result.failed_count(),
            "finished CSV import"
        );
        Ok(result)
    }

    /// Import every row read from `input`
    pub fn import_from_reader<R: Read>(
        &self,
        input: R,
        mapping: &ColumnMapping,
    ) -> LedgerResult<ImportResult> {
        let mut reader = ReaderBuilder::new()
            .has_headers(mapping.has_header)
            .delimiter(mapping.delimiter as u8)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);
        let parsed = self.parse_csv_from_reader(&mut reader, mapping)?;
        Ok(self.import_parsed(&parsed, mapping.link))
    }

    /// Parse a CSV from a reader into transactions
    pub fn parse_csv_from_reader<R: Read>(
        &self,
        reader: &mut Reader<R>,
        mapping: &ColumnMapping,
    ) -> LedgerResult<Vec<Result<ParsedTransaction, RowError>>> {
        let mut results = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let row_number = idx + 1;
            let parsed = match result {
                Ok(record) => self.parse_record(&record, row_number, mapping),
                Err(e) => Err(format!("Error reading CSV record: {}", e)),
            };
            results.push(parsed.map_err(|message| RowError {
                row_number,
                message,
            }));
        }
        Ok(results)
    }

    /// Record each parsed row as a transaction linked to `link`
    pub fn import_parsed(
        &self,
        parsed: &[Result<ParsedTransaction, RowError>],
        link: Link,
    ) -> ImportResult {
        let txn_service = TransactionService::new(self.storage);
        let mut result = ImportResult::default();

        for entry in parsed {
            let row = match entry {
                Ok(row) => row,
                Err(e) => {
                    warn!(row = e.row_number, error = %e.message, "skipping CSV row");
                    result.failed.push(e.clone());
                    continue;
                }
            };

            let input = CreateTransactionInput {
                description: row.description.clone(),
                amount: row.amount,
                date: row.date,
                category: row.category.clone(),
                kind: row.kind,
                link,
            };

            match txn_service.create(input) {
                Ok(txn) => {
                    result.imported += 1;
                    result.imported_ids.push(txn.id);
                }
                Err(e) => {
                    warn!(row = row.row_number, error = %e, "skipping CSV row");
                    result.failed.push(RowError {
                        row_number: row.row_number,
                        message: e.to_string(),
                    });
                }
            }
        }

        result
    }

    /// Parse a single CSV record
    fn parse_record(
        &self,
        record: &StringRecord,
        row_number: usize,
        mapping: &ColumnMapping,
    ) -> Result<ParsedTransaction, String> {
        let date_str = record
            .get(mapping.date_column)
            .ok_or_else(|| "Missing date column".to_string())?
            .trim();
        let date = self.parse_date(date_str, &mapping.date_format)?;

        let description = record
            .get(mapping.description_column)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let amount_str = record
            .get(mapping.amount_column)
            .ok_or_else(|| "Missing amount column".to_string())?
            .trim();
        let signed = self.parse_amount_string(amount_str)?;

        let type_label = mapping
            .type_column
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let kind = match mapping.amount_sign {
            AmountSign::SignedAmount if signed.is_negative() => TransactionKind::Expense,
            AmountSign::SignedAmount => TransactionKind::Income,
            AmountSign::AllExpenses => TransactionKind::Expense,
            AmountSign::AllIncome => TransactionKind::Income,
            AmountSign::TypeColumnOnly => type_label.map_or(mapping.default_kind, normalize_type),
        };

        let category = mapping
            .category_column
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(mapping.default_category.as_str())
            .to_string();

        Ok(ParsedTransaction {
            row_number,
            date,
            description,
            amount: signed.abs(),
            kind,
            category,
        })
    }

    /// Parse a date string using multiple format attempts
    fn parse_date(&self, s: &str, primary_format: &str) -> Result<NaiveDate, String> {
        if let Ok(date) = NaiveDate::parse_from_str(s, primary_format) {
            return Ok(date);
        }

        let formats = [
            "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%d/%m/%y", "%Y/%m/%d", "%m-%d-%Y",
            "%d-%m-%Y",
        ];

        for format in formats {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Ok(date);
            }
        }

        Err(format!("Could not parse date: '{}'", s))
    }

    /// Guess a column mapping from a CSV header record
    pub fn detect_mapping_from_headers(&self, headers: &StringRecord) -> ColumnMapping {
        let mut mapping = ColumnMapping::new();

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();

            if h.contains("date") || h.contains("posted") {
                mapping.date_column = idx;
            } else if h.contains("amount") || h.contains("value") {
                mapping.amount_column = idx;
            } else if h.contains("category") {
                mapping.category_column = Some(idx);
            } else if h == "type" || h.contains("kind") || h.contains("transaction type") {
                mapping.type_column = Some(idx);
            } else if h.contains("description")
                || h.contains("payee")
                || h.contains("merchant")
                || h.contains("name")
            {
                mapping.description_column = idx;
            }
        }

        if mapping.type_column.is_some() {
            mapping.amount_sign = AmountSign::TypeColumnOnly;
        }

        mapping
    }

    /// Parse an amount string, handling various formats
    fn parse_amount_string(&self, s: &str) -> Result<Money, String> {
        // Remove currency symbols, commas, spaces
        let cleaned: String = s
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '(' || *c == ')')
            .collect();

        // Parentheses mean negative (accounting format)
        let (is_negative, value) = if cleaned.starts_with('(') && cleaned.ends_with(')') {
            (true, &cleaned[1..cleaned.len() - 1])
        } else if let Some(stripped) = cleaned.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, cleaned.as_str())
        };

        Money::parse(value)
            .map(|m| if is_negative { -m } else { m })
            .map_err(|e| format!("Could not parse amount '{}': {}", s, e))
    }
}

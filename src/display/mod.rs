//! Display formatting for terminal output
//!
//! Table and detail views for accounts, credit cards, recurring rules and
//! transactions.

pub mod account;
pub mod credit_card;
pub mod recurring;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use credit_card::{format_card_details, format_card_list};
pub use recurring::{format_rule_details, format_rule_list};
pub use transaction::{
    format_transaction_details, format_transaction_register, format_transaction_row,
};

//! cashflow - personal cash-flow ledger and balance forecaster
//!
//! This library keeps bank account and credit card balances consistent with
//! the transactions recorded against them, and turns recurring income and
//! expense rules into monthly expectations and balance forecasts.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, cards, recurring rules, transactions)
//! - `storage`: SQLite storage layer
//! - `services`: Business logic, including frequency normalization and
//!   balance reconciliation
//! - `reports`: Expected-vs-actual, forecast and overview reports
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `cashflow` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use cashflow::config::{LedgerPaths, Settings};
//! use cashflow::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};

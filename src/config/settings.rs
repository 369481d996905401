//! User settings for the cash-flow ledger
//!
//! Manages user preferences: the forecast default and the thresholds the
//! dashboard uses to raise insights. Amounts always print in dollars and
//! dates as `YYYY-MM-DD`.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::Money;

/// Largest forecast horizon, in months
pub const MAX_FORECAST_MONTHS: u32 = 12;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Forecast horizon used when none is given on the command line
    #[serde(default = "default_forecast_months")]
    pub default_forecast_months: u32,

    /// Accounts below this balance are flagged on the dashboard
    #[serde(default = "default_low_balance_threshold")]
    pub low_balance_threshold: Money,

    /// Card utilization (percent) above which the dashboard warns
    #[serde(default = "default_utilization_warning")]
    pub utilization_warning_percent: f64,

    /// Cards due within this many days are flagged on the dashboard
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: i64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_forecast_months() -> u32 {
    3
}

fn default_low_balance_threshold() -> Money {
    Money::from_cents(10_000)
}

fn default_utilization_warning() -> f64 {
    30.0
}

fn default_due_soon_days() -> i64 {
    7
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_forecast_months: default_forecast_months(),
            low_balance_threshold: default_low_balance_threshold(),
            utilization_warning_percent: default_utilization_warning(),
            due_soon_days: default_due_soon_days(),
        }
    }
}

impl Settings {
    /// Forecast horizon from settings, clamped to 1..=12
    pub fn forecast_months(&self) -> u32 {
        self.default_forecast_months.clamp(1, MAX_FORECAST_MONTHS)
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

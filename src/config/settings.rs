//! Ledger settings
//!
//! Transfer fee, exchange rates, search and login limits, and the other
//! knobs the ledger reads at startup. Every field has a default so a partial
//! `config.json` is valid.

use std::collections::BTreeMap;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::conversion::{FixedRates, TimeoutConverter};
use crate::error::LedgerError;
use crate::models::{Amount, Currency, JointAccountPolicy, Money, TransferPolicy};
use crate::storage::{write_json_atomic, AccountOrder};

/// Ledger settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Charged to the sender of every transfer
    pub transaction_fee: Money,

    /// Currency cross-currency balances are compared in
    pub base_currency: Currency,

    /// Units of each currency per one unit of the base currency
    pub exchange_rates: BTreeMap<Currency, Decimal>,

    /// Minimum fuzzy-search similarity in `[0, 1]`
    pub search_threshold: f64,

    pub max_accounts_per_user: usize,

    pub max_login_tries: u32,

    pub login_timeout_secs: u64,

    pub joint_account_policy: JointAccountPolicy,

    pub account_order: AccountOrder,

    pub lock_timeout_ms: u64,

    pub conversion_timeout_ms: u64,

    /// Currency of the account seeded on first run
    pub default_currency: Currency,

    /// Fallback log filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        let exchange_rates = BTreeMap::from([
            (Currency::EUR, Decimal::ONE),
            (Currency::CZK, Decimal::new(25, 0)),
            (Currency::USD, Decimal::new(108, 2)),
            (Currency::GBP, Decimal::new(86, 2)),
        ]);

        Self {
            transaction_fee: Money::new(Amount::from_major_minor(10, 0), Currency::CZK),
            base_currency: Currency::EUR,
            exchange_rates,
            search_threshold: 0.4,
            max_accounts_per_user: 5,
            max_login_tries: 5,
            login_timeout_secs: 30,
            joint_account_policy: JointAccountPolicy::default(),
            account_order: AccountOrder::default(),
            lock_timeout_ms: 5_000,
            conversion_timeout_ms: 3_000,
            default_currency: Currency::CZK,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Reject values the ledger cannot work with
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.transaction_fee.amount().is_negative() {
            return Err(LedgerError::Config(format!(
                "transaction_fee must not be negative, got {}",
                self.transaction_fee
            )));
        }
        if !(0.0..=1.0).contains(&self.search_threshold) {
            return Err(LedgerError::Config(format!(
                "search_threshold must be within [0, 1], got {}",
                self.search_threshold
            )));
        }
        if let Some((code, rate)) = self.exchange_rates.iter().find(|(_, r)| **r <= Decimal::ZERO) {
            return Err(LedgerError::Config(format!(
                "exchange rate for {} must be positive, got {}",
                code, rate
            )));
        }
        Ok(())
    }

    pub fn transfer_policy(&self) -> TransferPolicy {
        TransferPolicy::new(self.transaction_fee).with_joint_accounts(self.joint_account_policy)
    }

    /// Rate table built from `exchange_rates`
    pub fn rates(&self) -> FixedRates {
        self.exchange_rates
            .iter()
            .fold(FixedRates::new(self.base_currency), |rates, (code, rate)| {
                rates.with_rate(*code, *rate)
            })
    }

    /// Rate table bounded by `conversion_timeout_ms`
    pub fn converter(&self) -> TimeoutConverter<FixedRates> {
        TimeoutConverter::new(self.rates(), self.conversion_timeout())
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn conversion_timeout(&self) -> Duration {
        Duration::from_millis(self.conversion_timeout_ms)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::ConversionService;
    use tempfile::TempDir;

    fn currency(code: &str) -> Currency {
        Currency::parse(code).unwrap()
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.transaction_fee.to_string(), "10.00 CZK");
        assert_eq!(settings.base_currency.as_str(), "EUR");
        assert_eq!(settings.search_threshold, 0.4);
        assert_eq!(settings.max_accounts_per_user, 5);
        assert_eq!(settings.joint_account_policy, JointAccountPolicy::Independent);
        assert_eq!(settings.account_order, AccountOrder::BalanceDesc);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rates_from_settings() {
        let rates = Settings::default().rates();
        let converted = rates
            .convert(Amount::from_minor(100), currency("EUR"), currency("CZK"))
            .unwrap();
        assert_eq!(converted, Amount::from_minor(2_500));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.joint_account_policy = JointAccountPolicy::AllOwners;
        settings.max_accounts_per_user = 2;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{ "search_threshold": 0.6, "exchange_rates": { "EUR": "1", "CZK": "24.5" } }"#,
        )
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.search_threshold, 0.6);
        assert_eq!(loaded.exchange_rates[&currency("CZK")], Decimal::new(245, 1));
        assert_eq!(loaded.max_login_tries, 5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut settings = Settings::default();
        settings.search_threshold = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings
            .exchange_rates
            .insert(currency("USD"), Decimal::ZERO);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert_eq!(Settings::load_or_create(&paths).unwrap(), Settings::default());
    }
}

//! Currency conversion collaborator
//!
//! The ledger never looks up exchange rates itself. Every cross-currency
//! step goes through an injected [`ConversionService`], which is treated as
//! a pure function with a failure mode: no caching, no retries.
//!
//! - [`FixedRates`]: a rate table relative to a base currency
//! - [`TimeoutConverter`]: bounds how long a (possibly remote) lookup may take

mod fixed;
mod timeout;

pub use fixed::FixedRates;
pub use timeout::TimeoutConverter;

use std::time::Duration;

use crate::models::{Amount, Currency};

/// Converts an amount between two currencies
pub trait ConversionService: Send + Sync {
    /// Convert `amount` expressed in `from` into `to`
    fn convert(&self, amount: Amount, from: Currency, to: Currency)
        -> Result<Amount, ConversionError>;
}

impl<F> ConversionService for F
where
    F: Fn(Amount, Currency, Currency) -> Result<Amount, ConversionError> + Send + Sync,
{
    fn convert(
        &self,
        amount: Amount,
        from: Currency,
        to: Currency,
    ) -> Result<Amount, ConversionError> {
        self(amount, from, to)
    }
}

/// Why a conversion could not be produced
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("No conversion available from {from} to {to}: {reason}")]
    Unavailable {
        from: Currency,
        to: Currency,
        reason: String,
    },

    #[error("Conversion from {from} to {to} timed out after {after:?}")]
    Timeout {
        from: Currency,
        to: Currency,
        after: Duration,
    },

    #[error("Converted amount is out of range")]
    Overflow,
}

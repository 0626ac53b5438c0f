//! Static exchange rate table

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::{ConversionError, ConversionService};
use crate::models::{Amount, Currency};

/// Exchange rates expressed as units of each currency per one unit of the
/// base currency. The base currency itself always has rate 1.
#[derive(Debug, Clone)]
pub struct FixedRates {
    base: Currency,
    rates: HashMap<Currency, Decimal>,
}

impl FixedRates {
    pub fn new(base: Currency) -> Self {
        let mut rates = HashMap::new();
        rates.insert(base, Decimal::ONE);
        Self { base, rates }
    }

    /// Builder-style rate registration
    pub fn with_rate(mut self, currency: Currency, units_per_base: Decimal) -> Self {
        self.set_rate(currency, units_per_base);
        self
    }

    /// Register or replace a rate. Rates for the base currency are ignored.
    pub fn set_rate(&mut self, currency: Currency, units_per_base: Decimal) {
        if currency != self.base {
            self.rates.insert(currency, units_per_base);
        }
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    pub fn rate(&self, currency: Currency) -> Option<Decimal> {
        self.rates.get(&currency).copied()
    }

    fn usable_rate(
        &self,
        currency: Currency,
        from: Currency,
        to: Currency,
    ) -> Result<Decimal, ConversionError> {
        match self.rate(currency) {
            Some(rate) if rate > Decimal::ZERO => Ok(rate),
            Some(_) => Err(ConversionError::Unavailable {
                from,
                to,
                reason: format!("non-positive rate for {}", currency),
            }),
            None => Err(ConversionError::Unavailable {
                from,
                to,
                reason: format!("no rate for {}", currency),
            }),
        }
    }
}

impl ConversionService for FixedRates {
    fn convert(
        &self,
        amount: Amount,
        from: Currency,
        to: Currency,
    ) -> Result<Amount, ConversionError> {
        if from == to {
            return Ok(amount);
        }

        let from_rate = self.usable_rate(from, from, to)?;
        let to_rate = self.usable_rate(to, from, to)?;

        // Minor units scale identically in every currency we carry
        let converted = Decimal::from(amount.minor())
            .checked_mul(to_rate)
            .and_then(|v| v.checked_div(from_rate))
            .ok_or(ConversionError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        converted
            .to_i64()
            .map(Amount::from_minor)
            .ok_or(ConversionError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn cur(code: &str) -> Currency {
        Currency::parse(code).unwrap()
    }

    fn table() -> FixedRates {
        FixedRates::new(cur("EUR"))
            .with_rate(cur("CZK"), Decimal::new(25, 0))
            .with_rate(cur("USD"), Decimal::from_str("1.08").unwrap())
    }

    #[test]
    fn test_base_to_quote() {
        let converted = table()
            .convert(Amount::from_minor(1000), cur("EUR"), cur("CZK"))
            .unwrap();
        assert_eq!(converted, Amount::from_minor(25_000));
    }

    #[test]
    fn test_cross_rate() {
        // 25 CZK = 1 EUR = 1.08 USD
        let converted = table()
            .convert(Amount::from_minor(2500), cur("CZK"), cur("USD"))
            .unwrap();
        assert_eq!(converted, Amount::from_minor(108));
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        // 1 minor CZK = 0.04 minor EUR -> 0; 13 minor = 0.52 -> 1
        let rates = table();
        assert_eq!(
            rates.convert(Amount::from_minor(1), cur("CZK"), cur("EUR")).unwrap(),
            Amount::zero()
        );
        assert_eq!(
            rates.convert(Amount::from_minor(13), cur("CZK"), cur("EUR")).unwrap(),
            Amount::from_minor(1)
        );
    }

    #[test]
    fn test_unknown_currency_is_unavailable() {
        let err = table()
            .convert(Amount::from_minor(100), cur("CZK"), cur("JPY"))
            .unwrap_err();
        assert!(matches!(err, ConversionError::Unavailable { .. }));
    }

    #[test]
    fn test_zero_rate_is_unavailable() {
        let rates = table().with_rate(cur("GBP"), Decimal::ZERO);
        let err = rates
            .convert(Amount::from_minor(100), cur("GBP"), cur("EUR"))
            .unwrap_err();
        assert!(matches!(err, ConversionError::Unavailable { .. }));
    }

    #[test]
    fn test_base_rate_cannot_be_overridden() {
        let rates = table().with_rate(cur("EUR"), Decimal::new(3, 0));
        assert_eq!(rates.rate(cur("EUR")), Some(Decimal::ONE));
    }
}

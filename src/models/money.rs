//! Money types for representing currency amounts
//!
//! [`Amount`] stores values in minor units (hundredths) as `i64` so that
//! repeated debits and credits never drift the way binary floating point
//! does. [`Money`] pairs an amount with its [`Currency`]; arithmetic between
//! two `Money` values of different currencies is refused.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::conversion::{ConversionError, ConversionService};

/// A monetary quantity in minor units (two decimal places)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Create an amount from minor units
    ///
    /// # Examples
    /// ```
    /// use bank_ledger::models::Amount;
    /// let amount = Amount::from_minor(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create an amount from whole units and minor units
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        Self(major * 100 + minor)
    }

    /// Create a zero amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Get the minor units portion (0-99)
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Parse an amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "10", "10.5". Digits past the
    /// second decimal place are truncated.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let minor = if s.contains('.') {
            let parts: Vec<&str> = s.split('.').collect();
            if parts.len() != 2 || parts[0].is_empty() {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }

            let major = parse_digits(parts[0])
                .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?;

            // Pad or truncate to 2 digits
            let minor_str = parts[1];
            if !minor_str.chars().all(|c| c.is_ascii_digit()) {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }
            let minor: i64 = match minor_str.len() {
                0 => 0,
                1 => {
                    minor_str
                        .parse::<i64>()
                        .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                        * 10
                }
                _ => minor_str[..2]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?,
            };

            major
                .checked_mul(100)
                .and_then(|m| m.checked_add(minor))
                .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
        } else {
            parse_digits(s)
                .and_then(|major| major.checked_mul(100))
                .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
        };

        Ok(Self(if negative { -minor } else { minor }))
    }
}

/// Unsigned decimal digits only; `i64::from_str` would also take a sign
fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.major().abs(), self.minor_part())
        } else {
            write!(f, "{}.{:02}", self.major(), self.minor_part())
        }
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, m| acc + m)
    }
}

/// An ISO-4217 currency code such as `CZK` or `EUR`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    pub const CZK: Currency = Currency(*b"CZK");
    pub const EUR: Currency = Currency(*b"EUR");
    pub const USD: Currency = Currency(*b"USD");
    pub const GBP: Currency = Currency(*b"GBP");

    /// Parse a three-letter code; lower case input is accepted
    pub fn parse(code: &str) -> Result<Self, MoneyParseError> {
        let code = code.trim();
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(MoneyParseError::InvalidCurrency(code.to_string()));
        }
        Ok(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Currency {
    type Error = MoneyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.as_str().to_string()
    }
}

impl std::str::FromStr for Currency {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An amount together with the currency it is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Amount,
    currency: Currency,
}

impl Money {
    pub const fn new(amount: Amount, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub const fn zero(currency: Currency) -> Self {
        Self::new(Amount::zero(), currency)
    }

    pub const fn amount(&self) -> Amount {
        self.amount
    }

    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Add two values of the same currency
    pub fn checked_add(self, other: Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(&other)?;
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(MoneyError::Overflow)
    }

    /// Subtract two values of the same currency
    pub fn checked_sub(self, other: Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(&other)?;
        self.amount
            .checked_sub(other.amount)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(MoneyError::Overflow)
    }

    /// Express this value in `target`.
    ///
    /// Identity when the currencies already match; otherwise the injected
    /// conversion service is consulted and its failure is returned as is.
    pub fn convert_to(
        &self,
        target: Currency,
        converter: &dyn ConversionService,
    ) -> Result<Money, ConversionError> {
        if self.currency == target {
            return Ok(*self);
        }
        let converted = converter.convert(self.amount, self.currency, target)?;
        Ok(Money::new(converted, target))
    }

    /// Order two values of possibly different currencies by their worth in
    /// the base currency
    pub fn compare_normalized(
        &self,
        other: &Money,
        base: Currency,
        converter: &dyn ConversionService,
    ) -> Result<Ordering, ConversionError> {
        if self.currency == other.currency {
            return Ok(self.amount.cmp(&other.amount));
        }
        let left = self.convert_to(base, converter)?;
        let right = other.convert_to(base, converter)?;
        Ok(left.amount.cmp(&right.amount))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), CurrencyMismatch> {
        if self.currency != other.currency {
            return Err(CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Arithmetic was attempted between two currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Currency mismatch: {left} vs {right}")]
pub struct CurrencyMismatch {
    pub left: Currency,
    pub right: Currency,
}

/// Why arithmetic on two [`Money`] values failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error(transparent)]
    CurrencyMismatch(#[from] CurrencyMismatch),

    #[error("Amount out of range")]
    Overflow,
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    InvalidCurrency(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::InvalidCurrency(s) => write!(f, "Invalid currency code: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::FixedRates;
    use rust_decimal::Decimal;

    fn czk() -> Currency {
        Currency::parse("CZK").unwrap()
    }

    fn eur() -> Currency {
        Currency::parse("EUR").unwrap()
    }

    fn rates() -> FixedRates {
        FixedRates::new(eur()).with_rate(czk(), Decimal::new(25, 0))
    }

    #[test]
    fn test_from_minor() {
        let m = Amount::from_minor(1050);
        assert_eq!(m.minor(), 1050);
        assert_eq!(m.major(), 10);
        assert_eq!(m.minor_part(), 50);
        assert_eq!(Amount::from_major_minor(10, 50), m);
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from_minor(1050).to_string(), "10.50");
        assert_eq!(Amount::from_minor(0).to_string(), "0.00");
        assert_eq!(Amount::from_minor(-1050).to_string(), "-10.50");
        assert_eq!(Amount::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::new(Amount::from_minor(100_000), czk()).to_string(), "1000.00 CZK");
    }

    #[test]
    fn test_arithmetic() {
        let a = Amount::from_minor(1000);
        let b = Amount::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((-a).minor(), -1000);
        assert_eq!(Amount::from_minor(i64::MAX).checked_add(a), None);
    }

    #[test]
    fn test_repeated_cents_do_not_drift() {
        let mut total = Amount::zero();
        for _ in 0..1000 {
            total += Amount::from_minor(10);
        }
        assert_eq!(total, Amount::from_minor(10_000));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Amount::parse("10.50").unwrap().minor(), 1050);
        assert_eq!(Amount::parse("-10.50").unwrap().minor(), -1050);
        assert_eq!(Amount::parse("10").unwrap().minor(), 1000);
        assert_eq!(Amount::parse("10.5").unwrap().minor(), 1050);
        assert_eq!(Amount::parse("0.05").unwrap().minor(), 5);
        assert!(Amount::parse("ten").is_err());
        assert!(Amount::parse("1.2.3").is_err());
        assert!(Amount::parse(".5").is_err());
    }

    #[test]
    fn test_parse_rejects_repeated_signs() {
        assert!(Amount::parse("--5").is_err());
        assert!(Amount::parse("--1.5").is_err());
        assert!(Amount::parse("-+5").is_err());
        assert!(Amount::parse("+5").is_err());
        assert!(Amount::parse("1.-5").is_err());
        assert_eq!(Amount::parse("-5").unwrap().minor(), -500);
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!(Currency::parse("czk").unwrap().as_str(), "CZK");
        assert!(Currency::parse("CZ").is_err());
        assert!(Currency::parse("C2K").is_err());
        assert!(Currency::parse("EURO").is_err());
    }

    #[test]
    fn test_currency_serde_validates() {
        let json = serde_json::to_string(&czk()).unwrap();
        assert_eq!(json, "\"CZK\"");
        assert!(serde_json::from_str::<Currency>("\"XXXX\"").is_err());
    }

    #[test]
    fn test_mixed_currency_arithmetic_refused() {
        let a = Money::new(Amount::from_minor(100), czk());
        let b = Money::new(Amount::from_minor(100), eur());
        assert_eq!(
            a.checked_add(b),
            Err(MoneyError::CurrencyMismatch(CurrencyMismatch {
                left: czk(),
                right: eur()
            }))
        );
        assert_eq!(
            a.checked_add(a).unwrap().amount(),
            Amount::from_minor(200)
        );
    }

    #[test]
    fn test_money_overflow_is_an_error() {
        let max = Money::new(Amount::from_minor(i64::MAX), czk());
        let one = Money::new(Amount::from_minor(1), czk());
        assert_eq!(max.checked_add(one), Err(MoneyError::Overflow));

        let min = Money::new(Amount::from_minor(i64::MIN), czk());
        assert_eq!(min.checked_sub(one), Err(MoneyError::Overflow));
        assert_eq!(
            max.checked_sub(one).unwrap().amount(),
            Amount::from_minor(i64::MAX - 1)
        );
    }

    #[test]
    fn test_convert_to_same_currency_is_identity() {
        let m = Money::new(Amount::from_minor(1234), czk());
        // An empty table would fail any real lookup
        let empty = FixedRates::new(eur());
        assert_eq!(m.convert_to(czk(), &empty).unwrap(), m);
    }

    #[test]
    fn test_convert_to_other_currency() {
        let m = Money::new(Amount::from_minor(2500), czk());
        let converted = m.convert_to(eur(), &rates()).unwrap();
        assert_eq!(converted, Money::new(Amount::from_minor(100), eur()));
    }

    #[test]
    fn test_compare_normalized() {
        let hundred_czk = Money::new(Amount::from_minor(10_000), czk());
        let five_eur = Money::new(Amount::from_minor(500), eur());
        // 100 CZK = 4 EUR
        assert_eq!(
            hundred_czk.compare_normalized(&five_eur, eur(), &rates()).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn test_serialization() {
        let m = Money::new(Amount::from_minor(1050), czk());
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"amount":1050,"currency":"CZK"}"#);

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}

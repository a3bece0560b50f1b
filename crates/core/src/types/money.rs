//! Monetary amounts as the commerce backend represents them.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount with currency code.
///
/// The amount is kept as the decimal string the Storefront API returns
/// (preserving precision across serialization); arithmetic goes through
/// [`Decimal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (e.g. "19.99").
    pub amount: String,
    /// ISO 4217 currency code (e.g. "USD").
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency_code: currency_code.into(),
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new("0", currency_code)
    }

    /// Parse the amount as a [`Decimal`].
    ///
    /// Returns `None` when the backend handed us a malformed amount string;
    /// callers treat that line as contributing nothing to totals.
    #[must_use]
    pub fn decimal(&self) -> Option<Decimal> {
        self.amount.parse::<Decimal>().ok()
    }

    /// Multiply the unit amount by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        let total = self
            .decimal()
            .map(|d| d * Decimal::from(quantity))
            .unwrap_or_default();
        Self::new(total.to_string(), self.currency_code.clone())
    }

    /// Sum of `unit price x quantity` over an iterator of lines.
    ///
    /// Returns `None` for an empty iterator (no currency to report).
    /// The currency code is taken from the first line.
    pub fn subtotal<'a, I>(lines: I) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a Self, u32)>,
    {
        let mut iter = lines.into_iter();
        let (first_price, first_qty) = iter.next()?;
        let currency = first_price.currency_code.clone();

        let mut total = first_price
            .decimal()
            .map(|d| d * Decimal::from(first_qty))
            .unwrap_or_default();
        for (price, qty) in iter {
            if let Some(d) = price.decimal() {
                total += d * Decimal::from(qty);
            }
        }

        Some(Self::new(total.to_string(), currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency_code, self.amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_parses() {
        let m = Money::new("19.99", "USD");
        assert_eq!(m.decimal().unwrap(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_decimal_malformed() {
        let m = Money::new("not-a-number", "USD");
        assert!(m.decimal().is_none());
    }

    #[test]
    fn test_times() {
        let m = Money::new("4.50", "USD");
        let line = m.times(3);
        assert_eq!(line.decimal().unwrap(), Decimal::new(1350, 2));
        assert_eq!(line.currency_code, "USD");
    }

    #[test]
    fn test_subtotal() {
        let a = Money::new("10.00", "USD");
        let b = Money::new("2.50", "USD");
        let subtotal = Money::subtotal([(&a, 1), (&b, 4)]).unwrap();
        assert_eq!(subtotal.decimal().unwrap(), Decimal::new(2000, 2));
        assert_eq!(subtotal.currency_code, "USD");
    }

    #[test]
    fn test_subtotal_empty() {
        assert!(Money::subtotal(std::iter::empty::<(&Money, u32)>()).is_none());
    }

    #[test]
    fn test_subtotal_skips_malformed_amounts() {
        let good = Money::new("5.00", "USD");
        let bad = Money::new("??", "USD");
        let subtotal = Money::subtotal([(&good, 2), (&bad, 9)]).unwrap();
        assert_eq!(subtotal.decimal().unwrap(), Decimal::new(1000, 2));
    }

    #[test]
    fn test_serde_field_names() {
        let m = Money::new("1.00", "EUR");
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"amount\":\"1.00\""));
        assert!(json.contains("\"currency_code\":\"EUR\""));
    }
}

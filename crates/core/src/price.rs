//! Money amounts in the smallest currency unit.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::value_object::ValueObject;

const CENTS_PER_UNIT: u64 = 100;

/// A non-negative price stored in the smallest currency unit (e.g. cents).
///
/// Parsed once from the decimal strings found in catalog exports (`"55.50"`)
/// and compared exactly afterwards, so boundary checks never suffer from
/// floating point drift.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Whole currency units (e.g. `55` → 55.00).
    pub fn from_units(units: u64) -> Self {
        Self(units.saturating_mul(CENTS_PER_UNIT))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount in whole units when there is no fractional part.
    pub fn whole_units(&self) -> Option<u64> {
        (self.0 % CENTS_PER_UNIT == 0).then_some(self.0 / CENTS_PER_UNIT)
    }

    /// Shortest decimal rendering: `"55"` for whole amounts, `"55.50"` otherwise.
    pub fn to_compact_string(&self) -> String {
        match self.whole_units() {
            Some(units) => units.to_string(),
            None => self.to_string(),
        }
    }
}

impl ValueObject for Price {}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / CENTS_PER_UNIT, self.0 % CENTS_PER_UNIT)
    }
}

impl FromStr for Price {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CatalogError::invalid_price("empty price"));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(frac) {
            return Err(CatalogError::invalid_price(format!("not a decimal amount: {s:?}")));
        }

        // Trailing zeros beyond the cent position carry no value ("10.000").
        let frac = frac.trim_end_matches('0');
        if frac.len() > 2 {
            return Err(CatalogError::invalid_price(format!(
                "more precision than the smallest currency unit: {s:?}"
            )));
        }

        let units: u64 = whole
            .parse()
            .map_err(|_| CatalogError::invalid_price(format!("amount out of range: {s:?}")))?;
        let cents = match frac.len() {
            0 => 0,
            1 => u64::from(frac.as_bytes()[0] - b'0') * 10,
            _ => frac
                .parse::<u64>()
                .map_err(|_| CatalogError::invalid_price(format!("not a decimal amount: {s:?}")))?,
        };

        units
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|c| c.checked_add(cents))
            .map(Price)
            .ok_or_else(|| CatalogError::invalid_price(format!("amount out of range: {s:?}")))
    }
}

impl TryFrom<String> for Price {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Price> for String {
    fn from(value: Price) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_style_decimal_strings() {
        assert_eq!("10.00".parse::<Price>().unwrap(), Price::from_cents(1000));
        assert_eq!("55.50".parse::<Price>().unwrap(), Price::from_cents(5550));
        assert_eq!("55.5".parse::<Price>().unwrap(), Price::from_cents(5550));
        assert_eq!("100".parse::<Price>().unwrap(), Price::from_units(100));
        assert_eq!(" 7.05 ".parse::<Price>().unwrap(), Price::from_cents(705));
        assert_eq!("10.000".parse::<Price>().unwrap(), Price::from_units(10));
    }

    #[test]
    fn rejects_malformed_prices() {
        for bad in ["", "abc", "-5", "1.234", ".5", "1,00", "1.2.3", "+3"] {
            let err = bad.parse::<Price>().unwrap_err();
            assert!(matches!(err, CatalogError::InvalidPrice(_)), "{bad:?}");
        }
    }

    #[test]
    fn display_always_shows_cents() {
        assert_eq!(Price::from_cents(5550).to_string(), "55.50");
        assert_eq!(Price::from_units(10).to_string(), "10.00");
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn compact_string_drops_zero_cents() {
        assert_eq!(Price::from_units(55).to_compact_string(), "55");
        assert_eq!(Price::from_cents(5550).to_compact_string(), "55.50");
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Price::from_cents(5550)).unwrap();
        assert_eq!(json, "\"55.50\"");

        let back: Price = serde_json::from_str("\"25.00\"").unwrap();
        assert_eq!(back, Price::from_units(25));

        assert!(serde_json::from_str::<Price>("\"oops\"").is_err());
    }

    #[test]
    fn ordering_matches_amounts() {
        assert!(Price::from_units(55) < Price::from_cents(5550));
        assert!(Price::from_cents(5550) < Price::from_units(56));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: Display output parses back to the same amount.
            #[test]
            fn display_parses_back(cents in 0u64..1_000_000_000) {
                let price = Price::from_cents(cents);
                prop_assert_eq!(price.to_string().parse::<Price>().unwrap(), price);
                prop_assert_eq!(price.to_compact_string().parse::<Price>().unwrap(), price);
            }
        }
    }
}

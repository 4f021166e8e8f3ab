//! Exact fixed-point amounts.
//!
//! Prices and totals are held as integer minor units (hundredths), so sums never pick up
//! binary floating point error. On the wire an amount is a JSON number written with exactly
//! two fractional digits (`5150.00`). The literal is emitted as-is through serde_json's
//! `arbitrary_precision` numbers, so it never passes through `f64`. Decimal strings are
//! accepted on input as well.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const SCALE: u64 = 100;

/// Errors produced while parsing or combining amounts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Invalid amount: {0:?}")]
    Invalid(String),
    #[error("Negative amount: {0}")]
    Negative(String),
    #[error("Amount {0} has more than two fractional digits")]
    TooPrecise(String),
    #[error("Amount overflow")]
    Overflow,
}

/// A non-negative decimal amount with two fractional digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Builds an amount from hundredths, e.g. `from_minor_units(515_000)` is `5150.00`.
    pub const fn from_minor_units(units: u64) -> Self {
        Self(units)
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / SCALE, self.0 % SCALE)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Some(rest) = raw.strip_prefix('-') {
            // "-0", "-0.00" are still zero
            if rest.chars().all(|c| c == '0' || c == '.') && !rest.is_empty() {
                return rest.parse();
            }
            return Err(MoneyError::Negative(raw.to_string()));
        }
        let raw = raw.strip_prefix('+').unwrap_or(raw);

        let (whole, fraction) = match raw.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (raw, ""),
        };
        let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
            return Err(MoneyError::Invalid(s.to_string()));
        }

        // Trailing zeros past the second digit carry no value ("1.500" == "1.50")
        let significant = fraction.trim_end_matches('0');
        if significant.len() > 2 {
            return Err(MoneyError::TooPrecise(s.to_string()));
        }
        let mut cents = significant.to_string();
        while cents.len() < 2 {
            cents.push('0');
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| MoneyError::Overflow)?
        };
        let cents: u64 = cents.parse().map_err(|_| MoneyError::Invalid(s.to_string()))?;

        whole
            .checked_mul(SCALE)
            .and_then(|units| units.checked_add(cents))
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let number = serde_json::Number::from_str(&self.to_string()).map_err(S::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal amount as a number or string")
    }

    // Exact JSON numbers arrive as a one-entry map holding their literal text
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Money, A::Error> {
        match map.next_entry::<String, String>()? {
            Some((_, literal)) => self.visit_str(&literal),
            None => Err(de::Error::invalid_length(0, &self)),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        v.checked_mul(SCALE)
            .map(Money)
            .ok_or_else(|| E::custom(MoneyError::Overflow))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        if v < 0 {
            return Err(E::custom(MoneyError::Negative(v.to_string())));
        }
        self.visit_u64(v.unsigned_abs())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom(MoneyError::Invalid(v.to_string())));
        }
        // Display yields the shortest repr that round-trips, e.g. 150.25 -> "150.25"
        self.visit_str(&v.to_string())
    }
}

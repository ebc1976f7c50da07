use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

const MINOR_PER_MAJOR: i64 = 100;

/// A signed currency amount held in minor units (cents).
///
/// Serialized as the bare integer count of minor units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn from_major(major: i64) -> Self {
        Self(major * MINOR_PER_MAJOR)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Parses amounts such as `40000`, `-1,250.5` or `$99.99`.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let invalid = || AppError::invalid_input(format!("'{}' is not a valid amount", raw.trim()));

        let mut text = raw.trim();
        let negative = match text.strip_prefix('-') {
            Some(rest) => {
                text = rest;
                true
            }
            None => {
                text = text.strip_prefix('+').unwrap_or(text);
                false
            }
        };
        let text = text.trim_start();
        let text = text.strip_prefix('$').unwrap_or(text).replace(',', "");

        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (text.as_str(), ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(AppError::invalid_input(format!(
                "'{}' has more than two decimal places",
                raw.trim()
            )));
        }
        if !whole.chars().chain(fraction.chars()).all(|ch| ch.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole_minor = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i64>()
                .ok()
                .and_then(|value| value.checked_mul(MINOR_PER_MAJOR))
                .ok_or_else(invalid)?
        };
        let fraction_minor = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse::<i64>().map_err(|_| invalid())?,
        };
        let minor = whole_minor.checked_add(fraction_minor).ok_or_else(invalid)?;

        Ok(Self(if negative { -minor } else { minor }))
    }
}

impl FromStr for Money {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |total, amount| total + amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let whole = (magnitude / MINOR_PER_MAJOR as u64).to_string();
        let cents = magnitude % MINOR_PER_MAJOR as u64;

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (index, ch) in whole.chars().enumerate() {
            if index > 0 && (whole.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{grouped}.{cents:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::Money;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(Money::parse("40000").unwrap(), Money::from_major(40_000));
        assert_eq!(Money::parse("1,250.5").unwrap(), Money::from_minor(125_050));
        assert_eq!(Money::parse("$99.99").unwrap(), Money::from_minor(9_999));
        assert_eq!(Money::parse("-60000").unwrap(), Money::from_major(-60_000));
        assert_eq!(Money::parse(".75").unwrap(), Money::from_minor(75));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for raw in ["", "-", "12.345", "12a", "1.2.3", "$"] {
            let err = Money::parse(raw).unwrap_err();
            assert_eq!(err.code(), "invalid_input", "input {raw:?}");
        }
    }

    #[test]
    fn rejects_overflowing_amounts() {
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Money::from_minor(123_456_789).to_string(), "1,234,567.89");
        assert_eq!(Money::from_major(-40_000).to_string(), "-40,000.00");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
    }

    #[test]
    fn sum_of_absolute_values() {
        let total: Money = [Money::from_major(-40), Money::from_major(25)]
            .into_iter()
            .map(Money::abs)
            .sum();
        assert_eq!(total, Money::from_major(65));
    }
}

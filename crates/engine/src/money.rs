use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::DbErr;

use crate::EngineError;

/// Most fractional digits an amount may carry.
const MAX_SCALE: usize = 28;

/// Signed money amount kept as an exact decimal.
///
/// Every amount the bot stores or sums goes through this type, so totals never
/// accumulate floating-point drift and no entered digit is lost.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount: Money = "12.345".parse().unwrap();
/// assert_eq!(amount.to_string(), "12.345");
/// assert_eq!(amount.rounded(), "12.35");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator and a
/// missing integer part):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10,5".parse::<Money>().unwrap().to_string(), "10.50");
/// assert_eq!(".5".parse::<Money>().unwrap().to_string(), "0.50");
/// assert!("1.2.3".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Parses an amount entered by a user: it must be strictly greater than 0.
    pub fn parse_positive(s: &str) -> Result<Self, EngineError> {
        let amount: Money = s.parse()?;
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(amount)
    }

    /// Rounded to two decimals, half away from zero, for reports.
    #[must_use]
    pub fn rounded(self) -> String {
        let value = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{value:.2}")
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    #[must_use]
    pub fn saturating_sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }

    /// Text written to the database; keeps every entered digit.
    pub(crate) fn to_stored(self) -> String {
        self.0.to_string()
    }

    /// Reads a stored amount back. Anything unparseable is a storage fault.
    pub(crate) fn from_stored(value: &str) -> Result<Self, EngineError> {
        Decimal::from_str(value)
            .map(Money)
            .map_err(|err| DbErr::Type(format!("stored amount {value:?}: {err}")).into())
    }
}

impl fmt::Display for Money {
    /// At least two decimals; extra entered decimals are shown as is.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0.normalize();
        if value.scale() < 2 {
            write!(f, "{value:.2}")
        } else {
            write!(f, "{value}")
        }
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a plain decimal string.
    ///
    /// Accepts `.` or `,` as decimal separator, an optional leading `+`/`-` and
    /// an empty integer or fraction part (`.5`, `10.`), but not both. Input
    /// that cannot be held exactly is rejected rather than rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            ("-", stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            ("", stripped)
        } else {
            ("", trimmed)
        };

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units = parts.next().ok_or_else(invalid)?;
        let frac = parts.next().unwrap_or("");
        if parts.next().is_some() {
            return Err(invalid());
        }

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (units.is_empty() && frac.is_empty()) || !all_digits(units) || !all_digits(frac) {
            return Err(invalid());
        }
        if frac.len() > MAX_SCALE {
            return Err(EngineError::InvalidAmount("too many decimals".to_string()));
        }

        let units = if units.is_empty() { "0" } else { units };
        let canonical = if frac.is_empty() {
            format!("{sign}{units}")
        } else {
            format!("{sign}{units}.{frac}")
        };
        let value = Decimal::from_str(&canonical)
            .map_err(|_| EngineError::InvalidAmount("amount too large".to_string()))?;

        // The decimal rounds silently when the digits do not fit.
        if value.scale() as usize != frac.len() {
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        }

        Ok(Money(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn display_has_at_least_two_decimals() {
        assert_eq!(Money::ZERO.to_string(), "0.00");
        assert_eq!(money("0.01").to_string(), "0.01");
        assert_eq!(money("0.1").to_string(), "0.10");
        assert_eq!(money("150").to_string(), "150.00");
        assert_eq!(money("-10.5").to_string(), "-10.50");
        assert_eq!(money("12.345").to_string(), "12.345");
        assert_eq!(money("12.3400").to_string(), "12.34");
    }

    #[test]
    fn rounded_uses_two_decimals() {
        assert_eq!(Money::ZERO.rounded(), "0.00");
        assert_eq!(money("150").rounded(), "150.00");
        assert_eq!(money("12.345").rounded(), "12.35");
        assert_eq!(money("0.125").rounded(), "0.13");
        assert_eq!(money("-0.125").rounded(), "-0.13");
        assert_eq!(money("7.5").rounded(), "7.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(money("10").value(), Decimal::new(10, 0));
        assert_eq!(money("10.5").value(), Decimal::new(105, 1));
        assert_eq!(money("10,50").value(), Decimal::new(1050, 2));
        assert_eq!(money("10.").value(), Decimal::new(10, 0));
        assert_eq!(money(".5").value(), Decimal::new(5, 1));
        assert_eq!(money("-0.01").value(), Decimal::new(-1, 2));
        assert_eq!(money("+1.00").value(), Decimal::new(100, 2));
        assert_eq!(money("  2.30 ").value(), Decimal::new(230, 2));
    }

    #[test]
    fn parse_keeps_every_decimal() {
        assert_eq!(money("12.345").value(), Decimal::new(12_345, 3));
        assert_eq!(money("0.125").value(), Decimal::new(125, 3));
        assert_eq!(
            money("0.0000000000000000000000000001").value(),
            Decimal::new(1, 28)
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("1e3".parse::<Money>().is_err());
        assert!("1_000".parse::<Money>().is_err());
        assert!("0.00000000000000000000000000001".parse::<Money>().is_err());
        assert!("99999999999999999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn parse_positive_rejects_zero_and_negative() {
        assert_eq!(Money::parse_positive(".01").unwrap(), money("0.01"));
        assert!(Money::parse_positive("0").is_err());
        assert!(Money::parse_positive("0.00").is_err());
        assert!(Money::parse_positive("-5").is_err());
    }

    #[test]
    fn stored_text_round_trips_exactly() {
        let amount = money("12.345");
        assert_eq!(Money::from_stored(&amount.to_stored()).unwrap(), amount);
        assert!(matches!(
            Money::from_stored("abc"),
            Err(EngineError::Database(DbErr::Type(_)))
        ));
    }

    #[test]
    fn arithmetic() {
        let total = money("100").checked_add(money("50.125")).unwrap();
        assert_eq!(total.saturating_sub(money("30")), money("120.125"));
        assert!(Money::new(Decimal::MAX).checked_add(money("1")).is_none());
    }
}

//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) so that applying and reversing a
//! balance effect is exact. The ledger store keeps dollars as `REAL`; the
//! conversion happens once at the storage boundary via [`Money::from_f64`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use cashflow::models::Money;
    /// let amount = Money::from_cents(1050); // $10.50
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole dollars
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// Convert a floating-point dollar amount, rounding to the nearest cent
    ///
    /// # Examples
    /// ```
    /// use cashflow::models::Money;
    /// assert_eq!(Money::from_f64(19.999).cents(), 2000);
    /// assert_eq!(Money::from_f64(-12.5).cents(), -1250);
    /// ```
    pub fn from_f64(dollars: f64) -> Self {
        Self((dollars * 100.0).round() as i64)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the amount as floating-point dollars (for the `REAL` columns)
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Get the whole dollars portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Multiply by `numerator / denominator`, rounding half away from zero
    ///
    /// # Examples
    /// ```
    /// use cashflow::models::Money;
    /// let hundred = Money::from_dollars(100);
    /// assert_eq!(hundred.scale(433, 100).cents(), 43_300);
    /// assert_eq!(hundred.scale(1, 3).cents(), 3_333);
    /// ```
    pub fn scale(&self, numerator: i64, denominator: i64) -> Self {
        debug_assert!(denominator != 0, "scale denominator must be non-zero");
        let n = self.0 as i128 * numerator as i128;
        let d = denominator as i128;
        let quotient = n / d;
        let remainder = n % d;
        let rounded = if 2 * remainder.abs() >= d.abs() {
            quotient + n.signum() * d.signum()
        } else {
            quotient
        };
        Self(rounded as i64)
    }

    /// Express this amount as a percentage of `base`
    ///
    /// Returns 0 when `base` is not positive; a zero expectation has no
    /// meaningful relative difference.
    pub fn percent_of(&self, base: Money) -> f64 {
        if base.is_positive() {
            self.0 as f64 / base.0 as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10", "1,250.00", ".75".
    /// At most two decimal places; anything else is rejected rather than
    /// rounded.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(s.trim().to_string());
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        let (whole, frac) = match cleaned.split_once('.') {
            Some((whole, frac)) => (whole, Some(frac)),
            None => (cleaned.as_str(), None),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || (whole.is_empty() && frac.is_none()) {
            return Err(invalid());
        }

        let dollars: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let cents: i64 = match frac {
            None => 0,
            Some(frac) if (1..=2).contains(&frac.len()) && all_digits(frac) => {
                let value: i64 = frac.parse().map_err(|_| invalid())?;
                if frac.len() == 1 {
                    value * 10
                } else {
                    value
                }
            }
            Some(_) => return Err(invalid()),
        };

        let total = dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -total } else { total }))
    }

    /// Format with a currency symbol and thousands separators
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            group_thousands(self.dollars().unsigned_abs()),
            self.cents_part()
        )
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-$10.50");
        assert_eq!(Money::from_cents(123_456_78).to_string(), "$123,456.78");
        assert_eq!(format!("{:>8}", Money::from_cents(5)), "   $0.05");
    }

    #[test]
    fn test_f64_boundary() {
        assert_eq!(Money::from_f64(1400.0).cents(), 140_000);
        assert_eq!(Money::from_f64(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_cents(-2550).as_f64(), -25.5);
    }

    #[test]
    fn test_scale_rounding() {
        let hundred = Money::from_dollars(100);
        assert_eq!(hundred.scale(2, 1).cents(), 20_000);
        assert_eq!(hundred.scale(217, 100).cents(), 21_700);
        assert_eq!(hundred.scale(1, 12).cents(), 833);
        assert_eq!(Money::from_cents(5).scale(1, 2).cents(), 3);
        assert_eq!(Money::from_cents(-5).scale(1, 2).cents(), -3);
    }

    #[test]
    fn test_percent_of() {
        let diff = Money::from_dollars(-100);
        let pct = diff.percent_of(Money::from_dollars(1500));
        assert!((pct - (-6.666_666)).abs() < 1e-4);
        assert_eq!(diff.percent_of(Money::zero()), 0.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse(".75").unwrap().cents(), 75);
        assert_eq!(Money::parse("1,250.00").unwrap().cents(), 125_000);
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("abc").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_amounts() {
        for input in ["10.999", "12.34abc", "1.-5", "1.5é", "é", "10.", "--5", "+5", "$", "", "1 000"] {
            assert!(
                matches!(Money::parse(input), Err(MoneyParseError::InvalidFormat(_))),
                "{:?} should be rejected",
                input
            );
        }
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 600);
    }
}

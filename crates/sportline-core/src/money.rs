//! # Money Module
//!
//! Integer-cent monetary values for order and sale pricing.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ORDER PRICING WITH FLOATS                                              │
//! │                                                                         │
//! │    subtotal * 0.13  →  2.6000000000000001                               │
//! │    10.00 + 20.00 + 2.60 = 32.599999999999994  ❌                        │
//! │                                                                         │
//! │  ORDER PRICING WITH CENTS                                               │
//! │    2000 * 1300 bps / 10000 = 260                                        │
//! │    1000 + 2000 + 260 = 3260  →  "32.60"  ✓                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stores operate in several countries, so `Money` carries no currency
//! symbol. Formatting always yields a plain two-decimal string.
//!
//! ## Usage
//! ```rust
//! use sportline_core::money::Money;
//!
//! let price = Money::from_cents(1000);
//! let line = price.checked_multiply_quantity(2).unwrap();
//! assert_eq!(line.to_string(), "20.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the smallest currency unit.
///
/// ## Where Money Flows
/// ```text
/// LineInput.unit_price ──► line total ──► subtotal ──► tax (13%)
///                                            │            │
///                                            ▼            ▼
///                         shipping ────────► total = subtotal + shipping + tax
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount such as `"10"`, `"10.5"` or `"19.99"`.
    ///
    /// At most two fractional digits are accepted. Anything finer than a cent
    /// is rejected instead of silently rounded.
    ///
    /// ## Example
    /// ```rust
    /// use sportline_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("unit_price", "10.5").unwrap().cents(), 1050);
    /// assert!(Money::parse_decimal("unit_price", "1.999").is_err());
    /// ```
    pub fn parse_decimal(field: &str, raw: &str) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        let raw = raw.trim();
        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected a decimal amount"));
        }
        if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("at most two decimal places are allowed"));
        }

        let whole: i64 = whole.parse().map_err(|_| invalid("amount is too large"))?;
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("bad fraction"))?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounding half up to the cent.
    ///
    /// `(amount * bps + 5000) / 10000`, computed in i128 so large order
    /// subtotals cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use sportline_core::money::Money;
    /// use sportline_core::types::TaxRate;
    ///
    /// let tax = Money::from_cents(2000).calculate_tax(TaxRate::from_bps(1300));
    /// assert_eq!(tax.cents(), 260);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies a unit price by a line quantity, `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two-decimal rendering, e.g. `32.60` or `-5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

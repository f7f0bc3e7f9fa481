//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  A frame order sums up to six material costs, scales them by the       │
//! │  order quantity and adds VAT. Summing floats drifts; summing öre       │
//! │  does not.                                                              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (öre for SEK)                       │
//! │    Measured consumption (metres, m²) stays f64. The moment it is       │
//! │    multiplied by a price, the result is rounded ONCE to whole öre.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use framing_core::money::Money;
//!
//! // 250.00 per metre
//! let price = Money::from_minor(25_000);
//!
//! // 1.8 m of moulding
//! let cost = price.scale(1.8);
//! assert_eq!(cost.minor(), 45_000);
//! assert_eq!(cost.to_string(), "450.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (öre for SEK).
///
/// Serialized as the integer number of minor units. The currency itself is
/// not part of the value: it is passed alongside as a call-time parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (öre).
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units (kronor and öre).
    ///
    /// ## Example
    /// ```rust
    /// use framing_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(250, 0).minor(), 25_000);
    /// assert_eq!(Money::from_major_minor(-5, 50).minor(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Creates a Money value from a decimal amount such as a catalog
    /// `sales_price` of `249.5`.
    ///
    /// Rounds half away from zero to the nearest öre. Non-finite input
    /// yields zero.
    ///
    /// ## Example
    /// ```rust
    /// use framing_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(249.5).minor(), 24_950);
    /// assert_eq!(Money::from_decimal(0.125).minor(), 13);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Money::from_raw_minor(amount * 100.0)
    }

    /// Rounds an unrounded minor-unit amount to whole öre.
    ///
    /// Non-finite input yields zero.
    pub fn from_raw_minor(raw: f64) -> Self {
        if raw.is_finite() {
            Money(raw.round() as i64)
        } else {
            Money(0)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (kronor) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a measured quantity and returns the
    /// unrounded result in minor units.
    ///
    /// Used where a historical calculation must keep full precision until
    /// the very end.
    #[inline]
    pub fn raw_scaled(&self, factor: f64) -> f64 {
        self.0 as f64 * factor
    }

    /// Multiplies a unit price by a measured quantity (metres, m², hours)
    /// and rounds the result half away from zero to whole öre.
    ///
    /// ## Example
    /// ```rust
    /// use framing_core::money::Money;
    ///
    /// let per_sqm = Money::from_major_minor(200, 0);
    /// assert_eq!(per_sqm.scale(0.2).minor(), 4_000);
    /// ```
    pub fn scale(&self, factor: f64) -> Money {
        Money::from_raw_minor(self.raw_scaled(factor))
    }

    /// Calculates VAT on this amount.
    ///
    /// Integer math on basis points, rounding half away from zero:
    /// `(amount * bps ± 5000) / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use framing_core::money::Money;
    /// use framing_core::types::TaxRate;
    ///
    /// let net = Money::from_major_minor(450, 0);
    /// let vat = net.calculate_tax(TaxRate::from_bps(2500));
    /// assert_eq!(vat.minor(), 11_250);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large order totals from overflowing
        let product = self.0 as i128 * rate.bps() as i128;
        let rounded = if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        };
        Money::from_minor(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates at the i64 bounds; pricing never panics.

/// Two-decimal display without currency, e.g. `562.50`.
///
/// The currency code travels separately; see `PricingParams::currency`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Multiplication by an order quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0.saturating_mul(i64::from(qty)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

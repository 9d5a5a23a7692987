//! # Money Module
//!
//! Integer-cents money and basis-point rates.
//!
//! Monetary values never touch floating point: prices, totals and aggregates
//! are `i64` cents end to end, and percentage rates are `u32` basis points
//! (825 = 8.25%). The only place precision is dropped is
//! [`Money::apply_rate`], which rounds to whole cents with round-half-even.
//!
//! ## Usage
//! ```rust
//! use shopfront_core::money::{Money, Rate};
//!
//! let subtotal = Money::from_cents(2500);      // $25.00
//! let tax = subtotal.apply_rate(Rate::from_bps(825)); // 8.25%
//! assert_eq!(tax.cents(), 206);                // 206.25 rounds half-even to 206
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so refunds and corrections can be represented, although every
/// value this system persists is non-negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
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

    /// Multiplies by a quantity (line total = unit price × qty).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a rate and rounds the result to whole cents.
    ///
    /// ## Rounding policy
    /// Round-half-even (banker's rounding): an exact half-cent goes to the
    /// nearest even cent, so repeated application carries no systematic
    /// bias. This is the single rounding point for the whole system; tax
    /// and discount amounts are both produced here.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::{Money, Rate};
    ///
    /// // $25.00 × 8.25% = $2.0625 → $2.06 (exact quarter-cent, rounds down)
    /// let tax = Money::from_cents(2500).apply_rate(Rate::from_bps(825));
    /// assert_eq!(tax.cents(), 206);
    ///
    /// // $0.05 × 50% = 2.5¢ → 2¢ (half, rounds to even)
    /// assert_eq!(Money::from_cents(5).apply_rate(Rate::from_bps(5000)).cents(), 2);
    /// // $0.15 × 50% = 7.5¢ → 8¢
    /// assert_eq!(Money::from_cents(15).apply_rate(Rate::from_bps(5000)).cents(), 8);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        // i128 intermediate prevents overflow on large amounts
        let cents = div_round_half_even(self.0 as i128 * rate.bps() as i128, 10_000);
        Money::from_cents(cents as i64)
    }
}

/// Integer division rounding half to even.
///
/// `d` must be positive; `n` may be negative (quotient rounds toward the
/// nearest value, halves toward even).
fn div_round_half_even(n: i128, d: i128) -> i128 {
    debug_assert!(d > 0);
    let q = n / d;
    let r = n % d;
    let twice = r.abs() * 2;
    if twice > d || (twice == d && q % 2 != 0) {
        q + n.signum()
    } else {
        q
    }
}

/// Debug-friendly display (`$10.99`). UI formatting/localization is the
/// client's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Rate
// =============================================================================

/// A percentage rate in basis points (1 bps = 0.01%).
///
/// Used for both tax and discount rates; 825 = 8.25%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cents_roundtrip() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!(a.multiply_quantity(2).cents(), 2000);
    }

    #[test]
    fn apply_rate_basic() {
        // $10.00 at 10% = $1.00
        let tax = Money::from_cents(1000).apply_rate(Rate::from_bps(1000));
        assert_eq!(tax.cents(), 100);
    }

    #[test]
    fn apply_rate_rounds_half_even() {
        // 2.5¢ → 2¢ (toward even)
        assert_eq!(Money::from_cents(5).apply_rate(Rate::from_bps(5000)).cents(), 2);
        // 7.5¢ → 8¢ (toward even)
        assert_eq!(Money::from_cents(15).apply_rate(Rate::from_bps(5000)).cents(), 8);
        // 206.25¢ → 206¢ (below half)
        assert_eq!(Money::from_cents(2500).apply_rate(Rate::from_bps(825)).cents(), 206);
        // 82.5¢ → 82¢ (half, toward even)
        assert_eq!(Money::from_cents(1000).apply_rate(Rate::from_bps(825)).cents(), 82);
    }

    #[test]
    fn apply_rate_negative_amount() {
        // Refund math stays symmetric
        assert_eq!(Money::from_cents(-1000).apply_rate(Rate::from_bps(1000)).cents(), -100);
        assert_eq!(Money::from_cents(-5).apply_rate(Rate::from_bps(5000)).cents(), -2);
    }

    #[test]
    fn rate_accessors() {
        let rate = Rate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
        assert!(Rate::zero().is_zero());
    }

    #[test]
    fn div_half_even_cases() {
        assert_eq!(div_round_half_even(25, 10), 2);
        assert_eq!(div_round_half_even(35, 10), 4);
        assert_eq!(div_round_half_even(26, 10), 3);
        assert_eq!(div_round_half_even(-25, 10), -2);
        assert_eq!(div_round_half_even(-35, 10), -4);
    }
}

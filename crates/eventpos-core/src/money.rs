//! # Money Module
//!
//! Provides the `Yen` type for handling monetary values safely.
//!
//! ## Why Integer Yen?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    1000 * 1.1 = 1100.0000000000002                                      │
//! │    floor() happens to survive that one, but not every amount does.      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer yen, integer tax                                 │
//! │    1500 * 11000 / 10000 = 1650   (exact, then floored)                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Yen has no minor unit, so the smallest unit *is* the display unit.
//!
//! ## Usage
//! ```rust
//! use eventpos_core::money::Yen;
//!
//! let price = Yen::new(1000);
//! let total = price + Yen::new(500);
//! assert_eq!(total.amount(), 1500);
//! assert_eq!(total.with_consumption_tax().amount(), 1650);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use crate::types::TaxRate;
use crate::CONSUMPTION_TAX;

/// A monetary value in whole yen.
///
/// ## Design Decisions
/// - **i64 (signed)**: the API never sends negative prices, but subtraction
///   stays total instead of panicking
/// - **Saturating operators**: prices come from the server, so `+` and `-`
///   clamp at the i64 bounds. Use [`Yen::checked_add`] where an overflow
///   must be reported instead
/// - **Transparent serde**: serializes as a bare integer, which is what
///   `PRICE` and `total_amount` are on the wire
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Yen(i64);

impl Yen {
    /// Creates a value from whole yen.
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Yen(amount)
    }

    /// Returns the value in whole yen.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Returns zero yen.
    #[inline]
    pub const fn zero() -> Self {
        Yen(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Yen) -> Option<Yen> {
        self.0.checked_add(other.0).map(Yen)
    }

    /// Returns the amount including tax at `rate`, or `None` if the result
    /// does not fit in i64.
    pub fn checked_with_tax(&self, rate: TaxRate) -> Option<Yen> {
        let scaled = self.0 as i128 * (10_000 + rate.bps() as i128);
        i64::try_from(scaled.div_euclid(10_000)).ok().map(Yen)
    }

    /// Returns the amount including tax at `rate`, rounded toward negative
    /// infinity.
    ///
    /// ## Implementation
    /// `floor(amount * (10000 + bps) / 10000)` in i128, so the multiplication
    /// itself can't overflow and no float ever appears. A result beyond the
    /// i64 range saturates; [`Yen::checked_with_tax`] reports it instead.
    ///
    /// ## Example
    /// ```rust
    /// use eventpos_core::money::Yen;
    /// use eventpos_core::types::TaxRate;
    ///
    /// let subtotal = Yen::new(1999);
    /// // 1999 × 1.1 = 2198.9 → 2198
    /// assert_eq!(subtotal.with_tax(TaxRate::from_bps(1000)).amount(), 2198);
    /// ```
    pub fn with_tax(&self, rate: TaxRate) -> Yen {
        self.checked_with_tax(rate).unwrap_or(if self.0 < 0 {
            Yen(i64::MIN)
        } else {
            Yen(i64::MAX)
        })
    }

    /// Returns the amount including the 10% consumption tax.
    ///
    /// ## User Workflow
    /// ```text
    /// Purchase list: ¥1,000 + ¥500
    ///      │
    ///      ▼
    /// total = ¥1,500
    ///      │
    ///      ▼
    /// with_consumption_tax() ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Confirm dialog: 合計金額：1,650円 (税込)
    /// ```
    #[inline]
    pub fn with_consumption_tax(&self) -> Yen {
        self.with_tax(CONSUMPTION_TAX)
    }

    /// Formats the amount with thousands separators and no symbol: `1,500`.
    pub fn grouped(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if self.0 < 0 {
            out.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }

    /// Formats the consumption-tax-inclusive amount the way the confirm and
    /// receipt dialogs show it: `1,650円 (税込)`.
    pub fn tax_inclusive_label(&self) -> String {
        format!("{}円 (税込)", self.with_consumption_tax().grouped())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount the way the purchase list does: `¥1,500`.
impl fmt::Display for Yen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-¥{}", Yen(-self.0).grouped())
        } else {
            write!(f, "¥{}", self.grouped())
        }
    }
}

impl Add for Yen {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Yen(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Yen {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Yen {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Yen(self.0.saturating_sub(other.0))
    }
}

impl Sum for Yen {
    fn sum<I: Iterator<Item = Yen>>(iter: I) -> Self {
        iter.fold(Yen::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Yen> for Yen {
    fn sum<I: Iterator<Item = &'a Yen>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Yen::new(1500).to_string(), "¥1,500");
        assert_eq!(Yen::new(800).to_string(), "¥800");
        assert_eq!(Yen::new(0).to_string(), "¥0");
        assert_eq!(Yen::new(1_234_567).to_string(), "¥1,234,567");
        assert_eq!(Yen::new(-2500).to_string(), "-¥2,500");
    }

    #[test]
    fn test_grouped() {
        assert_eq!(Yen::new(999).grouped(), "999");
        assert_eq!(Yen::new(1000).grouped(), "1,000");
        assert_eq!(Yen::new(100_000).grouped(), "100,000");
        assert_eq!(Yen::new(-1000).grouped(), "-1,000");
    }

    #[test]
    fn test_consumption_tax_is_floored() {
        assert_eq!(Yen::new(1500).with_consumption_tax(), Yen::new(1650));
        assert_eq!(Yen::new(1999).with_consumption_tax(), Yen::new(2198));
        assert_eq!(Yen::new(1).with_consumption_tax(), Yen::new(1));
        assert_eq!(Yen::new(0).with_consumption_tax(), Yen::zero());
    }

    #[test]
    fn test_tax_inclusive_label() {
        assert_eq!(Yen::new(1500).tax_inclusive_label(), "1,650円 (税込)");
        assert_eq!(Yen::new(2000).tax_inclusive_label(), "2,200円 (税込)");
    }

    #[test]
    fn test_zero_rate_is_identity() {
        assert_eq!(Yen::new(1234).with_tax(TaxRate::zero()), Yen::new(1234));
    }

    #[test]
    fn test_sum() {
        let prices = [Yen::new(1000), Yen::new(500), Yen::new(1200)];
        let total: Yen = prices.iter().sum();
        assert_eq!(total, Yen::new(2700));

        let empty: Vec<Yen> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Yen>(), Yen::zero());
    }

    #[test]
    fn test_addition_saturates() {
        let half = Yen::new(i64::MAX / 2 + 1);
        assert_eq!(half + half, Yen::new(i64::MAX));
        assert_eq!(half.checked_add(half), None);
        assert_eq!(Yen::new(1000).checked_add(Yen::new(500)), Some(Yen::new(1500)));

        let total: Yen = [half, half, half].iter().sum();
        assert_eq!(total, Yen::new(i64::MAX));
        assert_eq!(Yen::new(i64::MIN) - Yen::new(1), Yen::new(i64::MIN));
    }

    #[test]
    fn test_tax_out_of_range() {
        let huge = Yen::new(i64::MAX / 10 * 10);
        assert_eq!(huge.checked_with_tax(CONSUMPTION_TAX), None);
        assert_eq!(huge.with_consumption_tax(), Yen::new(i64::MAX));
        assert_eq!(
            Yen::new(-(i64::MAX / 10 * 10)).with_consumption_tax(),
            Yen::new(i64::MIN)
        );

        let largest = Yen::new(i64::MAX / 11 * 10);
        assert!(largest.checked_with_tax(CONSUMPTION_TAX).is_some());
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Yen::new(1000)).unwrap();
        assert_eq!(json, "1000");
        let back: Yen = serde_json::from_str("500").unwrap();
        assert_eq!(back, Yen::new(500));
    }
}

//! # Receipt Totals
//!
//! Server-side computation of receipt amounts.
//!
//! Client-submitted totals are never trusted; the API layer passes raw line
//! items here and persists exactly what this module returns.
//!
//! ## Computation order
//! ```text
//! subtotal = Σ (unit_price × quantity)
//! discount = round(subtotal × discount_rate)
//! taxable  = subtotal − discount
//! tax      = round(taxable × tax_rate)
//! total    = taxable + tax
//! ```
//! Rounding is round-half-even to cents ([`Money::apply_rate`]).

use crate::error::ValidationError;
use crate::money::{Money, Rate};

/// One line of input to the totals computation: a (unit price, quantity)
/// pair. The persistence layer carries richer snapshot rows; this is only
/// what the math needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmount {
    pub unit_price: Money,
    pub quantity: i64,
}

impl LineAmount {
    pub fn new(unit_price: Money, quantity: i64) -> Self {
        LineAmount { unit_price, quantity }
    }

    /// unit_price × quantity.
    #[inline]
    pub fn total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The computed amounts for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

impl ReceiptTotals {
    /// Computes totals for a receipt.
    ///
    /// ## Preconditions
    /// - `items` non-empty
    /// - every quantity ≥ 1
    /// - every unit price ≥ 0
    ///
    /// Violations are validation errors; nothing is persisted for them.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::{Money, Rate};
    /// use shopfront_core::receipt::{LineAmount, ReceiptTotals};
    ///
    /// let items = [
    ///     LineAmount::new(Money::from_cents(1000), 2), // 2 × $10.00
    ///     LineAmount::new(Money::from_cents(500), 1),  // 1 × $5.00
    /// ];
    /// let totals =
    ///     ReceiptTotals::compute(&items, Rate::zero(), Rate::from_bps(825)).unwrap();
    /// assert_eq!(totals.subtotal.cents(), 2500);
    /// assert_eq!(totals.tax.cents(), 206); // 206.25 → 206 (half-even to cents)
    /// assert_eq!(totals.total.cents(), 2706);
    /// ```
    pub fn compute(
        items: &[LineAmount],
        discount_rate: Rate,
        tax_rate: Rate,
    ) -> Result<Self, ValidationError> {
        if items.is_empty() {
            return Err(ValidationError::Required { field: "items" });
        }

        let mut subtotal = Money::zero();
        for item in items {
            if item.quantity < 1 {
                return Err(ValidationError::NotPositive { field: "quantity" });
            }
            if item.unit_price.is_negative() {
                return Err(ValidationError::Negative { field: "unit_price" });
            }
            subtotal += item.total();
        }

        let discount = subtotal.apply_rate(discount_rate);
        let taxable = subtotal - discount;
        let tax = taxable.apply_rate(tax_rate);

        Ok(ReceiptTotals {
            subtotal,
            discount,
            tax,
            total: taxable + tax,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

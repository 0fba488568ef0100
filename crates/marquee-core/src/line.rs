//! # Line Calculator
//!
//! Prices one line item in isolation: gross amount, discount, tax, and what
//! the customer pays, branching on the line's [`TaxMode`].
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lineTotal      = unitPrice × quantity                                  │
//! │  discountAmount = lineTotal × discount% / 100      (0 when discount ≤ 0)│
//! │  basePrice      = lineTotal − discountAmount                            │
//! │                                                                         │
//! │  INCLUSIVE (tax already inside the price)                               │
//! │    taxAmount  = basePrice × rate / (100 + rate)    extracted, display   │
//! │    finalTotal = basePrice                                               │
//! │                                                                         │
//! │  EXCLUSIVE (tax added on top)                                           │
//! │    taxAmount  = basePrice × rate / 100                                  │
//! │    finalTotal = basePrice + taxAmount                                   │
//! │                                                                         │
//! │  rate ≤ 0 → taxAmount = 0 under both modes                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The discount is always taken off the gross amount first, so an INCLUSIVE
//! line extracts its tax from the discounted, still tax-bearing price.

use rust_decimal::Decimal;

use crate::rounding::{to_decimal, to_f64};
use crate::types::{LineItem, LineResult, TaxMode};

/// Unrounded pricing of one line, as consumed by the order aggregator.
///
/// Order sums are taken over these values so that rounding happens once,
/// at output, instead of once per line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBreakdown {
    pub tax_mode: TaxMode,
    pub line_total: Decimal,
    pub discount_amount: Decimal,
    pub base_price: Decimal,
    pub tax_amount: Decimal,
    pub final_total: Decimal,
}

impl LineBreakdown {
    /// Computes the unrounded breakdown of `item`.
    ///
    /// Arithmetic saturates at the `Decimal` range, so any input yields
    /// finite amounts.
    pub fn of(item: &LineItem) -> Self {
        let unit_price = to_decimal(item.unit_price);
        let tax_rate = to_decimal(item.tax_rate);
        let discount_percentage = to_decimal(item.discount_percentage);

        let line_total = unit_price.saturating_mul(Decimal::from(item.quantity));

        let discount_amount = if discount_percentage > Decimal::ZERO {
            line_total.saturating_mul(discount_percentage / Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };

        let base_price = line_total.saturating_sub(discount_amount);

        let (tax_amount, final_total) = match item.tax_mode {
            TaxMode::Inclusive => {
                let tax = if tax_rate > Decimal::ZERO {
                    let share = tax_rate / Decimal::ONE_HUNDRED.saturating_add(tax_rate);
                    base_price.saturating_mul(share)
                } else {
                    Decimal::ZERO
                };
                // Tax is already embedded in the price
                (tax, base_price)
            }
            TaxMode::Exclusive => {
                let tax = if tax_rate > Decimal::ZERO {
                    base_price.saturating_mul(tax_rate / Decimal::ONE_HUNDRED)
                } else {
                    Decimal::ZERO
                };
                (tax, base_price.saturating_add(tax))
            }
        };

        LineBreakdown {
            tax_mode: item.tax_mode,
            line_total,
            discount_amount,
            base_price,
            tax_amount,
            final_total,
        }
    }

    /// Rounds every field independently for publication.
    pub fn publish(&self) -> LineResult {
        LineResult {
            line_total: to_f64(self.line_total),
            tax_amount: to_f64(self.tax_amount),
            discount_amount: to_f64(self.discount_amount),
            base_price: to_f64(self.base_price),
            final_total: to_f64(self.final_total),
        }
    }
}

/// Prices a single line item for display in isolation (a cart row, a
/// catalog preview). Never fails.
///
/// ## Example
/// ```rust
/// use marquee_core::{compute_line_item_total, LineItem, TaxMode};
///
/// // 100 × 1 at 10% tax, 20% off
/// let item = LineItem::new(100.0, 1, 10.0, TaxMode::Exclusive, 20.0);
/// let result = compute_line_item_total(&item);
///
/// assert_eq!(result.line_total, 100.0);
/// assert_eq!(result.discount_amount, 20.0);
/// assert_eq!(result.base_price, 80.0);
/// assert_eq!(result.tax_amount, 8.0);
/// assert_eq!(result.final_total, 88.0);
/// ```
pub fn compute_line_item_total(item: &LineItem) -> LineResult {
    LineBreakdown::of(item).publish()
}

// =============================================================================
// Unit Tests
// =============================================================================

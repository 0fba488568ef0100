//! # Order Aggregator
//!
//! Folds per-line breakdowns into the order totals shown in a cart footer.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal      = Σ lineTotal       (gross, undiscounted)                │
//! │  tax           = Σ taxAmount                                            │
//! │  totalDiscount = Σ discountAmount                                       │
//! │                                                                         │
//! │  total, TotalPolicy::OrderWideFlag (default):                           │
//! │    any INCLUSIVE line → subtotal − totalDiscount                        │
//! │    otherwise          → subtotal − totalDiscount + tax                  │
//! │                                                                         │
//! │  total, TotalPolicy::PerLineSum:                                        │
//! │    Σ finalTotal                                                         │
//! │                                                                         │
//! │  Sums use unrounded line values; each total is rounded once at the end.│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::line::LineBreakdown;
use crate::rounding::to_f64;
use crate::types::{LineItem, OrderTotals, PricedOrder, TotalPolicy};

/// Running sums over the lines of one order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderAccumulator {
    subtotal: Decimal,
    tax: Decimal,
    discount: Decimal,
    final_sum: Decimal,
    has_inclusive_line: bool,
}

impl OrderAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one line's unrounded breakdown.
    pub fn push(&mut self, line: &LineBreakdown) {
        self.subtotal = self.subtotal.saturating_add(line.line_total);
        self.tax = self.tax.saturating_add(line.tax_amount);
        self.discount = self.discount.saturating_add(line.discount_amount);
        self.final_sum = self.final_sum.saturating_add(line.final_total);
        self.has_inclusive_line |= line.tax_mode.is_inclusive();
    }

    /// True if any pushed line is INCLUSIVE.
    #[inline]
    pub fn has_inclusive_line(&self) -> bool {
        self.has_inclusive_line
    }

    /// Unrounded total under `policy`.
    pub fn raw_total(&self, policy: TotalPolicy) -> Decimal {
        let net = self.subtotal.saturating_sub(self.discount);
        match policy {
            TotalPolicy::OrderWideFlag if self.has_inclusive_line => net,
            TotalPolicy::OrderWideFlag => net.saturating_add(self.tax),
            TotalPolicy::PerLineSum => self.final_sum,
        }
    }

    /// Rounds every total independently for publication.
    pub fn finish(&self, policy: TotalPolicy) -> OrderTotals {
        OrderTotals {
            subtotal: to_f64(self.subtotal),
            tax: to_f64(self.tax),
            total: to_f64(self.raw_total(policy)),
            total_discount: to_f64(self.discount),
        }
    }
}

/// Computes order totals with the default [`TotalPolicy::OrderWideFlag`].
///
/// An empty order yields all-zero totals.
///
/// ## Example
/// ```rust
/// use marquee_core::{compute_order_totals, LineItem, TaxMode};
///
/// let totals = compute_order_totals(&[LineItem::new(118.0, 1, 18.0, TaxMode::Inclusive, 0.0)]);
/// assert_eq!(totals.subtotal, 118.0);
/// assert_eq!(totals.tax, 18.0);
/// assert_eq!(totals.total, 118.0); // tax not added again
///
/// assert_eq!(compute_order_totals(&[]), Default::default());
/// ```
pub fn compute_order_totals(items: &[LineItem]) -> OrderTotals {
    compute_order_totals_with(items, TotalPolicy::default())
}

/// Computes order totals under an explicit total policy.
pub fn compute_order_totals_with(items: &[LineItem], policy: TotalPolicy) -> OrderTotals {
    items
        .iter()
        .map(LineBreakdown::of)
        .fold(OrderAccumulator::new(), |mut acc, line| {
            acc.push(&line);
            acc
        })
        .finish(policy)
}

/// Prices every line and the order in one pass.
///
/// `lines[i]` is exactly `compute_line_item_total(&items[i])`, and `totals`
/// is exactly `compute_order_totals_with(items, policy)`.
pub fn price_order(items: &[LineItem], policy: TotalPolicy) -> PricedOrder {
    let mut acc = OrderAccumulator::new();
    let lines = items
        .iter()
        .map(|item| {
            let line = LineBreakdown::of(item);
            acc.push(&line);
            line.publish()
        })
        .collect();

    PricedOrder {
        lines,
        totals: acc.finish(policy),
        policy,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # marquee-core: Pure Pricing Engine
//!
//! Computes line totals and order totals for box office carts. Every
//! function in this crate is pure: no I/O, no logging, no clock, no config.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pricing Pipeline                                 │
//! │                                                                         │
//! │  RawLineItem (untyped JSON fields)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────┐   missing / malformed / out of range → 0             │
//! │  │  normalize   │   records a Coercion for each field not taken as is  │
//! │  └──────┬───────┘                                                      │
//! │         │ LineItem                                                      │
//! │         ▼                                                               │
//! │  ┌──────────────┐   gross → discount → tax (INCLUSIVE | EXCLUSIVE)     │
//! │  │    line      │                                                      │
//! │  └──────┬───────┘                                                      │
//! │         │ LineBreakdown (unrounded Decimal)                             │
//! │         ▼                                                               │
//! │  ┌──────────────┐   Σ gross, Σ tax, Σ discount, total per TotalPolicy  │
//! │  │    order     │                                                      │
//! │  └──────┬───────┘                                                      │
//! │         ▼                                                               │
//! │  ┌──────────────┐   2 decimals, half-up, once per published field      │
//! │  │   rounding   │                                                      │
//! │  └──────────────┘                                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  LineResult / OrderTotals                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items, results, totals, tax mode, total policy
//! - [`normalize`] - Total (never failing) coercion of raw input
//! - [`line`] - Per-line gross, discount and tax
//! - [`order`] - Order aggregation
//! - [`rounding`] - Two-decimal half-up rounding
//! - [`validation`] - Opt-in strict checks for callers that want them
//! - [`error`] - Validation error types
//!
//! ## Example Usage
//!
//! ```rust
//! use marquee_core::{compute_order_totals, LineItem, TaxMode};
//!
//! let items = vec![LineItem::new(100.0, 2, 18.0, TaxMode::Exclusive, 0.0)];
//! let totals = compute_order_totals(&items);
//!
//! assert_eq!(totals.subtotal, 200.0);
//! assert_eq!(totals.tax, 36.0);
//! assert_eq!(totals.total, 236.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod line;
pub mod normalize;
pub mod order;
pub mod rounding;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use line::{compute_line_item_total, LineBreakdown};
pub use normalize::{normalize_all, normalize_line_item};
pub use order::{compute_order_totals, compute_order_totals_with, price_order};
pub use rounding::{round_currency, to_cents};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Decimal places of every published amount.
pub const MONEY_SCALE: u32 = 2;

/// Largest unit price the normalizer and strict validation accept.
///
/// Larger prices are [`CoercionReason::OutOfRange`] and price as zero.
pub const MAX_UNIT_PRICE: f64 = 1_000_000.0;

/// Maximum quantity of a single line accepted by strict validation.
///
/// The engine itself prices any quantity; only [`validation`] enforces this.
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Upper bound for a tax rate percentage under strict validation.
pub const MAX_TAX_RATE: f64 = 100.0;

/// Upper bound for a discount percentage under strict validation.
pub const MAX_DISCOUNT_PERCENTAGE: f64 = 100.0;

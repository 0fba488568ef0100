//! # Rounding Module
//!
//! Money arithmetic for the engine. Amounts enter and leave as `f64`, but
//! every calculation in between runs on [`rust_decimal::Decimal`], and the
//! single rounding rule (two decimal places, round half up) is applied with
//! `round_dp_with_strategy` when a value is published.
//!
//! ## Where Rounding Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ROUND ONCE, AT OUTPUT                                                  │
//! │                                                                         │
//! │  line 1: 33.3333… ─┐                                                    │
//! │  line 2: 33.3333… ─┼─► Σ = 99.9999… ─► round_money ─► 100.00  ✅        │
//! │  line 3: 33.3333… ─┘                                                    │
//! │                                                                         │
//! │  Rounding each line first and then summing would publish 99.99:        │
//! │    33.33 + 33.33 + 33.33 = 99.99                                ❌     │
//! │                                                                         │
//! │  Every published field is rounded independently, exactly once.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Half Up
//! Ties go toward positive infinity: `0.125 → 0.13`, `-0.125 → -0.12`.
//! Inputs are read as the shortest decimal that round-trips the `f64`, so
//! `1.005` is the tie `1.005` and publishes as `1.01`.

use rust_decimal::prelude::*;

use crate::MONEY_SCALE;

/// Largest magnitude accepted by [`to_decimal`]; just under `Decimal::MAX`.
pub const DECIMAL_LIMIT: f64 = 7.9e28;

// =============================================================================
// Conversion Helpers
// =============================================================================

/// Converts an `f64` into a `Decimal` for calculation.
///
/// Non-finite values and magnitudes above [`DECIMAL_LIMIT`] become zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    if !value.is_finite() || value.abs() > DECIMAL_LIMIT {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or_default()
}

/// Rounds a `Decimal` to [`MONEY_SCALE`] places, half up, and converts it
/// back to `f64` for publication.
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    // + 0.0 turns -0.0 into 0.0
    round_money(value).to_f64().unwrap_or_default() + 0.0
}

// =============================================================================
// Rounding
// =============================================================================

/// Rounds a money amount to [`MONEY_SCALE`] decimal places, half up.
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    round_half_up(value, MONEY_SCALE)
}

/// Rounds `value` to `scale` decimal places, ties toward positive infinity.
///
/// ```rust
/// use marquee_core::rounding::round_half_up;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_half_up(Decimal::new(25, 1), 0), Decimal::new(3, 0));
/// assert_eq!(round_half_up(Decimal::new(-25, 1), 0), Decimal::new(-2, 0));
/// ```
pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value.round_dp_with_strategy(scale, strategy)
}

/// Rounds a currency amount given as `f64`, half up.
///
/// Non-finite input, and magnitudes too large to hold a fraction, are
/// returned unchanged.
///
/// ## Example
/// ```rust
/// use marquee_core::rounding::round_currency;
///
/// assert_eq!(round_currency(35.996), 36.0);
/// assert_eq!(round_currency(0.125), 0.13);
/// assert_eq!(round_currency(1.005), 1.01);
/// assert_eq!(round_currency(2.0 / 3.0), 0.67);
/// ```
pub fn round_currency(value: f64) -> f64 {
    if !value.is_finite() || value.abs() > DECIMAL_LIMIT {
        return value;
    }
    to_f64(to_decimal(value))
}

/// Converts a currency amount into integer minor units (cents).
///
/// The amount is rounded half up first. Amounts outside the `i64` range
/// saturate; non-finite input is zero.
///
/// ## Example
/// ```rust
/// use marquee_core::rounding::to_cents;
///
/// assert_eq!(to_cents(10.99), 1099);
/// assert_eq!(to_cents(0.125), 13);
/// ```
pub fn to_cents(value: f64) -> i64 {
    let cents = round_money(to_decimal(value)).saturating_mul(Decimal::ONE_HUNDRED);
    cents.to_i64().unwrap_or(if cents.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Validation Module
//!
//! Opt-in strict checks for callers that would rather reject a cart than
//! price it with defaulted fields. The pricing functions never call this.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Two Contracts                                      │
//! │                                                                         │
//! │  Lenient (engine default)                                               │
//! │  ├── normalize_line_item → bad field becomes 0, Coercion recorded       │
//! │  └── discount > 100 priced as given                                     │
//! │                                                                         │
//! │  Strict (THIS MODULE, caller's choice)                                  │
//! │  ├── every numeric field present and finite                            │
//! │  ├── no negatives                                                       │
//! │  ├── unit price ≤ MAX_UNIT_PRICE                                        │
//! │  ├── quantity whole and ≤ MAX_ITEM_QUANTITY                             │
//! │  ├── tax rate ≤ MAX_TAX_RATE                                            │
//! │  └── discount ≤ MAX_DISCOUNT_PERCENTAGE                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use marquee_core::validation::{validate_discount_percentage, validate_quantity};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_discount_percentage(150.0).is_err());
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::normalize::{normalize_line_item, parse_number, upper_bound};
use crate::types::{CoercionReason, LineField, LineItem, RawLineItem};
use crate::{MAX_DISCOUNT_PERCENTAGE, MAX_ITEM_QUANTITY, MAX_TAX_RATE, MAX_UNIT_PRICE};

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Must be finite and non-negative
/// - Must not exceed [`MAX_UNIT_PRICE`]
/// - Zero is allowed (complimentary tickets)
pub fn validate_unit_price(price: f64) -> ValidationResult<()> {
    non_negative_finite(LineField::UnitPrice, price)?;
    at_most(LineField::UnitPrice, price, MAX_UNIT_PRICE)
}

/// Validates a quantity.
///
/// ## Rules
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
/// - Zero is allowed (a row being edited prices to zero)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: LineField::Quantity.to_string(),
            min: 0.0,
            max: f64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Validates a tax rate percentage.
///
/// ## Rules
/// - Must be between 0 and [`MAX_TAX_RATE`]
pub fn validate_tax_rate(rate: f64) -> ValidationResult<()> {
    non_negative_finite(LineField::TaxRate, rate)?;
    at_most(LineField::TaxRate, rate, MAX_TAX_RATE)
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be between 0 and [`MAX_DISCOUNT_PERCENTAGE`]
///
/// ```rust
/// use marquee_core::validation::validate_discount_percentage;
///
/// assert!(validate_discount_percentage(0.0).is_ok());
/// assert!(validate_discount_percentage(100.0).is_ok());
/// assert!(validate_discount_percentage(100.5).is_err());
/// assert!(validate_discount_percentage(-1.0).is_err());
/// ```
pub fn validate_discount_percentage(pct: f64) -> ValidationResult<()> {
    non_negative_finite(LineField::DiscountPercentage, pct)?;
    at_most(LineField::DiscountPercentage, pct, MAX_DISCOUNT_PERCENTAGE)
}

// =============================================================================
// Line Validators
// =============================================================================

/// Validates a typed line item against every field rule.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_unit_price(item.unit_price)?;
    validate_quantity(item.quantity)?;
    validate_tax_rate(item.tax_rate)?;
    validate_discount_percentage(item.discount_percentage)?;
    Ok(())
}

/// Validates a raw line item: the fields the normalizer would have
/// defaulted are reported instead, then the normalized values are checked.
///
/// ## Rules
/// - `unitPrice`, `quantity` and `taxRate` are required
/// - `discountPercentage` may be absent (no discount)
/// - `quantity` must be a whole number
/// - `taxMode` is never rejected; unknown labels are EXCLUSIVE
///
/// ```rust
/// use marquee_core::validation::validate_raw_line_item;
/// use marquee_core::RawLineItem;
/// use serde_json::json;
///
/// let ok = RawLineItem::from_value(&json!({ "unitPrice": 10, "quantity": 1, "taxRate": 5 }));
/// assert!(validate_raw_line_item(&ok).is_ok());
///
/// let bad = RawLineItem::from_value(&json!({ "unitPrice": "ten", "quantity": 1, "taxRate": 5 }));
/// assert!(validate_raw_line_item(&bad).is_err());
/// ```
pub fn validate_raw_line_item(raw: &RawLineItem) -> ValidationResult<LineItem> {
    let normalized = normalize_line_item(raw);

    for coercion in &normalized.coercions {
        let field = coercion.field.to_string();
        match coercion.reason {
            CoercionReason::Missing if coercion.field == LineField::DiscountPercentage => {}
            CoercionReason::Missing => return Err(ValidationError::Required { field }),
            CoercionReason::Malformed => {
                return Err(ValidationError::InvalidFormat {
                    field,
                    reason: "must be a finite number".to_string(),
                })
            }
            CoercionReason::Truncated => {
                return Err(ValidationError::InvalidFormat {
                    field,
                    reason: "must be a whole number".to_string(),
                })
            }
            CoercionReason::OutOfRange => {
                return Err(match parse_number(raw.field(coercion.field)) {
                    Ok(n) if n < 0.0 => ValidationError::Negative { field },
                    _ => ValidationError::OutOfRange {
                        field,
                        min: 0.0,
                        max: upper_bound(coercion.field),
                    },
                })
            }
        }
    }

    validate_line_item(&normalized.item)?;
    Ok(normalized.item)
}

/// Validates every raw line of an order, stopping at the first failure.
///
/// On failure returns the zero-based index of the offending line.
pub fn validate_order(raw: &[RawLineItem]) -> Result<Vec<LineItem>, (usize, ValidationError)> {
    raw.iter()
        .enumerate()
        .map(|(index, line)| validate_raw_line_item(line).map_err(|err| (index, err)))
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

fn non_negative_finite(field: LineField, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

fn at_most(field: LineField, value: f64, max: f64) -> ValidationResult<()> {
    if value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

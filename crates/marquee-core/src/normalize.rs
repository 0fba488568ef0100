//! # Input Normalizer
//!
//! Turns a [`RawLineItem`] into a usable [`LineItem`]. Total: every input,
//! however broken, produces a line item. Every numeric field not taken as
//! given is listed in [`Normalized::coercions`] instead of being silently
//! lost.
//!
//! ## Field Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw value                      result          coercion                │
//! │  ─────────────────────────────  ──────────────  ─────────────────────   │
//! │  absent / null                  0               Missing                 │
//! │  12.5 / "12.5" / " 12.5 "       12.5            -                       │
//! │  "abc" / "" / true / [] / {}    0               Malformed               │
//! │  "NaN" / "inf"                  0               Malformed               │
//! │  -3 (price, qty, tax rate)      0               OutOfRange              │
//! │  -3 (discount)                  0               OutOfRange              │
//! │  2e6 (price > MAX_UNIT_PRICE)   0               OutOfRange              │
//! │  150 (discount)                 150             - (kept as given)       │
//! │  2.7 (quantity)                 2               Truncated               │
//! │  5e9 (quantity > u32::MAX)      0               OutOfRange              │
//! │                                                                         │
//! │  taxMode: text containing INCLUDE / INCLUSIVE → INCLUSIVE               │
//! │           anything else, or absent            → EXCLUSIVE               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;

use crate::rounding::DECIMAL_LIMIT;
use crate::types::{
    Coercion, CoercionReason, LineField, LineItem, Normalized, RawLineItem, TaxMode,
};
use crate::MAX_UNIT_PRICE;

/// Normalizes one raw line item. Never fails.
///
/// ## Example
/// ```rust
/// use marquee_core::normalize::normalize_line_item;
/// use marquee_core::{CoercionReason, LineField, RawLineItem, TaxMode};
/// use serde_json::json;
///
/// let raw = RawLineItem::from_value(&json!({
///     "unitPrice": "118",
///     "quantity": 1,
///     "taxRate": 18,
///     "taxMode": "tax_included",
///     "discountPercentage": null,
/// }));
///
/// let normalized = normalize_line_item(&raw);
/// assert_eq!(normalized.item.unit_price, 118.0);
/// assert_eq!(normalized.item.tax_mode, TaxMode::Inclusive);
/// assert_eq!(
///     normalized.coercion_for(LineField::DiscountPercentage),
///     Some(CoercionReason::Missing)
/// );
/// ```
pub fn normalize_line_item(raw: &RawLineItem) -> Normalized {
    let mut coercions = Vec::new();

    let unit_price = in_range(LineField::UnitPrice, raw, &mut coercions);
    let quantity = in_range(LineField::Quantity, raw, &mut coercions);
    let tax_rate = in_range(LineField::TaxRate, raw, &mut coercions);
    let discount_percentage = in_range(LineField::DiscountPercentage, raw, &mut coercions);

    if quantity.fract() != 0.0 {
        coercions.push(Coercion {
            field: LineField::Quantity,
            reason: CoercionReason::Truncated,
        });
    }

    let item = LineItem {
        product_id: product_id(raw.product_id.as_ref()),
        unit_price,
        // In range, so `as` only drops the fraction
        quantity: quantity as u32,
        tax_rate,
        tax_mode: tax_mode(raw.tax_mode.as_ref()),
        discount_percentage,
    };

    Normalized { item, coercions }
}

/// Normalizes every raw line item of an order, preserving order.
pub fn normalize_all(raw: &[RawLineItem]) -> Vec<Normalized> {
    raw.iter().map(normalize_line_item).collect()
}

/// Reads a JSON value as a finite number.
///
/// Accepts JSON numbers and numeric strings (surrounding whitespace ignored).
pub fn parse_number(value: Option<&Value>) -> Result<f64, CoercionReason> {
    let parsed = match value {
        None | Some(Value::Null) => return Err(CoercionReason::Missing),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(CoercionReason::Malformed),
    }
}

/// Largest value the normalizer accepts for `field`.
pub fn upper_bound(field: LineField) -> f64 {
    match field {
        LineField::UnitPrice => MAX_UNIT_PRICE,
        LineField::Quantity => f64::from(u32::MAX),
        LineField::TaxRate | LineField::DiscountPercentage => DECIMAL_LIMIT,
    }
}

/// Resolves a raw tax mode value. Non-string values are EXCLUSIVE.
pub fn tax_mode(value: Option<&Value>) -> TaxMode {
    match value {
        Some(Value::String(label)) => TaxMode::from_label(label),
        _ => TaxMode::Exclusive,
    }
}

fn in_range(field: LineField, raw: &RawLineItem, coercions: &mut Vec<Coercion>) -> f64 {
    match parse_number(raw.field(field)) {
        Ok(n) if (0.0..=upper_bound(field)).contains(&n) => n + 0.0,
        Ok(_) => {
            coercions.push(Coercion {
                field,
                reason: CoercionReason::OutOfRange,
            });
            0.0
        }
        Err(reason) => {
            coercions.push(Coercion { field, reason });
            0.0
        }
    }
}

fn product_id(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> Normalized {
        normalize_line_item(&RawLineItem::from_value(&value))
    }

    #[test]
    fn test_clean_item() {
        let normalized = normalize(json!({
            "productId": "seat-a12",
            "unitPrice": 100,
            "quantity": 2,
            "taxRate": 18,
            "taxMode": "EXCLUSIVE",
            "discountPercentage": 0,
        }));

        assert!(normalized.is_clean());
        assert_eq!(
            normalized.item,
            LineItem::new(100.0, 2, 18.0, TaxMode::Exclusive, 0.0).with_product_id("seat-a12")
        );
    }

    #[test]
    fn test_empty_record_defaults_everything() {
        let normalized = normalize(json!({}));

        assert_eq!(normalized.item, LineItem::new(0.0, 0, 0.0, TaxMode::Exclusive, 0.0));
        assert_eq!(normalized.coercions.len(), 4);
        assert!(normalized
            .coercions
            .iter()
            .all(|c| c.reason == CoercionReason::Missing));
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        let normalized = normalize(json!({
            "unitPrice": " 12.50 ",
            "quantity": "3",
            "taxRate": "8.25",
            "discountPercentage": "10",
        }));

        assert!(normalized.is_clean());
        assert_eq!(normalized.item.unit_price, 12.5);
        assert_eq!(normalized.item.quantity, 3);
        assert_eq!(normalized.item.tax_rate, 8.25);
        assert_eq!(normalized.item.discount_percentage, 10.0);
    }

    #[test]
    fn test_malformed_values_become_zero() {
        let normalized = normalize(json!({
            "unitPrice": "twelve",
            "quantity": true,
            "taxRate": [18],
            "discountPercentage": "",
        }));

        assert_eq!(normalized.item.unit_price, 0.0);
        assert_eq!(normalized.item.quantity, 0);
        assert_eq!(normalized.item.tax_rate, 0.0);
        assert_eq!(normalized.item.discount_percentage, 0.0);
        assert!(normalized
            .coercions
            .iter()
            .all(|c| c.reason == CoercionReason::Malformed));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let normalized = normalize(json!({ "unitPrice": null, "quantity": 1, "taxRate": 0, "discountPercentage": 0 }));
        assert_eq!(
            normalized.coercion_for(LineField::UnitPrice),
            Some(CoercionReason::Missing)
        );
        assert_eq!(normalized.coercions.len(), 1);
    }

    #[test]
    fn test_non_finite_strings_are_malformed() {
        let normalized = normalize(json!({ "unitPrice": "NaN", "taxRate": "inf" }));
        assert_eq!(
            normalized.coercion_for(LineField::UnitPrice),
            Some(CoercionReason::Malformed)
        );
        assert_eq!(
            normalized.coercion_for(LineField::TaxRate),
            Some(CoercionReason::Malformed)
        );
        assert_eq!(normalized.item.unit_price, 0.0);
        assert_eq!(normalized.item.tax_rate, 0.0);
    }

    #[test]
    fn test_negative_values_are_out_of_range() {
        let normalized = normalize(json!({
            "unitPrice": -5,
            "quantity": -1,
            "taxRate": -18,
            "discountPercentage": -10,
        }));

        assert_eq!(normalized.item, LineItem::new(0.0, 0, 0.0, TaxMode::Exclusive, 0.0));
        assert!(normalized
            .coercions
            .iter()
            .all(|c| c.reason == CoercionReason::OutOfRange));
        assert_eq!(normalized.coercions.len(), 4);
    }

    #[test]
    fn test_discount_above_hundred_is_kept() {
        let normalized = normalize(json!({ "discountPercentage": 150 }));
        assert_eq!(normalized.item.discount_percentage, 150.0);
        assert_eq!(normalized.coercion_for(LineField::DiscountPercentage), None);
    }

    #[test]
    fn test_fractional_quantity_is_truncated_and_recorded() {
        let normalized = normalize(json!({ "unitPrice": 1, "quantity": 2.7, "taxRate": 0, "discountPercentage": 0 }));
        assert_eq!(normalized.item.quantity, 2);
        assert_eq!(
            normalized.coercions,
            vec![Coercion {
                field: LineField::Quantity,
                reason: CoercionReason::Truncated,
            }]
        );

        assert_eq!(normalize(json!({ "quantity": "0.9" })).item.quantity, 0);
        assert!(normalize(json!({ "quantity": 3, "unitPrice": 1, "taxRate": 0, "discountPercentage": 0 })).is_clean());
    }

    #[test]
    fn test_quantity_beyond_u32_is_out_of_range() {
        let normalized = normalize(json!({ "quantity": 1e12 }));
        assert_eq!(normalized.item.quantity, 0);
        assert_eq!(
            normalized.coercion_for(LineField::Quantity),
            Some(CoercionReason::OutOfRange)
        );
    }

    #[test]
    fn test_price_above_limit_is_out_of_range() {
        let normalized = normalize(json!({
            "unitPrice": 1e308,
            "quantity": 10,
            "taxRate": 18,
            "discountPercentage": 10,
        }));
        assert_eq!(normalized.item.unit_price, 0.0);
        assert_eq!(
            normalized.coercions,
            vec![Coercion {
                field: LineField::UnitPrice,
                reason: CoercionReason::OutOfRange,
            }]
        );

        let at_limit = normalize(json!({ "unitPrice": MAX_UNIT_PRICE }));
        assert_eq!(at_limit.item.unit_price, MAX_UNIT_PRICE);
        assert_eq!(at_limit.coercion_for(LineField::UnitPrice), None);
    }

    #[test]
    fn test_huge_rates_are_out_of_range() {
        let normalized = normalize(json!({ "taxRate": 1e300, "discountPercentage": "1e29" }));
        assert_eq!(
            normalized.coercion_for(LineField::TaxRate),
            Some(CoercionReason::OutOfRange)
        );
        assert_eq!(
            normalized.coercion_for(LineField::DiscountPercentage),
            Some(CoercionReason::OutOfRange)
        );
    }

    #[test]
    fn test_duplicate_casing_keeps_other_fields() {
        let normalized = normalize(json!({
            "unitPrice": 10,
            "unit_price": 10,
            "quantity": 2,
            "taxRate": 18,
        }));
        assert_eq!(normalized.item.unit_price, 10.0);
        assert_eq!(normalized.item.quantity, 2);
        assert_eq!(normalized.item.tax_rate, 18.0);
        assert_eq!(
            normalized.coercions,
            vec![Coercion {
                field: LineField::DiscountPercentage,
                reason: CoercionReason::Missing,
            }]
        );
    }

    #[test]
    fn test_tax_mode_resolution() {
        assert_eq!(normalize(json!({ "taxMode": "TAX_INCLUDED" })).item.tax_mode, TaxMode::Inclusive);
        assert_eq!(normalize(json!({ "taxMode": "included" })).item.tax_mode, TaxMode::Inclusive);
        assert_eq!(normalize(json!({ "taxMode": "INCLUSIVE" })).item.tax_mode, TaxMode::Inclusive);
        assert_eq!(normalize(json!({ "taxMode": "exclusive" })).item.tax_mode, TaxMode::Exclusive);
        assert_eq!(normalize(json!({ "taxMode": 1 })).item.tax_mode, TaxMode::Exclusive);
        assert_eq!(normalize(json!({})).item.tax_mode, TaxMode::Exclusive);
    }

    #[test]
    fn test_product_id_forms() {
        assert_eq!(normalize(json!({ "productId": 42 })).item.product_id.as_deref(), Some("42"));
        assert_eq!(normalize(json!({ "product_id": "p-1" })).item.product_id.as_deref(), Some("p-1"));
        assert_eq!(normalize(json!({ "productId": { "id": 1 } })).item.product_id, None);
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let raw = vec![
            RawLineItem::from_value(&json!({ "unitPrice": 1 })),
            RawLineItem::from_value(&json!({ "unitPrice": 2 })),
            RawLineItem::from_value(&json!({ "unitPrice": 3 })),
        ];
        let prices: Vec<f64> = normalize_all(&raw).iter().map(|n| n.item.unit_price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_typed_item_round_trips_through_raw() {
        let item = LineItem::new(9.99, 4, 5.5, TaxMode::Inclusive, 12.5).with_product_id("p-9");
        let normalized = normalize_line_item(&RawLineItem::from(&item));
        assert!(normalized.is_clean());
        assert_eq!(normalized.item, item);
    }
}

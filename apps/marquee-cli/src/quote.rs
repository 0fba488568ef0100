//! # Quotes
//!
//! Reads carts, hands them to the pricing engine and wraps the result in a
//! quote envelope.
//!
//! ## Quote Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  file / stdin ──► serde_json::Value ──► Vec<RawLineItem>                │
//! │                                              │                          │
//! │                       strict? ───── yes ─────┼──► validate_order        │
//! │                          │                   │      (first error ends)  │
//! │                          no                  │                          │
//! │                          ▼                   ▼                          │
//! │                    normalize_all        Vec<LineItem>                   │
//! │                    (warn per coercion)       │                          │
//! │                          └──────────┬────────┘                          │
//! │                                     ▼                                   │
//! │                               price_order                               │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │             Quote { quoteId, computedAt, lines, totals, coercions }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use marquee_core::validation::{validate_order, validate_raw_line_item};
use marquee_core::{
    compute_line_item_total, normalize_all, normalize_line_item, price_order, to_cents, Coercion,
    LineItem, LineResult, OrderTotals, RawLineItem, TotalPolicy,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PricingSettings;
use crate::error::{CliError, CliResult};

/// A coercion tagged with the zero-based line it happened on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCoercion {
    pub line: usize,
    #[serde(flatten)]
    pub coercion: Coercion,
}

/// A priced cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub quote_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub policy: TotalPolicy,
    pub lines: Vec<LineResult>,
    pub totals: OrderTotals,
    pub coercions: Vec<LineCoercion>,
}

/// Reads JSON from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> CliResult<Value> {
    let contents = match path {
        Some(path) if path != Path::new("-") => {
            debug!(?path, "Reading input file");
            std::fs::read_to_string(path)?
        }
        _ => {
            debug!("Reading input from stdin");
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    Ok(serde_json::from_str(&contents)?)
}

/// Extracts raw line items from a JSON array or an object with `items`.
pub fn raw_lines(value: &Value) -> CliResult<Vec<RawLineItem>> {
    let lines = match value {
        Value::Array(lines) => lines,
        Value::Object(map) => match map.get("items") {
            Some(Value::Array(lines)) => lines,
            _ => {
                return Err(CliError::InvalidInput(
                    "expected an \"items\" array".to_string(),
                ))
            }
        },
        _ => {
            return Err(CliError::InvalidInput(
                "expected an array of line items".to_string(),
            ))
        }
    };

    Ok(lines.iter().map(RawLineItem::from_value).collect())
}

/// Prices a cart.
pub fn build_quote(raw: &[RawLineItem], settings: &PricingSettings) -> CliResult<Quote> {
    let (items, coercions) = prepare(raw, settings.strict)?;
    let priced = price_order(&items, settings.total_policy);

    let quote = Quote {
        quote_id: Uuid::new_v4(),
        computed_at: Utc::now(),
        policy: priced.policy,
        lines: priced.lines,
        totals: priced.totals,
        coercions,
    };

    info!(
        quote_id = %quote.quote_id,
        lines = quote.lines.len(),
        policy = %quote.policy,
        subtotal = quote.totals.subtotal,
        total_cents = to_cents(quote.totals.total),
        coerced = quote.coercions.len(),
        "Quote computed"
    );

    Ok(quote)
}

/// Prices one line item in isolation.
pub fn price_line(raw: &RawLineItem, settings: &PricingSettings) -> CliResult<LineResult> {
    let item = if settings.strict {
        validate_raw_line_item(raw).map_err(|source| CliError::Validation { index: 0, source })?
    } else {
        let normalized = normalize_line_item(raw);
        log_coercions(0, &normalized.coercions);
        normalized.item
    };

    Ok(compute_line_item_total(&item))
}

fn prepare(raw: &[RawLineItem], strict: bool) -> CliResult<(Vec<LineItem>, Vec<LineCoercion>)> {
    if strict {
        let items = validate_order(raw).map_err(|(index, source)| {
            warn!(line = index, error = %source, "Line item rejected");
            CliError::Validation { index, source }
        })?;
        return Ok((items, Vec::new()));
    }

    let mut coercions = Vec::new();
    let items = normalize_all(raw)
        .into_iter()
        .enumerate()
        .map(|(line, normalized)| {
            log_coercions(line, &normalized.coercions);
            coercions.extend(
                normalized
                    .coercions
                    .iter()
                    .map(|&coercion| LineCoercion { line, coercion }),
            );
            normalized.item
        })
        .collect();

    Ok((items, coercions))
}

fn log_coercions(line: usize, coercions: &[Coercion]) {
    for coercion in coercions {
        warn!(
            line,
            field = %coercion.field,
            reason = %coercion.reason,
            "Line item field coerced"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lenient(policy: TotalPolicy) -> PricingSettings {
        PricingSettings {
            total_policy: policy,
            strict: false,
        }
    }

    fn strict() -> PricingSettings {
        PricingSettings {
            total_policy: TotalPolicy::OrderWideFlag,
            strict: true,
        }
    }

    #[test]
    fn test_raw_lines_from_array_or_items() {
        let array = json!([{ "unitPrice": 1 }, { "unitPrice": 2 }]);
        let object = json!({ "items": [{ "unitPrice": 1 }, { "unitPrice": 2 }] });

        assert_eq!(raw_lines(&array).unwrap().len(), 2);
        assert_eq!(raw_lines(&array).unwrap(), raw_lines(&object).unwrap());
    }

    #[test]
    fn test_raw_lines_rejects_non_carts() {
        assert!(matches!(raw_lines(&json!(12)), Err(CliError::InvalidInput(_))));
        assert!(matches!(
            raw_lines(&json!({ "lines": [] })),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_quote_mixed_cart() {
        let raw = raw_lines(&json!([
            { "unitPrice": 118, "quantity": 1, "taxRate": 18, "taxMode": "INCLUDED" },
            { "unitPrice": 100, "quantity": 2, "taxRate": 18, "taxMode": "EXCLUSIVE" }
        ]))
        .unwrap();

        let quote = build_quote(&raw, &lenient(TotalPolicy::OrderWideFlag)).unwrap();
        assert_eq!(quote.lines.len(), 2);
        assert_eq!(quote.totals.total, 318.0);
        assert_eq!(quote.policy, TotalPolicy::OrderWideFlag);

        let quote = build_quote(&raw, &lenient(TotalPolicy::PerLineSum)).unwrap();
        assert_eq!(quote.totals.total, 354.0);
    }

    #[test]
    fn test_quote_records_coercions() {
        let raw = raw_lines(&json!([
            { "unitPrice": 10, "quantity": 1, "taxRate": 0, "discountPercentage": 0 },
            { "unitPrice": "n/a", "quantity": 1, "taxRate": 0, "discountPercentage": 0 }
        ]))
        .unwrap();

        let quote = build_quote(&raw, &lenient(TotalPolicy::OrderWideFlag)).unwrap();
        assert_eq!(quote.totals.total, 10.0);
        assert_eq!(quote.coercions.len(), 1);
        assert_eq!(quote.coercions[0].line, 1);

        let json = serde_json::to_value(quote.coercions[0]).unwrap();
        assert_eq!(
            json,
            json!({ "line": 1, "field": "unitPrice", "reason": "malformed" })
        );
    }

    #[test]
    fn test_strict_quote_rejects_bad_line() {
        let raw = raw_lines(&json!([
            { "unitPrice": 10, "quantity": 1, "taxRate": 0 },
            { "unitPrice": 10, "quantity": 1, "taxRate": 0, "discountPercentage": 120 }
        ]))
        .unwrap();

        match build_quote(&raw, &strict()) {
            Err(CliError::Validation { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_quote_serializes_camel_case() {
        let raw = raw_lines(&json!([{ "unitPrice": 100, "quantity": 2, "taxRate": 18 }])).unwrap();
        let quote = build_quote(&raw, &lenient(TotalPolicy::OrderWideFlag)).unwrap();
        let json = serde_json::to_value(&quote).unwrap();

        assert!(json.get("quoteId").is_some());
        assert!(json.get("computedAt").is_some());
        assert_eq!(json["policy"], json!("order-wide-flag"));
        assert_eq!(json["totals"]["total"], json!(236.0));
        assert_eq!(json["lines"][0]["finalTotal"], json!(236.0));
    }

    #[test]
    fn test_price_line_lenient_and_strict() {
        let raw = RawLineItem::from_value(&json!({
            "unitPrice": 100, "quantity": 1, "taxRate": 10, "discountPercentage": 20
        }));
        let line = price_line(&raw, &lenient(TotalPolicy::OrderWideFlag)).unwrap();
        assert_eq!(line.final_total, 88.0);
        assert_eq!(price_line(&raw, &strict()).unwrap(), line);

        let bad = RawLineItem::from_value(&json!({ "unitPrice": 100 }));
        assert_eq!(price_line(&bad, &lenient(TotalPolicy::OrderWideFlag)).unwrap().final_total, 0.0);
        assert!(price_line(&bad, &strict()).is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let path = std::env::temp_dir().join(format!("marquee-cart-{}.json", Uuid::new_v4()));
        std::fs::write(&path, r#"[{"unitPrice": 5, "quantity": 2, "taxRate": 0}]"#).unwrap();

        let value = read_input(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(raw_lines(&value).unwrap().len(), 1);
    }
}

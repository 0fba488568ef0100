//! # Domain Types
//!
//! Inputs and outputs of the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Pricing Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   normalize   ┌─────────────────┐                 │
//! │  │  RawLineItem    │ ────────────► │   Normalized    │                 │
//! │  │  (JSON values)  │               │  item + coercions│                │
//! │  └─────────────────┘               └────────┬────────┘                 │
//! │                                             │                           │
//! │  ┌─────────────────┐   ┌─────────────────┐  │  ┌─────────────────┐     │
//! │  │    TaxMode      │   │    LineItem     │◄─┘  │  TotalPolicy    │     │
//! │  │  Inclusive      │   │  unit_price     │     │  OrderWideFlag  │     │
//! │  │  Exclusive      │   │  quantity       │     │  PerLineSum     │     │
//! │  └─────────────────┘   │  tax_rate (%)   │     └─────────────────┘     │
//! │                        │  discount (%)   │                              │
//! │                        └────────┬────────┘                              │
//! │                                 ▼                                       │
//! │              ┌─────────────────┐   ┌─────────────────┐                 │
//! │              │   LineResult    │   │  OrderTotals    │                 │
//! │              │  per cart row   │   │  cart footer    │                 │
//! │              └─────────────────┘   └─────────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All amounts are `f64` currency units. Published amounts are always rounded
//! to [`crate::MONEY_SCALE`] decimal places.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Tax Mode
// =============================================================================

/// How a line's unit price relates to its tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxMode {
    /// Unit price already contains the tax; tax is extracted for display.
    #[serde(alias = "inclusive", alias = "Inclusive")]
    Inclusive,
    /// Tax is computed on top of the unit price and added (USA model).
    #[serde(alias = "exclusive", alias = "Exclusive")]
    Exclusive,
}

impl TaxMode {
    /// Resolves a free-form label to a tax mode. Never fails.
    ///
    /// Case-insensitive substring match: any label containing `INCLUDE`
    /// (`"TAX_INCLUDED"`, `"included"`) or `INCLUSIVE` is
    /// [`TaxMode::Inclusive`]; everything else is [`TaxMode::Exclusive`].
    ///
    /// ```rust
    /// use marquee_core::TaxMode;
    ///
    /// assert_eq!(TaxMode::from_label("tax_included"), TaxMode::Inclusive);
    /// assert_eq!(TaxMode::from_label("INCLUSIVE"), TaxMode::Inclusive);
    /// assert_eq!(TaxMode::from_label("EXCLUSIVE"), TaxMode::Exclusive);
    /// assert_eq!(TaxMode::from_label("whatever"), TaxMode::Exclusive);
    /// ```
    pub fn from_label(label: &str) -> Self {
        let label = label.to_uppercase();
        if label.contains("INCLUDE") || label.contains("INCLUSIVE") {
            TaxMode::Inclusive
        } else {
            TaxMode::Exclusive
        }
    }

    /// Returns true for [`TaxMode::Inclusive`].
    #[inline]
    pub const fn is_inclusive(&self) -> bool {
        matches!(self, TaxMode::Inclusive)
    }
}

impl Default for TaxMode {
    fn default() -> Self {
        TaxMode::Exclusive
    }
}

impl fmt::Display for TaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxMode::Inclusive => write!(f, "INCLUSIVE"),
            TaxMode::Exclusive => write!(f, "EXCLUSIVE"),
        }
    }
}

// =============================================================================
// Total Policy
// =============================================================================

/// Rule used to derive the order-level `total`.
///
/// ## Policies
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ORDER_WIDE_FLAG (default)                                              │
/// │    any line INCLUSIVE?  yes → total = subtotal − discount               │
/// │                         no  → total = subtotal − discount + tax         │
/// │    A mixed cart is priced as if every line were INCLUSIVE, so the tax  │
/// │    of its EXCLUSIVE lines is never charged.                             │
/// │                                                                         │
/// │  PER_LINE_SUM                                                           │
/// │    total = Σ line finalTotal (each line priced in its own mode)         │
/// │                                                                         │
/// │  Both agree whenever every line shares one tax mode.                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum TotalPolicy {
    /// Legacy formula selected by an order-wide "has inclusive line" flag.
    OrderWideFlag,
    /// Straight sum of each line's own final total.
    PerLineSum,
}

impl Default for TotalPolicy {
    fn default() -> Self {
        TotalPolicy::OrderWideFlag
    }
}

impl fmt::Display for TotalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TotalPolicy::OrderWideFlag => write!(f, "order-wide-flag"),
            TotalPolicy::PerLineSum => write!(f, "per-line-sum"),
        }
    }
}

impl FromStr for TotalPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "order-wide-flag" | "order-wide" | "legacy" => Ok(TotalPolicy::OrderWideFlag),
            "per-line-sum" | "per-line" => Ok(TotalPolicy::PerLineSum),
            _ => Err(ValidationError::NotAllowed {
                field: "totalPolicy".to_string(),
                allowed: vec!["order-wide-flag".to_string(), "per-line-sum".to_string()],
            }),
        }
    }
}

// =============================================================================
// Raw Line Item
// =============================================================================

/// A line item exactly as it arrived from the caller.
///
/// Every field is an optional untyped JSON value: the record may come from a
/// request body, a stored cart document, or a form, and any field may be
/// missing, `null`, a numeric string, or garbage. Both camelCase and
/// snake_case keys are accepted; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawLineItem {
    #[serde(alias = "product_id", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Value>,

    #[serde(alias = "unit_price", skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,

    #[serde(alias = "tax_rate", skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Value>,

    #[serde(alias = "tax_mode", skip_serializing_if = "Option::is_none")]
    pub tax_mode: Option<Value>,

    #[serde(alias = "discount_percentage", skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<Value>,
}

impl RawLineItem {
    /// Reads a raw line item out of any JSON value. Never fails.
    ///
    /// Each field is looked up on its own, camelCase key first, so one odd
    /// key never costs the others. Non-object values yield a record with
    /// every field missing.
    ///
    /// ```rust
    /// use marquee_core::RawLineItem;
    /// use serde_json::json;
    ///
    /// let raw = RawLineItem::from_value(&json!({ "unitPrice": "12.5", "qty": 3 }));
    /// assert_eq!(raw.unit_price, Some(json!("12.5")));
    /// assert_eq!(raw.quantity, None);
    ///
    /// assert_eq!(RawLineItem::from_value(&json!(42)), RawLineItem::default());
    /// ```
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return RawLineItem::default();
        };

        let field = |camel: &str, snake: &str| {
            map.get(camel)
                .filter(|v| !v.is_null())
                .or_else(|| map.get(snake))
                .filter(|v| !v.is_null())
                .cloned()
        };

        RawLineItem {
            product_id: field("productId", "product_id"),
            unit_price: field("unitPrice", "unit_price"),
            quantity: field("quantity", "quantity"),
            tax_rate: field("taxRate", "tax_rate"),
            tax_mode: field("taxMode", "tax_mode"),
            discount_percentage: field("discountPercentage", "discount_percentage"),
        }
    }

    /// Raw value of a numeric field.
    pub fn field(&self, field: LineField) -> Option<&Value> {
        match field {
            LineField::UnitPrice => self.unit_price.as_ref(),
            LineField::Quantity => self.quantity.as_ref(),
            LineField::TaxRate => self.tax_rate.as_ref(),
            LineField::DiscountPercentage => self.discount_percentage.as_ref(),
        }
    }
}

impl From<&LineItem> for RawLineItem {
    fn from(item: &LineItem) -> Self {
        RawLineItem {
            product_id: item.product_id.clone().map(Value::String),
            unit_price: Some(Value::from(item.unit_price)),
            quantity: Some(Value::from(item.quantity)),
            tax_rate: Some(Value::from(item.tax_rate)),
            tax_mode: Some(Value::String(item.tax_mode.to_string())),
            discount_percentage: Some(Value::from(item.discount_percentage)),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A normalized line item: one product entry in an order or cart.
///
/// Values built by [`crate::normalize::normalize_line_item`] are guaranteed
/// finite and non-negative (except that `discount_percentage` may exceed 100).
/// Callers constructing one directly are expected to uphold the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Opaque caller reference, carried through untouched.
    #[serde(default)]
    pub product_id: Option<String>,

    /// Catalog price per unit.
    pub unit_price: f64,

    /// Units purchased.
    pub quantity: u32,

    /// Tax rate as a percentage (18.0 = 18%).
    pub tax_rate: f64,

    /// Whether `unit_price` already contains the tax.
    #[serde(default)]
    pub tax_mode: TaxMode,

    /// Percentage taken off the gross line amount.
    #[serde(default)]
    pub discount_percentage: f64,
}

impl LineItem {
    /// Creates a line item without a product reference.
    pub fn new(
        unit_price: f64,
        quantity: u32,
        tax_rate: f64,
        tax_mode: TaxMode,
        discount_percentage: f64,
    ) -> Self {
        LineItem {
            product_id: None,
            unit_price,
            quantity,
            tax_rate,
            tax_mode,
            discount_percentage,
        }
    }

    /// Attaches a product reference.
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Gross line amount (`unit_price × quantity`), before discount or tax.
    #[inline]
    pub fn gross(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

// =============================================================================
// Coercion
// =============================================================================

/// Numeric fields of a line item that the normalizer may default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum LineField {
    UnitPrice,
    Quantity,
    TaxRate,
    DiscountPercentage,
}

impl LineField {
    /// Wire name of the field.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineField::UnitPrice => "unitPrice",
            LineField::Quantity => "quantity",
            LineField::TaxRate => "taxRate",
            LineField::DiscountPercentage => "discountPercentage",
        }
    }
}

impl fmt::Display for LineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was not taken as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum CoercionReason {
    /// Absent or `null`.
    Missing,
    /// Present but not a finite number.
    Malformed,
    /// A finite number below zero or above the field's limit.
    OutOfRange,
    /// A fractional quantity; the fraction was dropped.
    Truncated,
}

impl fmt::Display for CoercionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionReason::Missing => write!(f, "missing"),
            CoercionReason::Malformed => write!(f, "malformed"),
            CoercionReason::OutOfRange => write!(f, "out of range"),
            CoercionReason::Truncated => write!(f, "truncated"),
        }
    }
}

/// Record of one field the normalizer could not take as given.
///
/// Every reason except [`CoercionReason::Truncated`] means the field was
/// replaced with zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Coercion {
    pub field: LineField,
    pub reason: CoercionReason,
}

/// Output of normalization: the usable item plus what had to be defaulted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Normalized {
    pub item: LineItem,
    pub coercions: Vec<Coercion>,
}

impl Normalized {
    /// True when every numeric field was read as given.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.coercions.is_empty()
    }

    /// Returns the coercion recorded for `field`, if any.
    pub fn coercion_for(&self, field: LineField) -> Option<CoercionReason> {
        self.coercions
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.reason)
    }
}

// =============================================================================
// Line Result
// =============================================================================

/// Published pricing of a single line, every field rounded independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineResult {
    /// Gross amount: unit price × quantity.
    pub line_total: f64,
    /// Tax added (EXCLUSIVE) or contained (INCLUSIVE).
    pub tax_amount: f64,
    /// Amount taken off by the discount percentage.
    pub discount_amount: f64,
    /// Gross minus discount; the amount tax is extracted from or added to.
    pub base_price: f64,
    /// What the customer pays for this line.
    pub final_total: f64,
}

// =============================================================================
// Order Totals
// =============================================================================

/// Published totals of an order, every field rounded independently.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Σ gross line amounts (undiscounted, tax as listed).
    pub subtotal: f64,
    /// Σ line tax amounts.
    pub tax: f64,
    /// Amount payable.
    pub total: f64,
    /// Σ line discount amounts.
    pub total_discount: f64,
}

/// Per-line results and order totals from a single pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedOrder {
    pub lines: Vec<LineResult>,
    pub totals: OrderTotals,
    pub policy: TotalPolicy,
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Error Types
//!
//! The pricing engine itself never fails: bad input is coerced to zero.
//! The only errors in this crate come from the opt-in [`crate::validation`]
//! module, for callers that want to reject a cart instead of pricing it.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  compute_order_totals()   ── never errors ──►  OrderTotals              │
//! │                                                                         │
//! │  validation::validate_*() ── ValidationError ──► caller decides         │
//! │                                                  (HTTP 422, CLI exit 1) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Each variant names the offending field using its wire (camelCase) name so
/// messages can be shown to whoever supplied the cart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is absent or null.
    #[error("{field} is required")]
    Required { field: String },

    /// The field is present but could not be read as a finite number.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The value is below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// The value is outside the accepted range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// The value is not one of the accepted labels.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

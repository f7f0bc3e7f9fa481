//! # Error Types
//!
//! Domain-specific error types for framing-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  framing-core errors (this file)                                       │
//! │  ├── CoreError        - Order rule violations                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  framing-service errors (separate crate)                               │
//! │  ├── ServiceError     - Catalog/template/config failures               │
//! │  └── ApiError         - What a JSON endpoint returns (serialized)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Price calculation never fails for numeric input. Missing dimensions
//! resolve to 0 and missing prices yield zero-cost lines, so a live
//! preview always has something to show.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Order-level business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An itemized frame order must contain at least one line item.
    #[error("Frame order must contain at least one line item")]
    EmptyOrder,

    /// The order has reached a terminal status and is read-only.
    ///
    /// ## When This Occurs
    /// - Editing a frame order on a delivered (`Utlämnad`) order
    /// - Deleting the order or one of its line items after delivery
    #[error("Order {order_number} is {status} and can no longer be changed")]
    OrderLocked {
        order_number: String,
        status: String,
    },

    /// The requested status change is not allowed by the order lifecycle.
    #[error("Cannot move order from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// A frame order id was not found on the customer order.
    #[error("Frame order not found: {0}")]
    FrameNotFound(String),

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A stored order number does not follow the `YYYY-NNNN` format.
    #[error("Invalid order number: {0}")]
    InvalidOrderNumber(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before anything is handed to a persistence collaborator.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OrderLocked {
            order_number: "2025-0042".to_string(),
            status: "Utlämnad".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Order 2025-0042 is Utlämnad and can no longer be changed"
        );

        assert_eq!(
            CoreError::EmptyOrder.to_string(),
            "Frame order must contain at least one line item"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "category".to_string(),
        };
        assert_eq!(err.to_string(), "category is required");

        let err = ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        };
        assert_eq!(err.to_string(), "sku must be at most 50 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

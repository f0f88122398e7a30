//! # Error Types
//!
//! Domain-specific error types for sportline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sportline-core (this file)                                            │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  sportline-db                                                          │
//! │  ├── DbError          - Database failures (incl. LockTimeout)          │
//! │  └── ServiceError     - CoreError | DbError                            │
//! │                                                                         │
//! │  apps/api                                                              │
//! │  └── ApiError         - { code, message } + HTTP status               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the order, sale and inventory flows.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No order with this id.
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    /// No sale with this id.
    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// No inventory record for the (product, branch) pair.
    ///
    /// ## When This Occurs
    /// - Dispatching an order from a branch that never stocked the product
    /// - Returning stock to a branch with no record for the product
    #[error("No inventory for product {product_id} at branch {branch_id}")]
    InventoryNotFound { product_id: i64, branch_id: i64 },

    /// Requested quantity exceeds what the branch has available.
    ///
    /// ## User Workflow
    /// ```text
    /// PUT /orders/7/status { PROCESSING, branch 5 }
    ///      │
    ///      ▼
    /// lock inventory(product 1, branch 5): available = 1
    ///      │
    ///      ▼
    /// InsufficientStock { product 1, available 1, requested 2 }
    ///      │
    ///      ▼
    /// rollback, order stays PENDING
    /// ```
    #[error(
        "Insufficient stock for product {product_id} at branch {branch_id}: available {available}, requested {requested} (short by {short})",
        short = .requested - .available
    )]
    InsufficientStock {
        product_id: i64,
        branch_id: i64,
        available: i64,
        requested: i64,
    },

    /// The entity is not in a state that allows the requested change.
    #[error("{0}")]
    InvalidTransition(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Units missing to satisfy an `InsufficientStock` request.
    pub fn shortfall(&self) -> Option<i64> {
        match self {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => Some(requested - available),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any side effect runs.
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

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. a price with three decimals).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {}", .allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A collection that needs at least one element is empty.
    #[error("{field} must contain at least one item")]
    Empty { field: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

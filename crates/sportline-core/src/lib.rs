//! # sportline-core: Pure Business Logic for Sportline
//!
//! Domain rules for online orders, POS sales and branch inventory, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sportline Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apps/api (axum REST server)                    │   │
//! │  │    POST /orders, PUT /orders/{id}/status, POST /sales, ...      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            sportline-db (ledger, repositories, services)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ sportline-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌────────────┐       │   │
//! │  │   │  types   │ │ pricing  │ │ lifecycle │ │ validation │       │   │
//! │  │   │  Order   │ │ 13% VAT  │ │ (from,to) │ │ lines,     │       │   │
//! │  │   │  Sale    │ │ shipping │ │ → effect  │ │ shipping   │       │   │
//! │  │   └──────────┘ └──────────┘ └───────────┘ └────────────┘       │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Orders, sales, inventory records, statuses, roles
//! - [`money`] - Integer-cent money
//! - [`pricing`] - Order and sale totals
//! - [`lifecycle`] - Order status transition table
//! - [`validation`] - Input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use sportline_core::lifecycle::{plan_transition, InventoryEffect};
//! use sportline_core::OrderStatus;
//!
//! let t = plan_transition(OrderStatus::Processing, OrderStatus::Cancelled).unwrap();
//! assert_eq!(t.effect, InventoryEffect::Release);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum product lines in a single order or sale.
pub const MAX_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against typos such as 1000 instead of 10 at the register.
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Maximum unit price of a single line, in cents (1,000,000.00).
///
/// With [`MAX_LINES`] and [`MAX_LINE_QUANTITY`] this keeps every subtotal
/// far inside `i64`.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;

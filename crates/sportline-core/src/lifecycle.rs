//! # Order Lifecycle
//!
//! The order status state machine as data: every allowed `(from, to)` pair
//! and the inventory effect the transition carries.
//!
//! ## Transition Table
//! ```text
//! ┌──────────────┬──────────────┬───────────────────────────────────────────┐
//! │ from         │ to           │ inventory effect                          │
//! ├──────────────┼──────────────┼───────────────────────────────────────────┤
//! │ PENDING      │ PROCESSING   │ Reserve: lock + decrement every line at   │
//! │              │              │ the dispatch branch, all or nothing       │
//! │ PENDING      │ CANCELLED    │ None                                      │
//! │ PROCESSING   │ SHIPPED      │ None                                      │
//! │ PROCESSING   │ CANCELLED    │ Release: increment every line at the      │
//! │              │              │ order's dispatch branch                   │
//! │ SHIPPED      │ DELIVERED    │ None (stamps delivered_at)                │
//! └──────────────┴──────────────┴───────────────────────────────────────────┘
//! DELIVERED and CANCELLED are terminal. Anything not listed is rejected.
//! ```
//!
//! The database layer executes the effect; this module only decides.

use crate::error::{CoreError, CoreResult};
use crate::types::OrderStatus;

/// Stock side effect of a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryEffect {
    /// Status update only.
    None,
    /// Take the order's quantities out of the dispatch branch.
    Reserve,
    /// Put the order's quantities back into the dispatch branch.
    Release,
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub effect: InventoryEffect,
}

impl Transition {
    /// Whether this transition needs a dispatch branch to run.
    pub const fn requires_dispatch_branch(&self) -> bool {
        matches!(self.effect, InventoryEffect::Reserve | InventoryEffect::Release)
    }

    /// Whether the actual-delivery timestamp must be stamped.
    pub const fn stamps_delivery(&self) -> bool {
        matches!(self.to, OrderStatus::Delivered)
    }
}

const fn row(from: OrderStatus, to: OrderStatus, effect: InventoryEffect) -> Transition {
    Transition { from, to, effect }
}

/// Every allowed transition.
pub const TRANSITIONS: &[Transition] = &[
    row(OrderStatus::Pending, OrderStatus::Processing, InventoryEffect::Reserve),
    row(OrderStatus::Pending, OrderStatus::Cancelled, InventoryEffect::None),
    row(OrderStatus::Processing, OrderStatus::Shipped, InventoryEffect::None),
    row(OrderStatus::Processing, OrderStatus::Cancelled, InventoryEffect::Release),
    row(OrderStatus::Shipped, OrderStatus::Delivered, InventoryEffect::None),
];

/// Looks up the transition from `from` to `to`.
///
/// ## Errors
/// * `InvalidTransition` - `from` is terminal, or the pair is not in the table
///
/// ## Example
/// ```rust
/// use sportline_core::lifecycle::{plan_transition, InventoryEffect};
/// use sportline_core::types::OrderStatus;
///
/// let t = plan_transition(OrderStatus::Pending, OrderStatus::Processing).unwrap();
/// assert_eq!(t.effect, InventoryEffect::Reserve);
/// assert!(plan_transition(OrderStatus::Cancelled, OrderStatus::Pending).is_err());
/// ```
pub fn plan_transition(from: OrderStatus, to: OrderStatus) -> CoreResult<Transition> {
    match from {
        OrderStatus::Delivered => {
            return Err(CoreError::InvalidTransition(
                "Cannot modify a delivered order".to_string(),
            ))
        }
        OrderStatus::Cancelled => {
            return Err(CoreError::InvalidTransition(
                "Cannot modify a cancelled order".to_string(),
            ))
        }
        _ => {}
    }

    TRANSITIONS
        .iter()
        .copied()
        .find(|t| t.from == from && t.to == to)
        .ok_or_else(|| {
            CoreError::InvalidTransition(format!(
                "Cannot change order status from {} to {}",
                from, to
            ))
        })
}

/// Customer-facing tracking description for an order entering `status`.
pub const fn tracking_description(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Order received",
        OrderStatus::Processing => "Order being prepared",
        OrderStatus::Shipped => "Order on its way",
        OrderStatus::Delivered => "Order delivered",
        OrderStatus::Cancelled => "Order cancelled",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

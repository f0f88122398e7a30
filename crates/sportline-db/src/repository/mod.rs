//! # Repository Module
//!
//! SQL for each table, kept out of the services.
//!
//! ## Two Kinds of Methods
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  &self methods            → run on the pool (read models, listings)    │
//! │  fn(conn: &mut SqliteConnection, ...)                                   │
//! │                           → run inside the caller's transaction        │
//! │                             (every write that must commit atomically)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`OrderRepository`](order::OrderRepository) - order headers and lines
//! - [`TrackingRepository`](tracking::TrackingRepository) - order status history
//! - [`SaleRepository`](sale::SaleRepository) - POS sales and lines
//! - [`AuditRepository`](audit::AuditRepository) - audit log

pub mod audit;
pub mod order;
pub mod sale;
pub mod tracking;

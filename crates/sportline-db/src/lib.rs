//! # sportline-db: Persistence and Transactions for Sportline
//!
//! SQLite storage for orders, POS sales, branch inventory and the audit log,
//! plus the transactional services that keep them consistent.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sportline Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (PUT /orders/{id}/status)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   sportline-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌───────────────┐   │   │
//! │  │   │   Services    │──►│  Repositories  │   │  Migrations   │   │   │
//! │  │   │ OrderService  │   │ Order/Sale/    │   │  (embedded)   │   │   │
//! │  │   │ SaleService   │   │ Tracking/Audit │   │               │   │   │
//! │  │   │ InventorySvc  │──►│ InventoryLedger│   │ 001_init.sql  │   │   │
//! │  │   └───────┬───────┘   └────────────────┘   └───────────────┘   │   │
//! │  │           │  one transaction per command                       │   │
//! │  │   ┌───────▼───────┐                                            │   │
//! │  │   │   Database    │  SqlitePool, bounded lock wait             │   │
//! │  │   └───────────────┘                                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - `DbError` and `ServiceError`
//! - [`ledger`] - The only writer of inventory counts
//! - [`repository`] - Orders, tracking, sales, audit log
//! - [`service`] - Transactional commands
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sportline_db::{Database, DbConfig, OrderService, StatusChange};
//! use sportline_core::OrderStatus;
//!
//! let db = Database::new(DbConfig::new("sportline.db")).await?;
//! let orders = OrderService::new(db.clone());
//!
//! orders.change_status(StatusChange {
//!     order_id: 7,
//!     target: OrderStatus::Processing,
//!     dispatch_branch_id: Some(5),
//!     actor_id: Some(1),
//! }).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ServiceError, ServiceResult};
pub use ledger::{InventoryLedger, StockMovement};
pub use pool::{Database, DbConfig};

pub use repository::audit::AuditRepository;
pub use repository::order::OrderRepository;
pub use repository::sale::SaleRepository;
pub use repository::tracking::TrackingRepository;

pub use service::inventory::{Adjustment, InventoryService};
pub use service::order::{OrderCreated, OrderService, StatusChange, StatusChanged};
pub use service::sale::SaleService;

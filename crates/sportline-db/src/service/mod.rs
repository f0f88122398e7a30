//! # Service Module
//!
//! Transactional commands. Each public command opens one transaction, runs
//! every read and write through it, and either commits or rolls back.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command(&self, input)                                                  │
//! │     │                                                                   │
//! │     ├── validate (pure, sportline-core) ──► ValidationError, no tx     │
//! │     │                                                                   │
//! │     ├── tx = db.begin()                                                 │
//! │     ├── result = apply(&mut tx, ...)   repositories + ledger           │
//! │     └── finish(tx, result)                                              │
//! │            Ok  ──► COMMIT                                               │
//! │            Err ──► ROLLBACK, warn!, return the original error          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`OrderService`](order::OrderService) - order checkout and lifecycle
//! - [`SaleService`](sale::SaleService) - POS sales
//! - [`InventoryService`](inventory::InventoryService) - manual stock adjustments

pub mod inventory;
pub mod order;
pub mod sale;

use sqlx::{Sqlite, Transaction};
use tracing::{error, warn};

use crate::error::ServiceResult;

/// Commits on success, rolls back on failure.
///
/// A rollback failure is logged; the caller still gets the original error.
pub(crate) async fn finish<T>(
    tx: Transaction<'static, Sqlite>,
    result: ServiceResult<T>,
    command: &'static str,
) -> ServiceResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            warn!(command, error = %err, "Command rejected, rolling back");
            if let Err(rollback_err) = tx.rollback().await {
                error!(command, error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

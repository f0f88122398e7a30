//! # Inventory Service
//!
//! Manual stock adjustments (receipts, shrinkage, corrections) and the
//! inventory read model. Every adjustment goes through the ledger, so an
//! `EXIT` can never drive a count below zero.

use sportline_core::validation::{validate_id, validate_quantity, validate_text};
use sportline_core::{AuditEntry, InventoryRecord, MovementKind};
use sqlx::SqliteConnection;
use tracing::{info, instrument};

use crate::error::ServiceResult;
use crate::ledger::{InventoryLedger, StockMovement};
use crate::pool::Database;
use crate::repository::audit::{AuditRepository, NewAuditEntry, MODULE_INVENTORY};
use crate::service::finish;

/// Most recent movements returned by [`InventoryService::movements`].
pub const MOVEMENT_HISTORY_LIMIT: i64 = 200;

/// A manual stock adjustment.
#[derive(Debug, Clone)]
pub struct Adjustment {
    pub product_id: i64,
    pub branch_id: i64,
    pub quantity: i64,
    pub kind: MovementKind,
    pub reason: String,
    pub actor_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    pub fn new(db: Database) -> Self {
        InventoryService { db }
    }

    /// Applies one adjustment and records it in the audit log.
    ///
    /// ## Errors
    /// * `InventoryNotFound` - the pair was never stocked
    /// * `InsufficientStock` - an `EXIT` larger than what is available
    #[instrument(skip(self, adjustment), fields(
        product_id = adjustment.product_id,
        branch_id = adjustment.branch_id,
        kind = adjustment.kind.as_str(),
    ))]
    pub async fn adjust(&self, adjustment: Adjustment) -> ServiceResult<StockMovement> {
        validate_id("product_id", adjustment.product_id)?;
        validate_id("branch_id", adjustment.branch_id)?;
        validate_quantity("quantity", adjustment.quantity)?;
        validate_text("reason", &adjustment.reason, 255)?;

        let mut tx = self.db.begin().await?;
        let result = Self::apply(&mut tx, &adjustment).await;
        let movement = finish(tx, result, "inventory.adjust").await?;

        info!(delta = movement.delta, available = movement.available, "Stock adjusted");
        Ok(movement)
    }

    async fn apply(conn: &mut SqliteConnection, adj: &Adjustment) -> ServiceResult<StockMovement> {
        let movement = match adj.kind {
            MovementKind::Entry => {
                InventoryLedger::increment(conn, adj.product_id, adj.branch_id, adj.quantity).await?
            }
            MovementKind::Exit => {
                let lock = InventoryLedger::lock_and_read(conn, adj.product_id, adj.branch_id).await?;
                InventoryLedger::decrement(conn, lock, adj.quantity).await?
            }
        };

        AuditRepository::record_best_effort(
            conn,
            NewAuditEntry {
                actor_id: adj.actor_id,
                module: MODULE_INVENTORY,
                action: adj.kind.as_str(),
                description: format!(
                    "{} of {} units, product {} at branch {}: {} (now {})",
                    adj.kind.as_str(),
                    adj.quantity,
                    adj.product_id,
                    adj.branch_id,
                    adj.reason.trim(),
                    movement.available
                ),
            },
        )
        .await;

        Ok(movement)
    }

    /// Every record, ordered by branch then product.
    pub async fn list(&self) -> ServiceResult<Vec<InventoryRecord>> {
        Ok(self.db.inventory().list().await?)
    }

    pub async fn list_by_branch(&self, branch_id: i64) -> ServiceResult<Vec<InventoryRecord>> {
        validate_id("branch_id", branch_id)?;
        Ok(self.db.inventory().list_by_branch(branch_id).await?)
    }

    /// Recorded adjustments, newest first.
    pub async fn movements(&self) -> ServiceResult<Vec<AuditEntry>> {
        Ok(self
            .db
            .audit()
            .list_by_module(MODULE_INVENTORY, MOVEMENT_HISTORY_LIMIT)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::pool::DbConfig;
    use sportline_core::{CoreError, StockLevel};

    async fn setup() -> InventoryService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.inventory().upsert_record(1, 2, 3, 5, 10).await.unwrap();
        InventoryService::new(db)
    }

    fn adjustment(kind: MovementKind, quantity: i64) -> Adjustment {
        Adjustment {
            product_id: 1,
            branch_id: 2,
            quantity,
            kind,
            reason: "cycle count".to_string(),
            actor_id: Some(4),
        }
    }

    #[tokio::test]
    async fn test_entry_ignores_max_threshold() {
        let service = setup().await;

        let movement = service.adjust(adjustment(MovementKind::Entry, 20)).await.unwrap();

        assert_eq!(movement.delta, 20);
        assert_eq!(movement.available, 23);
    }

    #[tokio::test]
    async fn test_exit_cannot_go_negative() {
        let service = setup().await;

        let result = service.adjust(adjustment(MovementKind::Exit, 4)).await;
        assert!(matches!(
            result,
            Err(ServiceError::Core(CoreError::InsufficientStock {
                available: 3,
                requested: 4,
                ..
            }))
        ));

        let movement = service.adjust(adjustment(MovementKind::Exit, 3)).await.unwrap();
        assert_eq!(movement.available, 0);
    }

    #[tokio::test]
    async fn test_adjustments_are_listed_as_movements() {
        let service = setup().await;
        service.adjust(adjustment(MovementKind::Entry, 2)).await.unwrap();
        service.adjust(adjustment(MovementKind::Exit, 1)).await.unwrap();

        let movements = service.movements().await.unwrap();

        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].action, "EXIT");
        assert!(movements[0].description.contains("cycle count"));
        assert_eq!(movements[1].action, "ENTRY");
    }

    #[tokio::test]
    async fn test_rejected_adjustment_leaves_no_movement() {
        let service = setup().await;

        assert!(service.adjust(adjustment(MovementKind::Exit, 50)).await.is_err());
        let mut blank = adjustment(MovementKind::Entry, 1);
        blank.reason = " ".to_string();
        assert!(service.adjust(blank).await.is_err());

        assert!(service.movements().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_branch_carries_stock_level() {
        let service = setup().await;

        let records = service.list_by_branch(2).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stock_level(), StockLevel::Low);
        assert!(service.list_by_branch(7).await.unwrap().is_empty());
    }
}

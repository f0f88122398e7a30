//! # Order Service
//!
//! Checkout and the order status lifecycle.
//!
//! ## Status Change Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   │                                                                     │
//! │   ├─ lock order header ─────────────── missing ──► OrderNotFound        │
//! │   ├─ plan_transition(current, target) ─ illegal ──► InvalidTransition   │
//! │   ├─ resolve dispatch branch ─────────── none ────► ValidationError     │
//! │   ├─ Reserve / Release at the branch ── short ────► InsufficientStock   │
//! │   ├─ UPDATE orders (status, branch, delivered_at)                       │
//! │   ├─ INSERT tracking_events (one per transition)                        │
//! │   └─ audit (best effort)                                                │
//! │  COMMIT                        any error above ──► ROLLBACK, no change  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sportline_core::lifecycle::{plan_transition, tracking_description, InventoryEffect, Transition};
use sportline_core::pricing::{order_totals, OrderTotals};
use sportline_core::validation::{validate_id, validate_lines, validate_shipping};
use sportline_core::{
    CoreError, NewOrder, Order, OrderDetail, OrderStatus, TrackingEvent, ValidationError,
};
use sqlx::SqliteConnection;
use tracing::{info, instrument};

use crate::error::ServiceResult;
use crate::ledger::InventoryLedger;
use crate::pool::Database;
use crate::repository::audit::{AuditRepository, NewAuditEntry, MODULE_ORDERS};
use crate::repository::order::OrderRepository;
use crate::repository::tracking::TrackingRepository;
use crate::service::finish;

/// Result of a successful checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderCreated {
    pub order_id: i64,
    pub totals: OrderTotals,
}

/// A requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub order_id: i64,
    pub target: OrderStatus,
    /// Branch that fulfils the order. Falls back to the branch stored on the
    /// order when absent.
    pub dispatch_branch_id: Option<i64>,
    pub actor_id: Option<i64>,
}

/// Result of a committed status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChanged {
    pub order_id: i64,
    pub previous: OrderStatus,
    pub current: OrderStatus,
    pub dispatch_branch_id: Option<i64>,
}

/// Order checkout, reads, and lifecycle transitions.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
}

impl OrderService {
    pub fn new(db: Database) -> Self {
        OrderService { db }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Creates a `PENDING` order with its lines and first tracking event.
    ///
    /// No stock is touched: inventory is reserved when the order moves to
    /// `PROCESSING` and a dispatch branch is known.
    #[instrument(skip(self, order), fields(client_id = order.client_id))]
    pub async fn create(&self, order: NewOrder, actor_id: Option<i64>) -> ServiceResult<OrderCreated> {
        validate_id("client_id", order.client_id)?;
        validate_shipping(&order.shipping)?;
        validate_lines(&order.lines)?;

        let totals = order_totals(&order.lines)?;

        let mut tx = self.db.begin().await?;
        let result = Self::insert_order(&mut tx, &order, &totals, actor_id).await;
        let order_id = finish(tx, result, "order.create").await?;

        info!(order_id, total = %totals.total, "Order created");
        Ok(OrderCreated { order_id, totals })
    }

    async fn insert_order(
        conn: &mut SqliteConnection,
        order: &NewOrder,
        totals: &OrderTotals,
        actor_id: Option<i64>,
    ) -> ServiceResult<i64> {
        let order_id = OrderRepository::insert(conn, order, totals, Utc::now()).await?;

        TrackingRepository::append(
            conn,
            order_id,
            OrderStatus::Pending,
            tracking_description(OrderStatus::Pending),
            None,
        )
        .await?;

        AuditRepository::record_best_effort(
            conn,
            NewAuditEntry {
                actor_id: actor_id.or(Some(order.client_id)),
                module: MODULE_ORDERS,
                action: "CREATE",
                description: format!(
                    "Order #{} created for client {}, total {}",
                    order_id, order.client_id, totals.total
                ),
            },
        )
        .await;

        Ok(order_id)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Header plus lines.
    pub async fn get_by_id(&self, order_id: i64) -> ServiceResult<OrderDetail> {
        let repo = self.db.orders();
        let order = repo
            .get_by_id(order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;
        let lines = repo.lines(order_id).await?;

        Ok(OrderDetail { order, lines })
    }

    /// A client's orders, newest first.
    pub async fn list_by_client(&self, client_id: i64) -> ServiceResult<Vec<Order>> {
        validate_id("client_id", client_id)?;
        Ok(self.db.orders().list_by_client(client_id).await?)
    }

    /// Tracking history of an order, newest first.
    pub async fn tracking(&self, order_id: i64) -> ServiceResult<Vec<TrackingEvent>> {
        if self.db.orders().get_by_id(order_id).await?.is_none() {
            return Err(CoreError::OrderNotFound(order_id).into());
        }
        Ok(self.db.tracking().list_for_order(order_id).await?)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Moves an order to `change.target`, applying the transition's stock
    /// effect in the same transaction.
    ///
    /// ## Errors
    /// * `OrderNotFound` - no such order
    /// * `InvalidTransition` - terminal order or pair not in the table
    /// * `Validation` - no dispatch branch resolvable for a stock transition
    /// * `InsufficientStock` - a line cannot be covered at the dispatch branch
    /// * `Db(LockTimeout)` - the order or an inventory row is locked elsewhere
    ///
    /// On any error the order, its tracking and the inventory are unchanged.
    #[instrument(skip(self), fields(order_id = change.order_id, target = %change.target))]
    pub async fn change_status(&self, change: StatusChange) -> ServiceResult<StatusChanged> {
        if let Some(branch_id) = change.dispatch_branch_id {
            validate_id("dispatch_branch_id", branch_id)?;
        }

        let mut tx = self.db.begin().await?;
        let result = Self::apply_change(&mut tx, &change).await;
        let changed = finish(tx, result, "order.change_status").await?;

        info!(
            order_id = changed.order_id,
            from = %changed.previous,
            to = %changed.current,
            dispatch_branch_id = changed.dispatch_branch_id,
            "Order status changed"
        );
        Ok(changed)
    }

    async fn apply_change(
        conn: &mut SqliteConnection,
        change: &StatusChange,
    ) -> ServiceResult<StatusChanged> {
        let order = OrderRepository::lock_for_update(conn, change.order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(change.order_id))?;

        let transition = plan_transition(order.status, change.target)?;
        let branch_id = resolve_dispatch_branch(&transition, change.dispatch_branch_id, &order)?;

        if let Some(branch_id) = branch_id {
            let items: Vec<(i64, i64)> = OrderRepository::lines_in_tx(conn, order.id)
                .await?
                .iter()
                .map(|line| (line.product_id, line.quantity))
                .collect();

            match transition.effect {
                InventoryEffect::Reserve => {
                    InventoryLedger::reserve(conn, branch_id, items).await?;
                }
                InventoryEffect::Release => {
                    InventoryLedger::release(conn, branch_id, items).await?;
                }
                InventoryEffect::None => {}
            }
        }

        let now = Utc::now();
        let stamped_branch = match transition.effect {
            InventoryEffect::Reserve => branch_id,
            _ => None,
        };
        OrderRepository::update_status(
            conn,
            order.id,
            transition.to,
            stamped_branch,
            transition.stamps_delivery().then_some(now),
            now,
        )
        .await?;

        let location = branch_id.map(|id| format!("Branch {id}"));
        TrackingRepository::append(
            conn,
            order.id,
            transition.to,
            tracking_description(transition.to),
            location.as_deref(),
        )
        .await?;

        AuditRepository::record_best_effort(
            conn,
            NewAuditEntry {
                actor_id: change.actor_id,
                module: MODULE_ORDERS,
                action: "STATUS_CHANGE",
                description: format!(
                    "Order #{} changed from {} to {}",
                    order.id, transition.from, transition.to
                ),
            },
        )
        .await;

        Ok(StatusChanged {
            order_id: order.id,
            previous: transition.from,
            current: transition.to,
            dispatch_branch_id: stamped_branch.or(order.dispatch_branch_id),
        })
    }
}

/// Branch whose stock a transition moves.
///
/// Reservations use the requested branch, then the one stored on the order.
/// Releases return stock where it was taken: the stored branch first.
fn resolve_dispatch_branch(
    transition: &Transition,
    requested: Option<i64>,
    order: &Order,
) -> Result<Option<i64>, ValidationError> {
    if !transition.requires_dispatch_branch() {
        return Ok(None);
    }

    let resolved = match transition.effect {
        InventoryEffect::Release => order.dispatch_branch_id.or(requested),
        _ => requested.or(order.dispatch_branch_id),
    };

    resolved
        .map(Some)
        .ok_or_else(|| ValidationError::required("dispatch_branch_id"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::pool::DbConfig;
    use sportline_core::{LineInput, Money, PaymentMethod, PaymentStatus, ShippingInfo};

    async fn setup() -> (Database, OrderService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ledger = db.inventory();
        ledger.upsert_record(1, 5, 10, 2, 50).await.unwrap();
        ledger.upsert_record(2, 5, 1, 2, 50).await.unwrap();
        ledger.upsert_record(3, 5, 4, 2, 50).await.unwrap();
        let service = OrderService::new(db.clone());
        (db, service)
    }

    fn new_order(lines: Vec<(i64, i64, i64)>) -> NewOrder {
        NewOrder {
            client_id: 42,
            shipping: ShippingInfo {
                address: "Av. Reforma 100".to_string(),
                city: "San Salvador".to_string(),
                country: "El Salvador".to_string(),
                phone: "+503 2222 0000".to_string(),
            },
            payment_method: PaymentMethod::CreditCard,
            lines: lines
                .into_iter()
                .map(|(product_id, quantity, cents)| LineInput {
                    product_id,
                    quantity,
                    unit_price: Money::from_cents(cents),
                })
                .collect(),
        }
    }

    fn change(order_id: i64, target: OrderStatus, branch: Option<i64>) -> StatusChange {
        StatusChange {
            order_id,
            target,
            dispatch_branch_id: branch,
            actor_id: Some(1),
        }
    }

    async fn available(db: &Database, product_id: i64, branch_id: i64) -> i64 {
        db.inventory()
            .get(product_id, branch_id)
            .await
            .unwrap()
            .unwrap()
            .available
    }

    #[tokio::test]
    async fn test_create_prices_order_and_records_tracking() {
        let (db, service) = setup().await;

        let created = service
            .create(new_order(vec![(1, 2, 1000)]), None)
            .await
            .unwrap();

        assert_eq!(created.totals.subtotal.cents(), 2000);
        assert_eq!(created.totals.tax.cents(), 260);
        assert_eq!(created.totals.shipping.cents(), 1000);
        assert_eq!(created.totals.total.to_string(), "32.60");

        let detail = service.get_by_id(created.order_id).await.unwrap();
        assert_eq!(detail.order.status, OrderStatus::Pending);
        assert_eq!(detail.order.payment_status, PaymentStatus::Pending);
        assert_eq!(detail.order.total_cents, 3260);
        assert_eq!(detail.lines.len(), 1);
        assert_eq!(detail.lines[0].line_total_cents, 2000);

        let events = service.tracking(created.order_id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].description, "Order received");

        // checkout never touches stock
        assert_eq!(available(&db, 1, 5).await, 10);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_before_writing() {
        let (db, service) = setup().await;

        let empty = service.create(new_order(vec![]), None).await;
        assert!(matches!(
            empty,
            Err(ServiceError::Core(CoreError::Validation(ValidationError::Empty { .. })))
        ));

        let zero_qty = service.create(new_order(vec![(1, 0, 1000)]), None).await;
        assert!(matches!(
            zero_qty,
            Err(ServiceError::Core(CoreError::Validation(_)))
        ));

        let mut no_city = new_order(vec![(1, 1, 1000)]);
        no_city.shipping.city = "  ".to_string();
        assert!(service.create(no_city, None).await.is_err());

        assert!(db.orders().list_by_client(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_client_newest_first() {
        let (_db, service) = setup().await;

        let first = service.create(new_order(vec![(1, 1, 500)]), None).await.unwrap();
        let second = service.create(new_order(vec![(1, 1, 700)]), None).await.unwrap();

        let orders = service.list_by_client(42).await.unwrap();
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second.order_id, first.order_id]);
    }

    #[tokio::test]
    async fn test_processing_reserves_stock_at_dispatch_branch() {
        let (db, service) = setup().await;
        let created = service
            .create(new_order(vec![(1, 2, 1000), (3, 1, 500)]), None)
            .await
            .unwrap();

        let changed = service
            .change_status(change(created.order_id, OrderStatus::Processing, Some(5)))
            .await
            .unwrap();

        assert_eq!(changed.previous, OrderStatus::Pending);
        assert_eq!(changed.current, OrderStatus::Processing);
        assert_eq!(changed.dispatch_branch_id, Some(5));
        assert_eq!(available(&db, 1, 5).await, 8);
        assert_eq!(available(&db, 3, 5).await, 3);

        let order = service.get_by_id(created.order_id).await.unwrap().order;
        assert_eq!(order.dispatch_branch_id, Some(5));
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_order_pending_and_stock_unchanged() {
        let (db, service) = setup().await;
        // product 1 is fine, product 2 has only 1 left
        let created = service
            .create(new_order(vec![(1, 3, 1000), (2, 2, 1000)]), None)
            .await
            .unwrap();

        let result = service
            .change_status(change(created.order_id, OrderStatus::Processing, Some(5)))
            .await;

        match result {
            Err(ServiceError::Core(err @ CoreError::InsufficientStock { .. })) => {
                assert_eq!(err.shortfall(), Some(1));
                assert!(err.to_string().contains("product 2"));
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let detail = service.get_by_id(created.order_id).await.unwrap();
        assert_eq!(detail.order.status, OrderStatus::Pending);
        assert_eq!(detail.order.dispatch_branch_id, None);
        assert_eq!(available(&db, 1, 5).await, 10);
        assert_eq!(available(&db, 2, 5).await, 1);
        assert_eq!(service.tracking(created.order_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_from_processing_restores_stock_exactly() {
        let (db, service) = setup().await;
        let created = service
            .create(new_order(vec![(1, 2, 1000)]), None)
            .await
            .unwrap();

        service
            .change_status(change(created.order_id, OrderStatus::Processing, Some(5)))
            .await
            .unwrap();
        assert_eq!(available(&db, 1, 5).await, 8);

        let events_before = service.tracking(created.order_id).await.unwrap().len();

        // body branch is ignored, stock goes back where it was taken
        let changed = service
            .change_status(change(created.order_id, OrderStatus::Cancelled, Some(6)))
            .await
            .unwrap();

        assert_eq!(changed.current, OrderStatus::Cancelled);
        assert_eq!(available(&db, 1, 5).await, 10);

        let events = service.tracking(created.order_id).await.unwrap();
        assert_eq!(events.len(), events_before + 1);
        assert_eq!(events[0].status, OrderStatus::Cancelled);
        assert_eq!(events[0].description, "Order cancelled");
    }

    #[tokio::test]
    async fn test_cancel_from_pending_touches_no_stock() {
        let (db, service) = setup().await;
        let created = service
            .create(new_order(vec![(1, 2, 1000)]), None)
            .await
            .unwrap();

        service
            .change_status(change(created.order_id, OrderStatus::Cancelled, None))
            .await
            .unwrap();

        assert_eq!(available(&db, 1, 5).await, 10);
    }

    #[tokio::test]
    async fn test_full_lifecycle_stamps_delivery() {
        let (_db, service) = setup().await;
        let created = service
            .create(new_order(vec![(1, 1, 1000)]), None)
            .await
            .unwrap();
        let id = created.order_id;

        for target in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            service.change_status(change(id, target, Some(5))).await.unwrap();
        }

        let order = service.get_by_id(id).await.unwrap().order;
        assert_eq!(order.status, OrderStatus::Delivered);
        assert!(order.delivered_at.is_some());

        let events = service.tracking(id).await.unwrap();
        let statuses: Vec<OrderStatus> = events.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                OrderStatus::Delivered,
                OrderStatus::Shipped,
                OrderStatus::Processing,
                OrderStatus::Pending,
            ]
        );
        assert!(events.windows(2).all(|w| w[0].recorded_at > w[1].recorded_at));
    }

    /// Tries every target on a terminal order and checks nothing moved.
    async fn assert_frozen(db: &Database, service: &OrderService, id: i64, message: &str) {
        let before = service.get_by_id(id).await.unwrap().order;
        let events_before = service.tracking(id).await.unwrap().len();
        let stock_before = available(db, 1, 5).await;

        for target in OrderStatus::ALL {
            let result = service.change_status(change(id, target, Some(5))).await;
            match result {
                Err(ServiceError::Core(CoreError::InvalidTransition(msg))) => {
                    assert_eq!(msg, message);
                }
                other => panic!("expected InvalidTransition for {target:?}, got {other:?}"),
            }
        }

        let after = service.get_by_id(id).await.unwrap().order;
        assert_eq!(after.status, before.status);
        assert_eq!(after.delivered_at, before.delivered_at);
        assert_eq!(after.dispatch_branch_id, before.dispatch_branch_id);
        assert_eq!(after.updated_at, before.updated_at);
        assert_eq!(service.tracking(id).await.unwrap().len(), events_before);
        assert_eq!(available(db, 1, 5).await, stock_before);
    }

    #[tokio::test]
    async fn test_cancelled_orders_reject_every_transition_without_side_effects() {
        let (db, service) = setup().await;
        let created = service
            .create(new_order(vec![(1, 2, 1000)]), None)
            .await
            .unwrap();
        let id = created.order_id;

        service
            .change_status(change(id, OrderStatus::Cancelled, None))
            .await
            .unwrap();

        assert_frozen(&db, &service, id, "Cannot modify a cancelled order").await;
        assert_eq!(available(&db, 1, 5).await, 10);
        assert_eq!(
            service.get_by_id(id).await.unwrap().order.status,
            OrderStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_delivered_orders_reject_every_transition_without_side_effects() {
        let (db, service) = setup().await;
        let created = service
            .create(new_order(vec![(1, 2, 1000)]), None)
            .await
            .unwrap();
        let id = created.order_id;

        service.change_status(change(id, OrderStatus::Processing, Some(5))).await.unwrap();
        service.change_status(change(id, OrderStatus::Shipped, None)).await.unwrap();
        service.change_status(change(id, OrderStatus::Delivered, None)).await.unwrap();

        assert_frozen(&db, &service, id, "Cannot modify a delivered order").await;

        let order = service.get_by_id(id).await.unwrap().order;
        assert_eq!(order.status, OrderStatus::Delivered);
        assert!(order.delivered_at.is_some());
        assert_eq!(available(&db, 1, 5).await, 8);
        assert_eq!(service.tracking(id).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_concurrent_creates_all_succeed_with_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("orders.db")))
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for client_id in 1..=20 {
            let service = OrderService::new(db.clone());
            tasks.push(tokio::spawn(async move {
                let mut order = new_order(vec![(1, 1, 1000), (2, 2, 500)]);
                order.client_id = client_id;
                service.create(order, None).await
            }));
        }

        let mut ids = Vec::new();
        for task in tasks {
            match task.await.unwrap() {
                Ok(created) => ids.push(created.order_id),
                Err(e) => panic!("concurrent create failed: {e}"),
            }
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);

        let service = OrderService::new(db.clone());
        for client_id in 1..=20 {
            let orders = service.list_by_client(client_id).await.unwrap();
            assert_eq!(orders.len(), 1);
            assert_eq!(service.tracking(orders[0].id).await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_shipped_order_cannot_be_cancelled() {
        let (db, service) = setup().await;
        let created = service
            .create(new_order(vec![(1, 2, 1000)]), None)
            .await
            .unwrap();
        let id = created.order_id;

        service.change_status(change(id, OrderStatus::Processing, Some(5))).await.unwrap();
        service.change_status(change(id, OrderStatus::Shipped, None)).await.unwrap();

        let result = service.change_status(change(id, OrderStatus::Cancelled, None)).await;
        assert!(matches!(
            result,
            Err(ServiceError::Core(CoreError::InvalidTransition(_)))
        ));
        assert_eq!(available(&db, 1, 5).await, 8);
    }

    #[tokio::test]
    async fn test_processing_without_branch_is_rejected() {
        let (_db, service) = setup().await;
        let created = service
            .create(new_order(vec![(1, 1, 1000)]), None)
            .await
            .unwrap();

        let result = service
            .change_status(change(created.order_id, OrderStatus::Processing, None))
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Core(CoreError::Validation(ValidationError::Required { .. })))
        ));
    }

    #[tokio::test]
    async fn test_unknown_branch_is_inventory_not_found() {
        let (_db, service) = setup().await;
        let created = service
            .create(new_order(vec![(1, 1, 1000)]), None)
            .await
            .unwrap();

        let result = service
            .change_status(change(created.order_id, OrderStatus::Processing, Some(99)))
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Core(CoreError::InventoryNotFound {
                product_id: 1,
                branch_id: 99
            }))
        ));
    }

    #[tokio::test]
    async fn test_missing_order() {
        let (_db, service) = setup().await;

        assert!(matches!(
            service.get_by_id(404).await,
            Err(ServiceError::Core(CoreError::OrderNotFound(404)))
        ));
        assert!(matches!(
            service.tracking(404).await,
            Err(ServiceError::Core(CoreError::OrderNotFound(404)))
        ));
        assert!(matches!(
            service.change_status(change(404, OrderStatus::Shipped, None)).await,
            Err(ServiceError::Core(CoreError::OrderNotFound(404)))
        ));
    }

    #[tokio::test]
    async fn test_status_change_survives_audit_failure() {
        let (db, service) = setup().await;
        let created = service
            .create(new_order(vec![(1, 2, 1000)]), None)
            .await
            .unwrap();

        sqlx::query("DROP TABLE audit_log")
            .execute(db.pool())
            .await
            .unwrap();

        service
            .change_status(change(created.order_id, OrderStatus::Processing, Some(5)))
            .await
            .unwrap();

        assert_eq!(available(&db, 1, 5).await, 8);
    }

    #[tokio::test]
    async fn test_audit_entry_names_both_statuses() {
        let (db, service) = setup().await;
        let created = service
            .create(new_order(vec![(1, 1, 1000)]), None)
            .await
            .unwrap();

        service
            .change_status(change(created.order_id, OrderStatus::Cancelled, None))
            .await
            .unwrap();

        let entries = db.audit().list_by_module(MODULE_ORDERS, 10).await.unwrap();
        let expected = format!("Order #{} changed from PENDING to CANCELLED", created.order_id);
        assert!(entries.iter().any(|e| e.description == expected));
        assert_eq!(entries[0].action, "STATUS_CHANGE");
    }
}

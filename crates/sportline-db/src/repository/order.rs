//! # Order Repository
//!
//! Order headers and lines. Headers are never deleted and only change
//! through [`OrderRepository::update_status`].

use chrono::{DateTime, Utc};
use sportline_core::pricing::{line_total, OrderTotals};
use sportline_core::{NewOrder, Order, OrderLine, OrderStatus, PaymentStatus};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult, ServiceResult};

const ORDER_COLUMNS: &str = "id, client_id, shipping_address, shipping_city, shipping_country, \
     contact_phone, subtotal_cents, shipping_cents, tax_cents, total_cents, status, \
     payment_status, payment_method, dispatch_branch_id, estimated_delivery_at, delivered_at, \
     created_at, updated_at";

const LINE_COLUMNS: &str =
    "id, order_id, product_id, quantity, unit_price_cents, discount_cents, line_total_cents";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order header by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets the lines of an order in insertion order.
    pub async fn lines(&self, order_id: i64) -> DbResult<Vec<OrderLine>> {
        fetch_lines(&self.pool, order_id).await
    }

    /// Lists a client's orders, newest first.
    pub async fn list_by_client(&self, client_id: i64) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE client_id = ?1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    // =========================================================================
    // Transactional
    // =========================================================================

    /// Inserts the header and every line. Returns the new order id.
    pub async fn insert(
        conn: &mut SqliteConnection,
        order: &NewOrder,
        totals: &OrderTotals,
        now: DateTime<Utc>,
    ) -> ServiceResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (
                client_id, shipping_address, shipping_city, shipping_country, contact_phone,
                subtotal_cents, shipping_cents, tax_cents, total_cents,
                status, payment_status, payment_method,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11, ?12,
                ?13, ?13
            )
            RETURNING id
            "#,
        )
        .bind(order.client_id)
        .bind(order.shipping.address.trim())
        .bind(order.shipping.city.trim())
        .bind(order.shipping.country.trim())
        .bind(order.shipping.phone.trim())
        .bind(totals.subtotal.cents())
        .bind(totals.shipping.cents())
        .bind(totals.tax.cents())
        .bind(totals.total.cents())
        .bind(OrderStatus::Pending)
        .bind(PaymentStatus::Pending)
        .bind(order.payment_method)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        for line in &order.lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    order_id, product_id, quantity, unit_price_cents, discount_cents, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, 0, ?5)
                "#,
            )
            .bind(id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price.cents())
            .bind(line_total(line)?.cents())
            .execute(&mut *conn)
            .await?;
        }

        debug!(order_id = id, lines = order.lines.len(), "Order inserted");
        Ok(id)
    }

    /// Reads and write-locks an order header for the rest of the transaction.
    ///
    /// The no-op update takes SQLite's write lock before any inventory row is
    /// touched, so two transitions on the same order cannot interleave.
    pub async fn lock_for_update(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET updated_at = updated_at WHERE id = ?1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(order)
    }

    /// Lines of an order, read through the caller's transaction.
    pub async fn lines_in_tx(conn: &mut SqliteConnection, order_id: i64) -> DbResult<Vec<OrderLine>> {
        fetch_lines(&mut *conn, order_id).await
    }

    /// Writes a new status.
    ///
    /// `dispatch_branch_id` and `delivered_at` are only written when `Some`;
    /// `None` keeps the stored value.
    pub async fn update_status(
        conn: &mut SqliteConnection,
        id: i64,
        status: OrderStatus,
        dispatch_branch_id: Option<i64>,
        delivered_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = ?2,
                dispatch_branch_id = COALESCE(?3, dispatch_branch_id),
                delivered_at = COALESCE(?4, delivered_at),
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(dispatch_branch_id)
        .bind(delivered_at)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }
}

async fn fetch_lines<'e, E>(executor: E, order_id: i64) -> DbResult<Vec<OrderLine>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let lines = sqlx::query_as::<_, OrderLine>(&format!(
        "SELECT {LINE_COLUMNS} FROM order_lines WHERE order_id = ?1 ORDER BY id"
    ))
    .bind(order_id)
    .fetch_all(executor)
    .await?;

    Ok(lines)
}

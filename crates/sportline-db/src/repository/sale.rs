//! # Sale Repository
//!
//! POS sale headers and lines. A sale is rung up `ACTIVE` + `PAID` and can
//! only move to `VOIDED`.

use chrono::{DateTime, Utc};
use sportline_core::pricing::{line_total, SaleTotals};
use sportline_core::{NewSale, PaymentStatus, Sale, SaleLine, SaleStatus};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult, ServiceResult};

const SALE_COLUMNS: &str = "id, client_id, employee_id, branch_id, subtotal_cents, tax_cents, \
     total_cents, payment_status, status, created_at, updated_at";

/// Repository for POS sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    pub async fn lines(&self, sale_id: i64) -> DbResult<Vec<SaleLine>> {
        fetch_lines(&self.pool, sale_id).await
    }

    /// Active sales, newest first.
    pub async fn list_active(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE status = ?1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(SaleStatus::Active)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    // =========================================================================
    // Transactional
    // =========================================================================

    /// Inserts a paid, active sale with its lines. Returns the new sale id.
    pub async fn insert(
        conn: &mut SqliteConnection,
        sale: &NewSale,
        totals: &SaleTotals,
        now: DateTime<Utc>,
    ) -> ServiceResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (
                client_id, employee_id, branch_id,
                subtotal_cents, tax_cents, total_cents,
                payment_status, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            RETURNING id
            "#,
        )
        .bind(sale.client_id)
        .bind(sale.employee_id)
        .bind(sale.branch_id)
        .bind(totals.subtotal.cents())
        .bind(totals.tax.cents())
        .bind(totals.total.cents())
        .bind(PaymentStatus::Paid)
        .bind(SaleStatus::Active)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        for line in &sale.lines {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    sale_id, product_id, quantity, unit_price_cents, discount_cents, line_total_cents
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

        debug!(sale_id = id, branch_id = sale.branch_id, "Sale inserted");
        Ok(id)
    }

    /// Reads and write-locks a sale header.
    pub async fn lock_for_update(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "UPDATE sales SET updated_at = updated_at WHERE id = ?1 RETURNING {SALE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(sale)
    }

    pub async fn lines_in_tx(conn: &mut SqliteConnection, sale_id: i64) -> DbResult<Vec<SaleLine>> {
        fetch_lines(&mut *conn, sale_id).await
    }

    /// Voids a sale and its payment.
    pub async fn mark_voided(
        conn: &mut SqliteConnection,
        id: i64,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE sales SET status = ?2, payment_status = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(SaleStatus::Voided)
        .bind(PaymentStatus::Voided)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }
}

async fn fetch_lines<'e, E>(executor: E, sale_id: i64) -> DbResult<Vec<SaleLine>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let lines = sqlx::query_as::<_, SaleLine>(
        "SELECT id, sale_id, product_id, quantity, unit_price_cents, discount_cents, \
         line_total_cents FROM sale_lines WHERE sale_id = ?1 ORDER BY id",
    )
    .bind(sale_id)
    .fetch_all(executor)
    .await?;

    Ok(lines)
}

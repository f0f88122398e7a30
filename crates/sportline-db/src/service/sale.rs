//! # Sale Service
//!
//! POS checkout and cancellation. Stock leaves the sale's branch in the same
//! transaction that records the sale, and comes back in the same transaction
//! that voids it.

use chrono::Utc;
use sportline_core::pricing::{sale_totals, SaleTotals};
use sportline_core::validation::{validate_id, validate_lines};
use sportline_core::{CoreError, NewSale, Sale, SaleDetail, SaleStatus};
use sqlx::SqliteConnection;
use tracing::{info, instrument};

use crate::error::ServiceResult;
use crate::ledger::InventoryLedger;
use crate::pool::Database;
use crate::repository::audit::{AuditRepository, NewAuditEntry, MODULE_SALES};
use crate::repository::sale::SaleRepository;
use crate::service::finish;

#[derive(Debug, Clone)]
pub struct SaleService {
    db: Database,
}

impl SaleService {
    pub fn new(db: Database) -> Self {
        SaleService { db }
    }

    /// Records a paid sale and takes its quantities out of the branch.
    ///
    /// All lines are checked under lock before any is decremented; a single
    /// short line rejects the whole sale.
    #[instrument(skip(self, sale), fields(branch_id = sale.branch_id, employee_id = sale.employee_id))]
    pub async fn register(&self, sale: NewSale) -> ServiceResult<SaleDetail> {
        validate_id("branch_id", sale.branch_id)?;
        validate_id("employee_id", sale.employee_id)?;
        if let Some(client_id) = sale.client_id {
            validate_id("client_id", client_id)?;
        }
        validate_lines(&sale.lines)?;

        let totals = sale_totals(&sale.lines)?;

        let mut tx = self.db.begin().await?;
        let result = Self::insert_sale(&mut tx, &sale, &totals).await;
        let detail = finish(tx, result, "sale.register").await?;

        info!(sale_id = detail.sale.id, "Sale registered");
        Ok(detail)
    }

    async fn insert_sale(
        conn: &mut SqliteConnection,
        sale: &NewSale,
        totals: &SaleTotals,
    ) -> ServiceResult<SaleDetail> {
        InventoryLedger::reserve(
            conn,
            sale.branch_id,
            sale.lines.iter().map(|l| (l.product_id, l.quantity)),
        )
        .await?;

        let sale_id = SaleRepository::insert(conn, sale, totals, Utc::now()).await?;

        AuditRepository::record_best_effort(
            conn,
            NewAuditEntry {
                actor_id: Some(sale.employee_id),
                module: MODULE_SALES,
                action: "CREATE",
                description: format!(
                    "Sale #{} at branch {}, total {}",
                    sale_id, sale.branch_id, totals.total
                ),
            },
        )
        .await;

        Self::detail_in_tx(conn, sale_id).await
    }

    /// Header and lines as this transaction sees them.
    async fn detail_in_tx(conn: &mut SqliteConnection, sale_id: i64) -> ServiceResult<SaleDetail> {
        let sale = SaleRepository::lock_for_update(conn, sale_id)
            .await?
            .ok_or(CoreError::SaleNotFound(sale_id))?;
        let lines = SaleRepository::lines_in_tx(conn, sale_id).await?;

        Ok(SaleDetail { sale, lines })
    }

    /// Voids a sale and returns its quantities to the sale's branch.
    ///
    /// ## Errors
    /// * `SaleNotFound` - no such sale
    /// * `InvalidTransition` - the sale is already voided
    #[instrument(skip(self))]
    pub async fn cancel(&self, sale_id: i64, actor_id: Option<i64>) -> ServiceResult<SaleDetail> {
        let mut tx = self.db.begin().await?;
        let result = Self::void_sale(&mut tx, sale_id, actor_id).await;
        let detail = finish(tx, result, "sale.cancel").await?;

        info!(sale_id, "Sale cancelled");
        Ok(detail)
    }

    async fn void_sale(
        conn: &mut SqliteConnection,
        sale_id: i64,
        actor_id: Option<i64>,
    ) -> ServiceResult<SaleDetail> {
        let sale = SaleRepository::lock_for_update(conn, sale_id)
            .await?
            .ok_or(CoreError::SaleNotFound(sale_id))?;

        if sale.status == SaleStatus::Voided {
            return Err(CoreError::InvalidTransition("Sale is already cancelled".to_string()).into());
        }

        let lines = SaleRepository::lines_in_tx(conn, sale_id).await?;
        InventoryLedger::release(
            conn,
            sale.branch_id,
            lines.iter().map(|l| (l.product_id, l.quantity)),
        )
        .await?;

        SaleRepository::mark_voided(conn, sale_id, Utc::now()).await?;

        AuditRepository::record_best_effort(
            conn,
            NewAuditEntry {
                actor_id,
                module: MODULE_SALES,
                action: "CANCEL",
                description: format!("Sale #{} cancelled, stock returned to branch {}", sale_id, sale.branch_id),
            },
        )
        .await;

        Self::detail_in_tx(conn, sale_id).await
    }

    pub async fn get_by_id(&self, sale_id: i64) -> ServiceResult<SaleDetail> {
        let repo = self.db.sales();
        let sale = repo
            .get_by_id(sale_id)
            .await?
            .ok_or(CoreError::SaleNotFound(sale_id))?;
        let lines = repo.lines(sale_id).await?;

        Ok(SaleDetail { sale, lines })
    }

    /// Active sales, newest first.
    pub async fn list_active(&self) -> ServiceResult<Vec<Sale>> {
        Ok(self.db.sales().list_active().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::pool::DbConfig;
    use sportline_core::{LineInput, Money, PaymentStatus};

    async fn setup() -> (Database, SaleService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.inventory().upsert_record(1, 3, 5, 1, 20).await.unwrap();
        db.inventory().upsert_record(2, 3, 2, 1, 20).await.unwrap();
        let service = SaleService::new(db.clone());
        (db, service)
    }

    fn new_sale(lines: &[(i64, i64, i64)]) -> NewSale {
        NewSale {
            client_id: None,
            employee_id: 11,
            branch_id: 3,
            lines: lines
                .iter()
                .map(|&(product_id, quantity, cents)| LineInput {
                    product_id,
                    quantity,
                    unit_price: Money::from_cents(cents),
                })
                .collect(),
        }
    }

    async fn available(db: &Database, product_id: i64) -> i64 {
        db.inventory().get(product_id, 3).await.unwrap().unwrap().available
    }

    #[tokio::test]
    async fn test_register_decrements_and_prices_without_shipping() {
        let (db, service) = setup().await;

        let detail = service.register(new_sale(&[(1, 2, 1000), (2, 1, 500)])).await.unwrap();

        assert_eq!(detail.sale.subtotal_cents, 2500);
        assert_eq!(detail.sale.tax_cents, 325);
        assert_eq!(detail.sale.total_cents, 2825);
        assert_eq!(detail.sale.status, SaleStatus::Active);
        assert_eq!(detail.sale.payment_status, PaymentStatus::Paid);
        assert_eq!(detail.lines.len(), 2);
        assert_eq!(detail.lines[0].line_total_cents, 2000);
        assert_eq!(available(&db, 1).await, 3);

        let stored = service.get_by_id(detail.sale.id).await.unwrap();
        assert_eq!(stored.sale.total_cents, detail.sale.total_cents);
        assert_eq!(stored.sale.updated_at, detail.sale.updated_at);
        assert_eq!(stored.lines.len(), detail.lines.len());
        assert_eq!(available(&db, 2).await, 1);
    }

    #[tokio::test]
    async fn test_short_line_rejects_whole_sale() {
        let (db, service) = setup().await;

        let result = service.register(new_sale(&[(1, 2, 1000), (2, 3, 500)])).await;

        assert!(matches!(
            result,
            Err(ServiceError::Core(CoreError::InsufficientStock { product_id: 2, .. }))
        ));
        assert_eq!(available(&db, 1).await, 5);
        assert_eq!(available(&db, 2).await, 2);
        assert!(service.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_returns_stock_and_voids() {
        let (db, service) = setup().await;
        let sale = service.register(new_sale(&[(1, 4, 1000)])).await.unwrap().sale;
        assert_eq!(available(&db, 1).await, 1);

        let cancelled = service.cancel(sale.id, Some(2)).await.unwrap();

        assert_eq!(cancelled.sale.status, SaleStatus::Voided);
        assert_eq!(cancelled.sale.payment_status, PaymentStatus::Voided);
        assert_eq!(cancelled.lines.len(), 1);
        assert_eq!(available(&db, 1).await, 5);

        let stored = service.get_by_id(sale.id).await.unwrap();
        assert_eq!(stored.sale.status, SaleStatus::Voided);
        assert_eq!(stored.sale.updated_at, cancelled.sale.updated_at);
        assert!(service.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_twice_is_rejected_and_stock_returned_once() {
        let (db, service) = setup().await;
        let sale = service.register(new_sale(&[(1, 1, 1000)])).await.unwrap().sale;
        service.cancel(sale.id, None).await.unwrap();

        let again = service.cancel(sale.id, None).await;

        assert!(matches!(
            again,
            Err(ServiceError::Core(CoreError::InvalidTransition(_)))
        ));
        assert_eq!(available(&db, 1).await, 5);
    }

    #[tokio::test]
    async fn test_missing_sale() {
        let (_db, service) = setup().await;

        assert!(matches!(
            service.cancel(9, None).await,
            Err(ServiceError::Core(CoreError::SaleNotFound(9)))
        ));
        assert!(matches!(
            service.get_by_id(9).await,
            Err(ServiceError::Core(CoreError::SaleNotFound(9)))
        ));
    }

    #[tokio::test]
    async fn test_overpriced_line_rejected_before_stock_moves() {
        let (db, service) = setup().await;
        let mut sale = new_sale(&[(1, 2, 0)]);
        sale.lines[0].unit_price = Money::parse_decimal("unit_price", "92233720368547758").unwrap();

        let result = service.register(sale).await;

        assert!(matches!(result, Err(ServiceError::Core(CoreError::Validation(_)))));
        assert_eq!(available(&db, 1).await, 5);
        assert!(service.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_active_newest_first() {
        let (_db, service) = setup().await;
        let first = service.register(new_sale(&[(1, 1, 100)])).await.unwrap().sale;
        let second = service.register(new_sale(&[(1, 1, 100)])).await.unwrap().sale;

        let ids: Vec<i64> = service.list_active().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}

//! # Inventory Ledger
//!
//! Sole writer of the per-(product, branch) `available` counter.
//!
//! ## Lock, Check, Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  caller transaction                                                     │
//! │                                                                         │
//! │  lock_and_read(p, b) ──► UPDATE … SET available = available             │
//! │       │                  RETURNING available                            │
//! │       │                  (takes the write lock or waits for it)        │
//! │       ▼                                                                 │
//! │  LockedStock { p, b, available }                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  decrement(lock, qty) ──► qty > available? InsufficientStock            │
//! │                          else available -= qty, stamp updated_at        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `decrement` only accepts a [`LockedStock`], and `LockedStock` can only be
//! produced by `lock_and_read`, so the type system enforces "read under lock
//! before write". The token must be used inside the transaction that created
//! it.
//!
//! ## Multi-line Reservations
//! [`InventoryLedger::reserve`] aggregates quantities per product, locks every
//! row in product-id order, checks every row, and only then decrements. A
//! shortfall on any product aborts before the first write.

use chrono::Utc;
use sportline_core::{CoreError, InventoryRecord};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::{DbResult, ServiceResult};

const RECORD_COLUMNS: &str =
    "id, product_id, branch_id, available, min_stock, max_stock, updated_at";

/// Write-lock proof for one inventory row inside the current transaction.
#[derive(Debug)]
#[must_use = "a locked row should be decremented or the lock is wasted"]
pub struct LockedStock {
    product_id: i64,
    branch_id: i64,
    available: i64,
}

impl LockedStock {
    pub fn product_id(&self) -> i64 {
        self.product_id
    }

    pub fn branch_id(&self) -> i64 {
        self.branch_id
    }

    /// Quantity available when the lock was taken.
    pub fn available(&self) -> i64 {
        self.available
    }
}

/// Result of one ledger write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockMovement {
    pub product_id: i64,
    pub branch_id: i64,
    /// Signed change applied to `available`.
    pub delta: i64,
    /// `available` after the change.
    pub available: i64,
}

/// Repository-style handle for inventory reads plus the locked write API.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
}

impl InventoryLedger {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryLedger { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get(&self, product_id: i64, branch_id: i64) -> DbResult<Option<InventoryRecord>> {
        let record = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM inventory WHERE product_id = ?1 AND branch_id = ?2"
        ))
        .bind(product_id)
        .bind(branch_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// All inventory records, by branch then product.
    pub async fn list(&self) -> DbResult<Vec<InventoryRecord>> {
        let records = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM inventory ORDER BY branch_id, product_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn list_by_branch(&self, branch_id: i64) -> DbResult<Vec<InventoryRecord>> {
        let records = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM inventory WHERE branch_id = ?1 ORDER BY product_id"
        ))
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Creates or overwrites the record for a (product, branch) pair.
    ///
    /// Used when stocking a new branch; day-to-day changes go through the
    /// locked write API instead.
    pub async fn upsert_record(
        &self,
        product_id: i64,
        branch_id: i64,
        available: i64,
        min_stock: i64,
        max_stock: i64,
    ) -> DbResult<InventoryRecord> {
        debug!(product_id, branch_id, available, "Upserting inventory record");

        let record = sqlx::query_as::<_, InventoryRecord>(&format!(
            r#"
            INSERT INTO inventory (product_id, branch_id, available, min_stock, max_stock, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (product_id, branch_id) DO UPDATE SET
                available  = excluded.available,
                min_stock  = excluded.min_stock,
                max_stock  = excluded.max_stock,
                updated_at = excluded.updated_at
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(product_id)
        .bind(branch_id)
        .bind(available)
        .bind(min_stock)
        .bind(max_stock)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    // =========================================================================
    // Locked writes (inside a caller-owned transaction)
    // =========================================================================

    /// Write-locks the record and returns its available quantity.
    ///
    /// ## Errors
    /// * `CoreError::InventoryNotFound` - no record for the pair
    /// * `DbError::LockTimeout` - another transaction held the lock past the lock wait
    pub async fn lock_and_read(
        conn: &mut SqliteConnection,
        product_id: i64,
        branch_id: i64,
    ) -> ServiceResult<LockedStock> {
        let available: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE inventory SET available = available
            WHERE product_id = ?1 AND branch_id = ?2
            RETURNING available
            "#,
        )
        .bind(product_id)
        .bind(branch_id)
        .fetch_optional(&mut *conn)
        .await?;

        let available = available.ok_or(CoreError::InventoryNotFound {
            product_id,
            branch_id,
        })?;

        debug!(product_id, branch_id, available, "Inventory row locked");

        Ok(LockedStock {
            product_id,
            branch_id,
            available,
        })
    }

    /// Subtracts `quantity` from a locked row.
    ///
    /// ## Errors
    /// * `CoreError::InsufficientStock` - `quantity` exceeds the locked
    ///   available quantity; nothing is written
    pub async fn decrement(
        conn: &mut SqliteConnection,
        lock: LockedStock,
        quantity: i64,
    ) -> ServiceResult<StockMovement> {
        let insufficient = || CoreError::InsufficientStock {
            product_id: lock.product_id,
            branch_id: lock.branch_id,
            available: lock.available,
            requested: quantity,
        };

        if quantity > lock.available {
            return Err(insufficient().into());
        }

        let remaining: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE inventory
            SET available = available - ?3, updated_at = ?4
            WHERE product_id = ?1 AND branch_id = ?2 AND available >= ?3
            RETURNING available
            "#,
        )
        .bind(lock.product_id)
        .bind(lock.branch_id)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await?;

        let available = remaining.ok_or_else(insufficient)?;

        debug!(
            product_id = lock.product_id,
            branch_id = lock.branch_id,
            quantity,
            available,
            "Inventory decremented"
        );

        Ok(StockMovement {
            product_id: lock.product_id,
            branch_id: lock.branch_id,
            delta: -quantity,
            available,
        })
    }

    /// Adds `quantity` back to a record (returns, cancellations, receipts).
    ///
    /// The maximum threshold is advisory and never blocks an increment.
    ///
    /// ## Errors
    /// * `CoreError::InventoryNotFound` - no record for the pair
    pub async fn increment(
        conn: &mut SqliteConnection,
        product_id: i64,
        branch_id: i64,
        quantity: i64,
    ) -> ServiceResult<StockMovement> {
        let available: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE inventory
            SET available = available + ?3, updated_at = ?4
            WHERE product_id = ?1 AND branch_id = ?2
            RETURNING available
            "#,
        )
        .bind(product_id)
        .bind(branch_id)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await?;

        let available = available.ok_or(CoreError::InventoryNotFound {
            product_id,
            branch_id,
        })?;

        debug!(product_id, branch_id, quantity, available, "Inventory incremented");

        Ok(StockMovement {
            product_id,
            branch_id,
            delta: quantity,
            available,
        })
    }

    /// Takes every `(product_id, quantity)` out of `branch_id`, all or nothing.
    ///
    /// ## Algorithm
    /// 1. Sum quantities per product (an order may list a product twice)
    /// 2. Lock every row in ascending product id
    /// 3. Fail on the first shortfall, before any write
    /// 4. Decrement every row
    pub async fn reserve(
        conn: &mut SqliteConnection,
        branch_id: i64,
        items: impl IntoIterator<Item = (i64, i64)>,
    ) -> ServiceResult<Vec<StockMovement>> {
        let wanted = aggregate(items);

        let mut locks = Vec::with_capacity(wanted.len());
        for (&product_id, &quantity) in &wanted {
            let lock = Self::lock_and_read(conn, product_id, branch_id).await?;
            if quantity > lock.available() {
                warn!(
                    product_id,
                    branch_id,
                    available = lock.available(),
                    requested = quantity,
                    "Reservation rejected, insufficient stock"
                );
                return Err(CoreError::InsufficientStock {
                    product_id,
                    branch_id,
                    available: lock.available(),
                    requested: quantity,
                }
                .into());
            }
            locks.push((lock, quantity));
        }

        let mut movements = Vec::with_capacity(locks.len());
        for (lock, quantity) in locks {
            movements.push(Self::decrement(conn, lock, quantity).await?);
        }

        Ok(movements)
    }

    /// Puts every `(product_id, quantity)` back into `branch_id`.
    pub async fn release(
        conn: &mut SqliteConnection,
        branch_id: i64,
        items: impl IntoIterator<Item = (i64, i64)>,
    ) -> ServiceResult<Vec<StockMovement>> {
        let mut movements = Vec::new();
        for (product_id, quantity) in aggregate(items) {
            movements.push(Self::increment(conn, product_id, branch_id, quantity).await?);
        }
        Ok(movements)
    }
}

/// Sums quantities per product, ordered by product id.
fn aggregate(items: impl IntoIterator<Item = (i64, i64)>) -> BTreeMap<i64, i64> {
    let mut totals = BTreeMap::new();
    for (product_id, quantity) in items {
        *totals.entry(product_id).or_insert(0) += quantity;
    }
    totals
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Audit Repository
//!
//! Fire-and-forget audit log. A failed audit write is logged and swallowed;
//! it never undoes the business change it describes.
//!
//! ## Best-Effort Inside a Transaction
//! ```text
//! BEGIN
//!   ... order / inventory writes ...
//!   SAVEPOINT audit ──► INSERT audit_log ──► RELEASE
//!         │ failure
//!         └──► ROLLBACK TO audit, warn!, continue
//! COMMIT
//! ```
//! The savepoint keeps a failed insert from poisoning the outer transaction.

use chrono::Utc;
use sportline_core::AuditEntry;
use sqlx::{Connection, SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::error::DbResult;

/// Audit module names.
pub const MODULE_ORDERS: &str = "ORDERS";
pub const MODULE_SALES: &str = "SALES";
pub const MODULE_INVENTORY: &str = "INVENTORY";

/// An audit entry about to be written.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub actor_id: Option<i64>,
    pub module: &'static str,
    pub action: &'static str,
    pub description: String,
}

/// Repository for the audit log.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
}

impl AuditRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AuditRepository { pool }
    }

    /// Entries of one module, newest first.
    pub async fn list_by_module(&self, module: &str, limit: i64) -> DbResult<Vec<AuditEntry>> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT id, actor_id, module, action, description, recorded_at
            FROM audit_log
            WHERE module = ?1
            ORDER BY recorded_at DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(module)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Inserts an entry. Failures propagate.
    pub async fn insert(conn: &mut SqliteConnection, entry: &NewAuditEntry) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO audit_log (actor_id, module, action, description, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(entry.actor_id)
        .bind(entry.module)
        .bind(entry.action)
        .bind(&entry.description)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Inserts an entry under a savepoint; logs and swallows any failure.
    pub async fn record_best_effort(conn: &mut SqliteConnection, entry: NewAuditEntry) {
        let result: DbResult<i64> = async {
            let mut savepoint = conn.begin().await?;
            let id = Self::insert(&mut savepoint, &entry).await?;
            savepoint.commit().await?;
            Ok(id)
        }
        .await;

        match result {
            Ok(id) => debug!(audit_id = id, module = entry.module, action = entry.action, "Audit entry recorded"),
            Err(e) => warn!(
                error = %e,
                module = entry.module,
                action = entry.action,
                "Audit write failed, continuing"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn entry(description: &str) -> NewAuditEntry {
        NewAuditEntry {
            actor_id: Some(7),
            module: MODULE_INVENTORY,
            action: "ENTRY",
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_best_effort_entry_commits_with_outer_transaction() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        AuditRepository::record_best_effort(&mut tx, entry("first")).await;
        tx.commit().await.unwrap();

        let entries = db.audit().list_by_module(MODULE_INVENTORY, 10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "first");
        assert_eq!(entries[0].actor_id, Some(7));
    }

    #[tokio::test]
    async fn test_failed_audit_does_not_poison_transaction() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.inventory().upsert_record(1, 1, 5, 0, 0).await.unwrap();

        sqlx::query("DROP TABLE audit_log")
            .execute(db.pool())
            .await
            .unwrap();

        let mut tx = db.begin().await.unwrap();
        AuditRepository::record_best_effort(&mut tx, entry("lost")).await;
        sqlx::query("UPDATE inventory SET available = 9 WHERE product_id = 1")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let record = db.inventory().get(1, 1).await.unwrap().unwrap();
        assert_eq!(record.available, 9);
    }
}

//! # Tracking Repository
//!
//! Append-only status history shown to customers.
//!
//! ```text
//! order 42:  PENDING ──► PROCESSING ──► SHIPPED
//!               t0     <     t1      <    t2      (strictly increasing)
//! ```
//!
//! Timestamps per order are strictly increasing: if the clock has not moved
//! past the previous event (or went backwards), the new event is stamped one
//! millisecond after it.

use chrono::{DateTime, Duration, Utc};
use sportline_core::{OrderStatus, TrackingEvent};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

const EVENT_COLUMNS: &str = "id, order_id, status, description, location, recorded_at";

/// Repository for tracking events.
#[derive(Debug, Clone)]
pub struct TrackingRepository {
    pool: SqlitePool,
}

impl TrackingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TrackingRepository { pool }
    }

    /// Events of an order, newest first.
    pub async fn list_for_order(&self, order_id: i64) -> DbResult<Vec<TrackingEvent>> {
        let events = sqlx::query_as::<_, TrackingEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM tracking_events WHERE order_id = ?1 \
             ORDER BY recorded_at DESC, id DESC"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Appends one event inside the caller's transaction.
    pub async fn append(
        conn: &mut SqliteConnection,
        order_id: i64,
        status: OrderStatus,
        description: &str,
        location: Option<&str>,
    ) -> DbResult<TrackingEvent> {
        let last: Option<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT recorded_at FROM tracking_events WHERE order_id = ?1 ORDER BY id DESC LIMIT 1",
        )
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await?;

        let recorded_at = next_timestamp(last, Utc::now());

        let event = sqlx::query_as::<_, TrackingEvent>(&format!(
            r#"
            INSERT INTO tracking_events (order_id, status, description, location, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(status)
        .bind(description)
        .bind(location)
        .bind(recorded_at)
        .fetch_one(&mut *conn)
        .await?;

        debug!(order_id, status = %status, "Tracking event appended");
        Ok(event)
    }
}

fn next_timestamp(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match last {
        Some(prev) if now <= prev => prev + Duration::milliseconds(1),
        _ => now,
    }
}

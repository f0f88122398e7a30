//! # Sportline API
//!
//! REST server over the order lifecycle, POS sales and branch inventory.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  request ──► request_span ──► extractors ──► handler ──► service        │
//! │              (request id)     (Actor, ApiJson)           │              │
//! │                                                          ▼              │
//! │  response ◄── ApiError / Json ◄───────────── one SQLite transaction    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod telemetry;

use axum::Router;
use sportline_db::{Database, InventoryService, OrderService, SaleService};

/// Shared handler state. Every field shares the same connection pool.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub orders: OrderService,
    pub sales: SaleService,
    pub inventory: InventoryService,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState {
            orders: OrderService::new(db.clone()),
            sales: SaleService::new(db.clone()),
            inventory: InventoryService::new(db.clone()),
            db,
        }
    }
}

/// Builds the full application, as served in production.
pub fn build_app(state: AppState) -> Router {
    routes::router()
        .layer(axum::middleware::from_fn(middleware::request_span))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sportline_db::DbConfig;
    use tower::ServiceExt;

    async fn app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        build_app(AppState::new(db))
    }

    #[tokio::test]
    async fn test_health_reports_database() {
        let response = app()
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(middleware::REQUEST_ID_HEADER));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["database"], true);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = app()
            .await
            .oneshot(
                Request::get("/health")
                    .header(middleware::REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[middleware::REQUEST_ID_HEADER], "req-123");
    }

    #[tokio::test]
    async fn test_missing_order_is_404() {
        let response = app()
            .await
            .oneshot(Request::get("/orders/999").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_validation_error() {
        let response = app()
            .await
            .oneshot(Request::get("/sales/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

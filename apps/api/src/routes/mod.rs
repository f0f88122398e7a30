//! HTTP routes.
//!
//! ```text
//! GET  /health
//! POST /orders                  GET /orders/my-orders
//! GET  /orders/{id}             GET /orders/{id}/tracking
//! PUT  /orders/{id}/status
//! POST /sales    GET /sales     GET /sales/{id}     PUT /sales/{id}/cancel
//! GET  /inventory               GET /inventory/branch/{id}
//! POST /inventory/adjustments   GET /inventory/movements
//! ```

use axum::Router;

use crate::AppState;

pub mod health;
pub mod inventory;
pub mod orders;
pub mod sales;

/// Every route of the API, before state and middleware are attached.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(sales::router())
        .merge(inventory::router())
}

//! POS sale endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use sportline_core::{NewSale, Role, ValidationError};

use crate::dto::{to_line_inputs, CreateSaleRequest};
use crate::error::ApiResult;
use crate::extract::{Actor, ApiJson, ApiPath, ACTOR_ID_HEADER};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(register_sale))
        .route("/sales/{id}", get(get_sale))
        .route("/sales/{id}/cancel", put(cancel_sale))
}

/// Rings a sale at the caller's branch; the caller is the cashier.
pub async fn register_sale(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(body): ApiJson<CreateSaleRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let employee_id = actor
        .id
        .ok_or_else(|| ValidationError::required(ACTOR_ID_HEADER))?;
    let branch_id = actor
        .branch_id
        .or(body.branch_id)
        .ok_or_else(|| ValidationError::required("branch_id"))?;

    let sale = NewSale {
        client_id: body.client_id,
        employee_id,
        branch_id,
        lines: to_line_inputs(&body.lines)?,
    };

    let detail = state.sales.register(sale).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("Sale #{} registered", detail.sale.id),
            "data": detail,
        })),
    ))
}

pub async fn list_sales(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let sales = state.sales.list_active().await?;
    Ok(Json(json!({ "success": true, "data": sales })))
}

pub async fn get_sale(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    let detail = state.sales.get_by_id(id).await?;
    Ok(Json(json!({ "success": true, "data": detail })))
}

pub async fn cancel_sale(
    State(state): State<AppState>,
    actor: Actor,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    actor.require(Role::can_cancel_sales, "cancel sales")?;
    let detail = state.sales.cancel(id, actor.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Sale #{id} cancelled, stock returned"),
        "data": detail,
    })))
}

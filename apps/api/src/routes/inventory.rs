//! Branch inventory endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use sportline_core::validation::validate_id;
use sportline_core::{MovementKind, Role};
use sportline_db::Adjustment;

use crate::dto::{AdjustmentRequest, InventoryView};
use crate::error::ApiResult;
use crate::extract::{Actor, ApiJson, ApiPath};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_inventory))
        .route("/inventory/branch/{id}", get(list_branch))
        .route("/inventory/adjustments", post(adjust))
        .route("/inventory/movements", get(movements))
}

pub async fn list_inventory(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let records: Vec<InventoryView> = state
        .inventory
        .list()
        .await?
        .into_iter()
        .map(InventoryView::from)
        .collect();
    Ok(Json(json!({ "success": true, "data": records })))
}

pub async fn list_branch(
    State(state): State<AppState>,
    ApiPath(branch_id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    validate_id("branch_id", branch_id)?;
    let records: Vec<InventoryView> = state
        .inventory
        .list_by_branch(branch_id)
        .await?
        .into_iter()
        .map(InventoryView::from)
        .collect();
    Ok(Json(json!({ "success": true, "data": records })))
}

pub async fn adjust(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(body): ApiJson<AdjustmentRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    actor.require(Role::can_adjust_inventory, "adjust inventory")?;
    let kind: MovementKind = body.movement.parse()?;

    let movement = state
        .inventory
        .adjust(Adjustment {
            product_id: body.product_id,
            branch_id: body.branch_id,
            quantity: body.quantity,
            kind,
            reason: body.reason,
            actor_id: actor.id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": {
                "product_id": movement.product_id,
                "branch_id": movement.branch_id,
                "delta": movement.delta,
                "available": movement.available,
            },
        })),
    ))
}

pub async fn movements(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let entries = state.inventory.movements().await?;
    Ok(Json(json!({ "success": true, "data": entries })))
}

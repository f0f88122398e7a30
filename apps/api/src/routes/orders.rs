//! Online order endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use sportline_core::{NewOrder, OrderStatus, PaymentMethod, Role, ShippingInfo};
use sportline_db::StatusChange;
use tracing::info;

use crate::dto::{
    resolve_client_id, to_line_inputs, ClientQuery, CreateOrderRequest, OrderCreatedResponse,
    StatusChangedResponse, StatusRequest,
};
use crate::error::ApiResult;
use crate::extract::{Actor, ApiJson, ApiPath, ApiQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/my-orders", get(my_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/tracking", get(tracking))
        .route("/orders/{id}/status", put(change_status))
}

pub async fn create_order(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(body): ApiJson<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderCreatedResponse>)> {
    let client_id = resolve_client_id(actor.client_id, body.client_id)?;
    let payment_method: PaymentMethod = body.payment_method.parse()?;
    let lines = to_line_inputs(&body.lines)?;

    let order = NewOrder {
        client_id,
        shipping: ShippingInfo {
            address: body.shipping_address,
            city: body.shipping_city,
            country: body.shipping_country,
            phone: body.contact_phone,
        },
        payment_method,
        lines,
    };

    let created = state.orders.create(order, actor.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse {
            success: true,
            id_pedido: created.order_id,
            total: created.totals.total.to_string(),
            total_cents: created.totals.total.cents(),
        }),
    ))
}

pub async fn my_orders(
    State(state): State<AppState>,
    actor: Actor,
    ApiQuery(query): ApiQuery<ClientQuery>,
) -> ApiResult<Json<Value>> {
    let client_id = resolve_client_id(actor.client_id, query.client_id)?;
    let orders = state.orders.list_by_client(client_id).await?;
    Ok(Json(json!({ "success": true, "data": orders })))
}

pub async fn get_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    let detail = state.orders.get_by_id(id).await?;
    Ok(Json(json!({ "success": true, "data": detail })))
}

pub async fn tracking(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    let events = state.orders.tracking(id).await?;
    Ok(Json(json!({ "success": true, "data": events })))
}

pub async fn change_status(
    State(state): State<AppState>,
    actor: Actor,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> ApiResult<Json<StatusChangedResponse>> {
    actor.require(Role::can_manage_orders, "change order status")?;
    let target: OrderStatus = body.estado.parse()?;

    let changed = state
        .orders
        .change_status(StatusChange {
            order_id: id,
            target,
            dispatch_branch_id: body.id_sucursal_despacho,
            actor_id: actor.id,
        })
        .await?;

    info!(
        order_id = id,
        from = changed.previous.as_str(),
        to = changed.current.as_str(),
        "Order status updated"
    );

    Ok(Json(StatusChangedResponse {
        success: true,
        message: format!(
            "Order #{} moved from {} to {}",
            id, changed.previous, changed.current
        ),
        estado_anterior: changed.previous.to_string(),
        estado_nuevo: changed.current.to_string(),
    }))
}

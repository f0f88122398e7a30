//! Request and response bodies.
//!
//! Field names follow the storefront's English snake_case; the legacy Spanish
//! names (`id_cliente`, `detalles`, `cantidad`, ...) are accepted as aliases.

use serde::{Deserialize, Serialize};
use sportline_core::validation::validate_id;
use sportline_core::{InventoryRecord, LineInput, Money, StockLevel, ValidationError};

/// A price sent either as a JSON number (`10.5`) or a string (`"10.50"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl Amount {
    pub fn to_money(&self, field: &str) -> Result<Money, ValidationError> {
        match self {
            Amount::Text(raw) => Money::parse_decimal(field, raw),
            Amount::Number(n) => Money::parse_decimal(field, &n.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineRequest {
    #[serde(alias = "id_producto")]
    pub product_id: i64,
    #[serde(alias = "cantidad")]
    pub quantity: i64,
    #[serde(alias = "precio_unitario")]
    pub unit_price: Amount,
}

/// Converts request lines, naming the offending line on a bad price.
pub fn to_line_inputs(lines: &[LineRequest]) -> Result<Vec<LineInput>, ValidationError> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            Ok(LineInput {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price.to_money(&format!("lines[{idx}].unit_price"))?,
            })
        })
        .collect()
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    /// Used only when the caller carries no client id.
    #[serde(default, alias = "id_cliente")]
    pub client_id: Option<i64>,
    #[serde(default, alias = "direccion_envio")]
    pub shipping_address: String,
    #[serde(default, alias = "ciudad_envio")]
    pub shipping_city: String,
    #[serde(default, alias = "pais_envio")]
    pub shipping_country: String,
    #[serde(default, alias = "telefono_contacto")]
    pub contact_phone: String,
    #[serde(default, alias = "tipo_pago")]
    pub payment_method: String,
    #[serde(default, alias = "detalles")]
    pub lines: Vec<LineRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderCreatedResponse {
    pub success: bool,
    pub id_pedido: i64,
    /// Two-decimal string, e.g. `"32.60"`.
    pub total: String,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusRequest {
    #[serde(alias = "status")]
    pub estado: String,
    #[serde(default, alias = "dispatch_branch_id")]
    pub id_sucursal_despacho: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChangedResponse {
    pub success: bool,
    pub message: String,
    pub estado_anterior: String,
    pub estado_nuevo: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientQuery {
    #[serde(default, alias = "clientId", alias = "id_cliente")]
    pub client_id: Option<i64>,
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleRequest {
    #[serde(default, alias = "id_cliente")]
    pub client_id: Option<i64>,
    /// Used only when the caller carries no branch.
    #[serde(default, alias = "id_sucursal")]
    pub branch_id: Option<i64>,
    #[serde(default, alias = "detalles")]
    pub lines: Vec<LineRequest>,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AdjustmentRequest {
    #[serde(alias = "id_producto")]
    pub product_id: i64,
    #[serde(alias = "id_sucursal")]
    pub branch_id: i64,
    #[serde(alias = "cantidad")]
    pub quantity: i64,
    #[serde(alias = "tipo_movimiento")]
    pub movement: String,
    #[serde(default, alias = "motivo")]
    pub reason: String,
}

/// An inventory record with its derived stock level.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
    #[serde(flatten)]
    pub record: InventoryRecord,
    pub stock_level: StockLevel,
}

impl From<InventoryRecord> for InventoryView {
    fn from(record: InventoryRecord) -> Self {
        let stock_level = record.stock_level();
        InventoryView {
            record,
            stock_level,
        }
    }
}

/// Client id from the caller, falling back to the request.
pub fn resolve_client_id(
    from_actor: Option<i64>,
    from_request: Option<i64>,
) -> Result<i64, ValidationError> {
    let id = from_actor
        .or(from_request)
        .ok_or_else(|| ValidationError::required("client_id"))?;
    validate_id("client_id", id)?;
    Ok(id)
}

//! # Domain Types
//!
//! Core domain types for online orders, POS sales and branch inventory.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │──►│   OrderLine     │   │ TrackingEvent   │       │
//! │  │  status         │   │  qty × price    │   │  append-only    │       │
//! │  │  dispatch branch│   └─────────────────┘   └─────────────────┘       │
//! │  └────────┬────────┘                                                    │
//! │           │ PENDING → PROCESSING reserves stock                        │
//! │           ▼                                                             │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InventoryRecord │◄──│      Sale       │──►│    SaleLine     │       │
//! │  │ (product,branch)│   │  POS checkout   │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Status enums serialize in SCREAMING_SNAKE_CASE. Their `FromStr` impls also
//! accept the Spanish names used by older storefront builds
//! (`PENDIENTE`, `TARJETA_CREDITO`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Builds the `NotAllowed` error for a closed set of wire names.
fn not_allowed(field: &str, allowed: &[&str]) -> ValidationError {
    ValidationError::NotAllowed {
        field: field.to_string(),
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (1300 bps = 13%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of an online order.
///
/// ```text
/// PENDING ──► PROCESSING ──► SHIPPED ──► DELIVERED
///    │             │
///    └──────┬──────┘
///           ▼
///       CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// DELIVERED and CANCELLED accept no further transitions.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" | "PENDIENTE" => Ok(OrderStatus::Pending),
            "PROCESSING" | "PROCESANDO" => Ok(OrderStatus::Processing),
            "SHIPPED" | "ENVIADO" => Ok(OrderStatus::Shipped),
            "DELIVERED" | "ENTREGADO" => Ok(OrderStatus::Delivered),
            "CANCELLED" | "CANCELADO" => Ok(OrderStatus::Cancelled),
            _ => Err(not_allowed(
                "status",
                &OrderStatus::ALL.map(|st| st.as_str()),
            )),
        }
    }
}

// =============================================================================
// Payment Status / Method
// =============================================================================

/// Payment state shared by orders and sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Awaiting settlement.
    Pending,
    Paid,
    /// Reversed by a sale cancellation.
    Voided,
}

/// How an online order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::DebitCard => "DEBIT_CARD",
            PaymentMethod::Paypal => "PAYPAL",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREDIT_CARD" | "TARJETA_CREDITO" => Ok(PaymentMethod::CreditCard),
            "DEBIT_CARD" | "TARJETA_DEBITO" => Ok(PaymentMethod::DebitCard),
            "PAYPAL" => Ok(PaymentMethod::Paypal),
            "BANK_TRANSFER" | "TRANSFERENCIA" => Ok(PaymentMethod::BankTransfer),
            _ => Err(not_allowed(
                "payment_method",
                &["CREDIT_CARD", "DEBIT_CARD", "PAYPAL", "BANK_TRANSFER"],
            )),
        }
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// A POS sale is active until cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Active,
    Voided,
}

// =============================================================================
// Inventory
// =============================================================================

/// Direction of a manual inventory adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Goods received at the branch.
    Entry,
    /// Goods removed (shrinkage, transfer out).
    Exit,
}

impl MovementKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entry => "ENTRY",
            MovementKind::Exit => "EXIT",
        }
    }
}

impl FromStr for MovementKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ENTRY" | "ENTRADA" => Ok(MovementKind::Entry),
            "EXIT" | "SALIDA" => Ok(MovementKind::Exit),
            _ => Err(not_allowed("movement", &["ENTRY", "EXIT"])),
        }
    }
}

/// Stock classification relative to the record's minimum threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockLevel {
    Low,
    Medium,
    High,
}

impl StockLevel {
    /// LOW at or below the minimum, MEDIUM up to twice the minimum, HIGH above.
    pub fn classify(available: i64, min_stock: i64) -> StockLevel {
        if available <= min_stock {
            StockLevel::Low
        } else if available <= min_stock.saturating_mul(2) {
            StockLevel::Medium
        } else {
            StockLevel::High
        }
    }
}

/// Available quantity of one product at one branch.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryRecord {
    pub id: i64,
    pub product_id: i64,
    pub branch_id: i64,
    /// Never negative; every write goes through the ledger.
    pub available: i64,
    pub min_stock: i64,
    /// Advisory only, increments may exceed it.
    pub max_stock: i64,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    #[inline]
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.available, self.min_stock)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Header of an online order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub client_id: i64,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_country: String,
    pub contact_phone: String,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub tax_cents: i64,
    /// Fixed at creation: subtotal + shipping + tax.
    pub total_cents: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    /// Set when the order enters PROCESSING.
    pub dispatch_branch_id: Option<i64>,
    #[ts(as = "Option<String>")]
    pub estimated_delivery_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A product line of an order. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Price captured at order time.
    pub unit_price_cents: i64,
    pub discount_cents: i64,
    /// quantity × unit price − discount.
    pub line_total_cents: i64,
}

/// Order header together with its lines.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDetail {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// One entry of an order's customer-facing status history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TrackingEvent {
    pub id: i64,
    pub order_id: i64,
    pub status: OrderStatus,
    pub description: String,
    pub location: Option<String>,
    #[ts(as = "String")]
    pub recorded_at: DateTime<Utc>,
}

// =============================================================================
// Sales
// =============================================================================

/// Header of a POS sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub client_id: Option<i64>,
    /// Cashier who rang the sale.
    pub employee_id: i64,
    pub branch_id: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment_status: PaymentStatus,
    pub status: SaleStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLine {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub discount_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    pub sale: Sale,
    pub lines: Vec<SaleLine>,
}

// =============================================================================
// Audit
// =============================================================================

/// An audit log entry written by every mutating action.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct AuditEntry {
    pub id: i64,
    pub actor_id: Option<i64>,
    /// Functional area, e.g. `ORDERS`, `SALES`, `INVENTORY`.
    pub module: String,
    pub action: String,
    pub description: String,
    #[ts(as = "String")]
    pub recorded_at: DateTime<Utc>,
}

// =============================================================================
// Command Inputs
// =============================================================================

/// A requested product line (order or sale).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInput {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
}

/// Where an online order is shipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingInfo {
    pub address: String,
    pub city: String,
    pub country: String,
    pub phone: String,
}

/// Checkout request for an online order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_id: i64,
    pub shipping: ShippingInfo,
    pub payment_method: PaymentMethod,
    pub lines: Vec<LineInput>,
}

/// POS checkout request.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub client_id: Option<i64>,
    pub employee_id: i64,
    pub branch_id: i64,
    pub lines: Vec<LineInput>,
}

// =============================================================================
// Roles
// =============================================================================

/// Role of the authenticated actor, as resolved by the auth gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Administrator,
    GeneralManager,
    BranchManager,
    Manager,
    Employee,
    Customer,
}

impl Role {
    /// Roles allowed to move orders through their lifecycle.
    pub const fn can_manage_orders(&self) -> bool {
        matches!(
            self,
            Role::Administrator | Role::GeneralManager | Role::BranchManager
        )
    }

    /// Roles allowed to cancel POS sales.
    pub const fn can_cancel_sales(&self) -> bool {
        matches!(
            self,
            Role::Administrator | Role::GeneralManager | Role::BranchManager | Role::Manager
        )
    }

    /// Roles allowed to post manual stock adjustments.
    pub const fn can_adjust_inventory(&self) -> bool {
        self.can_cancel_sales()
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "ADMINISTRATOR" | "ADMINISTRADOR" | "ADMIN" => Ok(Role::Administrator),
            "GENERAL_MANAGER" | "GERENTE_GENERAL" => Ok(Role::GeneralManager),
            "BRANCH_MANAGER" | "GERENTE_SUCURSAL" => Ok(Role::BranchManager),
            "MANAGER" | "GERENTE" => Ok(Role::Manager),
            "EMPLOYEE" | "EMPLEADO" | "CAJERO" => Ok(Role::Employee),
            "CUSTOMER" | "CLIENTE" => Ok(Role::Customer),
            _ => Err(not_allowed(
                "role",
                &[
                    "ADMINISTRATOR",
                    "GENERAL_MANAGER",
                    "BRANCH_MANAGER",
                    "MANAGER",
                    "EMPLOYEE",
                    "CUSTOMER",
                ],
            )),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

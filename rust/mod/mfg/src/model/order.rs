use serde::{Deserialize, Serialize};

/// Order lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    InProduction,
    Completed,
    Cancelled,
}

/// A customer order. Created exactly once by the intake workflow,
/// together with its production lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Owning factory (tenant).
    pub factory_id: String,

    /// Human-facing order number, unique per factory (e.g. "ORD-0001").
    pub order_number: String,

    pub customer_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,

    /// Product model being ordered.
    pub product_model_id: String,

    /// Number of units. Always positive.
    pub quantity: i64,

    /// Unit price. Always positive.
    pub price_per_unit: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,

    /// Amount already paid up front. Defaults to 0.
    #[serde(default)]
    pub advance_payment: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub status: OrderStatus,

    pub created_at: String,
    pub updated_at: String,
}

/// Validated order fields handed to the atomic intake operation, with
/// the defaulting policy applied: missing optional numeric → 0, missing
/// optional string/reference → None.
#[derive(Debug, Clone)]
pub struct OrderFields {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub product_model_id: String,
    pub quantity: i64,
    pub price_per_unit: f64,
    pub delivery_date: Option<String>,
    pub advance_payment: f64,
    pub color: Option<String>,
    pub size: Option<String>,
    pub notes: Option<String>,
}

/// Result of the atomic intake operation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IntakeResult {
    pub order_id: String,
    pub order_number: String,
    pub lot_id: String,
    pub lot_number: String,
    pub operations_created: usize,
    pub materials_reserved: bool,
}

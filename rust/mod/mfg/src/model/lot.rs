use serde::{Deserialize, Serialize};

/// Production lot lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    Created,
    InProgress,
    Done,
}

/// A production lot — the batch derived 1:1 from an order by the intake
/// operation, tracked through its lot operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionLot {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Owning factory (tenant).
    pub factory_id: String,

    /// The order this lot was derived from.
    pub order_id: String,

    /// Human-facing lot number, unique per factory (e.g. "LOT-0001").
    pub lot_number: String,

    /// Units to produce. Equal to the order quantity.
    pub quantity: i64,

    pub status: LotStatus,

    pub created_at: String,
    pub updated_at: String,
}

/// Lot operation lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    InProgress,
    Done,
}

/// A discrete production step of one lot, instantiated from the
/// factory's operation templates at intake time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotOperation {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Owning lot.
    pub lot_id: String,

    /// Template this operation was instantiated from.
    pub template_id: String,

    pub name: String,

    /// Position in the lot's workflow (from the template).
    pub sequence: i64,

    pub status: OperationStatus,

    /// Units that have passed through this operation so far.
    #[serde(default)]
    pub completed_qty: i64,

    pub created_at: String,
    pub updated_at: String,
}

use serde::{Deserialize, Serialize};

/// Kind of financial transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Up-front payment recorded at order intake.
    Advance,
    /// Payment due/received when production completes.
    Payment,
    /// Money going out.
    Expense,
}

/// A financial transaction, usually tied to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Owning factory (tenant).
    pub factory_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    pub kind: TransactionKind,

    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// RFC 3339 timestamp.
    pub occurred_at: String,
}

/// Input for recording a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransaction {
    #[serde(default)]
    pub order_id: Option<String>,
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(default)]
    pub note: Option<String>,
}

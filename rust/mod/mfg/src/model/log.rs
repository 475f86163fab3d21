use serde::{Deserialize, Serialize};

/// A production log entry — units completed for one lot operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionLog {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Owning factory (tenant).
    pub factory_id: String,

    pub lot_id: String,

    /// The lot operation progressed by this entry.
    pub operation_id: String,

    /// Units completed in this entry. Always positive.
    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// RFC 3339 timestamp of the entry.
    pub logged_at: String,
}

/// Input for recording production progress.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordProduction {
    pub operation_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub worker: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

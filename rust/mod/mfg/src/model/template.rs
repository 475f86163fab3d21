use serde::{Deserialize, Serialize};

/// An operation template — one ordered step of a factory's production
/// workflow. Every new lot gets a copy of each template as a
/// [`LotOperation`](crate::model::LotOperation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationTemplate {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Owning factory (tenant).
    pub factory_id: String,

    pub name: String,

    /// Position in the workflow. Lots execute operations in ascending
    /// sequence order.
    pub sequence: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating an operation template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOperationTemplate {
    pub name: String,
    pub sequence: i64,
    #[serde(default)]
    pub description: Option<String>,
}

use serde::{Deserialize, Serialize};

/// Factory — the tenant boundary. Every manufacturing record is scoped
/// to exactly one factory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Factory {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Factory display name.
    pub name: String,

    /// User id of the factory owner.
    pub owner_user_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a factory.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFactory {
    pub name: String,
    pub owner_user_id: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

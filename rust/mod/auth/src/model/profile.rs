use serde::{Deserialize, Serialize};

/// A profile links a user to the factory (tenant) it operates.
///
/// Every piece of manufacturing data is scoped to one factory; the
/// profile is how a caller's identity resolves to that scope. A profile
/// without a factory id belongs to a user that has not been attached to
/// a factory yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Owning user id (primary key — one profile per user).
    pub user_id: String,

    /// The factory this user belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_id: Option<String>,

    /// Role within the factory ("owner", "manager", "worker").
    #[serde(default = "default_role")]
    pub role: String,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

fn default_role() -> String {
    "worker".to_string()
}

/// Input for creating or replacing a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct SetProfile {
    #[serde(default)]
    pub factory_id: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

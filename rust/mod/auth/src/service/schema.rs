use factoryerp_sql::SQLExecutor;

use crate::service::AuthError;

/// SQL DDL statements to initialize the auth database schema.
///
/// Each table stores the full JSON document in a `data` TEXT column,
/// with indexed columns extracted for efficient filtering and uniqueness.
/// The password hash lives only in its own column, never in `data`.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        name TEXT,
        email TEXT UNIQUE,
        password_hash TEXT,
        active INTEGER,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS profiles (
        user_id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        factory_id TEXT,
        role TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        user_id TEXT,
        revoked INTEGER,
        issued_at TEXT,
        expires_at TEXT
    )",
    // Indexes
    "CREATE INDEX IF NOT EXISTS idx_profiles_factory ON profiles(factory_id)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
];

pub fn init_schema(sql: &dyn SQLExecutor) -> Result<(), AuthError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| AuthError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}

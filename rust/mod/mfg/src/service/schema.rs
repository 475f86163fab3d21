use factoryerp_sql::SQLExecutor;

use crate::service::MfgError;

/// SQL DDL statements to initialize the mfg database schema.
///
/// Each table stores the full JSON document in a `data` TEXT column,
/// with indexed columns extracted for filtering and uniqueness. Every
/// table except lot_operations carries a `factory_id` column — the
/// tenant boundary.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS factories (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        name TEXT,
        owner_user_id TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        factory_id TEXT,
        order_number TEXT,
        customer_name TEXT,
        product_model_id TEXT,
        status TEXT,
        created_at TEXT,
        updated_at TEXT,
        UNIQUE(factory_id, order_number)
    )",
    "CREATE TABLE IF NOT EXISTS product_models (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        factory_id TEXT,
        name TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS materials (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        factory_id TEXT,
        name TEXT,
        stock_qty REAL,
        reserved_qty REAL,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS production_lots (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        factory_id TEXT,
        order_id TEXT,
        lot_number TEXT,
        status TEXT,
        created_at TEXT,
        updated_at TEXT,
        UNIQUE(factory_id, lot_number)
    )",
    "CREATE TABLE IF NOT EXISTS operation_templates (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        factory_id TEXT,
        name TEXT,
        sequence INTEGER,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS lot_operations (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        lot_id TEXT,
        template_id TEXT,
        sequence INTEGER,
        status TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS production_logs (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        factory_id TEXT,
        lot_id TEXT,
        operation_id TEXT,
        created_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS transactions (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        factory_id TEXT,
        order_id TEXT,
        kind TEXT,
        amount REAL,
        created_at TEXT
    )",
    // Indexes
    "CREATE INDEX IF NOT EXISTS idx_orders_factory ON orders(factory_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status)",
    "CREATE INDEX IF NOT EXISTS idx_models_factory ON product_models(factory_id)",
    "CREATE INDEX IF NOT EXISTS idx_materials_factory ON materials(factory_id)",
    "CREATE INDEX IF NOT EXISTS idx_lots_factory ON production_lots(factory_id)",
    "CREATE INDEX IF NOT EXISTS idx_lots_order ON production_lots(order_id)",
    "CREATE INDEX IF NOT EXISTS idx_templates_factory ON operation_templates(factory_id)",
    "CREATE INDEX IF NOT EXISTS idx_lot_ops_lot ON lot_operations(lot_id)",
    "CREATE INDEX IF NOT EXISTS idx_logs_lot ON production_logs(lot_id)",
    "CREATE INDEX IF NOT EXISTS idx_txn_factory ON transactions(factory_id)",
    "CREATE INDEX IF NOT EXISTS idx_txn_order ON transactions(order_id)",
];

pub fn init_schema(sql: &dyn SQLExecutor) -> Result<(), MfgError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| MfgError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}

pub mod catalog;
pub mod factory;
pub mod intake;
pub mod lot;
pub mod order;
pub mod production;
pub mod schema;
pub mod stats;
pub mod transaction;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use factoryerp_sql::{SQLExecutor, SQLStore, Value};

/// Mfg service error type.
#[derive(Debug, Error)]
pub enum MfgError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<MfgError> for factoryerp_core::ServiceError {
    fn from(e: MfgError) -> Self {
        match e {
            MfgError::NotFound(m) => factoryerp_core::ServiceError::NotFound(m),
            MfgError::Conflict(m) => factoryerp_core::ServiceError::Conflict(m),
            MfgError::Validation(m) => factoryerp_core::ServiceError::Validation(m),
            MfgError::Storage(m) => factoryerp_core::ServiceError::Storage(m),
            MfgError::Internal(m) => factoryerp_core::ServiceError::Internal(m),
        }
    }
}

impl From<factoryerp_sql::SQLError> for MfgError {
    fn from(e: factoryerp_sql::SQLError) -> Self {
        let msg = e.to_string();
        if msg.contains("UNIQUE constraint") {
            MfgError::Conflict(msg)
        } else {
            MfgError::Storage(msg)
        }
    }
}

/// The Mfg service — manufacturing business logic over the SQL store.
pub struct MfgService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl MfgService {
    /// Create a new MfgService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Arc<Self>, MfgError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql }))
    }

    /// The store as a plain executor, for the record helpers.
    pub(crate) fn db(&self) -> &dyn SQLExecutor {
        self.sql.as_ref()
    }
}

// ── Generic JSON-document record helpers ──
//
// Free functions over `&dyn SQLExecutor` so the same code serves both
// autocommit calls and closures inside `with_transaction`.

/// Insert a record as JSON into a table with indexed columns.
pub(crate) fn insert_record<T: Serialize>(
    db: &dyn SQLExecutor,
    table: &str,
    id: &str,
    record: &T,
    indexes: &[(&str, Value)],
) -> Result<(), MfgError> {
    let json = serde_json::to_string(record).map_err(|e| MfgError::Internal(e.to_string()))?;

    let mut cols = vec!["id", "data"];
    let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
    let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];

    for (i, (col, val)) in indexes.iter().enumerate() {
        let idx = i + 3;
        cols.push(col);
        placeholders.push(format!("?{}", idx));
        params.push(val.clone());
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        cols.join(", "),
        placeholders.join(", "),
    );

    db.exec(&sql, &params).map_err(MfgError::from)?;
    Ok(())
}

/// Get a record by id, deserializing the JSON `data` column.
pub(crate) fn get_record<T: DeserializeOwned>(
    db: &dyn SQLExecutor,
    table: &str,
    id: &str,
) -> Result<T, MfgError> {
    let sql = format!("SELECT data FROM {} WHERE id = ?1", table);
    let rows = db
        .query(&sql, &[Value::Text(id.to_string())])
        .map_err(|e| MfgError::Storage(e.to_string()))?;
    let row = rows
        .first()
        .ok_or_else(|| MfgError::NotFound(format!("{}/{}", table, id)))?;
    let data = row
        .get_str("data")
        .ok_or_else(|| MfgError::Internal("missing data column".into()))?;
    serde_json::from_str(data).map_err(|e| MfgError::Internal(e.to_string()))
}

/// Update a record's JSON data and indexed columns.
pub(crate) fn update_record<T: Serialize>(
    db: &dyn SQLExecutor,
    table: &str,
    id: &str,
    record: &T,
    indexes: &[(&str, Value)],
) -> Result<(), MfgError> {
    let json = serde_json::to_string(record).map_err(|e| MfgError::Internal(e.to_string()))?;

    let mut sets = vec!["data = ?1".to_string()];
    let mut params: Vec<Value> = vec![Value::Text(json)];

    for (i, (col, val)) in indexes.iter().enumerate() {
        let idx = i + 2;
        sets.push(format!("{} = ?{}", col, idx));
        params.push(val.clone());
    }

    let id_idx = params.len() + 1;
    params.push(Value::Text(id.to_string()));

    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        table,
        sets.join(", "),
        id_idx,
    );

    let affected = db
        .exec(&sql, &params)
        .map_err(|e| MfgError::Storage(e.to_string()))?;

    if affected == 0 {
        return Err(MfgError::NotFound(format!("{}/{}", table, id)));
    }

    Ok(())
}

/// Delete a record by id.
pub(crate) fn delete_record(
    db: &dyn SQLExecutor,
    table: &str,
    id: &str,
) -> Result<(), MfgError> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", table);
    let affected = db
        .exec(&sql, &[Value::Text(id.to_string())])
        .map_err(|e| MfgError::Storage(e.to_string()))?;
    if affected == 0 {
        return Err(MfgError::NotFound(format!("{}/{}", table, id)));
    }
    Ok(())
}

/// List records with equality filters, pagination, and total count.
pub(crate) fn list_records<T: DeserializeOwned>(
    db: &dyn SQLExecutor,
    table: &str,
    filters: &[(&str, Value)],
    limit: usize,
    offset: usize,
) -> Result<(Vec<T>, usize), MfgError> {
    let mut where_clauses = Vec::new();
    let mut params = Vec::new();

    for (i, (col, val)) in filters.iter().enumerate() {
        let idx = i + 1;
        where_clauses.push(format!("{} = ?{}", col, idx));
        params.push(val.clone());
    }

    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_clauses.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) AS cnt FROM {}{}", table, where_sql);
    let rows = db
        .query(&count_sql, &params)
        .map_err(|e| MfgError::Storage(e.to_string()))?;
    let total = rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize;

    let limit_idx = params.len() + 1;
    let offset_idx = params.len() + 2;
    params.push(Value::Integer(limit as i64));
    params.push(Value::Integer(offset as i64));

    let sql = format!(
        "SELECT data FROM {}{} ORDER BY created_at DESC LIMIT ?{} OFFSET ?{}",
        table, where_sql, limit_idx, offset_idx,
    );

    let rows = db
        .query(&sql, &params)
        .map_err(|e| MfgError::Storage(e.to_string()))?;

    let mut items = Vec::new();
    for row in &rows {
        let data = row
            .get_str("data")
            .ok_or_else(|| MfgError::Internal("missing data column".into()))?;
        let item: T =
            serde_json::from_str(data).map_err(|e| MfgError::Internal(e.to_string()))?;
        items.push(item);
    }

    Ok((items, total))
}

/// Count records with equality filters.
pub(crate) fn count_records(
    db: &dyn SQLExecutor,
    table: &str,
    filters: &[(&str, Value)],
) -> Result<i64, MfgError> {
    let mut where_clauses = Vec::new();
    let mut params = Vec::new();

    for (i, (col, val)) in filters.iter().enumerate() {
        let idx = i + 1;
        where_clauses.push(format!("{} = ?{}", col, idx));
        params.push(val.clone());
    }

    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_clauses.join(" AND "))
    };

    let sql = format!("SELECT COUNT(*) AS cnt FROM {}{}", table, where_sql);
    let rows = db
        .query(&sql, &params)
        .map_err(|e| MfgError::Storage(e.to_string()))?;

    Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0))
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::Arc;

    use factoryerp_sql::SqliteStore;

    use crate::model::{
        CreateFactory, CreateMaterial, CreateOperationTemplate, CreateProductModel,
        MaterialRequirement, OrderFields,
    };
    use crate::service::MfgService;

    pub fn test_service() -> Arc<MfgService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        MfgService::new(sql).unwrap()
    }

    pub fn order_fields(product_model_id: &str, quantity: i64) -> OrderFields {
        OrderFields {
            customer_name: "Acme".to_string(),
            customer_email: None,
            customer_phone: None,
            product_model_id: product_model_id.to_string(),
            quantity,
            price_per_unit: 12.5,
            delivery_date: Some("2025-01-01".to_string()),
            advance_payment: 0.0,
            color: None,
            size: None,
            notes: None,
        }
    }

    /// Factory with a 3-step workflow, one material (100 in stock,
    /// 0.5 per unit of product), and one product model using it.
    /// Returns (factory_id, product_model_id, material_id).
    pub fn seeded_factory(svc: &MfgService) -> (String, String, String) {
        let factory = svc
            .create_factory(CreateFactory {
                name: "Acme Textiles".to_string(),
                owner_user_id: "u1".to_string(),
                address: None,
                phone: None,
            })
            .unwrap();

        for (name, seq) in [("cut", 1), ("sew", 2), ("pack", 3)] {
            svc.create_operation_template(
                &factory.id,
                CreateOperationTemplate {
                    name: name.to_string(),
                    sequence: seq,
                    description: None,
                },
            )
            .unwrap();
        }

        let material = svc
            .create_material(
                &factory.id,
                CreateMaterial {
                    name: "denim".to_string(),
                    unit: "m".to_string(),
                    stock_qty: 100.0,
                },
            )
            .unwrap();

        let model = svc
            .create_product_model(
                &factory.id,
                CreateProductModel {
                    name: "Denim Jacket".to_string(),
                    description: None,
                    materials: vec![MaterialRequirement {
                        material_id: material.id.clone(),
                        qty_per_unit: 0.5,
                    }],
                },
            )
            .unwrap();

        (factory.id, model.id, material.id)
    }
}

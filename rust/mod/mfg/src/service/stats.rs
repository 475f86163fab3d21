//! Aggregate figures for the factory dashboard.

use factoryerp_sql::Value;
use serde::Serialize;

use crate::service::{MfgError, MfgService};

/// Dashboard snapshot for one factory.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub orders_pending: i64,
    pub orders_in_production: i64,
    pub orders_completed: i64,
    pub orders_cancelled: i64,
    pub lots_in_progress: i64,
    /// Materials whose free stock (stock minus reserved) is exhausted.
    pub materials_low: i64,
    pub advance_total: f64,
    pub payment_total: f64,
    pub expense_total: f64,
}

impl MfgService {
    pub fn dashboard_stats(&self, factory_id: &str) -> Result<DashboardStats, MfgError> {
        let mut stats = DashboardStats {
            orders_pending: 0,
            orders_in_production: 0,
            orders_completed: 0,
            orders_cancelled: 0,
            lots_in_progress: 0,
            materials_low: 0,
            advance_total: 0.0,
            payment_total: 0.0,
            expense_total: 0.0,
        };

        let factory = Value::Text(factory_id.to_string());

        let rows = self
            .db()
            .query(
                "SELECT status, COUNT(*) AS cnt FROM orders
                 WHERE factory_id = ?1 GROUP BY status",
                &[factory.clone()],
            )
            .map_err(|e| MfgError::Storage(e.to_string()))?;
        for row in &rows {
            let cnt = row.get_i64("cnt").unwrap_or(0);
            match row.get_str("status") {
                Some("PENDING") => stats.orders_pending = cnt,
                Some("IN_PRODUCTION") => stats.orders_in_production = cnt,
                Some("COMPLETED") => stats.orders_completed = cnt,
                Some("CANCELLED") => stats.orders_cancelled = cnt,
                _ => {}
            }
        }

        let rows = self
            .db()
            .query(
                "SELECT COUNT(*) AS cnt FROM production_lots
                 WHERE factory_id = ?1 AND status = 'IN_PROGRESS'",
                &[factory.clone()],
            )
            .map_err(|e| MfgError::Storage(e.to_string()))?;
        stats.lots_in_progress = rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0);

        let rows = self
            .db()
            .query(
                "SELECT COUNT(*) AS cnt FROM materials
                 WHERE factory_id = ?1 AND stock_qty <= reserved_qty",
                &[factory.clone()],
            )
            .map_err(|e| MfgError::Storage(e.to_string()))?;
        stats.materials_low = rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0);

        let rows = self
            .db()
            .query(
                "SELECT kind, SUM(amount) AS total FROM transactions
                 WHERE factory_id = ?1 GROUP BY kind",
                &[factory],
            )
            .map_err(|e| MfgError::Storage(e.to_string()))?;
        for row in &rows {
            let total = row.get_f64("total").unwrap_or(0.0);
            match row.get_str("kind") {
                Some("ADVANCE") => stats.advance_total = total,
                Some("PAYMENT") => stats.payment_total = total,
                Some("EXPENSE") => stats.expense_total = total,
                _ => {}
            }
        }

        Ok(stats)
    }
}

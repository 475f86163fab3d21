//! Production progress recording: log entries move lot operations
//! towards DONE, and a finished lot completes its order.

use factoryerp_core::{new_id, now_rfc3339};
use factoryerp_sql::{SQLError, SQLExecutor, Value};
use tracing::warn;

use crate::model::{
    LotOperation, LotStatus, OperationStatus, Order, OrderStatus, ProductionLog, ProductionLot,
    RecordProduction, Transaction, TransactionKind,
};
use crate::service::{MfgError, MfgService, get_record, insert_record, update_record};

impl MfgService {
    /// Record production progress on one lot operation.
    ///
    /// The log entry, the operation counter, and the resulting status
    /// transitions commit together. The payment-due transaction written
    /// when the lot finishes is a side-effect: its failure is logged
    /// and does not fail the recording.
    pub fn record_production(
        &self,
        lot_id: &str,
        input: RecordProduction,
    ) -> Result<ProductionLog, MfgError> {
        if input.quantity <= 0 {
            return Err(MfgError::Validation("quantity must be positive".into()));
        }

        let mut log_entry: Option<ProductionLog> = None;
        let mut finished: Option<(String, f64)> = None;
        let mut failure: Option<MfgError> = None;

        let lot_id = lot_id.to_string();
        let txn = self.sql.with_transaction(&mut |tx| {
            match apply_progress(tx, &lot_id, &input) {
                Ok((entry, lot_done)) => {
                    log_entry = Some(entry);
                    finished = lot_done;
                    Ok(())
                }
                Err(e) => {
                    let msg = e.to_string();
                    failure = Some(e);
                    Err(SQLError::Execution(msg))
                }
            }
        });

        if let Err(e) = txn {
            return Err(failure.unwrap_or_else(|| MfgError::Storage(e.to_string())));
        }
        let entry =
            log_entry.ok_or_else(|| MfgError::Internal("recording produced no log".into()))?;

        // Lot finished: record the balance due. Log-and-continue.
        if let Some((order_id, amount)) = finished {
            if amount > 0.0 {
                if let Err(e) = self.record_payment_due(&entry.factory_id, &order_id, amount) {
                    warn!(
                        order = %order_id,
                        amount,
                        error = %e,
                        "failed to record payment-due transaction"
                    );
                }
            }
        }

        Ok(entry)
    }

    /// Log entries for one lot, newest first.
    pub fn list_production_logs(&self, lot_id: &str) -> Result<Vec<ProductionLog>, MfgError> {
        let rows = self
            .db()
            .query(
                "SELECT data FROM production_logs WHERE lot_id = ?1 ORDER BY created_at DESC",
                &[Value::Text(lot_id.to_string())],
            )
            .map_err(|e| MfgError::Storage(e.to_string()))?;

        let mut items = Vec::new();
        for row in &rows {
            let data = row
                .get_str("data")
                .ok_or_else(|| MfgError::Internal("missing data column".into()))?;
            items.push(
                serde_json::from_str(data).map_err(|e| MfgError::Internal(e.to_string()))?,
            );
        }
        Ok(items)
    }

    fn record_payment_due(
        &self,
        factory_id: &str,
        order_id: &str,
        amount: f64,
    ) -> Result<(), MfgError> {
        let now = now_rfc3339();
        let txn = Transaction {
            id: new_id(),
            factory_id: factory_id.to_string(),
            order_id: Some(order_id.to_string()),
            kind: TransactionKind::Payment,
            amount,
            note: Some("balance due on production completion".to_string()),
            occurred_at: now.clone(),
        };
        insert_record(
            self.db(),
            "transactions",
            &txn.id,
            &txn,
            &[
                ("factory_id", Value::Text(factory_id.to_string())),
                ("order_id", Value::Text(order_id.to_string())),
                ("kind", Value::Text("PAYMENT".into())),
                ("amount", Value::Real(amount)),
                ("created_at", Value::Text(now)),
            ],
        )
    }
}

/// Insert the log, bump the operation, and cascade status changes.
/// Returns the log entry and, when the lot just finished, the order id
/// and outstanding balance.
fn apply_progress(
    tx: &dyn SQLExecutor,
    lot_id: &str,
    input: &RecordProduction,
) -> Result<(ProductionLog, Option<(String, f64)>), MfgError> {
    let mut lot: ProductionLot = get_record(tx, "production_lots", lot_id)?;
    let mut op: LotOperation = get_record(tx, "lot_operations", &input.operation_id)?;
    if op.lot_id != lot_id {
        return Err(MfgError::NotFound(format!(
            "lot_operations/{} in lot {}",
            input.operation_id, lot_id
        )));
    }
    if op.status == OperationStatus::Done {
        return Err(MfgError::Conflict(format!(
            "operation '{}' is already done",
            op.name
        )));
    }
    if op.completed_qty + input.quantity > lot.quantity {
        return Err(MfgError::Validation(format!(
            "operation '{}' would exceed lot quantity ({} of {} already done)",
            op.name, op.completed_qty, lot.quantity
        )));
    }

    let now = now_rfc3339();
    let entry = ProductionLog {
        id: new_id(),
        factory_id: lot.factory_id.clone(),
        lot_id: lot_id.to_string(),
        operation_id: op.id.clone(),
        quantity: input.quantity,
        worker: input.worker.clone(),
        note: input.note.clone(),
        logged_at: now.clone(),
    };
    insert_record(
        tx,
        "production_logs",
        &entry.id,
        &entry,
        &[
            ("factory_id", Value::Text(lot.factory_id.clone())),
            ("lot_id", Value::Text(lot_id.to_string())),
            ("operation_id", Value::Text(op.id.clone())),
            ("created_at", Value::Text(now.clone())),
        ],
    )?;

    op.completed_qty += input.quantity;
    op.status = if op.completed_qty >= lot.quantity {
        OperationStatus::Done
    } else {
        OperationStatus::InProgress
    };
    op.updated_at = now.clone();
    let op_status = status_str(&op.status)?;
    update_record(
        tx,
        "lot_operations",
        &op.id,
        &op,
        &[
            ("status", Value::Text(op_status)),
            ("updated_at", Value::Text(now.clone())),
        ],
    )?;

    let all_done = op.status == OperationStatus::Done && siblings_done(tx, lot_id, &op.id)?;

    let new_lot_status = if all_done {
        LotStatus::Done
    } else {
        LotStatus::InProgress
    };

    let mut finished = None;
    if new_lot_status != lot.status {
        lot.status = new_lot_status;
        lot.updated_at = now.clone();
        update_record(
            tx,
            "production_lots",
            lot_id,
            &lot,
            &[
                ("status", Value::Text(status_str(&lot.status)?)),
                ("updated_at", Value::Text(now.clone())),
            ],
        )?;
    }

    if all_done {
        let mut order: Order = get_record(tx, "orders", &lot.order_id)?;
        order.status = OrderStatus::Completed;
        order.updated_at = now.clone();
        update_record(
            tx,
            "orders",
            &order.id,
            &order,
            &[
                ("status", Value::Text("COMPLETED".into())),
                ("updated_at", Value::Text(now)),
            ],
        )?;
        let balance = order.quantity as f64 * order.price_per_unit - order.advance_payment;
        finished = Some((order.id, balance));
    }

    Ok((entry, finished))
}

fn siblings_done(tx: &dyn SQLExecutor, lot_id: &str, op_id: &str) -> Result<bool, MfgError> {
    let rows = tx
        .query(
            "SELECT COUNT(*) AS cnt FROM lot_operations
             WHERE lot_id = ?1 AND id != ?2 AND status != 'DONE'",
            &[
                Value::Text(lot_id.to_string()),
                Value::Text(op_id.to_string()),
            ],
        )
        .map_err(|e| MfgError::Storage(e.to_string()))?;
    Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) == 0)
}

fn status_str<T: serde::Serialize>(status: &T) -> Result<String, MfgError> {
    Ok(serde_json::to_value(status)
        .map_err(|e| MfgError::Internal(e.to_string()))?
        .as_str()
        .unwrap_or_default()
        .to_string())
}

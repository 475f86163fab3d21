//! Order queries and lifecycle transitions. Orders are created only by
//! the intake workflow; this file never inserts one.

use factoryerp_core::{ListParams, ListResult, now_rfc3339};
use factoryerp_sql::Value;

use crate::model::{Order, OrderStatus};
use crate::service::{MfgError, MfgService, get_record, list_records, update_record};

impl MfgService {
    pub fn get_order(&self, id: &str) -> Result<Order, MfgError> {
        get_record(self.db(), "orders", id)
    }

    pub fn list_orders(
        &self,
        factory_id: &str,
        params: &ListParams,
    ) -> Result<ListResult<Order>, MfgError> {
        let (items, total) = list_records(
            self.db(),
            "orders",
            &[("factory_id", Value::Text(factory_id.to_string()))],
            params.limit,
            params.offset,
        )?;
        Ok(ListResult { items, total })
    }

    pub fn list_orders_by_status(
        &self,
        factory_id: &str,
        status: OrderStatus,
        params: &ListParams,
    ) -> Result<ListResult<Order>, MfgError> {
        let status_str = serde_json::to_value(status)
            .map_err(|e| MfgError::Internal(e.to_string()))?
            .as_str()
            .unwrap_or_default()
            .to_string();
        let (items, total) = list_records(
            self.db(),
            "orders",
            &[
                ("factory_id", Value::Text(factory_id.to_string())),
                ("status", Value::Text(status_str)),
            ],
            params.limit,
            params.offset,
        )?;
        Ok(ListResult { items, total })
    }

    pub fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Order, MfgError> {
        let mut order: Order = get_record(self.db(), "orders", id)?;
        order.status = status;
        let now = now_rfc3339();
        order.updated_at = now.clone();

        let status_str = serde_json::to_value(status)
            .map_err(|e| MfgError::Internal(e.to_string()))?
            .as_str()
            .unwrap_or_default()
            .to_string();

        update_record(
            self.db(),
            "orders",
            id,
            &order,
            &[
                ("status", Value::Text(status_str)),
                ("updated_at", Value::Text(now)),
            ],
        )?;
        Ok(order)
    }

    /// Cancel an order. Only allowed while it is still pending; once
    /// production has started the lot must be driven to completion.
    pub fn cancel_order(&self, id: &str) -> Result<Order, MfgError> {
        let order: Order = get_record(self.db(), "orders", id)?;
        if order.status != OrderStatus::Pending {
            return Err(MfgError::Conflict(format!(
                "order {} is not pending and cannot be cancelled",
                order.order_number
            )));
        }
        self.update_order_status(id, OrderStatus::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{order_fields, seeded_factory, test_service};

    #[test]
    fn cancel_is_rejected_once_in_production() {
        let svc = test_service();
        let (factory_id, model_id, _) = seeded_factory(&svc);
        let result = svc
            .create_order_and_initiate_production(
                &factory_id,
                &order_fields(&model_id, 10),
            )
            .unwrap();

        let err = svc.cancel_order(&result.order_id).unwrap_err();
        assert!(matches!(err, MfgError::Conflict(_)));
    }

    #[test]
    fn status_update_round_trips_through_storage() {
        let svc = test_service();
        let (factory_id, model_id, _) = seeded_factory(&svc);
        let result = svc
            .create_order_and_initiate_production(
                &factory_id,
                &order_fields(&model_id, 10),
            )
            .unwrap();

        svc.update_order_status(&result.order_id, OrderStatus::Completed)
            .unwrap();
        let order = svc.get_order(&result.order_id).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);

        let completed = svc
            .list_orders_by_status(
                &factory_id,
                OrderStatus::Completed,
                &factoryerp_core::ListParams::default(),
            )
            .unwrap();
        assert_eq!(completed.total, 1);
    }
}

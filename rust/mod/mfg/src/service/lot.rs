//! Production lot queries. Lots are created only by the intake
//! workflow and progressed by production recording.

use factoryerp_core::{ListParams, ListResult};
use factoryerp_sql::Value;

use crate::model::{LotOperation, ProductionLot};
use crate::service::{MfgError, MfgService, get_record, list_records};

impl MfgService {
    pub fn get_lot(&self, id: &str) -> Result<ProductionLot, MfgError> {
        get_record(self.db(), "production_lots", id)
    }

    pub fn list_lots(
        &self,
        factory_id: &str,
        params: &ListParams,
    ) -> Result<ListResult<ProductionLot>, MfgError> {
        let (items, total) = list_records(
            self.db(),
            "production_lots",
            &[("factory_id", Value::Text(factory_id.to_string()))],
            params.limit,
            params.offset,
        )?;
        Ok(ListResult { items, total })
    }

    pub fn get_lot_for_order(&self, order_id: &str) -> Result<ProductionLot, MfgError> {
        let (items, _): (Vec<ProductionLot>, usize) = list_records(
            self.db(),
            "production_lots",
            &[("order_id", Value::Text(order_id.to_string()))],
            1,
            0,
        )?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| MfgError::NotFound(format!("production_lots for order {}", order_id)))
    }

    pub fn get_lot_operation(&self, id: &str) -> Result<LotOperation, MfgError> {
        get_record(self.db(), "lot_operations", id)
    }

    /// Operations of a lot in workflow order.
    pub fn list_lot_operations(&self, lot_id: &str) -> Result<Vec<LotOperation>, MfgError> {
        let rows = self
            .db()
            .query(
                "SELECT data FROM lot_operations WHERE lot_id = ?1 ORDER BY sequence ASC",
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{order_fields, seeded_factory, test_service};

    #[test]
    fn lot_is_reachable_from_its_order() {
        let svc = test_service();
        let (factory_id, model_id, _) = seeded_factory(&svc);
        let result = svc
            .create_order_and_initiate_production(&factory_id, &order_fields(&model_id, 10))
            .unwrap();

        let lot = svc.get_lot_for_order(&result.order_id).unwrap();
        assert_eq!(lot.id, result.lot_id);
        assert_eq!(lot.lot_number, result.lot_number);
    }

    #[test]
    fn lot_operations_come_back_in_sequence_order() {
        let svc = test_service();
        let (factory_id, model_id, _) = seeded_factory(&svc);
        let result = svc
            .create_order_and_initiate_production(&factory_id, &order_fields(&model_id, 10))
            .unwrap();

        let ops = svc.list_lot_operations(&result.lot_id).unwrap();
        let seqs: Vec<i64> = ops.iter().map(|o| o.sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        let names: Vec<&str> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["cut", "sew", "pack"]);
    }
}

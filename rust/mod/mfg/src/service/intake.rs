//! The order intake & production initiation operation.
//!
//! One atomic step creates the order, derives its production lot,
//! instantiates lot operations from the factory's templates, reserves
//! materials per the product model's bill of materials, and records the
//! advance payment. Nothing is observable unless the whole step
//! succeeds.

use factoryerp_core::{new_id, now_rfc3339};
use factoryerp_sql::{SQLError, SQLExecutor, Value};
use tracing::info;

use crate::model::{
    IntakeResult, LotOperation, LotStatus, Material, OperationStatus, OperationTemplate, Order,
    OrderFields, OrderStatus, ProductModel, ProductionLot, Transaction, TransactionKind,
};
use crate::service::{MfgError, MfgService, count_records, get_record, insert_record, update_record};

impl MfgService {
    /// Create an order and initiate its production, atomically.
    ///
    /// The caller has already authenticated and resolved `factory_id`;
    /// `fields` are validated and defaulted. Any failure inside rolls
    /// the whole operation back — there is no partial order, lot, or
    /// reservation.
    pub fn create_order_and_initiate_production(
        &self,
        factory_id: &str,
        fields: &OrderFields,
    ) -> Result<IntakeResult, MfgError> {
        let mut outcome: Option<IntakeResult> = None;
        let mut failure: Option<MfgError> = None;

        let txn = self.sql.with_transaction(&mut |tx| {
            match run_intake(tx, factory_id, fields) {
                Ok(result) => {
                    outcome = Some(result);
                    Ok(())
                }
                Err(e) => {
                    // Carry the domain error out; give the store a
                    // plain error to trigger the rollback.
                    let msg = e.to_string();
                    failure = Some(e);
                    Err(SQLError::Execution(msg))
                }
            }
        });

        match txn {
            Ok(()) => {
                let result = outcome
                    .ok_or_else(|| MfgError::Internal("intake produced no result".into()))?;
                info!(
                    order = %result.order_number,
                    lot = %result.lot_number,
                    factory = %factory_id,
                    "order intake completed"
                );
                Ok(result)
            }
            Err(e) => Err(failure.unwrap_or_else(|| MfgError::Storage(e.to_string()))),
        }
    }
}

/// The intake body, executed inside an open transaction.
fn run_intake(
    tx: &dyn SQLExecutor,
    factory_id: &str,
    fields: &OrderFields,
) -> Result<IntakeResult, MfgError> {
    // The tenant must exist.
    let _: crate::model::Factory = get_record(tx, "factories", factory_id)?;

    let product: ProductModel = get_record(tx, "product_models", &fields.product_model_id)?;
    if product.factory_id != factory_id {
        return Err(MfgError::NotFound(format!(
            "product_models/{}",
            fields.product_model_id
        )));
    }

    let now = now_rfc3339();

    // Sequential per-factory numbers. BEGIN IMMEDIATE serializes
    // concurrent intakes, so count+1 cannot collide.
    let order_seq = count_records(
        tx,
        "orders",
        &[("factory_id", Value::Text(factory_id.to_string()))],
    )? + 1;
    let lot_seq = count_records(
        tx,
        "production_lots",
        &[("factory_id", Value::Text(factory_id.to_string()))],
    )? + 1;

    let order = Order {
        id: new_id(),
        factory_id: factory_id.to_string(),
        order_number: format!("ORD-{:04}", order_seq),
        customer_name: fields.customer_name.clone(),
        customer_email: fields.customer_email.clone(),
        customer_phone: fields.customer_phone.clone(),
        product_model_id: fields.product_model_id.clone(),
        quantity: fields.quantity,
        price_per_unit: fields.price_per_unit,
        delivery_date: fields.delivery_date.clone(),
        advance_payment: fields.advance_payment,
        color: fields.color.clone(),
        size: fields.size.clone(),
        notes: fields.notes.clone(),
        status: OrderStatus::InProduction,
        created_at: now.clone(),
        updated_at: now.clone(),
    };

    insert_record(
        tx,
        "orders",
        &order.id,
        &order,
        &[
            ("factory_id", Value::Text(factory_id.to_string())),
            ("order_number", Value::Text(order.order_number.clone())),
            ("customer_name", Value::Text(order.customer_name.clone())),
            ("product_model_id", Value::Text(order.product_model_id.clone())),
            ("status", Value::Text("IN_PRODUCTION".into())),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now.clone())),
        ],
    )?;

    let lot = ProductionLot {
        id: new_id(),
        factory_id: factory_id.to_string(),
        order_id: order.id.clone(),
        lot_number: format!("LOT-{:04}", lot_seq),
        quantity: order.quantity,
        status: LotStatus::Created,
        created_at: now.clone(),
        updated_at: now.clone(),
    };

    insert_record(
        tx,
        "production_lots",
        &lot.id,
        &lot,
        &[
            ("factory_id", Value::Text(factory_id.to_string())),
            ("order_id", Value::Text(order.id.clone())),
            ("lot_number", Value::Text(lot.lot_number.clone())),
            ("status", Value::Text("CREATED".into())),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now.clone())),
        ],
    )?;

    // Instantiate one lot operation per template, in workflow order.
    let templates = load_templates(tx, factory_id)?;
    for template in &templates {
        let op = LotOperation {
            id: new_id(),
            lot_id: lot.id.clone(),
            template_id: template.id.clone(),
            name: template.name.clone(),
            sequence: template.sequence,
            status: OperationStatus::Pending,
            completed_qty: 0,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        insert_record(
            tx,
            "lot_operations",
            &op.id,
            &op,
            &[
                ("lot_id", Value::Text(lot.id.clone())),
                ("template_id", Value::Text(template.id.clone())),
                ("sequence", Value::Integer(template.sequence)),
                ("status", Value::Text("PENDING".into())),
                ("created_at", Value::Text(now.clone())),
                ("updated_at", Value::Text(now.clone())),
            ],
        )?;
    }

    // Reserve materials per the bill of materials.
    let mut materials_reserved = false;
    for req in &product.materials {
        let mut material: Material = get_record(tx, "materials", &req.material_id)?;
        let required = req.qty_per_unit * order.quantity as f64;
        if material.available() < required {
            return Err(MfgError::Validation(format!(
                "insufficient stock for material '{}': need {}, available {}",
                material.name,
                required,
                material.available()
            )));
        }
        material.reserved_qty += required;
        material.updated_at = now.clone();
        update_record(
            tx,
            "materials",
            &material.id,
            &material,
            &[
                ("reserved_qty", Value::Real(material.reserved_qty)),
                ("updated_at", Value::Text(now.clone())),
            ],
        )?;
        materials_reserved = true;
    }

    // Record the advance payment, if any.
    if fields.advance_payment > 0.0 {
        let txn = Transaction {
            id: new_id(),
            factory_id: factory_id.to_string(),
            order_id: Some(order.id.clone()),
            kind: TransactionKind::Advance,
            amount: fields.advance_payment,
            note: Some(format!("advance for order {}", order.order_number)),
            occurred_at: now.clone(),
        };
        insert_record(
            tx,
            "transactions",
            &txn.id,
            &txn,
            &[
                ("factory_id", Value::Text(factory_id.to_string())),
                ("order_id", Value::Text(order.id.clone())),
                ("kind", Value::Text("ADVANCE".into())),
                ("amount", Value::Real(txn.amount)),
                ("created_at", Value::Text(now.clone())),
            ],
        )?;
    }

    Ok(IntakeResult {
        order_id: order.id,
        order_number: order.order_number,
        lot_id: lot.id,
        lot_number: lot.lot_number,
        operations_created: templates.len(),
        materials_reserved,
    })
}

fn load_templates(
    tx: &dyn SQLExecutor,
    factory_id: &str,
) -> Result<Vec<OperationTemplate>, MfgError> {
    let rows = tx
        .query(
            "SELECT data FROM operation_templates WHERE factory_id = ?1 ORDER BY sequence ASC",
            &[Value::Text(factory_id.to_string())],
        )
        .map_err(|e| MfgError::Storage(e.to_string()))?;

    let mut templates = Vec::new();
    for row in &rows {
        let data = row
            .get_str("data")
            .ok_or_else(|| MfgError::Internal("missing data column".into()))?;
        templates.push(serde_json::from_str(data).map_err(|e| MfgError::Internal(e.to_string()))?);
    }
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreateProductModel;
    use crate::service::testutil::{order_fields, seeded_factory, test_service};

    #[test]
    fn intake_creates_order_lot_operations_and_reservation() {
        let svc = test_service();
        let (factory_id, model_id, material_id) = seeded_factory(&svc);

        let result = svc
            .create_order_and_initiate_production(&factory_id, &order_fields(&model_id, 100))
            .unwrap();

        assert_eq!(result.order_number, "ORD-0001");
        assert_eq!(result.lot_number, "LOT-0001");
        assert_eq!(result.operations_created, 3);
        assert!(result.materials_reserved);

        let order = svc.get_order(&result.order_id).unwrap();
        assert_eq!(order.status, OrderStatus::InProduction);
        assert_eq!(order.quantity, 100);

        let lot = svc.get_lot(&result.lot_id).unwrap();
        assert_eq!(lot.order_id, result.order_id);
        assert_eq!(lot.quantity, 100);
        assert_eq!(lot.status, LotStatus::Created);

        let ops = svc.list_lot_operations(&result.lot_id).unwrap();
        assert_eq!(ops.len(), 3);
        assert!(ops.iter().all(|o| o.status == OperationStatus::Pending));

        // 100 units * 0.5 per unit reserved.
        let material = svc.get_material(&material_id).unwrap();
        assert_eq!(material.reserved_qty, 50.0);
        assert_eq!(material.available(), 50.0);
    }

    #[test]
    fn intake_numbers_are_sequential_per_factory() {
        let svc = test_service();
        let (factory_id, model_id, _) = seeded_factory(&svc);

        let first = svc
            .create_order_and_initiate_production(&factory_id, &order_fields(&model_id, 10))
            .unwrap();
        let second = svc
            .create_order_and_initiate_production(&factory_id, &order_fields(&model_id, 10))
            .unwrap();
        assert_eq!(first.order_number, "ORD-0001");
        assert_eq!(second.order_number, "ORD-0002");
        assert_eq!(second.lot_number, "LOT-0002");
    }

    #[test]
    fn intake_records_advance_payment() {
        let svc = test_service();
        let (factory_id, model_id, _) = seeded_factory(&svc);

        let mut fields = order_fields(&model_id, 10);
        fields.advance_payment = 500.0;
        let result = svc
            .create_order_and_initiate_production(&factory_id, &fields)
            .unwrap();

        let txns = svc
            .list_transactions(&factory_id, &factoryerp_core::ListParams::default())
            .unwrap();
        assert_eq!(txns.total, 1);
        assert_eq!(txns.items[0].kind, TransactionKind::Advance);
        assert_eq!(txns.items[0].amount, 500.0);
        assert_eq!(txns.items[0].order_id.as_deref(), Some(result.order_id.as_str()));
    }

    #[test]
    fn intake_rolls_back_on_insufficient_stock() {
        let svc = test_service();
        let (factory_id, model_id, material_id) = seeded_factory(&svc);

        // 100 m stock, 0.5 per unit: 300 units needs 150 m.
        let err = svc
            .create_order_and_initiate_production(&factory_id, &order_fields(&model_id, 300))
            .unwrap_err();
        assert!(err.to_string().contains("insufficient stock"));

        // No partial state: no order, no lot, no reservation.
        let orders = svc
            .list_orders(&factory_id, &factoryerp_core::ListParams::default())
            .unwrap();
        assert_eq!(orders.total, 0);
        let lots = svc
            .list_lots(&factory_id, &factoryerp_core::ListParams::default())
            .unwrap();
        assert_eq!(lots.total, 0);
        let material = svc.get_material(&material_id).unwrap();
        assert_eq!(material.reserved_qty, 0.0);
    }

    #[test]
    fn intake_failure_is_repeatable_without_duplicates() {
        let svc = test_service();
        let (factory_id, model_id, _) = seeded_factory(&svc);

        for _ in 0..2 {
            let err = svc
                .create_order_and_initiate_production(&factory_id, &order_fields(&model_id, 300))
                .unwrap_err();
            assert!(err.to_string().contains("insufficient stock"));
        }
        let orders = svc
            .list_orders(&factory_id, &factoryerp_core::ListParams::default())
            .unwrap();
        assert_eq!(orders.total, 0);
    }

    #[test]
    fn intake_rejects_unknown_product_model() {
        let svc = test_service();
        let (factory_id, _, _) = seeded_factory(&svc);

        let err = svc
            .create_order_and_initiate_production(&factory_id, &order_fields("missing", 10))
            .unwrap_err();
        assert!(matches!(err, MfgError::NotFound(_)));
    }

    #[test]
    fn intake_rejects_foreign_product_model() {
        let svc = test_service();
        let (factory_id, _, _) = seeded_factory(&svc);
        let (_, other_model_id, _) = seeded_factory(&svc);

        // A model belonging to another factory is invisible here.
        let err = svc
            .create_order_and_initiate_production(&factory_id, &order_fields(&other_model_id, 10))
            .unwrap_err();
        assert!(matches!(err, MfgError::NotFound(_)));
    }

    #[test]
    fn intake_without_bom_reserves_nothing() {
        let svc = test_service();
        let (factory_id, _, _) = seeded_factory(&svc);
        let model = svc
            .create_product_model(
                &factory_id,
                CreateProductModel {
                    name: "Service Item".to_string(),
                    description: None,
                    materials: vec![],
                },
            )
            .unwrap();

        let result = svc
            .create_order_and_initiate_production(&factory_id, &order_fields(&model.id, 5))
            .unwrap();
        assert!(!result.materials_reserved);
    }
}

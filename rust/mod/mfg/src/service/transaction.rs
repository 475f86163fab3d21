//! Financial transactions: advances, payments, expenses.

use factoryerp_core::{ListParams, ListResult, new_id, now_rfc3339};
use factoryerp_sql::Value;

use crate::model::{CreateTransaction, Transaction, TransactionKind};
use crate::service::{MfgError, MfgService, get_record, insert_record, list_records};

fn kind_str(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Advance => "ADVANCE",
        TransactionKind::Payment => "PAYMENT",
        TransactionKind::Expense => "EXPENSE",
    }
}

impl MfgService {
    pub fn create_transaction(
        &self,
        factory_id: &str,
        input: CreateTransaction,
    ) -> Result<Transaction, MfgError> {
        if input.amount <= 0.0 {
            return Err(MfgError::Validation("amount must be positive".into()));
        }
        if let Some(order_id) = &input.order_id {
            let _: crate::model::Order = get_record(self.db(), "orders", order_id)?;
        }

        let now = now_rfc3339();
        let txn = Transaction {
            id: new_id(),
            factory_id: factory_id.to_string(),
            order_id: input.order_id,
            kind: input.kind,
            amount: input.amount,
            note: input.note,
            occurred_at: now.clone(),
        };

        let mut indexes = vec![
            ("factory_id", Value::Text(factory_id.to_string())),
            ("kind", Value::Text(kind_str(txn.kind).to_string())),
            ("amount", Value::Real(txn.amount)),
            ("created_at", Value::Text(now)),
        ];
        if let Some(order_id) = &txn.order_id {
            indexes.push(("order_id", Value::Text(order_id.clone())));
        }

        insert_record(self.db(), "transactions", &txn.id, &txn, &indexes)?;
        Ok(txn)
    }

    pub fn get_transaction(&self, id: &str) -> Result<Transaction, MfgError> {
        get_record(self.db(), "transactions", id)
    }

    pub fn list_transactions(
        &self,
        factory_id: &str,
        params: &ListParams,
    ) -> Result<ListResult<Transaction>, MfgError> {
        let (items, total) = list_records(
            self.db(),
            "transactions",
            &[("factory_id", Value::Text(factory_id.to_string()))],
            params.limit,
            params.offset,
        )?;
        Ok(ListResult { items, total })
    }

    pub fn list_transactions_for_order(
        &self,
        order_id: &str,
    ) -> Result<Vec<Transaction>, MfgError> {
        let (items, _) = list_records(
            self.db(),
            "transactions",
            &[("order_id", Value::Text(order_id.to_string()))],
            1000,
            0,
        )?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{order_fields, seeded_factory, test_service};

    #[test]
    fn expense_needs_no_order() {
        let svc = test_service();
        let (factory_id, _, _) = seeded_factory(&svc);

        let txn = svc
            .create_transaction(
                &factory_id,
                CreateTransaction {
                    order_id: None,
                    kind: TransactionKind::Expense,
                    amount: 40.0,
                    note: Some("thread spools".to_string()),
                },
            )
            .unwrap();
        assert_eq!(txn.kind, TransactionKind::Expense);

        let list = svc
            .list_transactions(&factory_id, &ListParams::default())
            .unwrap();
        assert_eq!(list.total, 1);
    }

    #[test]
    fn order_linked_transaction_requires_the_order() {
        let svc = test_service();
        let (factory_id, model_id, _) = seeded_factory(&svc);

        let err = svc
            .create_transaction(
                &factory_id,
                CreateTransaction {
                    order_id: Some("missing".to_string()),
                    kind: TransactionKind::Payment,
                    amount: 10.0,
                    note: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, MfgError::NotFound(_)));

        let result = svc
            .create_order_and_initiate_production(&factory_id, &order_fields(&model_id, 10))
            .unwrap();
        svc.create_transaction(
            &factory_id,
            CreateTransaction {
                order_id: Some(result.order_id.clone()),
                kind: TransactionKind::Payment,
                amount: 10.0,
                note: None,
            },
        )
        .unwrap();
        let linked = svc.list_transactions_for_order(&result.order_id).unwrap();
        assert_eq!(linked.len(), 1);
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let svc = test_service();
        let err = svc
            .create_transaction(
                "f1",
                CreateTransaction {
                    order_id: None,
                    kind: TransactionKind::Expense,
                    amount: 0.0,
                    note: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, MfgError::Validation(_)));
    }
}

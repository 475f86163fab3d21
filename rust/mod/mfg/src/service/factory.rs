use factoryerp_core::{ListParams, ListResult, merge_patch, new_id, now_rfc3339};
use factoryerp_sql::Value;

use crate::model::{CreateFactory, Factory};
use crate::service::{MfgError, MfgService, delete_record, get_record, insert_record, list_records, update_record};

impl MfgService {
    pub fn create_factory(&self, input: CreateFactory) -> Result<Factory, MfgError> {
        if input.name.trim().is_empty() {
            return Err(MfgError::Validation("factory name is required".into()));
        }
        let now = now_rfc3339();
        let factory = Factory {
            id: new_id(),
            name: input.name,
            owner_user_id: input.owner_user_id,
            address: input.address,
            phone: input.phone,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        insert_record(
            self.db(),
            "factories",
            &factory.id,
            &factory,
            &[
                ("name", Value::Text(factory.name.clone())),
                ("owner_user_id", Value::Text(factory.owner_user_id.clone())),
                ("created_at", Value::Text(now.clone())),
                ("updated_at", Value::Text(now)),
            ],
        )?;
        Ok(factory)
    }

    pub fn get_factory(&self, id: &str) -> Result<Factory, MfgError> {
        get_record(self.db(), "factories", id)
    }

    pub fn list_factories(&self, params: &ListParams) -> Result<ListResult<Factory>, MfgError> {
        let (items, total) =
            list_records(self.db(), "factories", &[], params.limit, params.offset)?;
        Ok(ListResult { items, total })
    }

    pub fn update_factory(
        &self,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Factory, MfgError> {
        let current: Factory = get_record(self.db(), "factories", id)?;
        let now = now_rfc3339();

        let mut base =
            serde_json::to_value(&current).map_err(|e| MfgError::Internal(e.to_string()))?;
        let mut patch = patch;
        if let Some(obj) = patch.as_object_mut() {
            obj.remove("id");
            obj.remove("created_at");
        }
        merge_patch(&mut base, &patch);
        base["updated_at"] = serde_json::json!(now);

        let updated: Factory =
            serde_json::from_value(base).map_err(|e| MfgError::Internal(e.to_string()))?;

        update_record(
            self.db(),
            "factories",
            id,
            &updated,
            &[
                ("name", Value::Text(updated.name.clone())),
                ("owner_user_id", Value::Text(updated.owner_user_id.clone())),
                ("updated_at", Value::Text(now)),
            ],
        )?;
        Ok(updated)
    }

    pub fn delete_factory(&self, id: &str) -> Result<(), MfgError> {
        delete_record(self.db(), "factories", id)
    }
}

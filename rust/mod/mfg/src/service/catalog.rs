//! Product models, materials, and operation templates — the factory's
//! catalog that the intake workflow draws on.

use factoryerp_core::{ListParams, ListResult, merge_patch, new_id, now_rfc3339};
use factoryerp_sql::Value;

use crate::model::{
    CreateMaterial, CreateOperationTemplate, CreateProductModel, Material, OperationTemplate,
    ProductModel,
};
use crate::service::{MfgError, MfgService, delete_record, get_record, insert_record, list_records, update_record};

impl MfgService {
    // ── Product models ──

    pub fn create_product_model(
        &self,
        factory_id: &str,
        input: CreateProductModel,
    ) -> Result<ProductModel, MfgError> {
        if input.name.trim().is_empty() {
            return Err(MfgError::Validation("product model name is required".into()));
        }
        for req in &input.materials {
            if req.qty_per_unit <= 0.0 {
                return Err(MfgError::Validation(format!(
                    "qty_per_unit for material {} must be positive",
                    req.material_id
                )));
            }
        }

        let now = now_rfc3339();
        let model = ProductModel {
            id: new_id(),
            factory_id: factory_id.to_string(),
            name: input.name,
            description: input.description,
            materials: input.materials,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        insert_record(
            self.db(),
            "product_models",
            &model.id,
            &model,
            &[
                ("factory_id", Value::Text(factory_id.to_string())),
                ("name", Value::Text(model.name.clone())),
                ("created_at", Value::Text(now.clone())),
                ("updated_at", Value::Text(now)),
            ],
        )?;
        Ok(model)
    }

    pub fn get_product_model(&self, id: &str) -> Result<ProductModel, MfgError> {
        get_record(self.db(), "product_models", id)
    }

    pub fn list_product_models(
        &self,
        factory_id: &str,
        params: &ListParams,
    ) -> Result<ListResult<ProductModel>, MfgError> {
        let (items, total) = list_records(
            self.db(),
            "product_models",
            &[("factory_id", Value::Text(factory_id.to_string()))],
            params.limit,
            params.offset,
        )?;
        Ok(ListResult { items, total })
    }

    pub fn update_product_model(
        &self,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<ProductModel, MfgError> {
        let current: ProductModel = get_record(self.db(), "product_models", id)?;
        let now = now_rfc3339();

        let mut base =
            serde_json::to_value(&current).map_err(|e| MfgError::Internal(e.to_string()))?;
        let mut patch = patch;
        if let Some(obj) = patch.as_object_mut() {
            obj.remove("id");
            obj.remove("factory_id");
            obj.remove("created_at");
        }
        merge_patch(&mut base, &patch);
        base["updated_at"] = serde_json::json!(now);

        let updated: ProductModel =
            serde_json::from_value(base).map_err(|e| MfgError::Internal(e.to_string()))?;

        update_record(
            self.db(),
            "product_models",
            id,
            &updated,
            &[
                ("name", Value::Text(updated.name.clone())),
                ("updated_at", Value::Text(now)),
            ],
        )?;
        Ok(updated)
    }

    pub fn delete_product_model(&self, id: &str) -> Result<(), MfgError> {
        delete_record(self.db(), "product_models", id)
    }

    // ── Materials ──

    pub fn create_material(
        &self,
        factory_id: &str,
        input: CreateMaterial,
    ) -> Result<Material, MfgError> {
        if input.name.trim().is_empty() {
            return Err(MfgError::Validation("material name is required".into()));
        }
        if input.stock_qty < 0.0 {
            return Err(MfgError::Validation("stock_qty cannot be negative".into()));
        }

        let now = now_rfc3339();
        let material = Material {
            id: new_id(),
            factory_id: factory_id.to_string(),
            name: input.name,
            unit: input.unit,
            stock_qty: input.stock_qty,
            reserved_qty: 0.0,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        insert_record(
            self.db(),
            "materials",
            &material.id,
            &material,
            &[
                ("factory_id", Value::Text(factory_id.to_string())),
                ("name", Value::Text(material.name.clone())),
                ("stock_qty", Value::Real(material.stock_qty)),
                ("reserved_qty", Value::Real(0.0)),
                ("created_at", Value::Text(now.clone())),
                ("updated_at", Value::Text(now)),
            ],
        )?;
        Ok(material)
    }

    pub fn get_material(&self, id: &str) -> Result<Material, MfgError> {
        get_record(self.db(), "materials", id)
    }

    pub fn list_materials(
        &self,
        factory_id: &str,
        params: &ListParams,
    ) -> Result<ListResult<Material>, MfgError> {
        let (items, total) = list_records(
            self.db(),
            "materials",
            &[("factory_id", Value::Text(factory_id.to_string()))],
            params.limit,
            params.offset,
        )?;
        Ok(ListResult { items, total })
    }

    /// Adjust stock on hand (delivery in, correction out).
    pub fn adjust_material_stock(&self, id: &str, delta: f64) -> Result<Material, MfgError> {
        let mut material: Material = get_record(self.db(), "materials", id)?;
        let new_stock = material.stock_qty + delta;
        if new_stock < material.reserved_qty {
            return Err(MfgError::Validation(format!(
                "stock for material '{}' cannot drop below reserved quantity ({})",
                material.name, material.reserved_qty
            )));
        }
        material.stock_qty = new_stock;
        let now = now_rfc3339();
        material.updated_at = now.clone();

        update_record(
            self.db(),
            "materials",
            id,
            &material,
            &[
                ("stock_qty", Value::Real(material.stock_qty)),
                ("updated_at", Value::Text(now)),
            ],
        )?;
        Ok(material)
    }

    pub fn delete_material(&self, id: &str) -> Result<(), MfgError> {
        delete_record(self.db(), "materials", id)
    }

    // ── Operation templates ──

    pub fn create_operation_template(
        &self,
        factory_id: &str,
        input: CreateOperationTemplate,
    ) -> Result<OperationTemplate, MfgError> {
        if input.name.trim().is_empty() {
            return Err(MfgError::Validation("template name is required".into()));
        }

        let now = now_rfc3339();
        let template = OperationTemplate {
            id: new_id(),
            factory_id: factory_id.to_string(),
            name: input.name,
            sequence: input.sequence,
            description: input.description,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        insert_record(
            self.db(),
            "operation_templates",
            &template.id,
            &template,
            &[
                ("factory_id", Value::Text(factory_id.to_string())),
                ("name", Value::Text(template.name.clone())),
                ("sequence", Value::Integer(template.sequence)),
                ("created_at", Value::Text(now.clone())),
                ("updated_at", Value::Text(now)),
            ],
        )?;
        Ok(template)
    }

    pub fn get_operation_template(&self, id: &str) -> Result<OperationTemplate, MfgError> {
        get_record(self.db(), "operation_templates", id)
    }

    /// Templates for a factory in workflow order.
    pub fn list_operation_templates(
        &self,
        factory_id: &str,
    ) -> Result<Vec<OperationTemplate>, MfgError> {
        let rows = self
            .db()
            .query(
                "SELECT data FROM operation_templates WHERE factory_id = ?1 ORDER BY sequence ASC",
                &[Value::Text(factory_id.to_string())],
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

    pub fn delete_operation_template(&self, id: &str) -> Result<(), MfgError> {
        delete_record(self.db(), "operation_templates", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MaterialRequirement;
    use factoryerp_sql::SqliteStore;

    fn test_service() -> std::sync::Arc<MfgService> {
        let sql = std::sync::Arc::new(SqliteStore::open_in_memory().unwrap());
        MfgService::new(sql).unwrap()
    }

    #[test]
    fn test_product_model_crud() {
        let svc = test_service();
        let model = svc
            .create_product_model(
                "f1",
                CreateProductModel {
                    name: "Denim Jacket".to_string(),
                    description: None,
                    materials: vec![MaterialRequirement {
                        material_id: "m1".to_string(),
                        qty_per_unit: 1.5,
                    }],
                },
            )
            .unwrap();

        let fetched = svc.get_product_model(&model.id).unwrap();
        assert_eq!(fetched.materials.len(), 1);

        let list = svc.list_product_models("f1", &ListParams::default()).unwrap();
        assert_eq!(list.total, 1);
        assert!(svc.list_product_models("f2", &ListParams::default()).unwrap().items.is_empty());
    }

    #[test]
    fn test_material_stock_adjustment() {
        let svc = test_service();
        let material = svc
            .create_material(
                "f1",
                CreateMaterial {
                    name: "denim".to_string(),
                    unit: "m".to_string(),
                    stock_qty: 50.0,
                },
            )
            .unwrap();

        let adjusted = svc.adjust_material_stock(&material.id, 25.0).unwrap();
        assert_eq!(adjusted.stock_qty, 75.0);

        // Cannot drop below reserved.
        let err = svc.adjust_material_stock(&material.id, -100.0).unwrap_err();
        assert!(matches!(err, MfgError::Validation(_)));
    }

    #[test]
    fn test_templates_ordered_by_sequence() {
        let svc = test_service();
        for (name, seq) in [("sew", 2), ("cut", 1), ("pack", 3)] {
            svc.create_operation_template(
                "f1",
                CreateOperationTemplate {
                    name: name.to_string(),
                    sequence: seq,
                    description: None,
                },
            )
            .unwrap();
        }
        let templates = svc.list_operation_templates("f1").unwrap();
        let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["cut", "sew", "pack"]);
    }
}

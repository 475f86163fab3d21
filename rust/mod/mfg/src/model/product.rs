use serde::{Deserialize, Serialize};

/// One line of a product model's bill of materials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialRequirement {
    pub material_id: String,
    /// Material consumed per ordered unit.
    pub qty_per_unit: f64,
}

/// A product model — what a factory can produce, with its bill of
/// materials. Orders reference a product model; the intake operation
/// reserves materials according to its requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductModel {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Owning factory (tenant).
    pub factory_id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Bill of materials.
    #[serde(default)]
    pub materials: Vec<MaterialRequirement>,

    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a product model.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductModel {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub materials: Vec<MaterialRequirement>,
}

/// A raw material held in factory stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Owning factory (tenant).
    pub factory_id: String,

    pub name: String,

    /// Unit of measure ("kg", "m", "pcs").
    pub unit: String,

    /// Quantity on hand.
    #[serde(default)]
    pub stock_qty: f64,

    /// Quantity reserved for initiated production.
    #[serde(default)]
    pub reserved_qty: f64,

    pub created_at: String,
    pub updated_at: String,
}

impl Material {
    /// Stock not yet claimed by any production lot.
    pub fn available(&self) -> f64 {
        self.stock_qty - self.reserved_qty
    }
}

/// Input for creating a material.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaterial {
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub stock_qty: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_subtracts_reserved() {
        let m = Material {
            id: "m1".into(),
            factory_id: "f1".into(),
            name: "steel".into(),
            unit: "kg".into(),
            stock_qty: 100.0,
            reserved_qty: 30.0,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(m.available(), 70.0);
    }
}

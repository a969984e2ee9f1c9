use serde::{Deserialize, Serialize};

use restock_core::numeric::ensure_non_negative;
use restock_core::{DomainError, DomainResult, Entity, ItemId, SupplierId};

use crate::grade::{AbcGrade, XyzGrade};
use crate::status::InventoryStatus;

/// Primary supplier reference carried on a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRef {
    pub id: SupplierId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Catalog snapshot of one SKU at evaluation time.
///
/// Owned by the storage collaborator; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub sku: String,
    pub name: String,
    pub current_stock: i64,
    pub safety_stock: i64,
    pub reorder_point: i64,
    /// Minimum order quantity imposed by the supplier (>= 1).
    #[serde(default = "default_moq")]
    pub moq: i64,
    pub lead_time_days: u32,
    pub unit_cost: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub abc_grade: Option<AbcGrade>,
    #[serde(default)]
    pub xyz_grade: Option<XyzGrade>,
    #[serde(default)]
    pub supplier: Option<SupplierRef>,
}

fn default_moq() -> i64 {
    1
}

impl CatalogItem {
    /// Minimal item with zeroed stock figures; tests and callers fill in the rest.
    pub fn new(id: ItemId, sku: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            sku: sku.into(),
            name: name.into(),
            current_stock: 0,
            safety_stock: 0,
            reorder_point: 0,
            moq: 1,
            lead_time_days: 0,
            unit_cost: 0.0,
            unit_price: 0.0,
            abc_grade: None,
            xyz_grade: None,
            supplier: None,
        }
    }

    /// Reject snapshots that break the catalog contract.
    pub fn validate(&self) -> DomainResult<()> {
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        for (field, value) in [
            ("current_stock", self.current_stock),
            ("safety_stock", self.safety_stock),
            ("reorder_point", self.reorder_point),
        ] {
            if value < 0 {
                return Err(DomainError::validation(format!(
                    "{field} cannot be negative (item {}, got {value})",
                    self.sku
                )));
            }
        }
        if self.moq < 1 {
            return Err(DomainError::validation(format!(
                "moq must be at least 1 (item {}, got {})",
                self.sku, self.moq
            )));
        }
        ensure_non_negative("unit_cost", self.unit_cost)?;
        ensure_non_negative("unit_price", self.unit_price)?;
        Ok(())
    }

    pub fn status(&self) -> InventoryStatus {
        InventoryStatus::classify(self.current_stock, self.safety_stock, self.reorder_point)
    }

    pub fn at_or_below_reorder_point(&self) -> bool {
        self.current_stock <= self.reorder_point
    }

    /// Supplier id and name, only when both are known.
    pub fn named_supplier(&self) -> Option<(SupplierId, &str)> {
        let supplier = self.supplier.as_ref()?;
        let name = supplier.name.as_deref().filter(|n| !n.trim().is_empty())?;
        Some((supplier.id, name))
    }

    pub fn with_stock(mut self, current: i64, safety: i64, reorder_point: i64) -> Self {
        self.current_stock = current;
        self.safety_stock = safety;
        self.reorder_point = reorder_point;
        self
    }

    pub fn with_costs(mut self, unit_cost: f64, unit_price: f64) -> Self {
        self.unit_cost = unit_cost;
        self.unit_price = unit_price;
        self
    }

    pub fn with_lead_time(mut self, days: u32) -> Self {
        self.lead_time_days = days;
        self
    }

    pub fn with_moq(mut self, moq: i64) -> Self {
        self.moq = moq;
        self
    }

    pub fn with_grades(mut self, abc: Option<AbcGrade>, xyz: Option<XyzGrade>) -> Self {
        self.abc_grade = abc;
        self.xyz_grade = xyz;
        self
    }

    pub fn with_supplier(mut self, id: SupplierId, name: Option<String>) -> Self {
        self.supplier = Some(SupplierRef { id, name });
        self
    }
}

impl Entity for CatalogItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> CatalogItem {
        CatalogItem::new(ItemId::new(), "SKU-1", "Widget")
            .with_stock(5, 20, 35)
            .with_costs(1000.0, 1500.0)
            .with_lead_time(7)
            .with_moq(10)
    }

    #[test]
    fn valid_item_passes() {
        assert!(item().validate().is_ok());
        assert_eq!(item().status(), InventoryStatus::Critical);
        assert!(item().at_or_below_reorder_point());
    }

    #[test]
    fn negative_figures_are_rejected() {
        let err = item().with_stock(-1, 20, 35).validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("current_stock")));

        assert!(item().with_moq(0).validate().is_err());
        assert!(item().with_costs(-5.0, 1.0).validate().is_err());

        let mut blank = item();
        blank.sku = "  ".to_string();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn named_supplier_requires_name() {
        let sid = SupplierId::new();
        assert!(item().with_supplier(sid, None).named_supplier().is_none());
        assert!(item().with_supplier(sid, Some(String::new())).named_supplier().is_none());
        let with_name = item().with_supplier(sid, Some("Acme".to_string()));
        assert_eq!(with_name.named_supplier(), Some((sid, "Acme")));
    }
}

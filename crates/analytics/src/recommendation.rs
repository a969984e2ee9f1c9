//! Reorder recommendations for items at or below their reorder point.

use serde::{Deserialize, Serialize};

use restock_core::numeric::ensure_non_negative;
use restock_core::{DomainResult, ItemId, SupplierId};
use restock_inventory::{AbcGrade, CatalogItem, ReorderStatus};
use restock_policy::eoq::DAYS_PER_YEAR;
use restock_policy::{HoldingCostInput, OrderQuantityInput, QuantityMethod, eoq, order_quantity};

use crate::config::AnalyticsConfig;

/// Supplier details, present only when the supplier has both an id and a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierSummary {
    pub id: SupplierId,
    pub name: String,
    pub lead_time_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderRecommendation {
    pub item_id: ItemId,
    pub sku: String,
    pub name: String,
    pub current_stock: i64,
    pub safety_stock: i64,
    pub reorder_point: i64,
    pub average_daily_demand: f64,
    /// Whole days of stock above safety stock; `None` without demand.
    pub days_of_stock: Option<i64>,
    pub recommended_quantity: i64,
    pub projected_stock: i64,
    pub status: ReorderStatus,
    pub urgency_level: u8,
    pub supplier: Option<SupplierSummary>,
    pub quantity_method: QuantityMethod,
    pub abc_grade: Option<AbcGrade>,
    pub lead_time_days: u32,
}

/// `floor(max(0, current - SS) / d̄)`, `None` when `d̄ <= 0`.
pub fn days_of_stock(current_stock: i64, safety_stock: i64, average_daily_demand: f64) -> Option<i64> {
    if average_daily_demand.is_nan() || average_daily_demand <= 0.0 {
        return None;
    }
    let above = (current_stock - safety_stock).max(0) as f64;
    Some((above / average_daily_demand).floor() as i64)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RecommendationEngine {
    ordering_cost: f64,
    holding_rate: f64,
    target_days: u32,
    order_multiple: i64,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::from_config(&AnalyticsConfig::default())
    }
}

impl RecommendationEngine {
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self {
            ordering_cost: config.ordering_cost,
            holding_rate: config.holding_rate,
            target_days: config.target_days,
            order_multiple: config.order_multiple,
        }
    }

    /// Recommendation for one item, or `None` when it does not need ordering.
    ///
    /// The item's own safety stock and reorder point are used as given.
    pub fn evaluate(
        &self,
        item: &CatalogItem,
        average_daily_demand: f64,
    ) -> DomainResult<Option<ReorderRecommendation>> {
        item.validate()?;
        ensure_non_negative("average_daily_demand", average_daily_demand)?;

        if !item.at_or_below_reorder_point() {
            return Ok(None);
        }
        let Ok(status) = ReorderStatus::try_from(item.status()) else {
            return Ok(None);
        };

        let holding = HoldingCostInput::new(item.unit_cost)
            .with_holding_rate(self.holding_rate)
            .annual_cost()?;
        let economic = eoq(average_daily_demand * DAYS_PER_YEAR, self.ordering_cost, holding)?;

        let quantity = order_quantity(
            &OrderQuantityInput::new(item.current_stock, item.safety_stock, average_daily_demand)
                .with_eoq(economic.eoq)
                .with_target_days(self.target_days)
                .with_min_order_quantity(item.moq)
                .with_order_multiple(self.order_multiple),
        )?;

        let supplier = item.named_supplier().map(|(id, name)| SupplierSummary {
            id,
            name: name.to_string(),
            lead_time_days: item.lead_time_days,
        });

        Ok(Some(ReorderRecommendation {
            item_id: item.id,
            sku: item.sku.clone(),
            name: item.name.clone(),
            current_stock: item.current_stock,
            safety_stock: item.safety_stock,
            reorder_point: item.reorder_point,
            average_daily_demand,
            days_of_stock: days_of_stock(item.current_stock, item.safety_stock, average_daily_demand),
            recommended_quantity: quantity.recommended_quantity,
            projected_stock: quantity.projected_stock,
            status,
            urgency_level: status.urgency_level(),
            supplier,
            quantity_method: quantity.method,
            abc_grade: item.abc_grade,
            lead_time_days: item.lead_time_days,
        }))
    }
}

pub fn filter_by_urgency(
    recommendations: &[ReorderRecommendation],
    min_urgency: u8,
) -> Vec<&ReorderRecommendation> {
    recommendations
        .iter()
        .filter(|r| r.urgency_level >= min_urgency)
        .collect()
}

pub fn filter_by_abc_grade(
    recommendations: &[ReorderRecommendation],
    grade: AbcGrade,
) -> Vec<&ReorderRecommendation> {
    recommendations
        .iter()
        .filter(|r| r.abc_grade == Some(grade))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn critical_item() -> CatalogItem {
        CatalogItem::new(ItemId::new(), "SKU-1", "Widget")
            .with_stock(5, 20, 35)
            .with_costs(1000.0, 1500.0)
            .with_lead_time(7)
            .with_moq(10)
    }

    #[test]
    fn critical_item_gets_eoq_quantity() {
        let rec = RecommendationEngine::default()
            .evaluate(&critical_item(), 2.0)
            .unwrap()
            .unwrap();

        assert_eq!(rec.status, ReorderStatus::Critical);
        assert_eq!(rec.urgency_level, 3);
        // D = 730, S = 50 000, H = 250 → √292 000 ≈ 540.4 → 541
        assert_eq!(rec.recommended_quantity, 541);
        assert!(rec.recommended_quantity >= 10);
        assert_eq!(rec.quantity_method, QuantityMethod::Eoq);
        assert_eq!(rec.days_of_stock, Some(0));
        assert!(rec.current_stock <= rec.reorder_point);
        assert!(rec.supplier.is_none());
    }

    #[test]
    fn item_above_reorder_point_is_skipped() {
        let item = critical_item().with_stock(40, 20, 35);
        assert!(RecommendationEngine::default().evaluate(&item, 2.0).unwrap().is_none());
    }

    #[test]
    fn item_exactly_at_reorder_point_is_optimal_and_skipped() {
        let item = critical_item().with_stock(35, 20, 35);
        assert!(RecommendationEngine::default().evaluate(&item, 2.0).unwrap().is_none());
    }

    #[test]
    fn zero_cost_falls_back_to_target_days() {
        let item = critical_item().with_costs(0.0, 0.0).with_moq(1);
        let rec = RecommendationEngine::default().evaluate(&item, 2.0).unwrap().unwrap();
        // 2 × 30 + 20 - 5 = 75
        assert_eq!(rec.quantity_method, QuantityMethod::TargetDays);
        assert_eq!(rec.recommended_quantity, 75);
    }

    #[test]
    fn order_multiple_is_applied() {
        let config = AnalyticsConfig::default().with_order_multiple(50);
        let rec = RecommendationEngine::from_config(&config)
            .evaluate(&critical_item(), 2.0)
            .unwrap()
            .unwrap();
        assert_eq!(rec.recommended_quantity, 550);
    }

    #[test]
    fn supplier_summary_needs_a_name() {
        let supplier = SupplierId::new();
        let anonymous = critical_item().with_supplier(supplier, None);
        let named = critical_item().with_supplier(supplier, Some("Acme".into()));
        let engine = RecommendationEngine::default();

        assert!(engine.evaluate(&anonymous, 2.0).unwrap().unwrap().supplier.is_none());
        let summary = engine.evaluate(&named, 2.0).unwrap().unwrap().supplier.unwrap();
        assert_eq!(summary.name, "Acme");
        assert_eq!(summary.lead_time_days, 7);
    }

    #[test]
    fn days_of_stock_cases() {
        assert_eq!(days_of_stock(50, 20, 4.0), Some(7));
        assert_eq!(days_of_stock(10, 20, 4.0), Some(0));
        assert_eq!(days_of_stock(10, 20, 0.0), None);
    }

    #[test]
    fn filters() {
        let engine = RecommendationEngine::default();
        let a = engine
            .evaluate(&critical_item().with_grades(Some(AbcGrade::A), None), 2.0)
            .unwrap()
            .unwrap();
        // 30 < 35 and >= SS → caution, urgency 1
        let c = engine
            .evaluate(&critical_item().with_stock(30, 20, 35).with_grades(Some(AbcGrade::C), None), 2.0)
            .unwrap()
            .unwrap();
        let all = vec![a, c];

        assert_eq!(filter_by_urgency(&all, 2).len(), 1);
        assert_eq!(filter_by_abc_grade(&all, AbcGrade::C)[0].status, ReorderStatus::Caution);
    }
}

use core::fmt;

use serde::{Deserialize, Serialize};

use restock_core::DomainError;

/// Seven-level stock status, ordered from most to least urgent.
///
/// Boundaries (evaluated top to bottom, first match wins):
/// - `OutOfStock`: stock = 0
/// - `Critical`:   stock < SS × 0.5
/// - `Shortage`:   stock < SS
/// - `Caution`:    stock < ROP
/// - `Optimal`:    stock < SS × 3
/// - `Excess`:     stock < SS × 5
/// - `Overstock`:  otherwise
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    OutOfStock,
    Critical,
    Shortage,
    Caution,
    Optimal,
    Excess,
    Overstock,
}

const CRITICAL_FACTOR: f64 = 0.5;
const OPTIMAL_CEILING_FACTOR: f64 = 3.0;
const EXCESS_CEILING_FACTOR: f64 = 5.0;

impl InventoryStatus {
    pub fn classify(current_stock: i64, safety_stock: i64, reorder_point: i64) -> Self {
        let stock = current_stock as f64;
        let ss = safety_stock as f64;

        if current_stock == 0 {
            InventoryStatus::OutOfStock
        } else if stock < ss * CRITICAL_FACTOR {
            InventoryStatus::Critical
        } else if current_stock < safety_stock {
            InventoryStatus::Shortage
        } else if current_stock < reorder_point {
            InventoryStatus::Caution
        } else if stock < ss * OPTIMAL_CEILING_FACTOR {
            InventoryStatus::Optimal
        } else if stock < ss * EXCESS_CEILING_FACTOR {
            InventoryStatus::Excess
        } else {
            InventoryStatus::Overstock
        }
    }

    /// 0 (none) .. 3 (high). Excess/overstock escalate for disposal handling,
    /// not for replenishment.
    pub fn urgency_level(&self) -> u8 {
        match self {
            InventoryStatus::OutOfStock | InventoryStatus::Critical => 3,
            InventoryStatus::Shortage => 2,
            InventoryStatus::Caution => 1,
            InventoryStatus::Optimal => 0,
            InventoryStatus::Excess => 1,
            InventoryStatus::Overstock => 2,
        }
    }

    pub fn needs_action(&self) -> bool {
        !matches!(self, InventoryStatus::Optimal)
    }

    pub fn is_reorder_eligible(&self) -> bool {
        ReorderStatus::try_from(*self).is_ok()
    }

    pub fn is_overstocked(&self) -> bool {
        matches!(self, InventoryStatus::Excess | InventoryStatus::Overstock)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::OutOfStock => "out_of_stock",
            InventoryStatus::Critical => "critical",
            InventoryStatus::Shortage => "shortage",
            InventoryStatus::Caution => "caution",
            InventoryStatus::Optimal => "optimal",
            InventoryStatus::Excess => "excess",
            InventoryStatus::Overstock => "overstock",
        }
    }

    /// Suggested action for the status.
    pub fn advice(&self) -> &'static str {
        match self {
            InventoryStatus::OutOfStock => "place an emergency order immediately",
            InventoryStatus::Critical => "expedite an order and negotiate a shorter lead time",
            InventoryStatus::Shortage => "place a replenishment order",
            InventoryStatus::Caution => "review and schedule a replenishment order",
            InventoryStatus::Optimal => "stock level is healthy",
            InventoryStatus::Excess => "plan to draw down stock (promotion, transfer)",
            InventoryStatus::Overstock => "plan disposal (discount, return, write-off)",
        }
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of [`InventoryStatus`] that warrants a replenishment order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderStatus {
    OutOfStock,
    Critical,
    Shortage,
    Caution,
}

impl ReorderStatus {
    pub fn urgency_level(&self) -> u8 {
        InventoryStatus::from(*self).urgency_level()
    }

    pub fn as_str(&self) -> &'static str {
        InventoryStatus::from(*self).as_str()
    }
}

impl From<ReorderStatus> for InventoryStatus {
    fn from(value: ReorderStatus) -> Self {
        match value {
            ReorderStatus::OutOfStock => InventoryStatus::OutOfStock,
            ReorderStatus::Critical => InventoryStatus::Critical,
            ReorderStatus::Shortage => InventoryStatus::Shortage,
            ReorderStatus::Caution => InventoryStatus::Caution,
        }
    }
}

impl TryFrom<InventoryStatus> for ReorderStatus {
    type Error = DomainError;

    fn try_from(value: InventoryStatus) -> Result<Self, Self::Error> {
        match value {
            InventoryStatus::OutOfStock => Ok(ReorderStatus::OutOfStock),
            InventoryStatus::Critical => Ok(ReorderStatus::Critical),
            InventoryStatus::Shortage => Ok(ReorderStatus::Shortage),
            InventoryStatus::Caution => Ok(ReorderStatus::Caution),
            other => Err(DomainError::invariant(format!(
                "status {other} does not warrant a reorder"
            ))),
        }
    }
}

impl fmt::Display for ReorderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_with_ss_100_rop_150() {
        let c = |stock| InventoryStatus::classify(stock, 100, 150);
        assert_eq!(c(0), InventoryStatus::OutOfStock);
        assert_eq!(c(49), InventoryStatus::Critical);
        assert_eq!(c(50), InventoryStatus::Shortage);
        assert_eq!(c(99), InventoryStatus::Shortage);
        assert_eq!(c(100), InventoryStatus::Caution);
        assert_eq!(c(149), InventoryStatus::Caution);
        assert_eq!(c(150), InventoryStatus::Optimal);
        assert_eq!(c(299), InventoryStatus::Optimal);
        assert_eq!(c(300), InventoryStatus::Excess);
        assert_eq!(c(499), InventoryStatus::Excess);
        assert_eq!(c(500), InventoryStatus::Overstock);
    }

    #[test]
    fn urgency_levels() {
        assert_eq!(InventoryStatus::OutOfStock.urgency_level(), 3);
        assert_eq!(InventoryStatus::Critical.urgency_level(), 3);
        assert_eq!(InventoryStatus::Shortage.urgency_level(), 2);
        assert_eq!(InventoryStatus::Caution.urgency_level(), 1);
        assert_eq!(InventoryStatus::Optimal.urgency_level(), 0);
        assert_eq!(InventoryStatus::Overstock.urgency_level(), 2);
    }

    #[test]
    fn only_first_four_states_are_reorder_eligible() {
        assert!(InventoryStatus::Caution.is_reorder_eligible());
        assert!(!InventoryStatus::Optimal.is_reorder_eligible());
        assert!(!InventoryStatus::Excess.is_reorder_eligible());
        assert!(ReorderStatus::try_from(InventoryStatus::Overstock).is_err());
        assert_eq!(
            ReorderStatus::try_from(InventoryStatus::Shortage).unwrap(),
            ReorderStatus::Shortage
        );
    }
}

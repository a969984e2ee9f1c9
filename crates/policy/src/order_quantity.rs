use serde::{Deserialize, Serialize};

use restock_core::numeric::{ensure_non_negative, to_units};
use restock_core::{DomainError, DomainResult};

pub const DEFAULT_TARGET_DAYS: u32 = 30;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityMethod {
    Eoq,
    TargetDays,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderQuantityInput {
    pub current_stock: i64,
    pub safety_stock: i64,
    pub average_daily_demand: f64,
    pub target_days: u32,
    /// Used as the base quantity when positive.
    pub eoq: Option<i64>,
    pub min_order_quantity: i64,
    pub order_multiple: i64,
}

impl OrderQuantityInput {
    pub fn new(current_stock: i64, safety_stock: i64, average_daily_demand: f64) -> Self {
        Self {
            current_stock,
            safety_stock,
            average_daily_demand,
            target_days: DEFAULT_TARGET_DAYS,
            eoq: None,
            min_order_quantity: 1,
            order_multiple: 1,
        }
    }

    pub fn with_eoq(mut self, eoq: i64) -> Self {
        self.eoq = Some(eoq);
        self
    }

    pub fn with_target_days(mut self, days: u32) -> Self {
        self.target_days = days;
        self
    }

    pub fn with_min_order_quantity(mut self, moq: i64) -> Self {
        self.min_order_quantity = moq;
        self
    }

    pub fn with_order_multiple(mut self, multiple: i64) -> Self {
        self.order_multiple = multiple;
        self
    }

    fn validate(&self) -> DomainResult<()> {
        if self.current_stock < 0 || self.safety_stock < 0 {
            return Err(DomainError::validation("stock figures cannot be negative"));
        }
        ensure_non_negative("average_daily_demand", self.average_daily_demand)?;
        if self.min_order_quantity < 1 {
            return Err(DomainError::validation(format!(
                "min_order_quantity must be at least 1 (got {})",
                self.min_order_quantity
            )));
        }
        if self.order_multiple < 1 {
            return Err(DomainError::validation(format!(
                "order_multiple must be at least 1 (got {})",
                self.order_multiple
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuantityResult {
    pub recommended_quantity: i64,
    pub projected_stock: i64,
    /// Days of cover above safety stock after the order lands; `None` without demand.
    pub projected_days: Option<i64>,
    pub method: QuantityMethod,
}

/// Base quantity from EOQ (when positive) or target days of cover, then the
/// MOQ floor, then rounded up to the order multiple.
pub fn order_quantity(input: &OrderQuantityInput) -> DomainResult<OrderQuantityResult> {
    input.validate()?;

    let (base, method) = match input.eoq {
        Some(eoq) if eoq > 0 => (eoq, QuantityMethod::Eoq),
        _ => {
            let target =
                input.average_daily_demand * input.target_days as f64 + input.safety_stock as f64;
            let shortfall = to_units("order quantity", (target - input.current_stock as f64).max(0.0).ceil())?;
            (shortfall, QuantityMethod::TargetDays)
        }
    };

    let floored = base.max(input.min_order_quantity);
    let multiple = input.order_multiple;
    let quantity = floored
        .checked_add(multiple - 1)
        .map(|q| q / multiple * multiple)
        .ok_or_else(|| out_of_range("order quantity", floored))?;

    let projected_stock = input
        .current_stock
        .checked_add(quantity)
        .ok_or_else(|| out_of_range("projected stock", quantity))?;
    let projected_days = (input.average_daily_demand > 0.0).then(|| {
        ((projected_stock - input.safety_stock) as f64 / input.average_daily_demand).floor() as i64
    });

    Ok(OrderQuantityResult {
        recommended_quantity: quantity,
        projected_stock,
        projected_days,
        method,
    })
}

fn out_of_range(field: &str, value: i64) -> DomainError {
    DomainError::validation(format!("{field} is out of range (got {value})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eoq_is_used_when_positive() {
        let r = order_quantity(&OrderQuantityInput::new(5, 20, 2.0).with_eoq(541).with_min_order_quantity(10))
            .unwrap();
        assert_eq!(r.method, QuantityMethod::Eoq);
        assert_eq!(r.recommended_quantity, 541);
        assert_eq!(r.projected_stock, 546);
        assert_eq!(r.projected_days, Some(263));
    }

    #[test]
    fn target_days_fallback() {
        // target = 2 × 30 + 20 = 80; shortfall 75
        let r = order_quantity(&OrderQuantityInput::new(5, 20, 2.0).with_eoq(0)).unwrap();
        assert_eq!(r.method, QuantityMethod::TargetDays);
        assert_eq!(r.recommended_quantity, 75);
    }

    #[test]
    fn moq_then_multiple() {
        let r = order_quantity(
            &OrderQuantityInput::new(100, 20, 1.0)
                .with_min_order_quantity(12)
                .with_order_multiple(5),
        )
        .unwrap();
        // target 50 below stock: base 0 → MOQ 12 → multiple of 5 → 15
        assert_eq!(r.recommended_quantity, 15);
    }

    #[test]
    fn no_demand_has_no_projected_days() {
        let r = order_quantity(&OrderQuantityInput::new(0, 0, 0.0)).unwrap();
        assert_eq!(r.recommended_quantity, 1);
        assert_eq!(r.projected_days, None);
    }

    #[test]
    fn invalid_multiple_is_rejected() {
        assert!(order_quantity(&OrderQuantityInput::new(0, 0, 1.0).with_order_multiple(0)).is_err());
        assert!(order_quantity(&OrderQuantityInput::new(-2, 0, 1.0)).is_err());
    }

    #[test]
    fn oversized_quantities_are_rejected_not_wrapped() {
        let near_max = OrderQuantityInput::new(0, 0, 1.0)
            .with_eoq(i64::MAX)
            .with_order_multiple(7);
        assert!(matches!(order_quantity(&near_max), Err(DomainError::Validation(_))));

        let full_shelf = OrderQuantityInput::new(i64::MAX - 10, 0, 1.0).with_eoq(541);
        assert!(matches!(order_quantity(&full_shelf), Err(DomainError::Validation(_))));

        let huge_demand = OrderQuantityInput::new(0, 0, 1e300);
        assert!(matches!(order_quantity(&huge_demand), Err(DomainError::Validation(_))));
    }
}

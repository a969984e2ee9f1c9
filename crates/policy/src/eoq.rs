//! Economic order quantity and the holding-cost inputs behind it.

use serde::{Deserialize, Serialize};

use restock_core::DomainResult;
use restock_core::numeric::{ensure_non_negative, round_to, to_units};

pub const DEFAULT_HOLDING_RATE: f64 = 0.25;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Annual cost of holding one unit.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingCostInput {
    pub unit_cost: f64,
    #[serde(default = "default_holding_rate")]
    pub holding_rate: f64,
    #[serde(default)]
    pub monthly_storage_cost: f64,
    #[serde(default)]
    pub annual_insurance_cost: f64,
    #[serde(default)]
    pub other_annual_cost: f64,
}

fn default_holding_rate() -> f64 {
    DEFAULT_HOLDING_RATE
}

impl HoldingCostInput {
    pub fn new(unit_cost: f64) -> Self {
        Self {
            unit_cost,
            holding_rate: DEFAULT_HOLDING_RATE,
            monthly_storage_cost: 0.0,
            annual_insurance_cost: 0.0,
            other_annual_cost: 0.0,
        }
    }

    pub fn with_holding_rate(mut self, rate: f64) -> Self {
        self.holding_rate = rate;
        self
    }

    pub fn with_monthly_storage_cost(mut self, cost: f64) -> Self {
        self.monthly_storage_cost = cost;
        self
    }

    pub fn with_annual_insurance_cost(mut self, cost: f64) -> Self {
        self.annual_insurance_cost = cost;
        self
    }

    pub fn with_other_annual_cost(mut self, cost: f64) -> Self {
        self.other_annual_cost = cost;
        self
    }

    /// `unit_cost × rate + 12 × monthly storage + insurance + other`.
    pub fn annual_cost(&self) -> DomainResult<f64> {
        ensure_non_negative("unit_cost", self.unit_cost)?;
        ensure_non_negative("holding_rate", self.holding_rate)?;
        ensure_non_negative("monthly_storage_cost", self.monthly_storage_cost)?;
        ensure_non_negative("annual_insurance_cost", self.annual_insurance_cost)?;
        ensure_non_negative("other_annual_cost", self.other_annual_cost)?;
        Ok(self.unit_cost * self.holding_rate
            + self.monthly_storage_cost * 12.0
            + self.annual_insurance_cost
            + self.other_annual_cost)
    }
}

/// EOQ plus the yearly figures derived from the rounded quantity.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EoqResult {
    pub eoq: i64,
    /// 2 decimals.
    pub orders_per_year: f64,
    pub order_cycle_days: i64,
    pub annual_ordering_cost: f64,
    pub annual_holding_cost: f64,
    pub total_annual_cost: f64,
}

impl EoqResult {
    pub fn is_zero(&self) -> bool {
        self.eoq == 0
    }
}

/// `ceil(√(2DS/H))`. All-zero result when any input is zero.
pub fn eoq(annual_demand: f64, ordering_cost: f64, holding_cost_per_unit: f64) -> DomainResult<EoqResult> {
    ensure_non_negative("annual_demand", annual_demand)?;
    ensure_non_negative("ordering_cost", ordering_cost)?;
    ensure_non_negative("holding_cost_per_unit", holding_cost_per_unit)?;
    if annual_demand <= 0.0 || ordering_cost <= 0.0 || holding_cost_per_unit <= 0.0 {
        return Ok(EoqResult::default());
    }

    let quantity = (2.0 * annual_demand * ordering_cost / holding_cost_per_unit).sqrt().ceil();
    let units = to_units("eoq", quantity)?;
    let orders_per_year = annual_demand / quantity;
    let annual_ordering_cost = orders_per_year * ordering_cost;
    let annual_holding_cost = quantity / 2.0 * holding_cost_per_unit;

    Ok(EoqResult {
        eoq: units,
        orders_per_year: round_to(orders_per_year, 2),
        order_cycle_days: (DAYS_PER_YEAR / orders_per_year).round() as i64,
        annual_ordering_cost: annual_ordering_cost.round(),
        annual_holding_cost: annual_holding_cost.round(),
        total_annual_cost: (annual_ordering_cost + annual_holding_cost).round(),
    })
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityCostComparison {
    pub actual_annual_cost: f64,
    /// Actual minus EOQ total; positive means the actual quantity costs more.
    pub cost_difference: f64,
    /// Relative to the EOQ total, 2 decimals.
    pub cost_increase_percent: f64,
}

/// Annual ordering + holding cost of ordering `actual_quantity` instead of the EOQ.
pub fn compare_order_quantity_cost(
    eoq: &EoqResult,
    actual_quantity: f64,
    annual_demand: f64,
    ordering_cost: f64,
    holding_cost_per_unit: f64,
) -> DomainResult<QuantityCostComparison> {
    ensure_non_negative("annual_demand", annual_demand)?;
    ensure_non_negative("ordering_cost", ordering_cost)?;
    ensure_non_negative("holding_cost_per_unit", holding_cost_per_unit)?;
    if actual_quantity.is_nan() || actual_quantity <= 0.0 {
        return Ok(QuantityCostComparison {
            actual_annual_cost: 0.0,
            cost_difference: 0.0,
            cost_increase_percent: 0.0,
        });
    }

    let actual = annual_demand / actual_quantity * ordering_cost
        + actual_quantity / 2.0 * holding_cost_per_unit;
    let difference = actual - eoq.total_annual_cost;
    let percent = if eoq.total_annual_cost > 0.0 {
        difference / eoq.total_annual_cost * 100.0
    } else {
        0.0
    };

    Ok(QuantityCostComparison {
        actual_annual_cost: actual.round(),
        cost_difference: difference.round(),
        cost_increase_percent: round_to(percent, 2),
    })
}

/// Unit price available from `min_quantity` units upward.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountBracket {
    pub min_quantity: i64,
    pub unit_price: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountedEoq {
    pub quantity: i64,
    pub unit_price: f64,
    /// Purchase + ordering + holding, rounded.
    pub total_annual_cost: f64,
}

/// Cheapest bracket once purchase cost is included. `None` without brackets.
///
/// Each bracket's EOQ is lifted to the bracket minimum when it falls short.
pub fn eoq_with_discounts(
    annual_demand: f64,
    ordering_cost: f64,
    holding_rate: f64,
    brackets: &[DiscountBracket],
) -> DomainResult<Option<DiscountedEoq>> {
    ensure_non_negative("holding_rate", holding_rate)?;
    let mut sorted = brackets.to_vec();
    sorted.sort_by(|a, b| b.unit_price.total_cmp(&a.unit_price));

    let mut best: Option<(f64, DiscountedEoq)> = None;
    for bracket in &sorted {
        ensure_non_negative("unit_price", bracket.unit_price)?;
        let holding = bracket.unit_price * holding_rate;
        let base = eoq(annual_demand, ordering_cost, holding)?;
        let quantity = base.eoq.max(bracket.min_quantity).max(1);

        let q = quantity as f64;
        let total = annual_demand * bracket.unit_price
            + annual_demand / q * ordering_cost
            + q / 2.0 * holding;

        if best.as_ref().is_none_or(|(cost, _)| total < *cost) {
            best = Some((
                total,
                DiscountedEoq {
                    quantity,
                    unit_price: bracket.unit_price,
                    total_annual_cost: total.round(),
                },
            ));
        }
    }
    Ok(best.map(|(_, choice)| choice))
}

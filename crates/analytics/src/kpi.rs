//! Improvement proposals from supply-chain KPIs measured against targets.

use std::fmt;

use serde::{Deserialize, Serialize};

use restock_core::DomainResult;
use restock_core::numeric::ensure_non_negative;
use restock_policy::eoq::DAYS_PER_YEAR;

use crate::optimization::AdvisoryPriority;

/// Turnover shortfall, as a percentage of the target, that warrants a proposal.
const TURNOVER_GAP_PERCENT: f64 = 10.0;
const INVENTORY_DAYS_GAP: f64 = 5.0;
/// Percentage points.
const STOCKOUT_GAP: f64 = 0.5;
const ON_TIME_GAP: f64 = 3.0;
const LEAD_TIME_GAP_DAYS: f64 = 1.0;
const ACCURACY_GAP: f64 = 2.0;
const FULFILLMENT_GAP: f64 = 2.0;

/// One reading of every tracked KPI. Used for both measured values and targets.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    /// Turns per year.
    pub inventory_turnover: f64,
    pub average_inventory_days: f64,
    /// Percent.
    pub inventory_accuracy: f64,
    /// Percent.
    pub stockout_rate: f64,
    /// Percent.
    pub on_time_order_rate: f64,
    pub average_lead_time_days: f64,
    /// Percent.
    pub order_fulfillment_rate: f64,
}

impl KpiSnapshot {
    pub fn validate(&self) -> DomainResult<()> {
        ensure_non_negative("inventory_turnover", self.inventory_turnover)?;
        ensure_non_negative("average_inventory_days", self.average_inventory_days)?;
        ensure_non_negative("inventory_accuracy", self.inventory_accuracy)?;
        ensure_non_negative("stockout_rate", self.stockout_rate)?;
        ensure_non_negative("on_time_order_rate", self.on_time_order_rate)?;
        ensure_non_negative("average_lead_time_days", self.average_lead_time_days)?;
        ensure_non_negative("order_fulfillment_rate", self.order_fulfillment_rate)?;
        Ok(())
    }

    /// Every target met. Lead time is not part of the check.
    fn meets(&self, targets: &KpiSnapshot) -> bool {
        self.inventory_turnover >= targets.inventory_turnover
            && self.average_inventory_days <= targets.average_inventory_days
            && self.inventory_accuracy >= targets.inventory_accuracy
            && self.stockout_rate <= targets.stockout_rate
            && self.on_time_order_rate >= targets.on_time_order_rate
            && self.order_fulfillment_rate >= targets.order_fulfillment_rate
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kpi {
    InventoryTurnover,
    AverageInventoryDays,
    InventoryAccuracy,
    StockoutRate,
    OnTimeOrderRate,
    AverageLeadTime,
    OrderFulfillmentRate,
    InventoryValue,
}

impl fmt::Display for Kpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kpi::InventoryTurnover => "inventory turnover",
            Kpi::AverageInventoryDays => "average inventory days",
            Kpi::InventoryAccuracy => "inventory accuracy",
            Kpi::StockoutRate => "stockout rate",
            Kpi::OnTimeOrderRate => "on-time order rate",
            Kpi::AverageLeadTime => "average lead time",
            Kpi::OrderFulfillmentRate => "order fulfillment rate",
            Kpi::InventoryValue => "inventory value",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiCategory {
    Inventory,
    Order,
    Cost,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    ReduceExcessStock,
    ShortenOrderCycle,
    RecalculateBuffers,
    AutomateOrdering,
    ImproveSupplierLeadTime,
    TightenStockCounts,
    ImproveSupplierFulfillment,
    /// All targets met.
    SustainPerformance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementProposal {
    pub kind: ProposalKind,
    pub title: String,
    pub description: String,
    pub category: KpiCategory,
    /// Empty for [`ProposalKind::SustainPerformance`], which concerns every KPI.
    pub affected_kpis: Vec<Kpi>,
    pub priority: AdvisoryPriority,
    pub estimated_impact: String,
    pub action_steps: Vec<String>,
    pub time_to_implement: String,
}

struct Template {
    kind: ProposalKind,
    title: &'static str,
    category: KpiCategory,
    affected: &'static [Kpi],
    priority: AdvisoryPriority,
    steps: &'static [&'static str],
    time_to_implement: &'static str,
}

impl Template {
    fn build(&self, description: String, estimated_impact: String) -> ImprovementProposal {
        ImprovementProposal {
            kind: self.kind,
            title: self.title.to_string(),
            description,
            category: self.category,
            affected_kpis: self.affected.to_vec(),
            priority: self.priority,
            estimated_impact,
            action_steps: self.steps.iter().map(|s| s.to_string()).collect(),
            time_to_implement: self.time_to_implement.to_string(),
        }
    }
}

const REDUCE_EXCESS: Template = Template {
    kind: ProposalKind::ReduceExcessStock,
    title: "Clear excess stock and rebalance inventory",
    category: KpiCategory::Inventory,
    affected: &[Kpi::InventoryTurnover, Kpi::AverageInventoryDays, Kpi::InventoryValue],
    priority: AdvisoryPriority::High,
    steps: &[
        "Identify C-grade items without sales in the last 3 months",
        "Dispose of excess through write-off or discounted sale",
        "Reset order quantities to EOQ",
        "Review the turnover trend monthly",
    ],
    time_to_implement: "4-6 weeks",
};

const SHORTEN_CYCLE: Template = Template {
    kind: ProposalKind::ShortenOrderCycle,
    title: "Shorten order cycles to speed up stock rotation",
    category: KpiCategory::Inventory,
    affected: &[Kpi::AverageInventoryDays, Kpi::InventoryTurnover],
    priority: AdvisoryPriority::Medium,
    steps: &[
        "Agree more frequent deliveries with key suppliers",
        "Order smaller quantities more often",
        "Improve forecast accuracy to lower safety stock",
        "Pilot just-in-time replenishment on A-grade items",
    ],
    time_to_implement: "2-4 weeks",
};

const RECALCULATE_BUFFERS: Template = Template {
    kind: ProposalKind::RecalculateBuffers,
    title: "Recalculate safety stock and reorder points",
    category: KpiCategory::Inventory,
    affected: &[Kpi::StockoutRate, Kpi::OnTimeOrderRate],
    priority: AdvisoryPriority::High,
    steps: &[
        "Re-analyse the last 6 months of sales",
        "Consider a higher service level when recomputing safety stock",
        "Negotiate shorter supplier lead times",
        "Enable automatic ordering at the reorder point",
    ],
    time_to_implement: "1-2 weeks",
};

const AUTOMATE_ORDERING: Template = Template {
    kind: ProposalKind::AutomateOrdering,
    title: "Automate ordering and shorten lead times",
    category: KpiCategory::Order,
    affected: &[Kpi::OnTimeOrderRate, Kpi::OrderFulfillmentRate],
    priority: AdvisoryPriority::High,
    steps: &[
        "Place orders automatically when the reorder point is reached",
        "Negotiate shorter lead times with key suppliers",
        "Simplify approval with automatic approval rules",
        "Review open orders weekly",
    ],
    time_to_implement: "2-3 weeks",
};

const SUPPLIER_LEAD_TIME: Template = Template {
    kind: ProposalKind::ImproveSupplierLeadTime,
    title: "Manage supplier delivery performance and qualify alternatives",
    category: KpiCategory::Order,
    affected: &[Kpi::AverageLeadTime, Kpi::OrderFulfillmentRate, Kpi::OnTimeOrderRate],
    priority: AdvisoryPriority::Medium,
    steps: &[
        "Rank suppliers by lead-time performance",
        "Add delivery KPIs to key supplier contracts",
        "Qualify alternative suppliers with shorter lead times",
        "Negotiate bulk agreements for A-grade items",
    ],
    time_to_implement: "3-4 weeks",
};

const STOCK_COUNTS: Template = Template {
    kind: ProposalKind::TightenStockCounts,
    title: "Tighten stock counts and system checks",
    category: KpiCategory::Inventory,
    affected: &[Kpi::InventoryAccuracy, Kpi::InventoryTurnover],
    priority: AdvisoryPriority::Medium,
    steps: &[
        "Count twice a month instead of once",
        "Cycle count by grade: A monthly, B quarterly, C half-yearly",
        "Trace the frequency and cause of booking errors",
        "Retrain stock handlers",
    ],
    time_to_implement: "2 weeks",
};

const SUPPLIER_FULFILLMENT: Template = Template {
    kind: ProposalKind::ImproveSupplierFulfillment,
    title: "Improve supplier reliability and revisit contract terms",
    category: KpiCategory::Order,
    affected: &[Kpi::OrderFulfillmentRate, Kpi::OnTimeOrderRate],
    priority: AdvisoryPriority::Medium,
    steps: &[
        "Score suppliers on delivery time, quality and quantity accuracy",
        "Find the causes of partial deliveries",
        "Rework penalty and incentive clauses",
        "Hold monthly supplier reviews",
    ],
    time_to_implement: "3-4 weeks",
};

const SUSTAIN: Template = Template {
    kind: ProposalKind::SustainPerformance,
    title: "Sustain and extend current performance",
    category: KpiCategory::Cost,
    affected: &[],
    priority: AdvisoryPriority::Medium,
    steps: &[
        "Benchmark against industry averages",
        "Push forecast accuracy further",
        "Analyse the multi-echelon supply network",
        "Run a continuous improvement cycle",
    ],
    time_to_implement: "4+ weeks",
};

/// Compare measured KPIs with targets and propose improvements, in check order.
///
/// Each KPI yields a proposal only when it misses its target by more than its
/// gap constant. When every target except lead time is met a single
/// [`ProposalKind::SustainPerformance`] proposal is returned.
pub fn improvement_proposals(
    metrics: &KpiSnapshot,
    targets: &KpiSnapshot,
) -> DomainResult<Vec<ImprovementProposal>> {
    metrics.validate()?;
    targets.validate()?;
    let mut proposals = Vec::new();

    // metrics >= 0, so a shortfall implies a positive target.
    if metrics.inventory_turnover < targets.inventory_turnover {
        let gap = targets.inventory_turnover - metrics.inventory_turnover;
        let percent = gap / targets.inventory_turnover * 100.0;
        if percent > TURNOVER_GAP_PERCENT {
            proposals.push(REDUCE_EXCESS.build(
                format!(
                    "Inventory turnover is {percent:.1}% below target. Clear excess stock on C-grade items and rebalance inventory."
                ),
                format!(
                    "turnover +{gap:.1}/year, inventory days toward {:.0}",
                    DAYS_PER_YEAR / targets.inventory_turnover
                ),
            ));
        }
    }

    let days_gap = metrics.average_inventory_days - targets.average_inventory_days;
    if days_gap > INVENTORY_DAYS_GAP {
        proposals.push(SHORTEN_CYCLE.build(
            format!(
                "Average inventory days are {days_gap:.0} above target. Shorten order cycles and work more closely with suppliers."
            ),
            format!("inventory days -{days_gap:.0}"),
        ));
    }

    let stockout_gap = metrics.stockout_rate - targets.stockout_rate;
    if stockout_gap > STOCKOUT_GAP {
        proposals.push(RECALCULATE_BUFFERS.build(
            format!(
                "Stockout rate is {stockout_gap:.2} points above target. Recalculate safety stock and reorder points for A and B items."
            ),
            format!("stockout rate -{stockout_gap:.2} points"),
        ));
    }

    let on_time_gap = targets.on_time_order_rate - metrics.on_time_order_rate;
    if on_time_gap > ON_TIME_GAP {
        proposals.push(AUTOMATE_ORDERING.build(
            format!(
                "On-time order rate is {on_time_gap:.1} points below target. Automate ordering and shorten lead times."
            ),
            format!("on-time order rate +{on_time_gap:.1} points"),
        ));
    }

    let lead_time_gap = metrics.average_lead_time_days - targets.average_lead_time_days;
    if lead_time_gap > LEAD_TIME_GAP_DAYS {
        proposals.push(SUPPLIER_LEAD_TIME.build(
            format!(
                "Average lead time is {lead_time_gap:.1} days above target. Improve supplier delivery performance and qualify alternatives."
            ),
            format!("average lead time -{lead_time_gap:.1} days"),
        ));
    }

    let accuracy_gap = targets.inventory_accuracy - metrics.inventory_accuracy;
    if accuracy_gap > ACCURACY_GAP {
        proposals.push(STOCK_COUNTS.build(
            format!(
                "Inventory accuracy is {accuracy_gap:.1} points below target. Count more often and trace system errors."
            ),
            format!("inventory accuracy +{accuracy_gap:.1} points"),
        ));
    }

    let fulfillment_gap = targets.order_fulfillment_rate - metrics.order_fulfillment_rate;
    if fulfillment_gap > FULFILLMENT_GAP {
        proposals.push(SUPPLIER_FULFILLMENT.build(
            format!(
                "Order fulfillment is {fulfillment_gap:.1} points below target. Raise supplier reliability and revisit contract terms."
            ),
            format!("order fulfillment +{fulfillment_gap:.1} points"),
        ));
    }

    if metrics.meets(targets) {
        proposals.push(SUSTAIN.build(
            "Every KPI target is met. Build on it with more advanced planning.".to_string(),
            "stronger competitiveness and customer satisfaction".to_string(),
        ));
    }

    Ok(proposals)
}

/// High first; equal priorities keep their order.
pub fn sort_proposals_by_priority(proposals: &mut [ImprovementProposal]) {
    proposals.sort_by_key(|p| p.priority);
}

pub fn filter_proposals_by_category(
    proposals: &[ImprovementProposal],
    category: KpiCategory,
) -> Vec<&ImprovementProposal> {
    proposals.iter().filter(|p| p.category == category).collect()
}

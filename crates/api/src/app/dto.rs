use serde::{Deserialize, Serialize};

use restock_analytics::{
    Advisory, CatalogClassificationInput, ClassificationThresholds, ItemInput, KpiCategory,
    KpiSnapshot, OptimizationInput, OptimizationSummary, RankingScheme,
};
use restock_forecast::MethodParameters;
use restock_inventory::XyzGrade;
use restock_policy::{DiscountBracket, DiscountedEoq, EoqResult, QuantityCostComparison};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub items: Vec<ItemInput>,
    /// Overrides the server's ranking scheme for this batch.
    #[serde(default)]
    pub ranking_scheme: Option<RankingScheme>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastBody {
    pub history: Vec<f64>,
    /// Defaults to the server's configured forecast horizon.
    #[serde(default)]
    pub periods: Option<usize>,
    #[serde(default)]
    pub xyz_grade: Option<XyzGrade>,
    /// Replay a previously reported method instead of selecting one.
    #[serde(default)]
    pub parameters: Option<MethodParameters>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub items: Vec<CatalogClassificationInput>,
    #[serde(default)]
    pub thresholds: Option<ClassificationThresholds>,
}

#[derive(Debug, Deserialize)]
pub struct EoqRequest {
    pub annual_demand: f64,
    /// Defaults to the configured ordering cost.
    #[serde(default)]
    pub ordering_cost: Option<f64>,
    /// Annual holding cost per unit; derived from `unit_cost` when absent.
    #[serde(default)]
    pub holding_cost_per_unit: Option<f64>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
    #[serde(default)]
    pub current_order_quantity: Option<f64>,
    #[serde(default)]
    pub discount_brackets: Vec<DiscountBracket>,
}

#[derive(Debug, Deserialize)]
pub struct AdviseRequest {
    pub items: Vec<OptimizationInput>,
}

#[derive(Debug, Deserialize)]
pub struct KpiProposalRequest {
    pub metrics: KpiSnapshot,
    pub targets: KpiSnapshot,
    #[serde(default)]
    pub category: Option<KpiCategory>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct EoqResponse {
    pub holding_cost_per_unit: f64,
    #[serde(flatten)]
    pub result: EoqResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<QuantityCostComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted: Option<DiscountedEoq>,
}

#[derive(Debug, Serialize)]
pub struct AdviseResponse {
    pub advisories: Vec<Advisory>,
    pub summary: OptimizationSummary,
}

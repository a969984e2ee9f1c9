//! Priority scoring for replenishment orders.
//!
//! Two schemes coexist: the 100-point [`OrderScorer`] (urgency, grade, sales
//! trend, lead-time risk) and the simpler [`reorder_priority`] used to sort
//! recommendation lists. [`RankingScheme`] picks which one orders batch output.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use restock_core::numeric::round_to;
use restock_core::{DomainError, ItemId};
use restock_inventory::{AbcGrade, InventoryStatus, ReorderStatus};

use crate::recommendation::ReorderRecommendation;

/// Grade component when the item has not been graded yet.
pub const UNKNOWN_GRADE_SCORE: u8 = 15;
/// Grade component of [`reorder_priority`] for ungraded items.
pub const UNKNOWN_GRADE_PRIORITY: u8 = 15;

const NEUTRAL_TREND_SCORE: f64 = 10.0;
const MAX_TREND_SCORE: f64 = 20.0;
const LEAD_TIME_CAP_DAYS: f64 = 30.0;
const MAX_LEAD_TIME_SCORE: f64 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    Urgent,
    High,
    Normal,
    Low,
}

impl PriorityTier {
    /// Tier for an unrounded component sum.
    pub fn from_score(total: f64) -> Self {
        if total >= 80.0 {
            PriorityTier::Urgent
        } else if total >= 60.0 {
            PriorityTier::High
        } else if total >= 40.0 {
            PriorityTier::Normal
        } else {
            PriorityTier::Low
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            PriorityTier::Urgent => "order immediately",
            PriorityTier::High => "order within the next few days",
            PriorityTier::Normal => "include in the next regular order",
            PriorityTier::Low => "monitor, no order needed yet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderScoringInput {
    pub item_id: ItemId,
    pub current_stock: i64,
    pub safety_stock: i64,
    pub reorder_point: i64,
    #[serde(default)]
    pub abc_grade: Option<AbcGrade>,
    pub lead_time_days: u32,
    /// Units sold in the most recent window.
    pub recent_sales: f64,
    /// Units sold in the window before it.
    pub previous_sales: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 0..=40
    pub inventory_urgency: u8,
    /// 0..=30
    pub grade: u8,
    /// 0..=20
    pub sales_trend: u8,
    /// 0..=10, one decimal.
    pub lead_time_risk: f64,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> f64 {
        f64::from(self.inventory_urgency)
            + f64::from(self.grade)
            + f64::from(self.sales_trend)
            + self.lead_time_risk
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub item_id: ItemId,
    pub total_score: u8,
    pub breakdown: ScoreBreakdown,
    pub tier: PriorityTier,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedScore {
    /// 1-based, highest score first.
    pub rank: usize,
    pub result: ScoringResult,
}

/// 100-point order priority.
#[derive(Debug, Copy, Clone, Default)]
pub struct OrderScorer;

impl OrderScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn urgency_score(status: InventoryStatus) -> u8 {
        match status {
            InventoryStatus::OutOfStock => 40,
            InventoryStatus::Critical => 35,
            InventoryStatus::Shortage => 30,
            InventoryStatus::Caution => 20,
            InventoryStatus::Optimal => 10,
            InventoryStatus::Excess | InventoryStatus::Overstock => 0,
        }
    }

    pub fn grade_score(grade: Option<AbcGrade>) -> u8 {
        match grade {
            Some(AbcGrade::A) => 30,
            Some(AbcGrade::B) => 20,
            Some(AbcGrade::C) => 10,
            None => UNKNOWN_GRADE_SCORE,
        }
    }

    /// Growth of recent over previous sales mapped onto 0..=20 (10 is flat).
    pub fn trend_score(recent_sales: f64, previous_sales: f64) -> u8 {
        if previous_sales.is_nan() || previous_sales <= 0.0 {
            return if recent_sales > 0.0 { NEUTRAL_TREND_SCORE as u8 } else { 0 };
        }
        let growth = ((recent_sales - previous_sales) / previous_sales).clamp(-0.5, 1.0);
        (NEUTRAL_TREND_SCORE + growth * MAX_TREND_SCORE / 1.5)
            .clamp(0.0, MAX_TREND_SCORE)
            .round() as u8
    }

    pub fn lead_time_score(lead_time_days: u32) -> f64 {
        let capped = (lead_time_days as f64).min(LEAD_TIME_CAP_DAYS);
        round_to(capped / LEAD_TIME_CAP_DAYS * MAX_LEAD_TIME_SCORE, 1)
    }

    pub fn score(&self, input: &OrderScoringInput) -> ScoringResult {
        let status =
            InventoryStatus::classify(input.current_stock, input.safety_stock, input.reorder_point);
        let breakdown = ScoreBreakdown {
            inventory_urgency: Self::urgency_score(status),
            grade: Self::grade_score(input.abc_grade),
            sales_trend: Self::trend_score(input.recent_sales, input.previous_sales),
            lead_time_risk: Self::lead_time_score(input.lead_time_days),
        };
        let raw = breakdown.sum();
        let total = raw.round().clamp(0.0, 100.0) as u8;
        let tier = PriorityTier::from_score(raw);

        ScoringResult {
            item_id: input.item_id,
            total_score: total,
            breakdown,
            tier,
            recommendation: tier.recommendation().to_string(),
        }
    }

    /// Scores sorted by total descending (ties keep input order), ranked from 1.
    pub fn score_list(&self, inputs: &[OrderScoringInput]) -> Vec<RankedScore> {
        let mut scored: Vec<ScoringResult> = inputs.iter().map(|i| self.score(i)).collect();
        scored.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        scored
            .into_iter()
            .enumerate()
            .map(|(idx, result)| RankedScore { rank: idx + 1, result })
            .collect()
    }
}

pub fn filter_by_tier(scores: &[RankedScore], tier: PriorityTier) -> Vec<&RankedScore> {
    scores.iter().filter(|s| s.result.tier == tier).collect()
}

/// Urgent and high tier orders.
pub fn urgent_orders(scores: &[RankedScore]) -> Vec<&RankedScore> {
    scores
        .iter()
        .filter(|s| matches!(s.result.tier, PriorityTier::Urgent | PriorityTier::High))
        .collect()
}

/// Sort key for recommendation lists: status + grade + days of stock (max 100).
pub fn reorder_priority(recommendation: &ReorderRecommendation) -> u8 {
    let status = match recommendation.status {
        ReorderStatus::OutOfStock => 50,
        ReorderStatus::Critical => 40,
        ReorderStatus::Shortage => 30,
        ReorderStatus::Caution => 20,
    };
    let grade = match recommendation.abc_grade {
        Some(AbcGrade::A) => 30,
        Some(AbcGrade::B) => 20,
        Some(AbcGrade::C) => 10,
        None => UNKNOWN_GRADE_PRIORITY,
    };
    let cover = match recommendation.days_of_stock {
        None => 20,
        Some(d) if d <= 0 => 20,
        Some(d) if d <= 3 => 15,
        Some(d) if d <= 7 => 10,
        Some(_) => 5,
    };
    status + grade + cover
}

/// Which score orders pipeline output.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingScheme {
    #[default]
    ReorderPriority,
    OrderScore,
}

impl FromStr for RankingScheme {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reorder_priority" => Ok(RankingScheme::ReorderPriority),
            "order_score" => Ok(RankingScheme::OrderScore),
            other => Err(DomainError::validation(format!("unknown ranking scheme: {other}"))),
        }
    }
}

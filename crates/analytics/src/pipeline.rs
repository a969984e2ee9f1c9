//! Batch replenishment evaluation.
//!
//! A batch-wide classification pass (ABC needs every item's value) followed by
//! per-item forecasting, policy, recommendation and scoring on a bounded pool
//! of scoped threads. Results are slotted back by index so output order never
//! depends on scheduling.

use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use restock_core::numeric::ensure_non_negative;
use restock_core::{ItemId, TenantId};
use restock_forecast::{ForecastRequest, ForecastResult, select_best_method};
use restock_inventory::{AbcGrade, CatalogItem, DemandSeries, Granularity, XyzGrade};
use restock_policy::{SafetyStockInput, reorder_point, safety_stock};

use crate::classification::{CatalogClassificationInput, Classification, classify_catalog};
use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::recommendation::{RecommendationEngine, ReorderRecommendation};
use crate::scoring::{OrderScorer, OrderScoringInput, RankingScheme, ScoringResult, reorder_priority};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInput {
    pub item: CatalogItem,
    pub monthly_demand: DemandSeries,
    /// When present, safety stock and reorder point are recomputed from it.
    #[serde(default)]
    pub daily_demand: Option<DemandSeries>,
    /// Trailing revenue; defaults to total monthly quantity × unit price.
    #[serde(default)]
    pub revenue: Option<f64>,
}

impl ItemInput {
    pub fn new(item: CatalogItem, monthly_demand: DemandSeries) -> Self {
        Self {
            item,
            monthly_demand,
            daily_demand: None,
            revenue: None,
        }
    }

    pub fn with_daily_demand(mut self, daily: DemandSeries) -> Self {
        self.daily_demand = Some(daily);
        self
    }

    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = Some(revenue);
        self
    }

    pub fn value(&self) -> f64 {
        self.revenue
            .unwrap_or_else(|| self.monthly_demand.total() * self.item.unit_price)
    }

    fn validate(&self) -> Result<(), AnalyticsError> {
        self.item.validate()?;
        if self.monthly_demand.granularity() != Granularity::Monthly {
            return Err(AnalyticsError::InvalidInput(format!(
                "monthly_demand for {} must have monthly granularity",
                self.item.sku
            )));
        }
        if let Some(daily) = &self.daily_demand {
            if daily.granularity() != Granularity::Daily {
                return Err(AnalyticsError::InvalidInput(format!(
                    "daily_demand for {} must have daily granularity",
                    self.item.sku
                )));
            }
        }
        if let Some(revenue) = self.revenue {
            ensure_non_negative("revenue", revenue)?;
        }
        // Quantity × price can leave the finite range even when both parts are valid.
        ensure_non_negative("annual value", self.value())?;
        Ok(())
    }

    /// Daily series when it has data, monthly otherwise.
    fn demand_basis(&self) -> &DemandSeries {
        match &self.daily_demand {
            Some(daily) if !daily.is_empty() => daily,
            _ => &self.monthly_demand,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub tenant_id: TenantId,
    pub items: Vec<ItemInput>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySource {
    /// Recomputed from the daily demand series.
    Computed,
    /// Taken from the catalog snapshot.
    Catalog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemForecast {
    pub item_id: ItemId,
    pub sku: String,
    pub forecast: ForecastResult,
    pub average_daily_demand: f64,
    pub demand_std_dev: f64,
    pub safety_stock: i64,
    pub reorder_point: i64,
    pub policy_source: PolicySource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendation {
    /// 1-based under the configured [`RankingScheme`].
    pub rank: usize,
    pub recommendation: ReorderRecommendation,
    pub reorder_priority: u8,
    pub scoring: ScoringResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub item_id: ItemId,
    pub sku: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub tenant_id: TenantId,
    pub classifications: Vec<Classification>,
    pub forecasts: Vec<ItemForecast>,
    pub recommendations: Vec<RankedRecommendation>,
    pub failures: Vec<ItemFailure>,
}

struct ItemOutcome {
    forecast: ItemForecast,
    recommendation: Option<(ReorderRecommendation, ScoringResult)>,
}

#[derive(Debug, Clone, Default)]
pub struct ReplenishmentPipeline {
    config: AnalyticsConfig,
}

impl ReplenishmentPipeline {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Evaluate a batch. Only an invalid configuration fails the whole call;
    /// per-item problems (including a repeated item id) land in
    /// [`BatchReport::failures`].
    pub fn evaluate(&self, request: &BatchRequest) -> Result<BatchReport, AnalyticsError> {
        self.config.validate()?;
        let tenant = request.tenant_id;
        info!(tenant = %tenant, items = request.items.len(), "evaluating replenishment batch");

        let mut failures = Vec::new();
        let mut accepted: Vec<&ItemInput> = Vec::with_capacity(request.items.len());
        let mut seen: HashSet<ItemId> = HashSet::with_capacity(request.items.len());
        for input in &request.items {
            let checked = input.validate().and_then(|()| {
                if seen.insert(input.item.id) {
                    Ok(())
                } else {
                    Err(AnalyticsError::InvalidInput(format!(
                        "duplicate item id {} ({})",
                        input.item.id, input.item.sku
                    )))
                }
            });
            match checked {
                Ok(()) => accepted.push(input),
                Err(e) => failures.push(failure(tenant, &input.item, &e)),
            }
        }

        let classification_inputs: Vec<CatalogClassificationInput> = accepted
            .iter()
            .map(|i| CatalogClassificationInput {
                item_id: i.item.id,
                name: i.item.name.clone(),
                monthly_demand: i.monthly_demand.clone(),
                value: i.value(),
            })
            .collect();
        let classifications = classify_catalog(&classification_inputs, &self.config.thresholds)?;
        let grades: HashMap<ItemId, (AbcGrade, XyzGrade)> = classifications
            .iter()
            .filter_map(Classification::graded)
            .map(|r| (r.item_id, (r.abc_grade, r.xyz_grade)))
            .collect();

        let outcomes = fan_out(&accepted, self.config.workers, |input| {
            panic::catch_unwind(AssertUnwindSafe(|| {
                self.evaluate_item(input, grades.get(&input.item.id).copied())
            }))
            .unwrap_or_else(|cause| Err(AnalyticsError::ItemAborted(panic_message(cause.as_ref()))))
        });

        let mut forecasts = Vec::with_capacity(outcomes.len());
        let mut scored = Vec::new();
        for (input, outcome) in accepted.iter().zip(outcomes) {
            match outcome {
                Ok(outcome) => {
                    forecasts.push(outcome.forecast);
                    scored.extend(outcome.recommendation);
                }
                Err(e) => failures.push(failure(tenant, &input.item, &e)),
            }
        }

        let recommendations = rank(scored, self.config.ranking_scheme);
        info!(
            tenant = %tenant,
            recommendations = recommendations.len(),
            failures = failures.len(),
            "replenishment batch evaluated"
        );

        Ok(BatchReport {
            tenant_id: tenant,
            classifications,
            forecasts,
            recommendations,
            failures,
        })
    }

    fn evaluate_item(
        &self,
        input: &ItemInput,
        grades: Option<(AbcGrade, XyzGrade)>,
    ) -> Result<ItemOutcome, AnalyticsError> {
        let (abc, xyz) = match grades {
            Some((abc, xyz)) => (Some(abc), Some(xyz)),
            None => (input.item.abc_grade, input.item.xyz_grade),
        };

        let request = ForecastRequest::new(input.monthly_demand.quantities(), self.config.forecast_periods)
            .with_grade(xyz);
        let forecast = select_best_method(&request);

        let stats = input.demand_basis().daily_stats();
        let (item, policy_source) = match &input.daily_demand {
            Some(daily) if !daily.is_empty() => {
                let lead_time = f64::from(input.item.lead_time_days);
                let ss = safety_stock(
                    &SafetyStockInput::new(stats.average_daily, stats.std_dev_daily, lead_time)
                        .with_service_level(self.config.service_level),
                )?
                .safety_stock;
                let rop = reorder_point(stats.average_daily, lead_time, ss)?.reorder_point;
                let current = input.item.current_stock;
                (input.item.clone().with_stock(current, ss, rop), PolicySource::Computed)
            }
            _ => (input.item.clone(), PolicySource::Catalog),
        };
        let item = item.with_grades(abc, xyz);
        debug!(
            item = %item.id,
            method = %forecast.method,
            safety_stock = item.safety_stock,
            reorder_point = item.reorder_point,
            "item policy resolved"
        );

        let recommendation = RecommendationEngine::from_config(&self.config)
            .evaluate(&item, stats.average_daily)?
            .map(|rec| {
                let (recent_sales, previous_sales) = self.sales_windows(input);
                let scoring = OrderScorer::new().score(&OrderScoringInput {
                    item_id: item.id,
                    current_stock: item.current_stock,
                    safety_stock: item.safety_stock,
                    reorder_point: item.reorder_point,
                    abc_grade: item.abc_grade,
                    lead_time_days: item.lead_time_days,
                    recent_sales,
                    previous_sales,
                });
                (rec, scoring)
            });

        Ok(ItemOutcome {
            forecast: ItemForecast {
                item_id: item.id,
                sku: item.sku.clone(),
                forecast,
                average_daily_demand: stats.average_daily,
                demand_std_dev: stats.std_dev_daily,
                safety_stock: item.safety_stock,
                reorder_point: item.reorder_point,
                policy_source,
            },
            recommendation,
        })
    }

    /// Recent vs previous sales: `trend_window_days` of a daily series, or the
    /// last month against the one before.
    fn sales_windows(&self, input: &ItemInput) -> (f64, f64) {
        let basis = input.demand_basis();
        match basis.granularity() {
            Granularity::Daily => basis.trailing_averages(self.config.trend_window_days),
            Granularity::Monthly => basis.trailing_averages(1),
        }
    }
}

fn failure(tenant: TenantId, item: &CatalogItem, error: &AnalyticsError) -> ItemFailure {
    warn!(tenant = %tenant, item = %item.id, sku = %item.sku, error = %error, "item evaluation failed");
    ItemFailure {
        item_id: item.id,
        sku: item.sku.clone(),
        error: error.to_string(),
    }
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> String {
    cause
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| cause.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn rank(scored: Vec<(ReorderRecommendation, ScoringResult)>, scheme: RankingScheme) -> Vec<RankedRecommendation> {
    let mut ranked: Vec<RankedRecommendation> = scored
        .into_iter()
        .map(|(recommendation, scoring)| RankedRecommendation {
            rank: 0,
            reorder_priority: reorder_priority(&recommendation),
            recommendation,
            scoring,
        })
        .collect();
    match scheme {
        RankingScheme::ReorderPriority => ranked.sort_by(|a, b| b.reorder_priority.cmp(&a.reorder_priority)),
        RankingScheme::OrderScore => ranked.sort_by(|a, b| b.scoring.total_score.cmp(&a.scoring.total_score)),
    }
    for (idx, r) in ranked.iter_mut().enumerate() {
        r.rank = idx + 1;
    }
    ranked
}

/// Apply `f` to every job on at most `workers` scoped threads.
///
/// Output is in job order.
pub fn fan_out<T, R, F>(jobs: &[T], workers: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let workers = workers.clamp(1, jobs.len().max(1));
    let next = AtomicUsize::new(0);
    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(jobs.len()).collect();

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<(usize, R)>();
        for _ in 0..workers {
            let tx = tx.clone();
            let (next, f) = (&next, &f);
            scope.spawn(move || {
                loop {
                    let idx = next.fetch_add(1, Ordering::Relaxed);
                    let Some(job) = jobs.get(idx) else {
                        break;
                    };
                    if tx.send((idx, f(job))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);
        for (idx, result) in rx {
            slots[idx] = Some(result);
        }
    });

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use restock_inventory::ReorderStatus;

    fn monthly(quantities: &[f64]) -> DemandSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        DemandSeries::from_quantities(Granularity::Monthly, start, quantities).unwrap()
    }

    fn critical_input() -> ItemInput {
        let item = CatalogItem::new(ItemId::new(), "SKU-CRIT", "Critical widget")
            .with_stock(5, 20, 35)
            .with_costs(1000.0, 1500.0)
            .with_lead_time(7)
            .with_moq(10);
        ItemInput::new(item, monthly(&[60.0; 6]))
    }

    fn healthy_input(sku: &str) -> ItemInput {
        let item = CatalogItem::new(ItemId::new(), sku, "Healthy")
            .with_stock(100, 20, 35)
            .with_costs(10.0, 15.0)
            .with_lead_time(3);
        ItemInput::new(item, monthly(&[30.0, 32.0, 28.0, 31.0, 29.0, 30.0]))
    }

    #[test]
    fn critical_item_is_recommended() {
        let request = BatchRequest {
            tenant_id: TenantId::new(),
            items: vec![critical_input(), healthy_input("SKU-OK")],
        };
        let report = ReplenishmentPipeline::default().evaluate(&request).unwrap();

        assert!(report.failures.is_empty());
        assert_eq!(report.forecasts.len(), 2);
        assert_eq!(report.classifications.len(), 2);
        assert_eq!(report.recommendations.len(), 1);

        let top = &report.recommendations[0];
        assert_eq!(top.rank, 1);
        assert_eq!(top.recommendation.status, ReorderStatus::Critical);
        assert_eq!(top.recommendation.urgency_level, 3);
        assert_eq!(top.recommendation.average_daily_demand, 2.0);
        assert_eq!(top.recommendation.recommended_quantity, 541);
        assert!(top.recommendation.recommended_quantity >= 10);
        assert_eq!(report.forecasts[0].policy_source, PolicySource::Catalog);
        assert_eq!(report.forecasts[0].forecast.forecast.len(), 3);
    }

    #[test]
    fn invalid_item_is_isolated() {
        let mut bad = healthy_input("SKU-BAD");
        bad.item.moq = 0;
        let request = BatchRequest {
            tenant_id: TenantId::new(),
            items: vec![bad, critical_input()],
        };
        let report = ReplenishmentPipeline::default().evaluate(&request).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].sku, "SKU-BAD");
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn daily_series_recomputes_policy() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let daily: Vec<f64> = (0..56).map(|i| if i % 2 == 0 { 3.0 } else { 5.0 }).collect();
        let input = critical_input()
            .with_daily_demand(DemandSeries::from_quantities(Granularity::Daily, start, &daily).unwrap());
        let request = BatchRequest {
            tenant_id: TenantId::new(),
            items: vec![input],
        };
        let report = ReplenishmentPipeline::default().evaluate(&request).unwrap();

        let f = &report.forecasts[0];
        assert_eq!(f.policy_source, PolicySource::Computed);
        assert_eq!(f.average_daily_demand, 4.0);
        // 1.65 × 1 × √7 ≈ 4.37 → 5; ROP = 28 + 5 = 33
        assert_eq!(f.safety_stock, 5);
        assert_eq!(f.reorder_point, 33);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn invalid_config_fails_the_batch() {
        let request = BatchRequest {
            tenant_id: TenantId::new(),
            items: vec![critical_input()],
        };
        let pipeline = ReplenishmentPipeline::new(AnalyticsConfig::default().with_workers(0));
        assert!(pipeline.evaluate(&request).is_err());
    }

    #[test]
    fn output_order_is_independent_of_worker_count() {
        let items: Vec<ItemInput> = (0..12)
            .map(|i| {
                let mut input = critical_input();
                input.item.sku = format!("SKU-{i:02}");
                input.item.current_stock = i % 6;
                input
            })
            .collect();
        let request = BatchRequest {
            tenant_id: TenantId::new(),
            items,
        };
        let serial = ReplenishmentPipeline::new(AnalyticsConfig::default().with_workers(1))
            .evaluate(&request)
            .unwrap();
        let parallel = ReplenishmentPipeline::new(AnalyticsConfig::default().with_workers(8))
            .evaluate(&request)
            .unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn fan_out_keeps_order() {
        let jobs: Vec<u64> = (0..100).collect();
        let out = fan_out(&jobs, 4, |x| x * x);
        assert_eq!(out, jobs.iter().map(|x| x * x).collect::<Vec<_>>());
        assert!(fan_out(&Vec::<u64>::new(), 4, |x| *x).is_empty());
    }

    #[test]
    fn extreme_item_fails_alone() {
        // Near-free holding and enormous demand push EOQ beyond whole units.
        let mut extreme = critical_input().with_revenue(1.0);
        extreme.item.sku = "SKU-HUGE".into();
        extreme.item.unit_cost = 1e-30;
        extreme.monthly_demand = monthly(&[1e20; 6]);

        let request = BatchRequest {
            tenant_id: TenantId::new(),
            items: vec![extreme, critical_input()],
        };
        let report = ReplenishmentPipeline::new(AnalyticsConfig::default().with_workers(2))
            .evaluate(&request)
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].sku, "SKU-HUGE");
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].recommendation.sku, "SKU-CRIT");
        assert_eq!(report.recommendations[0].recommendation.recommended_quantity, 541);
    }

    #[test]
    fn non_finite_value_fails_alone() {
        let mut overflowing = healthy_input("SKU-INF");
        overflowing.item.unit_price = 1e10;
        overflowing.monthly_demand = monthly(&[1e300; 6]);

        let request = BatchRequest {
            tenant_id: TenantId::new(),
            items: vec![healthy_input("SKU-A"), overflowing, critical_input()],
        };
        let report = ReplenishmentPipeline::default().evaluate(&request).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].sku, "SKU-INF");
        assert_eq!(report.classifications.len(), 2);
        assert_eq!(report.forecasts.len(), 2);
    }

    #[test]
    fn duplicate_item_id_is_a_failure() {
        let first = critical_input();
        let mut repeat = healthy_input("SKU-DUP");
        repeat.item.id = first.item.id;

        let request = BatchRequest {
            tenant_id: TenantId::new(),
            items: vec![first, repeat],
        };
        let report = ReplenishmentPipeline::default().evaluate(&request).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].sku, "SKU-DUP");
        assert_eq!(report.forecasts.len(), 1);
        assert_eq!(report.classifications.len(), 1);
    }

    #[test]
    fn panicking_job_is_reported_not_propagated() {
        let jobs: Vec<u32> = vec![1, 2, 3];
        let out = fan_out(&jobs, 2, |x| {
            panic::catch_unwind(|| {
                assert!(*x != 2, "bad job");
                *x
            })
            .map_err(|cause| panic_message(cause.as_ref()))
        });
        assert_eq!(out[0], Ok(1));
        assert_eq!(out[1], Err("bad job".to_string()));
        assert_eq!(out[2], Ok(3));
    }
}

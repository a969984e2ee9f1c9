//! Batch evaluation settings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use restock_core::{DomainError, DomainResult};
use restock_policy::eoq::DEFAULT_HOLDING_RATE;
use restock_policy::order_quantity::DEFAULT_TARGET_DAYS;
use restock_policy::safety_stock::DEFAULT_SERVICE_LEVEL;

use crate::classification::{AbcThresholds, ClassificationThresholds, XyzThresholds};
use crate::scoring::RankingScheme;

pub const DEFAULT_ORDERING_COST: f64 = 50_000.0;
pub const DEFAULT_FORECAST_PERIODS: usize = 3;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_TREND_WINDOW_DAYS: usize = 28;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub service_level: f64,
    pub thresholds: ClassificationThresholds,
    /// Cost per purchase order, in currency units.
    pub ordering_cost: f64,
    /// Annual holding cost as a fraction of unit cost.
    pub holding_rate: f64,
    pub target_days: u32,
    pub order_multiple: i64,
    pub forecast_periods: usize,
    /// Maximum worker threads for per-item evaluation.
    pub workers: usize,
    /// Days compared when measuring the sales trend of daily series.
    pub trend_window_days: usize,
    pub ranking_scheme: RankingScheme,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            service_level: DEFAULT_SERVICE_LEVEL,
            thresholds: ClassificationThresholds::default(),
            ordering_cost: DEFAULT_ORDERING_COST,
            holding_rate: DEFAULT_HOLDING_RATE,
            target_days: DEFAULT_TARGET_DAYS,
            order_multiple: 1,
            forecast_periods: DEFAULT_FORECAST_PERIODS,
            workers: DEFAULT_WORKERS,
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
            ranking_scheme: RankingScheme::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn with_service_level(mut self, level: f64) -> Self {
        self.service_level = level;
        self
    }

    pub fn with_abc_thresholds(mut self, thresholds: AbcThresholds) -> Self {
        self.thresholds.abc = thresholds;
        self
    }

    pub fn with_xyz_thresholds(mut self, thresholds: XyzThresholds) -> Self {
        self.thresholds.xyz = thresholds;
        self
    }

    pub fn with_ordering_cost(mut self, cost: f64) -> Self {
        self.ordering_cost = cost;
        self
    }

    pub fn with_holding_rate(mut self, rate: f64) -> Self {
        self.holding_rate = rate;
        self
    }

    pub fn with_target_days(mut self, days: u32) -> Self {
        self.target_days = days;
        self
    }

    pub fn with_order_multiple(mut self, multiple: i64) -> Self {
        self.order_multiple = multiple;
        self
    }

    pub fn with_forecast_periods(mut self, periods: usize) -> Self {
        self.forecast_periods = periods;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_trend_window_days(mut self, days: usize) -> Self {
        self.trend_window_days = days;
        self
    }

    pub fn with_ranking_scheme(mut self, scheme: RankingScheme) -> Self {
        self.ranking_scheme = scheme;
        self
    }

    /// Defaults overridden by `RESTOCK_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        override_from_env("RESTOCK_SERVICE_LEVEL", &mut config.service_level);
        override_from_env("RESTOCK_ABC_A_THRESHOLD", &mut config.thresholds.abc.a);
        override_from_env("RESTOCK_ABC_B_THRESHOLD", &mut config.thresholds.abc.b);
        override_from_env("RESTOCK_XYZ_X_THRESHOLD", &mut config.thresholds.xyz.x);
        override_from_env("RESTOCK_XYZ_Y_THRESHOLD", &mut config.thresholds.xyz.y);
        override_from_env("RESTOCK_ORDERING_COST", &mut config.ordering_cost);
        override_from_env("RESTOCK_HOLDING_RATE", &mut config.holding_rate);
        override_from_env("RESTOCK_TARGET_DAYS", &mut config.target_days);
        override_from_env("RESTOCK_ORDER_MULTIPLE", &mut config.order_multiple);
        override_from_env("RESTOCK_FORECAST_PERIODS", &mut config.forecast_periods);
        override_from_env("RESTOCK_WORKERS", &mut config.workers);
        override_from_env("RESTOCK_TREND_WINDOW_DAYS", &mut config.trend_window_days);
        override_from_env("RESTOCK_RANKING_SCHEME", &mut config.ranking_scheme);
        config
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !(self.service_level > 0.0 && self.service_level < 1.0) {
            return Err(DomainError::validation(format!(
                "service_level must be in (0, 1) (got {})",
                self.service_level
            )));
        }
        self.thresholds.validate()?;
        if !(self.ordering_cost.is_finite() && self.ordering_cost >= 0.0) {
            return Err(DomainError::validation("ordering_cost must be a non-negative number"));
        }
        if !(self.holding_rate.is_finite() && self.holding_rate >= 0.0) {
            return Err(DomainError::validation("holding_rate must be a non-negative number"));
        }
        if self.order_multiple < 1 {
            return Err(DomainError::validation("order_multiple must be at least 1"));
        }
        if self.forecast_periods == 0 {
            return Err(DomainError::validation("forecast_periods must be at least 1"));
        }
        if self.workers == 0 {
            return Err(DomainError::validation("workers must be at least 1"));
        }
        if self.trend_window_days == 0 {
            return Err(DomainError::validation("trend_window_days must be at least 1"));
        }
        Ok(())
    }
}

fn override_from_env<T: FromStr>(name: &str, slot: &mut T) {
    let Ok(raw) = std::env::var(name) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!(variable = name, value = %raw, "ignoring unparseable setting"),
    }
}

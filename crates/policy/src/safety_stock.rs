use serde::{Deserialize, Serialize};

use restock_core::numeric::{ensure_non_negative, to_units};
use restock_core::{DomainError, DomainResult};

use crate::zscore::z_score;

pub const DEFAULT_SERVICE_LEVEL: f64 = 0.95;

/// Share of lead-time demand held as buffer by [`simple_safety_stock`].
pub const DEFAULT_SAFETY_FACTOR: f64 = 0.5;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyStockInput {
    pub average_daily_demand: f64,
    pub demand_std_dev: f64,
    pub lead_time_days: f64,
    /// Lead-time variability in days; switches to the full formula when `> 0`.
    #[serde(default)]
    pub lead_time_std_dev: Option<f64>,
    #[serde(default = "default_service_level")]
    pub service_level: f64,
}

fn default_service_level() -> f64 {
    DEFAULT_SERVICE_LEVEL
}

impl SafetyStockInput {
    pub fn new(average_daily_demand: f64, demand_std_dev: f64, lead_time_days: f64) -> Self {
        Self {
            average_daily_demand,
            demand_std_dev,
            lead_time_days,
            lead_time_std_dev: None,
            service_level: DEFAULT_SERVICE_LEVEL,
        }
    }

    pub fn with_lead_time_std_dev(mut self, std_dev: f64) -> Self {
        self.lead_time_std_dev = Some(std_dev);
        self
    }

    pub fn with_service_level(mut self, service_level: f64) -> Self {
        self.service_level = service_level;
        self
    }

    fn validate(&self) -> DomainResult<()> {
        ensure_non_negative("average_daily_demand", self.average_daily_demand)?;
        ensure_non_negative("demand_std_dev", self.demand_std_dev)?;
        ensure_non_negative("lead_time_days", self.lead_time_days)?;
        if let Some(sd) = self.lead_time_std_dev {
            ensure_non_negative("lead_time_std_dev", sd)?;
        }
        if !(0.0..=1.0).contains(&self.service_level) {
            return Err(DomainError::validation(format!(
                "service_level must be within [0, 1] (got {})",
                self.service_level
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyStockMethod {
    /// `Z × σd × √LT`
    Simplified,
    /// `Z × √(LT × σd² + d̄² × σLT²)`
    Full,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyStockResult {
    pub safety_stock: i64,
    pub service_level: f64,
    pub z_score: f64,
    pub method: SafetyStockMethod,
}

/// Buffer stock for the requested service level, rounded up.
pub fn safety_stock(input: &SafetyStockInput) -> DomainResult<SafetyStockResult> {
    input.validate()?;
    let z = z_score(input.service_level);
    let lt = input.lead_time_days;
    let sd = input.demand_std_dev;

    let (raw, method) = match input.lead_time_std_dev {
        Some(lt_sd) if lt_sd > 0.0 => {
            let demand_var = lt * sd * sd;
            let lead_time_var = input.average_daily_demand.powi(2) * lt_sd * lt_sd;
            (z * (demand_var + lead_time_var).sqrt(), SafetyStockMethod::Full)
        }
        _ => (z * sd * lt.sqrt(), SafetyStockMethod::Simplified),
    };

    Ok(SafetyStockResult {
        safety_stock: to_units("safety_stock", raw.ceil())?,
        service_level: input.service_level,
        z_score: z,
        method,
    })
}

/// Rule-of-thumb buffer: `ceil(d̄ × LT × factor)`.
pub fn simple_safety_stock(
    average_daily_demand: f64,
    lead_time_days: f64,
    safety_factor: f64,
) -> DomainResult<i64> {
    ensure_non_negative("average_daily_demand", average_daily_demand)?;
    ensure_non_negative("lead_time_days", lead_time_days)?;
    ensure_non_negative("safety_factor", safety_factor)?;
    to_units("safety_stock", (average_daily_demand * lead_time_days * safety_factor).ceil())
}

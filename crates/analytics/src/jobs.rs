//! Analytics jobs runnable through a [`TenantRunner`](crate::TenantRunner).

use restock_core::TenantId;
use restock_forecast::{ForecastRequest, ForecastResult, select_best_method};

use crate::classification::{CatalogClassificationInput, Classification, ClassificationThresholds, classify_catalog};
use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::job::AnalyticsJob;
use crate::pipeline::{BatchReport, BatchRequest, ReplenishmentPipeline};

/// Full batch evaluation for one tenant.
#[derive(Debug, Clone)]
pub struct ReplenishmentJob {
    tenant_id: TenantId,
    input: BatchRequest,
    config: AnalyticsConfig,
}

impl ReplenishmentJob {
    pub fn new(tenant_id: TenantId, input: BatchRequest) -> Self {
        Self {
            tenant_id,
            input,
            config: AnalyticsConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnalyticsConfig) -> Self {
        self.config = config;
        self
    }
}

impl AnalyticsJob for ReplenishmentJob {
    type Output = BatchReport;
    const KIND: &'static str = "replenishment";

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn run(self) -> Result<BatchReport, AnalyticsError> {
        if self.input.tenant_id != self.tenant_id {
            return Err(AnalyticsError::InvalidInput(
                "tenant_id mismatch between job and batch".to_string(),
            ));
        }
        ReplenishmentPipeline::new(self.config).evaluate(&self.input)
    }
}

/// Grade refresh over a catalog.
#[derive(Debug, Clone)]
pub struct ClassificationJob {
    tenant_id: TenantId,
    input: Vec<CatalogClassificationInput>,
    thresholds: ClassificationThresholds,
}

impl ClassificationJob {
    pub fn new(tenant_id: TenantId, input: Vec<CatalogClassificationInput>) -> Self {
        Self {
            tenant_id,
            input,
            thresholds: ClassificationThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: ClassificationThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

impl AnalyticsJob for ClassificationJob {
    type Output = Vec<Classification>;
    const KIND: &'static str = "classification";

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn run(self) -> Result<Self::Output, AnalyticsError> {
        Ok(classify_catalog(&self.input, &self.thresholds)?)
    }
}

/// Automatic-method forecast of one series.
#[derive(Debug, Clone)]
pub struct ForecastJob {
    tenant_id: TenantId,
    input: ForecastRequest,
}

impl ForecastJob {
    pub fn new(tenant_id: TenantId, input: ForecastRequest) -> Self {
        Self { tenant_id, input }
    }
}

impl AnalyticsJob for ForecastJob {
    type Output = ForecastResult;
    const KIND: &'static str = "forecast";

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn run(self) -> Result<ForecastResult, AnalyticsError> {
        if self.input.periods == 0 {
            return Err(AnalyticsError::InvalidInput("periods must be at least 1".to_string()));
        }
        if self.input.history.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(AnalyticsError::InvalidInput(
                "history must contain non-negative numbers".to_string(),
            ));
        }
        Ok(select_best_method(&self.input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::TenantRunner;
    use restock_forecast::MethodKind;

    #[test]
    fn replenishment_job_checks_batch_tenant() {
        let tenant = TenantId::new();
        let batch = BatchRequest {
            tenant_id: TenantId::new(),
            items: Vec::new(),
        };
        let err = TenantRunner::new(tenant)
            .run(ReplenishmentJob::new(tenant, batch))
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }

    #[test]
    fn forecast_job_runs_in_scope() {
        let tenant = TenantId::new();
        let job = ForecastJob::new(tenant, ForecastRequest::new(vec![10.0, 12.0, 11.0, 13.0, 12.0], 2));
        let result = TenantRunner::new(tenant).run(job).unwrap();
        assert_eq!(result.forecast.len(), 2);
        assert!(matches!(result.method, MethodKind::Sma | MethodKind::Ses));

        let bad = ForecastJob::new(tenant, ForecastRequest::new(vec![-1.0], 1));
        assert!(TenantRunner::new(tenant).run(bad).is_err());
    }

    #[test]
    fn classification_job_on_empty_catalog() {
        let tenant = TenantId::new();
        let out = TenantRunner::new(tenant)
            .run(ClassificationJob::new(tenant, Vec::new()))
            .unwrap();
        assert!(out.is_empty());
    }
}

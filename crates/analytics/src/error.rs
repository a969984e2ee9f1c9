use thiserror::Error;

use restock_core::DomainError;
use restock_forecast::ForecastError;

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("invalid job input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// A single item's evaluation panicked; the rest of the batch is unaffected.
    #[error("item evaluation aborted: {0}")]
    ItemAborted(String),

    #[error("tenant scope violation (job tenant not allowed by scheduler)")]
    TenantScope,
}

use thiserror::Error;

use restock_core::DomainError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    /// Actual and forecast arrays passed to an accuracy metric differ in length.
    #[error("length mismatch: {actuals} actual value(s) vs {forecasts} forecast value(s)")]
    LengthMismatch { actuals: usize, forecasts: usize },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

//! `restock-forecast`
//!
//! **Responsibility:** near-term demand forecasting for a single numeric series.
//!
//! - Three strategies behind the [`ForecastMethod`] trait: moving average,
//!   exponential smoothing and Holt's linear trend.
//! - Automatic selection by hold-out cross-validation ([`select_best_method`]).
//! - Accuracy metrics shared with callers ([`AccuracyMetrics`]).
//!
//! Pure functions only. Degenerate history degrades to zeros and sentinel
//! metrics; the only error is a caller passing mismatched metric arrays.

pub mod accuracy;
pub mod backtest;
pub mod error;
pub mod method;
pub mod selector;
pub mod trend;

pub use accuracy::{AccuracyMetrics, Confidence};
pub use backtest::backtest;
pub use error::ForecastError;
pub use method::{
    ExponentialSmoothing, ForecastMethod, HoltLinear, MethodKind, MethodOutput, MethodParameters,
    MovingAverage, Strategy,
};
pub use selector::{
    ForecastMetadata, ForecastRequest, ForecastResult, forecast_with_method, select_best_method,
    select_method_by_rules, simple_forecast,
};
pub use trend::detect_trend;

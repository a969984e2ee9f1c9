//! Forecasting strategies.

use core::fmt;

use serde::{Deserialize, Serialize};

mod holts;
mod ses;
mod sma;

pub use holts::{
    DEFAULT_BETA, HOLT_ALPHA_GRID, HOLT_BETA_GRID, HoltLinear, holt_linear, optimize_holt_parameters,
};
pub use ses::{
    ALPHA_GRID, DEFAULT_ALPHA, ExponentialSmoothing, default_alpha, optimize_alpha,
    simple_exponential_smoothing,
};
pub use sma::{MovingAverage, optimal_window, simple_moving_average};

/// Held-out tail used by the parameter grid searches.
pub const GRID_TEST_SIZE: usize = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Sma,
    Ses,
    Holts,
}

impl MethodKind {
    pub const ALL: [MethodKind; 3] = [MethodKind::Sma, MethodKind::Ses, MethodKind::Holts];

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::Sma => "sma",
            MethodKind::Ses => "ses",
            MethodKind::Holts => "holts",
        }
    }

    /// SMA and SES; preferred for erratic (Z-grade) demand.
    pub fn is_simple(&self) -> bool {
        matches!(self, MethodKind::Sma | MethodKind::Ses)
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters a strategy actually used, sufficient to replay the forecast.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum MethodParameters {
    Sma {
        window_size: usize,
        average: f64,
    },
    Ses {
        alpha: f64,
        last_smoothed: f64,
    },
    Holts {
        alpha: f64,
        beta: f64,
        level: f64,
        trend: f64,
    },
}

impl MethodParameters {
    pub fn kind(&self) -> MethodKind {
        match self {
            MethodParameters::Sma { .. } => MethodKind::Sma,
            MethodParameters::Ses { .. } => MethodKind::Ses,
            MethodParameters::Holts { .. } => MethodKind::Holts,
        }
    }
}

/// Forecast values (rounded to 2 decimals) and the parameters behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodOutput {
    pub parameters: MethodParameters,
    pub forecast: Vec<f64>,
}

impl MethodOutput {
    pub fn kind(&self) -> MethodKind {
        self.parameters.kind()
    }
}

/// A forecasting strategy over a plain numeric history.
pub trait ForecastMethod {
    fn kind(&self) -> MethodKind;

    /// Shortest history the method is considered eligible for.
    fn min_data_points(&self) -> usize;

    /// Forecast `periods` future values. Never fails; short history degrades.
    fn forecast(&self, history: &[f64], periods: usize) -> MethodOutput;
}

/// Closed set of strategies the selector chooses between.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Strategy {
    MovingAverage(MovingAverage),
    ExponentialSmoothing(ExponentialSmoothing),
    HoltLinear(HoltLinear),
}

impl Strategy {
    /// Strategy that replays `parameters` exactly.
    pub fn replay(parameters: &MethodParameters) -> Self {
        match *parameters {
            MethodParameters::Sma { window_size, .. } => {
                Strategy::MovingAverage(MovingAverage::with_window(window_size))
            }
            MethodParameters::Ses { alpha, .. } => {
                Strategy::ExponentialSmoothing(ExponentialSmoothing::fixed(alpha))
            }
            MethodParameters::Holts { alpha, beta, .. } => {
                Strategy::HoltLinear(HoltLinear::fixed(alpha, beta))
            }
        }
    }

    /// Strategy with the method's default (non-optimized) parameters.
    pub fn defaults_for(kind: MethodKind) -> Self {
        match kind {
            MethodKind::Sma => Strategy::MovingAverage(MovingAverage::with_window(3)),
            MethodKind::Ses => Strategy::ExponentialSmoothing(ExponentialSmoothing::fixed(DEFAULT_ALPHA)),
            MethodKind::Holts => Strategy::HoltLinear(HoltLinear::fixed(DEFAULT_ALPHA, DEFAULT_BETA)),
        }
    }

    fn inner(&self) -> &dyn ForecastMethod {
        match self {
            Strategy::MovingAverage(m) => m,
            Strategy::ExponentialSmoothing(m) => m,
            Strategy::HoltLinear(m) => m,
        }
    }
}

impl ForecastMethod for Strategy {
    fn kind(&self) -> MethodKind {
        self.inner().kind()
    }

    fn min_data_points(&self) -> usize {
        self.inner().min_data_points()
    }

    fn forecast(&self, history: &[f64], periods: usize) -> MethodOutput {
        self.inner().forecast(history, periods)
    }
}

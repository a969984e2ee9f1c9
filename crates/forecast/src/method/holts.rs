use restock_core::numeric::round_to;

use super::ses::DEFAULT_ALPHA;
use super::{ForecastMethod, GRID_TEST_SIZE, MethodKind, MethodOutput, MethodParameters};
use crate::accuracy::raw_mape;

pub const DEFAULT_BETA: f64 = 0.1;
pub const HOLT_ALPHA_GRID: [f64; 5] = [0.1, 0.2, 0.3, 0.4, 0.5];
pub const HOLT_BETA_GRID: [f64; 5] = [0.05, 0.1, 0.15, 0.2, 0.3];

#[derive(Debug, Copy, Clone, PartialEq)]
enum Smoothing {
    Fixed { alpha: f64, beta: f64 },
    Optimized,
}

/// Holt's linear (double exponential) smoothing with level and trend.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HoltLinear {
    smoothing: Smoothing,
}

impl HoltLinear {
    pub fn fixed(alpha: f64, beta: f64) -> Self {
        Self {
            smoothing: Smoothing::Fixed { alpha, beta },
        }
    }

    pub fn optimized() -> Self {
        Self {
            smoothing: Smoothing::Optimized,
        }
    }
}

impl ForecastMethod for HoltLinear {
    fn kind(&self) -> MethodKind {
        MethodKind::Holts
    }

    fn min_data_points(&self) -> usize {
        6
    }

    fn forecast(&self, history: &[f64], periods: usize) -> MethodOutput {
        let (alpha, beta) = match self.smoothing {
            Smoothing::Fixed { alpha, beta } => (alpha, beta),
            Smoothing::Optimized => optimize_holt_parameters(history, GRID_TEST_SIZE),
        };
        holt_linear(history, periods, alpha, beta)
    }
}

/// Final `(level, trend)` after running the recursion over `history`.
///
/// Seeded with `L = D0`, `T = D1 - D0`. Requires at least two points.
fn level_and_trend(history: &[f64], alpha: f64, beta: f64) -> (f64, f64) {
    let mut level = history[0];
    let mut trend = history[1] - history[0];
    for d in &history[1..] {
        let prev_level = level;
        level = alpha * d + (1.0 - alpha) * (prev_level + trend);
        trend = beta * (level - prev_level) + (1.0 - beta) * trend;
    }
    (level, trend)
}

/// Forecast `max(0, L + h*T)` for `h = 1..=periods`.
///
/// Alpha is clamped to `[0.1, 0.9]` and beta to `[0.01, 0.5]`. With fewer than
/// two points the forecast is flat at the first value (or zero).
pub fn holt_linear(history: &[f64], periods: usize, alpha: f64, beta: f64) -> MethodOutput {
    let alpha = alpha.clamp(0.1, 0.9);
    let beta = beta.clamp(0.01, 0.5);

    if history.len() < 2 {
        let flat = history.first().copied().unwrap_or(0.0);
        return MethodOutput {
            parameters: MethodParameters::Holts {
                alpha,
                beta,
                level: flat,
                trend: 0.0,
            },
            forecast: vec![round_to(flat, 2); periods],
        };
    }

    let (level, trend) = level_and_trend(history, alpha, beta);
    let forecast = (1..=periods)
        .map(|h| round_to(level + h as f64 * trend, 2).max(0.0))
        .collect();

    MethodOutput {
        parameters: MethodParameters::Holts {
            alpha,
            beta,
            level,
            trend,
        },
        forecast,
    }
}

/// Grid search over [`HOLT_ALPHA_GRID`] × [`HOLT_BETA_GRID`] minimizing hold-out MAPE.
///
/// Needs `test_size + 3` points, otherwise the defaults `(0.3, 0.1)`.
pub fn optimize_holt_parameters(history: &[f64], test_size: usize) -> (f64, f64) {
    let defaults = (DEFAULT_ALPHA, DEFAULT_BETA);
    if test_size == 0 || history.len() < test_size + 3 {
        return defaults;
    }
    let (train, test) = history.split_at(history.len() - test_size);

    HOLT_ALPHA_GRID
        .iter()
        .flat_map(|&alpha| HOLT_BETA_GRID.iter().map(move |&beta| (alpha, beta)))
        .filter_map(|(alpha, beta)| {
            let (level, trend) = level_and_trend(train, alpha, beta);
            let predictions: Vec<f64> = (1..=test_size)
                .map(|h| (level + h as f64 * trend).max(0.0))
                .collect();
            raw_mape(test, &predictions)
                .filter(|m| m.is_finite())
                .map(|m| ((alpha, beta), m))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(defaults, |(params, _)| params)
}

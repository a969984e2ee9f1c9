use restock_core::numeric::round_to;
use restock_inventory::XyzGrade;

use super::{ForecastMethod, GRID_TEST_SIZE, MethodKind, MethodOutput, MethodParameters};
use crate::accuracy::raw_mape;

pub const DEFAULT_ALPHA: f64 = 0.3;
pub const ALPHA_GRID: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

const MIN_ALPHA: f64 = 0.1;
const MAX_ALPHA: f64 = 0.9;

#[derive(Debug, Copy, Clone, PartialEq)]
enum AlphaSource {
    Fixed(f64),
    Optimized,
}

/// Simple exponential smoothing, seeded with the first observation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ExponentialSmoothing {
    alpha: AlphaSource,
}

impl ExponentialSmoothing {
    pub fn fixed(alpha: f64) -> Self {
        Self {
            alpha: AlphaSource::Fixed(alpha),
        }
    }

    /// Grid-searched alpha (falls back to the default on short history).
    pub fn optimized() -> Self {
        Self {
            alpha: AlphaSource::Optimized,
        }
    }

    /// Alpha keyed off demand volatility.
    pub fn for_grade(grade: Option<XyzGrade>) -> Self {
        Self::fixed(default_alpha(grade))
    }
}

impl ForecastMethod for ExponentialSmoothing {
    fn kind(&self) -> MethodKind {
        MethodKind::Ses
    }

    fn min_data_points(&self) -> usize {
        3
    }

    fn forecast(&self, history: &[f64], periods: usize) -> MethodOutput {
        let alpha = match self.alpha {
            AlphaSource::Fixed(a) => a,
            AlphaSource::Optimized => optimize_alpha(history, GRID_TEST_SIZE),
        };
        simple_exponential_smoothing(history, periods, alpha)
    }
}

/// Stable demand reacts slowly, erratic demand quickly.
pub fn default_alpha(grade: Option<XyzGrade>) -> f64 {
    match grade {
        Some(XyzGrade::X) => 0.2,
        Some(XyzGrade::Y) => 0.4,
        Some(XyzGrade::Z) => 0.6,
        None => DEFAULT_ALPHA,
    }
}

fn smooth(history: &[f64], alpha: f64) -> f64 {
    let Some((first, rest)) = history.split_first() else {
        return 0.0;
    };
    rest.iter()
        .fold(*first, |s, d| alpha * d + (1.0 - alpha) * s)
}

/// Flat forecast at the final smoothed value. Alpha is clamped to `[0.1, 0.9]`.
pub fn simple_exponential_smoothing(history: &[f64], periods: usize, alpha: f64) -> MethodOutput {
    let alpha = alpha.clamp(MIN_ALPHA, MAX_ALPHA);
    let smoothed = smooth(history, alpha);
    MethodOutput {
        parameters: MethodParameters::Ses {
            alpha,
            last_smoothed: smoothed,
        },
        forecast: vec![round_to(smoothed, 2); periods],
    }
}

/// Alpha from [`ALPHA_GRID`] minimizing MAPE on the last `test_size` points.
///
/// Needs `test_size + 3` points, otherwise [`DEFAULT_ALPHA`].
pub fn optimize_alpha(history: &[f64], test_size: usize) -> f64 {
    if test_size == 0 || history.len() < test_size + 3 {
        return DEFAULT_ALPHA;
    }
    let (train, test) = history.split_at(history.len() - test_size);

    ALPHA_GRID
        .iter()
        .filter_map(|&alpha| {
            let predictions = vec![smooth(train, alpha); test_size];
            raw_mape(test, &predictions)
                .filter(|m| m.is_finite())
                .map(|m| (alpha, m))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(DEFAULT_ALPHA, |(alpha, _)| alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_recursion() {
        // S = 0.5*20 + 0.5*10 = 15, then 0.5*30 + 0.5*15 = 22.5
        let out = simple_exponential_smoothing(&[10.0, 20.0, 30.0], 2, 0.5);
        assert_eq!(out.forecast, vec![22.5, 22.5]);
    }

    #[test]
    fn alpha_is_clamped() {
        let out = simple_exponential_smoothing(&[1.0, 2.0, 3.0], 1, 5.0);
        assert!(matches!(out.parameters, MethodParameters::Ses { alpha, .. } if alpha == 0.9));
    }

    #[test]
    fn grade_defaults() {
        assert_eq!(default_alpha(Some(XyzGrade::X)), 0.2);
        assert_eq!(default_alpha(Some(XyzGrade::Z)), 0.6);
        assert_eq!(default_alpha(None), 0.3);
    }

    #[test]
    fn short_history_keeps_default_alpha() {
        assert_eq!(optimize_alpha(&[1.0, 2.0, 3.0, 4.0, 5.0], 3), DEFAULT_ALPHA);
    }

    #[test]
    fn rising_series_prefers_reactive_alpha() {
        let history: Vec<f64> = (1..=12).map(|i| i as f64 * 10.0).collect();
        assert_eq!(optimize_alpha(&history, 3), 0.9);
    }
}

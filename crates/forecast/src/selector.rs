//! Automatic and rule-based method selection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use restock_core::numeric::SENTINEL;
use restock_inventory::XyzGrade;

use crate::accuracy::{AccuracyMetrics, Confidence, raw_mape};
use crate::method::{
    ExponentialSmoothing, ForecastMethod, HoltLinear, MethodKind, MethodOutput, MethodParameters,
    MovingAverage, Strategy,
};
use crate::trend::detect_trend;

/// Final periods held out when cross-validating candidate methods.
pub const HOLDOUT_PERIODS: usize = 3;

/// Minimum training points kept in front of the hold-out.
const MIN_TRAINING_POINTS: usize = 3;

/// Z-grade items keep a simple method whose MAPE is within this factor of the best.
const SIMPLE_METHOD_TOLERANCE: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub history: Vec<f64>,
    pub periods: usize,
    #[serde(default)]
    pub xyz_grade: Option<XyzGrade>,
}

impl ForecastRequest {
    pub fn new(history: Vec<f64>, periods: usize) -> Self {
        Self {
            history,
            periods,
            xyz_grade: None,
        }
    }

    pub fn with_grade(mut self, grade: Option<XyzGrade>) -> Self {
        self.xyz_grade = grade;
        self
    }
}

/// A forecast that describes how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub method: MethodKind,
    pub parameters: MethodParameters,
    pub forecast: Vec<f64>,
    pub accuracy: AccuracyMetrics,
}

impl ForecastResult {
    fn from_output(output: MethodOutput, accuracy: AccuracyMetrics) -> Self {
        Self {
            method: output.kind(),
            parameters: output.parameters,
            forecast: output.forecast,
            accuracy,
        }
    }
}

/// Facts about a series that drive method eligibility.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetadata {
    pub data_points: usize,
    pub xyz_grade: Option<XyzGrade>,
    pub has_trend: bool,
}

impl ForecastMetadata {
    pub fn from_history(history: &[f64], xyz_grade: Option<XyzGrade>) -> Self {
        Self {
            data_points: history.len(),
            xyz_grade,
            has_trend: detect_trend(history),
        }
    }
}

fn eligible_strategies(meta: &ForecastMetadata) -> Vec<Strategy> {
    let sma = MovingAverage::auto();
    let ses = match meta.xyz_grade {
        Some(grade) => ExponentialSmoothing::for_grade(Some(grade)),
        None => ExponentialSmoothing::optimized(),
    };
    let holts = HoltLinear::optimized();

    let mut out = Vec::with_capacity(3);
    if meta.data_points >= sma.min_data_points() {
        out.push(Strategy::MovingAverage(sma));
    }
    if meta.data_points >= ses.min_data_points() {
        out.push(Strategy::ExponentialSmoothing(ses));
    }
    if meta.data_points >= holts.min_data_points() && meta.has_trend {
        out.push(Strategy::HoltLinear(holts));
    }
    out
}

struct Candidate {
    strategy: Strategy,
    mape: f64,
    metrics: AccuracyMetrics,
}

fn cross_validate(history: &[f64], strategies: &[Strategy]) -> Vec<Candidate> {
    let holdout = HOLDOUT_PERIODS.min(history.len().saturating_sub(MIN_TRAINING_POINTS));
    if holdout == 0 {
        return strategies
            .iter()
            .map(|s| Candidate {
                strategy: *s,
                mape: SENTINEL,
                metrics: AccuracyMetrics::unmeasured(),
            })
            .collect();
    }

    let (train, test) = history.split_at(history.len() - holdout);
    strategies
        .iter()
        .map(|s| {
            let predicted = s.forecast(train, holdout).forecast;
            let mape = raw_mape(test, &predicted)
                .filter(|m| m.is_finite())
                .unwrap_or(SENTINEL);
            Candidate {
                strategy: *s,
                mape,
                metrics: AccuracyMetrics::from_aligned(test, &predicted),
            }
        })
        .collect()
}

/// Pick the best eligible method by hold-out MAPE and forecast with it.
///
/// - no history: zeros, sentinel metrics, low confidence
/// - one eligible method: used directly, medium confidence
/// - Z-grade items: a simple method within 1.2× of the best MAPE wins
pub fn select_best_method(request: &ForecastRequest) -> ForecastResult {
    let history = &request.history;
    let meta = ForecastMetadata::from_history(history, request.xyz_grade);
    let strategies = eligible_strategies(&meta);

    match strategies.as_slice() {
        [] => ForecastResult {
            method: MethodKind::Sma,
            parameters: MethodParameters::Sma {
                window_size: 0,
                average: 0.0,
            },
            forecast: vec![0.0; request.periods],
            accuracy: AccuracyMetrics::unmeasured(),
        },
        [only] => {
            let output = only.forecast(history, request.periods);
            debug!(method = %output.kind(), "single eligible forecast method");
            ForecastResult::from_output(
                output,
                AccuracyMetrics::unmeasured().with_confidence(Confidence::Medium),
            )
        }
        _ => {
            let mut candidates = cross_validate(history, &strategies);
            candidates.sort_by(|a, b| a.mape.total_cmp(&b.mape));
            let best_mape = candidates[0].mape;

            if meta.xyz_grade == Some(XyzGrade::Z) {
                let simple = candidates
                    .iter()
                    .find(|c| c.strategy.kind().is_simple())
                    .filter(|c| c.mape < best_mape * SIMPLE_METHOD_TOLERANCE);
                if let Some(c) = simple {
                    let confidence = if c.mape < 30.0 {
                        Confidence::Medium
                    } else {
                        Confidence::Low
                    };
                    debug!(method = %c.strategy.kind(), mape = c.mape, "simple method kept for erratic demand");
                    return ForecastResult::from_output(
                        c.strategy.forecast(history, request.periods),
                        c.metrics.with_confidence(confidence),
                    );
                }
            }

            let best = &candidates[0];
            debug!(
                method = %best.strategy.kind(),
                mape = best.mape,
                candidates = candidates.len(),
                "forecast method selected"
            );
            ForecastResult::from_output(
                best.strategy.forecast(history, request.periods),
                best.metrics.with_confidence(Confidence::from_mape(best.mape)),
            )
        }
    }
}

/// Heuristic choice without cross-validation.
pub fn select_method_by_rules(meta: &ForecastMetadata) -> Strategy {
    let sma = Strategy::MovingAverage(MovingAverage::auto());
    let ses = Strategy::ExponentialSmoothing(ExponentialSmoothing::optimized());
    let ses_stable = Strategy::ExponentialSmoothing(ExponentialSmoothing::for_grade(Some(XyzGrade::X)));
    let holts = Strategy::HoltLinear(HoltLinear::optimized());

    if meta.data_points < 3 {
        return sma;
    }
    if meta.data_points < 6 {
        return match meta.xyz_grade {
            Some(XyzGrade::X) => ses_stable,
            Some(XyzGrade::Z) => sma,
            _ => ses,
        };
    }
    if meta.has_trend {
        return holts;
    }
    match meta.xyz_grade {
        Some(XyzGrade::X) => ses_stable,
        Some(XyzGrade::Z) => sma,
        _ => ses,
    }
}

/// Re-run a method with previously reported parameters. Deterministic.
pub fn forecast_with_method(
    history: &[f64],
    periods: usize,
    parameters: &MethodParameters,
) -> ForecastResult {
    let output = Strategy::replay(parameters).forecast(history, periods);
    ForecastResult::from_output(output, AccuracyMetrics::unmeasured())
}

/// Forecast values only, with automatic selection.
pub fn simple_forecast(history: &[f64], periods: usize, xyz_grade: Option<XyzGrade>) -> Vec<f64> {
    let request = ForecastRequest::new(history.to_vec(), periods).with_grade(xyz_grade);
    select_best_method(&request).forecast
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_history_forecasts_zero_with_low_confidence() {
        let result = select_best_method(&ForecastRequest::new(vec![], 3));
        assert_eq!(result.forecast, vec![0.0; 3]);
        assert_eq!(result.accuracy.mape, SENTINEL);
        assert_eq!(result.accuracy.confidence, Confidence::Low);
    }

    #[test]
    fn single_eligible_method_has_medium_confidence() {
        let result = select_best_method(&ForecastRequest::new(vec![4.0, 6.0], 2));
        assert_eq!(result.method, MethodKind::Sma);
        assert_eq!(result.forecast, vec![5.0, 5.0]);
        assert_eq!(result.accuracy.confidence, Confidence::Medium);
    }

    #[test]
    fn trending_series_picks_holts() {
        let history: Vec<f64> = (0..12).map(|i| 100.0 + 20.0 * i as f64).collect();
        let result = select_best_method(&ForecastRequest::new(history, 3));
        assert_eq!(result.method, MethodKind::Holts);
        assert_eq!(result.forecast.len(), 3);
        assert!(result.forecast[2] > result.forecast[0]);
        assert_eq!(result.accuracy.confidence, Confidence::High);
    }

    #[test]
    fn flat_series_stays_simple() {
        let history = vec![50.0; 9];
        let result = select_best_method(&ForecastRequest::new(history, 2));
        assert_eq!(result.method, MethodKind::Sma);
        assert_eq!(result.forecast, vec![50.0, 50.0]);
        assert_eq!(result.accuracy.mape, 0.0);
    }

    #[test]
    fn rules_follow_length_grade_and_trend() {
        let meta = |n, g, t| ForecastMetadata {
            data_points: n,
            xyz_grade: g,
            has_trend: t,
        };
        assert_eq!(select_method_by_rules(&meta(2, None, false)).kind(), MethodKind::Sma);
        assert_eq!(select_method_by_rules(&meta(4, Some(XyzGrade::Z), false)).kind(), MethodKind::Sma);
        assert_eq!(select_method_by_rules(&meta(4, None, false)).kind(), MethodKind::Ses);
        assert_eq!(select_method_by_rules(&meta(8, Some(XyzGrade::Z), true)).kind(), MethodKind::Holts);
        assert_eq!(select_method_by_rules(&meta(8, Some(XyzGrade::Y), false)).kind(), MethodKind::Ses);
    }

    #[test]
    fn result_serializes_with_tagged_parameters() {
        let result = forecast_with_method(&[1.0, 2.0, 3.0], 1, &MethodParameters::Ses {
            alpha: 0.5,
            last_smoothed: 0.0,
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["method"], "ses");
        assert_eq!(json["parameters"]["method"], "ses");
        assert_eq!(json["parameters"]["alpha"], 0.5);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: replaying a forecast with its own method and parameters
        /// reproduces the same values.
        #[test]
        fn replay_is_deterministic(
            history in prop::collection::vec(0.0f64..500.0, 0..24),
            periods in 1usize..6,
            grade in prop::option::of(prop::sample::select(vec![XyzGrade::X, XyzGrade::Y, XyzGrade::Z])),
        ) {
            let request = ForecastRequest::new(history.clone(), periods).with_grade(grade);
            let original = select_best_method(&request);
            let replayed = forecast_with_method(&history, periods, &original.parameters);
            prop_assert_eq!(replayed.method, original.method);
            prop_assert_eq!(replayed.forecast, original.forecast);
        }

        /// Property: the forecast always has the requested length and no negatives.
        #[test]
        fn forecast_shape(
            history in prop::collection::vec(0.0f64..1_000.0, 0..30),
            periods in 0usize..8,
        ) {
            let result = select_best_method(&ForecastRequest::new(history, periods));
            prop_assert_eq!(result.forecast.len(), periods);
            prop_assert!(result.forecast.iter().all(|v| *v >= 0.0 && v.is_finite()));
        }
    }
}

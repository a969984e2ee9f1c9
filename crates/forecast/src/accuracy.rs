//! Forecast accuracy metrics.
//!
//! Public metric functions reject mismatched arrays with
//! [`ForecastError::LengthMismatch`]. An undefined metric (empty input, or MAPE
//! over all-zero actuals) is reported as [`SENTINEL`].

use core::fmt;

use serde::{Deserialize, Serialize};

use restock_core::numeric::{SENTINEL, round_to};

use crate::error::ForecastError;

const HIGH_CONFIDENCE_MAPE: f64 = 15.0;
const MEDIUM_CONFIDENCE_MAPE: f64 = 30.0;

/// Confidence tier derived from MAPE.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// `< 15` high, `< 30` medium, otherwise low (including non-finite).
    pub fn from_mape(mape: f64) -> Self {
        if mape < HIGH_CONFIDENCE_MAPE {
            Confidence::High
        } else if mape < MEDIUM_CONFIDENCE_MAPE {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MAPE / MAE / RMSE, each rounded to 2 decimals, plus the confidence tier.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    pub mape: f64,
    pub mae: f64,
    pub rmse: f64,
    pub confidence: Confidence,
}

impl AccuracyMetrics {
    /// Metrics for a forecast that was never measured against actuals.
    pub fn unmeasured() -> Self {
        Self {
            mape: SENTINEL,
            mae: SENTINEL,
            rmse: SENTINEL,
            confidence: Confidence::Low,
        }
    }

    pub fn evaluate(actuals: &[f64], forecasts: &[f64]) -> Result<Self, ForecastError> {
        check_lengths(actuals, forecasts)?;
        Ok(Self::from_aligned(actuals, forecasts))
    }

    /// Same as [`AccuracyMetrics::evaluate`] for slices the caller has already aligned.
    pub(crate) fn from_aligned(actuals: &[f64], forecasts: &[f64]) -> Self {
        let mape = raw_mape(actuals, forecasts);
        Self {
            mape: report(mape),
            mae: report(raw_mae(actuals, forecasts)),
            rmse: report(raw_rmse(actuals, forecasts)),
            confidence: mape.map_or(Confidence::Low, Confidence::from_mape),
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }
}

/// Mean absolute percentage error (×100) over periods with a non-zero actual.
pub fn mape(actuals: &[f64], forecasts: &[f64]) -> Result<f64, ForecastError> {
    check_lengths(actuals, forecasts)?;
    Ok(raw_mape(actuals, forecasts).unwrap_or(SENTINEL))
}

/// Mean absolute error.
pub fn mae(actuals: &[f64], forecasts: &[f64]) -> Result<f64, ForecastError> {
    check_lengths(actuals, forecasts)?;
    Ok(raw_mae(actuals, forecasts).unwrap_or(SENTINEL))
}

/// Root mean squared error.
pub fn rmse(actuals: &[f64], forecasts: &[f64]) -> Result<f64, ForecastError> {
    check_lengths(actuals, forecasts)?;
    Ok(raw_rmse(actuals, forecasts).unwrap_or(SENTINEL))
}

fn check_lengths(actuals: &[f64], forecasts: &[f64]) -> Result<(), ForecastError> {
    if actuals.len() != forecasts.len() {
        return Err(ForecastError::LengthMismatch {
            actuals: actuals.len(),
            forecasts: forecasts.len(),
        });
    }
    Ok(())
}

fn report(metric: Option<f64>) -> f64 {
    match metric {
        Some(v) if v.is_finite() => round_to(v, 2),
        _ => SENTINEL,
    }
}

/// `None` when undefined. Callers guarantee equal lengths.
pub(crate) fn raw_mape(actuals: &[f64], forecasts: &[f64]) -> Option<f64> {
    let (sum, count) = actuals
        .iter()
        .zip(forecasts)
        .filter(|(a, _)| **a != 0.0)
        .fold((0.0, 0usize), |(sum, count), (a, f)| {
            (sum + (a - f).abs() / a.abs(), count + 1)
        });
    if count == 0 {
        return None;
    }
    Some(sum / count as f64 * 100.0)
}

fn raw_mae(actuals: &[f64], forecasts: &[f64]) -> Option<f64> {
    if actuals.is_empty() {
        return None;
    }
    let sum: f64 = actuals.iter().zip(forecasts).map(|(a, f)| (a - f).abs()).sum();
    Some(sum / actuals.len() as f64)
}

fn raw_rmse(actuals: &[f64], forecasts: &[f64]) -> Option<f64> {
    if actuals.is_empty() {
        return None;
    }
    let sum: f64 = actuals.iter().zip(forecasts).map(|(a, f)| (a - f).powi(2)).sum();
    Some((sum / actuals.len() as f64).sqrt())
}

use restock_core::numeric::round_to;

use super::{ForecastMethod, MethodKind, MethodOutput, MethodParameters};

/// Simple moving average: flat forecast at the mean of the last `w` points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct MovingAverage {
    /// `None` picks the window from the history length.
    window: Option<usize>,
}

impl MovingAverage {
    pub fn auto() -> Self {
        Self { window: None }
    }

    /// Fixed window; `0` falls back to the automatic window.
    pub fn with_window(window: usize) -> Self {
        Self {
            window: (window > 0).then_some(window),
        }
    }
}

impl ForecastMethod for MovingAverage {
    fn kind(&self) -> MethodKind {
        MethodKind::Sma
    }

    fn min_data_points(&self) -> usize {
        1
    }

    fn forecast(&self, history: &[f64], periods: usize) -> MethodOutput {
        let window = self.window.unwrap_or_else(|| optimal_window(history.len()));
        simple_moving_average(history, periods, window)
    }
}

/// `< 3` points: all of them; 3..=5: 3; 6..=11: 6; otherwise 12.
pub fn optimal_window(data_points: usize) -> usize {
    match data_points {
        0..=2 => data_points,
        3..=5 => 3,
        6..=11 => 6,
        _ => 12,
    }
}

/// Mean of the last `window` observations (window clamped to the history).
pub fn simple_moving_average(history: &[f64], periods: usize, window: usize) -> MethodOutput {
    if history.is_empty() {
        return MethodOutput {
            parameters: MethodParameters::Sma {
                window_size: window,
                average: 0.0,
            },
            forecast: vec![0.0; periods],
        };
    }

    let window = window.clamp(1, history.len());
    let recent = &history[history.len() - window..];
    let average = recent.iter().sum::<f64>() / window as f64;

    MethodOutput {
        parameters: MethodParameters::Sma {
            window_size: window,
            average,
        },
        forecast: vec![round_to(average, 2); periods],
    }
}

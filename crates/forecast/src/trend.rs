/// Minimum number of observations before a trend is considered.
pub const MIN_TREND_POINTS: usize = 6;

/// Relative slope above which a series counts as trending.
pub const TREND_STRENGTH_THRESHOLD: f64 = 0.05;

/// Ordinary least-squares slope of `history` against its index.
pub fn ols_slope(history: &[f64]) -> f64 {
    let n = history.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = history.iter().sum::<f64>() / n as f64;

    let (num, den) = history
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    if den == 0.0 { 0.0 } else { num / den }
}

/// `|slope| / mean > 0.05` with at least six points. A zero mean is treated as 1.
pub fn detect_trend(history: &[f64]) -> bool {
    if history.len() < MIN_TREND_POINTS {
        return false;
    }
    let mean = history.iter().sum::<f64>() / history.len() as f64;
    let scale = if mean == 0.0 { 1.0 } else { mean };
    (ols_slope(history).abs() / scale) > TREND_STRENGTH_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_of_a_line() {
        let ys: Vec<f64> = (0..8).map(|i| 3.0 + 2.0 * i as f64).collect();
        assert!((ols_slope(&ys) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn trend_needs_six_points_and_strength() {
        assert!(!detect_trend(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        assert!(detect_trend(&[10.0, 12.0, 14.0, 16.0, 18.0, 20.0]));
        assert!(!detect_trend(&[100.0, 101.0, 100.0, 101.0, 100.0, 101.0]));
        assert!(!detect_trend(&[0.0; 8]));
    }
}

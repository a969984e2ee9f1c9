use crate::accuracy::AccuracyMetrics;
use crate::method::{ForecastMethod, MethodKind, Strategy};
use crate::selector::{ForecastRequest, select_best_method};

/// Hold out the last `periods` points, forecast them from the rest and score.
///
/// With `method` the method's default parameters are used; without it the
/// automatic selector runs on the training slice. Sentinel metrics when the
/// history is shorter than `periods + 3`.
pub fn backtest(history: &[f64], periods: usize, method: Option<MethodKind>) -> AccuracyMetrics {
    if periods == 0 || history.len() < periods + 3 {
        return AccuracyMetrics::unmeasured();
    }
    let (train, test) = history.split_at(history.len() - periods);

    let predicted = match method {
        Some(kind) => Strategy::defaults_for(kind).forecast(train, periods).forecast,
        None => select_best_method(&ForecastRequest::new(train.to_vec(), periods)).forecast,
    };

    AccuracyMetrics::from_aligned(test, &predicted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accuracy::Confidence;
    use restock_core::numeric::SENTINEL;

    #[test]
    fn short_history_is_unmeasured() {
        let m = backtest(&[1.0, 2.0, 3.0, 4.0, 5.0], 3, None);
        assert_eq!(m.mape, SENTINEL);
        assert_eq!(m.confidence, Confidence::Low);
    }

    #[test]
    fn flat_history_backtests_perfectly() {
        let m = backtest(&[20.0; 10], 3, Some(MethodKind::Sma));
        assert_eq!(m.mape, 0.0);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.confidence, Confidence::High);
    }

    #[test]
    fn explicit_method_uses_defaults() {
        // SMA(3) of [10, 20, 30] = 20 against actuals [40, 40].
        let m = backtest(&[10.0, 20.0, 30.0, 40.0, 40.0], 2, Some(MethodKind::Sma));
        assert_eq!(m.mae, 20.0);
        assert_eq!(m.mape, 50.0);
    }
}

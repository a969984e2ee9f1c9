use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use restock_core::numeric::{mean, population_std_dev};
use restock_core::{DomainError, DomainResult};

/// Days used to convert monthly aggregates into daily rates.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Period size of a demand series.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Monthly,
}

/// One observation: quantity sold in `period`.
///
/// For monthly series `period` is the first day of the month.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    pub period: NaiveDate,
    pub quantity: f64,
}

impl DemandPoint {
    pub fn new(period: NaiveDate, quantity: f64) -> Self {
        Self { period, quantity }
    }
}

/// Chronologically sorted demand history for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDemandSeries")]
pub struct DemandSeries {
    granularity: Granularity,
    points: Vec<DemandPoint>,
}

#[derive(Deserialize)]
struct RawDemandSeries {
    granularity: Granularity,
    #[serde(default)]
    points: Vec<DemandPoint>,
}

impl TryFrom<RawDemandSeries> for DemandSeries {
    type Error = DomainError;

    fn try_from(raw: RawDemandSeries) -> Result<Self, Self::Error> {
        DemandSeries::new(raw.granularity, raw.points)
    }
}

/// Daily demand statistics feeding the policy calculator.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandStats {
    pub average_daily: f64,
    pub std_dev_daily: f64,
}

impl DemandSeries {
    /// Build a series, rejecting unsorted periods and negative quantities.
    pub fn new(granularity: Granularity, points: Vec<DemandPoint>) -> DomainResult<Self> {
        for p in &points {
            if !p.quantity.is_finite() || p.quantity < 0.0 {
                return Err(DomainError::validation(format!(
                    "demand quantity must be a non-negative number (period {}, got {})",
                    p.period, p.quantity
                )));
            }
        }
        if points.windows(2).any(|w| w[0].period >= w[1].period) {
            return Err(DomainError::validation(
                "demand periods must be strictly increasing",
            ));
        }
        Ok(Self { granularity, points })
    }

    pub fn empty(granularity: Granularity) -> Self {
        Self {
            granularity,
            points: Vec::new(),
        }
    }

    /// Build a contiguous series starting at `start` (normalized to the first of
    /// the month for monthly series).
    pub fn from_quantities(
        granularity: Granularity,
        start: NaiveDate,
        quantities: &[f64],
    ) -> DomainResult<Self> {
        let start = match granularity {
            Granularity::Daily => start,
            Granularity::Monthly => first_of_month(start),
        };

        let mut points = Vec::with_capacity(quantities.len());
        for (i, q) in quantities.iter().enumerate() {
            let period = match granularity {
                Granularity::Daily => start.checked_add_days(chrono::Days::new(i as u64)),
                Granularity::Monthly => start.checked_add_months(Months::new(i as u32)),
            }
            .ok_or_else(|| DomainError::validation("demand period out of calendar range"))?;
            points.push(DemandPoint::new(period, *q));
        }
        Self::new(granularity, points)
    }

    /// Aggregate arbitrary dated sales into calendar months.
    ///
    /// Input order does not matter. Months without sales between the first and
    /// last sale are filled with zero so the result stays contiguous.
    pub fn monthly_from_points(points: &[DemandPoint]) -> DomainResult<Self> {
        let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for p in points {
            if !p.quantity.is_finite() || p.quantity < 0.0 {
                return Err(DomainError::validation(format!(
                    "sales quantity must be a non-negative number (date {}, got {})",
                    p.period, p.quantity
                )));
            }
            *buckets.entry(first_of_month(p.period)).or_insert(0.0) += p.quantity;
        }

        let (Some(first), Some(last)) = (
            buckets.keys().next().copied(),
            buckets.keys().next_back().copied(),
        ) else {
            return Ok(Self::empty(Granularity::Monthly));
        };

        let mut filled = Vec::new();
        let mut month = first;
        while month <= last {
            filled.push(DemandPoint::new(month, buckets.get(&month).copied().unwrap_or(0.0)));
            month = month
                .checked_add_months(Months::new(1))
                .ok_or_else(|| DomainError::validation("sales date out of calendar range"))?;
        }

        Self::new(Granularity::Monthly, filled)
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn points(&self) -> &[DemandPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.period)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.period)
    }

    pub fn quantities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.quantity).collect()
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.quantity).sum()
    }

    /// Whole calendar months elapsed from the first period with a sale to the
    /// last period (same month counts as zero). Zero when nothing was ever sold.
    pub fn months_of_history(&self) -> u32 {
        let Some(first_sale) = self.points.iter().find(|p| p.quantity > 0.0) else {
            return 0;
        };
        let Some(end) = self.end() else {
            return 0;
        };
        let months = (end.year() - first_sale.period.year()) * 12
            + (end.month() as i32 - first_sale.period.month() as i32);
        months.max(0) as u32
    }

    /// Mean and population std-dev of demand, expressed per day.
    ///
    /// Monthly series are scaled by [`DAYS_PER_MONTH`] (std-dev by its square
    /// root, assuming independent days).
    pub fn daily_stats(&self) -> DemandStats {
        let qs = self.quantities();
        let m = mean(&qs);
        let sd = population_std_dev(&qs, m);
        match self.granularity {
            Granularity::Daily => DemandStats {
                average_daily: m,
                std_dev_daily: sd,
            },
            Granularity::Monthly => DemandStats {
                average_daily: m / DAYS_PER_MONTH,
                std_dev_daily: sd / DAYS_PER_MONTH.sqrt(),
            },
        }
    }

    /// Average of the last `window` periods and of the `window` periods before
    /// them. Missing periods count as nothing sold.
    pub fn trailing_averages(&self, window: usize) -> (f64, f64) {
        if window == 0 {
            return (0.0, 0.0);
        }
        let qs = self.quantities();
        let n = qs.len();
        let recent_start = n.saturating_sub(window);
        let previous_start = recent_start.saturating_sub(window);

        let recent = qs[recent_start..].iter().sum::<f64>() / window as f64;
        let previous = qs[previous_start..recent_start].iter().sum::<f64>() / window as f64;
        (recent, previous)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

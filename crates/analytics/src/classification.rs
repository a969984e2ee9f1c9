//! ABC (value) × XYZ (volatility) classification.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use restock_core::numeric::{SENTINEL, ensure_non_negative, mean, population_std_dev, round_to};
use restock_core::{DomainError, DomainResult, ItemId};
use restock_inventory::{AbcGrade, CombinedGrade, DemandSeries, XyzGrade};

/// Items with less sales history than this are reported as new, ungraded.
pub const NEW_ITEM_THRESHOLD_MONTHS: u32 = 3;

/// Cumulative value share boundaries: A up to `a`, B up to `b`, C beyond.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcThresholds {
    pub a: f64,
    pub b: f64,
}

impl Default for AbcThresholds {
    fn default() -> Self {
        Self { a: 0.80, b: 0.95 }
    }
}

impl AbcThresholds {
    pub fn validate(&self) -> DomainResult<()> {
        if !(0.0 < self.a && self.a <= self.b && self.b <= 1.0) {
            return Err(DomainError::validation(format!(
                "ABC thresholds must satisfy 0 < a <= b <= 1 (got a={}, b={})",
                self.a, self.b
            )));
        }
        Ok(())
    }

    pub fn grade(&self, cumulative_share: f64) -> AbcGrade {
        if cumulative_share <= self.a {
            AbcGrade::A
        } else if cumulative_share <= self.b {
            AbcGrade::B
        } else {
            AbcGrade::C
        }
    }
}

/// Coefficient-of-variation boundaries: X below `x`, Y below `y`, Z otherwise.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyzThresholds {
    pub x: f64,
    pub y: f64,
}

impl Default for XyzThresholds {
    fn default() -> Self {
        Self { x: 0.5, y: 1.0 }
    }
}

impl XyzThresholds {
    pub fn validate(&self) -> DomainResult<()> {
        if !(0.0 < self.x && self.x <= self.y) || !self.y.is_finite() {
            return Err(DomainError::validation(format!(
                "XYZ thresholds must satisfy 0 < x <= y (got x={}, y={})",
                self.x, self.y
            )));
        }
        Ok(())
    }

    pub fn grade(&self, cv: f64) -> XyzGrade {
        if cv < self.x {
            XyzGrade::X
        } else if cv < self.y {
            XyzGrade::Y
        } else {
            XyzGrade::Z
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    #[serde(default)]
    pub abc: AbcThresholds,
    #[serde(default)]
    pub xyz: XyzThresholds,
}

impl ClassificationThresholds {
    pub fn validate(&self) -> DomainResult<()> {
        self.abc.validate()?;
        self.xyz.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcInput {
    pub item_id: ItemId,
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcResult {
    pub item_id: ItemId,
    pub name: String,
    pub value: f64,
    pub cumulative_percentage: f64,
    pub grade: AbcGrade,
    /// 1-based, by descending value.
    pub rank: usize,
}

/// Pareto classification by cumulative value share.
///
/// Output is sorted by descending value (ties keep input order). When the total
/// is zero everything is graded C and the cumulative share is `(i + 1) / n`.
pub fn abc_analysis(items: &[AbcInput], thresholds: &AbcThresholds) -> DomainResult<Vec<AbcResult>> {
    for item in items {
        ensure_non_negative("value", item.value)?;
    }
    let mut sorted: Vec<&AbcInput> = items.iter().collect();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));

    let total: f64 = sorted.iter().map(|i| i.value).sum();
    let n = sorted.len() as f64;
    let mut cumulative = 0.0;

    Ok(sorted
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let (share, grade) = if total == 0.0 {
                ((idx + 1) as f64 / n, AbcGrade::C)
            } else {
                cumulative += item.value;
                let share = cumulative / total;
                (share, thresholds.grade(share))
            };
            AbcResult {
                item_id: item.item_id,
                name: item.name.clone(),
                value: item.value,
                cumulative_percentage: share,
                grade,
                rank: idx + 1,
            }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyzInput {
    pub item_id: ItemId,
    pub name: String,
    pub history: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyzResult {
    pub item_id: ItemId,
    pub name: String,
    pub mean_demand: f64,
    pub std_dev: f64,
    /// Rounded to 2 decimals; [`SENTINEL`] when mean demand is zero.
    pub cv: f64,
    pub grade: XyzGrade,
}

/// Coefficient of variation; `None` when mean demand is not positive.
pub fn coefficient_of_variation(history: &[f64]) -> Option<f64> {
    let m = mean(history);
    (m > 0.0).then(|| population_std_dev(history, m) / m)
}

fn xyz_for(history: &[f64], thresholds: &XyzThresholds) -> (f64, f64, f64, XyzGrade) {
    let m = mean(history);
    let sd = population_std_dev(history, m);
    match coefficient_of_variation(history) {
        Some(cv) => (m, sd, round_to(cv, 2), thresholds.grade(cv)),
        None => (m, sd, SENTINEL, XyzGrade::Z),
    }
}

/// Volatility classification per item (population statistics).
pub fn xyz_analysis(items: &[XyzInput], thresholds: &XyzThresholds) -> Vec<XyzResult> {
    items
        .iter()
        .map(|item| {
            let (mean_demand, std_dev, cv, grade) = xyz_for(&item.history, thresholds);
            XyzResult {
                item_id: item.item_id,
                name: item.name.clone(),
                mean_demand,
                std_dev,
                cv,
                grade,
            }
        })
        .collect()
}

/// Priority (1 = AX .. 9 = CZ) and management strategy for a combined grade.
pub fn management_strategy(grade: CombinedGrade) -> (u8, &'static str) {
    use AbcGrade::*;
    use XyzGrade::*;
    match (grade.abc, grade.xyz) {
        (A, X) => (1, "just-in-time supply, automated ordering, high service level"),
        (A, Y) => (2, "periodic ordering, refined forecasting, secured safety stock"),
        (A, Z) => (3, "improve forecasting, collaborate with suppliers, high safety stock"),
        (B, X) => (4, "periodic ordering, keep stock at target level"),
        (B, Y) => (5, "periodic review, standard safety stock"),
        (B, Z) => (6, "analyse demand pattern, adjust order cycle"),
        (C, X) => (7, "bulk ordering, low order frequency"),
        (C, Y) => (8, "occasional review, minimal stock"),
        (C, Z) => (9, "consider make-to-order, minimal stocking or discontinuation"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub item_id: ItemId,
    pub name: String,
    pub value: f64,
    pub cumulative_percentage: f64,
    pub abc_grade: AbcGrade,
    pub value_rank: usize,
    pub mean_demand: f64,
    pub std_dev: f64,
    pub cv: f64,
    pub xyz_grade: XyzGrade,
    pub combined_grade: CombinedGrade,
    pub priority: u8,
    pub strategy: String,
}

/// Join ABC and XYZ results on item id. ABC items without an XYZ result are dropped.
pub fn combine(abc: &[AbcResult], xyz: &[XyzResult]) -> Vec<ClassificationResult> {
    let by_id: HashMap<ItemId, &XyzResult> = xyz.iter().map(|r| (r.item_id, r)).collect();
    abc.iter()
        .filter_map(|a| {
            let x = by_id.get(&a.item_id)?;
            let combined_grade = CombinedGrade::new(a.grade, x.grade);
            let (priority, strategy) = management_strategy(combined_grade);
            Some(ClassificationResult {
                item_id: a.item_id,
                name: a.name.clone(),
                value: a.value,
                cumulative_percentage: a.cumulative_percentage,
                abc_grade: a.grade,
                value_rank: a.rank,
                mean_demand: x.mean_demand,
                std_dev: x.std_dev,
                cv: x.cv,
                xyz_grade: x.grade,
                combined_grade,
                priority,
                strategy: strategy.to_string(),
            })
        })
        .collect()
}

/// Outcome of a grade refresh for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    Graded(ClassificationResult),
    NewItem {
        item_id: ItemId,
        name: String,
        months_of_history: u32,
    },
}

impl Classification {
    pub fn item_id(&self) -> ItemId {
        match self {
            Classification::Graded(r) => r.item_id,
            Classification::NewItem { item_id, .. } => *item_id,
        }
    }

    pub fn graded(&self) -> Option<&ClassificationResult> {
        match self {
            Classification::Graded(r) => Some(r),
            Classification::NewItem { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogClassificationInput {
    pub item_id: ItemId,
    pub name: String,
    pub monthly_demand: DemandSeries,
    /// Trailing-period revenue or usage value.
    pub value: f64,
}

/// Grade refresh over a catalog.
///
/// Items whose history spans fewer than [`NEW_ITEM_THRESHOLD_MONTHS`] are
/// reported as new and excluded from the ABC value pool. Output follows input
/// order; a repeated item id is rejected.
pub fn classify_catalog(
    inputs: &[CatalogClassificationInput],
    thresholds: &ClassificationThresholds,
) -> DomainResult<Vec<Classification>> {
    thresholds.validate()?;
    let mut seen = HashSet::with_capacity(inputs.len());
    if let Some(repeat) = inputs.iter().find(|i| !seen.insert(i.item_id)) {
        return Err(DomainError::validation(format!(
            "duplicate item id {} in catalog",
            repeat.item_id
        )));
    }

    let (eligible, fresh): (Vec<&CatalogClassificationInput>, Vec<&CatalogClassificationInput>) = inputs
        .iter()
        .partition(|i| i.monthly_demand.months_of_history() >= NEW_ITEM_THRESHOLD_MONTHS);

    let abc_inputs: Vec<AbcInput> = eligible
        .iter()
        .map(|i| AbcInput {
            item_id: i.item_id,
            name: i.name.clone(),
            value: i.value,
        })
        .collect();
    let xyz_inputs: Vec<XyzInput> = eligible
        .iter()
        .map(|i| XyzInput {
            item_id: i.item_id,
            name: i.name.clone(),
            history: i.monthly_demand.quantities(),
        })
        .collect();

    let abc = abc_analysis(&abc_inputs, &thresholds.abc)?;
    let xyz = xyz_analysis(&xyz_inputs, &thresholds.xyz);
    let mut graded: HashMap<ItemId, ClassificationResult> =
        combine(&abc, &xyz).into_iter().map(|r| (r.item_id, r)).collect();
    let fresh_ids: HashMap<ItemId, u32> = fresh
        .iter()
        .map(|i| (i.item_id, i.monthly_demand.months_of_history()))
        .collect();

    Ok(inputs
        .iter()
        .filter_map(|i| {
            if let Some(months) = fresh_ids.get(&i.item_id) {
                return Some(Classification::NewItem {
                    item_id: i.item_id,
                    name: i.name.clone(),
                    months_of_history: *months,
                });
            }
            graded.remove(&i.item_id).map(Classification::Graded)
        })
        .collect())
}

/// Grades for a single item given its position in the value ranking.
///
/// A zero `total_value` grades the item C.
pub fn grade_for(
    value: f64,
    total_value: f64,
    cumulative_value_before: f64,
    history: &[f64],
    thresholds: &ClassificationThresholds,
) -> CombinedGrade {
    let abc = if total_value > 0.0 {
        thresholds.abc.grade((cumulative_value_before + value) / total_value)
    } else {
        AbcGrade::C
    };
    let (_, _, _, xyz) = xyz_for(history, &thresholds.xyz);
    CombinedGrade::new(abc, xyz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use restock_inventory::Granularity;

    fn abc_input(value: f64) -> AbcInput {
        AbcInput {
            item_id: ItemId::new(),
            name: format!("item-{value}"),
            value,
        }
    }

    #[test]
    fn pareto_grades() {
        let items: Vec<AbcInput> = [700.0, 150.0, 100.0, 50.0].into_iter().map(abc_input).collect();
        let out = abc_analysis(&items, &AbcThresholds::default()).unwrap();
        let grades: Vec<AbcGrade> = out.iter().map(|r| r.grade).collect();
        // shares 0.70, 0.85, 0.95, 1.00
        assert_eq!(grades, vec![AbcGrade::A, AbcGrade::B, AbcGrade::B, AbcGrade::C]);
        assert_eq!(out[0].rank, 1);
        assert_eq!(out[3].value, 50.0);
    }

    #[test]
    fn zero_total_grades_everything_c() {
        let items: Vec<AbcInput> = (0..4).map(|_| abc_input(0.0)).collect();
        let out = abc_analysis(&items, &AbcThresholds::default()).unwrap();
        assert!(out.iter().all(|r| r.grade == AbcGrade::C));
        assert_eq!(out[1].cumulative_percentage, 0.5);
        assert_eq!(out[3].cumulative_percentage, 1.0);
    }

    #[test]
    fn negative_value_is_rejected() {
        assert!(abc_analysis(&[abc_input(-1.0)], &AbcThresholds::default()).is_err());
    }

    #[test]
    fn xyz_grades_and_sentinel() {
        let item = |history: Vec<f64>| XyzInput {
            item_id: ItemId::new(),
            name: "x".into(),
            history,
        };
        let out = xyz_analysis(
            &[
                item(vec![10.0, 10.0, 10.0]),
                item(vec![0.0, 0.0, 0.0]),
                item(vec![0.0, 30.0, 0.0, 30.0]),
            ],
            &XyzThresholds::default(),
        );
        assert_eq!(out[0].grade, XyzGrade::X);
        assert_eq!(out[0].cv, 0.0);
        assert_eq!(out[1].grade, XyzGrade::Z);
        assert_eq!(out[1].cv, SENTINEL);
        // mean 15, sd 15 → CV 1.0 → Z
        assert_eq!(out[2].cv, 1.0);
        assert_eq!(out[2].grade, XyzGrade::Z);
    }

    #[test]
    fn strategy_table_corners() {
        let ax = CombinedGrade::new(AbcGrade::A, XyzGrade::X);
        let cz = CombinedGrade::new(AbcGrade::C, XyzGrade::Z);
        assert_eq!(management_strategy(ax).0, 1);
        assert_eq!(management_strategy(cz).0, 9);
    }

    #[test]
    fn catalog_refresh_marks_new_items() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = |qs: &[f64]| DemandSeries::from_quantities(Granularity::Monthly, start, qs).unwrap();
        let established = CatalogClassificationInput {
            item_id: ItemId::new(),
            name: "established".into(),
            monthly_demand: series(&[10.0, 12.0, 11.0, 9.0]),
            value: 5000.0,
        };
        let fresh = CatalogClassificationInput {
            item_id: ItemId::new(),
            name: "fresh".into(),
            monthly_demand: series(&[0.0, 0.0, 4.0, 6.0]),
            value: 100.0,
        };
        let out = classify_catalog(&[fresh.clone(), established.clone()], &ClassificationThresholds::default())
            .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0],
            Classification::NewItem {
                item_id: fresh.item_id,
                name: "fresh".into(),
                months_of_history: 1
            }
        );
        let graded = out[1].graded().unwrap();
        assert_eq!(graded.item_id, established.item_id);
        // Only item in the value pool: cumulative share 1.0 → C.
        assert_eq!(graded.abc_grade, AbcGrade::C);
        assert_eq!(graded.xyz_grade, XyzGrade::X);
        assert_eq!(graded.combined_grade.code(), "CX");
    }

    #[test]
    fn catalog_rejects_repeated_ids() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let item = CatalogClassificationInput {
            item_id: ItemId::new(),
            name: "twice".into(),
            monthly_demand: DemandSeries::from_quantities(Granularity::Monthly, start, &[5.0; 6]).unwrap(),
            value: 10.0,
        };
        let err = classify_catalog(&[item.clone(), item], &ClassificationThresholds::default()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn three_months_of_sales_is_still_new() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = |qs: &[f64]| DemandSeries::from_quantities(Granularity::Monthly, start, qs).unwrap();
        let input = |qs: &[f64]| CatalogClassificationInput {
            item_id: ItemId::new(),
            name: "boundary".into(),
            monthly_demand: series(qs),
            value: 100.0,
        };
        let t = ClassificationThresholds::default();

        // Jan..Mar: two months elapsed since the first sale.
        let out = classify_catalog(&[input(&[4.0, 5.0, 6.0])], &t).unwrap();
        assert!(matches!(out[0], Classification::NewItem { months_of_history: 2, .. }));

        // Jan..Apr: three months, graded.
        let out = classify_catalog(&[input(&[4.0, 5.0, 6.0, 5.0])], &t).unwrap();
        assert!(out[0].graded().is_some());
    }

    #[test]
    fn single_item_lookup() {
        let t = ClassificationThresholds::default();
        let g = grade_for(500.0, 1000.0, 0.0, &[10.0, 11.0, 9.0], &t);
        assert_eq!(g.code(), "AX");
        let g = grade_for(0.0, 0.0, 0.0, &[], &t);
        assert_eq!(g.code(), "CZ");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: cumulative shares never decrease and end at 1.0.
        #[test]
        fn abc_cumulative_is_monotonic(values in prop::collection::vec(0.01f64..100_000.0, 1..60)) {
            let items: Vec<AbcInput> = values.into_iter().map(abc_input).collect();
            let out = abc_analysis(&items, &AbcThresholds::default()).unwrap();
            for w in out.windows(2) {
                prop_assert!(w[1].cumulative_percentage >= w[0].cumulative_percentage);
                prop_assert!(w[1].value <= w[0].value);
            }
            let last = out.last().unwrap().cumulative_percentage;
            prop_assert!((last - 1.0).abs() < 1e-9);
        }

        /// Property: scaling a history by a positive constant keeps the XYZ grade.
        #[test]
        fn xyz_grade_is_scale_invariant(
            history in prop::collection::vec(0.0f64..1_000.0, 1..24),
            scale in 0.01f64..1_000.0,
        ) {
            let t = XyzThresholds::default();
            // A CV sitting on a boundary may flip under floating-point scaling.
            let clear_of_boundaries = |cv: f64| (cv - t.x).abs() > 1e-9 && (cv - t.y).abs() > 1e-9;
            prop_assume!(coefficient_of_variation(&history).is_none_or(clear_of_boundaries));
            let id = ItemId::new();
            let base = XyzInput { item_id: id, name: "a".into(), history: history.clone() };
            let scaled = XyzInput {
                item_id: id,
                name: "a".into(),
                history: history.iter().map(|v| v * scale).collect(),
            };
            let out = xyz_analysis(&[base, scaled], &t);
            prop_assert_eq!(out[0].grade, out[1].grade);
            prop_assert!((out[0].cv - out[1].cv).abs() <= 0.01);
        }
    }
}

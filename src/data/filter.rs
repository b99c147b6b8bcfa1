use super::error::DataError;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// IncomeRange – the inclusive filter bound
// ---------------------------------------------------------------------------

/// Closed interval `[low, high]` over `median_income`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeRange {
    low: f64,
    high: f64,
}

impl IncomeRange {
    /// Build a range, rejecting `low > high` and NaN bounds.
    pub fn new(low: f64, high: f64) -> Result<Self, DataError> {
        if low.is_nan() || high.is_nan() || low > high {
            return Err(DataError::InvalidRange { low, high });
        }
        Ok(IncomeRange { low, high })
    }

    /// The full observed income range of a dataset, `None` when empty.
    pub fn observed(dataset: &Dataset) -> Option<Self> {
        dataset
            .income_bounds()
            .map(|(low, high)| IncomeRange { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Whether `value` lies inside the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Pull both bounds inside `bounds`. Used by the UI before filtering;
    /// [`filter_by_income`] itself never clamps.
    pub fn clamp_to(&self, bounds: &IncomeRange) -> Self {
        let low = self.low.clamp(bounds.low, bounds.high);
        let high = self.high.clamp(bounds.low, bounds.high);
        IncomeRange {
            low,
            high: high.max(low),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return the records whose `median_income` lies in `range`, in their
/// original order. The result may be empty.
pub fn filter_by_income(dataset: &Dataset, range: IncomeRange) -> Dataset {
    let records = dataset
        .records
        .iter()
        .filter(|r| range.contains(r.median_income))
        .cloned()
        .collect();
    let filtered = dataset.with_records(records);
    log::debug!(
        "income filter [{}, {}] kept {}/{} records",
        range.low,
        range.high,
        filtered.len(),
        dataset.len()
    );
    filtered
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::data::model::{HousingRecord, NumericField, SourceKind};
    use proptest::prelude::*;

    fn dataset(incomes: &[f64]) -> Dataset {
        let records = incomes
            .iter()
            .enumerate()
            .map(|(i, &inc)| HousingRecord::new(-120.0 - i as f64 * 0.01, 35.0, inc, 1_000.0))
            .collect();
        Dataset::new(records, vec![NumericField::MedianIncome], SourceKind::CleanFile)
    }

    fn incomes() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0.0f64..15.0, 1..60)
    }

    proptest! {
        /// The observed [min, max] range keeps every record in order
        #[test]
        fn full_observed_range_is_identity(values in incomes()) {
            let ds = dataset(&values);
            let full = IncomeRange::observed(&ds).unwrap();
            prop_assert_eq!(filter_by_income(&ds, full), ds);
        }

        /// A range inside another keeps an ordered subsequence of the outer result
        #[test]
        fn nested_ranges_give_nested_results(
            values in incomes(),
            mut cuts in prop::array::uniform4(0.0f64..15.0),
        ) {
            cuts.sort_by(f64::total_cmp);
            let ds = dataset(&values);
            let outer = filter_by_income(&ds, IncomeRange::new(cuts[0], cuts[3]).unwrap());
            let inner_range = IncomeRange::new(cuts[1], cuts[2]).unwrap();
            let inner = filter_by_income(&ds, inner_range);

            prop_assert!(inner.len() <= outer.len());
            prop_assert_eq!(filter_by_income(&outer, inner_range), inner);
        }

        /// Records sitting exactly on either bound are kept
        #[test]
        fn bounds_are_inclusive(
            values in incomes(),
            a in any::<prop::sample::Index>(),
            b in any::<prop::sample::Index>(),
        ) {
            let (x, y) = (values[a.index(values.len())], values[b.index(values.len())]);
            let ds = dataset(&values);
            let out = filter_by_income(&ds, IncomeRange::new(x.min(y), x.max(y)).unwrap());

            let kept: Vec<f64> = out.records.iter().map(|r| r.median_income).collect();
            prop_assert!(kept.contains(&x));
            prop_assert!(kept.contains(&y));
        }

        /// Any low bound above the high bound is rejected
        #[test]
        fn reversed_bounds_always_rejected(low in -1.0e6f64..1.0e6, gap in 1.0e-3f64..1.0e6) {
            let high = low - gap;
            prop_assert_eq!(
                IncomeRange::new(low, high),
                Err(DataError::InvalidRange { low, high })
            );
        }
    }
}

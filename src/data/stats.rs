use super::model::{Dataset, NumericField};

/// Descriptive statistics of one numeric column.
///
/// Undefined cells are skipped. A statistic that cannot be computed
/// (anything on an empty column, `std` on a single value) is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSummary {
    pub field: NumericField,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl FieldSummary {
    fn compute(field: NumericField, mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|m| {
            let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        });
        FieldSummary {
            field,
            count,
            mean,
            std,
            min: values.first().copied(),
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied(),
        }
    }

    /// Row cells in display order: count, mean, std, min, 25%, 50%, 75%, max.
    pub fn cells(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Column headers matching [`FieldSummary::cells`].
pub const STAT_NAMES: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Statistics for every column of a dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub fields: Vec<FieldSummary>,
}

impl Summary {
    pub fn get(&self, field: NumericField) -> Option<&FieldSummary> {
        self.fields.iter().find(|s| s.field == field)
    }
}

/// Summarize every column listed in `dataset.columns`.
pub fn describe(dataset: &Dataset) -> Summary {
    Summary {
        fields: dataset
            .columns
            .iter()
            .map(|&field| FieldSummary::compute(field, dataset.column_values(field)))
            .collect(),
    }
}

/// Linear interpolation between the closest ranks of a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Round to two decimal places for display.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Format a statistic cell, `—` when undefined.
pub fn format_stat(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{:.2}", round2(v)),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{HouseholdProfile, HousingRecord, SourceKind};

    fn dataset(incomes: &[f64]) -> Dataset {
        Dataset::new(
            incomes
                .iter()
                .map(|&inc| HousingRecord::new(-120.0, 35.0, inc, inc * 50_000.0))
                .collect(),
            vec![NumericField::MedianIncome, NumericField::MedianHouseValue],
            SourceKind::CleanFile,
        )
    }

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn describes_small_sample() {
        let s = describe(&dataset(&[1.0, 2.0, 3.0, 4.0]));
        let inc = s.get(NumericField::MedianIncome).unwrap();
        assert_eq!(inc.count, 4);
        assert!(close(inc.mean, 2.5));
        assert!(close(inc.std, 1.2909944487358056));
        assert!(close(inc.min, 1.0));
        assert!(close(inc.q25, 1.75));
        assert!(close(inc.median, 2.5));
        assert!(close(inc.q75, 3.25));
        assert!(close(inc.max, 4.0));

        let val = s.get(NumericField::MedianHouseValue).unwrap();
        assert!(close(val.mean, 125_000.0));
    }

    #[test]
    fn single_value_has_no_std() {
        let s = describe(&dataset(&[7.0]));
        let inc = s.get(NumericField::MedianIncome).unwrap();
        assert_eq!(inc.count, 1);
        assert_eq!(inc.std, None);
        assert!(close(inc.median, 7.0));
    }

    #[test]
    fn empty_dataset_has_zero_count_and_no_stats() {
        let s = describe(&dataset(&[]));
        let inc = s.get(NumericField::MedianIncome).unwrap();
        assert_eq!(inc.count, 0);
        assert_eq!(inc.cells()[1..], [None; 7]);
    }

    #[test]
    fn undefined_ratios_are_skipped() {
        let profile = |rooms: f64| HouseholdProfile {
            average_rooms: rooms,
            average_bedrooms: 1.0,
            population: 100.0,
            average_occupants: 2.0,
        };
        let ds = Dataset::new(
            vec![
                HousingRecord::new(-120.0, 35.0, 1.0, 1.0).with_household(profile(4.0)),
                HousingRecord::new(-120.0, 35.0, 1.0, 1.0).with_household(profile(0.0)),
                HousingRecord::new(-120.0, 35.0, 1.0, 1.0).with_household(profile(2.0)),
            ],
            vec![NumericField::BedroomsPerRoom],
            SourceKind::Reference,
        );
        let bpr = describe(&ds).fields.remove(0);
        assert_eq!(bpr.count, 2);
        assert!(close(bpr.mean, 0.375));
    }

    #[test]
    fn rounds_for_display() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(2.005e5), 200500.0);
        assert_eq!(format_stat(Some(1.0 / 3.0)), "0.33");
        assert_eq!(format_stat(None), "—");
    }
}

use std::path::Path;

use anyhow::{Context, Result};

use crate::chart::{MapLayerSpec, ScatterSpec};
use crate::data::filter::{IncomeRange, filter_by_income};
use crate::data::loader::{self, DataSource};
use crate::data::model::Dataset;
use crate::data::stats::{Summary, describe};

/// File picked up automatically at startup when present.
pub const DEFAULT_DATA_FILE: &str = "california_housing_clean.csv";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// Observed income range of the dataset: the slider limits.
    pub income_bounds: Option<IncomeRange>,

    /// Current slider values.
    pub range: Option<IncomeRange>,

    /// Records inside `range`, recomputed whenever it changes.
    pub filtered: Option<Dataset>,

    /// Statistics of `filtered`.
    pub summary: Summary,

    pub map_layer: MapLayerSpec,
    pub scatter: ScatterSpec,

    /// Set when the map should jump to the centroid of `filtered`.
    pub recenter_map: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            income_bounds: None,
            range: None,
            filtered: None,
            summary: Summary::default(),
            map_layer: MapLayerSpec::default(),
            scatter: ScatterSpec::income_vs_value(),
            recenter_map: false,
            status_message: None,
        }
    }
}

impl AppState {
    /// State with [`DEFAULT_DATA_FILE`] loaded if it exists in the working
    /// directory.
    pub fn with_default_file() -> Self {
        let mut state = Self::default();
        let path = Path::new(DEFAULT_DATA_FILE);
        if path.exists() {
            state.open(DataSource::CleanFile(path.to_path_buf()));
        } else {
            log::debug!("{DEFAULT_DATA_FILE} not found, starting empty");
        }
        state
    }

    /// Load a source and, on failure, surface the error in the status line.
    pub fn open(&mut self, source: DataSource) {
        match load_source(&source) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Load the fixed reference table from the working directory.
    pub fn open_reference(&mut self) {
        self.open(DataSource::reference_dataset());
    }

    /// Ingest a newly loaded dataset with the full income range selected.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.income_bounds = IncomeRange::observed(&dataset);
        self.range = self.income_bounds;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Move the slider values, clamped to the observed range, and refilter.
    pub fn set_range(&mut self, low: f64, high: f64) {
        let Some(bounds) = self.income_bounds else {
            return;
        };
        match IncomeRange::new(low, high) {
            Ok(range) => {
                self.range = Some(range.clamp_to(&bounds));
                self.status_message = None;
                self.refilter();
            }
            Err(e) => {
                log::warn!("{e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Recompute `filtered` and `summary` from the current range.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let filtered = match self.range {
            Some(range) => filter_by_income(ds, range),
            // Empty dataset: nothing to filter.
            None => ds.clone(),
        };
        self.summary = describe(&filtered);
        self.filtered = Some(filtered);
        self.recenter_map = true;
    }

    /// Why there is nothing to filter, if anything.
    pub fn unavailable_reason(&self) -> Option<&'static str> {
        match &self.dataset {
            None => Some("No dataset loaded."),
            Some(ds) if ds.is_empty() => Some("The loaded dataset has no records."),
            Some(_) => None,
        }
    }

    /// Number of records in the loaded and the filtered dataset.
    pub fn counts(&self) -> Option<(usize, usize)> {
        let total = self.dataset.as_ref()?.len();
        let visible = self.filtered.as_ref().map_or(0, Dataset::len);
        Some((total, visible))
    }
}

fn load_source(source: &DataSource) -> Result<Dataset> {
    let dataset = loader::load(source)
        .with_context(|| format!("loading {}", source.path().display()))?;
    if dataset.is_empty() {
        log::warn!("{} contains no records", source.path().display());
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Float64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::loader::REFERENCE_DATA_FILE;
    use crate::data::model::{HousingRecord, NumericField, SourceKind};

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                HousingRecord::new(-122.0, 37.0, 1.0, 100_000.0),
                HousingRecord::new(-121.0, 36.0, 5.0, 200_000.0),
                HousingRecord::new(-120.0, 35.0, 9.0, 300_000.0),
            ],
            vec![NumericField::MedianIncome, NumericField::MedianHouseValue],
            SourceKind::CleanFile,
        )
    }

    #[test]
    fn new_dataset_selects_full_range() {
        let mut state = AppState::default();
        state.set_dataset(sample());
        assert_eq!(state.range, IncomeRange::new(1.0, 9.0).ok());
        assert_eq!(state.counts(), Some((3, 3)));
        assert_eq!(state.summary.get(NumericField::MedianIncome).unwrap().count, 3);
    }

    #[test]
    fn empty_dataset_is_reported_apart_from_no_dataset() {
        let mut state = AppState::default();
        assert_eq!(state.unavailable_reason(), Some("No dataset loaded."));

        state.set_dataset(Dataset::new(Vec::new(), Vec::new(), SourceKind::CleanFile));
        assert_eq!(
            state.unavailable_reason(),
            Some("The loaded dataset has no records.")
        );
        assert_eq!(state.counts(), Some((0, 0)));

        state.set_dataset(sample());
        assert_eq!(state.unavailable_reason(), None);
    }

    #[test]
    fn set_range_refilters_and_clamps() {
        let mut state = AppState::default();
        state.set_dataset(sample());
        state.set_range(2.0, 50.0);
        assert_eq!(state.range, IncomeRange::new(2.0, 9.0).ok());
        assert_eq!(state.counts(), Some((3, 2)));
    }

    #[test]
    fn reversed_range_reports_error_and_keeps_previous_selection() {
        let mut state = AppState::default();
        state.set_dataset(sample());
        state.set_range(6.0, 2.0);
        assert_eq!(state.counts(), Some((3, 3)));
        assert!(state.status_message.is_some());
    }

    #[test]
    fn valid_range_after_rejected_one_clears_error() {
        let mut state = AppState::default();
        state.set_dataset(sample());
        state.set_range(6.0, 2.0);
        assert!(state.status_message.is_some());

        state.set_range(2.0, 9.0);
        assert_eq!(state.counts(), Some((3, 2)));
        assert!(state.status_message.is_none());
    }

    fn write_reference_table(path: &Path) {
        let names = [
            "MedInc", "HouseAge", "AveRooms", "AveBedrms", "Population", "AveOccup", "Latitude",
            "Longitude", "MedHouseVal",
        ];
        let values = [3.0, 20.0, 5.0, 1.0, 900.0, 3.0, 36.0, -120.0, 1.8];
        let schema = Arc::new(Schema::new(
            names
                .iter()
                .map(|n| Field::new(*n, DataType::Float64, false))
                .collect::<Vec<_>>(),
        ));
        let arrays: Vec<ArrayRef> = values
            .iter()
            .map(|v| Arc::new(Float64Array::from(vec![*v])) as ArrayRef)
            .collect();
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();
        let mut writer =
            ArrowWriter::try_new(std::fs::File::create(path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn reference_selector_loads_fixed_table() {
        let dir = tempfile::tempdir().unwrap();
        write_reference_table(&dir.path().join(REFERENCE_DATA_FILE));

        let mut state = AppState::default();
        state.open(DataSource::reference_in(dir.path()));
        assert!(state.status_message.is_none());
        let dataset = state.dataset.as_ref().unwrap();
        assert_eq!(dataset.kind, SourceKind::Reference);
        assert_eq!(state.counts(), Some((1, 1)));
        assert_eq!(
            dataset.records[0].derived.unwrap().population_density,
            Some(300.0)
        );
    }

    #[test]
    fn missing_reference_table_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.open(DataSource::reference_in(dir.path()));
        assert!(state.dataset.is_none());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("data unavailable")));
    }

    #[test]
    fn opening_missing_file_sets_status() {
        let mut state = AppState::default();
        state.open(DataSource::CleanFile("/nonexistent/housing.csv".into()));
        assert!(state.dataset.is_none());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("data unavailable")));
    }
}

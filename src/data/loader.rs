use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{Dataset, HouseholdProfile, HousingRecord, NumericField, SourceKind};

// ---------------------------------------------------------------------------
// Sources and their column layouts
// ---------------------------------------------------------------------------

/// Where to load the housing table from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Cleaned file with `longitude, latitude, median_income,
    /// median_house_value` (and optionally `housing_median_age`).
    CleanFile(PathBuf),
    /// Reference table with `MedInc, HouseAge, AveRooms, AveBedrms,
    /// Population, AveOccup, Latitude, Longitude` and the `MedHouseVal` target.
    Reference(PathBuf),
}

/// Fixed, versioned reference table, resolved against the working directory.
pub const REFERENCE_DATA_FILE: &str = "california_housing_reference.parquet";

impl DataSource {
    /// The reference table at its fixed location.
    pub fn reference_dataset() -> Self {
        Self::reference_in(Path::new("."))
    }

    /// The reference table under `dir`.
    pub fn reference_in(dir: &Path) -> Self {
        DataSource::Reference(dir.join(REFERENCE_DATA_FILE))
    }

    pub fn path(&self) -> &Path {
        match self {
            DataSource::CleanFile(p) | DataSource::Reference(p) => p,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            DataSource::CleanFile(_) => SourceKind::CleanFile,
            DataSource::Reference(_) => SourceKind::Reference,
        }
    }
}

/// Source column names, in the order `normalize` reads them.
/// The first four are the mandatory coordinates / income / value.
const CLEAN_COLUMNS: &[&str] = &[
    "longitude",
    "latitude",
    "median_income",
    "median_house_value",
    "housing_median_age",
];
const CLEAN_REQUIRED: usize = 4;

const REFERENCE_COLUMNS: &[&str] = &[
    "Longitude",
    "Latitude",
    "MedInc",
    "MedHouseVal",
    "HouseAge",
    "AveRooms",
    "AveBedrms",
    "Population",
    "AveOccup",
];

fn layout(kind: SourceKind) -> (&'static [&'static str], usize) {
    match kind {
        SourceKind::CleanFile => (CLEAN_COLUMNS, CLEAN_REQUIRED),
        SourceKind::Reference => (REFERENCE_COLUMNS, REFERENCE_COLUMNS.len()),
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and normalize a housing dataset.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row, one record per line
/// * `.json`         – `[{ "longitude": ..., ... }, ...]`
/// * `.parquet`      – flat numeric columns
pub fn load(source: &DataSource) -> Result<Dataset, DataError> {
    let path = source.path();
    let kind = source.kind();
    let (wanted, required) = layout(kind);

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => read_delimited(path, b',', wanted)?,
        "tsv" => read_delimited(path, b'\t', wanted)?,
        "json" => read_json(path, wanted)?,
        "parquet" | "pq" => read_parquet(path, wanted)?,
        other => {
            return Err(DataError::unavailable(
                path,
                format!("unsupported file extension: .{other}"),
            ))
        }
    };

    if let Some(idx) = table.present[..required].iter().position(|p| !p) {
        return Err(DataError::missing_column(wanted[idx]));
    }

    let dataset = normalize(&table, kind)?;
    log::info!(
        "Loaded {} records ({:?}) from {}",
        dataset.len(),
        kind,
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw table: the wanted columns only, one cell per (row, column)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Number(f64),
    Missing,
    Invalid(String),
}

impl Cell {
    fn from_f64(v: f64) -> Self {
        if v.is_nan() {
            Cell::Missing
        } else {
            Cell::Number(v)
        }
    }

    fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Cell::Missing;
        }
        match text.parse::<f64>() {
            Ok(v) => Cell::from_f64(v),
            Err(_) => Cell::Invalid(text.to_string()),
        }
    }
}

struct RawTable {
    /// Whether each wanted column exists in the source.
    present: Vec<bool>,
    /// `rows[r][c]` is the cell of wanted column `c` in row `r`.
    rows: Vec<Vec<Cell>>,
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

fn read_delimited(path: &Path, delimiter: u8, wanted: &[&str]) -> Result<RawTable, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| DataError::unavailable(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::unavailable(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let positions: Vec<Option<usize>> = wanted
        .iter()
        .map(|name| headers.iter().position(|h| h == name))
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::MalformedRecord {
            row: row_no,
            reason: e.to_string(),
        })?;
        let cells = positions
            .iter()
            .map(|pos| match pos.and_then(|i| record.get(i)) {
                Some(text) => Cell::parse(text),
                None => Cell::Missing,
            })
            .collect();
        rows.push(cells);
    }

    Ok(RawTable {
        present: positions.iter().map(Option::is_some).collect(),
        rows,
    })
}

// ---------------------------------------------------------------------------
// JSON (records-oriented, `df.to_json(orient='records')`)
// ---------------------------------------------------------------------------

fn read_json(path: &Path, wanted: &[&str]) -> Result<RawTable, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::unavailable(path, e))?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| DataError::unavailable(path, e))?;
    let records = root
        .as_array()
        .ok_or_else(|| DataError::unavailable(path, "expected top-level JSON array"))?;

    let mut present = vec![false; wanted.len()];
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DataError::MalformedRecord {
            row: i,
            reason: "not a JSON object".to_string(),
        })?;
        let cells = wanted
            .iter()
            .enumerate()
            .map(|(c, name)| match obj.get(*name) {
                Some(val) => {
                    present[c] = true;
                    json_cell(val)
                }
                None => Cell::Missing,
            })
            .collect();
        rows.push(cells);
    }

    Ok(RawTable { present, rows })
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Number(n) => n
            .as_f64()
            .map_or_else(|| Cell::Invalid(n.to_string()), Cell::from_f64),
        JsonValue::Null => Cell::Missing,
        JsonValue::String(s) => Cell::parse(s),
        other => Cell::Invalid(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path, wanted: &[&str]) -> Result<RawTable, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::unavailable(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataError::unavailable(path, e))?;
    let schema = builder.schema().clone();
    let reader = builder.build().map_err(|e| DataError::unavailable(path, e))?;

    let positions: Vec<Option<usize>> = wanted
        .iter()
        .map(|name| schema.index_of(name).ok())
        .collect();

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| DataError::unavailable(path, e))?;
        let columns: Vec<Option<&ArrayRef>> = positions
            .iter()
            .map(|pos| pos.map(|i| batch.column(i)))
            .collect();

        for row in 0..batch.num_rows() {
            let cells = columns
                .iter()
                .map(|col| match col {
                    Some(col) => arrow_cell(col, row),
                    None => Cell::Missing,
                })
                .collect();
            rows.push(cells);
        }
    }

    Ok(RawTable {
        present: positions.iter().map(Option::is_some).collect(),
        rows,
    })
}

/// Read one numeric cell from an Arrow column.
fn arrow_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Missing;
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Cell::from_f64(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        Cell::from_f64(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Cell::Number(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Cell::Number(arr.value(row) as f64)
    } else {
        Cell::Invalid(format!("{:?}", col.data_type()))
    }
}

// ---------------------------------------------------------------------------
// Normalization: raw cells → canonical records
// ---------------------------------------------------------------------------

fn normalize(table: &RawTable, kind: SourceKind) -> Result<Dataset, DataError> {
    let (names, _) = layout(kind);
    let mut records = Vec::with_capacity(table.rows.len());

    for (row, cells) in table.rows.iter().enumerate() {
        let required = |c: usize| -> Result<f64, DataError> {
            match &cells[c] {
                Cell::Number(v) => Ok(*v),
                Cell::Missing => Err(DataError::MalformedRecord {
                    row,
                    reason: format!("missing value for '{}'", names[c]),
                }),
                Cell::Invalid(text) => Err(DataError::MalformedRecord {
                    row,
                    reason: format!("'{}' value '{text}' is not a number", names[c]),
                }),
            }
        };
        let optional = |c: usize| -> Result<Option<f64>, DataError> {
            match &cells[c] {
                Cell::Missing => Ok(None),
                _ => required(c).map(Some),
            }
        };

        let mut record = HousingRecord::new(required(0)?, required(1)?, required(2)?, required(3)?);
        record.housing_median_age = optional(4)?;

        if kind == SourceKind::Reference {
            record = record.with_household(HouseholdProfile {
                average_rooms: required(5)?,
                average_bedrooms: required(6)?,
                population: required(7)?,
                average_occupants: required(8)?,
            });
        }

        record
            .validate()
            .map_err(|reason| DataError::MalformedRecord { row, reason })?;
        records.push(record);
    }

    let columns = match kind {
        SourceKind::CleanFile => {
            let mut cols = vec![NumericField::Longitude, NumericField::Latitude];
            if table.present[4] {
                cols.push(NumericField::HousingMedianAge);
            }
            cols.extend([NumericField::MedianIncome, NumericField::MedianHouseValue]);
            cols
        }
        SourceKind::Reference => vec![
            NumericField::Longitude,
            NumericField::Latitude,
            NumericField::HousingMedianAge,
            NumericField::MedianIncome,
            NumericField::MedianHouseValue,
            NumericField::AverageRooms,
            NumericField::AverageBedrooms,
            NumericField::Population,
            NumericField::AverageOccupants,
            NumericField::RoomsPerHousehold,
            NumericField::BedroomsPerRoom,
            NumericField::PopulationDensity,
        ],
    };

    let undefined = records
        .iter()
        .filter_map(|r| r.derived)
        .filter(|d| {
            d.rooms_per_household.is_none()
                || d.bedrooms_per_room.is_none()
                || d.population_density.is_none()
        })
        .count();
    if undefined > 0 {
        log::warn!("{undefined} records have an undefined derived ratio (zero denominator)");
    }

    Ok(Dataset::new(records, columns, kind))
}

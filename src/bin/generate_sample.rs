use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 2000;
const CLEAN_PATH: &str = "california_housing_clean.csv";
/// Same file the dashboard loads through *File → Load reference dataset*.
const REFERENCE_PATH: &str = "california_housing_reference.parquet";

/// Population centres: (longitude, latitude, spread in degrees, value premium in USD).
const REGIONS: [(f64, f64, f64, f64); 5] = [
    (-122.30, 37.70, 0.35, 120_000.0),
    (-118.30, 34.10, 0.45, 80_000.0),
    (-117.10, 32.80, 0.25, 70_000.0),
    (-121.50, 38.60, 0.30, 10_000.0),
    (-119.80, 36.80, 0.30, 0.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One synthetic block group, in the cleaned-file layout.
#[derive(Debug, Serialize)]
struct CleanRow {
    longitude: f64,
    latitude: f64,
    housing_median_age: f64,
    median_income: f64,
    median_house_value: f64,
}

/// Household columns that only the reference table carries.
struct Household {
    average_rooms: f64,
    average_bedrooms: f64,
    population: f64,
    average_occupants: f64,
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (v * f).round() / f
}

fn generate(rng: &mut SimpleRng) -> Vec<(CleanRow, Household)> {
    (0..ROWS)
        .map(|i| {
            let (lon0, lat0, spread, premium) = REGIONS[i % REGIONS.len()];
            let median_income = rng.gauss(1.2, 0.45).exp().clamp(0.4999, 15.0001);
            let value = median_income * 40_000.0 + premium + rng.gauss(0.0, 35_000.0);

            let average_rooms = rng.gauss(5.4, 1.2).max(1.0);
            let average_occupants = rng.gauss(3.0, 0.7).max(1.0);
            let households = rng.uniform(100.0, 1000.0);

            let row = CleanRow {
                longitude: round_to(lon0 + rng.gauss(0.0, spread), 2),
                latitude: round_to(lat0 + rng.gauss(0.0, spread), 2),
                housing_median_age: rng.uniform(1.0, 52.0).floor(),
                median_income: round_to(median_income, 4),
                median_house_value: value.clamp(14_999.0, 500_001.0).round(),
            };
            let household = Household {
                average_rooms,
                average_bedrooms: average_rooms * rng.uniform(0.15, 0.25),
                population: (average_occupants * households).round(),
                average_occupants,
            };
            (row, household)
        })
        .collect()
}

fn write_clean_csv(rows: &[(CleanRow, Household)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CLEAN_PATH).context("creating clean CSV")?;
    for (row, _) in rows {
        writer.serialize(row).context("writing clean CSV row")?;
    }
    writer.flush().context("flushing clean CSV")?;
    Ok(())
}

fn write_reference_parquet(rows: &[(CleanRow, Household)]) -> Result<()> {
    let column = |f: fn(&CleanRow, &Household) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(
            rows.iter().map(|(r, h)| f(r, h)).collect::<Vec<_>>(),
        ))
    };

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("MedInc", column(|r, _| r.median_income)),
        ("HouseAge", column(|r, _| r.housing_median_age)),
        ("AveRooms", column(|_, h| h.average_rooms)),
        ("AveBedrms", column(|_, h| h.average_bedrooms)),
        ("Population", column(|_, h| h.population)),
        ("AveOccup", column(|_, h| h.average_occupants)),
        ("Latitude", column(|r, _| r.latitude)),
        ("Longitude", column(|r, _| r.longitude)),
        ("MedHouseVal", column(|r, _| r.median_house_value / 100_000.0)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, array)| array).collect(),
    )
    .context("building record batch")?;

    let file = std::fs::File::create(REFERENCE_PATH).context("creating reference parquet")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_clean_csv(&rows)?;
    write_reference_parquet(&rows)?;

    println!("Wrote {} records to {CLEAN_PATH} and {REFERENCE_PATH}", rows.len());
    Ok(())
}

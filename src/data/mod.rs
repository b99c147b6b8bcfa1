/// Data layer: core types, loading, filtering and statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + rename columns → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<HousingRecord>, column list
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  income range → filtered Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  count / mean / std / quartiles
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;

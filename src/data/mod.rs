/// Data layer: schema, loading, filtering, statistics and export.
///
/// Architecture:
/// ```text
///  HTTPS .csv  /  local .csv .json .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse, validate headers → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Schema + Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  filter   │ ───▶ │  stats    │  mean / sum / histogram
///   └──────────┘      └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  filtered view → CSV bytes
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
pub mod stats;

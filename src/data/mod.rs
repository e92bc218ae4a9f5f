/// Data layer: typed records, loading, and date selection.
///
/// Architecture:
/// ```text
///  URL / .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → Dataset (invalid dates skipped)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, min/max timestamp, stations
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  range    │  picker values → DateInterval
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod range;

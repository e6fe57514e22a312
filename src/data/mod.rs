/// Data layer: launch records, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate rows → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<LaunchRecord>, payload bounds, site list
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  (Dataset, FilterSelection) → PieSlice / ScatterPoint
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;

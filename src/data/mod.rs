/// Data layer: curve table, loading, and row filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet   (exports of an already-parsed LAS file)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CurveTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ CurveTable  │  depth index + canonical-name → Curve
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop rows with missing samples → reduced CurveTable
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;

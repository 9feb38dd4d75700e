/// Data layer: core types, loading, validation and reshaping.
///
/// Architecture:
/// ```text
///  upload bytes / default .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode first sheet → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  ≥ 2 columns, ≥ 1 row
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ reshape   │  measurement suffix filter → long-form table
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod reshape;
pub mod schema;

/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file once → Arc<ListingTable>
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ListingTable  │  Vec<Listing>, typed filter columns
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply Selections → ListingView
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ aggregate / chart   │  summary stats, value counts, chart data
///   └────────────────────┘
/// ```

pub mod aggregate;
pub mod chart;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

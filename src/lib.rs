// BEL Performance Engine - Core Library
// Exposes all modules for use in the report CLI and tests

pub mod store;      // Record Store - canonical profiles + monthly series
pub mod aggregate;  // Yearly Aggregator - cutoff-policy cumulative metrics
pub mod metrics;    // Metrics Calculator - ratios + region lookup
pub mod project;    // Record Projector - flat view records
pub mod query;      // Query Engine - filter/sort/paginate pipeline
pub mod selection;  // Selection Tracker - id-keyed selection set
pub mod summary;    // Summary Aggregator - portfolio totals + level breakdown
pub mod debounce;   // Query Debouncer - deferred recomputation scheduling
pub mod loader;     // Snapshot Loader - JSON/CSV input boundary

// Re-export commonly used types
pub use store::{
    BelProfile, Level, Month, MonthlyBuckets, MonthlyMetrics, RecordStore,
};
pub use aggregate::{
    aggregate, aggregate_with_policy, CutoffPolicy, YearlyAggregate,
};
pub use metrics::{
    average_order_value, conversion_rate, Region, RegionTable,
};
pub use project::{project, project_all, AccountRecord};
pub use query::{
    evaluate, page_count, ActivityFilter, FilterSpec, QueryResult, QuerySpec,
    SortDirection, SortKey, DEFAULT_PAGE_SIZE,
};
pub use selection::SelectionSet;
pub use summary::{
    performance_by_level, summarize, LevelHistogram, LevelPerformance,
    SummaryAggregate,
};
pub use debounce::{QueryDebouncer, DEFAULT_QUIET_PERIOD};
pub use loader::{
    load_monthly_csv, load_snapshot, load_store, merge_monthly_rows,
    parse_snapshot, MonthlyRow, Snapshot,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 🔍 Query Engine - Shared filter → sort → paginate pipeline
//
// One pipeline serves the table, card-grid and list views so filter
// semantics cannot diverge between them. Each view owns its own QuerySpec;
// evaluation is pure over a slice of projected records. Invalid specs
// degrade (identity order, empty page) - the engine never fails under any
// UI state.

use crate::metrics::Region;
use crate::project::AccountRecord;
use crate::store::Level;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// FILTERS
// ============================================================================

/// Activity facet of the filter bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityFilter {
    /// Clicks but no orders yet
    ClicksNoOrders,
    /// At least one order
    HasOrders,
    /// No clicks and no orders
    Inactive,
}

impl ActivityFilter {
    /// Parse the filter dropdown value; unknown values leave the clause unset
    pub fn parse(s: &str) -> Option<ActivityFilter> {
        match s.trim().to_lowercase().as_str() {
            "clicks" => Some(ActivityFilter::ClicksNoOrders),
            "orders" => Some(ActivityFilter::HasOrders),
            "none" => Some(ActivityFilter::Inactive),
            _ => None,
        }
    }

    pub fn matches(&self, record: &AccountRecord) -> bool {
        match self {
            ActivityFilter::ClicksNoOrders => record.clicks > 0 && record.orders == 0,
            ActivityFilter::HasOrders => record.orders > 0,
            ActivityFilter::Inactive => record.clicks + record.orders == 0,
        }
    }
}

/// Filter clauses, AND-combined; an empty/unset clause is skipped
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring match on name
    #[serde(default)]
    pub keyword: String,

    /// Case-insensitive substring match on referral id
    #[serde(default)]
    pub referral_id: String,

    #[serde(default)]
    pub level: Option<Level>,

    #[serde(default)]
    pub region: Option<Region>,

    /// Exact country match; empty = unset
    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub activity: Option<ActivityFilter>,
}

impl FilterSpec {
    pub fn matches(&self, record: &AccountRecord) -> bool {
        let keyword = self.keyword.trim().to_lowercase();
        if !keyword.is_empty() && !record.name.to_lowercase().contains(&keyword) {
            return false;
        }

        let referral_id = self.referral_id.trim().to_lowercase();
        if !referral_id.is_empty() && !record.id.to_lowercase().contains(&referral_id) {
            return false;
        }

        if let Some(level) = self.level {
            if record.level != level {
                return false;
            }
        }

        if let Some(region) = self.region {
            if record.region != region {
                return false;
            }
        }

        if !self.country.is_empty() && record.country != self.country {
            return false;
        }

        if let Some(activity) = self.activity {
            if !activity.matches(record) {
                return false;
            }
        }

        true
    }
}

// ============================================================================
// SORTING
// ============================================================================

/// Sortable column of the view record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Id,
    Name,
    Email,
    Level,
    Clicks,
    Orders,
    Revenue,
    ConversionRate,
    Aov,
    Region,
    Country,
}

impl SortKey {
    /// Parse a column key as sent by a view. Unknown keys yield `None`,
    /// which evaluation treats as "leave input order untouched".
    pub fn parse(s: &str) -> Option<SortKey> {
        match s.trim().to_lowercase().as_str() {
            "id" | "referral_id" => Some(SortKey::Id),
            "name" => Some(SortKey::Name),
            "email" => Some(SortKey::Email),
            "level" => Some(SortKey::Level),
            "clicks" | "clicks30" => Some(SortKey::Clicks),
            "orders" | "orders30" => Some(SortKey::Orders),
            "revenue" | "revenue30" => Some(SortKey::Revenue),
            "conv_rate" | "convrate" | "conversion_rate" => Some(SortKey::ConversionRate),
            "aov" => Some(SortKey::Aov),
            "region" => Some(SortKey::Region),
            "country" => Some(SortKey::Country),
            _ => None,
        }
    }

    fn compare(&self, a: &AccountRecord, b: &AccountRecord) -> Ordering {
        match self {
            SortKey::Id => cmp_str(&a.id, &b.id),
            SortKey::Name => cmp_str(&a.name, &b.name),
            SortKey::Email => cmp_str(&a.email, &b.email),
            SortKey::Level => a.level.rank().cmp(&b.level.rank()),
            SortKey::Clicks => a.clicks.cmp(&b.clicks),
            SortKey::Orders => a.orders.cmp(&b.orders),
            SortKey::Revenue => cmp_f64(a.revenue, b.revenue),
            SortKey::ConversionRate => cmp_f64(a.conversion_rate, b.conversion_rate),
            SortKey::Aov => cmp_f64(a.aov, b.aov),
            SortKey::Region => cmp_str(a.region.as_str(), b.region.as_str()),
            SortKey::Country => cmp_str(&a.country, &b.country),
        }
    }
}

/// Case-insensitive string ordering for display columns
fn cmp_str(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Ratios are guarded finite upstream; equal-or-incomparable ties keep
/// original relative order via the stable sort
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(&self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}

// ============================================================================
// QUERY SPEC
// ============================================================================

/// One view's complete query state. Each consuming view holds its own
/// instance; all views share the same evaluation semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySpec {
    #[serde(default)]
    pub filter: FilterSpec,

    /// `None` = identity order (also the unknown-sort-key fallback)
    #[serde(default)]
    pub sort_key: Option<SortKey>,

    #[serde(default)]
    pub sort_dir: SortDirection,

    /// 1-based page number
    pub page: usize,

    pub page_size: usize,
}

impl QuerySpec {
    pub fn new() -> Self {
        QuerySpec {
            filter: FilterSpec::default(),
            sort_key: None,
            sort_dir: SortDirection::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the sort from a raw column key; unknown keys clear the sort
    pub fn with_sort(mut self, key: &str, dir: SortDirection) -> Self {
        self.sort_key = SortKey::parse(key);
        self.sort_dir = dir;
        self
    }
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows-per-page default of the views
pub const DEFAULT_PAGE_SIZE: usize = 20;

// ============================================================================
// EVALUATION
// ============================================================================

/// One evaluated page plus the post-filter total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub page: Vec<AccountRecord>,
    /// Filtered count before slicing - what the pagination label shows
    pub total: usize,
}

/// Filter → stable sort → slice.
///
/// A page past the end returns an empty slice with the correct total;
/// `page_size` 0 returns an empty page. No QuerySpec makes this fail.
pub fn evaluate(records: &[AccountRecord], spec: &QuerySpec) -> QueryResult {
    let mut filtered: Vec<AccountRecord> = records
        .iter()
        .filter(|record| spec.filter.matches(record))
        .cloned()
        .collect();

    if let Some(key) = spec.sort_key {
        // sort_by is stable: equal keys keep input order, so rows never
        // flicker position between evaluations
        filtered.sort_by(|a, b| {
            let ordering = key.compare(a, b);
            match spec.sort_dir {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    let total = filtered.len();
    let start = spec.page.saturating_sub(1).saturating_mul(spec.page_size);
    let page = if spec.page_size == 0 || start >= total {
        Vec::new()
    } else {
        let end = (start + spec.page_size).min(total);
        filtered[start..end].to_vec()
    };

    QueryResult { page, total }
}

/// Number of pages at a given page size (0 when either side is 0)
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{average_order_value, conversion_rate};

    fn create_test_record(
        id: &str,
        name: &str,
        level: Level,
        clicks: u64,
        orders: u64,
        revenue: f64,
        country: &str,
        region: Region,
    ) -> AccountRecord {
        AccountRecord {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", id.to_lowercase()),
            level,
            clicks,
            orders,
            revenue,
            conversion_rate: conversion_rate(clicks, orders),
            aov: average_order_value(revenue, orders),
            country: country.to_string(),
            region,
        }
    }

    fn sample_records() -> Vec<AccountRecord> {
        vec![
            create_test_record("TW001", "Alice Chen", Level::Leader, 100, 10, 1500.0, "Taiwan", Region::Taiwan),
            create_test_record("US002", "Bob Smith", Level::Builder, 50, 0, 0.0, "United States", Region::NorthAmerica),
            create_test_record("JP003", "Chika Sato", Level::Exploder, 0, 0, 0.0, "Japan", Region::Japan),
            create_test_record("TW004", "Dora Lin", Level::Leader, 200, 40, 8000.0, "Taiwan", Region::Taiwan),
            create_test_record("DE005", "Erik Weber", Level::Enabler, 80, 8, 640.0, "Germany", Region::Europe),
        ]
    }

    #[test]
    fn test_keyword_filter_case_insensitive() {
        let records = sample_records();
        let mut spec = QuerySpec::new();
        spec.filter.keyword = "aLiCe".to_string();

        let result = evaluate(&records, &spec);
        assert_eq!(result.total, 1);
        assert_eq!(result.page[0].id, "TW001");
    }

    #[test]
    fn test_referral_id_substring_filter() {
        let records = sample_records();
        let mut spec = QuerySpec::new();
        spec.filter.referral_id = "tw".to_string();

        let result = evaluate(&records, &spec);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_filters_and_combine() {
        let records = sample_records();
        let mut spec = QuerySpec::new();
        spec.filter.level = Some(Level::Leader);
        spec.filter.country = "Taiwan".to_string();
        spec.filter.activity = Some(ActivityFilter::HasOrders);

        let result = evaluate(&records, &spec);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_activity_filters() {
        let records = sample_records();

        let mut clicks_only = QuerySpec::new();
        clicks_only.filter.activity = Some(ActivityFilter::ClicksNoOrders);
        let result = evaluate(&records, &clicks_only);
        assert_eq!(result.total, 1);
        assert_eq!(result.page[0].id, "US002");

        let mut inactive = QuerySpec::new();
        inactive.filter.activity = Some(ActivityFilter::Inactive);
        let result = evaluate(&records, &inactive);
        assert_eq!(result.total, 1);
        assert_eq!(result.page[0].id, "JP003");

        let mut with_orders = QuerySpec::new();
        with_orders.filter.activity = Some(ActivityFilter::HasOrders);
        assert_eq!(evaluate(&records, &with_orders).total, 3);
    }

    #[test]
    fn test_activity_parse() {
        assert_eq!(ActivityFilter::parse("clicks"), Some(ActivityFilter::ClicksNoOrders));
        assert_eq!(ActivityFilter::parse("orders"), Some(ActivityFilter::HasOrders));
        assert_eq!(ActivityFilter::parse("none"), Some(ActivityFilter::Inactive));
        assert_eq!(ActivityFilter::parse("whatever"), None);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample_records();
        let mut spec = QuerySpec::new();
        spec.filter.level = Some(Level::Leader);
        spec.page_size = 100;

        let once = evaluate(&records, &spec);
        let twice = evaluate(&once.page, &spec);
        assert_eq!(once.page, twice.page);
        assert_eq!(twice.total, once.total);
    }

    #[test]
    fn test_sort_numeric_desc() {
        let records = sample_records();
        let mut spec = QuerySpec::new();
        spec.sort_key = Some(SortKey::Revenue);
        spec.sort_dir = SortDirection::Desc;

        let result = evaluate(&records, &spec);
        let revenues: Vec<f64> = result.page.iter().map(|r| r.revenue).collect();
        assert_eq!(revenues, vec![8000.0, 1500.0, 640.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sort_symmetry_on_distinct_keys() {
        let records = sample_records();
        let mut asc = QuerySpec::new();
        asc.sort_key = Some(SortKey::Clicks);
        asc.sort_dir = SortDirection::Asc;
        let mut desc = asc.clone();
        desc.sort_dir = SortDirection::Desc;

        let ascending: Vec<String> = evaluate(&records, &asc).page.into_iter().map(|r| r.id).collect();
        let mut descending: Vec<String> = evaluate(&records, &desc).page.into_iter().map(|r| r.id).collect();
        descending.reverse();

        // All click counts are distinct, so desc is exactly asc reversed
        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_sort_stability_on_ties() {
        let mut records = sample_records();
        // Give three records the same level so ties are observable
        records[0].level = Level::Leader;
        records[3].level = Level::Leader;
        records[2].level = Level::Leader;

        let mut spec = QuerySpec::new();
        spec.sort_key = Some(SortKey::Level);
        spec.sort_dir = SortDirection::Desc;

        let result = evaluate(&records, &spec);
        let leaders: Vec<&str> = result
            .page
            .iter()
            .filter(|r| r.level == Level::Leader)
            .map(|r| r.id.as_str())
            .collect();

        // Tied records keep their input order
        assert_eq!(leaders, vec!["TW001", "JP003", "TW004"]);
    }

    #[test]
    fn test_level_sorts_by_rank_not_alphabet() {
        let records = sample_records();
        let mut spec = QuerySpec::new();
        spec.sort_key = Some(SortKey::Level);
        spec.sort_dir = SortDirection::Asc;

        let result = evaluate(&records, &spec);
        // Alphabetical would put Enabler before Exploder before Leader too,
        // but Builder must come first and Leader last by rank
        assert_eq!(result.page.first().unwrap().level, Level::Builder);
        assert_eq!(result.page.last().unwrap().level, Level::Leader);
    }

    #[test]
    fn test_unknown_sort_key_is_identity_order() {
        let records = sample_records();
        let spec = QuerySpec::new().with_sort("bogus_column", SortDirection::Desc);
        assert_eq!(spec.sort_key, None);

        let result = evaluate(&records, &spec);
        let ids: Vec<&str> = result.page.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["TW001", "US002", "JP003", "TW004", "DE005"]);
    }

    #[test]
    fn test_sort_key_parse_aliases() {
        assert_eq!(SortKey::parse("clicks30"), Some(SortKey::Clicks));
        assert_eq!(SortKey::parse("ConvRate"), Some(SortKey::ConversionRate));
        assert_eq!(SortKey::parse("revenue"), Some(SortKey::Revenue));
        assert_eq!(SortKey::parse(""), None);
    }

    #[test]
    fn test_pagination_slices() {
        let records = sample_records();
        let mut spec = QuerySpec::new();
        spec.page_size = 2;

        spec.page = 1;
        assert_eq!(evaluate(&records, &spec).page.len(), 2);
        spec.page = 3;
        let last = evaluate(&records, &spec);
        assert_eq!(last.page.len(), 1);
        assert_eq!(last.total, 5);
    }

    #[test]
    fn test_pagination_completeness() {
        let records = sample_records();
        let mut spec = QuerySpec::new();
        spec.page_size = 2;

        let total = evaluate(&records, &spec).total;
        let pages = page_count(total, spec.page_size);
        assert_eq!(pages, 3);

        let mut seen = Vec::new();
        for page in 1..=pages {
            spec.page = page;
            seen.extend(evaluate(&records, &spec).page.into_iter().map(|r| r.id));
        }

        let expected: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_page_past_end_is_empty_not_error() {
        let records = sample_records();
        let mut spec = QuerySpec::new();
        spec.page_size = 10;
        spec.page = 99;

        let result = evaluate(&records, &spec);
        assert!(result.page.is_empty());
        assert_eq!(result.total, 5);
    }

    #[test]
    fn test_page_size_zero_is_empty_not_panic() {
        let records = sample_records();
        let mut spec = QuerySpec::new();
        spec.page_size = 0;

        let result = evaluate(&records, &spec);
        assert!(result.page.is_empty());
        assert_eq!(result.total, 5);
        assert_eq!(page_count(result.total, 0), 0);
    }

    #[test]
    fn test_empty_input() {
        let result = evaluate(&[], &QuerySpec::new());
        assert!(result.page.is_empty());
        assert_eq!(result.total, 0);
    }

    #[test]
    fn test_leader_revenue_page_three() {
        // 25 Leaders among 30 records; level=Leader, revenue desc, page
        // size 10 → page 3 holds exactly the 5 lowest-revenue Leaders
        let mut records = Vec::new();
        for i in 0..30 {
            let level = if i < 25 { Level::Leader } else { Level::Builder };
            records.push(create_test_record(
                &format!("ID{:03}", i),
                &format!("Bel {}", i),
                level,
                1000,
                10,
                (i as f64 + 1.0) * 100.0,
                "Taiwan",
                Region::Taiwan,
            ));
        }

        let mut spec = QuerySpec::new();
        spec.filter.level = Some(Level::Leader);
        spec.sort_key = Some(SortKey::Revenue);
        spec.sort_dir = SortDirection::Desc;
        spec.page_size = 10;
        spec.page = 3;

        let result = evaluate(&records, &spec);
        assert_eq!(result.total, 25);
        assert_eq!(result.page.len(), 5);

        let revenues: Vec<f64> = result.page.iter().map(|r| r.revenue).collect();
        assert_eq!(revenues, vec![500.0, 400.0, 300.0, 200.0, 100.0]);
    }

    #[test]
    fn test_sort_direction_flip() {
        assert_eq!(SortDirection::Asc.flip(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.flip(), SortDirection::Asc);
    }

    #[test]
    fn test_store_edit_reaches_next_evaluation() {
        use crate::aggregate::CutoffPolicy;
        use crate::metrics::RegionTable;
        use crate::project::project_all;
        use crate::store::{BelProfile, RecordStore};

        let mut store = RecordStore::new();
        store.register(BelProfile::new("TW001", "Alice Chen", "", Level::Builder, "Taiwan"));

        let policy = CutoffPolicy::full_years(2025);
        let regions = RegionTable::new();
        let mut spec = QuerySpec::new();
        spec.filter.level = Some(Level::Leader);

        // Before the edit the Leader filter matches nothing
        let records = project_all(&store.all(), 2025, &policy, &regions);
        assert_eq!(evaluate(&records, &spec).total, 0);

        store.update_level("TW001", Level::Leader).unwrap();

        // Views re-project from the store on read, so the edit is visible
        // to the very next evaluation - there is no cached copy to go stale
        let records = project_all(&store.all(), 2025, &policy, &regions);
        let result = evaluate(&records, &spec);
        assert_eq!(result.total, 1);
        assert_eq!(result.page[0].level, Level::Leader);
    }
}

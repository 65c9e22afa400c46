// 📅 Yearly Aggregator - Monthly buckets → yearly cumulative metrics
//
// Sums click/order/revenue buckets over the months of a year that count as
// complete. Which months count is a caller-supplied policy, NOT a date baked
// into the engine: a year in progress sums only its finished months so a
// partial year is never presented as a full one.

use crate::store::{BelProfile, Month};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// YEARLY AGGREGATE
// ============================================================================

/// Cumulative metrics for one BEL over one year's cutoff months.
///
/// Derived fresh on every query - never stored, never survives a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YearlyAggregate {
    pub clicks: u64,
    pub orders: u64,
    pub revenue: f64,
}

// ============================================================================
// CUTOFF POLICY
// ============================================================================

/// Which months of each year count as complete.
///
/// Every year other than `current_year` counts all 12 months. The year in
/// progress counts only the configured subset. The policy is external
/// configuration: the engine never consults the calendar on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutoffPolicy {
    current_year: i32,
    complete_months: Vec<Month>,
}

impl CutoffPolicy {
    pub fn new(current_year: i32, complete_months: Vec<Month>) -> Self {
        CutoffPolicy { current_year, complete_months }
    }

    /// Policy where even the current year counts all 12 months
    pub fn full_years(current_year: i32) -> Self {
        CutoffPolicy::new(current_year, Month::ALL.to_vec())
    }

    /// Policy derived from a calendar date: months strictly before the
    /// date's month are complete. 2025-09-08 → January..August complete.
    /// A January date leaves the current year with no complete months.
    pub fn through_date(date: NaiveDate) -> Self {
        let finished = date.month().saturating_sub(1) as usize;
        CutoffPolicy::new(date.year(), Month::ALL[..finished].to_vec())
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Months that count as complete for `year`
    pub fn months_for(&self, year: i32) -> &[Month] {
        if year == self.current_year {
            &self.complete_months
        } else {
            &Month::ALL
        }
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Sum a profile's buckets over exactly the given months of `year`.
///
/// Pure and idempotent: absent months contribute zero, an absent year
/// returns all zeros, months outside the list are never touched.
pub fn aggregate(profile: &BelProfile, year: i32, months: &[Month]) -> YearlyAggregate {
    let mut total = YearlyAggregate::default();

    let buckets = match profile.monthly_data.get(&year) {
        Some(buckets) => buckets,
        None => return total,
    };

    for month in months {
        if let Some(bucket) = buckets.get(month) {
            total.clicks += bucket.clicks;
            total.orders += bucket.orders;
            total.revenue += bucket.revenue;
        }
    }

    total
}

/// Aggregate under a cutoff policy (resolves the month list for `year`)
pub fn aggregate_with_policy(profile: &BelProfile, year: i32, policy: &CutoffPolicy) -> YearlyAggregate {
    aggregate(profile, year, policy.months_for(year))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Level, MonthlyMetrics};

    fn create_test_profile() -> BelProfile {
        BelProfile::new("TW001", "Alice Chen", "alice@example.com", Level::Leader, "Taiwan")
    }

    #[test]
    fn test_cutoff_ignores_months_outside_policy() {
        // Jan-Aug: 10 clicks each. Sep-Dec: 999 each. Cutoff Jan..Aug → 80.
        let mut profile = create_test_profile();
        for (i, month) in Month::ALL.iter().enumerate() {
            let clicks = if i < 8 { 10 } else { 999 };
            profile.set_monthly(2025, *month, MonthlyMetrics::new(clicks, 0, 0.0));
        }

        let result = aggregate(&profile, 2025, Month::through(Month::August));
        assert_eq!(result.clicks, 80);
    }

    #[test]
    fn test_aggregate_sums_all_fields() {
        let mut profile = create_test_profile();
        profile.set_monthly(2025, Month::January, MonthlyMetrics::new(100, 10, 1500.0));
        profile.set_monthly(2025, Month::February, MonthlyMetrics::new(50, 5, 500.0));

        let result = aggregate(&profile, 2025, &Month::ALL);
        assert_eq!(result.clicks, 150);
        assert_eq!(result.orders, 15);
        assert_eq!(result.revenue, 2000.0);
    }

    #[test]
    fn test_absent_months_contribute_zero() {
        let mut profile = create_test_profile();
        profile.set_monthly(2025, Month::March, MonthlyMetrics::new(40, 4, 400.0));

        // March data present, cutoff covers Jan-Jun; missing months are zero
        let result = aggregate(&profile, 2025, Month::through(Month::June));
        assert_eq!(result.clicks, 40);
        assert_eq!(result.orders, 4);
    }

    #[test]
    fn test_absent_year_returns_zero() {
        let profile = create_test_profile();
        let result = aggregate(&profile, 2025, &Month::ALL);
        assert_eq!(result, YearlyAggregate::default());
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let mut profile = create_test_profile();
        profile.set_monthly(2025, Month::May, MonthlyMetrics::new(7, 3, 77.7));

        let first = aggregate(&profile, 2025, &Month::ALL);
        let second = aggregate(&profile, 2025, &Month::ALL);
        assert_eq!(first, second);
    }

    #[test]
    fn test_policy_full_months_for_other_years() {
        let policy = CutoffPolicy::new(2025, Month::through(Month::August).to_vec());

        assert_eq!(policy.months_for(2025).len(), 8);
        assert_eq!(policy.months_for(2024).len(), 12);
        assert_eq!(policy.months_for(2026).len(), 12);
    }

    #[test]
    fn test_policy_through_date() {
        // September 8 → January..August complete
        let policy = CutoffPolicy::through_date(NaiveDate::from_ymd_opt(2025, 9, 8).unwrap());
        assert_eq!(policy.current_year(), 2025);
        assert_eq!(policy.months_for(2025), Month::through(Month::August));

        // January → nothing complete yet in the new year
        let january = CutoffPolicy::through_date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        assert!(january.months_for(2026).is_empty());
        assert_eq!(january.months_for(2025).len(), 12);
    }

    #[test]
    fn test_aggregate_with_policy_matches_manual_cutoff() {
        let mut profile = create_test_profile();
        profile.set_monthly(2025, Month::July, MonthlyMetrics::new(30, 2, 250.0));
        profile.set_monthly(2025, Month::November, MonthlyMetrics::new(500, 50, 9999.0));

        let policy = CutoffPolicy::new(2025, Month::through(Month::August).to_vec());
        let via_policy = aggregate_with_policy(&profile, 2025, &policy);
        let manual = aggregate(&profile, 2025, Month::through(Month::August));

        assert_eq!(via_policy, manual);
        assert_eq!(via_policy.clicks, 30);
    }

    #[test]
    fn test_orders_exceeding_clicks_propagate() {
        // Source data may violate orders <= clicks; the engine passes it through
        let mut profile = create_test_profile();
        profile.set_monthly(2025, Month::April, MonthlyMetrics::new(5, 20, 100.0));

        let result = aggregate(&profile, 2025, &Month::ALL);
        assert_eq!(result.clicks, 5);
        assert_eq!(result.orders, 20);
    }
}

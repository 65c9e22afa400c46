// 📊 Summary Aggregator - Portfolio totals for dashboard cards and charts
//
// Two deliberately different ratio semantics live here:
// - The portfolio cards show the MEAN OF EACH BEL'S OWN RATIO, counting only
//   BELs with a nonzero denominator. 10% and 50% average to 30%, not to the
//   13.6% a ratio-of-totals would give.
// - The per-level table shows ratio of the level's totals.
// Both match the observed dashboard numbers; do not "fix" one into the other.

use crate::aggregate::{aggregate_with_policy, CutoffPolicy};
use crate::metrics::{average_order_value, conversion_rate};
use crate::store::{BelProfile, Level};
use serde::{Deserialize, Serialize};

// ============================================================================
// LEVEL HISTOGRAM
// ============================================================================

/// Profile count per level. All four levels are always present, zero or not,
/// so chart axes never lose a label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelHistogram {
    pub builder: usize,
    pub enabler: usize,
    pub exploder: usize,
    pub leader: usize,
}

impl LevelHistogram {
    pub fn increment(&mut self, level: Level) {
        match level {
            Level::Builder => self.builder += 1,
            Level::Enabler => self.enabler += 1,
            Level::Exploder => self.exploder += 1,
            Level::Leader => self.leader += 1,
        }
    }

    pub fn count(&self, level: Level) -> usize {
        match level {
            Level::Builder => self.builder,
            Level::Enabler => self.enabler,
            Level::Exploder => self.exploder,
            Level::Leader => self.leader,
        }
    }

    pub fn total(&self) -> usize {
        self.builder + self.enabler + self.exploder + self.leader
    }
}

// ============================================================================
// SUMMARY AGGREGATE
// ============================================================================

/// Portfolio-wide numbers for the dashboard cards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryAggregate {
    /// Number of BEL profiles in the snapshot
    pub count: usize,
    pub total_clicks: u64,
    pub total_orders: u64,
    pub total_revenue: f64,
    /// Mean of per-BEL conversion rates over BELs with clicks > 0
    pub avg_conversion_rate: f64,
    /// Mean of per-BEL AOV over BELs with orders > 0
    pub avg_aov: f64,
    pub level_histogram: LevelHistogram,
}

/// Summarize a snapshot for `year` under the cutoff policy.
///
/// Empty input (or no BEL with a nonzero denominator) yields zeros,
/// never NaN.
pub fn summarize(profiles: &[BelProfile], year: i32, policy: &CutoffPolicy) -> SummaryAggregate {
    let mut summary = SummaryAggregate {
        count: profiles.len(),
        ..SummaryAggregate::default()
    };

    let mut conv_rate_sum = 0.0;
    let mut aov_sum = 0.0;
    let mut valid_cvr_count = 0usize;
    let mut valid_aov_count = 0usize;

    for profile in profiles {
        let yearly = aggregate_with_policy(profile, year, policy);

        summary.total_clicks += yearly.clicks;
        summary.total_orders += yearly.orders;
        summary.total_revenue += yearly.revenue;
        summary.level_histogram.increment(profile.level);

        if yearly.clicks > 0 {
            conv_rate_sum += conversion_rate(yearly.clicks, yearly.orders);
            valid_cvr_count += 1;
        }

        if yearly.orders > 0 {
            aov_sum += average_order_value(yearly.revenue, yearly.orders);
            valid_aov_count += 1;
        }
    }

    if valid_cvr_count > 0 {
        summary.avg_conversion_rate = conv_rate_sum / valid_cvr_count as f64;
    }
    if valid_aov_count > 0 {
        summary.avg_aov = aov_sum / valid_aov_count as f64;
    }

    summary
}

// ============================================================================
// PER-LEVEL BREAKDOWN
// ============================================================================

/// One row of the performance-by-level dashboard table.
///
/// Ratios here are computed over the level's pooled totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelPerformance {
    pub level: Level,
    pub count: usize,
    pub clicks: u64,
    pub orders: u64,
    pub revenue: f64,
    pub conv_rate: f64,
    pub aov: f64,
}

impl LevelPerformance {
    fn empty(level: Level) -> Self {
        LevelPerformance {
            level,
            count: 0,
            clicks: 0,
            orders: 0,
            revenue: 0.0,
            conv_rate: 0.0,
            aov: 0.0,
        }
    }
}

/// Pool yearly aggregates per level, Builder → Leader order.
/// Levels with no profiles are present with zeros.
pub fn performance_by_level(profiles: &[BelProfile], year: i32, policy: &CutoffPolicy) -> Vec<LevelPerformance> {
    let mut rows: Vec<LevelPerformance> = Level::ALL
        .iter()
        .map(|level| LevelPerformance::empty(*level))
        .collect();

    for profile in profiles {
        let yearly = aggregate_with_policy(profile, year, policy);
        let row = &mut rows[(profile.level.rank() - 1) as usize];
        row.count += 1;
        row.clicks += yearly.clicks;
        row.orders += yearly.orders;
        row.revenue += yearly.revenue;
    }

    for row in &mut rows {
        row.conv_rate = conversion_rate(row.clicks, row.orders);
        row.aov = average_order_value(row.revenue, row.orders);
    }

    rows
}

// ============================================================================
// TESTS
// ============================================================================
